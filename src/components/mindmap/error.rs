//! Errors surfaced by the mindmap core.

/// Failures that reject a graph load or a render request.
///
/// Every variant is raised before any simulation, transform or interaction
/// state is touched, so a failed call leaves the previous scene intact.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MindmapError {
	/// An edge references a node id that is not part of the graph.
	#[error("edge {edge} references unknown node \"{id}\"")]
	UnknownNode { edge: usize, id: String },

	/// Two nodes share the same id.
	#[error("duplicate node id \"{0}\"")]
	DuplicateNode(String),

	/// The drawing surface has not been mounted (or has no 2-D context).
	#[error("render target is not available")]
	MissingRenderTarget,
}
