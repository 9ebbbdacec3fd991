//! Graph data structures for input to the mindmap component.
//!
//! These mirror the JSON returned by the generation service and stored in the
//! local cache, so they round-trip through `serde` unchanged.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::error::MindmapError;

/// A node in the graph. The id doubles as the display label.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GraphNode {
	/// Unique identifier, also rendered as the node label.
	pub id: String,
}

/// A directed, labeled edge between two nodes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct GraphEdge {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Relation text drawn at the edge midpoint.
	#[serde(default)]
	pub label: String,
}

/// Complete graph data: nodes and edges in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(default)]
	pub edges: Vec<GraphEdge>,
}

impl GraphData {
	/// Resolve every edge to `(source, target)` node indices.
	///
	/// Fails on the first duplicate node id or dangling edge endpoint.
	pub fn resolve_edges(&self) -> Result<Vec<(usize, usize)>, MindmapError> {
		let mut id_to_idx = HashMap::with_capacity(self.nodes.len());
		for (i, node) in self.nodes.iter().enumerate() {
			if id_to_idx.insert(node.id.as_str(), i).is_some() {
				return Err(MindmapError::DuplicateNode(node.id.clone()));
			}
		}

		self.edges
			.iter()
			.enumerate()
			.map(|(i, edge)| {
				let resolve = |id: &String| {
					id_to_idx
						.get(id.as_str())
						.copied()
						.ok_or_else(|| MindmapError::UnknownNode {
							edge: i,
							id: id.clone(),
						})
				};
				Ok((resolve(&edge.source)?, resolve(&edge.target)?))
			})
			.collect()
	}

	/// Check that the graph can be laid out.
	pub fn validate(&self) -> Result<(), MindmapError> {
		self.resolve_edges().map(|_| ())
	}
}

impl GraphNode {
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into() }
	}
}

impl GraphEdge {
	pub fn new(
		source: impl Into<String>,
		target: impl Into<String>,
		label: impl Into<String>,
	) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			label: label.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_generation_response() {
		let json = r#"{
			"nodes": [{"id": "Internet"}, {"id": "Users"}],
			"edges": [{"source": "Internet", "target": "Users", "label": "connects"}]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes.len(), 2);
		assert_eq!(data.edges[0], GraphEdge::new("Internet", "Users", "connects"));
	}

	#[test]
	fn missing_label_and_edges_default() {
		let data: GraphData =
			serde_json::from_str(r#"{"nodes": [{"id": "a"}, {"id": "b"}]}"#).unwrap();
		assert!(data.edges.is_empty());

		let edge: GraphEdge = serde_json::from_str(r#"{"source": "a", "target": "b"}"#).unwrap();
		assert_eq!(edge.label, "");
	}

	#[test]
	fn resolves_edges_to_indices() {
		let data = GraphData {
			nodes: vec![GraphNode::new("a"), GraphNode::new("b")],
			edges: vec![GraphEdge::new("b", "a", ""), GraphEdge::new("a", "a", "")],
		};
		assert_eq!(data.resolve_edges().unwrap(), vec![(1, 0), (0, 0)]);
	}

	#[test]
	fn validate_reports_dangling_and_duplicate_ids() {
		let dangling = GraphData {
			nodes: vec![GraphNode::new("A")],
			edges: vec![GraphEdge::new("A", "Z", "")],
		};
		assert_eq!(
			dangling.validate(),
			Err(MindmapError::UnknownNode {
				edge: 0,
				id: "Z".into()
			})
		);

		let duplicate = GraphData {
			nodes: vec![GraphNode::new("A"), GraphNode::new("A")],
			edges: vec![],
		};
		assert_eq!(
			duplicate.validate(),
			Err(MindmapError::DuplicateNode("A".into()))
		);
	}
}
