//! Force-directed mindmap visualization component.
//!
//! Renders a labeled directed graph on an HTML canvas with:
//! - Physics-based layout (link springs, charge, collision, center anchor)
//! - Pan, zoom, toolbar zoom animations and node dragging
//! - Hover tooltips with incident-edge emphasis
//! - Deterministic, content-derived node sizes and colors
//!
//! # Example
//!
//! ```ignore
//! use mindmapr::{GraphData, GraphEdge, GraphNode, MindmapCanvas, MindmapHandle};
//!
//! let handle = MindmapHandle::new();
//! let data = GraphData {
//!     nodes: vec![GraphNode::new("Internet"), GraphNode::new("Users")],
//!     edges: vec![GraphEdge::new("Internet", "Users", "connects")],
//! };
//!
//! view! { <MindmapCanvas handle=handle.clone() initial=Some(data) /> }
//! ```

mod component;
pub mod encoding;
mod error;
pub mod interaction;
mod render;
pub mod scene;
pub mod simulation;
mod state;
pub mod theme;
pub mod transform;
mod types;

pub use component::MindmapCanvas;
pub use error::MindmapError;
pub use interaction::{InteractionEvent, NodeState, PointerEvent};
pub use scene::Scene;
pub use simulation::{Simulation, SimulationConfig};
pub use state::{MindmapConfig, MindmapContext, MindmapHandle};
pub use theme::Theme;
pub use transform::{Transform, Viewport, ZoomConfig, ZoomGesture};
pub use types::{GraphData, GraphEdge, GraphNode};
