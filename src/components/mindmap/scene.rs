//! Pure projection from mindmap state to draw primitives.
//!
//! [`Scene::project`] reads node positions, the view transform, hover/drag
//! state and entrance progress, and produces shapes that the canvas painter
//! can draw without further logic. Nothing here mutates the context.

use std::collections::HashMap;

use serde::Deserialize;

use super::encoding;
use super::interaction::{NodeState, Tooltip};
use super::simulation::{SimEdge, SimNode, Simulation};
use super::state::MindmapContext;
use super::theme::{Color, GradientPair};
use super::transform::Transform;

/// Staggered fade-in timing for a freshly rendered graph.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EntranceConfig {
	/// Delay between consecutive nodes, in input order.
	pub stagger_ms: f64,
	/// Fade duration of a single node.
	pub fade_ms: f64,
}

impl Default for EntranceConfig {
	fn default() -> Self {
		Self {
			stagger_ms: 30.0,
			fade_ms: 450.0,
		}
	}
}

/// Elapsed time since the current graph was first rendered.
#[derive(Clone, Debug, Default)]
pub struct Entrance {
	elapsed_ms: f64,
}

impl Entrance {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn advance(&mut self, dt_ms: f64) {
		self.elapsed_ms += dt_ms;
	}

	/// Eased progress in `[0, 1]` of node `index`.
	pub fn node_progress(&self, index: usize, config: &EntranceConfig) -> f64 {
		let start = index as f64 * config.stagger_ms;
		if config.fade_ms <= 0.0 {
			return if self.elapsed_ms >= start { 1.0 } else { 0.0 };
		}
		let t = ((self.elapsed_ms - start) / config.fade_ms).clamp(0.0, 1.0);
		1.0 - (1.0 - t).powi(3)
	}

	pub fn is_finished(&self, node_count: usize, config: &EntranceConfig) -> bool {
		let last = node_count.saturating_sub(1) as f64 * config.stagger_ms;
		self.elapsed_ms >= last + config.fade_ms
	}
}

/// Hover/drag emphasis tuning.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EmphasisConfig {
	/// Radius multiplier for the hovered or dragged node.
	pub radius_scale: f64,
	pub border_width: f64,
	/// Stroke width of edges incident to the focused node.
	pub edge_width: f64,
	/// Opacity multiplier for unrelated edges while a node is focused.
	pub dim_opacity: f64,
	/// Curve offset between parallel edges, as a fraction of edge length.
	pub parallel_spacing: f64,
}

impl Default for EmphasisConfig {
	fn default() -> Self {
		Self {
			radius_scale: 1.15,
			border_width: 3.0,
			edge_width: 4.0,
			dim_opacity: 0.35,
			parallel_spacing: 0.3,
		}
	}
}

/// Geometry of a drawn edge in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgePath {
	Line {
		from: (f64, f64),
		to: (f64, f64),
	},
	Quadratic {
		from: (f64, f64),
		control: (f64, f64),
		to: (f64, f64),
	},
}

impl EdgePath {
	/// Point halfway along the path, where the label sits.
	pub fn midpoint(&self) -> (f64, f64) {
		match *self {
			EdgePath::Line { from, to } => ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0),
			EdgePath::Quadratic { from, control, to } => (
				0.25 * from.0 + 0.5 * control.0 + 0.25 * to.0,
				0.25 * from.1 + 0.5 * control.1 + 0.25 * to.1,
			),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeShape {
	pub path: EdgePath,
	pub color: Color,
	pub width: f64,
	pub opacity: f64,
	pub label: String,
	pub label_at: (f64, f64),
	pub emphasized: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	pub label: String,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub fill: GradientPair,
	pub border_color: Color,
	pub border_width: f64,
	pub opacity: f64,
	pub state: NodeState,
}

/// Everything needed to paint one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
	pub width: f64,
	pub height: f64,
	pub transform: Transform,
	pub edges: Vec<EdgeShape>,
	/// Back to front; focused nodes come last.
	pub nodes: Vec<NodeShape>,
	pub tooltip: Option<Tooltip>,
}

impl Scene {
	pub fn project(ctx: &MindmapContext) -> Self {
		let mut scene = Scene {
			width: ctx.width(),
			height: ctx.height(),
			transform: ctx.viewport().transform(),
			edges: Vec::new(),
			nodes: Vec::new(),
			tooltip: None,
		};
		let Some(sim) = ctx.simulation() else {
			return scene;
		};

		let config = ctx.config();
		let progress: Vec<f64> = (0..sim.nodes().len())
			.map(|i| ctx.entrance().node_progress(i, &config.entrance))
			.collect();

		scene.edges = project_edges(ctx, sim, &progress);
		scene.nodes = project_nodes(ctx, sim, &progress);
		scene.tooltip = ctx.interaction().tooltip(sim);
		scene
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

fn project_edges(ctx: &MindmapContext, sim: &Simulation, progress: &[f64]) -> Vec<EdgeShape> {
	let theme = ctx.theme();
	let emphasis = &ctx.config().emphasis;
	let focus = ctx.interaction().focus();
	let offsets = curve_offsets(sim.edges(), emphasis.parallel_spacing);
	let nodes = sim.nodes();

	sim.edges()
		.iter()
		.zip(offsets)
		.filter(|(edge, _)| !edge.is_self_loop())
		.map(|(edge, offset)| {
			let (s, t) = (&nodes[edge.source], &nodes[edge.target]);
			let offset = match offset {
				Some(o) => Some(o),
				None if theme.edge.curved => Some(theme.edge.curve_tension),
				None => None,
			};
			let path = edge_path(s, t, offset);
			let emphasized = focus.is_some_and(|idx| edge.touches(idx));
			let base = theme.edge.opacity;
			let opacity = match focus {
				Some(_) if emphasized => 1.0,
				Some(_) => base * emphasis.dim_opacity,
				None => base,
			} * progress[edge.source].min(progress[edge.target]);

			EdgeShape {
				path,
				color: encoding::edge_color(&s.id, &t.id, &edge.label, theme),
				width: if emphasized {
					emphasis.edge_width
				} else {
					theme.edge.width
				},
				opacity,
				label: edge.label.clone(),
				label_at: path.midpoint(),
				emphasized,
			}
		})
		.collect()
}

/// Curve offsets for edges that share an endpoint pair; `None` for lone edges.
///
/// Offsets are signed relative to the pair's canonical direction (lower index
/// first), so reciprocal edges bend to opposite sides.
fn curve_offsets(edges: &[SimEdge], spacing: f64) -> Vec<Option<f64>> {
	let mut groups: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
	for (i, edge) in edges.iter().enumerate() {
		let key = (edge.source.min(edge.target), edge.source.max(edge.target));
		groups.entry(key).or_default().push(i);
	}

	let mut offsets = vec![None; edges.len()];
	for members in groups.values().filter(|m| m.len() > 1) {
		let mid = (members.len() - 1) as f64 / 2.0;
		for (slot, &i) in members.iter().enumerate() {
			let o = (slot as f64 - mid) * spacing;
			// Re-express relative to this edge's own direction.
			offsets[i] = Some(if edges[i].source <= edges[i].target { o } else { -o });
		}
	}
	offsets
}

fn edge_path(s: &SimNode, t: &SimNode, offset: Option<f64>) -> EdgePath {
	let (from, to) = ((s.x, s.y), (t.x, t.y));
	let Some(offset) = offset.filter(|o| *o != 0.0) else {
		return EdgePath::Line { from, to };
	};
	let (dx, dy) = (to.0 - from.0, to.1 - from.1);
	let (mx, my) = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
	// Perpendicular scaled by the edge length.
	EdgePath::Quadratic {
		from,
		control: (mx - dy * offset, my + dx * offset),
		to,
	}
}

fn project_nodes(ctx: &MindmapContext, sim: &Simulation, progress: &[f64]) -> Vec<NodeShape> {
	let theme = ctx.theme();
	let emphasis = &ctx.config().emphasis;
	let interaction = ctx.interaction();

	let mut shapes: Vec<NodeShape> = sim
		.nodes()
		.iter()
		.enumerate()
		.map(|(i, node)| {
			let state = interaction.node_state(i);
			let p = progress[i];
			let grow = 0.6 + 0.4 * p;
			let (radius, border_color, border_width) = match state {
				NodeState::Idle => (node.radius, theme.node.border_color, theme.node.border_width),
				NodeState::Hovered | NodeState::Dragging => (
					node.radius * emphasis.radius_scale,
					theme.node.emphasis_border_color,
					emphasis.border_width,
				),
			};
			NodeShape {
				label: node.id.clone(),
				x: node.x,
				y: node.y,
				radius: radius * grow,
				fill: encoding::node_fill(&node.id, theme),
				border_color,
				border_width,
				opacity: p,
				state,
			}
		})
		.collect();

	// Stable sort keeps input order among idle nodes.
	shapes.sort_by_key(|shape| shape.state != NodeState::Idle);
	shapes
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mindmap::interaction::PointerEvent;
	use crate::components::mindmap::state::MindmapConfig;
	use crate::components::mindmap::types::{GraphData, GraphEdge, GraphNode};

	fn context(nodes: &[&str], edges: &[(&str, &str, &str)]) -> MindmapContext {
		let mut ctx = MindmapContext::new(800.0, 600.0, MindmapConfig::default());
		ctx.render_graph(&GraphData {
			nodes: nodes.iter().map(|id| GraphNode::new(*id)).collect(),
			edges: edges
				.iter()
				.map(|(s, t, l)| GraphEdge::new(*s, *t, *l))
				.collect(),
		})
		.unwrap();
		ctx
	}

	fn finish_entrance(ctx: &mut MindmapContext) {
		for _ in 0..200 {
			ctx.tick(16.0);
		}
	}

	#[test]
	fn empty_context_projects_empty_scene() {
		let ctx = MindmapContext::new(800.0, 600.0, MindmapConfig::default());
		let scene = Scene::project(&ctx);
		assert!(scene.is_empty());
		assert!(scene.edges.is_empty());
		assert_eq!(scene.transform, Transform::IDENTITY);
	}

	#[test]
	fn shapes_follow_encoding() {
		let mut ctx = context(&["Internet", "Users"], &[("Internet", "Users", "connects")]);
		finish_entrance(&mut ctx);
		let scene = Scene::project(&ctx);
		assert_eq!(scene.nodes.len(), 2);
		assert_eq!(scene.nodes[0].radius, encoding::radius("Internet"));
		assert_eq!(scene.nodes[0].fill, encoding::node_fill("Internet", ctx.theme()));
		assert_eq!(scene.nodes[0].opacity, 1.0);
		let edge = &scene.edges[0];
		assert_eq!(edge.label, "connects");
		assert_eq!(
			edge.color,
			encoding::edge_color("Internet", "Users", "connects", ctx.theme())
		);
		assert!(matches!(edge.path, EdgePath::Line { .. }));
	}

	#[test]
	fn hover_emphasizes_node_and_incident_edges() {
		let mut ctx = context(
			&["a", "b", "c"],
			&[("a", "b", "ab"), ("b", "c", "bc"), ("c", "a", "ca")],
		);
		finish_entrance(&mut ctx);
		let b = ctx.simulation().unwrap().nodes()[1].clone();
		let (sx, sy) = ctx.viewport().transform().world_to_screen(b.x, b.y);
		ctx.dispatch(PointerEvent::Move { x: sx, y: sy });

		let scene = Scene::project(&ctx);
		let focused = scene.nodes.last().unwrap();
		assert_eq!(focused.label, "b");
		assert_eq!(focused.state, NodeState::Hovered);
		assert!(focused.radius > b.radius);

		let emphasized: Vec<_> = scene
			.edges
			.iter()
			.filter(|e| e.emphasized)
			.map(|e| e.label.as_str())
			.collect();
		assert_eq!(emphasized, ["ab", "bc"]);
		let ca = scene.edges.iter().find(|e| e.label == "ca").unwrap();
		assert!(ca.width < scene.edges[0].width);
		assert!(ca.opacity < scene.edges[0].opacity);

		let tooltip = scene.tooltip.unwrap();
		assert_eq!((tooltip.text.as_str(), tooltip.x, tooltip.y), ("b", sx, sy));
	}

	#[test]
	fn parallel_edges_bend_apart_and_self_loops_are_skipped() {
		let mut ctx = context(
			&["a", "b"],
			&[("a", "b", "to"), ("b", "a", "from"), ("a", "a", "self")],
		);
		finish_entrance(&mut ctx);
		let scene = Scene::project(&ctx);
		assert_eq!(scene.edges.len(), 2);
		let controls: Vec<_> = scene
			.edges
			.iter()
			.map(|e| match e.path {
				EdgePath::Quadratic { control, .. } => control,
				EdgePath::Line { .. } => panic!("parallel edge drawn straight"),
			})
			.collect();
		assert_ne!(controls[0], controls[1]);
		// Labels sit off the straight line, on opposite sides.
		assert_ne!(scene.edges[0].label_at, scene.edges[1].label_at);
	}

	#[test]
	fn entrance_staggers_in_input_order() {
		let ctx = context(&["first", "second", "third"], &[]);
		let scene = Scene::project(&ctx);
		assert!(scene.nodes.iter().all(|n| n.opacity == 0.0));

		let mut ctx = ctx;
		ctx.tick(100.0);
		let scene = Scene::project(&ctx);
		assert!(scene.nodes[0].opacity > scene.nodes[1].opacity);
		assert!(scene.nodes[1].opacity > scene.nodes[2].opacity);
	}

	#[test]
	fn entrance_progress_bounds() {
		let config = EntranceConfig::default();
		let mut entrance = Entrance::new();
		assert_eq!(entrance.node_progress(0, &config), 0.0);
		entrance.advance(10_000.0);
		assert_eq!(entrance.node_progress(5, &config), 1.0);
		assert!(entrance.is_finished(5, &config));
	}
}
