//! Pointer interaction state machine.
//!
//! Raw canvas events are funnelled through [`InteractionController::dispatch`],
//! which owns the hover, drag and pan state and applies the resulting
//! transitions to the simulation and viewport:
//!
//! ```text
//! idle ──enter──▶ hovered ──leave──▶ idle
//!   │                │
//!   └──down──▶ dragging ◀──down──┘
//!                  │
//!                  └──up/leave──▶ idle
//! ```
//!
//! Only one node can be dragged at a time; presses while a drag is active are
//! ignored.

use log::debug;

use super::simulation::Simulation;
use super::transform::{Transform, Viewport, ZoomGesture};

/// Pointer input in canvas screen coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
	Down { x: f64, y: f64 },
	Move { x: f64, y: f64 },
	Up,
	Leave,
	Wheel { x: f64, y: f64, delta_y: f64 },
}

/// Interaction state of a single node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
	Idle,
	Hovered,
	Dragging,
}

/// Transitions reported upward to the host.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionEvent {
	HoverStart(String),
	HoverEnd(String),
	DragStart(String),
	DragEnd(String),
	PanStart,
	PanEnd,
	Zoomed(Transform),
}

/// Text shown next to the pointer while a node is hovered.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
	pub text: String,
	/// Pointer position in screen space.
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Copy, Debug)]
struct PanState {
	last_x: f64,
	last_y: f64,
}

/// Owns the transient hover/drag/pan state for one canvas.
#[derive(Clone, Debug, Default)]
pub struct InteractionController {
	hovered: Option<usize>,
	dragging: Option<usize>,
	pan: Option<PanState>,
	pointer: Option<(f64, f64)>,
}

impl InteractionController {
	pub fn new() -> Self {
		Self::default()
	}

	/// Forget all transient state, e.g. when the graph is replaced.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn dragging(&self) -> Option<usize> {
		self.dragging
	}

	pub fn is_panning(&self) -> bool {
		self.pan.is_some()
	}

	pub fn node_state(&self, idx: usize) -> NodeState {
		if self.dragging == Some(idx) {
			NodeState::Dragging
		} else if self.hovered == Some(idx) {
			NodeState::Hovered
		} else {
			NodeState::Idle
		}
	}

	/// The node whose incident edges and radius are emphasized.
	pub fn focus(&self) -> Option<usize> {
		self.dragging.or(self.hovered)
	}

	pub fn tooltip(&self, sim: &Simulation) -> Option<Tooltip> {
		let idx = self.hovered?;
		let (x, y) = self.pointer?;
		let node = sim.node(idx)?;
		Some(Tooltip {
			text: node.id.clone(),
			x,
			y,
		})
	}

	/// CSS cursor matching the current state.
	pub fn cursor(&self) -> &'static str {
		if self.dragging.is_some() || self.pan.is_some() {
			"grabbing"
		} else if self.hovered.is_some() {
			"pointer"
		} else {
			"grab"
		}
	}

	/// Apply one pointer event. `sim` is `None` while no graph is loaded, in
	/// which case the viewport still pans and zooms.
	pub fn dispatch(
		&mut self,
		event: PointerEvent,
		mut sim: Option<&mut Simulation>,
		viewport: &mut Viewport,
	) -> Option<InteractionEvent> {
		let outcome = match event {
			PointerEvent::Down { x, y } => {
				self.pointer = Some((x, y));
				self.on_down(x, y, sim.as_deref_mut(), viewport)
			}
			PointerEvent::Move { x, y } => {
				self.pointer = Some((x, y));
				self.on_move(x, y, sim.as_deref_mut(), viewport)
			}
			PointerEvent::Up => self.on_up(sim.as_deref_mut()),
			PointerEvent::Leave => {
				self.pointer = None;
				self.on_leave(sim.as_deref_mut())
			}
			PointerEvent::Wheel { x, y, delta_y } => Some(InteractionEvent::Zoomed(
				viewport.on_zoom_gesture(ZoomGesture::Wheel { x, y, delta_y }),
			)),
		};
		if let Some(ref ev) = outcome {
			if !matches!(ev, InteractionEvent::Zoomed(_)) {
				debug!("mindmapr: {:?}", ev);
			}
		}
		outcome
	}

	fn on_down(
		&mut self,
		x: f64,
		y: f64,
		sim: Option<&mut Simulation>,
		viewport: &Viewport,
	) -> Option<InteractionEvent> {
		if self.dragging.is_some() || self.pan.is_some() {
			return None;
		}
		let (wx, wy) = viewport.transform().screen_to_world(x, y);
		let hit = sim.and_then(|sim| {
			let idx = sim.node_at(wx, wy)?;
			Some((idx, sim))
		});

		match hit {
			Some((idx, sim)) => {
				let config_target = sim.config().drag_alpha_target;
				let node = sim.node_mut(idx)?;
				node.fx = Some(node.x);
				node.fy = Some(node.y);
				let id = node.id.clone();
				sim.reheat(config_target);
				self.dragging = Some(idx);
				self.hovered = Some(idx);
				Some(InteractionEvent::DragStart(id))
			}
			None => {
				self.pan = Some(PanState {
					last_x: x,
					last_y: y,
				});
				Some(InteractionEvent::PanStart)
			}
		}
	}

	fn on_move(
		&mut self,
		x: f64,
		y: f64,
		sim: Option<&mut Simulation>,
		viewport: &mut Viewport,
	) -> Option<InteractionEvent> {
		if let Some(idx) = self.dragging {
			let (wx, wy) = viewport.transform().screen_to_world(x, y);
			if let Some(sim) = sim {
				sim.pin(idx, wx, wy);
			}
			return None;
		}

		if let Some(pan) = self.pan.as_mut() {
			let (dx, dy) = (x - pan.last_x, y - pan.last_y);
			pan.last_x = x;
			pan.last_y = y;
			return Some(InteractionEvent::Zoomed(
				viewport.on_zoom_gesture(ZoomGesture::Pan { dx, dy }),
			));
		}

		let sim = sim?;
		let (wx, wy) = viewport.transform().screen_to_world(x, y);
		let hit = sim.node_at(wx, wy);
		if hit == self.hovered {
			return None;
		}
		let previous = std::mem::replace(&mut self.hovered, hit);
		match (previous, hit) {
			(_, Some(idx)) => sim
				.node(idx)
				.map(|n| InteractionEvent::HoverStart(n.id.clone())),
			(Some(idx), None) => sim
				.node(idx)
				.map(|n| InteractionEvent::HoverEnd(n.id.clone())),
			(None, None) => None,
		}
	}

	fn on_up(&mut self, sim: Option<&mut Simulation>) -> Option<InteractionEvent> {
		if let Some(idx) = self.dragging.take() {
			self.hovered = None;
			let sim = sim?;
			sim.unpin(idx);
			sim.cool();
			return sim.node(idx).map(|n| InteractionEvent::DragEnd(n.id.clone()));
		}
		self.pan.take().map(|_| InteractionEvent::PanEnd)
	}

	fn on_leave(&mut self, sim: Option<&mut Simulation>) -> Option<InteractionEvent> {
		if self.dragging.is_some() {
			return self.on_up(sim);
		}
		if self.pan.take().is_some() {
			self.hovered = None;
			return Some(InteractionEvent::PanEnd);
		}
		let idx = self.hovered.take()?;
		sim?.node(idx)
			.map(|n| InteractionEvent::HoverEnd(n.id.clone()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mindmap::simulation::SimulationConfig;
	use crate::components::mindmap::transform::ZoomConfig;
	use crate::components::mindmap::types::{GraphData, GraphEdge, GraphNode};

	fn setup() -> (Simulation, Viewport, InteractionController) {
		let data = GraphData {
			nodes: vec![GraphNode::new("Internet"), GraphNode::new("Users")],
			edges: vec![GraphEdge::new("Internet", "Users", "connects")],
		};
		let mut sim =
			Simulation::initialize(&data, 800.0, 600.0, SimulationConfig::default()).unwrap();
		// Park the nodes at known spots.
		sim.pin(0, 100.0, 100.0);
		sim.pin(1, 300.0, 100.0);
		sim.step();
		sim.unpin(0);
		sim.unpin(1);
		(
			sim,
			Viewport::new(800.0, 600.0, ZoomConfig::default()),
			InteractionController::new(),
		)
	}

	#[test]
	fn hover_enter_and_leave() {
		let (mut sim, mut vp, mut ctl) = setup();
		let ev = ctl.dispatch(PointerEvent::Move { x: 105.0, y: 95.0 }, Some(&mut sim), &mut vp);
		assert_eq!(ev, Some(InteractionEvent::HoverStart("Internet".into())));
		assert_eq!(ctl.node_state(0), NodeState::Hovered);
		assert_eq!(ctl.cursor(), "pointer");

		let tip = ctl.tooltip(&sim).unwrap();
		assert_eq!((tip.text.as_str(), tip.x, tip.y), ("Internet", 105.0, 95.0));

		let ev = ctl.dispatch(PointerEvent::Move { x: 200.0, y: 400.0 }, Some(&mut sim), &mut vp);
		assert_eq!(ev, Some(InteractionEvent::HoverEnd("Internet".into())));
		assert_eq!(ctl.node_state(0), NodeState::Idle);
		assert!(ctl.tooltip(&sim).is_none());
	}

	#[test]
	fn hover_moves_directly_between_nodes() {
		let (mut sim, mut vp, mut ctl) = setup();
		ctl.dispatch(PointerEvent::Move { x: 100.0, y: 100.0 }, Some(&mut sim), &mut vp);
		let ev = ctl.dispatch(PointerEvent::Move { x: 300.0, y: 100.0 }, Some(&mut sim), &mut vp);
		assert_eq!(ev, Some(InteractionEvent::HoverStart("Users".into())));
		assert_eq!(ctl.hovered(), Some(1));
	}

	#[test]
	fn drag_pins_reheats_and_releases() {
		let (mut sim, mut vp, mut ctl) = setup();
		let (x0, y0) = (sim.nodes()[0].x, sim.nodes()[0].y);
		let ev = ctl.dispatch(PointerEvent::Down { x: 100.0, y: 100.0 }, Some(&mut sim), &mut vp);
		assert_eq!(ev, Some(InteractionEvent::DragStart("Internet".into())));
		assert_eq!(ctl.node_state(0), NodeState::Dragging);
		assert_eq!((sim.nodes()[0].fx, sim.nodes()[0].fy), (Some(x0), Some(y0)));
		assert_eq!(sim.alpha_target(), 0.3);
		assert!(sim.is_running());

		ctl.dispatch(PointerEvent::Move { x: 250.0, y: 220.0 }, Some(&mut sim), &mut vp);
		sim.step();
		assert_eq!((sim.nodes()[0].x, sim.nodes()[0].y), (250.0, 220.0));

		let ev = ctl.dispatch(PointerEvent::Up, Some(&mut sim), &mut vp);
		assert_eq!(ev, Some(InteractionEvent::DragEnd("Internet".into())));
		assert_eq!(sim.nodes()[0].fx, None);
		assert_eq!(sim.alpha_target(), 0.0);
		assert_eq!(ctl.node_state(0), NodeState::Idle);
	}

	#[test]
	fn drag_applies_inverse_transform() {
		let (mut sim, mut vp, mut ctl) = setup();
		// Zoom to k = 2 around the origin.
		vp.on_programmatic_zoom(2.0, 0.0);
		vp.on_zoom_gesture(ZoomGesture::Pan {
			dx: -vp.transform().x,
			dy: -vp.transform().y,
		});
		assert_eq!(vp.transform(), Transform { x: 0.0, y: 0.0, k: 2.0 });

		ctl.dispatch(PointerEvent::Down { x: 200.0, y: 200.0 }, Some(&mut sim), &mut vp);
		assert_eq!(ctl.dragging(), Some(0));
		ctl.dispatch(PointerEvent::Move { x: 400.0, y: 300.0 }, Some(&mut sim), &mut vp);
		assert_eq!(sim.nodes()[0].fx, Some(200.0));
		assert_eq!(sim.nodes()[0].fy, Some(150.0));
	}

	#[test]
	fn second_press_during_drag_is_ignored() {
		let (mut sim, mut vp, mut ctl) = setup();
		ctl.dispatch(PointerEvent::Down { x: 100.0, y: 100.0 }, Some(&mut sim), &mut vp);
		let ev = ctl.dispatch(PointerEvent::Down { x: 300.0, y: 100.0 }, Some(&mut sim), &mut vp);
		assert_eq!(ev, None);
		assert_eq!(ctl.dragging(), Some(0));
		assert!(!sim.nodes()[1].is_pinned());
	}

	#[test]
	fn background_drag_pans() {
		let (mut sim, mut vp, mut ctl) = setup();
		let ev = ctl.dispatch(PointerEvent::Down { x: 500.0, y: 500.0 }, Some(&mut sim), &mut vp);
		assert_eq!(ev, Some(InteractionEvent::PanStart));
		assert_eq!(ctl.cursor(), "grabbing");
		ctl.dispatch(PointerEvent::Move { x: 520.0, y: 490.0 }, Some(&mut sim), &mut vp);
		ctl.dispatch(PointerEvent::Move { x: 530.0, y: 480.0 }, Some(&mut sim), &mut vp);
		assert_eq!((vp.transform().x, vp.transform().y), (30.0, -20.0));
		let ev = ctl.dispatch(PointerEvent::Up, Some(&mut sim), &mut vp);
		assert_eq!(ev, Some(InteractionEvent::PanEnd));
		assert_eq!(sim.nodes()[0].x, 100.0);
	}

	#[test]
	fn leave_ends_drag_and_hover() {
		let (mut sim, mut vp, mut ctl) = setup();
		ctl.dispatch(PointerEvent::Down { x: 100.0, y: 100.0 }, Some(&mut sim), &mut vp);
		let ev = ctl.dispatch(PointerEvent::Leave, Some(&mut sim), &mut vp);
		assert_eq!(ev, Some(InteractionEvent::DragEnd("Internet".into())));
		assert!(!sim.nodes()[0].is_pinned());
		assert_eq!(ctl.focus(), None);
		assert_eq!(ctl.cursor(), "grab");
	}

	#[test]
	fn wheel_zooms_without_graph() {
		let mut vp = Viewport::new(800.0, 600.0, ZoomConfig::default());
		let mut ctl = InteractionController::new();
		let ev = ctl.dispatch(
			PointerEvent::Wheel {
				x: 0.0,
				y: 0.0,
				delta_y: -1.0,
			},
			None,
			&mut vp,
		);
		assert!(matches!(ev, Some(InteractionEvent::Zoomed(t)) if t.k > 1.0));
		assert_eq!(
			ctl.dispatch(PointerEvent::Move { x: 1.0, y: 1.0 }, None, &mut vp),
			None
		);
	}
}
