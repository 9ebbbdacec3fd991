//! Force-directed layout simulation.
//!
//! Nodes are advanced by velocity relaxation under four forces applied in
//! order each tick: link springs, pairwise charge repulsion, radius-aware
//! collision, and a weak per-axis pull toward the viewport center. Every force
//! except collision is scaled by `alpha`, a temperature that decays
//! geometrically toward `alpha_target` until it drops below `alpha_min` and the
//! layout is considered settled.
//!
//! Pinned axes (`fx`/`fy`) skip integration and are held exactly at the pin.

use std::f64::consts::PI;

use log::debug;
use serde::Deserialize;

use super::encoding;
use super::error::MindmapError;
use super::types::GraphData;

/// Physics tuning. Defaults give a readable spread for mindmaps of a few dozen nodes.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Rest length of link springs.
	pub link_distance: f64,
	/// Spring stiffness.
	pub link_strength: f64,
	/// Pairwise charge; negative values repel.
	pub charge_strength: f64,
	/// Pairs further apart than this do not interact.
	pub charge_distance_max: f64,
	/// Shorter separations are softened to avoid singular forces.
	pub charge_distance_min: f64,
	/// Extra clearance added to each rendered radius for collisions.
	pub collide_padding: f64,
	pub collide_strength: f64,
	/// Strength of the per-axis pull toward the viewport center.
	pub center_strength: f64,
	pub alpha_min: f64,
	/// Number of ticks for alpha to decay from 1 to `alpha_min`.
	pub decay_steps: u32,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			link_distance: 150.0,
			link_strength: 0.8,
			charge_strength: -400.0,
			charge_distance_max: 300.0,
			charge_distance_min: 1.0,
			collide_padding: 8.0,
			collide_strength: 0.7,
			center_strength: 0.1,
			alpha_min: 0.001,
			decay_steps: 300,
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}
}

impl SimulationConfig {
	pub fn alpha_decay(&self) -> f64 {
		1.0 - self.alpha_min.powf(1.0 / self.decay_steps.max(1) as f64)
	}
}

/// A node as seen by the physics solver.
#[derive(Clone, Debug)]
pub struct SimNode {
	pub id: String,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned x; `None` means the axis is free.
	pub fx: Option<f64>,
	/// Pinned y; `None` means the axis is free.
	pub fy: Option<f64>,
	/// Rendered radius, used for collision and hit testing.
	pub radius: f64,
}

impl SimNode {
	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// An edge with endpoints resolved to node indices.
#[derive(Clone, Debug)]
pub struct SimEdge {
	pub source: usize,
	pub target: usize,
	pub label: String,
}

impl SimEdge {
	pub fn is_self_loop(&self) -> bool {
		self.source == self.target
	}

	pub fn touches(&self, idx: usize) -> bool {
		self.source == idx || self.target == idx
	}
}

/// Linear congruential generator for the sub-pixel jiggle that separates
/// coincident nodes. Deterministic so layouts are repeatable within a build.
#[derive(Clone, Debug)]
struct Lcg(u32);

impl Lcg {
	fn next(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
		self.0 as f64 / 4_294_967_296.0
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// Running layout for one graph.
pub struct Simulation {
	nodes: Vec<SimNode>,
	edges: Vec<SimEdge>,
	/// Share of each link's correction applied to the target, by degree.
	link_bias: Vec<f64>,
	config: SimulationConfig,
	alpha: f64,
	alpha_target: f64,
	alpha_decay: f64,
	center: (f64, f64),
	running: bool,
	ticks: u64,
	rng: Lcg,
}

impl Simulation {
	/// Resolve the graph and seed node positions around the viewport center.
	///
	/// Fails without side effects if an edge references an unknown node or if
	/// two nodes share an id.
	pub fn initialize(
		data: &GraphData,
		width: f64,
		height: f64,
		config: SimulationConfig,
	) -> Result<Self, MindmapError> {
		let edges = data
			.resolve_edges()?
			.into_iter()
			.zip(&data.edges)
			.map(|((source, target), edge)| SimEdge {
				source,
				target,
				label: edge.label.clone(),
			})
			.collect::<Vec<_>>();

		let center = (width / 2.0, height / 2.0);
		let nodes = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let (x, y) = phyllotaxis(i, center);
				SimNode {
					id: node.id.clone(),
					x,
					y,
					vx: 0.0,
					vy: 0.0,
					fx: None,
					fy: None,
					radius: encoding::radius(&node.id),
				}
			})
			.collect::<Vec<_>>();

		let mut degree = vec![0usize; nodes.len()];
		for edge in edges.iter().filter(|e| !e.is_self_loop()) {
			degree[edge.source] += 1;
			degree[edge.target] += 1;
		}
		let link_bias = edges
			.iter()
			.map(|e| {
				let (s, t) = (degree[e.source] as f64, degree[e.target] as f64);
				if s + t > 0.0 { s / (s + t) } else { 0.5 }
			})
			.collect();

		Ok(Self {
			nodes,
			edges,
			link_bias,
			alpha_decay: config.alpha_decay(),
			config,
			alpha: 1.0,
			alpha_target: 0.0,
			center,
			running: true,
			ticks: 0,
			rng: Lcg(1),
		})
	}

	/// Advance one tick if the layout is still active.
	///
	/// Returns `true` when positions were updated.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.config.alpha_min {
			self.running = false;
			debug!(
				"mindmapr: layout settled after {} ticks ({} nodes)",
				self.ticks,
				self.nodes.len()
			);
		}
		true
	}

	/// Raise the alpha target to `strength` and resume stepping.
	pub fn reheat(&mut self, strength: f64) {
		self.alpha_target = strength.max(0.0);
		self.running = true;
	}

	/// Let alpha decay back toward zero without stopping immediately.
	pub fn cool(&mut self) {
		self.alpha_target = 0.0;
	}

	/// Reset alpha directly and resume stepping.
	pub fn restart(&mut self, alpha: f64) {
		self.alpha = alpha.max(0.0);
		self.running = true;
	}

	/// Halt stepping; positions stay where they are.
	pub fn stop(&mut self) {
		self.running = false;
		self.alpha_target = 0.0;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn config(&self) -> &SimulationConfig {
		&self.config
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[SimEdge] {
		&self.edges
	}

	pub fn node(&self, idx: usize) -> Option<&SimNode> {
		self.nodes.get(idx)
	}

	pub fn node_mut(&mut self, idx: usize) -> Option<&mut SimNode> {
		self.nodes.get_mut(idx)
	}

	/// Pin a node at a world position on both axes.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
		}
	}

	/// Release both axes of a node back to the physics.
	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
	}

	/// Topmost node whose rendered circle contains the world point.
	///
	/// Later nodes are drawn on top, so they win ties.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		self.nodes.iter().rposition(|node| {
			let (dx, dy) = (node.x - x, node.y - y);
			dx * dx + dy * dy <= node.radius * node.radius
		})
	}

	/// Move the center anchor, e.g. after the canvas is resized.
	pub fn recenter(&mut self, width: f64, height: f64) {
		self.center = (width / 2.0, height / 2.0);
	}

	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		self.ticks += 1;

		self.apply_links();
		self.apply_charge();
		self.apply_collision();
		self.apply_center();

		let keep = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}

	fn apply_links(&mut self) {
		let scale = self.alpha * self.config.link_strength;
		for (edge, &bias) in self.edges.iter().zip(&self.link_bias) {
			if edge.is_self_loop() {
				continue;
			}
			let (s, t) = (&self.nodes[edge.source], &self.nodes[edge.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 {
				x = self.rng.jiggle();
			}
			if y == 0.0 {
				y = self.rng.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			let f = (l - self.config.link_distance) / l * scale;
			let (x, y) = (x * f, y * f);

			let target = &mut self.nodes[edge.target];
			target.vx -= x * bias;
			target.vy -= y * bias;
			let source = &mut self.nodes[edge.source];
			source.vx += x * (1.0 - bias);
			source.vy += y * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.config.charge_strength * self.alpha;
		let max2 = self.config.charge_distance_max.powi(2);
		let min2 = self.config.charge_distance_min.powi(2);
		let n = self.nodes.len();

		for i in 0..n {
			for j in (i + 1)..n {
				let mut x = self.nodes[j].x - self.nodes[i].x;
				let mut y = self.nodes[j].y - self.nodes[i].y;
				let mut l = x * x + y * y;
				if l >= max2 {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				if l < min2 {
					l = (min2 * l).sqrt();
				}
				let w = strength / l;
				self.nodes[i].vx += x * w;
				self.nodes[i].vy += y * w;
				self.nodes[j].vx -= x * w;
				self.nodes[j].vy -= y * w;
			}
		}
	}

	fn apply_collision(&mut self) {
		let padding = self.config.collide_padding;
		let strength = self.config.collide_strength;
		let n = self.nodes.len();

		for i in 0..n {
			let ri = self.nodes[i].radius + padding;
			let ri2 = ri * ri;
			let xi = self.nodes[i].x + self.nodes[i].vx;
			let yi = self.nodes[i].y + self.nodes[i].vy;
			for j in (i + 1)..n {
				let rj = self.nodes[j].radius + padding;
				let r = ri + rj;
				let mut x = xi - self.nodes[j].x - self.nodes[j].vx;
				let mut y = yi - self.nodes[j].y - self.nodes[j].vy;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = self.rng.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = self.rng.jiggle();
					l += y * y;
				}
				let d = l.sqrt();
				let f = (r - d) / d * strength;
				let (x, y) = (x * f, y * f);
				let share = rj * rj / (ri2 + rj * rj);
				self.nodes[i].vx += x * share;
				self.nodes[i].vy += y * share;
				self.nodes[j].vx -= x * (1.0 - share);
				self.nodes[j].vy -= y * (1.0 - share);
			}
		}
	}

	fn apply_center(&mut self) {
		let k = self.config.center_strength * self.alpha;
		let (cx, cy) = self.center;
		for node in &mut self.nodes {
			node.vx += (cx - node.x) * k;
			node.vy += (cy - node.y) * k;
		}
	}
}

/// Sunflower spiral around `center`, spreading nodes without overlap.
fn phyllotaxis(i: usize, center: (f64, f64)) -> (f64, f64) {
	const INITIAL_RADIUS: f64 = 10.0;
	let golden_angle = PI * (3.0 - 5f64.sqrt());
	let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
	let angle = i as f64 * golden_angle;
	(center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mindmap::types::{GraphEdge, GraphNode};

	fn graph(nodes: &[&str], edges: &[(&str, &str, &str)]) -> GraphData {
		GraphData {
			nodes: nodes.iter().map(|id| GraphNode::new(*id)).collect(),
			edges: edges
				.iter()
				.map(|(s, t, l)| GraphEdge::new(*s, *t, *l))
				.collect(),
		}
	}

	fn settle(sim: &mut Simulation) -> usize {
		let mut steps = 0;
		while sim.step() {
			steps += 1;
			assert!(steps < 10_000, "simulation never settled");
		}
		steps
	}

	fn distance(sim: &Simulation, a: usize, b: usize) -> f64 {
		let (a, b) = (&sim.nodes()[a], &sim.nodes()[b]);
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn rejects_unknown_endpoint() {
		let data = graph(&["A"], &[("A", "Z", "")]);
		let err = Simulation::initialize(&data, 800.0, 600.0, Default::default())
			.err()
			.unwrap();
		assert!(matches!(err, MindmapError::UnknownNode { edge: 0, ref id } if id == "Z"));
	}

	#[test]
	fn rejects_duplicate_ids() {
		let data = graph(&["A", "A"], &[]);
		assert!(matches!(
			Simulation::initialize(&data, 800.0, 600.0, Default::default()),
			Err(MindmapError::DuplicateNode(_))
		));
	}

	#[test]
	fn alpha_decays_below_threshold() {
		let data = graph(&["a", "b", "c"], &[("a", "b", "x")]);
		let mut sim = Simulation::initialize(&data, 800.0, 600.0, Default::default()).unwrap();
		let steps = settle(&mut sim);
		assert!(sim.alpha() < 0.001);
		assert!((290..=310).contains(&steps), "settled after {steps}");
		assert!(!sim.step());
	}

	#[test]
	fn linked_pair_converges_near_link_distance() {
		let data = graph(&["Internet", "Users"], &[("Internet", "Users", "connects")]);
		let mut sim = Simulation::initialize(&data, 800.0, 600.0, Default::default()).unwrap();
		settle(&mut sim);
		let d = distance(&sim, 0, 1);
		assert!((100.0..200.0).contains(&d), "distance {d}");
	}

	#[test]
	fn edgeless_graph_forms_centered_cloud() {
		let data = graph(&["a", "b", "c", "d", "e"], &[]);
		let mut sim = Simulation::initialize(&data, 800.0, 600.0, Default::default()).unwrap();
		settle(&mut sim);
		let n = sim.nodes().len() as f64;
		let cx = sim.nodes().iter().map(|n| n.x).sum::<f64>() / n;
		let cy = sim.nodes().iter().map(|n| n.y).sum::<f64>() / n;
		assert!((cx - 400.0).abs() < 20.0 && (cy - 300.0).abs() < 20.0);
		for i in 0..5 {
			for j in (i + 1)..5 {
				let d = distance(&sim, i, j);
				assert!(d.is_finite() && d > 40.0, "nodes {i},{j} at {d}");
			}
		}
	}

	#[test]
	fn self_loop_is_harmless() {
		let data = graph(&["solo"], &[("solo", "solo", "self")]);
		let mut sim = Simulation::initialize(&data, 800.0, 600.0, Default::default()).unwrap();
		settle(&mut sim);
		let node = &sim.nodes()[0];
		assert!(node.x.is_finite() && node.y.is_finite());
		assert!((node.x - 400.0).abs() < 10.0);
	}

	#[test]
	fn pinned_node_holds_position_exactly() {
		let data = graph(&["a", "b"], &[("a", "b", "")]);
		let mut sim = Simulation::initialize(&data, 800.0, 600.0, Default::default()).unwrap();
		sim.pin(0, 512.25, -37.5);
		for _ in 0..20 {
			sim.step();
			assert_eq!(sim.nodes()[0].x, 512.25);
			assert_eq!(sim.nodes()[0].y, -37.5);
		}
	}

	#[test]
	fn unpinned_node_moves_again() {
		let data = graph(&["a", "b"], &[("a", "b", "")]);
		let mut sim = Simulation::initialize(&data, 800.0, 600.0, Default::default()).unwrap();
		sim.pin(0, 700.0, 550.0);
		sim.step();
		sim.unpin(0);
		let before = (sim.nodes()[0].x, sim.nodes()[0].y);
		sim.step();
		assert_ne!((sim.nodes()[0].x, sim.nodes()[0].y), before);
	}

	#[test]
	fn reheat_restarts_and_cool_decays() {
		let data = graph(&["a", "b"], &[("a", "b", "")]);
		let mut sim = Simulation::initialize(&data, 800.0, 600.0, Default::default()).unwrap();
		settle(&mut sim);

		sim.reheat(0.3);
		assert!(sim.is_running());
		for _ in 0..200 {
			sim.step();
		}
		assert!(sim.alpha() > 0.2);

		sim.cool();
		assert!(sim.step());
		assert!(sim.is_running());
		settle(&mut sim);
		assert!(sim.alpha() < 0.001);
	}

	#[test]
	fn stop_halts_stepping() {
		let data = graph(&["a"], &[]);
		let mut sim = Simulation::initialize(&data, 800.0, 600.0, Default::default()).unwrap();
		sim.stop();
		assert!(!sim.step());
	}

	#[test]
	fn hit_testing_uses_rendered_radius() {
		let data = graph(&["Internet"], &[]);
		let mut sim = Simulation::initialize(&data, 800.0, 600.0, Default::default()).unwrap();
		sim.pin(0, 100.0, 100.0);
		sim.step();
		assert_eq!(sim.node_at(130.0, 100.0), Some(0));
		assert_eq!(sim.node_at(132.0, 100.0), None);
	}

	#[test]
	fn empty_graph_steps_quietly() {
		let mut sim =
			Simulation::initialize(&GraphData::default(), 800.0, 600.0, Default::default())
				.unwrap();
		assert!(sim.step());
		assert!(sim.nodes().is_empty());
	}
}
