//! Mindmap context and the handle used by the page to drive it.
//!
//! [`MindmapContext`] owns every piece of mutable scene state: the running
//! simulation, the viewport transform, hover/drag tracking and the entrance
//! animation. The animation loop ticks it once per frame and DOM handlers
//! reach it only through a [`MindmapHandle`], so all mutation happens on the
//! single UI thread between frames.

use std::cell::RefCell;
use std::rc::Rc;

use log::{error, info, warn};
use serde::Deserialize;

use super::error::MindmapError;
use super::interaction::{InteractionController, InteractionEvent, PointerEvent};
use super::scene::{EmphasisConfig, Entrance, EntranceConfig, Scene};
use super::simulation::{Simulation, SimulationConfig};
use super::theme::Theme;
use super::transform::{Viewport, ZoomConfig};
use super::types::GraphData;

/// Tunables for the whole mindmap, deserializable from page config.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct MindmapConfig {
	pub simulation: SimulationConfig,
	pub zoom: ZoomConfig,
	pub entrance: EntranceConfig,
	pub emphasis: EmphasisConfig,
	/// Theme preset name (see [`Theme::by_name`]).
	pub theme: String,
}

/// All scene state for one canvas.
pub struct MindmapContext {
	simulation: Option<Simulation>,
	viewport: Viewport,
	interaction: InteractionController,
	entrance: Entrance,
	config: MindmapConfig,
	theme: Theme,
	width: f64,
	height: f64,
}

impl MindmapContext {
	pub fn new(width: f64, height: f64, config: MindmapConfig) -> Self {
		Self {
			simulation: None,
			viewport: Viewport::new(width, height, config.zoom.clone()),
			interaction: InteractionController::new(),
			entrance: Entrance::new(),
			theme: Theme::by_name(&config.theme),
			config,
			width,
			height,
		}
	}

	/// Replace the current graph.
	///
	/// The new layout is fully built before anything is torn down, so a
	/// rejected graph leaves the previous scene, transform and hover state
	/// untouched.
	pub fn render_graph(&mut self, data: &GraphData) -> Result<(), MindmapError> {
		let simulation = Simulation::initialize(
			data,
			self.width,
			self.height,
			self.config.simulation.clone(),
		)
		.inspect_err(|e| warn!("mindmapr: rejected graph: {}", e))?;

		if let Some(mut previous) = self.simulation.take() {
			previous.stop();
		}
		self.interaction.reset();
		self.entrance = Entrance::new();
		self.viewport.reset_transform(0.0);
		self.simulation = Some(simulation);

		info!(
			"mindmapr: rendering {} nodes, {} edges",
			data.nodes.len(),
			data.edges.len()
		);
		Ok(())
	}

	/// Drop the current graph. Returns `false` if there was nothing to clear.
	pub fn clear_graph(&mut self) -> bool {
		let Some(mut previous) = self.simulation.take() else {
			return false;
		};
		previous.stop();
		self.interaction.reset();
		self.entrance = Entrance::new();
		info!("mindmapr: cleared graph");
		true
	}

	pub fn zoom_in(&mut self) {
		let zoom = self.viewport.config().clone();
		self.viewport
			.on_programmatic_zoom(zoom.button_factor, zoom.duration_ms);
	}

	pub fn zoom_out(&mut self) {
		let zoom = self.viewport.config().clone();
		self.viewport
			.on_programmatic_zoom(1.0 / zoom.button_factor, zoom.duration_ms);
	}

	pub fn reset_view(&mut self) {
		let duration = self.viewport.config().duration_ms;
		self.viewport.reset_transform(duration);
	}

	/// Route a pointer event through the interaction state machine.
	pub fn dispatch(&mut self, event: PointerEvent) -> Option<InteractionEvent> {
		self.interaction
			.dispatch(event, self.simulation.as_mut(), &mut self.viewport)
	}

	/// Advance one frame: a simulation step, any zoom animation, and the
	/// entrance fade. Returns `true` if anything visible changed.
	pub fn tick(&mut self, dt_ms: f64) -> bool {
		let stepped = self.simulation.as_mut().is_some_and(Simulation::step);
		let zoomed = self.viewport.tick(dt_ms);
		let node_count = self.simulation.as_ref().map_or(0, |s| s.nodes().len());
		let entering = !self.entrance.is_finished(node_count, &self.config.entrance);
		self.entrance.advance(dt_ms);
		stepped || zoomed || entering
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.viewport.resize(width, height);
		if let Some(sim) = self.simulation.as_mut() {
			sim.recenter(width, height);
			sim.restart(sim.alpha().max(0.1));
		}
	}

	pub fn scene(&self) -> Scene {
		Scene::project(self)
	}

	pub fn has_graph(&self) -> bool {
		self.simulation.is_some()
	}

	pub fn simulation(&self) -> Option<&Simulation> {
		self.simulation.as_ref()
	}

	pub fn simulation_mut(&mut self) -> Option<&mut Simulation> {
		self.simulation.as_mut()
	}

	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	pub fn viewport_mut(&mut self) -> &mut Viewport {
		&mut self.viewport
	}

	pub fn interaction(&self) -> &InteractionController {
		&self.interaction
	}

	pub fn entrance(&self) -> &Entrance {
		&self.entrance
	}

	pub fn config(&self) -> &MindmapConfig {
		&self.config
	}

	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}
}

/// Shared, cloneable access to the context behind a mounted canvas.
///
/// Before the canvas mounts (or after it is torn down) every operation fails
/// with [`MindmapError::MissingRenderTarget`] and changes nothing.
#[derive(Clone, Default)]
pub struct MindmapHandle {
	inner: Rc<RefCell<Option<MindmapContext>>>,
}

impl MindmapHandle {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn is_attached(&self) -> bool {
		self.inner.borrow().is_some()
	}

	/// Install the context for a freshly mounted canvas.
	pub fn attach(&self, context: MindmapContext) {
		*self.inner.borrow_mut() = Some(context);
	}

	/// Tear down the context, stopping any running layout.
	pub fn detach(&self) {
		if let Some(mut context) = self.inner.borrow_mut().take() {
			context.clear_graph();
		}
	}

	/// Run `f` against the attached context.
	pub fn with<R>(&self, f: impl FnOnce(&mut MindmapContext) -> R) -> Result<R, MindmapError> {
		let mut guard = self.inner.borrow_mut();
		match guard.as_mut() {
			Some(context) => Ok(f(context)),
			None => {
				error!("mindmapr: {}", MindmapError::MissingRenderTarget);
				Err(MindmapError::MissingRenderTarget)
			}
		}
	}

	pub fn render_graph(&self, data: &GraphData) -> Result<(), MindmapError> {
		self.with(|c| c.render_graph(data))?
	}

	pub fn clear_graph(&self) -> Result<(), MindmapError> {
		self.with(|c| {
			c.clear_graph();
		})
	}

	pub fn zoom_in(&self) -> Result<(), MindmapError> {
		self.with(MindmapContext::zoom_in)
	}

	pub fn zoom_out(&self) -> Result<(), MindmapError> {
		self.with(MindmapContext::zoom_out)
	}

	pub fn reset_view(&self) -> Result<(), MindmapError> {
		self.with(MindmapContext::reset_view)
	}
}
