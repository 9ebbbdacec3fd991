//! mindmapr: interactive force-directed mindmaps for generated concept graphs.
//!
//! The crate turns a `{nodes, edges}` graph into a canvas-rendered mindmap
//! with physics-based layout, dragging, pan/zoom and hover emphasis. The
//! [`App`] page wraps it with a text input that requests graphs from a
//! generation service and caches the last result in localStorage.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod api;
pub mod components;
pub mod storage;

pub use components::mindmap::{
	GraphData, GraphEdge, GraphNode, InteractionEvent, MindmapCanvas, MindmapConfig,
	MindmapContext, MindmapError, MindmapHandle, PointerEvent, Scene, Simulation,
	SimulationConfig, Theme, Transform, Viewport, ZoomConfig,
};

use storage::MindmapCache;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("mindmapr: logging initialized");
}

/// Page-level configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
	/// Generation service URL.
	pub endpoint: String,
	pub mindmap: MindmapConfig,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			endpoint: api::DEFAULT_ENDPOINT.to_string(),
			mindmap: MindmapConfig::default(),
		}
	}
}

/// Load configuration from a script element with id="mindmap-config".
/// Missing fields keep their defaults.
fn load_config() -> Option<AppConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("mindmap-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<AppConfig>(&json_text) {
		Ok(config) => {
			info!("mindmapr: loaded config, endpoint {}", config.endpoint);
			Some(config)
		}
		Err(e) => {
			warn!("mindmapr: failed to parse config: {}", e);
			None
		}
	}
}

fn summary(graph: &GraphData) -> String {
	format!("{} concepts, {} links", graph.nodes.len(), graph.edges.len())
}

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();
	let cache = Rc::new(RefCell::new(MindmapCache::browser_or_memory()));
	let restored = cache.borrow_mut().restore();
	let handle = MindmapHandle::new();

	let (text, set_text) = signal(restored.text.clone());
	let status = RwSignal::new(match &restored.graph {
		Some(graph) => format!("Restored {}", summary(graph)),
		None => "Enter some text and press Generate.".to_string(),
	});
	let hovered = RwSignal::new(String::new());
	let busy = RwSignal::new(false);

	let on_generate = {
		let (handle, cache, endpoint) = (handle.clone(), cache.clone(), config.endpoint.clone());
		move |_| {
			if busy.get_untracked() {
				return;
			}
			let input = text.get_untracked();
			let (handle, cache, endpoint) = (handle.clone(), cache.clone(), endpoint.clone());
			busy.set(true);
			status.set("Generating mindmap...".to_string());
			spawn_local(async move {
				match api::generate(&endpoint, &input).await {
					Ok(graph) => match handle.render_graph(&graph) {
						Ok(()) => {
							if let Err(e) = cache.borrow_mut().save(&input, &graph) {
								warn!("mindmapr: could not cache mindmap: {}", e);
							}
							status.set(summary(&graph));
						}
						Err(e) => status.set(format!("Cannot draw mindmap: {}", e)),
					},
					Err(e) => {
						warn!("mindmapr: generation failed: {}", e);
						status.set(format!("Generation failed: {}", e));
					}
				}
				busy.set(false);
			});
		}
	};

	let on_clear = {
		let (handle, cache) = (handle.clone(), cache.clone());
		move |_| {
			let _ = handle.clear_graph();
			cache.borrow_mut().clear();
			set_text.set(String::new());
			hovered.set(String::new());
			status.set("Cleared.".to_string());
		}
	};

	let zoom_in = {
		let handle = handle.clone();
		move |_| {
			let _ = handle.zoom_in();
		}
	};
	let zoom_out = {
		let handle = handle.clone();
		move |_| {
			let _ = handle.zoom_out();
		}
	};
	let reset_view = {
		let handle = handle.clone();
		move |_| {
			let _ = handle.reset_view();
		}
	};

	let on_event = Callback::new(move |event: InteractionEvent| match event {
		InteractionEvent::HoverStart(id) | InteractionEvent::DragStart(id) => hovered.set(id),
		InteractionEvent::HoverEnd(_) | InteractionEvent::DragEnd(_) => hovered.set(String::new()),
		_ => {}
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="MindMapr" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="mindmapr">
			<section class="input-panel">
				<h1>"MindMapr"</h1>
				<textarea
					rows="6"
					placeholder="Paste a paragraph to turn into a mindmap"
					prop:value=move || text.get()
					on:input=move |ev| set_text.set(event_target_value(&ev))
				/>
				<div class="toolbar">
					<button on:click=on_generate disabled=move || busy.get()>"Generate"</button>
					<button on:click=on_clear>"Clear"</button>
					<button on:click=zoom_in title="Zoom in">"+"</button>
					<button on:click=zoom_out title="Zoom out">"-"</button>
					<button on:click=reset_view title="Reset view">"Reset"</button>
				</div>
				<p class="status">{move || status.get()}</p>
				<p class="hover-info">{move || hovered.get()}</p>
			</section>
			<div class="graph-container" style="width: 100%; height: 70vh;">
				<MindmapCanvas
					handle=handle
					initial=restored.graph
					config=Some(config.mindmap)
					on_event=Some(on_event)
				/>
			</div>
		</main>
	}
}
