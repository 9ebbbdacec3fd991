//! Leptos component wrapping the mindmap canvas.
//!
//! The component creates an HTML canvas element, attaches a
//! [`MindmapContext`] to the caller's [`MindmapHandle`], and wires mouse/wheel
//! events into the interaction state machine. An animation loop runs via
//! `requestAnimationFrame`, ticking the context and painting one scene per
//! frame until the canvas leaves the document.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::error::MindmapError;
use super::interaction::{InteractionEvent, PointerEvent};
use super::render;
use super::state::{MindmapConfig, MindmapContext, MindmapHandle};
use super::types::GraphData;

/// Fixed frame step handed to the simulation.
const FRAME_MS: f64 = 16.0;

type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Unregister the resize listener and release both loop closures.
///
/// Called from inside the frame callback; wasm-bindgen defers freeing a
/// closure that is still on the stack.
fn teardown(animate: &SharedClosure, resize: &SharedClosure) {
	let resize_cb = resize.borrow_mut().take();
	if let (Some(cb), Some(window)) = (resize_cb, web_sys::window()) {
		if let Err(e) =
			window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
		{
			warn!("mindmapr: could not remove resize listener: {:?}", e);
		}
	}
	let frame_cb = animate.borrow_mut().take();
	drop(frame_cb);
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, MindmapError> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
		.ok_or(MindmapError::MissingRenderTarget)
}

/// Renders an interactive mindmap on a canvas element.
///
/// The component attaches its scene state to `handle`, through which the page
/// renders graphs, clears them, and drives the zoom toolbar. An optional
/// `initial` graph (e.g. restored from the cache) is rendered on mount.
/// Interaction transitions are reported through `on_event`.
///
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the viewport and resize with the window.
/// Explicit `width`/`height` override automatic sizing.
#[component]
pub fn MindmapCanvas(
	handle: MindmapHandle,
	#[prop(default = None)] initial: Option<GraphData>,
	#[prop(default = None)] config: Option<MindmapConfig>,
	#[prop(default = None)] on_event: Option<Callback<InteractionEvent>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));
	let (handle_init, animate_init, resize_cb_init) =
		(handle.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if handle_init.is_attached() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas;
		let Some(window) = web_sys::window() else {
			error!("mindmapr: no window available");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx = match context_2d(&canvas) {
			Ok(ctx) => ctx,
			Err(e) => {
				error!("mindmapr: {}", e);
				return;
			}
		};

		handle_init.attach(MindmapContext::new(
			w,
			h,
			config.clone().unwrap_or_default(),
		));
		if let Some(data) = initial.as_ref() {
			// Rejections are logged by render_graph.
			let _ = handle_init.render_graph(data);
		}

		if fullscreen {
			let (handle_resize, canvas_resize) = (handle_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				let _ = handle_resize.with(|c| c.resize(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (handle_anim, animate_inner, resize_inner, canvas_anim) = (
			handle_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			canvas.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !canvas_anim.is_connected() {
				debug!("mindmapr: canvas detached, stopping animation loop");
				handle_anim.detach();
				teardown(&animate_inner, &resize_inner);
				return;
			}
			let _ = handle_anim.with(|c| {
				c.tick(FRAME_MS);
				render::paint(&c.scene(), &ctx, c.theme());
			});
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	// Forward one pointer event and update the cursor to match.
	let dispatch = {
		let handle = handle.clone();
		move |event: PointerEvent| {
			let Ok((outcome, cursor)) =
				handle.with(|c| (c.dispatch(event), c.interaction().cursor()))
			else {
				return;
			};
			if let Some(canvas) = canvas_ref.get() {
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
			}
			if let (Some(ev), Some(cb)) = (outcome, on_event.as_ref()) {
				cb.run(ev);
			}
		}
	};

	let on_mousedown = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| {
			if let Some(canvas) = canvas_ref.get() {
				let (x, y) = canvas_point(&canvas, &ev);
				dispatch(PointerEvent::Down { x, y });
			}
		}
	};

	let on_mousemove = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| {
			if let Some(canvas) = canvas_ref.get() {
				let (x, y) = canvas_point(&canvas, &ev);
				dispatch(PointerEvent::Move { x, y });
			}
		}
	};

	let on_mouseup = {
		let dispatch = dispatch.clone();
		move |_: MouseEvent| dispatch(PointerEvent::Up)
	};

	let on_mouseleave = {
		let dispatch = dispatch.clone();
		move |_: MouseEvent| dispatch(PointerEvent::Leave)
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some(canvas) = canvas_ref.get() {
			let (x, y) = canvas_point(&canvas, &ev);
			dispatch(PointerEvent::Wheel {
				x,
				y,
				delta_y: ev.delta_y(),
			});
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="mindmap-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
