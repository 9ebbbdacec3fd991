//! Canvas painter for a projected [`Scene`].
//!
//! Painting happens in passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edges, then edge labels (world space)
//! 3. Nodes in scene order, each followed by its label
//! 4. Tooltip (screen space)

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::{EdgePath, EdgeShape, NodeShape, Scene};
use super::theme::Theme;

/// Paint the complete scene to the canvas.
pub fn paint(scene: &Scene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	draw_background(scene, ctx, theme);

	ctx.save();
	let _ = ctx.translate(scene.transform.x, scene.transform.y);
	let _ = ctx.scale(scene.transform.k, scene.transform.k);

	for edge in &scene.edges {
		draw_edge(ctx, edge, theme);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	for edge in &scene.edges {
		draw_edge_label(ctx, edge, theme);
	}
	for node in &scene.nodes {
		draw_node(ctx, node, theme);
	}

	ctx.restore();

	if let Some(tooltip) = &scene.tooltip {
		draw_tooltip(ctx, &tooltip.text, tooltip.x, tooltip.y, theme);
	}
}

fn draw_background(scene: &Scene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let (w, h) = (scene.width, scene.height);
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(w / 2.0, h / 2.0, 0.0, w / 2.0, h / 2.0, w.max(h) * 0.8)
				.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, w, h);
}

fn draw_edge(ctx: &CanvasRenderingContext2d, edge: &EdgeShape, theme: &Theme) {
	if edge.opacity < 0.01 {
		return;
	}
	ctx.set_stroke_style_str(&edge.color.fade(edge.opacity).to_css());
	ctx.set_line_width(edge.width);

	match theme.edge.dash.filter(|_| !edge.emphasized) {
		Some((dash, gap)) => {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
		}
		None => {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}

	ctx.begin_path();
	match edge.path {
		EdgePath::Line { from, to } => {
			ctx.move_to(from.0, from.1);
			ctx.line_to(to.0, to.1);
		}
		EdgePath::Quadratic { from, control, to } => {
			ctx.move_to(from.0, from.1);
			let _ = ctx.quadratic_curve_to(control.0, control.1, to.0, to.1);
		}
	}
	ctx.stroke();
}

fn draw_edge_label(ctx: &CanvasRenderingContext2d, edge: &EdgeShape, theme: &Theme) {
	if edge.label.is_empty() || edge.opacity < 0.01 {
		return;
	}
	let (x, y) = edge.label_at;
	let visibility = if edge.emphasized { 1.0 } else { edge.opacity.max(0.6) };
	ctx.set_fill_style_str(&theme.edge.label_color.fade(visibility).to_css());
	ctx.set_font(&theme.edge.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("bottom");
	let _ = ctx.fill_text(&edge.label, x, y - 2.0);
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &NodeShape, theme: &Theme) {
	if node.opacity < 0.01 {
		return;
	}
	let (x, y, radius) = (node.x, node.y, node.radius);
	ctx.set_global_alpha(node.opacity);

	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();

	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &node.fill.inner.lighten(0.15).to_css());
			let _ = gradient.add_color_stop(0.6, &node.fill.inner.to_css());
			let _ = gradient.add_color_stop(1.0, &node.fill.outer.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&node.fill.outer.to_css()),
	}
	ctx.fill();

	if node.border_width > 0.0 {
		ctx.set_stroke_style_str(&node.border_color.to_css());
		ctx.set_line_width(node.border_width);
		ctx.stroke();
	}

	ctx.set_fill_style_str(&theme.node.label_color.to_css());
	ctx.set_font(&theme.node.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&node.label, x, y);

	ctx.set_global_alpha(1.0);
}

fn draw_tooltip(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64, theme: &Theme) {
	let style = &theme.tooltip;
	ctx.set_font(&style.font);
	let text_width = ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0);
	let (w, h) = (text_width + style.padding * 2.0, 14.0 + style.padding * 2.0);
	// Offset from the pointer so the cursor does not cover the text.
	let (left, top) = (x + 12.0, y - h - 8.0);

	ctx.set_fill_style_str(&style.background.to_css());
	ctx.fill_rect(left, top, w, h);
	ctx.set_fill_style_str(&style.text.to_css());
	ctx.set_text_align("left");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(text, left + style.padding, top + h / 2.0);
}
