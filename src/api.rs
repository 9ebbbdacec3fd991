//! Client for the text-to-mindmap generation service.
//!
//! Posts `{"text": ...}` to the configured endpoint and decodes the
//! `{nodes, edges}` response into [`GraphData`].

use serde::Serialize;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use crate::components::mindmap::GraphData;

/// Local development server.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/mindmap";

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
	pub text: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error("no text to generate from")]
	EmptyText,
	#[error("no browser window available")]
	NoWindow,
	#[error("could not build request: {0}")]
	Request(String),
	#[error("network error: {0}")]
	Network(String),
	#[error("server responded with status {0}")]
	Status(u16),
	#[error("could not read response body: {0}")]
	Body(String),
	#[error("invalid mindmap JSON: {0}")]
	Decode(#[from] serde_json::Error),
}

/// Human-readable message from a thrown JS value.
fn js_message(value: JsValue) -> String {
	match value.dyn_ref::<js_sys::Error>() {
		Some(err) => String::from(err.message()),
		None => value.as_string().unwrap_or_else(|| format!("{:?}", value)),
	}
}

/// Request a mindmap for `text` from `endpoint`.
pub async fn generate(endpoint: &str, text: &str) -> Result<GraphData, ApiError> {
	if text.trim().is_empty() {
		return Err(ApiError::EmptyText);
	}
	let body = serde_json::to_string(&GenerateRequest { text })?;

	let headers = Headers::new().map_err(|e| ApiError::Request(js_message(e)))?;
	headers
		.set("Content-Type", "application/json")
		.map_err(|e| ApiError::Request(js_message(e)))?;

	let init = RequestInit::new();
	init.set_method("POST");
	init.set_mode(RequestMode::Cors);
	init.set_headers(&headers);
	init.set_body(&JsValue::from_str(&body));

	let request = Request::new_with_str_and_init(endpoint, &init)
		.map_err(|e| ApiError::Request(js_message(e)))?;
	let window = web_sys::window().ok_or(ApiError::NoWindow)?;

	let response: Response = JsFuture::from(window.fetch_with_request(&request))
		.await
		.map_err(|e| ApiError::Network(js_message(e)))?
		.dyn_into()
		.map_err(|e| ApiError::Network(js_message(e)))?;

	if !response.ok() {
		return Err(ApiError::Status(response.status()));
	}

	let text_promise = response.text().map_err(|e| ApiError::Body(js_message(e)))?;
	let body = JsFuture::from(text_promise)
		.await
		.map_err(|e| ApiError::Body(js_message(e)))?
		.as_string()
		.ok_or_else(|| ApiError::Body("response body is not text".into()))?;

	parse_response(&body)
}

/// Decode a generation response body.
pub fn parse_response(body: &str) -> Result<GraphData, ApiError> {
	Ok(serde_json::from_str(body)?)
}
