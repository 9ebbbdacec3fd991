//! Persistence of the last rendered mindmap across sessions.
//!
//! The cache stores the source text and the generated graph under fixed keys
//! in any [`KeyValueStore`]. A stored graph that no longer decodes is removed
//! and reported as absent rather than breaking start-up.

use std::collections::HashMap;

use log::{info, warn};

use crate::components::mindmap::GraphData;

/// Key holding the JSON-encoded graph.
pub const GRAPH_KEY: &str = "mindmapr.lastGraph";
/// Key holding the text the graph was generated from.
pub const TEXT_KEY: &str = "mindmapr.lastText";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
	#[error("storage write failed: {0}")]
	Write(String),
	#[error("failed to encode graph: {0}")]
	Encode(#[from] serde_json::Error),
}

/// Minimal string key/value store.
pub trait KeyValueStore {
	fn get(&self, key: &str) -> Option<String>;
	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
	fn remove(&mut self, key: &str);
}

/// `window.localStorage`.
pub struct BrowserStorage {
	storage: web_sys::Storage,
}

impl BrowserStorage {
	pub fn local() -> Option<Self> {
		let storage = web_sys::window()?.local_storage().ok()??;
		Some(Self { storage })
	}
}

impl KeyValueStore for BrowserStorage {
	fn get(&self, key: &str) -> Option<String> {
		self.storage.get_item(key).ok().flatten()
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		self.storage
			.set_item(key, value)
			.map_err(|e| StorageError::Write(format!("{:?}", e)))
	}

	fn remove(&mut self, key: &str) {
		if let Err(e) = self.storage.remove_item(key) {
			warn!("mindmapr: could not remove {} from storage: {:?}", key, e);
		}
	}
}

/// In-memory store, used when localStorage is unavailable and in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.get(key).cloned()
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		self.entries.insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&mut self, key: &str) {
		self.entries.remove(key);
	}
}

/// What was restored on start-up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CachedMindmap {
	pub text: String,
	pub graph: Option<GraphData>,
}

pub struct MindmapCache {
	store: Box<dyn KeyValueStore>,
}

impl MindmapCache {
	pub fn new(store: impl KeyValueStore + 'static) -> Self {
		Self {
			store: Box::new(store),
		}
	}

	/// localStorage if the browser allows it, otherwise a session-only store.
	pub fn browser_or_memory() -> Self {
		match BrowserStorage::local() {
			Some(storage) => Self::new(storage),
			None => {
				warn!("mindmapr: localStorage unavailable, cache is session-only");
				Self::new(MemoryStore::default())
			}
		}
	}

	pub fn save(&mut self, text: &str, graph: &GraphData) -> Result<(), StorageError> {
		let encoded = serde_json::to_string(graph)?;
		self.store.set(GRAPH_KEY, &encoded)?;
		self.store.set(TEXT_KEY, text)
	}

	/// Load the cached text and graph.
	///
	/// A graph entry that fails to decode, or decodes to a graph that cannot
	/// be laid out, is removed from the store and reported as absent.
	pub fn restore(&mut self) -> CachedMindmap {
		let text = self.store.get(TEXT_KEY).unwrap_or_default();
		let graph = self.store.get(GRAPH_KEY).and_then(|raw| {
			let decoded = serde_json::from_str::<GraphData>(&raw)
				.map_err(|e| e.to_string())
				.and_then(|graph| graph.validate().map(|()| graph).map_err(|e| e.to_string()));
			match decoded {
				Ok(graph) => {
					info!(
						"mindmapr: restored cached graph ({} nodes, {} edges)",
						graph.nodes.len(),
						graph.edges.len()
					);
					Some(graph)
				}
				Err(reason) => {
					warn!("mindmapr: discarding corrupt cached graph: {}", reason);
					self.store.remove(GRAPH_KEY);
					None
				}
			}
		});
		CachedMindmap { text, graph }
	}

	pub fn clear(&mut self) {
		self.store.remove(GRAPH_KEY);
		self.store.remove(TEXT_KEY);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::mindmap::{GraphEdge, GraphNode};

	fn sample() -> GraphData {
		GraphData {
			nodes: vec![GraphNode::new("Internet"), GraphNode::new("Users")],
			edges: vec![GraphEdge::new("Internet", "Users", "connects")],
		}
	}

	#[test]
	fn save_then_restore() {
		let mut cache = MindmapCache::new(MemoryStore::default());
		cache.save("The internet connects users.", &sample()).unwrap();
		let restored = cache.restore();
		assert_eq!(restored.text, "The internet connects users.");
		assert_eq!(restored.graph, Some(sample()));
	}

	#[test]
	fn empty_store_restores_nothing() {
		let mut cache = MindmapCache::new(MemoryStore::default());
		assert_eq!(cache.restore(), CachedMindmap::default());
	}

	#[test]
	fn corrupt_graph_is_discarded() {
		let mut store = MemoryStore::default();
		store.set(GRAPH_KEY, "{\"nodes\": [oops").unwrap();
		store.set(TEXT_KEY, "kept").unwrap();
		let mut cache = MindmapCache::new(store);

		let restored = cache.restore();
		assert_eq!(restored.text, "kept");
		assert_eq!(restored.graph, None);
		// The bad entry is gone, so the next start is clean.
		assert_eq!(cache.restore().graph, None);
		assert!(cache.store.get(GRAPH_KEY).is_none());
	}

	#[test]
	fn graph_with_dangling_edge_is_discarded() {
		let mut store = MemoryStore::default();
		store
			.set(
				GRAPH_KEY,
				r#"{"nodes":[{"id":"A"}],"edges":[{"source":"A","target":"Z"}]}"#,
			)
			.unwrap();
		store.set(TEXT_KEY, "A relates to Z").unwrap();
		let mut cache = MindmapCache::new(store);

		let restored = cache.restore();
		assert_eq!(restored.text, "A relates to Z");
		assert_eq!(restored.graph, None);
		assert!(cache.store.get(GRAPH_KEY).is_none());
	}

	#[test]
	fn clear_removes_both_entries() {
		let mut cache = MindmapCache::new(MemoryStore::default());
		cache.save("text", &sample()).unwrap();
		cache.clear();
		assert_eq!(cache.restore(), CachedMindmap::default());
	}
}
