//! Deterministic visual encoding of graph content.
//!
//! Sizes and colors are derived purely from node ids and edge identities, so
//! the same mindmap always looks the same regardless of draw order or session.
//! The string hash replicates 32-bit signed wrap-around over UTF-16 code
//! units exactly; any drift would reassign colors to existing content.

use super::theme::{Color, GradientPair, Theme};

/// Smallest rendered node radius in world units.
pub const MIN_RADIUS: f64 = 25.0;
/// Largest rendered node radius in world units.
pub const MAX_RADIUS: f64 = 50.0;

/// Length of a label as counted by the browser (UTF-16 code units).
fn label_len(s: &str) -> usize {
	s.encode_utf16().count()
}

/// Node radius from its label: `len * 2 + 15`, clamped to `[25, 50]`.
pub fn radius(node_id: &str) -> f64 {
	(label_len(node_id) as f64 * 2.0 + 15.0).clamp(MIN_RADIUS, MAX_RADIUS)
}

/// Rolling string hash: `hash = c + ((hash << 5) - hash)` per code unit.
pub fn hash(seed: &str) -> i32 {
	seed.encode_utf16().fold(0i32, |hash, unit| {
		(unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
	})
}

/// Palette index for `seed`: `|hash| % palette_size`.
///
/// A `palette_size` of zero is treated as one.
pub fn color_bucket(seed: &str, palette_size: usize) -> usize {
	hash(seed).unsigned_abs() as usize % palette_size.max(1)
}

/// Seed string identifying an edge: source id, target id and label concatenated.
pub fn edge_seed(source: &str, target: &str, label: &str) -> String {
	let mut seed = String::with_capacity(source.len() + target.len() + label.len());
	seed.push_str(source);
	seed.push_str(target);
	seed.push_str(label);
	seed
}

/// Gradient fill for a node.
pub fn node_fill(node_id: &str, theme: &Theme) -> GradientPair {
	theme
		.node_palette
		.get(color_bucket(node_id, theme.node_palette.len()))
}

/// Stroke color for an edge, keyed by its `(source, target, label)` identity.
pub fn edge_color(source: &str, target: &str, label: &str, theme: &Theme) -> Color {
	let seed = edge_seed(source, target, label);
	theme
		.edge_palette
		.get(color_bucket(&seed, theme.edge_palette.len()))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn radius_is_clamped() {
		assert_eq!(radius(""), MIN_RADIUS);
		assert_eq!(radius("ab"), MIN_RADIUS);
		assert_eq!(radius("Internet"), 31.0);
		assert_eq!(radius(&"x".repeat(40)), MAX_RADIUS);
	}

	#[test]
	fn radius_is_monotonic_in_length() {
		let mut last = 0.0;
		for n in 0..30 {
			let r = radius(&"n".repeat(n));
			assert!((MIN_RADIUS..=MAX_RADIUS).contains(&r));
			assert!(r >= last);
			last = r;
		}
	}

	#[test]
	fn radius_counts_utf16_units() {
		// One astral character is two UTF-16 code units.
		assert_eq!(radius("🦀🦀🦀🦀🦀"), 35.0);
		assert_eq!(radius("ééééé"), 25.0);
	}

	#[test]
	fn hash_matches_browser_values() {
		assert_eq!(hash(""), 0);
		assert_eq!(hash("a"), 97);
		assert_eq!(hash("ab"), 97 * 31 + 98);
		assert_eq!(hash("hello"), 99162322);
		// Long input exercises 32-bit overflow.
		assert_eq!(hash("The quick brown fox"), -1739336029);
	}

	#[test]
	fn bucket_handles_i32_min_and_zero_palette() {
		assert!(color_bucket("anything", 0) == 0);
		for seed in ["", "Internet", "UsersInternetconnects", "🦀 graph"] {
			for n in 1..12 {
				let b = color_bucket(seed, n);
				assert!(b < n);
				assert_eq!(b, color_bucket(seed, n));
			}
		}
	}

	#[test]
	fn known_buckets() {
		assert_eq!(color_bucket("Internet", 8), 1);
		assert_eq!(color_bucket("Users", 8), 0);
		assert_eq!(color_bucket("The quick brown fox", 8), 5);
		assert_eq!(color_bucket("InternetUsersconnects", 6), 0);
	}

	#[test]
	fn edge_seed_concatenates_identity() {
		assert_eq!(
			edge_seed("Internet", "Users", "connects"),
			"InternetUsersconnects"
		);
	}

	#[test]
	fn palette_lookup_is_stable() {
		let theme = Theme::default();
		let a = node_fill("Internet", &theme);
		let b = node_fill("Internet", &theme);
		assert_eq!(a, b);
		let e1 = edge_color("Internet", "Users", "connects", &theme);
		let e2 = edge_color("Internet", "Users", "connects", &theme);
		assert_eq!(e1, e2);
	}
}
