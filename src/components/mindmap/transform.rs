//! Pan/zoom transform applied to the whole scene.
//!
//! Node coordinates live in world space and are never touched here; the
//! painter applies `screen = world * k + (x, y)` to the scene as one group.
//! User gestures take effect immediately, while toolbar zooms animate toward
//! their target and land on it exactly.

use serde::Deserialize;

/// Translate + uniform scale from world space to screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	/// Horizontal translation in screen pixels.
	pub x: f64,
	/// Vertical translation in screen pixels.
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Transform {
	pub const IDENTITY: Transform = Transform {
		x: 0.0,
		y: 0.0,
		k: 1.0,
	};

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// Rescale to `k` while keeping the screen point `(px, py)` fixed.
	fn zoomed_about(&self, px: f64, py: f64, k: f64) -> Self {
		let ratio = k / self.k;
		Self {
			x: px - (px - self.x) * ratio,
			y: py - (py - self.y) * ratio,
			k,
		}
	}
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// Zoom limits and step sizes.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Scale multiplier per wheel notch.
	pub wheel_factor: f64,
	/// Scale multiplier per toolbar zoom-in press.
	pub button_factor: f64,
	/// Duration of toolbar zoom animations.
	pub duration_ms: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_scale: 0.3,
			max_scale: 4.0,
			wheel_factor: 1.1,
			button_factor: 1.3,
			duration_ms: 300.0,
		}
	}
}

impl ZoomConfig {
	pub fn clamp_scale(&self, k: f64) -> f64 {
		k.clamp(self.min_scale, self.max_scale)
	}
}

/// Raw zoom/pan input from the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomGesture {
	/// Wheel over screen point `(x, y)`; positive `delta_y` zooms out.
	Wheel { x: f64, y: f64, delta_y: f64 },
	/// Background drag by a screen-space delta.
	Pan { dx: f64, dy: f64 },
}

/// An in-flight programmatic transition between two transforms.
#[derive(Clone, Debug)]
pub struct ZoomAnimation {
	from: Transform,
	to: Transform,
	elapsed_ms: f64,
	duration_ms: f64,
}

impl ZoomAnimation {
	pub fn new(from: Transform, to: Transform, duration_ms: f64) -> Self {
		Self {
			from,
			to,
			elapsed_ms: 0.0,
			duration_ms,
		}
	}

	/// Advance by `dt_ms` and return the interpolated transform.
	pub fn advance(&mut self, dt_ms: f64) -> Transform {
		self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.duration_ms);
		self.current()
	}

	pub fn current(&self) -> Transform {
		if self.is_finished() {
			return self.to;
		}
		let t = ease_cubic_in_out(self.elapsed_ms / self.duration_ms);
		Transform {
			x: lerp(self.from.x, self.to.x, t),
			y: lerp(self.from.y, self.to.y, t),
			k: self.from.k * (self.to.k / self.from.k).powf(t),
		}
	}

	pub fn is_finished(&self) -> bool {
		self.elapsed_ms >= self.duration_ms
	}

	pub fn target(&self) -> Transform {
		self.to
	}
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

fn ease_cubic_in_out(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	if t < 0.5 {
		4.0 * t * t * t
	} else {
		1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
	}
}

/// The viewport: current transform, limits, and any running animation.
#[derive(Clone, Debug)]
pub struct Viewport {
	transform: Transform,
	config: ZoomConfig,
	animation: Option<ZoomAnimation>,
	width: f64,
	height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64, config: ZoomConfig) -> Self {
		Self {
			transform: Transform::IDENTITY,
			config,
			animation: None,
			width,
			height,
		}
	}

	pub fn transform(&self) -> Transform {
		self.transform
	}

	pub fn config(&self) -> &ZoomConfig {
		&self.config
	}

	pub fn is_animating(&self) -> bool {
		self.animation.is_some()
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Apply a user gesture immediately, cancelling any animation.
	pub fn on_zoom_gesture(&mut self, gesture: ZoomGesture) -> Transform {
		self.animation = None;
		self.transform = match gesture {
			ZoomGesture::Wheel { x, y, delta_y } => {
				let factor = if delta_y > 0.0 {
					1.0 / self.config.wheel_factor
				} else if delta_y < 0.0 {
					self.config.wheel_factor
				} else {
					1.0
				};
				let k = self.config.clamp_scale(self.transform.k * factor);
				self.transform.zoomed_about(x, y, k)
			}
			ZoomGesture::Pan { dx, dy } => Transform {
				x: self.transform.x + dx,
				y: self.transform.y + dy,
				k: self.transform.k,
			},
		};
		self.transform
	}

	/// Zoom about the viewport center by `factor`, animated over `duration_ms`.
	pub fn on_programmatic_zoom(&mut self, factor: f64, duration_ms: f64) {
		let base = self.settled_transform();
		let k = self.config.clamp_scale(base.k * factor);
		let target = base.zoomed_about(self.width / 2.0, self.height / 2.0, k);
		self.animate_to(target, duration_ms);
	}

	/// Return to the identity transform, animated over `duration_ms`.
	pub fn reset_transform(&mut self, duration_ms: f64) {
		self.animate_to(Transform::IDENTITY, duration_ms);
	}

	/// Advance a running animation. Returns `true` if the transform changed.
	pub fn tick(&mut self, dt_ms: f64) -> bool {
		let Some(animation) = self.animation.as_mut() else {
			return false;
		};
		self.transform = animation.advance(dt_ms);
		if animation.is_finished() {
			self.animation = None;
		}
		true
	}

	/// Where the transform will rest once any animation completes.
	fn settled_transform(&self) -> Transform {
		self.animation
			.as_ref()
			.map(ZoomAnimation::target)
			.unwrap_or(self.transform)
	}

	fn animate_to(&mut self, target: Transform, duration_ms: f64) {
		if duration_ms <= 0.0 {
			self.animation = None;
			self.transform = target;
		} else {
			self.animation = Some(ZoomAnimation::new(self.transform, target, duration_ms));
		}
	}
}
