//! Visual theming for the mindmap.
//!
//! Provides the color type, the node gradient and edge palettes consulted by
//! the encoding functions, and per-element style configuration.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Multiply the existing alpha by `factor`.
	pub fn fade(self, factor: f64) -> Self {
		Self {
			a: self.a * factor.clamp(0.0, 1.0),
			..self
		}
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Two-stop radial gradient used to fill a node: bright center, deep rim.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientPair {
	pub inner: Color,
	pub outer: Color,
}

impl GradientPair {
	pub const fn new(inner: Color, outer: Color) -> Self {
		Self { inner, outer }
	}
}

/// Node fills, indexed by color bucket.
#[derive(Clone, Debug)]
pub struct NodePalette {
	pub fills: Vec<GradientPair>,
}

impl NodePalette {
	/// Saturated pairs that keep white labels readable (default, 8 entries).
	pub fn vivid() -> Self {
		Self {
			fills: vec![
				GradientPair::new(Color::rgb(102, 126, 234), Color::rgb(118, 75, 162)), // Indigo to violet
				GradientPair::new(Color::rgb(240, 147, 251), Color::rgb(245, 87, 108)), // Orchid to coral
				GradientPair::new(Color::rgb(79, 172, 254), Color::rgb(0, 116, 217)), // Sky to azure
				GradientPair::new(Color::rgb(67, 233, 123), Color::rgb(30, 150, 110)), // Mint to jade
				GradientPair::new(Color::rgb(250, 112, 154), Color::rgb(214, 80, 60)), // Pink to brick
				GradientPair::new(Color::rgb(48, 207, 208), Color::rgb(51, 8, 103)), // Teal to plum
				GradientPair::new(Color::rgb(255, 179, 71), Color::rgb(222, 98, 24)), // Amber to rust
				GradientPair::new(Color::rgb(161, 140, 209), Color::rgb(84, 62, 150)), // Lilac to iris
			],
		}
	}

	/// Softer pairs for the light theme.
	pub fn pastel() -> Self {
		Self {
			fills: vec![
				GradientPair::new(Color::rgb(150, 170, 240), Color::rgb(96, 110, 200)),
				GradientPair::new(Color::rgb(240, 180, 220), Color::rgb(200, 110, 160)),
				GradientPair::new(Color::rgb(150, 205, 240), Color::rgb(70, 140, 200)),
				GradientPair::new(Color::rgb(160, 225, 185), Color::rgb(70, 160, 120)),
				GradientPair::new(Color::rgb(245, 185, 170), Color::rgb(205, 110, 95)),
				GradientPair::new(Color::rgb(150, 220, 215), Color::rgb(60, 150, 150)),
				GradientPair::new(Color::rgb(245, 210, 150), Color::rgb(205, 140, 70)),
				GradientPair::new(Color::rgb(200, 185, 235), Color::rgb(130, 110, 190)),
			],
		}
	}

	pub fn len(&self) -> usize {
		self.fills.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fills.is_empty()
	}

	pub fn get(&self, index: usize) -> GradientPair {
		self.fills
			.get(index % self.fills.len().max(1))
			.copied()
			.unwrap_or(GradientPair::new(Color::rgb(128, 128, 128), Color::rgb(90, 90, 90)))
	}
}

/// Solid edge colors, indexed by color bucket.
#[derive(Clone, Debug)]
pub struct EdgePalette {
	pub colors: Vec<Color>,
}

impl EdgePalette {
	/// Default edge colors (6 entries).
	pub fn standard() -> Self {
		Self {
			colors: vec![
				Color::rgb(102, 126, 234), // Indigo
				Color::rgb(245, 87, 108),  // Coral
				Color::rgb(0, 116, 217),   // Azure
				Color::rgb(46, 204, 113),  // Emerald
				Color::rgb(255, 159, 67),  // Tangerine
				Color::rgb(155, 89, 182),  // Amethyst
			],
		}
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors
			.get(index % self.colors.len().max(1))
			.copied()
			.unwrap_or(Color::rgb(170, 170, 170))
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for the radial gradient center
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Base stroke width in world units.
	pub width: f64,
	/// Resting opacity (multiplied into the palette color).
	pub opacity: f64,
	/// Bend every edge, not only parallel ones.
	pub curved: bool,
	/// Curve offset as a fraction of edge length.
	pub curve_tension: f64,
	/// Optional dash pattern (dash, gap) in world units.
	pub dash: Option<(f64, f64)>,
	pub label_color: Color,
	pub label_font: String,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Fill nodes with radial gradients instead of the outer color only.
	pub use_gradient: bool,
	pub border_width: f64,
	pub border_color: Color,
	/// Border drawn around hovered or dragged nodes.
	pub emphasis_border_color: Color,
	pub label_color: Color,
	pub label_font: String,
}

/// Hover tooltip style (screen space).
#[derive(Clone, Debug)]
pub struct TooltipStyle {
	pub background: Color,
	pub text: Color,
	pub font: String,
	pub padding: f64,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub tooltip: TooltipStyle,
	pub node_palette: NodePalette,
	pub edge_palette: EdgePalette,
}

impl Theme {
	/// Dark canvas with vivid nodes (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(32, 38, 48),
				use_gradient: true,
			},
			edge: EdgeStyle {
				width: 2.0,
				opacity: 0.7,
				curved: false,
				curve_tension: 0.2,
				dash: None,
				label_color: Color::rgba(220, 225, 235, 0.9),
				label_font: "10px sans-serif".into(),
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 1.5,
				border_color: Color::rgba(255, 255, 255, 0.6),
				emphasis_border_color: Color::rgb(255, 255, 255),
				label_color: Color::rgb(255, 255, 255),
				label_font: "bold 12px sans-serif".into(),
			},
			tooltip: TooltipStyle {
				background: Color::rgba(15, 18, 24, 0.92),
				text: Color::rgb(240, 240, 240),
				font: "12px sans-serif".into(),
				padding: 6.0,
			},
			node_palette: NodePalette::vivid(),
			edge_palette: EdgePalette::standard(),
		}
	}

	/// Light page with pastel nodes and dashed relations
	pub fn light() -> Self {
		Self {
			name: "light",
			background: BackgroundStyle {
				color: Color::rgb(248, 249, 251),
				color_secondary: Color::rgb(255, 255, 255),
				use_gradient: false,
			},
			edge: EdgeStyle {
				width: 1.5,
				opacity: 0.8,
				curved: true,
				curve_tension: 0.15,
				dash: Some((6.0, 3.0)),
				label_color: Color::rgb(68, 68, 68),
				label_font: "10px sans-serif".into(),
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 1.5,
				border_color: Color::rgb(255, 255, 255),
				emphasis_border_color: Color::rgb(40, 40, 40),
				label_color: Color::rgb(255, 255, 255),
				label_font: "bold 12px sans-serif".into(),
			},
			tooltip: TooltipStyle {
				background: Color::rgba(40, 40, 40, 0.9),
				text: Color::rgb(255, 255, 255),
				font: "12px sans-serif".into(),
				padding: 6.0,
			},
			node_palette: NodePalette::pastel(),
			edge_palette: EdgePalette::standard(),
		}
	}

	/// Look up a preset by name, falling back to the default.
	pub fn by_name(name: &str) -> Self {
		match name {
			"light" => Self::light(),
			_ => Self::default_theme(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
