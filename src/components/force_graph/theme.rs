//! Colors and stroke styles for the entity graph.
//!
//! The defaults follow the explorer's light look: blue entities, a red
//! central entity, orange selection and grey predicate edges.

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

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Fill and border of one kind of node.
#[derive(Clone, Copy, Debug)]
pub struct NodePaint {
	pub fill: Color,
	pub border: Color,
	pub border_width: f64,
	/// Radius multiplier relative to a regular entity.
	pub size: f64,
}

#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub entity: NodePaint,
	pub central: NodePaint,
	pub selected: NodePaint,
	/// Ring drawn around nodes whose neighbourhood is loaded.
	pub expanded_ring: Color,
	pub label: Color,
}

#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	pub label: Color,
	/// Alpha applied to edges not touching the hovered node.
	pub dimmed_alpha: f64,
}

/// Complete visual theme for the canvas.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	pub node: NodeStyle,
	pub edge: EdgeStyle,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			node: NodeStyle {
				entity: NodePaint {
					fill: Color::rgb(0x19, 0x76, 0xd2),
					border: Color::rgb(0x15, 0x65, 0xc0),
					border_width: 2.0,
					size: 1.0,
				},
				central: NodePaint {
					fill: Color::rgb(0xf4, 0x43, 0x36),
					border: Color::rgb(0xd3, 0x2f, 0x2f),
					border_width: 4.0,
					size: 1.2,
				},
				selected: NodePaint {
					fill: Color::rgb(0xff, 0x98, 0x00),
					border: Color::rgb(0xf5, 0x7c, 0x00),
					border_width: 3.0,
					size: 1.0,
				},
				expanded_ring: Color::rgba(0x15, 0x65, 0xc0, 0.35),
				label: Color::rgb(0x33, 0x33, 0x33),
			},
			edge: EdgeStyle {
				color: Color::rgb(0x66, 0x66, 0x66),
				label: Color::rgb(0x33, 0x33, 0x33),
				dimmed_alpha: 0.25,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opaque_colors_render_as_hex() {
		assert_eq!(Color::rgb(0xf4, 0x43, 0x36).to_css(), "#f44336");
		assert_eq!(
			Color::rgb(0, 0, 0).with_alpha(0.5).to_css(),
			"rgba(0, 0, 0, 0.5)"
		);
	}

	#[test]
	fn lighten_moves_towards_white() {
		assert_eq!(Color::rgb(0, 100, 255).lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(Color::rgb(0, 100, 255).lighten(0.0), Color::rgb(0, 100, 255));
	}
}
