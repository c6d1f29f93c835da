//! Zoom-dependent sizes.
//!
//! Node geometry lives in world space and grows with zoom. Strokes and text
//! are kept at a readable screen size by dividing by the zoom factor `k`,
//! clamped so they do not balloon when zoomed far out.

/// Base sizes at zoom 1.0.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node_radius: f64,
	/// Extra pick radius around a node, in screen pixels.
	pub hit_slop: f64,
	pub edge_width: f64,
	pub arrow_size: f64,
	pub node_font_px: f64,
	pub edge_font_px: f64,
	/// Edge labels are hidden below this zoom.
	pub edge_label_min_k: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: 25.0,
			hit_slop: 4.0,
			edge_width: 2.0,
			arrow_size: 10.0,
			node_font_px: 12.0,
			edge_font_px: 10.0,
			edge_label_min_k: 0.6,
		}
	}
}

/// Sizes resolved for one zoom level, in world units.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub node_radius: f64,
	pub hit_radius: f64,
	pub edge_width: f64,
	pub arrow_size: f64,
	pub node_font: String,
	pub edge_font: String,
	pub show_edge_labels: bool,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let screen = |px: f64| px / k.max(0.25);
		Self {
			k,
			node_radius: config.node_radius,
			hit_radius: config.node_radius + config.hit_slop / k,
			edge_width: screen(config.edge_width),
			arrow_size: config.arrow_size,
			node_font: format!("{}px sans-serif", screen(config.node_font_px)),
			edge_font: format!("{}px sans-serif", screen(config.edge_font_px)),
			show_edge_labels: k >= config.edge_label_min_k,
		}
	}
}
