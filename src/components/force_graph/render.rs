//! Canvas rendering for the entity graph.
//!
//! Drawing order: background (screen space), then in world space the edges
//! with their arrowheads and predicate labels, then nodes with entity labels.
//! While a node is hovered, elements outside its neighbourhood fade out.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, NodeInfo, SurfaceEdge};
use super::theme::{NodePaint, Theme};

/// Perpendicular spacing between parallel edges.
const LANE_SPACING: f64 = 14.0;

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	let positions = state.positions();
	draw_edges(state, ctx, &scale, theme, &positions);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();
}

/// Alpha for an element given whether it belongs to the hovered neighbourhood.
fn fade(state: &ForceGraphState, lit: bool, dimmed_alpha: f64) -> f64 {
	if lit {
		1.0
	} else {
		1.0 - (1.0 - dimmed_alpha) * state.hover.dimming()
	}
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	positions: &HashMap<DefaultNodeIdx, (f64, f64)>,
) {
	for edge in state.edges() {
		let (Some(&from), Some(&to)) = (positions.get(&edge.source), positions.get(&edge.target)) else {
			continue;
		};
		let lit = state.hover.is_lit(edge.source) && state.hover.is_lit(edge.target);
		let alpha = fade(state, lit, theme.edge.dimmed_alpha);
		draw_edge(ctx, scale, theme, edge, from, to, alpha);
	}
}

fn draw_edge(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	edge: &SurfaceEdge,
	(x1, y1): (f64, f64),
	(x2, y2): (f64, f64),
	alpha: f64,
) {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < scale.node_radius * 2.0 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);

	// Alternate parallel edges to either side of the straight line.
	let side = if edge.lane % 2 == 0 { 1.0 } else { -1.0 };
	let bend = side * LANE_SPACING * edge.lane.div_ceil(2) as f64 * 2.0;
	let (mid_x, mid_y) = ((x1 + x2) / 2.0 - uy * bend, (y1 + y2) / 2.0 + ux * bend);

	let color = theme.edge.color.with_alpha(alpha);
	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(scale.edge_width);

	let (start_x, start_y) = (x1 + ux * scale.node_radius, y1 + uy * scale.node_radius);
	let (tip_x, tip_y) = (x2 - ux * scale.node_radius, y2 - uy * scale.node_radius);

	ctx.begin_path();
	ctx.move_to(start_x, start_y);
	let _ = ctx.quadratic_curve_to(mid_x, mid_y, tip_x, tip_y);
	ctx.stroke();

	// Arrowhead follows the curve's tangent at the target end.
	let (tx, ty) = (tip_x - mid_x, tip_y - mid_y);
	let tangent = (tx * tx + ty * ty).sqrt().max(0.001);
	let (ax, ay) = (tx / tangent, ty / tangent);
	let (back_x, back_y) = (tip_x - ax * scale.arrow_size, tip_y - ay * scale.arrow_size);
	let (px, py) = (-ay * scale.arrow_size * 0.5, ax * scale.arrow_size * 0.5);

	ctx.set_fill_style_str(&color.to_css());
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();

	if scale.show_edge_labels && !edge.label.is_empty() {
		// Midpoint of the quadratic curve.
		let (lx, ly) = (
			0.25 * x1 + 0.5 * mid_x + 0.25 * x2,
			0.25 * y1 + 0.5 * mid_y + 0.25 * y2,
		);
		ctx.save();
		let _ = ctx.translate(lx, ly);
		let mut angle = dy.atan2(dx);
		if angle.abs() > PI / 2.0 {
			angle += PI;
		}
		let _ = ctx.rotate(angle);
		ctx.set_font(&scale.edge_font);
		ctx.set_text_align("center");
		ctx.set_fill_style_str(&theme.edge.label.with_alpha(alpha).to_css());
		let _ = ctx.fill_text(&edge.label, 0.0, -4.0);
		ctx.restore();
	}
}

fn paint_for<'a>(theme: &'a Theme, info: &NodeInfo, selected: bool) -> &'a NodePaint {
	if selected {
		&theme.node.selected
	} else if info.central {
		&theme.node.central
	} else {
		&theme.node.entity
	}
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let info = &node.data.user_data;
		let selected = state.selected == Some(idx);
		let paint = paint_for(theme, info, selected);
		// The central node keeps its size when selected.
		let size = if info.central { theme.node.central.size } else { paint.size };
		let radius = scale.node_radius * size;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let alpha = fade(state, state.hover.is_lit(idx), theme.edge.dimmed_alpha);

		if info.expanded && !info.central {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 5.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&theme.node.expanded_ring.to_css());
			ctx.set_line_width(4.0);
			ctx.stroke();
		}

		let fill = if state.hover.hovered == Some(idx) {
			paint.fill.lighten(0.2)
		} else {
			paint.fill
		};
		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&fill.to_css());
		ctx.fill();
		ctx.set_stroke_style_str(&paint.border.to_css());
		ctx.set_line_width(paint.border_width);
		ctx.stroke();

		ctx.set_font(&scale.node_font);
		ctx.set_text_align("center");
		ctx.set_fill_style_str(&theme.node.label.to_css());
		let _ = ctx.fill_text(&info.label, x, y + radius + 14.0 / scale.k.max(0.25));
		ctx.set_global_alpha(1.0);
	});
}
