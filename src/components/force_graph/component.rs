//! Leptos component wrapping the force-directed graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node dragging, panning, zooming and node selection. An animation
//! loop runs via `requestAnimationFrame`; each frame it drains the
//! [`SurfaceFeed`], steps the physics simulation and redraws.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::scale::ScaleConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::types::SurfaceFeed;

/// Pointer travel (pixels) after which a press becomes a drag, not a click.
const CLICK_TOLERANCE: f64 = 4.0;

/// Bundles graph simulation state with visual configuration.
struct GraphContext {
	state: ForceGraphState,
	scale: ScaleConfig,
	theme: Theme,
}

fn window_size(window: &Window) -> (f64, f64) {
	let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
	};
	(dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0))
}

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Renders the explorer's subgraph on a canvas element.
///
/// Changes arrive through `feed`. A click on a node (press and release without
/// dragging) calls `on_node_click` with the node's entity URI; entering or
/// leaving a node calls `on_node_hover`. The component sizes itself to its
/// parent container by default; set `fullscreen = true` to fill the viewport.
#[component]
pub fn ForceGraphCanvas(
	feed: SurfaceFeed,
	on_node_click: Rc<dyn Fn(String)>,
	#[prop(optional)] on_node_hover: Option<Rc<dyn Fn(Option<String>)>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
				height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				log::error!("explorer: canvas has no 2d context");
				return;
			}
		};

		*context_init.borrow_mut() = Some(GraphContext {
			state: ForceGraphState::new(w, h),
			scale: ScaleConfig::default(),
			theme: Theme::default(),
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, feed) = (context_init.clone(), animate_init.clone(), feed.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				for command in feed.drain() {
					c.state.apply(command);
				}
				c.state.tick(0.016);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.state.node_at_position(x, y, &c.scale) {
				let (nx, ny) = c.state.node_position(idx).unwrap_or((0.0, 0.0));
				c.state.drag.active = true;
				c.state.drag.moved = false;
				c.state.drag.node_idx = Some(idx);
				c.state.drag.start_x = x;
				c.state.drag.start_y = y;
				c.state.drag.node_start_x = nx as f32;
				c.state.drag.node_start_y = ny as f32;
				c.state.wake();
			} else {
				c.state.pan.active = true;
				c.state.pan.start_x = x;
				c.state.pan.start_y = y;
				c.state.pan.transform_start_x = c.state.transform.x;
				c.state.pan.transform_start_y = c.state.transform.y;
			}
		}
	};

	let (context_mm, hover_cb) = (context.clone(), on_node_hover.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let mut hovered_id = None;
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if !c.state.drag.active {
				let hovered = c.state.node_at_position(x, y, &c.scale);
				if c.state.set_hover(hovered) {
					hovered_id = Some(hovered.and_then(|idx| c.state.node_id(idx)));
				}
			}

			if c.state.drag.active {
				let (dx, dy) = (x - c.state.drag.start_x, y - c.state.drag.start_y);
				if (dx * dx + dy * dy).sqrt() > CLICK_TOLERANCE {
					c.state.drag.moved = true;
				}
				if let (Some(idx), true) = (c.state.drag.node_idx, c.state.drag.moved) {
					let (nx, ny) = (
						c.state.drag.node_start_x + (dx / c.state.transform.k) as f32,
						c.state.drag.node_start_y + (dy / c.state.transform.k) as f32,
					);
					c.state.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if c.state.pan.active {
				c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
				c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
			}
		}
		if let (Some(id), Some(cb)) = (hovered_id, hover_cb.as_ref()) {
			cb(id);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut clicked = None;
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.drag.active && !c.state.drag.moved {
				clicked = c.state.drag.node_idx.and_then(|idx| c.state.node_id(idx));
			}
			c.state.drag = Default::default();
			c.state.pan.active = false;
		}
		if let Some(id) = clicked {
			on_node_click(id);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let mut left = false;
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag = Default::default();
			c.state.pan.active = false;
			left = c.state.set_hover(None);
		}
		if let (true, Some(cb)) = (left, on_node_hover.as_ref()) {
			cb(None);
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.state.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
