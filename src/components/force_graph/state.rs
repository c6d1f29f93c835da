//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node entity metadata,
//! the pan/zoom transform, drag and hover tracking. The simulation is rebuilt
//! on `Replace` and only grown on `Add`, so nodes already on screen keep their
//! positions when a neighbour is expanded.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::scale::{ScaleConfig, ScaledValues};
use super::types::SurfaceCommand;
use crate::explorer::{EntityEdge, EntityNode, GraphDelta, GraphSnapshot};

/// Distance at which freshly discovered nodes are placed around their parent.
const SPAWN_RADIUS: f64 = 90.0;

/// Simulation steps run after the graph changes before physics pauses.
const SETTLE_TICKS: u32 = 600;

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub central: bool,
	pub expanded: bool,
}

/// An edge as drawn: endpoints plus the predicate label.
#[derive(Clone, Debug)]
pub struct SurfaceEdge {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub label: String,
	/// Ordinal among edges joining the same pair; spreads parallel edges.
	pub lane: usize,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node drag, which is also how clicks are detected.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	/// Set once the pointer travels far enough to count as a drag.
	pub moved: bool,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Hovered node, its neighbours, and a smoothed fade value.
#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub hovered: Option<DefaultNodeIdx>,
	lit: HashSet<DefaultNodeIdx>,
	intensity: f64,
}

impl HoverState {
	fn set(&mut self, node: Option<DefaultNodeIdx>, edges: &[SurfaceEdge]) -> bool {
		if self.hovered == node {
			return false;
		}
		self.hovered = node;
		self.lit.clear();
		if let Some(idx) = node {
			self.lit.insert(idx);
			for edge in edges {
				if edge.source == idx {
					self.lit.insert(edge.target);
				} else if edge.target == idx {
					self.lit.insert(edge.source);
				}
			}
		}
		true
	}

	/// Exponential ease towards 1 while hovering, towards 0 otherwise.
	fn tick(&mut self, dt: f64) {
		const SPEED: f64 = 6.0;
		let target = if self.hovered.is_some() { 1.0 } else { 0.0 };
		self.intensity += (target - self.intensity) * (1.0 - (-SPEED * dt).exp());
	}

	pub fn is_lit(&self, idx: DefaultNodeIdx) -> bool {
		self.lit.contains(&idx)
	}

	/// How strongly unrelated elements should be dimmed (0..1).
	pub fn dimming(&self) -> f64 {
		if self.hovered.is_some() { self.intensity } else { 0.0 }
	}
}

/// Core graph state combining physics simulation with interaction tracking.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub selected: Option<DefaultNodeIdx>,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	settle_ticks: u32,
	ids: HashMap<String, DefaultNodeIdx>,
	edges: Vec<SurfaceEdge>,
}

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 400.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl ForceGraphState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			graph: simulation(),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			selected: None,
			width,
			height,
			animation_running: false,
			settle_ticks: 0,
			ids: HashMap::new(),
			edges: Vec::new(),
		}
	}

	pub fn apply(&mut self, command: SurfaceCommand) {
		match command {
			SurfaceCommand::Replace(snapshot) => self.replace(&snapshot),
			SurfaceCommand::Add { parent, delta } => self.add(&parent, &delta),
			SurfaceCommand::Select(id) => self.selected = self.node_index(&id),
			SurfaceCommand::Zoom(factor) => self.zoom_at(self.width / 2.0, self.height / 2.0, factor),
			SurfaceCommand::Fit => self.fit(),
		}
	}

	/// Rebuilds the simulation from a full element list, nodes on a circle
	/// around the origin and the central node in the middle.
	pub fn replace(&mut self, snapshot: &GraphSnapshot) {
		self.graph = simulation();
		self.ids.clear();
		self.edges.clear();
		self.selected = None;
		self.drag = DragState::default();
		self.hover = HoverState::default();
		self.wake();

		let ring = snapshot.nodes.iter().filter(|n| !n.is_central).count().max(1);
		let mut slot = 0;
		for node in &snapshot.nodes {
			let (x, y) = if node.is_central {
				(0.0, 0.0)
			} else {
				let angle = slot as f64 * 2.0 * PI / ring as f64;
				slot += 1;
				(100.0 * angle.cos(), 100.0 * angle.sin())
			};
			self.insert_node(node, x, y);
		}
		for edge in &snapshot.edges {
			self.insert_edge(edge);
		}
		self.transform = ViewTransform {
			x: self.width / 2.0,
			y: self.height / 2.0,
			k: 1.0,
		};
	}

	/// Adds an expansion's elements around `parent` without moving anything
	/// already placed.
	pub fn add(&mut self, parent: &str, delta: &GraphDelta) {
		let parent_idx = self.node_index(parent);
		let (px, py) = parent_idx
			.and_then(|idx| self.node_position(idx))
			.unwrap_or((0.0, 0.0));
		let count = delta.nodes.len().max(1);
		for (i, node) in delta.nodes.iter().enumerate() {
			let angle = i as f64 * 2.0 * PI / count as f64;
			self.insert_node(
				node,
				px + SPAWN_RADIUS * angle.cos(),
				py + SPAWN_RADIUS * angle.sin(),
			);
		}
		for edge in &delta.edges {
			self.insert_edge(edge);
		}
		if let Some(idx) = parent_idx {
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.user_data.expanded = true;
				}
			});
		}
		self.wake();
	}

	fn insert_node(&mut self, node: &EntityNode, x: f64, y: f64) {
		if self.ids.contains_key(&node.id) {
			return;
		}
		let idx = self.graph.add_node(NodeData {
			x: x as f32,
			y: y as f32,
			mass: 10.0,
			is_anchor: false,
			user_data: NodeInfo {
				id: node.id.clone(),
				label: node.label.clone(),
				central: node.is_central,
				expanded: node.expanded,
			},
		});
		self.ids.insert(node.id.clone(), idx);
	}

	fn insert_edge(&mut self, edge: &EntityEdge) {
		let (Some(&source), Some(&target)) = (self.ids.get(&edge.source), self.ids.get(&edge.target))
		else {
			return;
		};
		let lane = self
			.edges
			.iter()
			.filter(|e| {
				(e.source == source && e.target == target) || (e.source == target && e.target == source)
			})
			.count();
		if lane == 0 {
			self.graph.add_edge(source, target, EdgeData::default());
		}
		self.edges.push(SurfaceEdge {
			source,
			target,
			label: edge.label.clone(),
			lane,
		});
	}

	pub fn edges(&self) -> &[SurfaceEdge] {
		&self.edges
	}

	pub fn node_count(&self) -> usize {
		self.ids.len()
	}

	pub fn node_index(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.ids.get(id).copied()
	}

	pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f64, f64)> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	/// World positions of every node, keyed by simulation index.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, (f64, f64)> {
		let mut positions = HashMap::with_capacity(self.node_count());
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), (node.x() as f64, node.y() as f64));
		});
		positions
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<String> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.id.clone());
			}
		});
		found
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(&self, sx: f64, sy: f64, config: &ScaleConfig) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < scale.hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	/// Updates the hovered node. Returns whether it changed.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) -> bool {
		self.hover.set(node, &self.edges)
	}

	/// Zooms by `factor` keeping the screen point `(x, y)` fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Centers the graph and zooms so every node is visible.
	pub fn fit(&mut self) {
		let positions = self.positions();
		if positions.is_empty() {
			return;
		}
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in positions.values() {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}
		const PADDING: f64 = 60.0;
		let span_x = (max_x - min_x).max(1.0) + 2.0 * PADDING;
		let span_y = (max_y - min_y).max(1.0) + 2.0 * PADDING;
		let k = (self.width / span_x).min(self.height / span_y).clamp(0.1, 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - k * (min_x + max_x) / 2.0,
			y: self.height / 2.0 - k * (min_y + max_y) / 2.0,
			k,
		};
	}

	/// Restarts the physics for another settling period.
	pub fn wake(&mut self) {
		self.animation_running = true;
		self.settle_ticks = SETTLE_TICKS;
	}

	pub fn tick(&mut self, dt: f32) {
		if self.animation_running {
			self.graph.update(dt);
			self.settle_ticks = self.settle_ticks.saturating_sub(1);
			if self.settle_ticks == 0 {
				self.animation_running = false;
			}
		}
		self.hover.tick(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
