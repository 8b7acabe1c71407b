//! Scene state and interaction tracking.
//!
//! Laid-out nodes are loaded into a `force_graph` graph as anchored nodes: the
//! physics never moves them, only the user does by dragging. The scene also
//! owns the pan/zoom transform, the current pointer gesture, and hover
//! highlight intensities.

use std::collections::{HashMap, HashSet};

use force_graph::{DefaultNodeIdx, ForceGraph, Node, NodeData, SimulationParameters};

use super::layout::{NODE_HEIGHT, NODE_WIDTH, layout};
use super::scale::ScaleConfig;
use super::types::{Bounds, Layout, NodeClick, VisualEdge};
use crate::model::{AuthorGraph, NodeType};

/// Pointer travel (screen px) below which a press/release counts as a click.
const CLICK_SLOP: f64 = 4.0;
/// Screen padding kept around the graph by [`GraphScene::fit_view`].
const FIT_PADDING: f64 = 40.0;
/// Fit view never zooms in past 100%.
const FIT_MAX_ZOOM: f64 = 1.0;

/// Per-node display data attached to each simulation node.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	pub id: String,
	pub node_type: NodeType,
	pub title: Vec<String>,
	pub year: Option<String>,
}

/// A directed edge between two scene nodes.
#[derive(Clone, Copy, Debug)]
pub struct SceneEdge {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub edge: VisualEdge,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

/// Pointer gesture in progress.
#[derive(Clone, Debug, Default)]
pub enum Gesture {
	#[default]
	Idle,
	/// Pressed on a node; becomes a drag once the pointer leaves the click slop.
	Node {
		idx: DefaultNodeIdx,
		start_x: f64,
		start_y: f64,
		node_start_x: f32,
		node_start_y: f32,
		moved: bool,
	},
	/// Pressed on the background; panning.
	Pan {
		start_x: f64,
		start_y: f64,
		transform_start_x: f64,
		transform_start_y: f64,
	},
}

/// Smoothly animated hover highlight for a node and its neighbours.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	pub hovered_node: Option<DefaultNodeIdx>,
	target_set: HashSet<DefaultNodeIdx>,
	node_intensity: HashMap<DefaultNodeIdx, f64>,
	cached_max: f64,
}

impl HighlightState {
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>, edges: &[SceneEdge]) {
		if self.hovered_node == node {
			return;
		}
		self.hovered_node = node;
		self.target_set.clear();
		if let Some(idx) = node {
			self.target_set.insert(idx);
			for edge in edges {
				if edge.source == idx {
					self.target_set.insert(edge.target);
				} else if edge.target == idx {
					self.target_set.insert(edge.source);
				}
			}
		}
	}

	/// Exponential smoothing towards 1.0 for targeted nodes, decay otherwise.
	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 8.0;
		const FADE_OUT_SPEED: f64 = 5.0;
		let fade_in = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.target_set {
			let intensity = self.node_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in;
		}

		let mut new_max: f64 = 0.0;
		self.node_intensity.retain(|idx, intensity| {
			if !self.target_set.contains(idx) {
				*intensity *= fade_out;
			}
			new_max = new_max.max(*intensity);
			*intensity > 0.005
		});
		self.cached_max = new_max;
	}

	pub fn node_intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.node_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	pub fn edge_intensity(&self, a: DefaultNodeIdx, b: DefaultNodeIdx) -> f64 {
		(self.node_intensity(a) * self.node_intensity(b)).sqrt()
	}

	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}
}

/// Everything the renderer and the event handlers share.
pub struct GraphScene {
	pub graph: ForceGraph<NodeInfo>,
	pub transform: ViewTransform,
	pub gesture: Gesture,
	pub highlight: HighlightState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	/// Edges live outside `graph`: its undirected storage merges a->b with b->a.
	pub edges: Vec<SceneEdge>,
}

impl GraphScene {
	/// Lay out `graph` and fit it into a `width` x `height` viewport.
	pub fn from_graph(graph: &AuthorGraph, width: f64, height: f64) -> Self {
		Self::new(&layout(graph), width, height)
	}

	pub fn new(layout: &Layout, width: f64, height: f64) -> Self {
		// Inert: every node is an anchor and `update` is never called.
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		let indices: Vec<DefaultNodeIdx> = layout
			.nodes
			.iter()
			.map(|node| {
				graph.add_node(NodeData {
					x: node.x as f32,
					y: node.y as f32,
					mass: 10.0,
					is_anchor: true,
					user_data: NodeInfo {
						id: node.id.clone(),
						node_type: node.node_type,
						title: node.title.clone(),
						year: node.year.clone(),
					},
				})
			})
			.collect();

		let edges = layout
			.edges
			.iter()
			.map(|edge| SceneEdge {
				source: indices[edge.source],
				target: indices[edge.target],
				edge: *edge,
			})
			.collect();

		let mut scene = Self {
			graph,
			transform: ViewTransform::default(),
			gesture: Gesture::Idle,
			highlight: HighlightState::default(),
			width,
			height,
			flow_time: 0.0,
			edges,
		};
		scene.fit_view();
		scene
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost node whose box contains the screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = ((node.x() as f64 - gx).abs(), (node.y() as f64 - gy).abs());
			if dx <= NODE_WIDTH / 2.0 && dy <= NODE_HEIGHT / 2.0 {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node(&self, idx: DefaultNodeIdx) -> Option<&Node<NodeInfo>> {
		self.graph.get_graph().node_weight(idx)
	}

	fn click_payload(&self, idx: DefaultNodeIdx) -> Option<NodeClick> {
		let info = &self.node(idx)?.data.user_data;
		Some(NodeClick {
			id: info.id.clone(),
			node_type: info.node_type,
		})
	}

	fn node_position(&self, idx: DefaultNodeIdx) -> Option<(f32, f32)> {
		self.node(idx).map(|node| (node.x(), node.y()))
	}

	/// Pointer pressed at screen point.
	pub fn press(&mut self, sx: f64, sy: f64) {
		self.gesture = match self
			.node_at_position(sx, sy)
			.and_then(|idx| Some((idx, self.node_position(idx)?)))
		{
			Some((idx, (nx, ny))) => Gesture::Node {
				idx,
				start_x: sx,
				start_y: sy,
				node_start_x: nx,
				node_start_y: ny,
				moved: false,
			},
			None => Gesture::Pan {
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			},
		};
	}

	/// Pointer moved: drag a node, pan, or just update hover.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) {
		if matches!(self.gesture, Gesture::Idle) {
			let hovered = self.node_at_position(sx, sy);
			self.highlight.set_hover(hovered, &self.edges);
			return;
		}
		match &mut self.gesture {
			Gesture::Idle => {}
			Gesture::Node {
				idx,
				start_x,
				start_y,
				node_start_x,
				node_start_y,
				moved,
			} => {
				let (dx, dy) = (sx - *start_x, sy - *start_y);
				if !*moved && dx.hypot(dy) < CLICK_SLOP {
					return;
				}
				*moved = true;
				let k = self.transform.k;
				let (nx, ny) = (
					*node_start_x + (dx / k) as f32,
					*node_start_y + (dy / k) as f32,
				);
				let idx = *idx;
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.x = nx;
						node.data.y = ny;
					}
				});
			}
			Gesture::Pan {
				start_x,
				start_y,
				transform_start_x,
				transform_start_y,
			} => {
				self.transform.x = *transform_start_x + (sx - *start_x);
				self.transform.y = *transform_start_y + (sy - *start_y);
			}
		}
	}

	/// Pointer released. Returns the clicked node if the press never turned
	/// into a drag.
	pub fn release(&mut self) -> Option<NodeClick> {
		match std::mem::take(&mut self.gesture) {
			Gesture::Node {
				idx, moved: false, ..
			} => self.click_payload(idx),
			_ => None,
		}
	}

	/// Pointer left the canvas: abandon the gesture and clear hover.
	pub fn leave(&mut self) {
		self.gesture = Gesture::Idle;
		self.highlight.set_hover(None, &self.edges);
	}

	/// Zoom by `factor`, keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, config: &ScaleConfig) {
		let new_k = (self.transform.k * factor).clamp(config.min_zoom, config.max_zoom);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Zoom around the viewport centre.
	pub fn zoom_by(&mut self, factor: f64, config: &ScaleConfig) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor, config);
	}

	/// Bounding box of the current node positions.
	pub fn bounds(&self) -> Option<Bounds> {
		let mut centres = Vec::with_capacity(self.graph.get_graph().node_count());
		self.graph
			.visit_nodes(|node| centres.push((node.x() as f64, node.y() as f64)));
		Bounds::enclosing(centres)
	}

	/// Centre the graph and zoom so it fits the viewport.
	pub fn fit_view(&mut self) {
		let Some(bounds) = self.bounds() else {
			self.transform = ViewTransform {
				x: self.width / 2.0,
				y: self.height / 2.0,
				k: 1.0,
			};
			return;
		};
		let avail_w = (self.width - 2.0 * FIT_PADDING).max(1.0);
		let avail_h = (self.height - 2.0 * FIT_PADDING).max(1.0);
		let k = (avail_w / bounds.width())
			.min(avail_h / bounds.height())
			.clamp(ScaleConfig::default().min_zoom, FIT_MAX_ZOOM);
		let (cx, cy) = bounds.center();
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		self.highlight.tick(dt);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{EdgeKind, GraphEdge, GraphNode, NodeKind};

	fn sample() -> AuthorGraph {
		AuthorGraph {
			nodes: vec![
				GraphNode {
					id: "austen".into(),
					label: "Jane Austen".into(),
					kind: NodeKind::Author {
						birth_year: Some(1775),
						death_year: Some(1817),
					},
				},
				GraphNode {
					id: "emma".into(),
					label: "Emma".into(),
					kind: NodeKind::Book {
						publication_year: Some(1815),
					},
				},
			],
			edges: vec![
				GraphEdge {
					source: "austen".into(),
					target: "emma".into(),
					kind: EdgeKind::Wrote,
				},
				GraphEdge {
					source: "austen".into(),
					target: "missing".into(),
					kind: EdgeKind::Influenced,
				},
			],
		}
	}

	fn graph_to_screen(scene: &GraphScene, gx: f64, gy: f64) -> (f64, f64) {
		let t = &scene.transform;
		(gx * t.k + t.x, gy * t.k + t.y)
	}

	fn screen_pos(scene: &GraphScene, id: &str) -> (f64, f64) {
		let mut pos = None;
		scene.graph.visit_nodes(|node| {
			if node.data.user_data.id == id {
				pos = Some(graph_to_screen(scene, node.x() as f64, node.y() as f64));
			}
		});
		pos.expect("node present")
	}

	fn node_count(scene: &GraphScene) -> usize {
		scene.graph.get_graph().node_count()
	}

	#[test]
	fn scene_holds_valid_nodes_and_edges_only() {
		let scene = GraphScene::from_graph(&sample(), 800.0, 600.0);
		assert_eq!(node_count(&scene), 2);
		assert_eq!(scene.edges.len(), 1);
	}

	#[test]
	fn reverse_and_self_loop_edges_are_all_kept() {
		let mut graph = sample();
		graph.edges.push(GraphEdge {
			source: "emma".into(),
			target: "austen".into(),
			kind: EdgeKind::Influenced,
		});
		graph.edges.push(GraphEdge {
			source: "austen".into(),
			target: "austen".into(),
			kind: EdgeKind::Influenced,
		});
		let scene = GraphScene::from_graph(&graph, 800.0, 600.0);
		assert_eq!(scene.edges.len(), 3);
		assert_eq!(scene.edges.iter().filter(|e| e.edge.is_self_loop()).count(), 1);
		let self_loop = scene.edges.iter().find(|e| e.edge.is_self_loop()).unwrap();
		assert_eq!(self_loop.source, self_loop.target);
	}

	#[test]
	fn click_reports_id_and_lowercase_type() {
		let mut scene = GraphScene::from_graph(&sample(), 800.0, 600.0);
		let (x, y) = screen_pos(&scene, "emma");
		scene.press(x, y);
		scene.pointer_move(x + 1.0, y);
		let click = scene.release().expect("click");
		assert_eq!(click.id, "emma");
		assert_eq!(click.node_type.as_str(), "book");
	}

	#[test]
	fn dragging_moves_node_without_clicking() {
		let mut scene = GraphScene::from_graph(&sample(), 800.0, 600.0);
		let (x, y) = screen_pos(&scene, "austen");
		scene.press(x, y);
		scene.pointer_move(x + 50.0, y + 20.0);
		assert_eq!(scene.release(), None);

		let (nx, ny) = screen_pos(&scene, "austen");
		assert!((nx - (x + 50.0)).abs() < 0.5);
		assert!((ny - (y + 20.0)).abs() < 0.5);
	}

	#[test]
	fn background_drag_pans() {
		let mut scene = GraphScene::from_graph(&sample(), 800.0, 600.0);
		let before = scene.transform.clone();
		scene.press(2.0, 2.0);
		scene.pointer_move(32.0, 12.0);
		assert_eq!(scene.release(), None);
		assert_eq!(scene.transform.x, before.x + 30.0);
		assert_eq!(scene.transform.y, before.y + 10.0);
	}

	#[test]
	fn fit_view_keeps_graph_inside_viewport() {
		let scene = GraphScene::from_graph(&sample(), 800.0, 600.0);
		let bounds = scene.bounds().unwrap();
		let (left, top) = graph_to_screen(&scene, bounds.min_x, bounds.min_y);
		let (right, bottom) = graph_to_screen(&scene, bounds.max_x, bounds.max_y);
		assert!(left >= 0.0 && top >= 0.0);
		assert!(right <= 800.0 && bottom <= 600.0);
	}

	#[test]
	fn empty_scene_is_inert() {
		let mut scene = GraphScene::from_graph(&AuthorGraph::default(), 800.0, 600.0);
		assert_eq!(node_count(&scene), 0);
		assert_eq!(scene.bounds(), None);
		scene.press(400.0, 300.0);
		assert_eq!(scene.release(), None);
		scene.tick(0.016);
	}

	#[test]
	fn zoom_is_clamped() {
		let config = ScaleConfig::default();
		let mut scene = GraphScene::from_graph(&sample(), 800.0, 600.0);
		for _ in 0..100 {
			scene.zoom_by(1.5, &config);
		}
		assert_eq!(scene.transform.k, config.max_zoom);
		for _ in 0..100 {
			scene.zoom_by(0.5, &config);
		}
		assert_eq!(scene.transform.k, config.min_zoom);
	}

	#[test]
	fn hover_highlights_neighbours() {
		let mut scene = GraphScene::from_graph(&sample(), 800.0, 600.0);
		let (x, y) = screen_pos(&scene, "austen");
		scene.pointer_move(x, y);
		for _ in 0..30 {
			scene.tick(0.016);
		}
		assert!(scene.highlight.max_intensity() > 0.9);

		scene.leave();
		for _ in 0..200 {
			scene.tick(0.016);
		}
		assert_eq!(scene.highlight.max_intensity(), 0.0);
	}
}
