//! Renderable graph elements produced by the layout pass.

use super::layout::{NODE_HEIGHT, NODE_WIDTH};
use crate::model::{EdgeKind, NodeType};

/// Payload of a node click: the node's id and its lower-cased type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeClick {
	/// Id of the clicked author or book.
	pub id: String,
	/// Whether the node is an author or a book.
	pub node_type: NodeType,
}

/// A positioned node box. `x`/`y` are the box centre in world coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualNode {
	pub id: String,
	pub node_type: NodeType,
	/// Title wrapped to at most two lines.
	pub title: Vec<String>,
	/// Lifespan or publication year, when known.
	pub year: Option<String>,
	pub x: f64,
	pub y: f64,
}

/// A directed edge between two entries of [`Layout::nodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisualEdge {
	pub source: usize,
	pub target: usize,
	pub kind: EdgeKind,
}

impl VisualEdge {
	/// Relation text drawn at the edge midpoint.
	pub fn label(&self) -> &'static str {
		self.kind.label()
	}

	/// Influence edges get the flowing dash animation.
	pub fn animated(&self) -> bool {
		self.kind == EdgeKind::Influenced
	}

	pub fn is_self_loop(&self) -> bool {
		self.source == self.target
	}
}

/// Axis-aligned bounding box in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	/// Box of one node centred at `(x, y)`.
	pub fn node_box(x: f64, y: f64) -> Self {
		Self {
			min_x: x - NODE_WIDTH / 2.0,
			min_y: y - NODE_HEIGHT / 2.0,
			max_x: x + NODE_WIDTH / 2.0,
			max_y: y + NODE_HEIGHT / 2.0,
		}
	}

	/// Smallest box around node boxes centred at `centres`; `None` when empty.
	pub fn enclosing(centres: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
		centres.into_iter().map(|(x, y)| Self::node_box(x, y)).reduce(|a, b| Self {
			min_x: a.min_x.min(b.min_x),
			min_y: a.min_y.min(b.min_y),
			max_x: a.max_x.max(b.max_x),
			max_y: a.max_y.max(b.max_y),
		})
	}

	pub fn width(&self) -> f64 {
		self.max_x - self.min_x
	}

	pub fn height(&self) -> f64 {
		self.max_y - self.min_y
	}

	pub fn center(&self) -> (f64, f64) {
		(
			(self.min_x + self.max_x) / 2.0,
			(self.min_y + self.max_y) / 2.0,
		)
	}
}

/// Output of [`super::layout::layout`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layout {
	pub nodes: Vec<VisualNode>,
	pub edges: Vec<VisualEdge>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_influence_edges_animate() {
		let wrote = VisualEdge {
			source: 0,
			target: 1,
			kind: EdgeKind::Wrote,
		};
		let influenced = VisualEdge {
			kind: EdgeKind::Influenced,
			..wrote
		};
		assert!(!wrote.animated());
		assert!(influenced.animated());
		assert_eq!(wrote.label(), EdgeKind::Wrote.label());
		assert!(!wrote.is_self_loop());
		assert!(VisualEdge { target: 0, ..wrote }.is_self_loop());
	}
}
