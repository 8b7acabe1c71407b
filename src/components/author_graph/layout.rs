//! Deterministic top-to-bottom layered layout.
//!
//! 1. Edges with an unknown endpoint are dropped.
//! 2. Cycles (mutual influence) are broken by reversing a greedy feedback arc
//!    set. Reversal only affects ranking; edges keep their real direction.
//! 3. Ranks come from the longest path from a source, so every edge points down.
//! 4. A few barycenter sweeps reorder each layer to reduce crossings.
//! 5. Each layer is centred on `x = 0`; boxes never overlap.
//!
//! Ties are always broken by input order, so the same graph always produces
//! the same positions.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use petgraph::Direction;
use petgraph::algo::feedback_arc_set::greedy_feedback_arc_set;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::{Layout, VisualEdge, VisualNode};
use crate::model::AuthorGraph;

pub const NODE_WIDTH: f64 = 180.0;
pub const NODE_HEIGHT: f64 = 80.0;
/// Horizontal gap between boxes in one layer.
pub const NODE_GAP: f64 = 60.0;
/// Vertical gap between layers.
pub const RANK_GAP: f64 = 80.0;

const SWEEPS: usize = 4;
const TITLE_LINE_CHARS: usize = 22;

/// Lay out `graph`.
pub fn layout(graph: &AuthorGraph) -> Layout {
	let mut index: HashMap<&str, usize> = HashMap::with_capacity(graph.nodes.len());
	let mut nodes = Vec::with_capacity(graph.nodes.len());
	for node in &graph.nodes {
		if index.contains_key(node.id.as_str()) {
			warn!("reading-graph: duplicate node id {:?}, keeping the first", node.id);
			continue;
		}
		index.insert(node.id.as_str(), nodes.len());
		nodes.push(VisualNode {
			id: node.id.clone(),
			node_type: node.node_type(),
			title: wrap_title(&node.label),
			year: node.kind.year_line(),
			x: 0.0,
			y: 0.0,
		});
	}

	let edges: Vec<VisualEdge> = graph
		.edges
		.iter()
		.filter_map(|edge| {
			match (
				index.get(edge.source.as_str()),
				index.get(edge.target.as_str()),
			) {
				(Some(&source), Some(&target)) => Some(VisualEdge {
					source,
					target,
					kind: edge.kind,
				}),
				_ => {
					debug!(
						"reading-graph: skipping edge {} -> {} with unknown endpoint",
						edge.source, edge.target
					);
					None
				}
			}
		})
		.collect();

	let ranks = assign_ranks(nodes.len(), &edges);
	let layers = order_layers(&ranks, &edges);
	for (rank, layer) in layers.iter().enumerate() {
		let count = layer.len() as f64;
		let width = count * NODE_WIDTH + (count - 1.0).max(0.0) * NODE_GAP;
		let left = -width / 2.0 + NODE_WIDTH / 2.0;
		for (slot, &node) in layer.iter().enumerate() {
			nodes[node].x = left + slot as f64 * (NODE_WIDTH + NODE_GAP);
			nodes[node].y = rank as f64 * (NODE_HEIGHT + RANK_GAP);
		}
	}

	Layout { nodes, edges }
}

fn assign_ranks(count: usize, edges: &[VisualEdge]) -> Vec<usize> {
	let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(count, edges.len());
	for _ in 0..count {
		graph.add_node(());
	}
	for edge in edges.iter().filter(|e| e.source != e.target) {
		graph.add_edge(NodeIndex::new(edge.source), NodeIndex::new(edge.target), ());
	}

	let reversed: HashSet<EdgeIndex> = greedy_feedback_arc_set(&graph).map(|e| e.id()).collect();
	let mut dag: DiGraph<(), ()> = DiGraph::with_capacity(count, graph.edge_count());
	for _ in 0..count {
		dag.add_node(());
	}
	for edge in graph.edge_references() {
		if reversed.contains(&edge.id()) {
			dag.add_edge(edge.target(), edge.source(), ());
		} else {
			dag.add_edge(edge.source(), edge.target(), ());
		}
	}

	let order = match toposort(&dag, None) {
		Ok(order) => order,
		Err(cycle) => {
			warn!(
				"reading-graph: cycle through node {} survived, using a flat layout",
				cycle.node_id().index()
			);
			return vec![0; count];
		}
	};

	let mut rank = vec![0usize; count];
	for idx in order {
		for next in dag.neighbors_directed(idx, Direction::Outgoing) {
			rank[next.index()] = rank[next.index()].max(rank[idx.index()] + 1);
		}
	}
	rank
}

fn order_layers(ranks: &[usize], edges: &[VisualEdge]) -> Vec<Vec<usize>> {
	let depth = ranks.iter().max().map_or(0, |r| r + 1);
	let mut layers: Vec<Vec<usize>> = vec![Vec::new(); depth];
	for (node, &rank) in ranks.iter().enumerate() {
		layers[rank].push(node);
	}

	// Neighbours in the layer directly above / below.
	let mut above: Vec<Vec<usize>> = vec![Vec::new(); ranks.len()];
	let mut below: Vec<Vec<usize>> = vec![Vec::new(); ranks.len()];
	for edge in edges {
		let (s, t) = (edge.source, edge.target);
		if ranks[s] + 1 == ranks[t] {
			below[s].push(t);
			above[t].push(s);
		} else if ranks[t] + 1 == ranks[s] {
			below[t].push(s);
			above[s].push(t);
		}
	}

	let mut position = vec![0.0; ranks.len()];
	for layer in &layers {
		for (slot, &node) in layer.iter().enumerate() {
			position[node] = slot as f64;
		}
	}

	for sweep in 0..SWEEPS {
		if sweep % 2 == 0 {
			for layer in layers.iter_mut().skip(1) {
				reorder(layer, &above, &mut position);
			}
		} else {
			for layer in layers.iter_mut().rev().skip(1) {
				reorder(layer, &below, &mut position);
			}
		}
	}
	layers
}

/// Sort one layer by the mean position of its neighbours in the fixed layer.
/// Nodes without such neighbours keep their current slot as key.
fn reorder(layer: &mut Vec<usize>, neighbours: &[Vec<usize>], position: &mut [f64]) {
	let mut keyed: Vec<(f64, usize)> = layer
		.iter()
		.map(|&node| {
			let adjacent = &neighbours[node];
			let key = if adjacent.is_empty() {
				position[node]
			} else {
				adjacent.iter().map(|&n| position[n]).sum::<f64>() / adjacent.len() as f64
			};
			(key, node)
		})
		.collect();
	keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
	*layer = keyed.into_iter().map(|(_, node)| node).collect();
	for (slot, &node) in layer.iter().enumerate() {
		position[node] = slot as f64;
	}
}

/// Wrap a title onto at most two lines, ellipsizing the rest.
pub fn wrap_title(title: &str) -> Vec<String> {
	let mut lines: Vec<String> = Vec::new();
	let mut current = String::new();
	let mut words = title.split_whitespace().peekable();

	while let Some(word) = words.next() {
		let candidate_len = current.chars().count()
			+ word.chars().count()
			+ usize::from(!current.is_empty());
		if candidate_len <= TITLE_LINE_CHARS || current.is_empty() {
			if !current.is_empty() {
				current.push(' ');
			}
			current.push_str(word);
			continue;
		}
		lines.push(std::mem::take(&mut current));
		current.push_str(word);
		if lines.len() == 1 && words.peek().is_some() {
			// Second line: take everything that is left and clip it.
			for rest in words.by_ref() {
				current.push(' ');
				current.push_str(rest);
			}
		}
	}
	if !current.is_empty() {
		lines.push(current);
	}

	lines
		.into_iter()
		.take(2)
		.map(|line| ellipsize(&line, TITLE_LINE_CHARS))
		.collect()
}

fn ellipsize(line: &str, max: usize) -> String {
	if line.chars().count() <= max {
		return line.to_string();
	}
	let mut clipped: String = line.chars().take(max - 1).collect();
	clipped.push('…');
	clipped
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{EdgeKind, GraphEdge, GraphNode, NodeKind, NodeType};

	fn author(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_uppercase(),
			kind: NodeKind::Author {
				birth_year: Some(1800),
				death_year: None,
			},
		}
	}

	fn book(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			label: id.to_uppercase(),
			kind: NodeKind::Book {
				publication_year: Some(1850),
			},
		}
	}

	fn edge(source: &str, target: &str, kind: EdgeKind) -> GraphEdge {
		GraphEdge {
			source: source.into(),
			target: target.into(),
			kind,
		}
	}

	fn sample() -> AuthorGraph {
		AuthorGraph {
			nodes: vec![
				author("austen"),
				book("emma"),
				book("persuasion"),
				author("burney"),
				author("bronte"),
				book("jane-eyre"),
			],
			edges: vec![
				edge("austen", "emma", EdgeKind::Wrote),
				edge("austen", "persuasion", EdgeKind::Wrote),
				edge("burney", "austen", EdgeKind::Influenced),
				edge("austen", "bronte", EdgeKind::Influenced),
				edge("bronte", "jane-eyre", EdgeKind::Wrote),
			],
		}
	}

	fn overlaps(a: &VisualNode, b: &VisualNode) -> bool {
		(a.x - b.x).abs() < NODE_WIDTH && (a.y - b.y).abs() < NODE_HEIGHT
	}

	#[test]
	fn every_valid_node_and_edge_is_rendered() {
		let graph = sample();
		let layout = layout(&graph);
		assert_eq!(layout.nodes.len(), graph.nodes.len());
		assert_eq!(layout.edges.len(), graph.edges.len());

		for (edge, visual) in graph.edges.iter().zip(&layout.edges) {
			assert_eq!(layout.nodes[visual.source].id, edge.source);
			assert_eq!(layout.nodes[visual.target].id, edge.target);
			assert_eq!(visual.kind, edge.kind);
		}
	}

	#[test]
	fn dangling_edges_are_dropped() {
		let mut graph = sample();
		graph.edges.push(edge("austen", "ghost", EdgeKind::Wrote));
		graph.edges.push(edge("nobody", "emma", EdgeKind::Influenced));

		let layout = layout(&graph);
		assert_eq!(layout.nodes.len(), 6);
		assert_eq!(layout.edges.len(), 5);
	}

	#[test]
	fn empty_graph_yields_empty_layout() {
		let layout = layout(&AuthorGraph::default());
		assert!(layout.nodes.is_empty());
		assert!(layout.edges.is_empty());
	}

	#[test]
	fn layout_is_deterministic() {
		assert_eq!(layout(&sample()), layout(&sample()));
	}

	#[test]
	fn boxes_never_overlap() {
		let layout = layout(&sample());
		for (i, a) in layout.nodes.iter().enumerate() {
			for b in &layout.nodes[i + 1..] {
				assert!(!overlaps(a, b), "{} overlaps {}", a.id, b.id);
			}
		}
	}

	#[test]
	fn edges_point_downwards_without_cycles() {
		let layout = layout(&sample());
		for edge in &layout.edges {
			assert!(layout.nodes[edge.source].y < layout.nodes[edge.target].y);
		}
	}

	#[test]
	fn mutual_influence_still_lays_out() {
		let graph = AuthorGraph {
			nodes: vec![author("a"), author("b"), author("c")],
			edges: vec![
				edge("a", "b", EdgeKind::Influenced),
				edge("b", "c", EdgeKind::Influenced),
				edge("c", "a", EdgeKind::Influenced),
				edge("a", "a", EdgeKind::Influenced),
			],
		};
		let layout = layout(&graph);
		assert_eq!(layout.edges.len(), 4);
		for (i, a) in layout.nodes.iter().enumerate() {
			for b in &layout.nodes[i + 1..] {
				assert!(!overlaps(a, b));
			}
		}
	}

	#[test]
	fn duplicate_ids_keep_first_node() {
		let graph = AuthorGraph {
			nodes: vec![author("a"), book("a")],
			edges: vec![],
		};
		let layout = layout(&graph);
		assert_eq!(layout.nodes.len(), 1);
		assert_eq!(layout.nodes[0].node_type, NodeType::Author);
	}

	#[test]
	fn node_labels_carry_years() {
		let layout = layout(&sample());
		assert_eq!(layout.nodes[0].year.as_deref(), Some("1800"));
		assert_eq!(layout.nodes[1].year.as_deref(), Some("1850"));
	}

	#[test]
	fn long_titles_wrap_to_two_lines() {
		assert_eq!(wrap_title("Emma"), vec!["Emma"]);
		assert_eq!(
			wrap_title("The Life and Opinions of Tristram Shandy, Gentleman"),
			vec!["The Life and Opinions", "of Tristram Shandy, G…"]
		);
		for line in wrap_title("Supercalifragilisticexpialidocious-and-then-some") {
			assert!(line.chars().count() <= TITLE_LINE_CHARS);
		}
	}
}
