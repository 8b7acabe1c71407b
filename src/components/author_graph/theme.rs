//! Visual theming for the author graph.
//!
//! Authors and books each get a fixed fill/border pair; edge strokes depend on
//! the relation kind.

use crate::model::{EdgeKind, NodeType};

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

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors for one node type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeColors {
	pub fill: Color,
	pub border: Color,
	/// Minimap swatch.
	pub minimap: Color,
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Dot grid color.
	pub grid_color: Color,
	/// Dot spacing in world units.
	pub grid_spacing: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub wrote: Color,
	pub influenced: Color,
	pub label: Color,
	/// Backdrop behind edge labels so they stay legible over lines.
	pub label_background: Color,
}

/// Node box style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub author: NodeColors,
	pub book: NodeColors,
	pub corner_radius: f64,
	pub border_width: f64,
	pub title_color: Color,
	pub year_color: Color,
}

/// Minimap overlay style (screen space).
#[derive(Clone, Debug)]
pub struct MinimapStyle {
	pub width: f64,
	pub height: f64,
	pub margin: f64,
	pub background: Color,
	pub border: Color,
	pub viewport: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub minimap: MinimapStyle,
}

impl Theme {
	/// Light theme: blue authors, amber books, grey authorship and red influence.
	pub fn light() -> Self {
		Self {
			background: BackgroundStyle {
				color: Color::rgb(250, 250, 250),
				grid_color: Color::rgb(212, 212, 216),
				grid_spacing: 20.0,
			},
			edge: EdgeStyle {
				wrote: Color::rgb(107, 114, 128),
				influenced: Color::rgb(239, 68, 68),
				label: Color::rgb(102, 102, 102),
				label_background: Color::rgba(255, 255, 255, 0.9),
			},
			node: NodeStyle {
				author: NodeColors {
					fill: Color::rgb(219, 234, 254),
					border: Color::rgb(59, 130, 246),
					minimap: Color::rgb(59, 130, 246),
				},
				book: NodeColors {
					fill: Color::rgb(254, 243, 199),
					border: Color::rgb(245, 158, 11),
					minimap: Color::rgb(245, 158, 11),
				},
				corner_radius: 8.0,
				border_width: 2.0,
				title_color: Color::rgb(17, 24, 39),
				year_color: Color::rgb(107, 114, 128),
			},
			minimap: MinimapStyle {
				width: 200.0,
				height: 150.0,
				margin: 12.0,
				background: Color::rgba(255, 255, 255, 0.92),
				border: Color::rgb(209, 213, 219),
				viewport: Color::rgba(17, 24, 39, 0.12),
			},
		}
	}

	pub fn node_colors(&self, node_type: NodeType) -> NodeColors {
		match node_type {
			NodeType::Author => self.node.author,
			NodeType::Book => self.node.book,
		}
	}

	pub fn edge_color(&self, kind: EdgeKind) -> Color {
		match kind {
			EdgeKind::Wrote => self.edge.wrote,
			EdgeKind::Influenced => self.edge.influenced,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn node_types_are_distinguishable() {
		let theme = Theme::default();
		let (author, book) = (
			theme.node_colors(NodeType::Author),
			theme.node_colors(NodeType::Book),
		);
		assert_ne!(author.fill, book.fill);
		assert_ne!(author.border, book.border);
		assert_eq!(author.fill.to_css(), "#dbeafe");
		assert_eq!(book.border.to_css(), "#f59e0b");
	}

	#[test]
	fn edge_kinds_have_own_stroke() {
		let theme = Theme::default();
		assert_eq!(theme.edge_color(EdgeKind::Wrote).to_css(), "#6b7280");
		assert_eq!(theme.edge_color(EdgeKind::Influenced).to_css(), "#ef4444");
	}

	#[test]
	fn css_output_includes_alpha_when_translucent() {
		assert_eq!(Color::rgb(255, 0, 0).with_alpha(0.5).to_css(), "rgba(255, 0, 0, 0.5)");
		assert_eq!(Color::rgba(0, 0, 0, 1.0).to_css(), "#000000");
	}
}
