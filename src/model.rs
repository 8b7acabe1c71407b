//! Domain types returned by the GraphQL API.
//!
//! Field names follow the API's camelCase wire format. Everything except the
//! identity fields is optional: the API fills in whatever its data sources know.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An author as returned by `searchAuthors` (partial) or `author` (full).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
	/// Stable API identifier.
	pub id: String,
	/// Full name; may be blank, see [`Author::display_name`].
	#[serde(default, deserialize_with = "null_as_empty")]
	pub name: String,
	/// Given name.
	#[serde(default)]
	pub first_name: Option<String>,
	/// Family name.
	#[serde(default)]
	pub last_name: Option<String>,
	/// Year of birth.
	#[serde(default)]
	pub birth_year: Option<i32>,
	/// Year of death.
	#[serde(default)]
	pub death_year: Option<i32>,
	/// Place of birth.
	#[serde(default)]
	pub birth_place: Option<String>,
	/// Place of death.
	#[serde(default)]
	pub death_place: Option<String>,
	/// Nationality as free text.
	#[serde(default)]
	pub nationality: Option<String>,
	/// Biography paragraph.
	#[serde(default, alias = "biography")]
	pub bio: Option<String>,
	/// Wikidata entity id, e.g. `Q36322`.
	#[serde(default)]
	pub wikidata_id: Option<String>,
	/// VIAF authority id.
	#[serde(default)]
	pub viaf_id: Option<String>,
	/// Full Wikipedia article URL.
	#[serde(default)]
	pub wikipedia_url: Option<String>,
}

impl Author {
	/// Name to show in headers. Falls back to the split name parts when the
	/// combined `name` is blank.
	pub fn display_name(&self) -> String {
		if !self.name.trim().is_empty() {
			return self.name.clone();
		}
		[self.first_name.as_deref(), self.last_name.as_deref()]
			.into_iter()
			.flatten()
			.map(str::trim)
			.filter(|part| !part.is_empty())
			.collect::<Vec<_>>()
			.join(" ")
	}

	/// `"1775 - 1817 • British"` style summary line, if anything is known.
	pub fn summary_line(&self) -> Option<String> {
		let parts: Vec<String> = [
			year_span(self.birth_year, self.death_year),
			present(&self.nationality).map(str::to_string),
		]
		.into_iter()
		.flatten()
		.collect();
		(!parts.is_empty()).then(|| parts.join(" • "))
	}
}

/// A topical tag attached to a book.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Subject {
	/// Tag text, also the query for `searchBooksBySubject`.
	pub name: String,
	/// Provenance of the tag (e.g. which catalogue supplied it).
	#[serde(default)]
	pub source: Option<String>,
}

/// A book as returned by `book` (full) or `searchBooksBySubject` (partial).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
	/// Stable API identifier.
	pub id: String,
	/// Book title.
	pub title: String,
	/// Year of first publication.
	#[serde(default)]
	pub publication_year: Option<i32>,
	/// When the book was read, as free text from the reading log.
	#[serde(default)]
	pub date_read: Option<String>,
	/// ISBN-13.
	#[serde(default)]
	pub isbn13: Option<String>,
	/// ISBN-10.
	#[serde(default)]
	pub isbn10: Option<String>,
	/// Open Library work id, e.g. `OL45804W`.
	#[serde(default)]
	pub openlibrary_id: Option<String>,
	/// Wikidata entity id.
	#[serde(default)]
	pub wikidata_id: Option<String>,
	/// Description paragraph.
	#[serde(default)]
	pub description: Option<String>,
	/// Cover image URL.
	#[serde(default)]
	pub cover_url: Option<String>,
	/// Subject tags in API order.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub subjects: Vec<Subject>,
}

/// Lower-cased node discriminator reported to click handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
	/// An author node.
	Author,
	/// A book node.
	Book,
}

impl NodeType {
	/// `"author"` or `"book"`.
	pub fn as_str(self) -> &'static str {
		match self {
			NodeType::Author => "author",
			NodeType::Book => "book",
		}
	}
}

impl fmt::Display for NodeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Per-variant node attributes.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	/// An author with an optional lifespan.
	Author {
		/// Year of birth.
		birth_year: Option<i32>,
		/// Year of death.
		death_year: Option<i32>,
	},
	/// A book with an optional publication year.
	Book {
		/// Year of first publication.
		publication_year: Option<i32>,
	},
}

impl NodeKind {
	/// Discriminator without the attributes.
	pub fn node_type(&self) -> NodeType {
		match self {
			NodeKind::Author { .. } => NodeType::Author,
			NodeKind::Book { .. } => NodeType::Book,
		}
	}

	/// Secondary label line: lifespan for authors, publication year for books.
	pub fn year_line(&self) -> Option<String> {
		match *self {
			NodeKind::Author {
				birth_year,
				death_year,
			} => year_span(birth_year, death_year),
			NodeKind::Book { publication_year } => publication_year.map(|y| y.to_string()),
		}
	}
}

/// A node of an [`AuthorGraph`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "WireNode")]
pub struct GraphNode {
	/// Author or book id; edges refer to nodes by it.
	pub id: String,
	/// Author name or book title.
	pub label: String,
	/// Type and year attributes.
	pub kind: NodeKind,
}

impl GraphNode {
	/// Shorthand for `self.kind.node_type()`.
	pub fn node_type(&self) -> NodeType {
		self.kind.node_type()
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum WireNodeType {
	Author,
	Book,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMetadata {
	#[serde(default)]
	birth_year: Option<i32>,
	#[serde(default)]
	death_year: Option<i32>,
	#[serde(default)]
	publication_year: Option<i32>,
}

#[derive(Deserialize)]
struct WireNode {
	id: String,
	#[serde(rename = "type")]
	node_type: WireNodeType,
	label: String,
	#[serde(default)]
	metadata: Option<WireMetadata>,
}

impl From<WireNode> for GraphNode {
	fn from(wire: WireNode) -> Self {
		let meta = wire.metadata.unwrap_or_default();
		let kind = match wire.node_type {
			WireNodeType::Author => NodeKind::Author {
				birth_year: meta.birth_year,
				death_year: meta.death_year,
			},
			WireNodeType::Book => NodeKind::Book {
				publication_year: meta.publication_year,
			},
		};
		GraphNode {
			id: wire.id,
			label: wire.label,
			kind,
		}
	}
}

/// Relation carried by a [`GraphEdge`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
	/// author -> book
	Wrote,
	/// author -> author
	Influenced,
}

impl EdgeKind {
	/// Lower-case text drawn on the edge.
	pub fn label(self) -> &'static str {
		match self {
			EdgeKind::Wrote => "wrote",
			EdgeKind::Influenced => "influenced",
		}
	}
}

/// A directed edge between two node ids.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphEdge {
	/// Id of the tail node.
	pub source: String,
	/// Id of the head node.
	pub target: String,
	/// Relation type.
	#[serde(rename = "type")]
	pub kind: EdgeKind,
}

/// Bounded-depth snapshot rooted at one author.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct AuthorGraph {
	/// Nodes in API order.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub nodes: Vec<GraphNode>,
	/// Edges in API order; may name ids missing from `nodes`.
	#[serde(default, deserialize_with = "null_as_empty")]
	pub edges: Vec<GraphEdge>,
}

impl AuthorGraph {
	/// True when there is nothing to draw.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Traversal radius for `authorGraph`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Depth {
	/// Direct neighbours only.
	#[default]
	One,
	/// Neighbours of neighbours.
	Two,
	/// Three hops out.
	Three,
}

impl Depth {
	/// Every depth, shallowest first.
	pub const ALL: [Depth; 3] = [Depth::One, Depth::Two, Depth::Three];

	/// Integer sent as the `depth` variable.
	pub fn value(self) -> u8 {
		match self {
			Depth::One => 1,
			Depth::Two => 2,
			Depth::Three => 3,
		}
	}
}

impl TryFrom<u8> for Depth {
	type Error = u8;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(Depth::One),
			2 => Ok(Depth::Two),
			3 => Ok(Depth::Three),
			other => Err(other),
		}
	}
}

impl Serialize for Depth {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u8(self.value())
	}
}

impl fmt::Display for Depth {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.value())
	}
}

/// Formats a lifespan: `"1775 - 1817"`, `"1775"`, `"? - 1817"` or nothing.
pub fn year_span(start: Option<i32>, end: Option<i32>) -> Option<String> {
	match (start, end) {
		(Some(s), Some(e)) => Some(format!("{s} - {e}")),
		(Some(s), None) => Some(s.to_string()),
		(None, Some(e)) => Some(format!("? - {e}")),
		(None, None) => None,
	}
}

/// Treats blank strings like absent ones.
pub fn present(value: &Option<String>) -> Option<&str> {
	value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Decodes `null` like a missing field.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: serde::Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn graph_nodes_decode_into_tagged_kinds() {
		let json = r#"{
			"nodes": [
				{"id": "a1", "type": "AUTHOR", "label": "Jane Austen",
				 "metadata": {"birthYear": 1775, "deathYear": 1817, "wikidata": "Q36322"}},
				{"id": "b1", "type": "BOOK", "label": "Emma",
				 "metadata": {"publicationYear": 1815}},
				{"id": "b2", "type": "BOOK", "label": "Sanditon"}
			],
			"edges": [
				{"source": "a1", "target": "b1", "type": "WROTE"}
			]
		}"#;
		let graph: AuthorGraph = serde_json::from_str(json).unwrap();

		assert_eq!(
			graph.nodes[0].kind,
			NodeKind::Author {
				birth_year: Some(1775),
				death_year: Some(1817)
			}
		);
		assert_eq!(graph.nodes[1].node_type(), NodeType::Book);
		assert_eq!(graph.nodes[1].kind.year_line().as_deref(), Some("1815"));
		assert_eq!(graph.nodes[2].kind.year_line(), None);
		assert_eq!(graph.edges[0].kind, EdgeKind::Wrote);
	}

	#[test]
	fn null_collections_become_empty() {
		let graph: AuthorGraph = serde_json::from_str(r#"{"nodes": null, "edges": null}"#).unwrap();
		assert!(graph.is_empty());

		let book: Book = serde_json::from_str(r#"{"id": "b", "title": "T", "subjects": null}"#).unwrap();
		assert!(book.subjects.is_empty());
	}

	#[test]
	fn author_accepts_biography_alias() {
		let author: Author =
			serde_json::from_str(r#"{"id": "a", "name": "N", "biography": "Born."}"#).unwrap();
		assert_eq!(author.bio.as_deref(), Some("Born."));
	}

	#[test]
	fn year_span_variants() {
		assert_eq!(year_span(Some(1775), Some(1817)).as_deref(), Some("1775 - 1817"));
		assert_eq!(year_span(Some(1947), None).as_deref(), Some("1947"));
		assert_eq!(year_span(None, Some(1616)).as_deref(), Some("? - 1616"));
		assert_eq!(year_span(None, None), None);
	}

	#[test]
	fn display_name_falls_back_to_parts() {
		let author = Author {
			first_name: Some("Jane".into()),
			last_name: Some("Austen".into()),
			..Default::default()
		};
		assert_eq!(author.display_name(), "Jane Austen");
	}

	#[test]
	fn null_name_falls_back_instead_of_failing() {
		let authors: Vec<Author> = serde_json::from_str(
			r#"[{"id": "a1", "name": null, "firstName": "Anne", "lastName": "Brontë"},
			{"id": "a2", "name": "Jane Austen"}]"#,
		)
		.unwrap();
		assert_eq!(authors.len(), 2);
		assert_eq!(authors[0].name, "");
		assert_eq!(authors[0].display_name(), "Anne Brontë");
		assert_eq!(authors[1].display_name(), "Jane Austen");

		let author: Author = serde_json::from_str(r#"{"id": "a3"}"#).unwrap();
		assert_eq!(author.display_name(), "");
	}

	#[test]
	fn summary_line_joins_known_parts() {
		let author = Author {
			birth_year: Some(1775),
			death_year: Some(1817),
			nationality: Some("British".into()),
			..Default::default()
		};
		assert_eq!(author.summary_line().as_deref(), Some("1775 - 1817 • British"));
		assert_eq!(Author::default().summary_line(), None);
	}

	#[test]
	fn depth_serializes_as_integer() {
		assert_eq!(serde_json::to_string(&Depth::Three).unwrap(), "3");
		assert_eq!(Depth::try_from(2), Ok(Depth::Two));
		assert_eq!(Depth::try_from(4), Err(4));
	}
}
