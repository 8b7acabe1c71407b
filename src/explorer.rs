//! Page state for the explorer, independent of the DOM.
//!
//! User actions mutate [`Explorer`] and may return a [`Command`] describing the
//! request to issue. The page runs the command and hands the outcome back via
//! the matching `resolve_*` method. Every command carries a [`Ticket`]; a lane
//! (search, graph, detail, subject) only accepts the response to its most
//! recently issued ticket, so the view always reflects the latest request no
//! matter in which order responses arrive.

use log::debug;

use crate::api::ClientError;
use crate::model::{Author, AuthorGraph, Book, Depth, NodeType};

/// Identifies one issued request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// A request the page must perform on behalf of the state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
	SearchAuthors {
		ticket: Ticket,
		query: String,
	},
	FetchGraph {
		ticket: Ticket,
		author_id: String,
		depth: Depth,
	},
	FetchAuthor {
		ticket: Ticket,
		id: String,
	},
	FetchBook {
		ticket: Ticket,
		id: String,
	},
	SearchBooksBySubject {
		ticket: Ticket,
		subject: String,
	},
}

impl Command {
	pub fn ticket(&self) -> Ticket {
		match *self {
			Command::SearchAuthors { ticket, .. }
			| Command::FetchGraph { ticket, .. }
			| Command::FetchAuthor { ticket, .. }
			| Command::FetchBook { ticket, .. }
			| Command::SearchBooksBySubject { ticket, .. } => ticket,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SearchState {
	#[default]
	Idle,
	Searching {
		ticket: Ticket,
	},
	Done {
		authors: Vec<Author>,
	},
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum GraphState {
	#[default]
	NoSelection,
	/// `previous` stays on screen until the new graph arrives.
	Loading {
		ticket: Ticket,
		previous: Option<AuthorGraph>,
	},
	Loaded(AuthorGraph),
	Failed(String),
}

/// Entity shown in the detail panel.
#[derive(Clone, Debug, PartialEq)]
pub enum Selection {
	Author(Author),
	Book(Book),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Panel {
	#[default]
	Closed,
	Open(Selection),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SubjectModal {
	#[default]
	Closed,
	Open { subject: String, books: Vec<Book> },
}

#[derive(Clone, Debug, Default)]
pub struct Explorer {
	next_ticket: u64,
	search: SearchState,
	selected: Option<Author>,
	depth: Depth,
	graph: GraphState,
	panel: Panel,
	pending_detail: Option<Ticket>,
	modal: SubjectModal,
	pending_subject: Option<(Ticket, String)>,
}

impl Explorer {
	pub fn new() -> Self {
		Self::default()
	}

	fn issue(&mut self) -> Ticket {
		self.next_ticket += 1;
		Ticket(self.next_ticket)
	}

	// --- search lane ---

	/// Start an author search. Blank input is ignored entirely.
	pub fn submit_search(&mut self, text: &str) -> Option<Command> {
		let query = text.trim();
		if query.is_empty() {
			return None;
		}
		let ticket = self.issue();
		self.search = SearchState::Searching { ticket };
		Some(Command::SearchAuthors {
			ticket,
			query: query.to_string(),
		})
	}

	/// Apply a search response. Failures degrade to an empty result list.
	pub fn resolve_search(
		&mut self,
		ticket: Ticket,
		result: Result<Vec<Author>, ClientError>,
	) -> bool {
		if !matches!(self.search, SearchState::Searching { ticket: t } if t == ticket) {
			return stale("search", ticket);
		}
		self.search = SearchState::Done {
			authors: result.unwrap_or_default(),
		};
		true
	}

	pub fn search(&self) -> &SearchState {
		&self.search
	}

	pub fn is_searching(&self) -> bool {
		matches!(self.search, SearchState::Searching { .. })
	}

	pub fn search_results(&self) -> &[Author] {
		match &self.search {
			SearchState::Done { authors, .. } => authors,
			_ => &[],
		}
	}

	// --- graph lane ---

	/// Make `author` the current selection and fetch its graph at the current depth.
	pub fn select_author(&mut self, author: Author) -> Command {
		let ticket = self.issue();
		let author_id = author.id.clone();
		self.selected = Some(author);
		self.graph = GraphState::Loading {
			ticket,
			previous: None,
		};
		Command::FetchGraph {
			ticket,
			author_id,
			depth: self.depth,
		}
	}

	/// Change depth and refetch the current author's graph, if any. The graph
	/// on screen is kept until the new one resolves.
	pub fn set_depth(&mut self, depth: Depth) -> Option<Command> {
		self.depth = depth;
		let author_id = self.selected.as_ref()?.id.clone();
		let ticket = self.issue();
		let previous = match std::mem::take(&mut self.graph) {
			GraphState::Loaded(graph) => Some(graph),
			GraphState::Loading { previous, .. } => previous,
			GraphState::NoSelection | GraphState::Failed(_) => None,
		};
		self.graph = GraphState::Loading { ticket, previous };
		Some(Command::FetchGraph {
			ticket,
			author_id,
			depth,
		})
	}

	/// Apply a graph response. Success replaces the graph wholesale; failure
	/// replaces it with the error message.
	pub fn resolve_graph(
		&mut self,
		ticket: Ticket,
		result: Result<AuthorGraph, ClientError>,
	) -> bool {
		match self.graph {
			GraphState::Loading { ticket: t, .. } if t == ticket => {}
			_ => return stale("graph", ticket),
		}
		self.graph = match result {
			Ok(graph) => GraphState::Loaded(graph),
			Err(e) => GraphState::Failed(e.to_string()),
		};
		true
	}

	pub fn selected_author(&self) -> Option<&Author> {
		self.selected.as_ref()
	}

	pub fn depth(&self) -> Depth {
		self.depth
	}

	/// Graph currently on screen, including the one kept during a reload.
	pub fn displayed_graph(&self) -> Option<&AuthorGraph> {
		match &self.graph {
			GraphState::Loaded(graph) => Some(graph),
			GraphState::Loading { previous, .. } => previous.as_ref(),
			GraphState::NoSelection | GraphState::Failed(_) => None,
		}
	}

	pub fn is_graph_loading(&self) -> bool {
		matches!(self.graph, GraphState::Loading { .. })
	}

	pub fn graph_error(&self) -> Option<&str> {
		match &self.graph {
			GraphState::Failed(message) => Some(message),
			_ => None,
		}
	}

	// --- detail lane ---

	/// Fetch details for a clicked graph node.
	pub fn node_clicked(&mut self, id: &str, node_type: NodeType) -> Command {
		let ticket = self.issue();
		self.pending_detail = Some(ticket);
		let id = id.to_string();
		match node_type {
			NodeType::Author => Command::FetchAuthor { ticket, id },
			NodeType::Book => Command::FetchBook { ticket, id },
		}
	}

	/// Apply a detail response. On failure the panel is left as it was.
	pub fn resolve_detail(
		&mut self,
		ticket: Ticket,
		result: Result<Selection, ClientError>,
	) -> bool {
		if self.pending_detail != Some(ticket) {
			return stale("detail", ticket);
		}
		self.pending_detail = None;
		if let Ok(selection) = result {
			self.panel = Panel::Open(selection);
		}
		true
	}

	/// Close the panel and forget any detail fetch still in flight.
	pub fn close_panel(&mut self) {
		self.panel = Panel::Closed;
		self.pending_detail = None;
	}

	pub fn panel(&self) -> &Panel {
		&self.panel
	}

	// --- subject lane ---

	/// Search books sharing `subject`, opened from a tag in the detail panel.
	pub fn subject_clicked(&mut self, subject: &str) -> Command {
		let ticket = self.issue();
		self.pending_subject = Some((ticket, subject.to_string()));
		Command::SearchBooksBySubject {
			ticket,
			subject: subject.to_string(),
		}
	}

	/// Apply a subject search. On failure the modal does not open.
	pub fn resolve_subject(
		&mut self,
		ticket: Ticket,
		result: Result<Vec<Book>, ClientError>,
	) -> bool {
		let subject = match self.pending_subject.take() {
			Some((t, subject)) if t == ticket => subject,
			other => {
				self.pending_subject = other;
				return stale("subject", ticket);
			}
		};
		if let Ok(books) = result {
			self.modal = SubjectModal::Open { subject, books };
		}
		true
	}

	/// A book row was picked in the modal: close it and load the book into the panel.
	pub fn book_picked(&mut self, book_id: &str) -> Command {
		self.close_modal();
		self.node_clicked(book_id, NodeType::Book)
	}

	pub fn close_modal(&mut self) {
		self.modal = SubjectModal::Closed;
		self.pending_subject = None;
	}

	pub fn modal(&self) -> &SubjectModal {
		&self.modal
	}
}

fn stale(lane: &str, ticket: Ticket) -> bool {
	debug!("reading-graph: dropping stale {} response {:?}", lane, ticket);
	false
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{EdgeKind, GraphEdge, GraphNode, NodeKind};

	fn author(id: &str, name: &str) -> Author {
		Author {
			id: id.into(),
			name: name.into(),
			..Default::default()
		}
	}

	fn single_node_graph(id: &str) -> AuthorGraph {
		AuthorGraph {
			nodes: vec![GraphNode {
				id: id.into(),
				label: id.into(),
				kind: NodeKind::Author {
					birth_year: None,
					death_year: None,
				},
			}],
			edges: vec![],
		}
	}

	fn graph_ticket(cmd: &Command) -> Ticket {
		match cmd {
			Command::FetchGraph { ticket, .. } => *ticket,
			other => panic!("expected graph fetch, got {other:?}"),
		}
	}

	#[test]
	fn blank_search_issues_nothing() {
		let mut explorer = Explorer::new();
		assert_eq!(explorer.submit_search(""), None);
		assert_eq!(explorer.submit_search("   \t"), None);
		assert_eq!(explorer.search(), &SearchState::Idle);
	}

	#[test]
	fn search_trims_and_populates_results() {
		let mut explorer = Explorer::new();
		let cmd = explorer.submit_search("  austen ").unwrap();
		let Command::SearchAuthors { ticket, query } = cmd else {
			panic!("expected search");
		};
		assert_eq!(query, "austen");
		assert!(explorer.is_searching());

		assert!(explorer.resolve_search(ticket, Ok(vec![author("a1", "Jane Austen")])));
		assert_eq!(explorer.search_results().len(), 1);
	}

	#[test]
	fn failed_search_resets_results() {
		let mut explorer = Explorer::new();
		let ticket = explorer.submit_search("austen").unwrap().ticket();
		explorer.resolve_search(ticket, Err(ClientError::Status(500)));
		assert!(explorer.search_results().is_empty());
		assert!(matches!(explorer.search(), SearchState::Done { .. }));
	}

	#[test]
	fn older_search_response_is_dropped() {
		let mut explorer = Explorer::new();
		let first = explorer.submit_search("aus").unwrap().ticket();
		let second = explorer.submit_search("austen").unwrap().ticket();
		assert!(!explorer.resolve_search(first, Ok(vec![author("x", "Stale")])));
		assert!(explorer.resolve_search(second, Ok(vec![author("a1", "Jane Austen")])));
		assert_eq!(explorer.search_results()[0].id, "a1");
	}

	#[test]
	fn selecting_author_fetches_at_default_depth() {
		let mut explorer = Explorer::new();
		let cmd = explorer.select_author(author("a1", "Jane Austen"));
		assert!(matches!(
			cmd,
			Command::FetchGraph { ref author_id, depth: Depth::One, .. } if author_id == "a1"
		));
		assert!(explorer.is_graph_loading());
		assert_eq!(explorer.displayed_graph(), None);
	}

	#[test]
	fn depth_change_refetches_and_replaces_graph() {
		let mut explorer = Explorer::new();
		let first = graph_ticket(&explorer.select_author(author("austen", "Jane Austen")));
		explorer.resolve_graph(first, Ok(single_node_graph("depth-1")));

		let cmd = explorer.set_depth(Depth::Three).unwrap();
		assert!(matches!(
			cmd,
			Command::FetchGraph { ref author_id, depth: Depth::Three, .. } if author_id == "austen"
		));
		// The old graph stays visible while the new one loads.
		assert_eq!(explorer.displayed_graph(), Some(&single_node_graph("depth-1")));

		let mut deeper = single_node_graph("depth-3");
		deeper.edges.push(GraphEdge {
			source: "depth-3".into(),
			target: "depth-3".into(),
			kind: EdgeKind::Influenced,
		});
		assert!(explorer.resolve_graph(graph_ticket(&cmd), Ok(deeper.clone())));
		assert_eq!(&explorer.graph, &GraphState::Loaded(deeper));
		assert_eq!(explorer.depth(), Depth::Three);
	}

	#[test]
	fn depth_change_without_author_only_records_depth() {
		let mut explorer = Explorer::new();
		assert_eq!(explorer.set_depth(Depth::Two), None);
		assert_eq!(explorer.depth(), Depth::Two);
		assert_eq!(&explorer.graph, &GraphState::NoSelection);
	}

	#[test]
	fn graph_failure_replaces_display_with_error() {
		let mut explorer = Explorer::new();
		let first = graph_ticket(&explorer.select_author(author("a1", "A")));
		explorer.resolve_graph(first, Ok(single_node_graph("a1")));

		let retry = graph_ticket(&explorer.set_depth(Depth::Two).unwrap());
		explorer.resolve_graph(retry, Err(ClientError::GraphQl("depth too large".into())));
		assert_eq!(explorer.displayed_graph(), None);
		assert_eq!(explorer.graph_error(), Some("depth too large"));
	}

	#[test]
	fn latest_requested_author_wins_regardless_of_arrival_order() {
		let mut explorer = Explorer::new();
		let a = graph_ticket(&explorer.select_author(author("a", "A")));
		let b = graph_ticket(&explorer.select_author(author("b", "B")));

		assert!(explorer.resolve_graph(b, Ok(single_node_graph("b"))));
		assert!(!explorer.resolve_graph(a, Ok(single_node_graph("a"))));

		assert_eq!(explorer.displayed_graph(), Some(&single_node_graph("b")));
		assert_eq!(explorer.selected_author().map(|a| a.id.as_str()), Some("b"));
	}

	#[test]
	fn node_click_opens_panel_on_success_only() {
		let mut explorer = Explorer::new();
		let cmd = explorer.node_clicked("b1", NodeType::Book);
		assert!(matches!(cmd, Command::FetchBook { ref id, .. } if id == "b1"));
		explorer.resolve_detail(cmd.ticket(), Err(ClientError::MissingData("book")));
		assert_eq!(explorer.panel(), &Panel::Closed);

		let cmd = explorer.node_clicked("a1", NodeType::Author);
		assert!(matches!(cmd, Command::FetchAuthor { .. }));
		let selection = Selection::Author(author("a1", "Jane Austen"));
		explorer.resolve_detail(cmd.ticket(), Ok(selection.clone()));
		assert_eq!(explorer.panel(), &Panel::Open(selection));
	}

	#[test]
	fn closing_panel_discards_inflight_detail() {
		let mut explorer = Explorer::new();
		let ticket = explorer.node_clicked("a1", NodeType::Author).ticket();
		explorer.close_panel();
		assert!(!explorer.resolve_detail(ticket, Ok(Selection::Author(author("a1", "A")))));
		assert_eq!(explorer.panel(), &Panel::Closed);
	}

	#[test]
	fn subject_click_searches_and_opens_modal() {
		let mut explorer = Explorer::new();
		let cmd = explorer.subject_clicked("World War II");
		assert!(matches!(
			cmd,
			Command::SearchBooksBySubject { ref subject, .. } if subject == "World War II"
		));
		explorer.resolve_subject(cmd.ticket(), Ok(vec![]));
		assert_eq!(
			explorer.modal(),
			&SubjectModal::Open {
				subject: "World War II".into(),
				books: vec![]
			}
		);
	}

	#[test]
	fn failed_subject_search_keeps_modal_closed() {
		let mut explorer = Explorer::new();
		let ticket = explorer.subject_clicked("Whaling").ticket();
		explorer.resolve_subject(ticket, Err(ClientError::Status(502)));
		assert_eq!(explorer.modal(), &SubjectModal::Closed);
	}

	#[test]
	fn picking_book_closes_modal_and_fetches_book() {
		let mut explorer = Explorer::new();
		let ticket = explorer.subject_clicked("Whaling").ticket();
		explorer.resolve_subject(
			ticket,
			Ok(vec![Book {
				id: "moby".into(),
				title: "Moby-Dick".into(),
				..Default::default()
			}]),
		);

		let cmd = explorer.book_picked("moby");
		assert_eq!(explorer.modal(), &SubjectModal::Closed);
		assert!(matches!(cmd, Command::FetchBook { ref id, .. } if id == "moby"));

		let book = Book {
			id: "moby".into(),
			title: "Moby-Dick".into(),
			..Default::default()
		};
		explorer.resolve_detail(cmd.ticket(), Ok(Selection::Book(book.clone())));
		assert_eq!(explorer.panel(), &Panel::Open(Selection::Book(book)));
	}

	#[test]
	fn tickets_increase_across_lanes() {
		let mut explorer = Explorer::new();
		let a = explorer.submit_search("x").unwrap().ticket();
		let b = explorer.subject_clicked("y").ticket();
		let c = explorer.node_clicked("z", NodeType::Author).ticket();
		assert!(a < b && b < c);
	}
}
