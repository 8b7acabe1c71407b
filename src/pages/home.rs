//! Explorer page: search, author graph, detail panel and subject modal.
//!
//! All state lives in one [`Explorer`] signal. Event handlers feed user actions
//! into it and hand any resulting [`Command`] to [`dispatch`], which performs
//! the request on the local task queue and reports the outcome back.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};

use crate::api::{ClientError, GraphQlClient};
use crate::components::author_graph::{AuthorGraphView, NodeClick, Theme};
use crate::components::detail_panel::DetailPanel;
use crate::components::subject_modal::SubjectModal as SubjectModalView;
use crate::config::AppConfig;
use crate::explorer::{Command, Explorer, Panel, SearchState, Selection, SubjectModal};
use crate::model::{Author, Depth, NodeType, present};

type Client = StoredValue<GraphQlClient, LocalStorage>;

const CARD: &str = "background: white; border-radius: 8px; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1); padding: 1.5rem; margin-bottom: 1.5rem;";

fn log_failure<T>(what: &str, result: &Result<T, ClientError>) {
	if let Err(e) = result {
		warn!("reading-graph: {what} failed: {e}");
	}
}

/// Run `command` against the API and feed the result back into `explorer`.
fn dispatch(explorer: RwSignal<Explorer>, client: Client, command: Command) {
	debug!("reading-graph: issuing request {:?}", command.ticket());
	let client = client.get_value();
	spawn_local(async move {
		let applied = match command {
			Command::SearchAuthors { ticket, query } => {
				let result = client.search_authors(&query).await;
				log_failure("author search", &result);
				explorer.try_update(|ex| ex.resolve_search(ticket, result))
			}
			Command::FetchGraph {
				ticket,
				author_id,
				depth,
			} => {
				let result = client.author_graph(&author_id, depth).await;
				log_failure("graph fetch", &result);
				explorer.try_update(|ex| ex.resolve_graph(ticket, result))
			}
			Command::FetchAuthor { ticket, id } => {
				let result = client.author(&id).await.map(Selection::Author);
				log_failure("author details", &result);
				explorer.try_update(|ex| ex.resolve_detail(ticket, result))
			}
			Command::FetchBook { ticket, id } => {
				let result = client.book(&id).await.map(Selection::Book);
				log_failure("book details", &result);
				explorer.try_update(|ex| ex.resolve_detail(ticket, result))
			}
			Command::SearchBooksBySubject { ticket, subject } => {
				let result = client.search_books_by_subject(&subject).await;
				log_failure("subject search", &result);
				explorer.try_update(|ex| ex.resolve_subject(ticket, result))
			}
		};
		if applied.is_none() {
			warn!("reading-graph: page disposed before response arrived");
		}
	});
}

/// Apply `action` and dispatch the command it returns, if any.
fn act(explorer: RwSignal<Explorer>, client: Client, action: impl FnOnce(&mut Explorer) -> Option<Command>) {
	if let Some(command) = explorer.try_update(action).flatten() {
		dispatch(explorer, client, command);
	}
}

/// Year span, nationality and birthplace joined for the selected-author header.
fn author_header_line(author: &Author) -> Option<String> {
	let parts: Vec<String> = [
		author.summary_line(),
		present(&author.birth_place).map(str::to_string),
	]
	.into_iter()
	.flatten()
	.collect();
	(!parts.is_empty()).then(|| parts.join(" • "))
}

#[component]
fn SearchSection(explorer: RwSignal<Explorer>, client: Client) -> impl IntoView {
	let (query, set_query) = signal(String::new());

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let text = query.get_untracked();
		act(explorer, client, |ex| ex.submit_search(&text));
	};

	let searching = move || explorer.with(|ex| ex.is_searching());
	let results = move || explorer.with(|ex| ex.search_results().to_vec());
	let no_results = move || {
		explorer.with(|ex| matches!(ex.search(), SearchState::Done { authors, .. } if authors.is_empty()))
	};

	view! {
		<div style=CARD>
			<form on:submit=on_submit style="display: flex; gap: 1rem;">
				<input
					type="text"
					placeholder="Search for an author..."
					prop:value=query
					on:input=move |ev| set_query.set(event_target_value(&ev))
					style="flex: 1; padding: 0.5rem 1rem; border: 1px solid #d1d5db; border-radius: 8px;"
				/>
				<button type="submit" disabled=searching>
					{move || if searching() { "Searching..." } else { "Search" }}
				</button>
			</form>

			<Show when=move || !results().is_empty()>
				<div style="margin-top: 1rem; display: flex; flex-direction: column; gap: 0.5rem;">
					<h3 style="margin: 0; font-weight: 600; color: #374151;">"Results:"</h3>
					<For each=results key=|author| author.id.clone() let(author)>
						{
							let summary = author.summary_line();
							let name = author.display_name();
							view! {
								<button
									type="button"
									class="search-result"
									style="text-align: left; padding: 0.75rem; border: 1px solid #e5e7eb; border-radius: 4px; background: white; cursor: pointer;"
									on:click=move |_| {
										let author = author.clone();
										act(explorer, client, |ex| Some(ex.select_author(author)));
									}
								>
									<div style="font-weight: 500;">{name}</div>
									{summary
										.map(|line| {
											view! {
												<div style="font-size: 0.875rem; color: #4b5563;">{line}</div>
											}
										})}
								</button>
							}
						}
					</For>
				</div>
			</Show>

			<Show when=no_results>
				<div style="margin-top: 1rem; color: #4b5563;">"No authors found."</div>
			</Show>
		</div>
	}
}

#[component]
fn SelectedAuthor(explorer: RwSignal<Explorer>, client: Client) -> impl IntoView {
	let selected = Memo::new(move |_| explorer.with(|ex| ex.selected_author().cloned()));
	let depth = Memo::new(move |_| explorer.with(|ex| ex.depth()));

	move || {
		selected.get().map(|author| {
			view! {
				<div style=CARD>
					<div style="display: flex; justify-content: space-between; align-items: flex-start;">
						<div>
							<h2 style="margin: 0; font-size: 1.5rem;">{author.display_name()}</h2>
							{author_header_line(&author)
								.map(|line| view! { <p style="margin: 0.25rem 0 0; color: #4b5563;">{line}</p> })}
						</div>
						<div style="display: flex; gap: 0.5rem; align-items: center;">
							<label style="font-size: 0.875rem; font-weight: 500; color: #374151;">
								"Graph Depth:"
							</label>
							{Depth::ALL
								.into_iter()
								.map(|d| {
									let style = move || {
										if depth.get() == d {
											"padding: 0.25rem 0.75rem; border-radius: 4px; border: none; background: #2563eb; color: white;"
										} else {
											"padding: 0.25rem 0.75rem; border-radius: 4px; border: none; background: #e5e7eb; color: #374151;"
										}
									};
									view! {
										<button
											type="button"
											style=style
											on:click=move |_| act(explorer, client, |ex| ex.set_depth(d))
										>
											{d.value()}
										</button>
									}
								})
								.collect_view()}
						</div>
					</div>
				</div>
			}
		})
	}
}

#[component]
fn Legend() -> impl IntoView {
	let theme = Theme::default();
	let swatch = |node_type: NodeType| {
		let colors = theme.node_colors(node_type);
		format!(
			"width: 1rem; height: 1rem; border-radius: 4px; background: {}; border: 2px solid {};",
			colors.fill.to_css(),
			colors.border.to_css()
		)
	};
	let (author, book) = (swatch(NodeType::Author), swatch(NodeType::Book));

	view! {
		<div style="display: flex; gap: 1rem; font-size: 0.875rem; color: #4b5563;">
			<div style="display: flex; align-items: center; gap: 0.5rem;">
				<div style=author></div>
				<span>"Author"</span>
			</div>
			<div style="display: flex; align-items: center; gap: 0.5rem;">
				<div style=book></div>
				<span>"Book"</span>
			</div>
		</div>
	}
}

#[component]
fn GraphSection(explorer: RwSignal<Explorer>, client: Client) -> impl IntoView {
	let loading = move || explorer.with(|ex| ex.is_graph_loading());
	let error = Memo::new(move |_| explorer.with(|ex| ex.graph_error().map(str::to_string)));
	let has_graph = move || explorer.with(|ex| ex.displayed_graph().is_some());
	// Equality-memoized so unrelated page updates leave the canvas alone.
	let graph = Memo::new(move |_| {
		explorer.with(|ex| ex.displayed_graph().cloned().unwrap_or_default())
	});

	let on_node_click = Callback::new(move |click: NodeClick| {
		act(explorer, client, |ex| Some(ex.node_clicked(&click.id, click.node_type)));
	});

	view! {
		<Show when=loading>
			<div style=CARD>
				<div style="text-align: center; padding: 2rem; color: #4b5563;">"Loading graph..."</div>
			</div>
		</Show>

		{move || {
			error
				.get()
				.map(|message| {
					view! {
						<div style="background: #fef2f2; border: 1px solid #fecaca; border-radius: 8px; padding: 1.5rem; margin-bottom: 1.5rem;">
							<h3 style="margin: 0 0 0.5rem; color: #991b1b;">"Error loading graph"</h3>
							<p style="margin: 0; color: #dc2626;">{message}</p>
						</div>
					}
				})
		}}

		<Show when=has_graph>
			<div style=CARD>
				<div style="margin-bottom: 1rem;">
					<h3 style="margin: 0 0 0.5rem; font-size: 1.125rem;">"Author Influence Network"</h3>
					<Legend />
				</div>
				<AuthorGraphView data=graph on_node_click=on_node_click height=600.0 />
			</div>
		</Show>
	}
}

#[component]
fn GettingStarted(explorer: RwSignal<Explorer>) -> impl IntoView {
	let visible = move || {
		explorer.with(|ex| ex.selected_author().is_none() && ex.search_results().is_empty())
	};

	view! {
		<Show when=visible>
			<div style="background: #eff6ff; border: 1px solid #bfdbfe; border-radius: 8px; padding: 1.5rem;">
				<h3 style="margin: 0 0 0.5rem; color: #1e3a8a;">"Getting Started"</h3>
				<ol style="margin: 0; color: #1e40af;">
					<li>"Make sure the GraphQL API is running"</li>
					<li>"Search for an author by name"</li>
					<li>"Click on an author to view their influence network"</li>
					<li>"Adjust the graph depth to explore deeper connections"</li>
				</ol>
			</div>
		</Show>
	}
}

#[component]
fn Overlays(explorer: RwSignal<Explorer>, client: Client) -> impl IntoView {
	let panel = Memo::new(move |_| explorer.with(|ex| ex.panel().clone()));
	let modal = Memo::new(move |_| explorer.with(|ex| ex.modal().clone()));

	let close_panel = Callback::new(move |()| explorer.update(Explorer::close_panel));
	let subject_click = Callback::new(move |subject: String| {
		act(explorer, client, |ex| Some(ex.subject_clicked(&subject)));
	});
	let close_modal = Callback::new(move |()| explorer.update(Explorer::close_modal));
	let book_click = Callback::new(move |book_id: String| {
		act(explorer, client, |ex| Some(ex.book_picked(&book_id)));
	});

	view! {
		{move || match panel.get() {
			Panel::Open(selection) => {
				Some(
					view! {
						<DetailPanel
							selection=selection
							on_close=close_panel
							on_subject_click=subject_click
						/>
					},
				)
			}
			Panel::Closed => None,
		}}
		{move || match modal.get() {
			SubjectModal::Open { subject, books } => {
				Some(
					view! {
						<SubjectModalView
							subject=subject
							books=books
							on_close=close_modal
							on_book_click=book_click
						/>
					},
				)
			}
			SubjectModal::Closed => None,
		}}
	}
}

/// The single page of the application.
#[component]
pub fn HomePage() -> impl IntoView {
	let config = AppConfig::load();
	let client: Client = StoredValue::new_local(GraphQlClient::new(config.graphql_endpoint));
	let explorer = RwSignal::new(Explorer::new());

	view! {
		<main style="min-height: 100vh; background: #f9fafb; padding: 2rem; font-family: system-ui, sans-serif;">
			<div style="max-width: 80rem; margin: 0 auto;">
				<h1 style="font-size: 2.25rem; margin: 0 0 2rem; color: #111827;">
					"Git Reading - Author Graph Explorer"
				</h1>
				<SearchSection explorer=explorer client=client />
				<SelectedAuthor explorer=explorer client=client />
				<GraphSection explorer=explorer client=client />
				<GettingStarted explorer=explorer />
				<Overlays explorer=explorer client=client />
			</div>
		</main>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn header_line_includes_birthplace() {
		let author = Author {
			id: "a".into(),
			name: "Jane Austen".into(),
			birth_year: Some(1775),
			death_year: Some(1817),
			nationality: Some("British".into()),
			birth_place: Some("Steventon".into()),
			..Author::default()
		};
		assert_eq!(
			author_header_line(&author).as_deref(),
			Some("1775 - 1817 • British • Steventon")
		);
		assert_eq!(author_header_line(&Author::default()), None);
	}
}
