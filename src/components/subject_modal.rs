//! Dialog listing the books tagged with one subject.

use leptos::prelude::*;

use crate::model::{Book, present};

/// Tags shown per row before collapsing into `+K more`.
pub const MAX_TAGS: usize = 5;

pub const EMPTY_MESSAGE: &str = "No books found with this subject.";

pub fn header(subject: &str) -> String {
	format!("Books about \"{subject}\"")
}

/// `"1 book found"` / `"N books found"`.
pub fn count_label(count: usize) -> String {
	let noun = if count == 1 { "book" } else { "books" };
	format!("{count} {noun} found")
}

/// One subject chip in a result row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagChip {
	pub name: String,
	/// The queried subject occurs in this tag (case-insensitive).
	pub emphasized: bool,
}

/// First [`MAX_TAGS`] tags of `book` plus the number left over.
pub fn visible_tags(book: &Book, subject: &str) -> (Vec<TagChip>, usize) {
	let needle = subject.to_lowercase();
	let chips = book
		.subjects
		.iter()
		.take(MAX_TAGS)
		.map(|s| TagChip {
			name: s.name.clone(),
			emphasized: s.name.to_lowercase().contains(&needle),
		})
		.collect();
	(chips, book.subjects.len().saturating_sub(MAX_TAGS))
}

/// `"+K more"` for tags beyond [`MAX_TAGS`]; nothing when all are shown.
pub fn overflow_label(hidden: usize) -> Option<String> {
	(hidden > 0).then(|| format!("+{hidden} more"))
}

fn book_row(
	book: Book,
	subject: &str,
	on_close: Callback<()>,
	on_book_click: Callback<String>,
) -> impl IntoView + use<> {
	let (chips, hidden) = visible_tags(&book, subject);
	let id = book.id.clone();
	let year = book.publication_year;
	let read = present(&book.date_read).map(|date| format!("Read {date}"));

	view! {
		<button
			type="button"
			class="subject-book"
			style="width: 100%; text-align: left; padding: 1rem; border: 1px solid #e5e7eb; border-radius: 8px; background: white; cursor: pointer;"
			on:click=move |_| {
				on_book_click.run(id.clone());
				on_close.run(());
			}
		>
			<div style="font-weight: 600; margin-bottom: 0.25rem;">{book.title}</div>
			<div style="display: flex; gap: 0.75rem; font-size: 0.875rem; color: #4b5563;">
				{year.map(|year| view! { <span class="subject-book-year">{year}</span> })}
				{read
					.map(|read| {
						view! {
							<span style="color: #15803d; background: #f0fdf4; padding: 0 0.5rem; border-radius: 4px;">
								{read}
							</span>
						}
					})}
			</div>
			{(!chips.is_empty())
				.then(|| {
					view! {
						<div style="display: flex; flex-wrap: wrap; gap: 0.25rem; margin-top: 0.5rem;">
							{chips
								.into_iter()
								.map(|chip| {
									let style = if chip.emphasized {
										"font-size: 0.75rem; padding: 0 0.5rem; border-radius: 9999px; background: #e0e7ff; color: #4338ca; font-weight: 500;"
									} else {
										"font-size: 0.75rem; padding: 0 0.5rem; border-radius: 9999px; background: #f3f4f6; color: #4b5563;"
									};
									view! { <span style=style>{chip.name}</span> }
								})
								.collect_view()}
							{overflow_label(hidden)
								.map(|more| {
									view! { <span style="font-size: 0.75rem; color: #6b7280;">{more}</span> }
								})}
						</div>
					}
				})}
		</button>
	}
}

/// Modal dialog for a subject search. Picking a row reports the book id and
/// then closes the dialog.
#[component]
pub fn SubjectModal(
	subject: String,
	books: Vec<Book>,
	#[prop(into)] on_close: Callback<()>,
	#[prop(into)] on_book_click: Callback<String>,
) -> impl IntoView {
	let count = count_label(books.len());
	let body = if books.is_empty() {
		view! { <div style="text-align: center; padding: 3rem 0; color: #6b7280;">{EMPTY_MESSAGE}</div> }
			.into_any()
	} else {
		books
			.into_iter()
			.map(|book| book_row(book, &subject, on_close, on_book_click))
			.collect_view()
			.into_any()
	};

	view! {
		<div
			class="subject-modal-backdrop"
			style="position: fixed; inset: 0; background: rgba(0, 0, 0, 0.5); z-index: 60; display: flex; align-items: center; justify-content: center; padding: 1rem;"
		>
			<div
				class="subject-modal"
				role="dialog"
				style="background: white; border-radius: 8px; width: 100%; max-width: 48rem; max-height: 80vh; display: flex; flex-direction: column; overflow: hidden;"
			>
				<header style="padding: 1.5rem; border-bottom: 1px solid #e5e7eb; display: flex; justify-content: space-between; align-items: flex-start;">
					<div>
						<h2 style="margin: 0; font-size: 1.5rem;">{header(&subject)}</h2>
						<p style="margin: 0.25rem 0 0; color: #4b5563; font-size: 0.875rem;">{count}</p>
					</div>
					<button type="button" aria-label="Close modal" on:click=move |_| on_close.run(())>
						"×"
					</button>
				</header>
				<div style="flex: 1; overflow-y: auto; padding: 1.5rem; display: flex; flex-direction: column; gap: 1rem;">
					{body}
				</div>
			</div>
		</div>
	}
}
