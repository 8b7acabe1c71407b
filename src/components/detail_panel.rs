//! Side panel describing one author or book.
//!
//! [`DetailView::from_selection`] decides which sections exist; the component
//! only renders what the view contains. Every section except the header and
//! the ID row depends on optional fields being present.

use leptos::prelude::*;

use crate::explorer::Selection;
use crate::links::{ExternalLink, author_links, book_links};
use crate::model::{Author, Book, present};

/// Heading plus body paragraph (biography or description).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
	pub heading: &'static str,
	pub body: String,
}

/// Book cover image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cover {
	pub url: String,
	pub alt: String,
}

/// Clickable subject tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubjectTag {
	pub name: String,
	pub tooltip: String,
}

/// Content of the panel, section by section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
	pub title: String,
	pub subtitle: Option<String>,
	pub links: Vec<ExternalLink>,
	pub cover: Option<Cover>,
	pub text: Option<TextBlock>,
	/// `("Born", place)` / `("Died", place)` rows.
	pub places: Vec<(&'static str, String)>,
	pub subjects: Vec<SubjectTag>,
	/// Always starts with the ID row.
	pub metadata: Vec<(&'static str, String)>,
}

impl DetailView {
	pub fn from_selection(selection: &Selection) -> Self {
		match selection {
			Selection::Author(author) => Self::author(author),
			Selection::Book(book) => Self::book(book),
		}
	}

	fn author(author: &Author) -> Self {
		let places = [("Born", &author.birth_place), ("Died", &author.death_place)]
			.into_iter()
			.filter_map(|(label, place)| present(place).map(|p| (label, p.to_string())))
			.collect();

		Self {
			title: author.display_name(),
			subtitle: author.summary_line(),
			links: author_links(author),
			cover: None,
			text: present(&author.bio).map(|bio| TextBlock {
				heading: "Biography",
				body: bio.to_string(),
			}),
			places,
			subjects: Vec::new(),
			metadata: vec![("ID", author.id.clone())],
		}
	}

	fn book(book: &Book) -> Self {
		let subtitle_parts: Vec<String> = [
			book.publication_year.map(|year| format!("Published {year}")),
			present(&book.date_read).map(|date| format!("Read {date}")),
		]
		.into_iter()
		.flatten()
		.collect();

		let subjects = book
			.subjects
			.iter()
			.filter(|s| !s.name.trim().is_empty())
			.map(|s| SubjectTag {
				name: s.name.clone(),
				tooltip: match present(&s.source) {
					Some(source) => {
						format!("Click to find books about \"{}\" • Source: {source}", s.name)
					}
					None => format!("Click to find books about \"{}\"", s.name),
				},
			})
			.collect();

		let mut metadata = vec![("ID", book.id.clone())];
		if let Some(isbn) = present(&book.isbn13) {
			metadata.push(("ISBN-13", isbn.to_string()));
		}
		if let Some(isbn) = present(&book.isbn10) {
			metadata.push(("ISBN-10", isbn.to_string()));
		}

		Self {
			title: book.title.clone(),
			subtitle: (!subtitle_parts.is_empty()).then(|| subtitle_parts.join(" • ")),
			links: book_links(book),
			cover: present(&book.cover_url).map(|url| Cover {
				url: url.to_string(),
				alt: format!("Cover of {}", book.title),
			}),
			text: present(&book.description).map(|description| TextBlock {
				heading: "Description",
				body: description.to_string(),
			}),
			places: Vec::new(),
			subjects,
			metadata,
		}
	}
}

const SECTION_HEADING: &str = "font-size: 0.8rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.05em; color: #374151; margin: 0 0 0.5rem;";

/// Dismissible panel pinned to the right edge of the viewport.
#[component]
pub fn DetailPanel(
	selection: Selection,
	#[prop(into)] on_close: Callback<()>,
	#[prop(into)] on_subject_click: Callback<String>,
) -> impl IntoView {
	let DetailView {
		title,
		subtitle,
		links,
		cover,
		text,
		places,
		subjects,
		metadata,
	} = DetailView::from_selection(&selection);

	let links_section = (!links.is_empty()).then(|| {
		view! {
			<section class="detail-links">
				<h3 style=SECTION_HEADING>"External Resources"</h3>
				<div style="display: flex; flex-wrap: wrap; gap: 0.5rem;">
					{links
						.into_iter()
						.map(|link| {
							view! {
								<a
									class=format!("detail-link {}", link.kind.css_class())
									href=link.url
									target="_blank"
									rel="noopener noreferrer"
								>
									{link.kind.label()}
								</a>
							}
						})
						.collect_view()}
				</div>
			</section>
		}
	});

	let cover_section = cover.map(|cover| {
		view! {
			<section class="detail-cover">
				<h3 style=SECTION_HEADING>"Cover"</h3>
				<img src=cover.url alt=cover.alt style="width: 100%; height: auto; border-radius: 8px;" />
			</section>
		}
	});

	let text_section = text.map(|text| {
		view! {
			<section class="detail-text">
				<h3 style=SECTION_HEADING>{text.heading}</h3>
				<p style="color: #4b5563; font-size: 0.9rem; line-height: 1.6;">{text.body}</p>
			</section>
		}
	});

	let places_section = (!places.is_empty()).then(|| {
		view! {
			<section class="detail-places">
				<h3 style=SECTION_HEADING>"Places"</h3>
				{places
					.into_iter()
					.map(|(label, place)| {
						view! {
							<div>
								<span style="font-weight: 500;">{format!("{label}:")}</span>
								" "
								{place}
							</div>
						}
					})
					.collect_view()}
			</section>
		}
	});

	let subjects_section = (!subjects.is_empty()).then(|| {
		view! {
			<section class="detail-subjects">
				<h3 style=SECTION_HEADING>"Subjects & Tags"</h3>
				<div style="display: flex; flex-wrap: wrap; gap: 0.5rem;">
					{subjects
						.into_iter()
						.map(|tag| {
							let name = tag.name.clone();
							view! {
								<button
									type="button"
									class="subject-tag"
									title=tag.tooltip
									on:click=move |_| on_subject_click.run(name.clone())
								>
									{tag.name}
								</button>
							}
						})
						.collect_view()}
				</div>
			</section>
		}
	});

	view! {
		<aside
			class="detail-panel"
			style="position: fixed; top: 0; right: 0; bottom: 0; width: 480px; max-width: 100vw; overflow-y: auto; background: white; border-left: 1px solid #e5e7eb; box-shadow: -8px 0 24px rgba(0, 0, 0, 0.12); z-index: 50;"
		>
			<header style="position: sticky; top: 0; background: white; border-bottom: 1px solid #e5e7eb; padding: 1.5rem; display: flex; justify-content: space-between; align-items: flex-start;">
				<div>
					<h2 style="margin: 0; font-size: 1.5rem;">{title}</h2>
					{subtitle
						.map(|subtitle| {
							view! {
								<p style="margin: 0.25rem 0 0; color: #4b5563; font-size: 0.875rem;">
									{subtitle}
								</p>
							}
						})}
				</div>
				<button type="button" aria-label="Close panel" on:click=move |_| on_close.run(())>
					"×"
				</button>
			</header>
			<div style="padding: 1.5rem; display: flex; flex-direction: column; gap: 1.5rem;">
				{links_section}
				{cover_section}
				{text_section}
				{places_section}
				{subjects_section}
				<section class="detail-metadata">
					<h3 style=SECTION_HEADING>"Metadata"</h3>
					{metadata
						.into_iter()
						.map(|(label, value)| {
							view! {
								<div>
									<span style="font-weight: 500;">{format!("{label}:")}</span>
									" "
									<code>{value}</code>
								</div>
							}
						})
						.collect_view()}
				</section>
			</div>
		</aside>
	}
}
