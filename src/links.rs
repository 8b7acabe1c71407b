//! External reference links for authors and books.
//!
//! Each identifier maps to exactly one fixed URL template. Missing or blank
//! identifiers yield no link at all.

use crate::model::{Author, Book, present};

/// Which external dataset a link points into. Drives the button styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
	Wikipedia,
	Wikidata,
	Viaf,
	OpenLibrary,
	IsbnSearch,
}

impl LinkKind {
	pub fn label(self) -> &'static str {
		match self {
			LinkKind::Wikipedia => "Wikipedia",
			LinkKind::Wikidata => "Wikidata",
			LinkKind::Viaf => "VIAF",
			LinkKind::OpenLibrary => "Open Library",
			LinkKind::IsbnSearch => "Search by ISBN",
		}
	}

	/// CSS modifier class for the link button.
	pub fn css_class(self) -> &'static str {
		match self {
			LinkKind::Wikipedia => "link-wikipedia",
			LinkKind::Wikidata => "link-wikidata",
			LinkKind::Viaf => "link-viaf",
			LinkKind::OpenLibrary => "link-openlibrary",
			LinkKind::IsbnSearch => "link-isbn",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalLink {
	pub kind: LinkKind,
	pub url: String,
}

fn wikidata(id: &str) -> String {
	format!("https://www.wikidata.org/wiki/{id}")
}

/// Links for an author, in display order.
pub fn author_links(author: &Author) -> Vec<ExternalLink> {
	let candidates = [
		(LinkKind::Wikipedia, present(&author.wikipedia_url).map(str::to_string)),
		(LinkKind::Wikidata, present(&author.wikidata_id).map(wikidata)),
		(
			LinkKind::Viaf,
			present(&author.viaf_id).map(|id| format!("https://viaf.org/viaf/{id}")),
		),
	];
	collect(candidates)
}

/// Links for a book, in display order. ISBN search prefers ISBN-13.
pub fn book_links(book: &Book) -> Vec<ExternalLink> {
	let isbn = present(&book.isbn13).or_else(|| present(&book.isbn10));
	let candidates = [
		(
			LinkKind::OpenLibrary,
			present(&book.openlibrary_id).map(|id| format!("https://openlibrary.org/works/{id}")),
		),
		(LinkKind::Wikidata, present(&book.wikidata_id).map(wikidata)),
		(
			LinkKind::IsbnSearch,
			isbn.map(|isbn| format!("https://www.google.com/search?q=isbn+{isbn}")),
		),
	];
	collect(candidates)
}

fn collect<const N: usize>(candidates: [(LinkKind, Option<String>); N]) -> Vec<ExternalLink> {
	candidates
		.into_iter()
		.filter_map(|(kind, url)| url.map(|url| ExternalLink { kind, url }))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn author_without_identifiers_has_no_links() {
		assert!(author_links(&Author::default()).is_empty());
	}

	#[test]
	fn author_links_follow_templates() {
		let author = Author {
			wikidata_id: Some("Q36322".into()),
			viaf_id: Some("102333412".into()),
			wikipedia_url: Some("https://en.wikipedia.org/wiki/Jane_Austen".into()),
			..Default::default()
		};
		let links = author_links(&author);
		let urls: Vec<&str> = links.iter().map(|l| l.url.as_str()).collect();
		assert_eq!(
			urls,
			[
				"https://en.wikipedia.org/wiki/Jane_Austen",
				"https://www.wikidata.org/wiki/Q36322",
				"https://viaf.org/viaf/102333412",
			]
		);
	}

	#[test]
	fn blank_identifier_is_treated_as_missing() {
		let author = Author {
			viaf_id: Some("   ".into()),
			..Default::default()
		};
		assert!(author_links(&author).is_empty());
	}

	#[test]
	fn isbn_search_falls_back_to_isbn10() {
		let book = Book {
			isbn10: Some("0141439580".into()),
			..Default::default()
		};
		assert_eq!(
			book_links(&book),
			vec![ExternalLink {
				kind: LinkKind::IsbnSearch,
				url: "https://www.google.com/search?q=isbn+0141439580".into(),
			}]
		);
	}

	#[test]
	fn book_links_keep_display_order() {
		let book = Book {
			isbn13: Some("9780141439587".into()),
			openlibrary_id: Some("OL66562W".into()),
			wikidata_id: Some("Q217009".into()),
			..Default::default()
		};
		let kinds: Vec<LinkKind> = book_links(&book).into_iter().map(|l| l.kind).collect();
		assert_eq!(
			kinds,
			[LinkKind::OpenLibrary, LinkKind::Wikidata, LinkKind::IsbnSearch]
		);
	}
}
