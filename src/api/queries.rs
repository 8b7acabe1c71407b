//! GraphQL documents and the `data` shapes they return.

use serde::Deserialize;

use crate::model::{Author, AuthorGraph, Book};

pub const SEARCH_AUTHORS: &str = r#"
query SearchAuthors($query: String!) {
  searchAuthors(query: $query) {
    id
    name
    firstName
    lastName
    birthYear
    deathYear
    birthPlace
    nationality
    wikidataId
  }
}
"#;

pub const GET_AUTHOR: &str = r#"
query GetAuthor($id: String!) {
  author(id: $id) {
    id
    name
    firstName
    lastName
    birthYear
    deathYear
    birthPlace
    deathPlace
    nationality
    bio
    wikidataId
    viafId
    wikipediaUrl
  }
}
"#;

pub const GET_AUTHOR_GRAPH: &str = r#"
query GetAuthorGraph($authorId: String!, $depth: Int!) {
  authorGraph(authorId: $authorId, depth: $depth) {
    nodes {
      id
      type
      label
      metadata {
        birthYear
        deathYear
        publicationYear
      }
    }
    edges {
      source
      target
      type
    }
  }
}
"#;

pub const GET_BOOK: &str = r#"
query GetBook($id: String!) {
  book(id: $id) {
    id
    title
    publicationYear
    dateRead
    isbn13
    isbn10
    openlibraryId
    wikidataId
    description
    coverUrl
    subjects {
      name
      source
    }
  }
}
"#;

pub const SEARCH_BOOKS_BY_SUBJECT: &str = r#"
query SearchBooksBySubject($subject: String!) {
  searchBooksBySubject(subject: $subject) {
    id
    title
    publicationYear
    dateRead
    subjects {
      name
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchAuthorsData {
	#[serde(default)]
	pub search_authors: Option<Vec<Author>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthorData {
	#[serde(default)]
	pub author: Option<Author>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthorGraphData {
	#[serde(default)]
	pub author_graph: Option<AuthorGraph>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookData {
	#[serde(default)]
	pub book: Option<Book>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchBooksBySubjectData {
	#[serde(default)]
	pub search_books_by_subject: Option<Vec<Book>>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn author_documents_request_name_parts() {
		for document in [SEARCH_AUTHORS, GET_AUTHOR] {
			assert!(document.contains("firstName"));
			assert!(document.contains("lastName"));
		}
	}
}
