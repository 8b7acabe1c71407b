//! GraphQL data client.
//!
//! One [`GraphQlClient`] is created at startup and cloned into every request
//! task. Each call is a single independent POST; nothing is cached.

pub mod queries;

use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;

use crate::model::{Author, AuthorGraph, Book, Depth};
use queries::*;

/// Failure of one GraphQL round-trip.
#[derive(Debug, Error)]
pub enum ClientError {
	/// The request never produced a response (network down, CORS, timeout).
	#[error("network error: {0}")]
	Transport(#[from] reqwest::Error),
	/// Non-2xx response without a GraphQL error payload.
	#[error("server responded with HTTP {0}")]
	Status(u16),
	/// The server answered with an `errors` array.
	#[error("{0}")]
	GraphQl(String),
	#[error("malformed response: {0}")]
	Decode(#[from] serde_json::Error),
	/// The response had no data for the requested field.
	#[error("no {0} in response")]
	MissingData(&'static str),
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
	message: String,
}

#[derive(Debug, Deserialize)]
struct Envelope {
	#[serde(default)]
	data: Option<Value>,
	#[serde(default)]
	errors: Option<Vec<ErrorEntry>>,
}

/// Decode a GraphQL response body into the operation's `data` type.
///
/// Any entry in `errors` fails the whole call, matching a client that does not
/// accept partial results.
pub fn decode_response<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
	let envelope: Envelope = serde_json::from_str(body)?;
	if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
		let message = errors
			.into_iter()
			.map(|e| e.message)
			.collect::<Vec<_>>()
			.join("; ");
		return Err(ClientError::GraphQl(message));
	}
	match envelope.data {
		None | Some(Value::Null) => Err(ClientError::MissingData("data")),
		Some(data) => Ok(serde_json::from_value(data)?),
	}
}

/// Decode a reply, reporting a non-2xx status when the body carries no
/// GraphQL errors to explain it.
pub fn decode_reply<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ClientError> {
	match decode_response(body) {
		Err(ClientError::Decode(_) | ClientError::MissingData(_)) if !status.is_success() => {
			Err(ClientError::Status(status.as_u16()))
		}
		result => result,
	}
}

/// Long-lived client bound to one endpoint.
#[derive(Clone, Debug)]
pub struct GraphQlClient {
	http: reqwest::Client,
	endpoint: String,
}

impl GraphQlClient {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			http: reqwest::Client::new(),
			endpoint: endpoint.into(),
		}
	}

	/// Execute `document` with `variables` and decode the `data` object.
	pub async fn query<T: DeserializeOwned>(
		&self,
		document: &str,
		variables: Value,
	) -> Result<T, ClientError> {
		debug!("reading-graph: POST {} variables={}", self.endpoint, variables);
		let response = self
			.http
			.post(&self.endpoint)
			.json(&json!({ "query": document, "variables": variables }))
			.send()
			.await?;
		let status = response.status();
		let body = response.text().await?;
		decode_reply(status, &body)
	}

	pub async fn search_authors(&self, query: &str) -> Result<Vec<Author>, ClientError> {
		let data: SearchAuthorsData = self
			.query(SEARCH_AUTHORS, json!({ "query": query }))
			.await?;
		Ok(data.search_authors.unwrap_or_default())
	}

	pub async fn author(&self, id: &str) -> Result<Author, ClientError> {
		let data: AuthorData = self.query(GET_AUTHOR, json!({ "id": id })).await?;
		data.author.ok_or(ClientError::MissingData("author"))
	}

	pub async fn author_graph(
		&self,
		author_id: &str,
		depth: Depth,
	) -> Result<AuthorGraph, ClientError> {
		let data: AuthorGraphData = self
			.query(
				GET_AUTHOR_GRAPH,
				json!({ "authorId": author_id, "depth": depth }),
			)
			.await?;
		data.author_graph
			.ok_or(ClientError::MissingData("authorGraph"))
	}

	pub async fn book(&self, id: &str) -> Result<Book, ClientError> {
		let data: BookData = self.query(GET_BOOK, json!({ "id": id })).await?;
		data.book.ok_or(ClientError::MissingData("book"))
	}

	pub async fn search_books_by_subject(&self, subject: &str) -> Result<Vec<Book>, ClientError> {
		let data: SearchBooksBySubjectData = self
			.query(SEARCH_BOOKS_BY_SUBJECT, json!({ "subject": subject }))
			.await?;
		Ok(data.search_books_by_subject.unwrap_or_default())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_data_payload() {
		let body = r#"{"data": {"searchAuthors": [{"id": "a1", "name": "Jane Austen", "birthYear": 1775}]}}"#;
		let data: SearchAuthorsData = decode_response(body).unwrap();
		let authors = data.search_authors.unwrap();
		assert_eq!(authors.len(), 1);
		assert_eq!(authors[0].birth_year, Some(1775));
	}

	#[test]
	fn server_errors_are_joined() {
		let body = r#"{"data": null, "errors": [{"message": "Author not found"}, {"message": "depth too large"}]}"#;
		let err = decode_response::<AuthorGraphData>(body).unwrap_err();
		match err {
			ClientError::GraphQl(message) => assert_eq!(message, "Author not found; depth too large"),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn errors_win_over_partial_data() {
		let body = r#"{"data": {"book": {"id": "b", "title": "T"}}, "errors": [{"message": "partial"}]}"#;
		assert!(matches!(
			decode_response::<BookData>(body),
			Err(ClientError::GraphQl(_))
		));
	}

	#[test]
	fn missing_data_is_reported() {
		assert!(matches!(
			decode_response::<BookData>(r#"{}"#),
			Err(ClientError::MissingData("data"))
		));
		let data: BookData = decode_response(r#"{"data": {"book": null}}"#).unwrap();
		assert!(data.book.is_none());
	}

	#[test]
	fn garbage_body_is_a_decode_error() {
		assert!(matches!(
			decode_response::<BookData>("<html>502</html>"),
			Err(ClientError::Decode(_))
		));
	}

	#[test]
	fn failed_status_wins_over_non_graphql_body() {
		let failed = StatusCode::INTERNAL_SERVER_ERROR;
		for body in [r#"{"detail":"Internal Server Error"}"#, "<html>502</html>"] {
			assert!(matches!(
				decode_reply::<BookData>(failed, body),
				Err(ClientError::Status(500))
			));
		}
		let body = r#"{"errors": [{"message": "depth too large"}]}"#;
		assert!(matches!(
			decode_reply::<BookData>(StatusCode::BAD_REQUEST, body),
			Err(ClientError::GraphQl(_))
		));
		assert!(matches!(
			decode_reply::<BookData>(StatusCode::OK, r#"{}"#),
			Err(ClientError::MissingData("data"))
		));
	}

	#[test]
	fn graph_variables_carry_integer_depth() {
		let vars = json!({ "authorId": "a1", "depth": Depth::Three });
		assert_eq!(vars["depth"], json!(3));
	}
}
