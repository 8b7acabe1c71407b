//! Runtime configuration.
//!
//! The GraphQL endpoint is resolved once at startup, first match wins:
//! 1. a `<script id="app-config" type="application/json">` element in the host page,
//! 2. the `GRAPHQL_API_URL` environment variable captured at build time,
//! 3. the local development address.

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/graphql";

/// DOM id of the optional JSON config element.
pub const CONFIG_ELEMENT_ID: &str = "app-config";

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to parse #app-config: {0}")]
	Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
	pub graphql_endpoint: String,
}

impl Default for AppConfig {
	fn default() -> Self {
		Self {
			graphql_endpoint: DEFAULT_ENDPOINT.to_string(),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
	graphql_endpoint: Option<String>,
}

impl AppConfig {
	/// Resolve the configuration from the page and build environment.
	pub fn load() -> Self {
		let page = page_config_text();
		let config = Self::resolve(page.as_deref(), option_env!("GRAPHQL_API_URL"));
		info!("reading-graph: using GraphQL endpoint {}", config.graphql_endpoint);
		config
	}

	/// Pure resolution step behind [`AppConfig::load`]. A malformed page config
	/// is logged and skipped rather than aborting startup.
	pub fn resolve(page_json: Option<&str>, build_env: Option<&str>) -> Self {
		let from_page = page_json.and_then(|text| match parse_page_config(text) {
			Ok(endpoint) => endpoint,
			Err(e) => {
				warn!("reading-graph: {}", e);
				None
			}
		});
		let from_env = build_env
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.map(str::to_string);

		from_page
			.or(from_env)
			.map(|graphql_endpoint| Self { graphql_endpoint })
			.unwrap_or_default()
	}
}

fn parse_page_config(text: &str) -> Result<Option<String>, ConfigError> {
	let raw: RawConfig = serde_json::from_str(text)?;
	Ok(raw
		.graphql_endpoint
		.map(|s| s.trim().to_string())
		.filter(|s| !s.is_empty()))
}

fn page_config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}
