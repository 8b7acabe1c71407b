//! reading-graph: explore an author/book influence network in the browser.
//!
//! This crate provides a WASM client for a GraphQL reading-log API. Users
//! search for an author, view the surrounding network of authors and books
//! as a layered diagram, and drill into author, book and subject details.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

mod api;
mod components;
mod config;
mod explorer;
mod links;
pub mod model;
mod pages;

pub use components::author_graph::{AuthorGraphView, NodeClick};
pub use pages::HomePage;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("reading-graph: logging initialized");
}

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Git Reading - Author Graph Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<HomePage />
	}
}
