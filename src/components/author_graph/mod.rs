//! Author/book relationship graph component.
//!
//! Lays an [`AuthorGraph`](crate::model::AuthorGraph) out top-to-bottom in
//! ranked layers and renders it on an HTML canvas with:
//! - Author and book boxes with title and year lines
//! - Labelled, arrowed edges; influence edges animate
//! - Click, drag, pan, and zoom interactions with hover highlighting
//! - Zoom/fit controls and a minimap
//!
//! # Example
//!
//! ```ignore
//! use reading_graph::{AuthorGraphView, NodeClick};
//!
//! let on_click = Callback::new(|click: NodeClick| log::info!("{} {}", click.node_type, click.id));
//! view! { <AuthorGraphView data=graph on_node_click=on_click height=600.0 /> }
//! ```

mod component;
mod layout;
mod render;
mod scale;
mod state;
mod theme;
mod types;

pub use component::AuthorGraphView;
pub use theme::Theme;
pub use types::NodeClick;
