//! UI components.

pub mod author_graph;
pub mod detail_panel;
pub mod subject_modal;
