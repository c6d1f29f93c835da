//! UI components: the graph canvas and the literal panel.

pub mod force_graph;
pub mod literal_panel;
