//! Force-directed rendering surface for the entity graph.
//!
//! Renders an interactive force-directed graph on an HTML canvas with:
//! - Physics-based node positioning via force simulation
//! - Incremental growth: expanded neighbourhoods are added in place
//! - Pan, zoom, node dragging and click-to-select
//! - Hover highlighting of a node's neighbourhood
//!
//! # Example
//!
//! ```ignore
//! let feed = SurfaceFeed::default();
//! explorer.subscribe({
//!     let feed = feed.clone();
//!     move |event| feed.push_event(event)
//! });
//! let on_click: Rc<dyn Fn(String)> = Rc::new(|uri| log::info!("clicked {uri}"));
//!
//! view! { <ForceGraphCanvas feed=feed on_node_click=on_click fullscreen=true /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;
mod types;

pub use component::ForceGraphCanvas;
pub use theme::Theme;
pub use types::{SurfaceCommand, SurfaceFeed};
