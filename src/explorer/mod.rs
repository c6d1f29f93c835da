//! Incremental exploration of an entity-centric RDF subgraph.
//!
//! A session starts from one entity's depth-1 neighbourhood and grows as
//! nodes are expanded. Each expansion fetches only the node's outward edges and
//! merges them into the existing set, so a relationship reached from both of
//! its ends is shown once.
//!
//! ```ignore
//! let explorer = GraphExplorer::new(HttpGraphProvider::new(&config), config.dedup);
//! explorer.subscribe(|event| log::info!("{event:?}"));
//! explorer.initialize("http://example.org/Alice", "people").await?;
//! explorer.select_node("http://example.org/Bob").await?;
//! ```

mod http;
mod provider;
mod session;
mod subgraph;
mod types;

use thiserror::Error;

pub use http::HttpGraphProvider;
pub use provider::{GraphDataProvider, ProviderError};
pub use session::{
	Center, ExpandOutcome, ExpandPlan, ExpandTicket, ExplorerEvent, GraphExplorer, GraphSnapshot,
	InitOutcome, InitTicket, Selection, SubscriptionId,
};
pub use subgraph::{GraphDelta, Subgraph, outward_slice};
pub use types::{
	DedupPolicy, Direction, EdgeKey, EntityEdge, EntityGraph, EntityNode, LiteralProperty, RawEdge,
	RawNode, edge_id, uri_fragment,
};

/// Errors surfaced by explorer operations. None of them leaves the explorer
/// unusable.
#[derive(Debug, Error)]
pub enum ExplorerError {
	#[error("failed to load graph for {entity}: {source}")]
	Fetch {
		entity: String,
		#[source]
		source: ProviderError,
	},

	#[error("{0} is not part of the current graph")]
	UnknownNode(String),

	#[error("no entity has been opened yet")]
	NotInitialized,

	#[error("invalid argument: {0}")]
	InvalidArgument(&'static str),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
