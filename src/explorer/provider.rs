//! The data source the explorer pulls neighbourhoods and literals from.

use thiserror::Error;

use super::types::{Direction, EntityGraph, LiteralProperty};

/// Errors a [`GraphDataProvider`] can report.
#[derive(Debug, Error)]
pub enum ProviderError {
	#[error("request failed: {0}")]
	Request(#[from] reqwest::Error),

	#[error("server returned {status}: {message}")]
	Status { status: u16, message: String },

	#[error("invalid endpoint url: {0}")]
	InvalidUrl(String),
}

/// Source of entity neighbourhoods and literal properties.
///
/// Implementations are driven from a single-threaded event loop, so the
/// returned futures need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait GraphDataProvider {
	/// Nodes and edges around `entity` up to `depth` hops.
	async fn entity_graph(
		&self,
		graph: &str,
		entity: &str,
		depth: u32,
		direction: Direction,
	) -> Result<EntityGraph, ProviderError>;

	/// Literal-valued properties of `entity`.
	async fn entity_literals(
		&self,
		graph: &str,
		entity: &str,
	) -> Result<Vec<LiteralProperty>, ProviderError>;
}
