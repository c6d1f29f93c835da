//! REST implementation of [`GraphDataProvider`].
//!
//! Talks to the upload backend's entity endpoints:
//! `GET /api/graphs/{graph}/entities/{uri}/graph` and
//! `GET /api/graphs/{graph}/entities/{uri}/literals`.

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use super::provider::{GraphDataProvider, ProviderError};
use super::types::{Direction, EntityGraph, LiteralProperty};
use crate::config::ExplorerConfig;

/// Graph data provider backed by the backend REST API.
#[derive(Clone, Debug)]
pub struct HttpGraphProvider {
	client: Client,
	base_url: String,
	max_nodes: u32,
}

impl HttpGraphProvider {
	pub fn new(config: &ExplorerConfig) -> Self {
		Self {
			client: Client::new(),
			base_url: config.api_base_url.clone(),
			max_nodes: config.max_nodes,
		}
	}

	/// Builds `{base}/api/graphs/{graph}/entities/{entity}/{leaf}` with each
	/// dynamic segment percent-encoded.
	pub fn entity_url(&self, graph: &str, entity: &str, leaf: &str) -> Result<Url, ProviderError> {
		let mut url =
			Url::parse(&self.base_url).map_err(|e| ProviderError::InvalidUrl(e.to_string()))?;
		url.path_segments_mut()
			.map_err(|_| ProviderError::InvalidUrl(self.base_url.clone()))?
			.pop_if_empty()
			.extend(["api", "graphs", graph, "entities", entity, leaf]);
		Ok(url)
	}

	async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ProviderError> {
		let status = response.status();
		if !status.is_success() {
			let message = response.text().await.unwrap_or_default();
			return Err(ProviderError::Status {
				status: status.as_u16(),
				message,
			});
		}
		Ok(response.json().await?)
	}
}

impl GraphDataProvider for HttpGraphProvider {
	async fn entity_graph(
		&self,
		graph: &str,
		entity: &str,
		depth: u32,
		direction: Direction,
	) -> Result<EntityGraph, ProviderError> {
		let url = self.entity_url(graph, entity, "graph")?;
		log::debug!("explorer: GET {url} depth={depth} direction={}", direction.as_str());
		let response = self
			.client
			.get(url)
			.query(&[
				("depth", depth.to_string()),
				("maxNodes", self.max_nodes.to_string()),
				("direction", direction.as_str().to_string()),
			])
			.send()
			.await?;
		Self::decode(response).await
	}

	async fn entity_literals(
		&self,
		graph: &str,
		entity: &str,
	) -> Result<Vec<LiteralProperty>, ProviderError> {
		let url = self.entity_url(graph, entity, "literals")?;
		let response = self.client.get(url).send().await?;
		Self::decode(response).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn provider(base: &str) -> HttpGraphProvider {
		HttpGraphProvider::new(&ExplorerConfig {
			api_base_url: base.into(),
			..ExplorerConfig::default()
		})
	}

	#[test]
	fn entity_url_encodes_uri_segment() {
		let url = provider("http://localhost:5000")
			.entity_url("my graph", "http://ex.org/people#Alice", "graph")
			.unwrap();
		assert_eq!(
			url.as_str(),
			"http://localhost:5000/api/graphs/my%20graph/entities/http:%2F%2Fex.org%2Fpeople%23Alice/graph"
		);
	}

	#[test]
	fn entity_url_tolerates_trailing_slash() {
		let url = provider("http://localhost:5000/backend/")
			.entity_url("g1", "ex:Alice", "literals")
			.unwrap();
		assert_eq!(
			url.as_str(),
			"http://localhost:5000/backend/api/graphs/g1/entities/ex:Alice/literals"
		);
	}

	#[test]
	fn entity_url_rejects_relative_base() {
		assert!(matches!(
			provider("not a url").entity_url("g1", "ex:Alice", "graph"),
			Err(ProviderError::InvalidUrl(_))
		));
	}
}
