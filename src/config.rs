//! Explorer configuration.
//!
//! Read once at startup from a `<script id="explorer-config">` JSON element and
//! handed to each component explicitly. Missing fields take their defaults.

use serde::Deserialize;

use crate::explorer::DedupPolicy;

/// Runtime settings for the explorer and its HTTP provider.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExplorerConfig {
	/// Base URL of the backend REST API.
	pub api_base_url: String,
	/// Named graph to explore.
	pub graph_name: String,
	/// Entity to center on at startup, if any.
	pub entity_uri: Option<String>,
	/// Upper bound the backend applies to nodes per neighbourhood.
	pub max_nodes: u32,
	/// Edge identity rule used when merging.
	pub dedup: DedupPolicy,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			api_base_url: "http://localhost:5000".to_string(),
			graph_name: "default".to_string(),
			entity_uri: None,
			max_nodes: 50,
			dedup: DedupPolicy::default(),
		}
	}
}

impl ExplorerConfig {
	/// Parses a JSON document, falling back to defaults on error.
	pub fn from_json(json: &str) -> Self {
		match serde_json::from_str::<Self>(json) {
			Ok(config) => config,
			Err(e) => {
				log::warn!("explorer: invalid config, using defaults: {}", e);
				Self::default()
			}
		}
	}
}
