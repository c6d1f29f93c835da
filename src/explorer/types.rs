//! Node, edge and wire types shared by the explorer and its providers.

use serde::{Deserialize, Serialize};

/// Which edges the provider should follow from an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	/// Edges whose subject is the entity.
	Outward,
	/// Edges whose object is the entity.
	Inward,
	/// Both of the above.
	Both,
}

impl Direction {
	pub fn as_str(self) -> &'static str {
		match self {
			Direction::Outward => "outward",
			Direction::Inward => "inward",
			Direction::Both => "both",
		}
	}
}

/// How two edges are judged to describe the same relationship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
	/// Same endpoints (either order) and same predicate.
	#[default]
	EndpointsAndPredicate,
	/// Same endpoints (either order), whatever the predicate.
	EndpointsOnly,
}

/// A node as returned by the graph endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
	pub uri: String,
	#[serde(default)]
	pub label: Option<String>,
	#[serde(default)]
	pub is_central: bool,
}

/// An edge as returned by the graph endpoint. `uri` is the predicate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEdge {
	#[serde(default)]
	pub id: String,
	pub source: String,
	pub target: String,
	#[serde(default)]
	pub uri: String,
	#[serde(default)]
	pub label: Option<String>,
}

/// Response body of `entity_graph`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityGraph {
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	#[serde(default)]
	pub edges: Vec<RawEdge>,
}

/// One literal-valued property of an entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralProperty {
	pub predicate: String,
	#[serde(default)]
	pub predicate_label: Option<String>,
	pub value: String,
	#[serde(default)]
	pub datatype: Option<String>,
}

impl LiteralProperty {
	/// Display name for the predicate, falling back to its URI fragment.
	pub fn display_predicate(&self) -> &str {
		match self.predicate_label.as_deref() {
			Some(label) if !label.is_empty() => label,
			_ => uri_fragment(&self.predicate),
		}
	}
}

/// An entity in the explored subgraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityNode {
	pub id: String,
	pub label: String,
	pub is_central: bool,
	pub expanded: bool,
}

impl EntityNode {
	/// A freshly discovered, unexpanded, non-central node.
	pub fn discovered(raw: &RawNode) -> Self {
		Self {
			id: raw.uri.clone(),
			label: label_or_fragment(raw.label.as_deref(), &raw.uri),
			is_central: false,
			expanded: false,
		}
	}
}

/// A directed, labelled relationship between two entities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityEdge {
	pub id: String,
	pub source: String,
	pub target: String,
	pub predicate_uri: String,
	pub label: String,
}

impl EntityEdge {
	pub fn new(source: &str, target: &str, predicate_uri: &str, label: Option<&str>) -> Self {
		Self {
			id: edge_id(source, target, predicate_uri),
			source: source.to_string(),
			target: target.to_string(),
			predicate_uri: predicate_uri.to_string(),
			label: label_or_fragment(label, predicate_uri),
		}
	}

	pub fn from_raw(raw: &RawEdge) -> Self {
		Self::new(&raw.source, &raw.target, &raw.uri, raw.label.as_deref())
	}

	/// Identity used to detect the same relationship seen from either end.
	pub fn dedup_key(&self, policy: DedupPolicy) -> EdgeKey {
		let (low, high) = if self.source <= self.target {
			(self.source.clone(), self.target.clone())
		} else {
			(self.target.clone(), self.source.clone())
		};
		let predicate = match policy {
			DedupPolicy::EndpointsAndPredicate => Some(self.predicate_uri.clone()),
			DedupPolicy::EndpointsOnly => None,
		};
		EdgeKey {
			low,
			high,
			predicate,
		}
	}
}

/// Normalized edge identity: endpoints sorted, predicate optional.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EdgeKey {
	low: String,
	high: String,
	predicate: Option<String>,
}

/// Deterministic edge id, unique per `(source, predicate, target)`.
///
/// Each part is prefixed with its byte length, so URIs containing the
/// separator cannot collide.
pub fn edge_id(source: &str, target: &str, predicate_uri: &str) -> String {
	format!(
		"{}:{source}|{}:{predicate_uri}|{}:{target}",
		source.len(),
		predicate_uri.len(),
		target.len()
	)
}

/// The part of a URI after its last `#` or `/`.
pub fn uri_fragment(uri: &str) -> &str {
	if uri.is_empty() {
		return "Unknown";
	}
	match uri.rsplit(['#', '/']).next() {
		Some(fragment) if !fragment.is_empty() => fragment,
		_ => uri,
	}
}

fn label_or_fragment(label: Option<&str>, uri: &str) -> String {
	match label {
		Some(label) if !label.is_empty() => label.to_string(),
		_ => uri_fragment(uri).to_string(),
	}
}
