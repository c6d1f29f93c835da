//! Deduplicated node/edge store for one entity-centric subgraph.
//!
//! Nodes are keyed by URI and kept in insertion order so the rendering
//! surface sees a stable element list. Edges are indexed by [`EdgeKey`],
//! which is what merges consult: a relationship discovered from the opposite
//! end is recognized as already present.

use std::collections::{HashMap, HashSet};

use super::types::{DedupPolicy, EdgeKey, EntityEdge, EntityGraph, EntityNode, RawNode, uri_fragment};

/// Elements added to a subgraph by one merge.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphDelta {
	pub nodes: Vec<EntityNode>,
	pub edges: Vec<EntityEdge>,
}

impl GraphDelta {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}
}

/// Node and edge collection with dedup and expansion tracking.
#[derive(Clone, Debug, Default)]
pub struct Subgraph {
	policy: DedupPolicy,
	nodes: Vec<EntityNode>,
	node_index: HashMap<String, usize>,
	edges: Vec<EntityEdge>,
	edge_keys: HashSet<EdgeKey>,
}

impl Subgraph {
	pub fn new(policy: DedupPolicy) -> Self {
		Self {
			policy,
			..Self::default()
		}
	}

	/// Builds the initial subgraph around `center` from a depth-1 response.
	///
	/// The center is the only central node and starts expanded. It is
	/// synthesized when the response omits it.
	pub fn seed(policy: DedupPolicy, center: &str, response: &EntityGraph) -> Self {
		let mut subgraph = Self::new(policy);
		let center_label = response
			.nodes
			.iter()
			.find(|node| node.uri == center)
			.and_then(|node| node.label.clone())
			.filter(|label| !label.is_empty())
			.unwrap_or_else(|| uri_fragment(center).to_string());
		subgraph.insert_node(EntityNode {
			id: center.to_string(),
			label: center_label,
			is_central: true,
			expanded: true,
		});
		subgraph.merge(response);
		subgraph
	}

	pub fn nodes(&self) -> &[EntityNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[EntityEdge] {
		&self.edges
	}

	pub fn node(&self, id: &str) -> Option<&EntityNode> {
		self.node_index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.node_index.contains_key(id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn central(&self) -> Option<&EntityNode> {
		self.nodes.iter().find(|node| node.is_central)
	}

	pub fn is_expanded(&self, id: &str) -> bool {
		self.node(id).is_some_and(|node| node.expanded)
	}

	/// Ids of every node whose neighbourhood has been loaded.
	pub fn expanded_ids(&self) -> impl Iterator<Item = &str> {
		self.nodes
			.iter()
			.filter(|node| node.expanded)
			.map(|node| node.id.as_str())
	}

	/// Sets the expanded flag. Returns `false` when the node is absent.
	pub fn mark_expanded(&mut self, id: &str) -> bool {
		match self.node_index.get(id) {
			Some(&i) => {
				self.nodes[i].expanded = true;
				true
			}
			None => false,
		}
	}

	/// Whether an edge equivalent to `edge` is already present.
	pub fn has_relationship(&self, edge: &EntityEdge) -> bool {
		self.edge_keys.contains(&edge.dedup_key(self.policy))
	}

	/// Merges `response` into the subgraph, returning what was added.
	///
	/// Nodes already present are left untouched. Edges are added only when no
	/// equivalent relationship exists and both endpoints are present after the
	/// node pass.
	pub fn merge(&mut self, response: &EntityGraph) -> GraphDelta {
		let mut delta = GraphDelta::default();

		for raw in &response.nodes {
			if raw.uri.is_empty() || self.contains_node(&raw.uri) {
				continue;
			}
			let node = EntityNode::discovered(raw);
			self.insert_node(node.clone());
			delta.nodes.push(node);
		}

		for raw in &response.edges {
			let edge = EntityEdge::from_raw(raw);
			if !self.contains_node(&edge.source) || !self.contains_node(&edge.target) {
				log::debug!("explorer: dropping dangling edge {}", edge.id);
				continue;
			}
			if self.has_relationship(&edge) {
				continue;
			}
			self.insert_edge(edge.clone());
			delta.edges.push(edge);
		}

		delta
	}

	fn insert_node(&mut self, node: EntityNode) {
		self.node_index.insert(node.id.clone(), self.nodes.len());
		self.nodes.push(node);
	}

	fn insert_edge(&mut self, edge: EntityEdge) {
		self.edge_keys.insert(edge.dedup_key(self.policy));
		self.edges.push(edge);
	}
}

/// Restricts an expansion response to `node_id`'s outward neighbourhood.
///
/// Keeps edges whose source is `node_id`, and nodes that are `node_id` itself
/// or the target of a kept edge.
pub fn outward_slice(node_id: &str, response: &EntityGraph) -> EntityGraph {
	let edges: Vec<_> = response
		.edges
		.iter()
		.filter(|edge| edge.source == node_id)
		.cloned()
		.collect();
	let targets: HashSet<&str> = edges.iter().map(|edge| edge.target.as_str()).collect();
	let nodes: Vec<RawNode> = response
		.nodes
		.iter()
		.filter(|node| node.uri == node_id || targets.contains(node.uri.as_str()))
		.cloned()
		.collect();
	EntityGraph { nodes, edges }
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::explorer::types::RawEdge;

	fn node(uri: &str) -> RawNode {
		RawNode {
			uri: uri.into(),
			label: None,
			is_central: false,
		}
	}

	fn edge(source: &str, target: &str, predicate: &str) -> RawEdge {
		RawEdge {
			id: String::new(),
			source: source.into(),
			target: target.into(),
			uri: predicate.into(),
			label: None,
		}
	}

	fn alice_knows_bob() -> EntityGraph {
		EntityGraph {
			nodes: vec![node("ex:Alice"), node("ex:Bob")],
			edges: vec![edge("ex:Alice", "ex:Bob", "foaf:knows")],
		}
	}

	#[test]
	fn seed_marks_only_center_central_and_expanded() {
		let mut response = alice_knows_bob();
		response.nodes[1].is_central = true;
		let subgraph = Subgraph::seed(DedupPolicy::default(), "ex:Alice", &response);

		assert_eq!(subgraph.nodes().len(), 2);
		assert_eq!(subgraph.edges().len(), 1);
		let alice = subgraph.node("ex:Alice").unwrap();
		assert!(alice.is_central && alice.expanded);
		let bob = subgraph.node("ex:Bob").unwrap();
		assert!(!bob.is_central && !bob.expanded);
		assert_eq!(subgraph.central().map(|n| n.id.as_str()), Some("ex:Alice"));
	}

	#[test]
	fn seed_synthesizes_missing_center() {
		let response = EntityGraph {
			nodes: vec![node("ex:Bob")],
			edges: vec![edge("http://ex.org/people/Alice", "ex:Bob", "foaf:knows")],
		};
		let subgraph = Subgraph::seed(DedupPolicy::default(), "http://ex.org/people/Alice", &response);
		let alice = subgraph.node("http://ex.org/people/Alice").unwrap();
		assert_eq!(alice.label, "Alice");
		assert!(alice.is_central);
		assert_eq!(subgraph.edges().len(), 1);
	}

	#[test]
	fn dangling_edges_are_dropped() {
		let response = EntityGraph {
			nodes: vec![node("ex:Alice")],
			edges: vec![edge("ex:Alice", "ex:Nobody", "foaf:knows")],
		};
		let subgraph = Subgraph::seed(DedupPolicy::default(), "ex:Alice", &response);
		assert!(subgraph.edges().is_empty());
	}

	#[test]
	fn reverse_relationship_is_not_added_twice() {
		let mut subgraph = Subgraph::seed(DedupPolicy::default(), "ex:Alice", &alice_knows_bob());
		let delta = subgraph.merge(&EntityGraph {
			nodes: vec![node("ex:Bob"), node("ex:Alice")],
			edges: vec![edge("ex:Bob", "ex:Alice", "foaf:knows")],
		});
		assert!(delta.is_empty());
		assert_eq!(subgraph.edges().len(), 1);
	}

	#[test]
	fn edges_with_separator_in_uris_are_both_kept() {
		let response = EntityGraph {
			nodes: vec![node("a"), node("a|p"), node("b")],
			edges: vec![edge("a|p", "b", "q"), edge("a", "b", "p|q")],
		};
		let subgraph = Subgraph::seed(DedupPolicy::default(), "a", &response);
		let ids: HashSet<_> = subgraph.edges().iter().map(|e| e.id.as_str()).collect();
		assert_eq!(subgraph.edges().len(), 2);
		assert_eq!(ids.len(), 2);
	}

	#[test]
	fn endpoints_only_policy_collapses_predicates() {
		let mut response = alice_knows_bob();
		response.edges.push(edge("ex:Bob", "ex:Alice", "ex:worksWith"));

		let strict = Subgraph::seed(DedupPolicy::EndpointsAndPredicate, "ex:Alice", &response);
		assert_eq!(strict.edges().len(), 2);

		let loose = Subgraph::seed(DedupPolicy::EndpointsOnly, "ex:Alice", &response);
		assert_eq!(loose.edges().len(), 1);
	}

	#[test]
	fn merge_keeps_existing_node_state() {
		let mut subgraph = Subgraph::seed(DedupPolicy::default(), "ex:Alice", &alice_knows_bob());
		subgraph.mark_expanded("ex:Bob");
		let delta = subgraph.merge(&EntityGraph {
			nodes: vec![RawNode {
				uri: "ex:Bob".into(),
				label: Some("Robert".into()),
				is_central: true,
			}],
			edges: vec![],
		});
		assert!(delta.is_empty());
		let bob = subgraph.node("ex:Bob").unwrap();
		assert_eq!(bob.label, "ex:Bob");
		assert!(bob.expanded);
		assert!(!bob.is_central);
	}

	#[test]
	fn outward_slice_filters_foreign_edges_and_nodes() {
		let response = EntityGraph {
			nodes: vec![node("ex:Bob"), node("ex:Carol"), node("ex:Dave"), node("ex:Eve")],
			edges: vec![
				edge("ex:Bob", "ex:Carol", "foaf:knows"),
				edge("ex:Dave", "ex:Bob", "foaf:knows"),
				edge("ex:Eve", "ex:Carol", "foaf:knows"),
			],
		};
		let slice = outward_slice("ex:Bob", &response);
		let uris: Vec<_> = slice.nodes.iter().map(|n| n.uri.as_str()).collect();
		assert_eq!(uris, ["ex:Bob", "ex:Carol"]);
		assert_eq!(slice.edges.len(), 1);
		assert_eq!(slice.edges[0].target, "ex:Carol");
	}

	#[test]
	fn expanded_ids_follow_flags() {
		let mut subgraph = Subgraph::seed(DedupPolicy::default(), "ex:Alice", &alice_knows_bob());
		assert!(!subgraph.mark_expanded("ex:Nobody"));
		assert!(subgraph.mark_expanded("ex:Bob"));
		let mut ids: Vec<_> = subgraph.expanded_ids().collect();
		ids.sort();
		assert_eq!(ids, ["ex:Alice", "ex:Bob"]);
	}
}
