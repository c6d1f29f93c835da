//! End-to-end exploration scenarios against a scripted provider.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;

use rdf_explorer::explorer::{
	DedupPolicy, Direction, EdgeKey, EntityGraph, ExpandOutcome, GraphDataProvider, GraphExplorer,
	InitOutcome, LiteralProperty, ProviderError, RawEdge, RawNode,
};

/// Serves canned graphs, or holds an entity's reply until the test releases it.
#[derive(Default)]
struct ScriptedProvider {
	ready: HashMap<(String, Direction), EntityGraph>,
	gates: RefCell<HashMap<String, oneshot::Receiver<EntityGraph>>>,
	graph_calls: Cell<usize>,
}

impl ScriptedProvider {
	fn with(mut self, entity: &str, direction: Direction, graph: EntityGraph) -> Self {
		self.ready.insert((entity.to_string(), direction), graph);
		self
	}

	/// The next fetch for `entity` waits for the returned sender.
	fn gate(&self, entity: &str) -> oneshot::Sender<EntityGraph> {
		let (tx, rx) = oneshot::channel();
		self.gates.borrow_mut().insert(entity.to_string(), rx);
		tx
	}
}

impl GraphDataProvider for ScriptedProvider {
	async fn entity_graph(
		&self,
		_graph: &str,
		entity: &str,
		_depth: u32,
		direction: Direction,
	) -> Result<EntityGraph, ProviderError> {
		self.graph_calls.set(self.graph_calls.get() + 1);
		let gate = self.gates.borrow_mut().remove(entity);
		if let Some(rx) = gate {
			return rx.await.map_err(|_| ProviderError::Status {
				status: 503,
				message: "reply dropped".into(),
			});
		}
		self.ready
			.get(&(entity.to_string(), direction))
			.cloned()
			.ok_or_else(|| ProviderError::Status {
				status: 404,
				message: format!("no graph for {entity}"),
			})
	}

	async fn entity_literals(
		&self,
		_graph: &str,
		_entity: &str,
	) -> Result<Vec<LiteralProperty>, ProviderError> {
		Ok(Vec::new())
	}
}

fn graph(nodes: &[&str], edges: &[(&str, &str, &str)]) -> EntityGraph {
	EntityGraph {
		nodes: nodes
			.iter()
			.map(|uri| RawNode {
				uri: uri.to_string(),
				label: None,
				is_central: false,
			})
			.collect(),
		edges: edges
			.iter()
			.map(|(source, target, predicate)| RawEdge {
				id: String::new(),
				source: source.to_string(),
				target: target.to_string(),
				uri: predicate.to_string(),
				label: None,
			})
			.collect(),
	}
}

const KNOWS: &str = "http://xmlns.com/foaf/0.1/knows";
const LIKES: &str = "http://example.org/likes";

/// A knows B and C; B and C each point at D and at one another.
fn triangle() -> ScriptedProvider {
	ScriptedProvider::default()
		.with(
			"ex:A",
			Direction::Both,
			graph(
				&["ex:A", "ex:B", "ex:C"],
				&[("ex:A", "ex:B", KNOWS), ("ex:A", "ex:C", KNOWS)],
			),
		)
		.with("ex:B", Direction::Outward, b_outward())
		.with("ex:C", Direction::Outward, c_outward())
}

fn b_outward() -> EntityGraph {
	graph(
		&["ex:B", "ex:A", "ex:C", "ex:D"],
		&[
			("ex:B", "ex:A", KNOWS),
			("ex:B", "ex:C", LIKES),
			("ex:B", "ex:D", KNOWS),
		],
	)
}

fn c_outward() -> EntityGraph {
	graph(
		&["ex:C", "ex:B", "ex:D"],
		&[("ex:C", "ex:B", LIKES), ("ex:C", "ex:D", KNOWS)],
	)
}

fn node_ids<P>(explorer: &GraphExplorer<P>) -> HashSet<String> {
	explorer.snapshot().nodes.into_iter().map(|node| node.id).collect()
}

fn edge_keys<P>(explorer: &GraphExplorer<P>, policy: DedupPolicy) -> HashSet<EdgeKey> {
	explorer
		.snapshot()
		.edges
		.iter()
		.map(|edge| edge.dedup_key(policy))
		.collect()
}

/// No duplicate relationships and no edge without both endpoints.
fn assert_consistent<P>(explorer: &GraphExplorer<P>, policy: DedupPolicy) {
	let snapshot = explorer.snapshot();
	let ids = node_ids(explorer);
	assert_eq!(ids.len(), snapshot.nodes.len(), "duplicate node ids");
	assert_eq!(
		edge_keys(explorer, policy).len(),
		snapshot.edges.len(),
		"duplicate relationships"
	);
	for edge in &snapshot.edges {
		assert!(ids.contains(&edge.source), "dangling source {}", edge.id);
		assert!(ids.contains(&edge.target), "dangling target {}", edge.id);
	}
	let central: Vec<_> = snapshot.nodes.iter().filter(|n| n.is_central).collect();
	assert_eq!(central.len(), 1);
	assert!(central[0].expanded);
}

/// Runs two gated expansions and releases the replies in the given order.
fn expand_concurrently(release_b_first: bool) -> Rc<GraphExplorer<ScriptedProvider>> {
	let explorer = Rc::new(GraphExplorer::new(triangle(), DedupPolicy::default()));
	block_on(explorer.initialize("ex:A", "people")).unwrap();

	let b_reply = explorer.provider().gate("ex:B");
	let c_reply = explorer.provider().gate("ex:C");

	let mut pool = LocalPool::new();
	let spawner = pool.spawner();
	for node in ["ex:B", "ex:C"] {
		let explorer = explorer.clone();
		spawner
			.spawn_local(async move {
				let outcome = explorer.expand(node).await.unwrap();
				assert!(matches!(outcome, ExpandOutcome::Merged(_)));
			})
			.unwrap();
	}
	pool.run_until_stalled();
	assert!(!explorer.is_expanded("ex:B"));
	assert!(!explorer.is_expanded("ex:C"));

	let (first, second) = if release_b_first {
		((b_reply, b_outward()), (c_reply, c_outward()))
	} else {
		((c_reply, c_outward()), (b_reply, b_outward()))
	};
	first.0.send(first.1).unwrap();
	pool.run_until_stalled();
	second.0.send(second.1).unwrap();
	pool.run_until_stalled();
	explorer
}

#[test]
fn concurrent_expansions_converge_in_either_order() {
	let b_first = expand_concurrently(true);
	let c_first = expand_concurrently(false);

	let policy = DedupPolicy::default();
	assert_consistent(&b_first, policy);
	assert_consistent(&c_first, policy);
	assert_eq!(node_ids(&b_first), node_ids(&c_first));
	assert_eq!(edge_keys(&b_first, policy), edge_keys(&c_first, policy));
	assert_eq!(b_first.snapshot().edges.len(), 5);
	for explorer in [&b_first, &c_first] {
		assert!(explorer.is_expanded("ex:B"));
		assert!(explorer.is_expanded("ex:C"));
		assert!(!explorer.is_expanded("ex:D"));
	}
}

#[test]
fn sequential_expansions_never_duplicate_relationships() {
	let explorer = GraphExplorer::new(triangle(), DedupPolicy::default());
	block_on(explorer.initialize("ex:A", "people")).unwrap();
	assert_consistent(&explorer, DedupPolicy::default());

	let ExpandOutcome::Merged(delta) = block_on(explorer.expand("ex:B")).unwrap() else {
		panic!("expected a merge");
	};
	// B->A repeats A->B; only D and the two new edges are added.
	assert_eq!(delta.nodes.len(), 1);
	assert_eq!(delta.nodes[0].id, "ex:D");
	assert_eq!(delta.edges.len(), 2);
	assert_consistent(&explorer, DedupPolicy::default());

	let ExpandOutcome::Merged(delta) = block_on(explorer.expand("ex:C")).unwrap() else {
		panic!("expected a merge");
	};
	assert!(delta.nodes.is_empty());
	assert_eq!(delta.edges.len(), 1);
	assert_eq!(delta.edges[0].target, "ex:D");
	assert_consistent(&explorer, DedupPolicy::default());
}

#[test]
fn endpoints_only_policy_ignores_predicate() {
	let provider = || {
		triangle().with(
			"ex:C",
			Direction::Outward,
			graph(&["ex:C", "ex:B"], &[("ex:C", "ex:B", KNOWS)]),
		)
	};
	let strict = GraphExplorer::new(provider(), DedupPolicy::EndpointsAndPredicate);
	let loose = GraphExplorer::new(provider(), DedupPolicy::EndpointsOnly);
	for explorer in [&strict, &loose] {
		block_on(explorer.initialize("ex:A", "people")).unwrap();
		block_on(explorer.expand("ex:B")).unwrap();
		block_on(explorer.expand("ex:C")).unwrap();
	}

	// C knows B is a new relationship next to B likes C only when predicates count.
	assert_eq!(strict.snapshot().edges.len(), 5);
	assert_eq!(loose.snapshot().edges.len(), 4);
	assert_consistent(&loose, DedupPolicy::EndpointsOnly);
}

#[test]
fn collapse_all_restores_the_initial_subgraph() {
	let explorer = GraphExplorer::new(triangle(), DedupPolicy::default());
	let InitOutcome::Seeded(initial) = block_on(explorer.initialize("ex:A", "people")).unwrap() else {
		panic!("expected a seed");
	};
	block_on(explorer.expand("ex:B")).unwrap();
	block_on(explorer.expand("ex:C")).unwrap();
	assert_ne!(explorer.snapshot(), initial);

	let InitOutcome::Seeded(collapsed) = block_on(explorer.collapse_all()).unwrap() else {
		panic!("expected a seed");
	};
	assert_eq!(collapsed, initial);
	assert_eq!(explorer.snapshot(), initial);
	assert!(!explorer.is_expanded("ex:B"));
	assert_eq!(explorer.generation(), 2);
}

#[test]
fn expansion_with_nothing_new_still_marks_expanded() {
	let provider = triangle().with(
		"ex:B",
		Direction::Outward,
		graph(&["ex:B", "ex:A"], &[("ex:B", "ex:A", KNOWS)]),
	);
	let explorer = GraphExplorer::new(provider, DedupPolicy::default());
	block_on(explorer.initialize("ex:A", "people")).unwrap();
	let before = explorer.snapshot();

	let outcome = block_on(explorer.expand("ex:B")).unwrap();
	let ExpandOutcome::Merged(delta) = outcome else {
		panic!("expected a merge");
	};
	assert!(delta.is_empty());
	assert!(explorer.is_expanded("ex:B"));
	assert_eq!(explorer.snapshot().edges, before.edges);
	assert_eq!(explorer.snapshot().nodes.len(), before.nodes.len());
}

#[test]
fn expansion_keeps_only_edges_leaving_the_node() {
	let provider = triangle().with(
		"ex:B",
		Direction::Outward,
		graph(
			&["ex:B", "ex:D", "ex:X"],
			&[("ex:B", "ex:D", KNOWS), ("ex:X", "ex:D", KNOWS)],
		),
	);
	let explorer = GraphExplorer::new(provider, DedupPolicy::default());
	block_on(explorer.initialize("ex:A", "people")).unwrap();
	block_on(explorer.expand("ex:B")).unwrap();

	assert!(explorer.node("ex:D").is_some());
	assert!(explorer.node("ex:X").is_none());
	assert!(explorer.snapshot().edges.iter().all(|edge| edge.source != "ex:X"));
	assert_consistent(&explorer, DedupPolicy::default());
}

#[test]
fn seed_drops_edges_to_missing_nodes_and_synthesizes_center() {
	let provider = ScriptedProvider::default().with(
		"http://example.org/people#alice",
		Direction::Both,
		graph(
			&["http://example.org/people#bob"],
			&[
				("http://example.org/people#alice", "http://example.org/people#bob", KNOWS),
				("http://example.org/people#bob", "http://example.org/people#zed", KNOWS),
			],
		),
	);
	let explorer = GraphExplorer::new(provider, DedupPolicy::default());
	block_on(explorer.initialize("http://example.org/people#alice", "people")).unwrap();

	let center = explorer.node("http://example.org/people#alice").unwrap();
	assert!(center.is_central);
	assert_eq!(center.label, "alice");
	assert_eq!(explorer.snapshot().edges.len(), 1);
	assert_consistent(&explorer, DedupPolicy::default());
}

#[test]
fn expanding_the_center_never_fetches() {
	let explorer = GraphExplorer::new(triangle(), DedupPolicy::default());
	block_on(explorer.initialize("ex:A", "people")).unwrap();
	assert_eq!(explorer.provider().graph_calls.get(), 1);

	assert_eq!(
		block_on(explorer.expand("ex:A")).unwrap(),
		ExpandOutcome::AlreadyExpanded
	);
	block_on(explorer.expand("ex:B")).unwrap();
	assert_eq!(
		block_on(explorer.expand("ex:B")).unwrap(),
		ExpandOutcome::AlreadyExpanded
	);
	assert_eq!(explorer.provider().graph_calls.get(), 2);
}

#[test]
fn late_expansion_after_recentering_is_ignored() {
	let provider = triangle().with(
		"ex:C",
		Direction::Both,
		graph(&["ex:C", "ex:A"], &[("ex:A", "ex:C", KNOWS)]),
	);
	let explorer = Rc::new(GraphExplorer::new(provider, DedupPolicy::default()));
	block_on(explorer.initialize("ex:A", "people")).unwrap();
	let b_reply = explorer.provider().gate("ex:B");

	let outcome = Rc::new(RefCell::new(None));
	let mut pool = LocalPool::new();
	{
		let (explorer, outcome) = (explorer.clone(), outcome.clone());
		pool.spawner()
			.spawn_local(async move {
				*outcome.borrow_mut() = Some(explorer.expand("ex:B").await.unwrap());
			})
			.unwrap();
	}
	pool.run_until_stalled();

	block_on(explorer.reset("ex:C")).unwrap();
	b_reply.send(b_outward()).unwrap();
	pool.run_until_stalled();

	assert_eq!(*outcome.borrow(), Some(ExpandOutcome::Discarded));
	assert!(explorer.node("ex:D").is_none());
	assert!(explorer.node("ex:B").is_none());
	assert_eq!(explorer.center().unwrap().entity_uri, "ex:C");
	assert_consistent(&explorer, DedupPolicy::default());
}
