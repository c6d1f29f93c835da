//! The explorer: one entity-centric subgraph session and its expansions.
//!
//! Every operation that talks to the provider is split in two synchronous
//! halves around the fetch. `begin_*` applies the guards and hands out a
//! ticket tagged with the current session generation; `finish_*` merges the
//! response against whatever the state looks like when it arrives. A ticket
//! from an older generation (the session was re-centered or collapsed in the
//! meantime) is discarded without touching state. The async methods simply
//! await the provider between the two halves, never holding a borrow across
//! the await.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use futures::future;
use log::{debug, info, warn};

use super::provider::{GraphDataProvider, ProviderError};
use super::subgraph::{GraphDelta, Subgraph, outward_slice};
use super::types::{DedupPolicy, Direction, EntityEdge, EntityGraph, EntityNode, LiteralProperty};
use super::{ExplorerError, Result};

/// Depth of every neighbourhood fetch.
const FETCH_DEPTH: u32 = 1;

/// The entity and graph a session is rooted on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Center {
	pub entity_uri: String,
	pub graph_name: String,
}

/// Full element list of the current subgraph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
	pub nodes: Vec<EntityNode>,
	pub edges: Vec<EntityEdge>,
}

/// The node shown in the literal panel.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
	pub node_id: String,
	pub label: String,
	pub literals: Vec<LiteralProperty>,
}

/// Notifications delivered to subscribers after each state change.
#[derive(Clone, Debug, PartialEq)]
pub enum ExplorerEvent {
	/// The subgraph was (re)seeded; replace everything shown.
	Reset { center: Center, snapshot: GraphSnapshot },
	/// `node_id` was expanded; `delta` lists only the added elements.
	Expanded { node_id: String, delta: GraphDelta },
	/// A node was selected and its literals loaded.
	Selected(Selection),
	/// A fetch failed; state was left as it was.
	Failed { message: String },
}

/// Result of seeding a session.
#[derive(Clone, Debug, PartialEq)]
pub enum InitOutcome {
	Seeded(GraphSnapshot),
	/// A newer session started before the response arrived.
	Discarded,
}

/// Result of an expansion request.
#[derive(Clone, Debug, PartialEq)]
pub enum ExpandOutcome {
	/// The node was the center or already expanded; nothing fetched.
	AlreadyExpanded,
	/// An expansion of this node is still in flight; nothing fetched.
	InFlight,
	/// The response was merged. The delta may be empty.
	Merged(GraphDelta),
	/// The session changed before the response arrived.
	Discarded,
}

/// Pending seed fetch.
#[derive(Clone, Debug)]
pub struct InitTicket {
	generation: u64,
	center: Center,
}

impl InitTicket {
	pub fn center(&self) -> &Center {
		&self.center
	}
}

/// Pending expansion fetch.
#[derive(Clone, Debug)]
pub struct ExpandTicket {
	generation: u64,
	node_id: String,
	graph_name: String,
}

impl ExpandTicket {
	pub fn node_id(&self) -> &str {
		&self.node_id
	}

	pub fn graph_name(&self) -> &str {
		&self.graph_name
	}
}

/// What `begin_expand` decided.
#[derive(Clone, Debug)]
pub enum ExpandPlan {
	Skip(ExpandOutcome),
	Fetch(ExpandTicket),
}

/// Handle returned by [`GraphExplorer::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Rc<dyn Fn(&ExplorerEvent)>;

#[derive(Default)]
struct Session {
	generation: u64,
	center: Option<Center>,
	subgraph: Subgraph,
	in_flight: HashSet<String>,
	selection: Option<Selection>,
}

/// Incremental explorer over a [`GraphDataProvider`].
pub struct GraphExplorer<P> {
	provider: P,
	policy: DedupPolicy,
	session: RefCell<Session>,
	observers: RefCell<Vec<(SubscriptionId, Observer)>>,
	next_subscription: Cell<u64>,
}

impl<P> GraphExplorer<P> {
	pub fn new(provider: P, policy: DedupPolicy) -> Self {
		Self {
			provider,
			policy,
			session: RefCell::new(Session {
				subgraph: Subgraph::new(policy),
				..Session::default()
			}),
			observers: RefCell::new(Vec::new()),
			next_subscription: Cell::new(0),
		}
	}

	pub fn provider(&self) -> &P {
		&self.provider
	}

	/// Registers a callback invoked after every state change.
	pub fn subscribe(&self, observer: impl Fn(&ExplorerEvent) + 'static) -> SubscriptionId {
		let id = SubscriptionId(self.next_subscription.get());
		self.next_subscription.set(id.0 + 1);
		self.observers.borrow_mut().push((id, Rc::new(observer)));
		id
	}

	pub fn unsubscribe(&self, id: SubscriptionId) {
		self.observers.borrow_mut().retain(|(sid, _)| *sid != id);
	}

	fn notify(&self, event: ExplorerEvent) {
		let observers: Vec<Observer> = self
			.observers
			.borrow()
			.iter()
			.map(|(_, observer)| observer.clone())
			.collect();
		for observer in observers {
			observer(&event);
		}
	}

	pub fn center(&self) -> Option<Center> {
		self.session.borrow().center.clone()
	}

	/// Incremented by every (re)initialization.
	pub fn generation(&self) -> u64 {
		self.session.borrow().generation
	}

	pub fn snapshot(&self) -> GraphSnapshot {
		let session = self.session.borrow();
		GraphSnapshot {
			nodes: session.subgraph.nodes().to_vec(),
			edges: session.subgraph.edges().to_vec(),
		}
	}

	pub fn node(&self, id: &str) -> Option<EntityNode> {
		self.session.borrow().subgraph.node(id).cloned()
	}

	pub fn is_expanded(&self, id: &str) -> bool {
		self.session.borrow().subgraph.is_expanded(id)
	}

	pub fn selection(&self) -> Option<Selection> {
		self.session.borrow().selection.clone()
	}

	/// Discards the current session and starts a new one rooted on
	/// `entity_uri`. State stays empty until the seed response is merged.
	pub fn begin_initialize(&self, entity_uri: &str, graph_name: &str) -> Result<InitTicket> {
		if entity_uri.is_empty() {
			return Err(ExplorerError::InvalidArgument("entity uri is empty"));
		}
		if graph_name.is_empty() {
			return Err(ExplorerError::InvalidArgument("graph name is empty"));
		}
		let center = Center {
			entity_uri: entity_uri.to_string(),
			graph_name: graph_name.to_string(),
		};
		let mut session = self.session.borrow_mut();
		*session = Session {
			generation: session.generation + 1,
			center: Some(center.clone()),
			subgraph: Subgraph::new(self.policy),
			in_flight: HashSet::new(),
			selection: None,
		};
		debug!(
			"explorer: session {} centered on {} in {}",
			session.generation, center.entity_uri, center.graph_name
		);
		Ok(InitTicket {
			generation: session.generation,
			center,
		})
	}

	/// Seeds the session from the response to `ticket`'s fetch.
	pub fn finish_initialize(
		&self,
		ticket: InitTicket,
		response: std::result::Result<EntityGraph, ProviderError>,
	) -> Result<InitOutcome> {
		let snapshot = {
			let mut session = self.session.borrow_mut();
			if session.generation != ticket.generation {
				warn!(
					"explorer: discarding seed for {} from session {}",
					ticket.center.entity_uri, ticket.generation
				);
				return Ok(InitOutcome::Discarded);
			}
			match response {
				Ok(graph) => {
					session.subgraph = Subgraph::seed(self.policy, &ticket.center.entity_uri, &graph);
					info!(
						"explorer: seeded {} with {} nodes, {} edges",
						ticket.center.entity_uri,
						session.subgraph.nodes().len(),
						session.subgraph.edges().len()
					);
					GraphSnapshot {
						nodes: session.subgraph.nodes().to_vec(),
						edges: session.subgraph.edges().to_vec(),
					}
				}
				Err(source) => {
					drop(session);
					return Err(self.fetch_failed(&ticket.center.entity_uri, source));
				}
			}
		};
		self.notify(ExplorerEvent::Reset {
			center: ticket.center,
			snapshot: snapshot.clone(),
		});
		Ok(InitOutcome::Seeded(snapshot))
	}

	/// Applies the expansion guards for `node_id`.
	///
	/// The center and already-expanded nodes are (re)marked expanded and
	/// skipped, as is a node whose expansion is still in flight. Anything else
	/// yields a ticket for an outward fetch.
	pub fn begin_expand(&self, node_id: &str) -> Result<ExpandPlan> {
		let mut session = self.session.borrow_mut();
		let Some(center) = session.center.clone() else {
			return Err(ExplorerError::NotInitialized);
		};
		if node_id == center.entity_uri || session.subgraph.is_expanded(node_id) {
			session.subgraph.mark_expanded(node_id);
			return Ok(ExpandPlan::Skip(ExpandOutcome::AlreadyExpanded));
		}
		if !session.subgraph.contains_node(node_id) {
			return Err(ExplorerError::UnknownNode(node_id.to_string()));
		}
		if !session.in_flight.insert(node_id.to_string()) {
			return Ok(ExpandPlan::Skip(ExpandOutcome::InFlight));
		}
		debug!("explorer: expanding {}", node_id);
		Ok(ExpandPlan::Fetch(ExpandTicket {
			generation: session.generation,
			node_id: node_id.to_string(),
			graph_name: center.graph_name,
		}))
	}

	/// Merges the outward neighbourhood fetched for `ticket`.
	pub fn finish_expand(
		&self,
		ticket: ExpandTicket,
		response: std::result::Result<EntityGraph, ProviderError>,
	) -> Result<ExpandOutcome> {
		let delta = {
			let mut session = self.session.borrow_mut();
			if session.generation != ticket.generation {
				warn!(
					"explorer: discarding expansion of {} from session {}",
					ticket.node_id, ticket.generation
				);
				return Ok(ExpandOutcome::Discarded);
			}
			session.in_flight.remove(&ticket.node_id);
			let graph = match response {
				Ok(graph) => graph,
				Err(source) => {
					drop(session);
					return Err(self.fetch_failed(&ticket.node_id, source));
				}
			};
			let delta = session.subgraph.merge(&outward_slice(&ticket.node_id, &graph));
			session.subgraph.mark_expanded(&ticket.node_id);
			debug!(
				"explorer: {} added {} nodes, {} edges",
				ticket.node_id,
				delta.nodes.len(),
				delta.edges.len()
			);
			delta
		};
		self.notify(ExplorerEvent::Expanded {
			node_id: ticket.node_id,
			delta: delta.clone(),
		});
		Ok(ExpandOutcome::Merged(delta))
	}

	fn fetch_failed(&self, entity: &str, source: ProviderError) -> ExplorerError {
		let error = ExplorerError::Fetch {
			entity: entity.to_string(),
			source,
		};
		warn!("explorer: {}", error);
		self.notify(ExplorerEvent::Failed {
			message: error.to_string(),
		});
		error
	}
}

impl<P: GraphDataProvider> GraphExplorer<P> {
	/// Starts a session on `entity_uri` with its depth-1 neighbourhood in
	/// both directions.
	pub async fn initialize(&self, entity_uri: &str, graph_name: &str) -> Result<InitOutcome> {
		let ticket = self.begin_initialize(entity_uri, graph_name)?;
		let response = self
			.provider
			.entity_graph(graph_name, entity_uri, FETCH_DEPTH, Direction::Both)
			.await;
		self.finish_initialize(ticket, response)
	}

	/// Fetches and merges `node_id`'s outward neighbourhood, unless it is
	/// the center or already expanded.
	pub async fn expand(&self, node_id: &str) -> Result<ExpandOutcome> {
		let ticket = match self.begin_expand(node_id)? {
			ExpandPlan::Skip(outcome) => return Ok(outcome),
			ExpandPlan::Fetch(ticket) => ticket,
		};
		let response = self
			.provider
			.entity_graph(&ticket.graph_name, node_id, FETCH_DEPTH, Direction::Outward)
			.await;
		self.finish_expand(ticket, response)
	}

	/// Selects `node_id`: loads its literals for display and expands it.
	///
	/// A literal fetch failure only empties the panel; the expansion result
	/// is what gets returned.
	pub async fn select_node(&self, node_id: &str) -> Result<ExpandOutcome> {
		let (generation, graph_name, label) = {
			let mut session = self.session.borrow_mut();
			let Some(center) = session.center.clone() else {
				return Err(ExplorerError::NotInitialized);
			};
			let Some(node) = session.subgraph.node(node_id) else {
				return Err(ExplorerError::UnknownNode(node_id.to_string()));
			};
			let label = node.label.clone();
			session.selection = Some(Selection {
				node_id: node_id.to_string(),
				label: label.clone(),
				literals: Vec::new(),
			});
			(session.generation, center.graph_name, label)
		};

		let literals = async {
			match self.provider.entity_literals(&graph_name, node_id).await {
				Ok(literals) => literals,
				Err(e) => {
					warn!("explorer: literals for {} unavailable: {}", node_id, e);
					Vec::new()
				}
			}
		};
		let (literals, expansion) = future::join(literals, self.expand(node_id)).await;

		let selection = {
			let mut session = self.session.borrow_mut();
			let current = session.selection.as_ref().map(|s| s.node_id.as_str());
			if session.generation != generation || current != Some(node_id) {
				None
			} else {
				let selection = Selection {
					node_id: node_id.to_string(),
					label,
					literals,
				};
				session.selection = Some(selection.clone());
				Some(selection)
			}
		};
		if let Some(selection) = selection {
			self.notify(ExplorerEvent::Selected(selection));
		}
		expansion
	}

	/// Drops every expansion and reseeds from the original center.
	pub async fn collapse_all(&self) -> Result<InitOutcome> {
		let center = self.center().ok_or(ExplorerError::NotInitialized)?;
		self.initialize(&center.entity_uri, &center.graph_name).await
	}

	/// Re-centers on `entity_uri` within the current graph.
	pub async fn reset(&self, entity_uri: &str) -> Result<InitOutcome> {
		let center = self.center().ok_or(ExplorerError::NotInitialized)?;
		self.initialize(entity_uri, &center.graph_name).await
	}
}
