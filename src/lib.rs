//! rdf-explorer: interactive exploration of entity-centric RDF subgraphs.
//!
//! This crate provides a WASM-based viewer that opens one entity of a named
//! graph, shows its neighbourhood as a force-directed node-link diagram, and
//! grows the diagram as nodes are clicked. The exploration logic lives in
//! [`explorer`] and has no browser dependency; [`components`] renders it.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use log::{Level, debug, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlInputElement, HtmlScriptElement, Window};

pub mod components;
pub mod config;
pub mod explorer;
pub mod navigation;

pub use components::force_graph::{ForceGraphCanvas, SurfaceCommand, SurfaceFeed};
pub use components::literal_panel::LiteralPanel;
pub use config::ExplorerConfig;
pub use explorer::{
	ExplorerError, ExplorerEvent, GraphDataProvider, GraphExplorer, HttpGraphProvider, InitOutcome,
	Selection,
};
pub use navigation::NavigationStack;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("rdf-explorer: logging initialized");
}

/// Load configuration from a script element with id="explorer-config".
/// Falls back to defaults when the element is missing.
fn load_config() -> ExplorerConfig {
	let script = || -> Option<String> {
		let window: Window = web_sys::window()?;
		let element = window.document()?.get_element_by_id("explorer-config")?;
		let script: HtmlScriptElement = element.dyn_into().ok()?;
		script.text().ok()
	};
	match script() {
		Some(json) => ExplorerConfig::from_json(&json),
		None => {
			info!("rdf-explorer: no explorer-config element, using defaults");
			ExplorerConfig::default()
		}
	}
}

/// Navigation frame payload: which entity a graph view is centered on.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityView {
	pub entity_uri: String,
	pub graph_name: String,
}

type HttpExplorer = GraphExplorer<HttpGraphProvider>;

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Entity Graph Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<GraphExplorerView config=config />
	}
}

/// Graph viewer: header controls, canvas, literal panel.
#[component]
pub fn GraphExplorerView(config: ExplorerConfig) -> impl IntoView {
	let explorer: Rc<HttpExplorer> = Rc::new(GraphExplorer::new(
		HttpGraphProvider::new(&config),
		config.dedup,
	));
	let feed = SurfaceFeed::default();
	let history: Rc<RefCell<NavigationStack<EntityView>>> = Rc::new(RefCell::new(NavigationStack::new()));

	let title = RwSignal::new(String::from("Entity Graph"));
	let selection = RwSignal::new(None::<Selection>);
	let error = RwSignal::new(None::<String>);
	let loading = RwSignal::new(false);
	let can_go_back = RwSignal::new(false);
	let breadcrumbs = RwSignal::new(Vec::<String>::new());

	let sync_history = move |history: &NavigationStack<EntityView>| {
		can_go_back.set(history.can_go_back());
		breadcrumbs.set(history.titles().map(str::to_string).collect());
	};

	explorer.subscribe({
		let feed = feed.clone();
		move |event| {
			feed.push_event(event);
			match event {
				ExplorerEvent::Reset { snapshot, .. } => {
					if let Some(center) = snapshot.nodes.iter().find(|n| n.is_central) {
						title.set(center.label.clone());
					}
					selection.set(None);
					error.set(None);
				}
				ExplorerEvent::Selected(current) => selection.set(Some(current.clone())),
				ExplorerEvent::Failed { message } => error.set(Some(message.clone())),
				ExplorerEvent::Expanded { .. } => {}
			}
		}
	});

	// Seeds the explorer on `view` and fits the result on screen.
	let open: Rc<dyn Fn(EntityView)> = {
		let (explorer, feed) = (explorer.clone(), feed.clone());
		Rc::new(move |view: EntityView| {
			let (explorer, feed) = (explorer.clone(), feed.clone());
			loading.set(true);
			spawn_local(async move {
				match explorer.initialize(&view.entity_uri, &view.graph_name).await {
					Ok(InitOutcome::Seeded(_)) => feed.push(SurfaceCommand::Fit),
					Ok(InitOutcome::Discarded) => {}
					Err(e) => error.set(Some(e.to_string())),
				}
				loading.set(false);
			});
		})
	};

	// Replaces the history with a single frame and opens it.
	let navigate_root: Rc<dyn Fn(String)> = {
		let (history, open, graph_name) = (history.clone(), open.clone(), config.graph_name.clone());
		Rc::new(move |entity_uri: String| {
			let view = EntityView {
				entity_uri: entity_uri.clone(),
				graph_name: graph_name.clone(),
			};
			let mut stack = history.borrow_mut();
			stack.replace(view.clone(), crate::explorer::uri_fragment(&entity_uri));
			sync_history(&stack);
			drop(stack);
			open(view);
		})
	};

	if let Some(entity_uri) = config.entity_uri.clone() {
		navigate_root(entity_uri);
	}

	let on_node_click: Rc<dyn Fn(String)> = {
		let explorer = explorer.clone();
		Rc::new(move |node_id: String| {
			let explorer = explorer.clone();
			spawn_local(async move {
				if let Err(e) = explorer.select_node(&node_id).await {
					warn!("rdf-explorer: selecting {} failed: {}", node_id, e);
					error.set(Some(e.to_string()));
				}
			});
		})
	};
	let on_node_hover: Rc<dyn Fn(Option<String>)> = Rc::new(|node_id: Option<String>| {
		debug!("rdf-explorer: hover {:?}", node_id);
	});

	let zoom = {
		let feed = feed.clone();
		move |command: SurfaceCommand| feed.push(command)
	};
	let (zoom_in, zoom_out, zoom_fit) = (zoom.clone(), zoom.clone(), zoom);

	let collapse = {
		let (explorer, feed) = (explorer.clone(), feed.clone());
		move |_: leptos::ev::MouseEvent| {
			let (explorer, feed) = (explorer.clone(), feed.clone());
			loading.set(true);
			spawn_local(async move {
				match explorer.collapse_all().await {
					Ok(InitOutcome::Seeded(_)) => feed.push(SurfaceCommand::Fit),
					Ok(InitOutcome::Discarded) => {}
					Err(e) => error.set(Some(e.to_string())),
				}
				loading.set(false);
			});
		}
	};

	let focus = {
		let (history, open, explorer) = (history.clone(), open.clone(), explorer.clone());
		move |_: leptos::ev::MouseEvent| {
			let (Some(current), Some(center)) = (selection.get_untracked(), explorer.center()) else {
				return;
			};
			if current.node_id == center.entity_uri {
				return;
			}
			let view = EntityView {
				entity_uri: current.node_id.clone(),
				graph_name: center.graph_name,
			};
			let mut stack = history.borrow_mut();
			stack.push(view.clone(), current.label.clone());
			sync_history(&stack);
			drop(stack);
			open(view);
		}
	};

	let back = move |_: leptos::ev::MouseEvent| {
		let previous = {
			let mut history = history.borrow_mut();
			if history.back().is_none() {
				return;
			}
			sync_history(&history);
			history.current().map(|frame| frame.data.clone())
		};
		if let Some(view) = previous {
			open(view);
		}
	};

	let on_open = move |ev: leptos::ev::Event| {
		let Some(input) = ev.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) else {
			return;
		};
		let uri = input.value().trim().to_string();
		if !uri.is_empty() {
			navigate_root(uri);
		}
	};

	view! {
		<div class="graph-container">
			<header class="graph-header">
				<h3>{move || title.get()}</h3>
				<input
					class="entity-input"
					type="text"
					placeholder="Entity URI"
					value=config.entity_uri.clone().unwrap_or_default()
					on:change=on_open
				/>
				<div class="graph-controls">
					<button title="Back" disabled=move || !can_go_back.get() on:click=back>"Back"</button>
					<button title="Zoom In" on:click=move |_| zoom_in(SurfaceCommand::Zoom(1.2))>"+"</button>
					<button title="Zoom Out" on:click=move |_| zoom_out(SurfaceCommand::Zoom(0.8))>"-"</button>
					<button title="Reset Zoom" on:click=move |_| zoom_fit(SurfaceCommand::Fit)>"Fit"</button>
					<button title="Collapse All" on:click=collapse>"Collapse"</button>
					<button title="Focus Selected" on:click=focus>"Focus"</button>
				</div>
			</header>
			<nav class="graph-breadcrumbs">{move || breadcrumbs.get().join(" / ")}</nav>
			{move || error.get().map(|message| view! { <div class="graph-error">{message}</div> })}
			<div class="graph-content">
				<div class="graph-main">
					<ForceGraphCanvas feed=feed on_node_click=on_node_click on_node_hover=on_node_hover />
					<Show when=move || loading.get()>
						<div class="loading-spinner">"Loading…"</div>
					</Show>
				</div>
				<LiteralPanel selection=selection />
			</div>
		</div>
	}
}
