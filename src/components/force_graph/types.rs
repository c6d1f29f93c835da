//! Commands fed to the canvas.
//!
//! The canvas never reads explorer state directly. Explorer events are turned
//! into [`SurfaceCommand`]s and queued on a [`SurfaceFeed`], which the
//! animation loop drains once per frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::explorer::{ExplorerEvent, GraphDelta, GraphSnapshot};

/// A change to apply to the rendered graph.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCommand {
	/// Discard everything and lay out this element list.
	Replace(GraphSnapshot),
	/// Add elements next to `parent`, which is now expanded.
	Add { parent: String, delta: GraphDelta },
	/// Highlight a node as selected.
	Select(String),
	/// Multiply the zoom factor around the canvas center.
	Zoom(f64),
	/// Fit every node in view.
	Fit,
}

impl SurfaceCommand {
	/// The command an explorer event maps to, if it affects the drawing.
	pub fn from_event(event: &ExplorerEvent) -> Option<Self> {
		match event {
			ExplorerEvent::Reset { snapshot, .. } => Some(Self::Replace(snapshot.clone())),
			ExplorerEvent::Expanded { node_id, delta } => Some(Self::Add {
				parent: node_id.clone(),
				delta: delta.clone(),
			}),
			ExplorerEvent::Selected(selection) => Some(Self::Select(selection.node_id.clone())),
			ExplorerEvent::Failed { .. } => None,
		}
	}
}

/// Shared command queue between the app and the canvas.
#[derive(Clone, Debug, Default)]
pub struct SurfaceFeed(Rc<RefCell<VecDeque<SurfaceCommand>>>);

impl SurfaceFeed {
	pub fn push(&self, command: SurfaceCommand) {
		self.0.borrow_mut().push_back(command);
	}

	/// Queues whatever `event` maps to.
	pub fn push_event(&self, event: &ExplorerEvent) {
		if let Some(command) = SurfaceCommand::from_event(event) {
			self.push(command);
		}
	}

	/// Takes every queued command, oldest first.
	pub fn drain(&self) -> Vec<SurfaceCommand> {
		self.0.borrow_mut().drain(..).collect()
	}
}
