//! Back-stack of views shown inside one content area.

/// One entry of a [`NavigationStack`].
#[derive(Clone, Debug, PartialEq)]
pub struct Frame<T> {
	pub id: u64,
	pub data: T,
	pub title: String,
}

/// Push/pop stack of frames. The last frame is the one on screen.
#[derive(Clone, Debug)]
pub struct NavigationStack<T> {
	frames: Vec<Frame<T>>,
	next_id: u64,
}

impl<T> Default for NavigationStack<T> {
	fn default() -> Self {
		Self {
			frames: Vec::new(),
			next_id: 0,
		}
	}
}

impl<T> NavigationStack<T> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, data: T, title: impl Into<String>) -> &Frame<T> {
		let id = self.next_id;
		self.next_id += 1;
		self.frames.push(Frame {
			id,
			data,
			title: title.into(),
		});
		&self.frames[self.frames.len() - 1]
	}

	/// Drops every frame and pushes `data` as the new root.
	pub fn replace(&mut self, data: T, title: impl Into<String>) -> &Frame<T> {
		self.frames.clear();
		self.push(data, title)
	}

	/// Pops the current frame. The root frame is never popped; returns the
	/// frame now on screen, or `None` when there was nothing to go back to.
	pub fn back(&mut self) -> Option<&Frame<T>> {
		if !self.can_go_back() {
			return None;
		}
		self.frames.pop();
		self.frames.last()
	}

	pub fn current(&self) -> Option<&Frame<T>> {
		self.frames.last()
	}

	pub fn can_go_back(&self) -> bool {
		self.frames.len() > 1
	}

	pub fn len(&self) -> usize {
		self.frames.len()
	}

	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Titles from root to current, for breadcrumbs.
	pub fn titles(&self) -> impl Iterator<Item = &str> {
		self.frames.iter().map(|frame| frame.title.as_str())
	}
}
