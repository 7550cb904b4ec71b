//! Category / graph tab switcher with the last choice kept in local storage.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, info, warn};
use web_sys::{Event, Storage};

use crate::components::force_graph::mount_graph_view;
use crate::config::TAB_STORAGE_KEY;
use crate::dom::{self, DomError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TabView {
	#[default]
	Category,
	Graph,
}

impl TabView {
	const ALL: [TabView; 2] = [TabView::Category, TabView::Graph];

	pub fn name(self) -> &'static str {
		match self {
			TabView::Category => "category",
			TabView::Graph => "graph",
		}
	}

	/// Unknown names fall back to the category view.
	pub fn from_name(name: &str) -> Self {
		match name.trim() {
			"graph" => TabView::Graph,
			_ => TabView::Category,
		}
	}

	/// Id of the content container for this view.
	pub fn content_id(self) -> String {
		format!("{}-view", self.name())
	}
}

/// Where the selected tab survives a reload.
pub trait TabStore {
	fn load(&self) -> Option<String>;
	fn save(&mut self, value: &str);
}

/// Browser local storage under [`TAB_STORAGE_KEY`].
pub struct LocalTabStore;

impl LocalTabStore {
	fn storage() -> Option<Storage> {
		web_sys::window().and_then(|w| w.local_storage().ok().flatten())
	}
}

impl TabStore for LocalTabStore {
	fn load(&self) -> Option<String> {
		Self::storage()?.get_item(TAB_STORAGE_KEY).ok().flatten()
	}

	fn save(&mut self, value: &str) {
		let saved = Self::storage().map(|s| s.set_item(TAB_STORAGE_KEY, value));
		match saved {
			Some(Ok(())) => {}
			Some(Err(e)) => warn!("could not persist tab selection: {e:?}"),
			None => warn!("local storage unavailable; tab selection not persisted"),
		}
	}
}

/// In-memory store; clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryTabStore {
	value: Rc<RefCell<Option<String>>>,
}

impl TabStore for MemoryTabStore {
	fn load(&self) -> Option<String> {
		self.value.borrow().clone()
	}

	fn save(&mut self, value: &str) {
		*self.value.borrow_mut() = Some(value.to_string());
	}
}

pub struct TabController<S: TabStore> {
	store: S,
	active: Option<TabView>,
	graph_initialized: bool,
	apply: Box<dyn FnMut(TabView)>,
	init_graph: Box<dyn FnMut()>,
}

impl<S: TabStore> TabController<S> {
	/// `apply` shows a view; `init_graph` runs the first time the graph
	/// view is shown.
	pub fn new(store: S, apply: impl FnMut(TabView) + 'static, init_graph: impl FnMut() + 'static) -> Self {
		Self {
			store,
			active: None,
			graph_initialized: false,
			apply: Box::new(apply),
			init_graph: Box::new(init_graph),
		}
	}

	pub fn active(&self) -> Option<TabView> {
		self.active
	}

	pub fn select(&mut self, view: TabView) {
		debug!("tab selected: {}", view.name());
		self.active = Some(view);
		self.store.save(view.name());
		(self.apply)(view);
		if view == TabView::Graph && !self.graph_initialized {
			self.graph_initialized = true;
			(self.init_graph)();
		}
	}

	/// Re-apply the stored selection, or the category view when none.
	pub fn restore(&mut self) -> TabView {
		let view = self
			.store
			.load()
			.map(|name| TabView::from_name(&name))
			.unwrap_or_default();
		info!("restoring tab: {}", view.name());
		self.select(view);
		view
	}
}

/// Mark the link and `#{name}-view` container of `view` active, and every
/// other one inactive.
pub fn apply_active_classes(view: TabView) -> Result<(), DomError> {
	for link in dom::query_document(".tab-link[data-tab]")? {
		let selected = link
			.get_attribute("data-tab")
			.is_some_and(|name| TabView::from_name(&name) == view);
		link.class_list().toggle_with_force("active", selected)?;
	}
	for candidate in TabView::ALL {
		match dom::by_id(&candidate.content_id())? {
			Some(content) => {
				content
					.class_list()
					.toggle_with_force("active", candidate == view)?;
			}
			None => debug!("no #{} on this page", candidate.content_id()),
		}
	}
	Ok(())
}

/// Wire every tab link on the page and restore the last selection.
pub fn wire_tabs() -> Result<(), DomError> {
	let links = dom::query_document(".tab-link[data-tab]")?;
	if links.is_empty() {
		debug!("no tab links on this page");
		return Ok(());
	}

	let controller = Rc::new(RefCell::new(TabController::new(
		LocalTabStore,
		|view| {
			if let Err(e) = apply_active_classes(view) {
				warn!("tab switch failed: {e}");
			}
		},
		|| {
			if let Err(e) = mount_graph_view() {
				warn!("graph view init failed: {e}");
			}
		},
	)));

	for link in links {
		let Some(name) = link.get_attribute("data-tab") else {
			continue;
		};
		let view = TabView::from_name(&name);
		let controller = controller.clone();
		dom::listen(&link, "click", move |ev: Event| {
			ev.prevent_default();
			controller.borrow_mut().select(view);
		})?;
	}

	controller.borrow_mut().restore();
	Ok(())
}
