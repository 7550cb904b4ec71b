//! Collapsible category tree and current-page highlighting.

use log::{debug, warn};
use web_sys::{Element, Event};

use crate::dom::{self, DomError};
use crate::path;

const COLLAPSED: &str = "collapsed";

/// Items with children start collapsed below the top level.
pub fn starts_collapsed(level: u32, has_children: bool) -> bool {
	has_children && level > 0
}

fn level_of(item: &Element) -> u32 {
	item.get_attribute("data-level")
		.and_then(|l| l.trim().parse().ok())
		.unwrap_or(0)
}

fn has_children(item: &Element) -> Result<bool, DomError> {
	Ok(item.query_selector(".category-children")?.is_some())
}

/// Flip the folder icon to match the collapse state, when there is one.
fn sync_folder_icon(item: &Element, collapsed: bool) -> Result<(), DomError> {
	let Some(icon) = item.query_selector(".category-directory .folder-icon")? else {
		return Ok(());
	};
	let classes = icon.class_list();
	classes.toggle_with_force("fa-folder", collapsed)?;
	classes.toggle_with_force("fa-folder-open", !collapsed)?;
	Ok(())
}

fn set_collapsed(item: &Element, collapsed: bool) -> Result<(), DomError> {
	item.class_list().toggle_with_force(COLLAPSED, collapsed)?;
	sync_folder_icon(item, collapsed)
}

/// Toggle an item's collapse state; items without children are left alone.
/// Returns the new collapsed state, or `None` when nothing changed.
pub fn toggle_item(item: &Element) -> Result<Option<bool>, DomError> {
	if !has_children(item)? {
		return Ok(None);
	}
	let collapsed = !item.class_list().contains(COLLAPSED);
	set_collapsed(item, collapsed)?;
	Ok(Some(collapsed))
}

/// Collapse every nested directory, leaving top-level ones open.
pub fn init_collapse(root: &Element) -> Result<(), DomError> {
	for item in dom::query_all(root, ".category-item")? {
		let children = has_children(&item)?;
		if children {
			set_collapsed(&item, starts_collapsed(level_of(&item), children))?;
		}
	}
	Ok(())
}

/// Wire directory headers under `root` to toggle their item.
pub fn wire_toggles(root: &Element) -> Result<(), DomError> {
	let directories = dom::query_all(root, ".category-directory")?;
	debug!("category directories: {}", directories.len());
	for dir in directories {
		let header = dir.clone();
		dom::listen(&dir, "click", move |ev: Event| {
			ev.prevent_default();
			ev.stop_propagation();
			let Ok(Some(item)) = header.closest(".category-item") else {
				return;
			};
			match toggle_item(&item) {
				Ok(state) => debug!("directory toggled: collapsed={state:?}"),
				Err(e) => warn!("directory toggle failed: {e}"),
			}
		})?;
	}
	Ok(())
}

/// Mark the file entry of the page at `pathname` active and open its
/// ancestors. Returns how many entries matched.
pub fn highlight_current(root: &Element, pathname: &str) -> Result<usize, DomError> {
	let Some(segment) = path::view_segment(pathname) else {
		return Ok(0);
	};
	let decoded = path::decode_segment(segment);
	let mut matched = 0;

	for file in dom::query_all(root, ".category-file")? {
		let Some(file_path) = file.get_attribute("data-path") else {
			continue;
		};
		if !path::matches_current(&file_path, decoded.as_deref(), pathname) {
			continue;
		}
		file.class_list().add_1("active")?;
		matched += 1;

		let mut parent = file.closest(".category-item")?;
		while let Some(item) = parent {
			if item.class_list().contains(COLLAPSED) {
				set_collapsed(&item, false)?;
			}
			parent = match item.parent_element() {
				Some(up) => up.closest(".category-item")?,
				None => None,
			};
		}
	}
	if matched == 0 {
		debug!("no category entry matches {pathname}");
	}
	Ok(matched)
}

/// Set up every category tree on the page; on document pages also highlight
/// the current entry.
pub fn wire_category_tree(highlight: bool) -> Result<(), DomError> {
	let document = dom::document()?;
	let Some(root) = document.body() else {
		return Err(DomError::Missing("body".into()));
	};
	init_collapse(&root)?;
	wire_toggles(&root)?;
	if highlight {
		let pathname = dom::window()?.location().pathname()?;
		highlight_current(&root, &pathname)?;
	}
	Ok(())
}
