use leptos::prelude::*;
use log::warn;

use crate::components::{category_tree, tabs};

/// Study index: category tree plus the category/graph tabs.
#[component]
pub fn Home() -> impl IntoView {
	Effect::new(move |_| {
		if let Err(e) = category_tree::wire_category_tree(false) {
			warn!("category tree: {e}");
		}
		if let Err(e) = tabs::wire_tabs() {
			warn!("tabs: {e}");
		}
	});
}
