use leptos::prelude::*;
use log::{debug, warn};

use crate::components::{category_tree, markdown};

/// Single note view: highlighted tree entry and post-processed markdown.
#[component]
pub fn Note(encoded: String) -> impl IntoView {
	Effect::new(move |_| {
		debug!("note page for {encoded}");
		if let Err(e) = category_tree::wire_category_tree(true) {
			warn!("category tree: {e}");
		}
		if let Err(e) = markdown::post_process() {
			warn!("markdown: {e}");
		}
	});
}
