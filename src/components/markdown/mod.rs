//! Enhancements applied to server-rendered markdown after load.

pub mod callout;
pub mod image_zoom;
pub mod task_marker;
pub mod toc;

use log::{debug, info};
use wasm_bindgen::prelude::*;

use crate::dom::{self, DomError};

/// Container of the rendered note.
pub const CONTENT_ID: &str = "markdown-content";

/// Ask the page's MathJax and highlight.js, when loaded, to process the note.
fn run_page_libraries() -> Result<(), DomError> {
	if dom::call_optional_global("MathJax", "typeset", None)? {
		debug!("math typeset");
	}
	for block in dom::query_document("pre code")? {
		let block: &JsValue = block.as_ref();
		if !dom::call_optional_global("hljs", "highlightElement", Some(block))? {
			break;
		}
	}
	Ok(())
}

/// Run every post-processing pass over the rendered note.
pub fn post_process() -> Result<(), DomError> {
	run_page_libraries()?;
	toc::wire_toc()?;

	let Some(content) = dom::by_id(CONTENT_ID)? else {
		debug!("no #{CONTENT_ID} on this page");
		return Ok(());
	};
	let tasks = task_marker::rewrite_task_items(&content)?;
	let callouts = callout::rewrite_callouts(&content)?;
	let images = image_zoom::wire_image_zoom(&content)?;
	info!("markdown post-processed: {tasks} tasks, {callouts} callouts, {images} images");
	Ok(())
}
