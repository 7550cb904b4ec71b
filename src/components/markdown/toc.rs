//! Mobile table-of-contents popup.

use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget, HtmlElement, KeyboardEvent};

use crate::dom::{self, DomError};

const FOCUS_DELAY_MS: i32 = 100;

fn focus_later(target: HtmlElement) -> Result<(), DomError> {
	dom::set_timeout(FOCUS_DELAY_MS, move || {
		let _ = target.focus();
	})
}

fn open(popup: &HtmlElement, close_btn: &HtmlElement) -> Result<(), DomError> {
	popup.class_list().add_1("show")?;
	if let Some(body) = dom::document()?.body() {
		body.class_list().add_1("toc-open")?;
	}
	focus_later(close_btn.clone())
}

fn close(popup: &HtmlElement, toggle: &HtmlElement) -> Result<(), DomError> {
	popup.class_list().remove_1("show")?;
	if let Some(body) = dom::document()?.body() {
		body.class_list().remove_1("toc-open")?;
	}
	focus_later(toggle.clone())
}

fn log_failure(result: Result<(), DomError>) {
	if let Err(e) = result {
		warn!("toc popup: {e}");
	}
}

/// Wire the popup; pages without all three TOC elements are skipped.
pub fn wire_toc() -> Result<(), DomError> {
	let (Some(toggle), Some(close_btn), Some(popup)) = (
		dom::by_id("toc-toggle-btn")?,
		dom::by_id("toc-close-btn")?,
		dom::by_id("mobile-toc")?,
	) else {
		debug!("no mobile toc on this page");
		return Ok(());
	};

	// Staggered entry animation index.
	for (index, item) in dom::query_document(".mobile-toc-body ul.category-tree > li")?
		.into_iter()
		.enumerate()
	{
		if let Ok(item) = item.dyn_into::<HtmlElement>() {
			item.style()
				.set_property("--item-index", &index.to_string())?;
		}
	}

	{
		let (popup, close_btn) = (popup.clone(), close_btn.clone());
		dom::listen(&toggle, "click", move |_: Event| {
			log_failure(open(&popup, &close_btn));
		})?;
	}

	{
		let (popup, toggle) = (popup.clone(), toggle.clone());
		dom::listen(&close_btn, "click", move |_: Event| {
			log_failure(close(&popup, &toggle));
		})?;
	}

	{
		let (backdrop, toggle) = (popup.clone(), toggle.clone());
		dom::listen(&popup, "click", move |ev: Event| {
			let backdrop_target: &EventTarget = backdrop.as_ref();
			if ev.target().as_ref() == Some(backdrop_target) {
				log_failure(close(&backdrop, &toggle));
			}
		})?;
	}

	let document = dom::document()?;
	dom::listen(&document, "keydown", move |ev: KeyboardEvent| {
		if ev.key() == "Escape" && popup.class_list().contains("show") {
			log_failure(close(&popup, &toggle));
		}
	})?;
	Ok(())
}
