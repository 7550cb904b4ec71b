//! In-place zoom for images in rendered notes.

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event};

use crate::dom::{self, DomError};

const ZOOMED: &str = "img-fullscreen";
const OVERLAY_CLASS: &str = "img-overlay";
const OVERLAY_STYLE: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
	background-color: rgba(0,0,0,0.7); z-index: 9998;";

fn open_overlay() -> Result<(), DomError> {
	let document = dom::document()?;
	let overlay = document.create_element("div")?;
	overlay.set_class_name(OVERLAY_CLASS);
	overlay.set_attribute("style", OVERLAY_STYLE)?;
	document
		.body()
		.ok_or_else(|| DomError::Missing("body".into()))?
		.append_child(&overlay)?;
	Ok(())
}

fn close_overlay() -> Result<(), DomError> {
	for overlay in dom::query_document(&format!(".{OVERLAY_CLASS}"))? {
		overlay.remove();
	}
	Ok(())
}

/// Overlay click: shrink whatever is zoomed and drop the overlay.
fn dismiss() -> Result<(), DomError> {
	for img in dom::query_document(&format!(".{ZOOMED}"))? {
		img.class_list().remove_1(ZOOMED)?;
	}
	close_overlay()
}

fn toggle_zoom(img: &Element) -> Result<(), DomError> {
	if img.class_list().toggle(ZOOMED)? {
		open_overlay()
	} else {
		close_overlay()
	}
}

/// Clicking an image under `root` toggles its zoom; returns how many images
/// were wired.
pub fn wire_image_zoom(root: &Element) -> Result<usize, DomError> {
	let images = dom::query_all(root, "img")?;
	let count = images.len();
	if count == 0 {
		return Ok(0);
	}
	for img in images {
		let target = img.clone();
		dom::listen(&img, "click", move |_: Event| {
			if let Err(e) = toggle_zoom(&target) {
				warn!("image zoom: {e}");
			}
		})?;
	}

	// Overlays come and go; one delegated listener serves all of them.
	let document = dom::document()?;
	dom::listen(&document, "click", |ev: Event| {
		let on_overlay = ev
			.target()
			.and_then(|t| t.dyn_into::<Element>().ok())
			.is_some_and(|el| el.class_list().contains(OVERLAY_CLASS));
		if on_overlay {
			if let Err(e) = dismiss() {
				warn!("image zoom: {e}");
			}
		}
	})?;
	Ok(count)
}
