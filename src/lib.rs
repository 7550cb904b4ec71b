//! Client-side enhancements for the study notes pages: category tree, view
//! tabs, markdown post-processing and the note relationship graph.

use leptos::prelude::*;
use log::{Level, info};

// Modules
pub mod components;
pub mod config;
pub mod dom;
mod pages;
pub mod path;

// Top-Level pages
use crate::pages::Page;
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;
use crate::pages::note::Note;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Picks the enhancements for the server-rendered page being shown. Links
/// stay plain browser navigations.
#[component]
pub fn App() -> impl IntoView {
	let pathname = dom::window()
		.and_then(|w| Ok(w.location().pathname()?))
		.unwrap_or_default();

	match Page::from_pathname(&pathname) {
		Page::Home => view! { <Home /> }.into_any(),
		Page::Note(encoded) => view! { <Note encoded=encoded /> }.into_any(),
		Page::Other => view! { <NotFound pathname=pathname /> }.into_any(),
	}
}
