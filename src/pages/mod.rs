pub mod home;
pub mod not_found;
pub mod note;

use crate::path;

/// Kind of server-rendered page this client is running on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
	/// Study index with the category and graph tabs.
	Home,
	/// A single note; carries the encoded path segment.
	Note(String),
	Other,
}

impl Page {
	pub fn from_pathname(pathname: &str) -> Self {
		if let Some(segment) = path::view_segment(pathname) {
			return Page::Note(segment.to_string());
		}
		match pathname.trim_end_matches('/') {
			"" | "/study" => Page::Home,
			_ => Page::Other,
		}
	}
}
