//! Encoding of note paths into the document view URL.

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

use crate::config::VIEW_URL_PREFIX;

/// Document view URL for an already-encoded note path.
pub fn view_url(encoded_path: &str) -> String {
	format!("{VIEW_URL_PREFIX}{encoded_path}")
}

/// Encoded segment of a document view URL path, if it is one.
pub fn view_segment(pathname: &str) -> Option<&str> {
	let segment = pathname.strip_prefix(VIEW_URL_PREFIX)?;
	let segment = segment.split(['?', '#']).next().unwrap_or(segment);
	let segment = segment.trim_end_matches('/');
	(!segment.is_empty()).then_some(segment)
}

/// Best-effort decode of an encoded note path: base64-url first, then plain
/// percent-decoding.
pub fn decode_segment(segment: &str) -> Option<String> {
	decode_base64_url(segment).or_else(|| {
		urlencoding::decode(segment)
			.ok()
			.map(|s| s.into_owned())
			.filter(|s| !s.is_empty())
	})
}

fn decode_base64_url(segment: &str) -> Option<String> {
	// Padding may itself arrive percent-encoded.
	let segment = segment.replace("%3D", "=").replace("%3d", "=");
	let bytes = URL_SAFE
		.decode(&segment)
		.or_else(|_| URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')))
		.ok()?;
	String::from_utf8(bytes).ok().filter(|s| !s.is_empty())
}

/// Whether the file entry with `file_path` is the page currently shown.
pub fn matches_current(file_path: &str, decoded: Option<&str>, pathname: &str) -> bool {
	if file_path.is_empty() {
		return false;
	}
	decoded == Some(file_path) || pathname.contains(urlencoding::encode(file_path).as_ref())
}
