//! Blockquote callouts introduced by `[!KIND] optional title`.

use std::sync::OnceLock;

use regex::Regex;
use web_sys::Element;

use crate::dom::{self, DomError};

const KINDS: &str = "NOTE|INFO|TIP|TLDR|WARNING|DANGER|IMPORTANT|CAUTION|QUESTION|CITE|TODO|FAIL|SUCCESS";

fn header_re() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(&format!(r"(?i)^\[!({KINDS})\][ \t]*([^\n]*)")).unwrap())
}

/// Marker plus the remainder of its line, for stripping from markup.
fn header_line_re() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(&format!(r"(?i)^\s*\[!({KINDS})\][^\n]*\n?")).unwrap())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalloutKind {
	Note,
	Info,
	Tip,
	Tldr,
	Warning,
	Danger,
	Important,
	Caution,
	Question,
	Cite,
	Todo,
	Fail,
	Success,
}

impl CalloutKind {
	pub fn from_name(name: &str) -> Option<Self> {
		Some(match name.to_ascii_lowercase().as_str() {
			"note" => CalloutKind::Note,
			"info" => CalloutKind::Info,
			"tip" => CalloutKind::Tip,
			"tldr" => CalloutKind::Tldr,
			"warning" => CalloutKind::Warning,
			"danger" => CalloutKind::Danger,
			"important" => CalloutKind::Important,
			"caution" => CalloutKind::Caution,
			"question" => CalloutKind::Question,
			"cite" => CalloutKind::Cite,
			"todo" => CalloutKind::Todo,
			"fail" => CalloutKind::Fail,
			"success" => CalloutKind::Success,
			_ => return None,
		})
	}

	pub fn name(self) -> &'static str {
		match self {
			CalloutKind::Note => "note",
			CalloutKind::Info => "info",
			CalloutKind::Tip => "tip",
			CalloutKind::Tldr => "tldr",
			CalloutKind::Warning => "warning",
			CalloutKind::Danger => "danger",
			CalloutKind::Important => "important",
			CalloutKind::Caution => "caution",
			CalloutKind::Question => "question",
			CalloutKind::Cite => "cite",
			CalloutKind::Todo => "todo",
			CalloutKind::Fail => "fail",
			CalloutKind::Success => "success",
		}
	}

	pub fn icon_class(self) -> &'static str {
		match self {
			CalloutKind::Note => "fas fa-note-sticky",
			CalloutKind::Info | CalloutKind::Tldr => "fas fa-circle-info",
			CalloutKind::Tip => "fas fa-lightbulb",
			CalloutKind::Warning => "fas fa-triangle-exclamation",
			CalloutKind::Danger | CalloutKind::Important | CalloutKind::Caution => "fas fa-bolt",
			CalloutKind::Todo | CalloutKind::Success => "fas fa-square-check",
			CalloutKind::Cite => "fas fa-quote-left",
			CalloutKind::Question => "fas fa-circle-question",
			CalloutKind::Fail => "fas fa-circle-xmark",
		}
	}

	pub fn default_title(self) -> &'static str {
		match self {
			CalloutKind::Note => "Note",
			CalloutKind::Info | CalloutKind::Tldr => "Info",
			CalloutKind::Tip => "Tip",
			CalloutKind::Warning => "Warning",
			CalloutKind::Danger | CalloutKind::Important | CalloutKind::Caution => "Danger",
			CalloutKind::Todo | CalloutKind::Success => "Check",
			CalloutKind::Cite => "Cite",
			CalloutKind::Question => "Question",
			CalloutKind::Fail => "Fail",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalloutHeader {
	pub kind: CalloutKind,
	pub title: String,
}

impl CalloutHeader {
	/// Explicit title, or the kind's default.
	pub fn display_title(&self) -> &str {
		if self.title.is_empty() {
			self.kind.default_title()
		} else {
			&self.title
		}
	}
}

/// Header of a callout from the text of its first paragraph.
pub fn parse_callout(text: &str) -> Option<CalloutHeader> {
	let caps = header_re().captures(text.trim())?;
	let kind = CalloutKind::from_name(caps.get(1)?.as_str())?;
	let title = caps.get(2).map_or("", |m| m.as_str()).trim().to_string();
	Some(CalloutHeader { kind, title })
}

/// First-paragraph markup without the marker line.
pub fn strip_header(html: &str) -> String {
	header_line_re().replace(html, "").trim().to_string()
}

fn rewrite_one(blockquote: &Element, first: &Element, header: &CalloutHeader) -> Result<(), DomError> {
	let document = dom::document()?;

	let title = document.create_element("div")?;
	title.set_class_name("callout-title");
	title.set_inner_html(&format!(
		r#"<i class="{} callout-title-icon"></i>"#,
		header.kind.icon_class()
	));
	title.append_with_str_1(header.display_title())?;

	let content = document.create_element("div")?;
	content.set_class_name("callout-content");

	first.set_inner_html(&strip_header(&first.inner_html()));
	if first.text_content().unwrap_or_default().trim().is_empty() {
		first.remove();
	}
	while let Some(child) = blockquote.first_child() {
		content.append_child(&child)?;
	}

	let classes = blockquote.class_list();
	classes.add_1("callout")?;
	classes.add_1(&format!("callout-{}", header.kind.name()))?;
	blockquote.append_child(&title)?;
	blockquote.append_child(&content)?;
	Ok(())
}

/// Rewrite every marked blockquote under `root`; returns how many were
/// rewritten.
pub fn rewrite_callouts(root: &Element) -> Result<usize, DomError> {
	let mut rewritten = 0;
	for blockquote in dom::query_all(root, "blockquote")? {
		let Some(first) = blockquote.query_selector(":scope > p:first-child")? else {
			continue;
		};
		let Some(header) = parse_callout(&first.text_content().unwrap_or_default()) else {
			continue;
		};
		rewrite_one(&blockquote, &first, &header)?;
		rewritten += 1;
	}
	Ok(rewritten)
}
