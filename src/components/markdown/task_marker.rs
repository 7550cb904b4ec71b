//! `[x]`-style task markers at the start of list items.

use std::sync::OnceLock;

use regex::Regex;
use web_sys::Element;

use crate::dom::{self, DomError};

fn marker_re() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| Regex::new(r#"\[([ x><!/?*nilfkISpbcq"0-9-])\]"#).unwrap())
}

/// Marker as it appears in serialized markup: `<` and `>` arrive escaped, and
/// it may sit inside leading opening tags such as a loose list's `<p>`.
fn markup_marker_re() -> &'static Regex {
	static RE: OnceLock<Regex> = OnceLock::new();
	RE.get_or_init(|| {
		Regex::new(r#"^((?:\s*<[A-Za-z][^>]*>)*\s*)\[(?:[ x!/?*nilfkISpbcq"0-9-]|&lt;|&gt;)\]\s*"#)
			.unwrap()
	})
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskMarker {
	Checked,
	Unchecked,
	Rescheduled,
	Scheduled,
	Important,
	Cancelled,
	InProgress,
	Question,
	Star,
	Note,
	Location,
	Fire,
	Key,
	Information,
	Idea,
	Amount,
	Pro,
	Con,
	Bookmark,
	Quote,
	Speech,
}

impl TaskMarker {
	pub fn from_char(c: char) -> Self {
		match c {
			'x' => TaskMarker::Checked,
			'>' => TaskMarker::Rescheduled,
			'<' => TaskMarker::Scheduled,
			'!' => TaskMarker::Important,
			'-' => TaskMarker::Cancelled,
			'/' => TaskMarker::InProgress,
			'?' => TaskMarker::Question,
			'*' => TaskMarker::Star,
			'n' => TaskMarker::Note,
			'l' => TaskMarker::Location,
			'f' => TaskMarker::Fire,
			'k' => TaskMarker::Key,
			'i' => TaskMarker::Information,
			'I' => TaskMarker::Idea,
			'S' => TaskMarker::Amount,
			'p' => TaskMarker::Pro,
			'c' => TaskMarker::Con,
			'b' => TaskMarker::Bookmark,
			'"' => TaskMarker::Quote,
			d if d.is_ascii_digit() => TaskMarker::Speech,
			_ => TaskMarker::Unchecked,
		}
	}

	pub fn slug(self) -> &'static str {
		match self {
			TaskMarker::Checked => "checked",
			TaskMarker::Unchecked => "unchecked",
			TaskMarker::Rescheduled => "rescheduled",
			TaskMarker::Scheduled => "scheduled",
			TaskMarker::Important => "important",
			TaskMarker::Cancelled => "cancelled",
			TaskMarker::InProgress => "in-progress",
			TaskMarker::Question => "question",
			TaskMarker::Star => "star",
			TaskMarker::Note => "note",
			TaskMarker::Location => "location",
			TaskMarker::Fire => "fire",
			TaskMarker::Key => "key",
			TaskMarker::Information => "information",
			TaskMarker::Idea => "idea",
			TaskMarker::Amount => "amount",
			TaskMarker::Pro => "pro",
			TaskMarker::Con => "con",
			TaskMarker::Bookmark => "bookmark",
			TaskMarker::Quote => "quote",
			TaskMarker::Speech => "speech",
		}
	}

	pub fn class_name(self) -> String {
		format!("task-marker task-marker-{}", self.slug())
	}

	pub fn icon_html(self) -> &'static str {
		match self {
			TaskMarker::Checked => r#"<i class="fas fa-check"></i>"#,
			TaskMarker::Unchecked => "",
			TaskMarker::Rescheduled => r#"<i class="fas fa-arrow-right"></i>"#,
			TaskMarker::Scheduled => r#"<i class="fas fa-arrow-left"></i>"#,
			TaskMarker::Important => r#"<i class="fas fa-exclamation"></i>"#,
			TaskMarker::Cancelled => r#"<i class="fas fa-minus"></i>"#,
			TaskMarker::InProgress => r#"<i class="fas fa-slash"></i>"#,
			TaskMarker::Question => r#"<i class="fas fa-question"></i>"#,
			TaskMarker::Star => r#"<i class="fas fa-star"></i>"#,
			TaskMarker::Note => r#"<i class="fas fa-sticky-note"></i>"#,
			TaskMarker::Location => r#"<i class="fas fa-map-marker-alt"></i>"#,
			TaskMarker::Fire => r#"<i class="fa-solid fa-fire"></i>"#,
			TaskMarker::Key => r#"<i class="fa-solid fa-key"></i>"#,
			TaskMarker::Information => r#"<i class="fas fa-info"></i>"#,
			TaskMarker::Idea => r#"<i class="fas fa-lightbulb"></i>"#,
			TaskMarker::Amount => r#"<i class="fas fa-dollar-sign"></i>"#,
			TaskMarker::Pro => r#"<i class="fas fa-thumbs-up"></i>"#,
			TaskMarker::Con => r#"<i class="fas fa-thumbs-down"></i>"#,
			TaskMarker::Bookmark => r#"<i class="fas fa-bookmark"></i>"#,
			TaskMarker::Quote => r#"<i class="fas fa-quote-right"></i>"#,
			TaskMarker::Speech => r#"<i class="fas fa-comment"></i>"#,
		}
	}
}

/// Marker at the very start of a list item's text.
pub fn parse_marker(text: &str) -> Option<TaskMarker> {
	let caps = marker_re().captures(text.trim_start())?;
	let whole = caps.get(0)?;
	if whole.start() != 0 {
		return None;
	}
	caps.get(1)?.as_str().chars().next().map(TaskMarker::from_char)
}

/// Item markup with its leading marker removed; markup without one is
/// returned trimmed.
pub fn strip_marker(html: &str) -> String {
	markup_marker_re().replace(html, "${1}").trim().to_string()
}

/// Rewrite every marked `li` under `root`; returns how many were rewritten.
pub fn rewrite_task_items(root: &Element) -> Result<usize, DomError> {
	let document = dom::document()?;
	let mut rewritten = 0;
	for item in dom::query_all(root, "li")? {
		let text = item.text_content().unwrap_or_default();
		let Some(marker) = parse_marker(&text) else {
			continue;
		};

		let marker_span = document.create_element("span")?;
		marker_span.set_class_name(&marker.class_name());
		marker_span.set_inner_html(marker.icon_html());

		let content = document.create_element("span")?;
		content.set_class_name("task-content");
		content.set_inner_html(&strip_marker(&item.inner_html()));

		item.class_list().add_1("task-list-item")?;
		item.set_inner_html("");
		item.append_child(&marker_span)?;
		item.append_child(&content)?;
		rewritten += 1;
	}
	Ok(rewritten)
}
