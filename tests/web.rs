//! Browser tests for the DOM wiring; run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use study_view::components::category_tree::{
	highlight_current, init_collapse, toggle_item, wire_toggles,
};
use study_view::components::force_graph::{MOUNTED_ATTR, mount_graph_view};
use study_view::components::markdown::callout::rewrite_callouts;
use study_view::components::markdown::image_zoom::wire_image_zoom;
use study_view::components::markdown::task_marker::rewrite_task_items;
use study_view::components::markdown::toc::wire_toc;
use study_view::components::tabs::{LocalTabStore, TabStore, TabView, apply_active_classes};
use study_view::config::TAB_STORAGE_KEY;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement, KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn fixture(html: &str) -> Element {
	let document = web_sys::window().unwrap().document().unwrap();
	let root = document.create_element("div").unwrap();
	root.set_inner_html(html);
	document.body().unwrap().append_child(&root).unwrap();
	root
}

fn click(root: &Element, selector: &str) {
	root.query_selector(selector)
		.unwrap()
		.unwrap()
		.dyn_into::<HtmlElement>()
		.unwrap()
		.click();
}

fn body_has(class: &str) -> bool {
	web_sys::window()
		.unwrap()
		.document()
		.unwrap()
		.body()
		.unwrap()
		.class_list()
		.contains(class)
}

fn overlay_count() -> u32 {
	web_sys::window()
		.unwrap()
		.document()
		.unwrap()
		.query_selector_all(".img-overlay")
		.unwrap()
		.length()
}

const TREE: &str = r#"
	<div class="category-item" data-level="0" id="top">
		<a class="category-directory"><i class="folder-icon fas fa-folder-open"></i>algorithms</a>
		<div class="category-children">
			<div class="category-item" data-level="1" id="nested">
				<a class="category-directory"><i class="folder-icon fas fa-folder-open"></i>graphs</a>
				<div class="category-children">
					<div class="category-item" data-level="2" id="leaf">
						<a class="category-file" href="/study/view/x" data-path="algorithms/graphs/bfs.md">bfs</a>
					</div>
				</div>
			</div>
		</div>
	</div>
"#;

#[wasm_bindgen_test]
fn nested_directories_start_collapsed() {
	let root = fixture(TREE);
	init_collapse(&root).unwrap();
	let top = root.query_selector("#top").unwrap().unwrap();
	let nested = root.query_selector("#nested").unwrap().unwrap();
	assert!(!top.class_list().contains("collapsed"));
	assert!(nested.class_list().contains("collapsed"));
	let icon = nested.query_selector(".folder-icon").unwrap().unwrap();
	assert!(icon.class_list().contains("fa-folder"));
	assert!(!icon.class_list().contains("fa-folder-open"));
}

#[wasm_bindgen_test]
fn toggling_leaf_without_children_is_noop() {
	let root = fixture(TREE);
	let leaf = root.query_selector("#leaf").unwrap().unwrap();
	assert_eq!(toggle_item(&leaf).unwrap(), None);
	assert!(!leaf.class_list().contains("collapsed"));

	let nested = root.query_selector("#nested").unwrap().unwrap();
	assert_eq!(toggle_item(&nested).unwrap(), Some(true));
	assert_eq!(toggle_item(&nested).unwrap(), Some(false));
}

#[wasm_bindgen_test]
fn clicking_a_directory_flips_its_folder_icon() {
	let root = fixture(TREE);
	init_collapse(&root).unwrap();
	wire_toggles(&root).unwrap();
	let nested = root.query_selector("#nested").unwrap().unwrap();
	let icon = nested.query_selector(".folder-icon").unwrap().unwrap();

	click(&root, "#nested > .category-directory");
	assert!(!nested.class_list().contains("collapsed"));
	assert!(icon.class_list().contains("fa-folder-open"));
	assert!(!icon.class_list().contains("fa-folder"));

	click(&root, "#nested > .category-directory");
	assert!(nested.class_list().contains("collapsed"));
	assert!(icon.class_list().contains("fa-folder"));
	assert!(!icon.class_list().contains("fa-folder-open"));
}

#[wasm_bindgen_test]
fn current_page_opens_its_ancestors() {
	let root = fixture(TREE);
	init_collapse(&root).unwrap();
	// base64url of "algorithms/graphs/bfs.md"
	let matched = highlight_current(&root, "/study/view/YWxnb3JpdGhtcy9ncmFwaHMvYmZzLm1k").unwrap();
	assert_eq!(matched, 1);
	let file = root.query_selector(".category-file").unwrap().unwrap();
	assert!(file.class_list().contains("active"));
	let nested = root.query_selector("#nested").unwrap().unwrap();
	assert!(!nested.class_list().contains("collapsed"));
}

#[wasm_bindgen_test]
fn unknown_page_keeps_default_collapse() {
	let root = fixture(TREE);
	init_collapse(&root).unwrap();
	assert_eq!(highlight_current(&root, "/study/view/bm9wZS5tZA==").unwrap(), 0);
	let nested = root.query_selector("#nested").unwrap().unwrap();
	assert!(nested.class_list().contains("collapsed"));
}

#[wasm_bindgen_test]
fn task_items_are_rewritten() {
	let root = fixture("<ul><li>[x] done</li><li>[!] urgent</li><li>no marker</li></ul>");
	assert_eq!(rewrite_task_items(&root).unwrap(), 2);
	let first = root.query_selector("li").unwrap().unwrap();
	assert!(first.class_list().contains("task-list-item"));
	let marker = first.query_selector(".task-marker-checked").unwrap();
	assert!(marker.is_some());
	let content = first.query_selector(".task-content").unwrap().unwrap();
	assert_eq!(content.text_content().unwrap(), "done");
	let plain = root.query_selector("li:nth-child(3)").unwrap().unwrap();
	assert_eq!(plain.inner_html(), "no marker");
}

#[wasm_bindgen_test]
fn angle_bracket_markers_leave_later_brackets_intact() {
	let root = fixture("<ul><li>[&lt;] call back [x] later</li><li>[&gt;] move</li></ul>");
	assert_eq!(rewrite_task_items(&root).unwrap(), 2);
	let first = root.query_selector("li:nth-child(1)").unwrap().unwrap();
	assert!(first.query_selector(".task-marker-scheduled").unwrap().is_some());
	let content = first.query_selector(".task-content").unwrap().unwrap();
	assert_eq!(content.text_content().unwrap(), "call back [x] later");
	let second = root.query_selector("li:nth-child(2) .task-content").unwrap().unwrap();
	assert_eq!(second.text_content().unwrap(), "move");
}

#[wasm_bindgen_test]
fn callouts_are_rewritten() {
	let root = fixture(
		"<blockquote><p>[!TIP] Shortcut\nUse a heap.</p><p>More.</p></blockquote>\
		 <blockquote><p>Just a quote</p></blockquote>",
	);
	assert_eq!(rewrite_callouts(&root).unwrap(), 1);
	let callout = root.query_selector("blockquote.callout.callout-tip").unwrap().unwrap();
	let title = callout.query_selector(".callout-title").unwrap().unwrap();
	assert_eq!(title.text_content().unwrap(), "Shortcut");
	let content = callout.query_selector(".callout-content").unwrap().unwrap();
	assert_eq!(content.children().length(), 2);
	assert_eq!(content.text_content().unwrap(), "Use a heap.More.");
	let plain = root.query_selector("blockquote:not(.callout)").unwrap();
	assert!(plain.is_some());
}

#[wasm_bindgen_test]
fn graph_mounts_once() {
	let root = fixture(r#"<div id="graph-container" style="width: 400px; height: 300px"></div>"#);
	assert!(mount_graph_view().unwrap());
	assert!(!mount_graph_view().unwrap());
	let container = root.query_selector("#graph-container").unwrap().unwrap();
	assert!(container.has_attribute(MOUNTED_ATTR));
}

#[wasm_bindgen_test]
fn tab_selection_persists_in_local_storage() {
	let mut store = LocalTabStore;
	store.save("graph");
	assert_eq!(store.load().as_deref(), Some("graph"));
	let raw = web_sys::window()
		.unwrap()
		.local_storage()
		.unwrap()
		.unwrap()
		.get_item(TAB_STORAGE_KEY)
		.unwrap();
	assert_eq!(raw.as_deref(), Some("graph"));
}

#[wasm_bindgen_test]
fn tab_classes_follow_the_selected_view() {
	let root = fixture(
		r#"<a class="tab-link active" data-tab="category">Categories</a>
		<a class="tab-link" data-tab="graph">Graph</a>
		<div id="category-view" class="active"></div>
		<div id="graph-view"></div>"#,
	);
	let is_active = |selector: &str| {
		root.query_selector(selector)
			.unwrap()
			.unwrap()
			.class_list()
			.contains("active")
	};

	apply_active_classes(TabView::Graph).unwrap();
	assert!(is_active(r#"[data-tab="graph"]"#));
	assert!(!is_active(r#"[data-tab="category"]"#));
	assert!(is_active("#graph-view"));
	assert!(!is_active("#category-view"));

	apply_active_classes(TabView::Category).unwrap();
	assert!(is_active("#category-view"));
	assert!(!is_active("#graph-view"));
	root.remove();
}

const TOC: &str = r#"
	<button id="toc-toggle-btn">Contents</button>
	<div id="mobile-toc">
		<button id="toc-close-btn">Close</button>
		<div class="mobile-toc-body">
			<ul class="category-tree"><li id="first">Intro</li><li id="second">Proof</li></ul>
		</div>
	</div>
"#;

fn toc_open(root: &Element) -> bool {
	let popup = root.query_selector("#mobile-toc").unwrap().unwrap();
	popup.class_list().contains("show")
}

#[wasm_bindgen_test]
fn toc_items_get_a_stagger_index() {
	let root = fixture(TOC);
	wire_toc().unwrap();
	let second: HtmlElement = root.query_selector("#second").unwrap().unwrap().dyn_into().unwrap();
	assert_eq!(second.style().get_property_value("--item-index").unwrap(), "1");
	root.remove();
}

#[wasm_bindgen_test]
fn toc_opens_and_closes() {
	let root = fixture(TOC);
	wire_toc().unwrap();

	click(&root, "#toc-toggle-btn");
	assert!(toc_open(&root));
	assert!(body_has("toc-open"));

	// Clicks inside the panel keep it open; only the backdrop closes it.
	click(&root, "#first");
	assert!(toc_open(&root));
	click(&root, "#mobile-toc");
	assert!(!toc_open(&root));
	assert!(!body_has("toc-open"));

	click(&root, "#toc-toggle-btn");
	click(&root, "#toc-close-btn");
	assert!(!toc_open(&root));
	root.remove();
}

#[wasm_bindgen_test]
fn escape_closes_the_toc() {
	let root = fixture(TOC);
	wire_toc().unwrap();
	click(&root, "#toc-toggle-btn");
	assert!(toc_open(&root));

	let init = KeyboardEventInit::new();
	init.set_key("Escape");
	let ev = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
	let document = web_sys::window().unwrap().document().unwrap();
	document.dispatch_event(&ev).unwrap();
	assert!(!toc_open(&root));
	assert!(!body_has("toc-open"));
	root.remove();
}

#[wasm_bindgen_test]
fn toc_without_close_button_is_left_unwired() {
	let root = fixture(
		r#"<button id="toc-toggle-btn">Contents</button><div id="mobile-toc"></div>"#,
	);
	wire_toc().unwrap();
	click(&root, "#toc-toggle-btn");
	assert!(!toc_open(&root));
	root.remove();
}

#[wasm_bindgen_test]
fn image_zoom_adds_and_removes_overlay() {
	let root = fixture(r#"<p><img id="figure" src="data:,"></p>"#);
	assert_eq!(wire_image_zoom(&root).unwrap(), 1);
	let img = root.query_selector("#figure").unwrap().unwrap();

	click(&root, "#figure");
	assert!(img.class_list().contains("img-fullscreen"));
	assert_eq!(overlay_count(), 1);

	click(&root, "#figure");
	assert!(!img.class_list().contains("img-fullscreen"));
	assert_eq!(overlay_count(), 0);
	root.remove();
}

#[wasm_bindgen_test]
fn clicking_the_overlay_shrinks_the_image() {
	let root = fixture(r#"<p><img id="figure" src="data:,"></p>"#);
	wire_image_zoom(&root).unwrap();
	let img = root.query_selector("#figure").unwrap().unwrap();

	click(&root, "#figure");
	let document = web_sys::window().unwrap().document().unwrap();
	document
		.query_selector(".img-overlay")
		.unwrap()
		.unwrap()
		.dyn_into::<HtmlElement>()
		.unwrap()
		.click();
	assert!(!img.class_list().contains("img-fullscreen"));
	assert_eq!(overlay_count(), 0);
	root.remove();
}
