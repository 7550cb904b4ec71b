use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent, Window};

use super::fetch::{FetchError, fetch_graph};
use super::render;
use super::state::{ForceGraphState, Tooltip};
use super::types::GraphData;
use crate::config::{GRAPH_CONTAINER_ID, GRAPH_PLACEHOLDER_SELECTOR, GraphConfig};
use crate::dom::{self, DomError};

/// Attribute marking a container that already hosts a graph surface.
pub const MOUNTED_ATTR: &str = "data-graph-mounted";

const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphStatus {
	Loading,
	Empty,
	Failed,
	Ready,
}

impl GraphStatus {
	pub fn from_result(result: &Result<GraphData, FetchError>) -> Self {
		match result {
			Ok(data) if data.is_empty() => GraphStatus::Empty,
			Ok(_) => GraphStatus::Ready,
			Err(_) => GraphStatus::Failed,
		}
	}

	/// Placeholder markup for the status; `None` hides the placeholder.
	pub fn placeholder_html(self) -> Option<&'static str> {
		match self {
			GraphStatus::Loading => {
				Some(r#"<div class="loading-spinner"></div><h3>Loading graph data...</h3>"#)
			}
			GraphStatus::Empty => {
				Some(r#"<i class="fas fa-info-circle"></i><h3>No graph data yet</h3>"#)
			}
			GraphStatus::Failed => Some(
				r#"<i class="fas fa-exclamation-triangle"></i><h3>Something went wrong while loading the graph.</h3>"#,
			),
			GraphStatus::Ready => None,
		}
	}
}

fn show_placeholder(status: GraphStatus) -> Result<(), DomError> {
	let Some(placeholder) = dom::document()?.query_selector(GRAPH_PLACEHOLDER_SELECTOR)? else {
		return Ok(());
	};
	let Ok(placeholder) = placeholder.dyn_into::<HtmlElement>() else {
		return Ok(());
	};
	match status.placeholder_html() {
		Some(html) => {
			placeholder.set_inner_html(html);
			placeholder.style().set_property("display", "block")?;
		}
		None => placeholder.style().set_property("display", "none")?,
	}
	Ok(())
}

/// Mount the graph view into its container unless a surface is already there.
/// Returns whether a new surface was created.
pub fn mount_graph_view() -> Result<bool, DomError> {
	let Some(container) = dom::by_id(GRAPH_CONTAINER_ID)? else {
		debug!("no #{GRAPH_CONTAINER_ID} on this page");
		return Ok(false);
	};
	if container.has_attribute(MOUNTED_ATTR) {
		debug!("graph already mounted");
		return Ok(false);
	}
	container.set_attribute(MOUNTED_ATTR, "true")?;
	leptos::mount::mount_to(container, GraphView).forget();
	info!("graph view mounted");
	Ok(true)
}

/// Loads the graph once and hands it to the canvas.
#[component]
pub fn GraphView() -> impl IntoView {
	let status = RwSignal::new(GraphStatus::Loading);
	let data = RwSignal::new(None::<GraphData>);

	Effect::new(move |_| {
		if let Err(e) = show_placeholder(status.get()) {
			warn!("graph placeholder: {e}");
		}
	});

	spawn_local(async move {
		let result = fetch_graph().await;
		status.set(GraphStatus::from_result(&result));
		if let Ok(graph) = result {
			if !graph.is_empty() {
				data.set(Some(graph));
			}
		}
	});

	let graph = Signal::derive(move || data.get().unwrap_or_default());
	view! {
		<Show when=move || data.with(Option::is_some)>
			<ForceGraphCanvas data=graph />
		</Show>
	}
}

fn surface_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = GraphConfig::default())] config: GraphConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let tooltip = RwSignal::new(Tooltip::default());
	let hovering = RwSignal::new(false);
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = surface_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("canvas 2d context unavailable");
			return;
		};
		let mut rng = SmallRng::seed_from_u64(js_sys::Date::now() as u64);
		*state_init.borrow_mut() = Some(ForceGraphState::new(
			&data.get_untracked(),
			w,
			h,
			config.clone(),
			&mut rng,
		));

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = surface_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y, (ev.client_x() as f64, ev.client_y() as f64));
			hovering.set(s.hover.node.is_some());
			if tooltip.get_untracked() != s.tooltip {
				tooltip.set(s.tooltip.clone());
			}
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let target = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.pointer_up());
		if let Some(url) = target {
			let navigated: Result<(), DomError> =
				dom::window().and_then(|w: Window| Ok(w.location().set_href(&url)?));
			if let Err(e) = navigated {
				warn!("navigation to {url} failed: {e}");
			}
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
			hovering.set(false);
			tooltip.set(s.tooltip.clone());
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(x, y, ev.delta_y());
		}
	};

	let canvas_style = move || {
		format!(
			"display: block; cursor: {};",
			if hovering.get() { "pointer" } else { "grab" }
		)
	};
	let tooltip_style = move || {
		let t = tooltip.get();
		format!(
			"position: fixed; left: {}px; top: {}px; opacity: {}; transition: opacity {}ms; \
			 background-color: #F8FAFC; color: #0F172A; padding: 8px; border-radius: 10px; \
			 box-shadow: 0 2px 4px rgba(0,0,0,0.2); pointer-events: none; z-index: 1000;",
			t.left,
			t.top,
			if t.visible { 1 } else { 0 },
			if t.visible { 200 } else { 500 },
		)
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style=canvas_style
		/>
		<div class="graph-tooltip" style=tooltip_style>
			{move || tooltip.get().text}
		</div>
	}
}
