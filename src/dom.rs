//! Small fallible wrappers over the browser DOM.

use thiserror::Error;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

/// Failure while wiring page behavior to the DOM.
#[derive(Debug, Error)]
pub enum DomError {
	#[error("no global window")]
	NoWindow,
	#[error("window has no document")]
	NoDocument,
	#[error("element not found: {0}")]
	Missing(String),
	#[error("javascript error: {0}")]
	Js(String),
}

impl From<JsValue> for DomError {
	fn from(value: JsValue) -> Self {
		DomError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}

pub fn window() -> Result<Window, DomError> {
	web_sys::window().ok_or(DomError::NoWindow)
}

pub fn document() -> Result<Document, DomError> {
	window()?.document().ok_or(DomError::NoDocument)
}

/// Every element matching `selector` under `root`, in document order.
pub fn query_all(root: &impl AsRef<Element>, selector: &str) -> Result<Vec<Element>, DomError> {
	let list = root.as_ref().query_selector_all(selector)?;
	Ok((0..list.length())
		.filter_map(|i| list.item(i))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect())
}

/// Every element in the document matching `selector`.
pub fn query_document(selector: &str) -> Result<Vec<Element>, DomError> {
	let list = document()?.query_selector_all(selector)?;
	Ok((0..list.length())
		.filter_map(|i| list.item(i))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect())
}

pub fn by_id(id: &str) -> Result<Option<HtmlElement>, DomError> {
	Ok(document()?
		.get_element_by_id(id)
		.and_then(|el| el.dyn_into::<HtmlElement>().ok()))
}

/// Attach a listener that lives as long as the page.
pub fn listen<E, F>(target: &web_sys::EventTarget, event: &str, handler: F) -> Result<(), DomError>
where
	E: FromWasmAbi + 'static,
	F: FnMut(E) + 'static,
{
	let closure = Closure::<dyn FnMut(E)>::new(handler);
	target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
	closure.forget();
	Ok(())
}

/// Run `f` once after `millis`.
pub fn set_timeout(millis: i32, f: impl FnOnce() + 'static) -> Result<(), DomError> {
	let closure = Closure::once_into_js(f);
	window()?.set_timeout_with_callback_and_timeout_and_arguments_0(closure.unchecked_ref(), millis)?;
	Ok(())
}

/// Call `window[global][method](arg)` when that global exists; a missing
/// global or method is skipped.
pub fn call_optional_global(global: &str, method: &str, arg: Option<&JsValue>) -> Result<bool, DomError> {
	let window = window()?;
	let target = js_sys::Reflect::get(&window, &JsValue::from_str(global))?;
	if target.is_undefined() || target.is_null() {
		return Ok(false);
	}
	let func = js_sys::Reflect::get(&target, &JsValue::from_str(method))?;
	let Some(func) = func.dyn_ref::<js_sys::Function>() else {
		return Ok(false);
	};
	match arg {
		Some(arg) => func.call1(&target, arg)?,
		None => func.call0(&target)?,
	};
	Ok(true)
}
