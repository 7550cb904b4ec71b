use leptos::prelude::*;
use log::debug;

/// Pages this client has nothing to enhance on.
#[component]
pub fn NotFound(pathname: String) -> impl IntoView {
	debug!("no enhancements for {pathname}");
}
