//! Single-shot loader for the note relationship graph.

use gloo_net::http::Request;
use log::{error, info};
use thiserror::Error;

use super::types::GraphData;
use crate::config::GRAPH_ENDPOINT;

#[derive(Debug, Error)]
pub enum FetchError {
	#[error("graph request failed: {0}")]
	Transport(#[from] gloo_net::Error),
	#[error("graph endpoint answered with status {0}")]
	Status(u16),
	#[error("graph payload is malformed: {0}")]
	Parse(#[from] serde_json::Error),
}

/// Fetch the graph once; no retry.
pub async fn fetch_graph() -> Result<GraphData, FetchError> {
	let result = async {
		let response = Request::get(GRAPH_ENDPOINT).send().await?;
		let status = response.status();
		// A 204 has no body worth reading.
		let body = if status == 204 {
			String::new()
		} else {
			response.text().await?
		};
		interpret_response(status, &body)
	}
	.await;

	match &result {
		Ok(data) => info!(
			"graph loaded: {} nodes, {} links",
			data.nodes.len(),
			data.links.len()
		),
		Err(e) => error!("graph fetch failed: {e}"),
	}
	result
}

/// Map a status and body to graph data. No-content and blank bodies are an
/// empty graph, not a failure.
pub fn interpret_response(status: u16, body: &str) -> Result<GraphData, FetchError> {
	match status {
		204 => Ok(GraphData::default()),
		200..=299 if body.trim().is_empty() => Ok(GraphData::default()),
		200..=299 => Ok(serde_json::from_str(body)?),
		other => Err(FetchError::Status(other)),
	}
}
