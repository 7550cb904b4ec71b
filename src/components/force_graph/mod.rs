//! Interactive force-directed graph of note relationships.

mod component;
pub mod fetch;
mod render;
pub mod simulation;
pub mod state;
mod types;

pub use component::{ForceGraphCanvas, GraphStatus, GraphView, MOUNTED_ATTR, mount_graph_view};
pub use types::{GraphData, GraphLink, GraphNode};
