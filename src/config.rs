//! Tunables for the study pages: endpoints, storage keys, and graph layout.

/// Endpoint serving the note relationship graph.
pub const GRAPH_ENDPOINT: &str = "/api/study/graph";

/// Prefix of the document view route; the encoded note path follows it.
pub const VIEW_URL_PREFIX: &str = "/study/view/";

/// Local storage key holding the last selected tab.
pub const TAB_STORAGE_KEY: &str = "study-active-tab";

/// Element id of the graph drawing container.
pub const GRAPH_CONTAINER_ID: &str = "graph-container";

/// Selector of the loading/empty/error placeholder next to the graph.
pub const GRAPH_PLACEHOLDER_SELECTOR: &str = ".graph-placeholder";

/// Force and simulation parameters, mirroring the d3-force settings the site
/// was tuned with.
#[derive(Clone, Debug)]
pub struct SimulationParameters {
	pub link_distance: f64,
	pub charge_strength: f64,
	pub charge_distance_min: f64,
	pub center_strength: f64,
	pub radial_strength: f64,
	/// Radial targets are `min(w, h) * radial_scale * (radial_min + r * radial_spread)`.
	pub radial_scale: f64,
	pub radial_min: f64,
	pub radial_spread: f64,
	pub collide_radius: f64,
	pub collide_strength: f64,
	pub alpha: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
	/// Initial placement radius as a fraction of `min(w, h)`.
	pub initial_spread: f64,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		Self {
			link_distance: 60.0,
			charge_strength: -80.0,
			charge_distance_min: 1.0,
			center_strength: 0.1,
			radial_strength: 0.2,
			radial_scale: 0.35,
			radial_min: 0.1,
			radial_spread: 0.25,
			collide_radius: 15.0,
			collide_strength: 0.8,
			alpha: 0.9,
			alpha_min: 0.001,
			alpha_decay: 0.015,
			velocity_decay: 0.3,
			drag_alpha_target: 0.3,
			initial_spread: 0.2,
		}
	}
}

/// Colors and sizes of the drawn graph.
#[derive(Clone, Debug)]
pub struct GraphStyle {
	pub node_radius: f64,
	pub hovered_radius: f64,
	pub hit_radius: f64,
	pub node_color: &'static str,
	pub accent_color: &'static str,
	pub dimmed_opacity: f64,
	pub edge_color: &'static str,
	pub edge_width: f64,
	pub edge_opacity: f64,
	pub edge_dimmed_opacity: f64,
	pub edge_highlight_width: f64,
	pub edge_highlight_opacity: f64,
	pub label_color: &'static str,
	pub label_offset: f64,
	pub label_font_px: f64,
}

impl Default for GraphStyle {
	fn default() -> Self {
		Self {
			node_radius: 6.0,
			hovered_radius: 9.0,
			hit_radius: 10.0,
			node_color: "#94A3B8",
			accent_color: "#EE5F6A",
			dimmed_opacity: 0.3,
			edge_color: "#CBD5E1",
			edge_width: 1.0,
			edge_opacity: 0.5,
			edge_dimmed_opacity: 0.3,
			edge_highlight_width: 2.0,
			edge_highlight_opacity: 0.8,
			label_color: "#64748B",
			label_offset: 16.0,
			label_font_px: 6.0,
		}
	}
}

/// Everything the graph view needs to lay out and draw itself.
#[derive(Clone, Debug)]
pub struct GraphConfig {
	pub simulation: SimulationParameters,
	pub style: GraphStyle,
	pub zoom_min: f64,
	pub zoom_max: f64,
	/// Wheel zoom factor per notch.
	pub zoom_step: f64,
	/// Labels are hidden below this zoom level.
	pub label_fade_start: f64,
	/// Labels are fully opaque above this zoom level.
	pub label_fade_end: f64,
	/// Pointer travel (px) below which a press-release counts as a click.
	pub click_tolerance: f64,
	pub tooltip_offset: (f64, f64),
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			simulation: SimulationParameters::default(),
			style: GraphStyle::default(),
			zoom_min: 0.4,
			zoom_max: 4.0,
			zoom_step: 1.1,
			label_fade_start: 1.5,
			label_fade_end: 2.0,
			click_tolerance: 3.0,
			tooltip_offset: (10.0, -28.0),
		}
	}
}
