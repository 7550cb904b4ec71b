use std::collections::HashSet;

use log::warn;
use rand::Rng;

use super::simulation::{ForceSimulation, Simulation, build_simulation, index_by_id, initial_positions};
use super::types::GraphData;
use crate::config::GraphConfig;
use crate::path::view_url;

/// Seconds for the hover highlight to fade in and out.
const HIGHLIGHT_IN_SECS: f64 = 0.1;
const HIGHLIGHT_OUT_SECS: f64 = 0.25;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeInfo {
	pub id: String,
	pub name: String,
	pub encoded_path: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HighlightState {
	Normal,
	Hovered,
	Dimmed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<usize>,
	pub neighbors: HashSet<usize>,
	pub highlight_t: f64,
	/// Node whose highlight is still fading out.
	pub prev_node: Option<usize>,
	pub prev_neighbors: HashSet<usize>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
	pub text: String,
	pub left: f64,
	pub top: f64,
	pub visible: bool,
}

/// Layout, view transform and pointer interaction of one graph surface.
pub struct ForceGraphState<S: Simulation = ForceSimulation> {
	pub sim: S,
	pub nodes: Vec<NodeInfo>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub tooltip: Tooltip,
	pub width: f64,
	pub height: f64,
	pub config: GraphConfig,
	edges: Vec<(usize, usize)>,
}

/// Node infos plus the links whose endpoints both exist, as index pairs.
pub fn resolve_graph(data: &GraphData) -> (Vec<NodeInfo>, Vec<(usize, usize)>) {
	let nodes: Vec<NodeInfo> = data
		.nodes
		.iter()
		.map(|n| NodeInfo {
			id: n.id.clone(),
			name: n.name.clone(),
			encoded_path: n.encoded_path.clone().filter(|p| !p.is_empty()),
		})
		.collect();
	let id_to_idx = index_by_id(data.nodes.iter().map(|n| n.id.as_str()));

	let mut edges = Vec::with_capacity(data.links.len());
	for link in &data.links {
		match (
			id_to_idx.get(link.source.as_str()),
			id_to_idx.get(link.target.as_str()),
		) {
			(Some(&src), Some(&tgt)) => edges.push((src, tgt)),
			_ => warn!(
				"skipping link {} -> {}: unknown endpoint",
				link.source, link.target
			),
		}
	}
	(nodes, edges)
}

/// Label opacity dictated by zoom alone: hidden below the fade start, opaque
/// past the fade end, linear in between.
pub fn label_opacity_for_zoom(k: f64, config: &GraphConfig) -> f64 {
	let (start, end) = (config.label_fade_start, config.label_fade_end);
	if k < start {
		0.0
	} else if k > end {
		1.0
	} else {
		(k - start) / (end - start)
	}
}

impl ForceGraphState<ForceSimulation> {
	pub fn new(data: &GraphData, width: f64, height: f64, config: GraphConfig, rng: &mut impl Rng) -> Self {
		let (nodes, edges) = resolve_graph(data);
		let params = &config.simulation;
		let positions = initial_positions(
			nodes.len(),
			width / 2.0,
			height / 2.0,
			width.min(height) * params.initial_spread,
			rng,
		);
		let sim = build_simulation(positions, &edges, width, height, params, rng);
		Self::from_parts(sim, nodes, edges, width, height, config)
	}
}

impl<S: Simulation> ForceGraphState<S> {
	pub fn from_parts(
		sim: S,
		nodes: Vec<NodeInfo>,
		edges: Vec<(usize, usize)>,
		width: f64,
		height: f64,
		config: GraphConfig,
	) -> Self {
		Self {
			sim,
			nodes,
			edges,
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			tooltip: Tooltip::default(),
			width,
			height,
			config,
		}
	}

	pub fn edges(&self) -> &[(usize, usize)] {
		&self.edges
	}

	pub fn position(&self, idx: usize) -> (f64, f64) {
		let node = &self.sim.nodes()[idx];
		(node.x, node.y)
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Closest node within the hit radius of a screen point.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let hit2 = self.config.style.hit_radius.powi(2);
		self.sim
			.nodes()
			.iter()
			.enumerate()
			.map(|(i, n)| (i, (n.x - gx).powi(2) + (n.y - gy).powi(2)))
			.filter(|&(_, d2)| d2 < hit2)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| i)
	}

	fn neighbors_of(&self, idx: usize) -> HashSet<usize> {
		self.edges
			.iter()
			.filter_map(|&(src, tgt)| {
				if src == idx {
					Some(tgt)
				} else if tgt == idx {
					Some(src)
				} else {
					None
				}
			})
			.filter(|&n| n != idx)
			.collect()
	}

	/// Move the hover target; `viewport` is the pointer in viewport coordinates for
	/// the tooltip.
	pub fn set_hover(&mut self, node: Option<usize>, viewport: (f64, f64)) {
		let (dx, dy) = self.config.tooltip_offset;
		if self.hover.node == node {
			if node.is_some() {
				self.tooltip.left = viewport.0 + dx;
				self.tooltip.top = viewport.1 + dy;
			}
			return;
		}

		match (self.hover.node.take(), node) {
			(Some(prev), None) => {
				self.hover.prev_node = Some(prev);
				self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
			}
			(Some(_), Some(_)) => {
				// Switching straight to another node restarts the fade-in.
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
			_ => {
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}

		self.hover.node = node;
		self.hover.neighbors = node.map(|idx| self.neighbors_of(idx)).unwrap_or_default();

		match node {
			Some(idx) => {
				self.tooltip = Tooltip {
					text: self.nodes[idx].name.clone(),
					left: viewport.0 + dx,
					top: viewport.1 + dy,
					visible: true,
				};
			}
			None => self.tooltip.visible = false,
		}
	}

	/// Logical highlight state of a node under the current hover.
	pub fn highlight_state(&self, idx: usize) -> HighlightState {
		match self.hover.node {
			None => HighlightState::Normal,
			Some(h) if h == idx => HighlightState::Hovered,
			Some(_) if self.hover.neighbors.contains(&idx) => HighlightState::Normal,
			Some(_) => HighlightState::Dimmed,
		}
	}

	/// Highlight state used for drawing: follows the fading node after the
	/// pointer left so the transition can play out.
	pub fn visual_state(&self, idx: usize) -> HighlightState {
		if self.hover.node.is_some() {
			return self.highlight_state(idx);
		}
		match self.hover.prev_node {
			None => HighlightState::Normal,
			Some(p) if p == idx => HighlightState::Hovered,
			Some(_) if self.hover.prev_neighbors.contains(&idx) => HighlightState::Normal,
			Some(_) => HighlightState::Dimmed,
		}
	}

	pub fn is_edge_highlighted(&self, edge: usize) -> bool {
		let Some(h) = self.hover.node else {
			return false;
		};
		let (src, tgt) = self.edges[edge];
		src == h || tgt == h
	}

	pub fn is_edge_visually_highlighted(&self, edge: usize) -> bool {
		let Some(h) = self.hover.node.or(self.hover.prev_node) else {
			return false;
		};
		let (src, tgt) = self.edges[edge];
		src == h || tgt == h
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	pub fn zoom_label_opacity(&self) -> f64 {
		label_opacity_for_zoom(self.transform.k, &self.config)
	}

	pub fn label_opacity(&self, idx: usize) -> f64 {
		if self.hover.node == Some(idx) {
			1.0
		} else {
			self.zoom_label_opacity()
		}
	}

	pub fn pointer_down(&mut self, sx: f64, sy: f64) {
		match self.node_at_position(sx, sy) {
			Some(idx) => self.drag_start(idx, sx, sy),
			None => {
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
				};
			}
		}
	}

	/// Pin `idx` where it is and warm the simulation so neighbors follow.
	pub fn drag_start(&mut self, idx: usize, sx: f64, sy: f64) {
		let (x, y) = self.position(idx);
		self.drag = DragState {
			node_idx: Some(idx),
			start_x: sx,
			start_y: sy,
			node_start_x: x,
			node_start_y: y,
			moved: false,
		};
		let node = &mut self.sim.nodes_mut()[idx];
		node.fx = Some(x);
		node.fy = Some(y);
		self.sim
			.set_alpha_target(self.config.simulation.drag_alpha_target);
	}

	/// Pointer moved to screen `(sx, sy)`; `viewport` feeds the tooltip.
	pub fn pointer_move(&mut self, sx: f64, sy: f64, viewport: (f64, f64)) {
		if let Some(idx) = self.drag.node_idx {
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if dx.hypot(dy) >= self.config.click_tolerance {
				self.drag.moved = true;
			}
			let (nx, ny) = (
				self.drag.node_start_x + dx / self.transform.k,
				self.drag.node_start_y + dy / self.transform.k,
			);
			let node = &mut self.sim.nodes_mut()[idx];
			node.fx = Some(nx);
			node.fy = Some(ny);
			self.set_hover(Some(idx), viewport);
		} else if self.pan.active {
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
		} else {
			let hovered = self.node_at_position(sx, sy);
			self.set_hover(hovered, viewport);
		}
	}

	/// Release the node so it moves freely again.
	pub fn drag_end(&mut self) {
		if let Some(idx) = self.drag.node_idx.take() {
			let node = &mut self.sim.nodes_mut()[idx];
			node.fx = None;
			node.fy = None;
			self.sim.set_alpha_target(0.0);
		}
	}

	/// Finish any gesture; returns the URL to open when the gesture was a
	/// click on a node carrying a path.
	pub fn pointer_up(&mut self) -> Option<String> {
		let clicked = match self.drag.node_idx {
			Some(idx) if !self.drag.moved => Some(idx),
			_ => None,
		};
		self.drag_end();
		self.pan.active = false;
		clicked.and_then(|idx| self.nodes[idx].encoded_path.as_deref().map(view_url))
	}

	pub fn pointer_leave(&mut self) {
		self.drag_end();
		self.pan.active = false;
		self.set_hover(None, (0.0, 0.0));
	}

	/// Zoom around screen `(sx, sy)`; positive `delta_y` zooms out.
	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let step = self.config.zoom_step;
		let factor = if delta_y > 0.0 { 1.0 / step } else { step };
		self.zoom_to(sx, sy, self.transform.k * factor);
	}

	pub fn zoom_to(&mut self, sx: f64, sy: f64, k: f64) {
		let new_k = k.clamp(self.config.zoom_min, self.config.zoom_max);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn tick(&mut self, dt: f64) {
		if !self.sim.is_settled() {
			self.sim.step();
		}

		if self.hover.node.is_some() {
			self.hover.highlight_t = (self.hover.highlight_t + dt / HIGHLIGHT_IN_SECS).min(1.0);
		} else {
			self.hover.highlight_t = (self.hover.highlight_t - dt / HIGHLIGHT_OUT_SECS).max(0.0);
			if self.hover.highlight_t <= 0.0 {
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::super::simulation::{Force, SimNode};
	use super::super::types::{GraphLink, GraphNode};
	use super::*;

	/// Deterministic stepper: pinned nodes snap to `fx`/`fy`, free nodes
	/// drift one unit right per step.
	struct FakeSim {
		nodes: Vec<SimNode>,
		alpha_target: f64,
		steps: usize,
	}

	impl FakeSim {
		fn new(positions: &[(f64, f64)]) -> Self {
			Self {
				nodes: positions.iter().map(|&(x, y)| SimNode::at(x, y)).collect(),
				alpha_target: 0.0,
				steps: 0,
			}
		}
	}

	impl Simulation for FakeSim {
		fn step(&mut self) {
			self.steps += 1;
			for node in &mut self.nodes {
				match (node.fx, node.fy) {
					(Some(fx), Some(fy)) => {
						node.x = fx;
						node.y = fy;
					}
					_ => node.x += 1.0,
				}
			}
		}

		fn add_force(&mut self, _name: &str, _force: Box<dyn Force>) {}

		fn nodes(&self) -> &[SimNode] {
			&self.nodes
		}

		fn nodes_mut(&mut self) -> &mut [SimNode] {
			&mut self.nodes
		}

		fn alpha(&self) -> f64 {
			1.0
		}

		fn set_alpha_target(&mut self, target: f64) {
			self.alpha_target = target;
		}

		fn is_settled(&self) -> bool {
			false
		}
	}

	fn node(id: &str, path: Option<&str>) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: format!("Note {id}"),
			encoded_path: path.map(Into::into),
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
			value: None,
		}
	}

	/// A links to B and C; D only links to C.
	fn sample() -> ForceGraphState<FakeSim> {
		let data = GraphData {
			nodes: vec![
				node("a", Some("YS5tZA==")),
				node("b", None),
				node("c", None),
				node("d", None),
			],
			links: vec![link("a", "b"), link("a", "c"), link("c", "d")],
		};
		let (nodes, edges) = resolve_graph(&data);
		let sim = FakeSim::new(&[(0.0, 0.0), (100.0, 0.0), (0.0, 100.0), (100.0, 100.0)]);
		ForceGraphState::from_parts(sim, nodes, edges, 800.0, 600.0, GraphConfig::default())
	}

	#[test]
	fn resolves_all_valid_links() {
		let data = GraphData {
			nodes: vec![node("x", None), node("y", None), node("z", None)],
			links: vec![link("x", "y"), link("y", "z"), link("z", "x")],
		};
		let (nodes, edges) = resolve_graph(&data);
		assert_eq!(nodes.len(), 3);
		assert_eq!(edges, vec![(0, 1), (1, 2), (2, 0)]);
	}

	#[test]
	fn drops_links_with_missing_endpoint() {
		let data = GraphData {
			nodes: vec![node("x", None), node("y", None)],
			links: vec![link("x", "y"), link("x", "ghost"), link("ghost", "y")],
		};
		let (_, edges) = resolve_graph(&data);
		assert_eq!(edges, vec![(0, 1)]);
	}

	#[test]
	fn hover_highlights_neighbors_and_incident_edges() {
		let mut state = sample();
		state.set_hover(Some(0), (10.0, 10.0));

		assert_eq!(state.highlight_state(0), HighlightState::Hovered);
		assert_eq!(state.highlight_state(1), HighlightState::Normal);
		assert_eq!(state.highlight_state(2), HighlightState::Normal);
		assert_eq!(state.highlight_state(3), HighlightState::Dimmed);

		assert!(state.is_edge_highlighted(0));
		assert!(state.is_edge_highlighted(1));
		assert!(!state.is_edge_highlighted(2));

		assert_eq!(state.label_opacity(0), 1.0);
		assert_eq!(state.label_opacity(1), 0.0);
		assert!(state.tooltip.visible);
		assert_eq!(state.tooltip.text, "Note a");
		assert_eq!((state.tooltip.left, state.tooltip.top), (20.0, -18.0));
	}

	#[test]
	fn hover_leave_restores_base_state() {
		let mut state = sample();
		state.set_hover(Some(0), (0.0, 0.0));
		state.set_hover(None, (0.0, 0.0));

		for idx in 0..4 {
			assert_eq!(state.highlight_state(idx), HighlightState::Normal);
		}
		for edge in 0..state.edges().len() {
			assert!(!state.is_edge_highlighted(edge));
		}
		assert!(!state.tooltip.visible);
		assert_eq!(state.tooltip.text, "Note a");
		// Fading out until the highlight decays.
		assert_eq!(state.visual_state(3), HighlightState::Dimmed);
		for _ in 0..30 {
			state.tick(0.016);
		}
		assert!(!state.has_active_highlight());
		assert_eq!(state.visual_state(3), HighlightState::Normal);
	}

	#[test]
	fn pointer_over_node_hovers_it() {
		let mut state = sample();
		state.pointer_move(101.0, 1.0, (0.0, 0.0));
		assert_eq!(state.hover.node, Some(1));
		state.pointer_move(50.0, 50.0, (0.0, 0.0));
		assert_eq!(state.hover.node, None);
	}

	#[test]
	fn drag_pins_then_release_frees_node() {
		let mut state = sample();
		state.pointer_down(100.0, 0.0);
		assert_eq!(state.drag.node_idx, Some(1));
		assert_eq!(state.sim.alpha_target, 0.3);

		state.pointer_move(140.0, 30.0, (0.0, 0.0));
		let pinned = &state.sim.nodes()[1];
		assert_eq!((pinned.fx, pinned.fy), (Some(140.0), Some(30.0)));
		state.tick(0.016);
		assert_eq!(state.position(1), (140.0, 30.0));

		assert_eq!(state.pointer_up(), None);
		let released = &state.sim.nodes()[1];
		assert_eq!((released.fx, released.fy), (None, None));
		assert_eq!(state.sim.alpha_target, 0.0);

		state.tick(0.016);
		assert_eq!(state.position(1), (141.0, 30.0));
	}

	#[test]
	fn drag_respects_zoom_scale() {
		let mut state = sample();
		state.transform.k = 2.0;
		state.pointer_down(200.0, 0.0);
		state.pointer_move(220.0, 0.0, (0.0, 0.0));
		assert_eq!(state.sim.nodes()[1].fx, Some(110.0));
	}

	#[test]
	fn click_on_node_with_path_navigates() {
		let mut state = sample();
		state.pointer_down(1.0, 1.0);
		assert_eq!(state.pointer_up().as_deref(), Some("/study/view/YS5tZA=="));
	}

	#[test]
	fn click_on_node_without_path_is_noop() {
		let mut state = sample();
		state.pointer_down(100.0, 0.0);
		assert_eq!(state.pointer_up(), None);
	}

	#[test]
	fn drag_is_not_a_click() {
		let mut state = sample();
		state.pointer_down(0.0, 0.0);
		state.pointer_move(40.0, 0.0, (0.0, 0.0));
		assert_eq!(state.pointer_up(), None);
	}

	#[test]
	fn background_drag_pans() {
		let mut state = sample();
		state.pointer_down(400.0, 400.0);
		assert!(state.pan.active);
		state.pointer_move(430.0, 380.0, (0.0, 0.0));
		assert_eq!((state.transform.x, state.transform.y), (30.0, -20.0));
		state.pointer_up();
		assert!(!state.pan.active);
	}

	#[test]
	fn zoom_is_clamped_and_anchored() {
		let mut state = sample();
		for _ in 0..100 {
			state.zoom(200.0, 100.0, -1.0);
		}
		assert_eq!(state.transform.k, 4.0);
		let (gx, gy) = state.screen_to_graph(200.0, 100.0);
		assert!((gx - 200.0).abs() < 1e-6 && (gy - 100.0).abs() < 1e-6);
		for _ in 0..100 {
			state.zoom(0.0, 0.0, 1.0);
		}
		assert_eq!(state.transform.k, 0.4);
	}

	#[test]
	fn label_opacity_follows_zoom() {
		let config = GraphConfig::default();
		assert_eq!(label_opacity_for_zoom(1.0, &config), 0.0);
		assert_eq!(label_opacity_for_zoom(1.5, &config), 0.0);
		assert!((label_opacity_for_zoom(1.75, &config) - 0.5).abs() < 1e-9);
		assert_eq!(label_opacity_for_zoom(2.0, &config), 1.0);
		assert_eq!(label_opacity_for_zoom(3.0, &config), 1.0);

		let mut state = sample();
		state.zoom_to(0.0, 0.0, 1.75);
		state.set_hover(Some(0), (0.0, 0.0));
		state.set_hover(None, (0.0, 0.0));
		assert!((state.label_opacity(0) - 0.5).abs() < 1e-9);
	}

	#[test]
	fn real_layout_keeps_node_count() {
		let data = GraphData {
			nodes: vec![node("a", None), node("b", None), node("c", None)],
			links: vec![link("a", "b"), link("b", "missing")],
		};
		let mut rng = SmallRng::seed_from_u64(3);
		let mut state = ForceGraphState::new(&data, 600.0, 400.0, GraphConfig::default(), &mut rng);
		assert_eq!(state.sim.nodes().len(), 3);
		assert_eq!(state.edges(), &[(0, 1)]);
		for _ in 0..10 {
			state.tick(0.016);
		}
		assert!(state.sim.nodes().iter().all(|n| n.x.is_finite()));
	}
}
