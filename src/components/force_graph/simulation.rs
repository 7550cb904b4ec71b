//! Force-directed layout with d3-force semantics: named forces feed node
//! velocities, a cooling `alpha` scales them, and pinned nodes hold `fx`/`fy`.

use std::collections::HashMap;

use rand::Rng;

use crate::config::SimulationParameters;

/// Tiny deterministic nudge for coincident nodes.
const JIGGLE: f64 = 1e-6;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl SimNode {
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			..Default::default()
		}
	}
}

/// One force contribution, applied every step.
pub trait Force {
	fn apply(&mut self, nodes: &mut [SimNode], alpha: f64);
}

impl<F: FnMut(&mut [SimNode], f64)> Force for F {
	fn apply(&mut self, nodes: &mut [SimNode], alpha: f64) {
		self(nodes, alpha)
	}
}

/// The seam between interaction logic and the physics.
pub trait Simulation {
	/// Advance one tick.
	fn step(&mut self);
	/// Register a force; a force with the same name is replaced.
	fn add_force(&mut self, name: &str, force: Box<dyn Force>);
	fn nodes(&self) -> &[SimNode];
	fn nodes_mut(&mut self) -> &mut [SimNode];
	fn alpha(&self) -> f64;
	fn set_alpha_target(&mut self, target: f64);
	/// True once cooled down with nothing holding it warm.
	fn is_settled(&self) -> bool;
}

pub struct ForceSimulation {
	nodes: Vec<SimNode>,
	forces: Vec<(String, Box<dyn Force>)>,
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	velocity_decay: f64,
}

impl ForceSimulation {
	pub fn new(nodes: Vec<SimNode>, params: &SimulationParameters) -> Self {
		Self {
			nodes,
			forces: Vec::new(),
			alpha: params.alpha,
			alpha_min: params.alpha_min,
			alpha_decay: params.alpha_decay,
			alpha_target: 0.0,
			velocity_decay: params.velocity_decay,
		}
	}

	pub fn force_names(&self) -> impl Iterator<Item = &str> {
		self.forces.iter().map(|(name, _)| name.as_str())
	}
}

impl Simulation for ForceSimulation {
	fn step(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
		for (_, force) in &mut self.forces {
			force.apply(&mut self.nodes, self.alpha);
		}
		let keep = 1.0 - self.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}

	fn add_force(&mut self, name: &str, force: Box<dyn Force>) {
		match self.forces.iter_mut().find(|(n, _)| n == name) {
			Some(slot) => slot.1 = force,
			None => self.forces.push((name.to_string(), force)),
		}
	}

	fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	fn nodes_mut(&mut self) -> &mut [SimNode] {
		&mut self.nodes
	}

	fn alpha(&self) -> f64 {
		self.alpha
	}

	fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	fn is_settled(&self) -> bool {
		self.alpha < self.alpha_min && self.alpha_target < self.alpha_min
	}
}

/// Spring pulling linked nodes toward `distance`.
pub struct LinkForce {
	links: Vec<(usize, usize)>,
	distance: f64,
	strengths: Vec<f64>,
	biases: Vec<f64>,
}

impl LinkForce {
	pub fn new(links: Vec<(usize, usize)>, node_count: usize, distance: f64) -> Self {
		let mut degree = vec![0usize; node_count];
		for &(s, t) in &links {
			degree[s] += 1;
			degree[t] += 1;
		}
		let strengths = links
			.iter()
			.map(|&(s, t)| 1.0 / degree[s].min(degree[t]).max(1) as f64)
			.collect();
		let biases = links
			.iter()
			.map(|&(s, t)| degree[s] as f64 / (degree[s] + degree[t]).max(1) as f64)
			.collect();
		Self {
			links,
			distance,
			strengths,
			biases,
		}
	}
}

impl Force for LinkForce {
	fn apply(&mut self, nodes: &mut [SimNode], alpha: f64) {
		for (i, &(s, t)) in self.links.iter().enumerate() {
			if s == t {
				continue;
			}
			let (src, tgt) = (&nodes[s], &nodes[t]);
			let mut dx = tgt.x + tgt.vx - src.x - src.vx;
			let mut dy = tgt.y + tgt.vy - src.y - src.vy;
			if dx == 0.0 && dy == 0.0 {
				dx = JIGGLE;
				dy = JIGGLE;
			}
			let len = (dx * dx + dy * dy).sqrt();
			let scale = (len - self.distance) / len * alpha * self.strengths[i];
			dx *= scale;
			dy *= scale;
			let bias = self.biases[i];
			nodes[t].vx -= dx * bias;
			nodes[t].vy -= dy * bias;
			nodes[s].vx += dx * (1.0 - bias);
			nodes[s].vy += dy * (1.0 - bias);
		}
	}
}

/// Pairwise inverse-distance charge; negative strength repels.
pub struct ManyBodyForce {
	strength: f64,
	distance_min2: f64,
}

impl ManyBodyForce {
	pub fn new(strength: f64, distance_min: f64) -> Self {
		Self {
			strength,
			distance_min2: distance_min * distance_min,
		}
	}
}

impl Force for ManyBodyForce {
	fn apply(&mut self, nodes: &mut [SimNode], alpha: f64) {
		let n = nodes.len();
		let mut dv = vec![(0.0, 0.0); n];
		for i in 0..n {
			for j in 0..n {
				if i == j {
					continue;
				}
				let (mut dx, mut dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
				if dx == 0.0 && dy == 0.0 {
					// Coincident pair: push apart along an index-dependent axis.
					let sign = if i < j { 1.0 } else { -1.0 };
					dx = JIGGLE * sign;
					dy = JIGGLE * sign;
				}
				let mut l2 = dx * dx + dy * dy;
				if l2 < self.distance_min2 {
					l2 = (self.distance_min2 * l2).sqrt();
				}
				let w = self.strength * alpha / l2;
				dv[i].0 += dx * w;
				dv[i].1 += dy * w;
			}
		}
		for (node, (dvx, dvy)) in nodes.iter_mut().zip(dv) {
			node.vx += dvx;
			node.vy += dvy;
		}
	}
}

/// Shifts the whole layout so its mean drifts toward a point.
pub struct CenterForce {
	x: f64,
	y: f64,
	strength: f64,
}

impl CenterForce {
	pub fn new(x: f64, y: f64, strength: f64) -> Self {
		Self { x, y, strength }
	}
}

impl Force for CenterForce {
	fn apply(&mut self, nodes: &mut [SimNode], _alpha: f64) {
		if nodes.is_empty() {
			return;
		}
		let n = nodes.len() as f64;
		let (sx, sy) = nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (shift_x, shift_y) = (
			(sx / n - self.x) * self.strength,
			(sy / n - self.y) * self.strength,
		);
		for node in nodes {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}
}

/// Pulls each node toward its own target distance from a center.
pub struct RadialForce {
	x: f64,
	y: f64,
	radii: Vec<f64>,
	strength: f64,
}

impl RadialForce {
	pub fn new(x: f64, y: f64, radii: Vec<f64>, strength: f64) -> Self {
		Self {
			x,
			y,
			radii,
			strength,
		}
	}
}

impl Force for RadialForce {
	fn apply(&mut self, nodes: &mut [SimNode], alpha: f64) {
		for (node, &radius) in nodes.iter_mut().zip(&self.radii) {
			let (mut dx, mut dy) = (node.x - self.x, node.y - self.y);
			if dx == 0.0 && dy == 0.0 {
				dx = JIGGLE;
				dy = JIGGLE;
			}
			let r = (dx * dx + dy * dy).sqrt();
			let k = (radius - r) * self.strength * alpha / r;
			node.vx += dx * k;
			node.vy += dy * k;
		}
	}
}

/// Keeps circles of `radius` from overlapping, using positions predicted
/// from the current velocities.
pub struct CollideForce {
	radius: f64,
	strength: f64,
}

impl CollideForce {
	pub fn new(radius: f64, strength: f64) -> Self {
		Self { radius, strength }
	}
}

impl Force for CollideForce {
	fn apply(&mut self, nodes: &mut [SimNode], _alpha: f64) {
		let n = nodes.len();
		let min = 2.0 * self.radius;
		for i in 0..n {
			for j in (i + 1)..n {
				let xi = nodes[i].x + nodes[i].vx;
				let yi = nodes[i].y + nodes[i].vy;
				let mut dx = xi - (nodes[j].x + nodes[j].vx);
				let mut dy = yi - (nodes[j].y + nodes[j].vy);
				let mut l2 = dx * dx + dy * dy;
				if l2 >= min * min {
					continue;
				}
				if l2 == 0.0 {
					dx = JIGGLE;
					dy = JIGGLE;
					l2 = dx * dx + dy * dy;
				}
				let l = l2.sqrt();
				let push = (min - l) / l * self.strength;
				dx *= push;
				dy *= push;
				// Equal radii share the correction evenly.
				nodes[i].vx += dx * 0.5;
				nodes[i].vy += dy * 0.5;
				nodes[j].vx -= dx * 0.5;
				nodes[j].vy -= dy * 0.5;
			}
		}
	}
}

/// Place nodes evenly around a circle at random radii from `(cx, cy)`.
pub fn initial_positions(count: usize, cx: f64, cy: f64, max_radius: f64, rng: &mut impl Rng) -> Vec<SimNode> {
	(0..count)
		.map(|i| {
			let angle = 2.0 * std::f64::consts::PI * i as f64 / count as f64;
			let radius = max_radius * rng.gen_range(0.0..1.0);
			SimNode::at(cx + radius * angle.cos(), cy + radius * angle.sin())
		})
		.collect()
}

/// Build the simulation with the site's five forces for a `width` x `height`
/// surface.
pub fn build_simulation(
	nodes: Vec<SimNode>,
	links: &[(usize, usize)],
	width: f64,
	height: f64,
	params: &SimulationParameters,
	rng: &mut impl Rng,
) -> ForceSimulation {
	let (cx, cy) = (width / 2.0, height / 2.0);
	let extent = width.min(height);
	let radii = (0..nodes.len())
		.map(|_| extent * params.radial_scale * (params.radial_min + rng.gen_range(0.0..1.0) * params.radial_spread))
		.collect();
	let count = nodes.len();

	let mut sim = ForceSimulation::new(nodes, params);
	sim.add_force(
		"link",
		Box::new(LinkForce::new(links.to_vec(), count, params.link_distance)),
	);
	sim.add_force(
		"charge",
		Box::new(ManyBodyForce::new(
			params.charge_strength,
			params.charge_distance_min,
		)),
	);
	sim.add_force(
		"center",
		Box::new(CenterForce::new(cx, cy, params.center_strength)),
	);
	sim.add_force(
		"radial",
		Box::new(RadialForce::new(cx, cy, radii, params.radial_strength)),
	);
	sim.add_force(
		"collide",
		Box::new(CollideForce::new(
			params.collide_radius,
			params.collide_strength,
		)),
	);
	sim
}

/// Index lookup from node id; the first occurrence of an id wins.
pub fn index_by_id<'a>(ids: impl Iterator<Item = &'a str>) -> HashMap<&'a str, usize> {
	let mut map = HashMap::new();
	for (i, id) in ids.enumerate() {
		map.entry(id).or_insert(i);
	}
	map
}
