use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::simulation::Simulation;
use super::state::{ForceGraphState, HighlightState};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
	from + (to - from) * t
}

pub fn render<S: Simulation>(state: &ForceGraphState<S>, ctx: &CanvasRenderingContext2d) {
	ctx.clear_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	draw_labels(state, ctx);
	ctx.restore();
}

fn draw_edges<S: Simulation>(state: &ForceGraphState<S>, ctx: &CanvasRenderingContext2d) {
	let style = &state.config.style;
	let active = state.has_active_highlight();
	let t = ease_out_cubic(state.hover.highlight_t);

	for (i, &(src, tgt)) in state.edges().iter().enumerate() {
		let ((x1, y1), (x2, y2)) = (state.position(src), state.position(tgt));

		// t=0: every edge at base style. t=1: incident edges accented, others faded.
		let (color, width, alpha) = if active && state.is_edge_visually_highlighted(i) {
			(
				if t > 0.5 { style.accent_color } else { style.edge_color },
				lerp(style.edge_width, style.edge_highlight_width, t),
				lerp(style.edge_opacity, style.edge_highlight_opacity, t),
			)
		} else if active {
			(
				style.edge_color,
				style.edge_width,
				lerp(style.edge_opacity, style.edge_dimmed_opacity, t),
			)
		} else {
			(style.edge_color, style.edge_width, style.edge_opacity)
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes<S: Simulation>(state: &ForceGraphState<S>, ctx: &CanvasRenderingContext2d) {
	let style = &state.config.style;
	let t = ease_out_cubic(state.hover.highlight_t);

	for idx in 0..state.nodes.len() {
		let (x, y) = state.position(idx);
		let (radius, alpha, color) = match state.visual_state(idx) {
			HighlightState::Hovered => (
				lerp(style.node_radius, style.hovered_radius, t),
				1.0,
				style.accent_color,
			),
			HighlightState::Dimmed => (style.node_radius, lerp(1.0, style.dimmed_opacity, t), style.node_color),
			HighlightState::Normal => (style.node_radius, 1.0, style.node_color),
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(style.node_color);
		ctx.fill();
		if color != style.node_color && t > 0.01 {
			// Accent fades in over the base fill.
			ctx.set_global_alpha(t);
			ctx.set_fill_style_str(color);
			ctx.fill();
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_labels<S: Simulation>(state: &ForceGraphState<S>, ctx: &CanvasRenderingContext2d) {
	let style = &state.config.style;
	let t = ease_out_cubic(state.hover.highlight_t);
	let zoom_alpha = state.zoom_label_opacity();

	ctx.set_font(&format!("{}px sans-serif", style.label_font_px));
	ctx.set_text_align("center");

	for (idx, info) in state.nodes.iter().enumerate() {
		let hovered = state.visual_state(idx) == HighlightState::Hovered;
		let alpha = if hovered {
			lerp(zoom_alpha, 1.0, t)
		} else {
			zoom_alpha
		};
		if alpha <= 0.01 {
			continue;
		}
		let (x, y) = state.position(idx);
		ctx.set_global_alpha(alpha);
		ctx.set_fill_style_str(if hovered && t > 0.5 {
			style.accent_color
		} else {
			style.label_color
		});
		let _ = ctx.fill_text(&info.name, x, y + style.label_offset);
	}
	ctx.set_global_alpha(1.0);
}
