use std::f64::consts::PI;

use log::warn;
use web_sys::CanvasRenderingContext2d;

use super::geometry::ease_out_cubic;
use super::state::SkillsGraphState;
use super::types::SkillNode;

const BACKGROUND: &str = "#0a0a0a";
const GRID: &str = "rgba(58, 58, 58, 0.35)";
const EDGE: &str = "#3a3a3a";
/// Seconds a single node takes to scale in.
const NODE_INTRO_SECS: f64 = 0.4;

pub fn render(state: &SkillsGraphState, ctx: &CanvasRenderingContext2d) {
	let dpr = state.pixel_ratio;
	if let Err(err) = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
		warn!("canvas transform failed: {err:?}");
		return;
	}
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	draw_grid(state, ctx);
	if state.edges_visible {
		draw_edges(state, ctx);
	}
	draw_nodes(state, ctx);
}

fn draw_grid(state: &SkillsGraphState, ctx: &CanvasRenderingContext2d) {
	let step = state.config.grid_size;
	if step <= 0.0 {
		return;
	}
	ctx.set_stroke_style_str(GRID);
	ctx.set_line_width(1.0);
	ctx.begin_path();
	let mut x = 0.5;
	while x < state.width {
		ctx.move_to(x, 0.0);
		ctx.line_to(x, state.height);
		x += step;
	}
	let mut y = 0.5;
	while y < state.height {
		ctx.move_to(0.0, y);
		ctx.line_to(state.width, y);
		y += step;
	}
	ctx.stroke();
}

fn draw_edges(state: &SkillsGraphState, ctx: &CanvasRenderingContext2d) {
	let cfg = &state.config;
	ctx.set_stroke_style_str(EDGE);
	ctx.set_line_width(2.0);
	ctx.set_line_cap("round");
	ctx.set_shadow_color("rgba(58, 58, 58, 0.5)");
	ctx.set_shadow_blur(4.0);

	for (i, curve) in state.edge_curves() {
		let local_t = state.reveal_t - i as f64 * cfg.stagger_secs;
		let progress = (local_t / cfg.edge_draw_secs).clamp(0.0, 1.0);
		if progress <= 0.0 {
			continue;
		}
		let curve = curve.truncated(progress);
		ctx.set_global_alpha(0.6 * progress);
		ctx.begin_path();
		ctx.move_to(curve.start.x, curve.start.y);
		ctx.quadratic_curve_to(curve.control.x, curve.control.y, curve.end.x, curve.end.y);
		ctx.stroke();
	}

	ctx.set_global_alpha(1.0);
	ctx.set_shadow_blur(0.0);
	ctx.set_shadow_color("transparent");
}

fn draw_nodes(state: &SkillsGraphState, ctx: &CanvasRenderingContext2d) {
	// Dragged node last so it stays on top.
	let dragged = state.dragging();
	for (i, node) in state.nodes.iter().enumerate() {
		if dragged != Some(node.id.as_str()) {
			draw_node(state, ctx, i, node);
		}
	}
	if let Some((i, node)) = state
		.nodes
		.iter()
		.enumerate()
		.find(|(_, n)| dragged == Some(n.id.as_str()))
	{
		draw_node(state, ctx, i, node);
	}
}

fn draw_node(state: &SkillsGraphState, ctx: &CanvasRenderingContext2d, i: usize, node: &SkillNode) {
	let intro = ease_out_cubic(
		(state.intro_t - i as f64 * state.config.stagger_secs) / NODE_INTRO_SECS,
	);
	if intro <= 0.0 {
		return;
	}
	let (x, y) = (node.position.x, node.position.y);
	let radius = state.node_radius(node) * intro;
	let color = node.category.color();
	let is_dragged = state.is_dragging(&node.id);

	ctx.set_global_alpha(intro);

	if is_dragged {
		match ctx.create_radial_gradient(x, y, radius * 0.5, x, y, radius * 2.2) {
			Ok(gradient) => {
				let _ = gradient.add_color_stop(0.0, &format!("{color}80"));
				let _ = gradient.add_color_stop(1.0, &format!("{color}00"));
				ctx.begin_path();
				let _ = ctx.arc(x, y, radius * 2.2, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
			Err(err) => warn!("glow gradient failed: {err:?}"),
		}
	}

	ctx.set_shadow_color(&format!("{color}60"));
	ctx.set_shadow_blur(12.0);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(color);
	ctx.fill();
	ctx.set_shadow_blur(0.0);
	ctx.set_shadow_color("transparent");

	ctx.set_stroke_style_str(if is_dragged {
		"rgba(255, 255, 255, 0.6)"
	} else {
		"rgba(255, 255, 255, 0.2)"
	});
	ctx.set_line_width(2.0);
	ctx.stroke();

	ctx.set_fill_style_str("white");
	ctx.set_font("500 12px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&node.name, x, y + state.config.label_offset);

	ctx.set_global_alpha(1.0);
}
