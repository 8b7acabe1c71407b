//! Canvas rendering for the author graph.
//!
//! Passes, back to front:
//! 1. Background and dot grid (screen space)
//! 2. Edges with arrowheads and labels (world space)
//! 3. Node boxes, hovered neighbourhood on top (world space)
//! 4. Minimap overlay (screen space)

use std::f64::consts::PI;

use force_graph::Node;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::{NODE_HEIGHT, NODE_WIDTH};
use super::scale::{ScaleConfig, ScaledValues};
use super::state::{GraphScene, NodeInfo};
use super::theme::Theme;
use super::types::Bounds;

fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Distance from a box centre to its border along the unit direction `(ux, uy)`.
fn box_exit(ux: f64, uy: f64) -> f64 {
	let (hw, hh) = (NODE_WIDTH / 2.0, NODE_HEIGHT / 2.0);
	let tx = if ux.abs() > 1e-9 { hw / ux.abs() } else { f64::INFINITY };
	let ty = if uy.abs() > 1e-9 { hh / uy.abs() } else { f64::INFINITY };
	tx.min(ty)
}

/// Renders the complete graph to the canvas.
pub fn render(scene: &GraphScene, ctx: &CanvasRenderingContext2d, config: &ScaleConfig, theme: &Theme) {
	let scale = ScaledValues::new(config, scene.transform.k);

	draw_background(scene, ctx, theme);

	ctx.save();
	let _ = ctx.translate(scene.transform.x, scene.transform.y);
	let _ = ctx.scale(scene.transform.k, scene.transform.k);

	draw_edges(scene, ctx, config, &scale, theme);
	draw_nodes(scene, ctx, &scale, theme);

	ctx.restore();

	draw_minimap(scene, ctx, theme);
}

fn draw_background(scene: &GraphScene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	ctx.set_fill_style_str(&theme.background.color.to_css());
	ctx.fill_rect(0.0, 0.0, scene.width, scene.height);

	let spacing = theme.background.grid_spacing * scene.transform.k;
	if spacing < 6.0 {
		return;
	}
	ctx.set_fill_style_str(&theme.background.grid_color.to_css());
	let start_x = scene.transform.x.rem_euclid(spacing);
	let start_y = scene.transform.y.rem_euclid(spacing);
	let mut y = start_y;
	while y < scene.height {
		let mut x = start_x;
		while x < scene.width {
			ctx.fill_rect(x - 0.5, y - 0.5, 1.0, 1.0);
			x += spacing;
		}
		y += spacing;
	}
}

fn draw_edges(
	scene: &GraphScene,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let dash_offset = scale.dash_offset(scene.flow_time, config.edge.flow_speed);
	let dash = js_sys::Array::of2(
		&JsValue::from_f64(config.edge.dash_pattern.0),
		&JsValue::from_f64(config.edge.dash_pattern.1),
	);
	let max_t = smooth_step(scene.highlight.max_intensity());

	for edge in &scene.edges {
		let (Some(n1), Some(n2)) = (scene.node(edge.source), scene.node(edge.target)) else {
			continue;
		};
		let edge_t = smooth_step(scene.highlight.edge_intensity(edge.source, edge.target));
		let alpha = if edge_t > 0.01 {
			0.85 + 0.15 * edge_t
		} else {
			0.85 - 0.6 * max_t
		};

		let color = theme.edge_color(edge.edge.kind).with_alpha(alpha);
		ctx.set_stroke_style_str(&color.to_css());
		ctx.set_fill_style_str(&color.to_css());
		ctx.set_line_width(scale.edge_line_width);
		if edge.edge.animated() {
			let _ = ctx.set_line_dash(&dash);
			ctx.set_line_dash_offset(dash_offset);
		} else {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		let from = (n1.x() as f64, n1.y() as f64);
		if edge.edge.is_self_loop() {
			draw_self_loop(ctx, scale, from);
		} else {
			draw_edge(ctx, scale, from, (n2.x() as f64, n2.y() as f64));
		}
	}

	let _ = ctx.set_line_dash(&js_sys::Array::new());

	if scale.label_alpha > 0.01 {
		for edge in &scene.edges {
			let (Some(n1), Some(n2)) = (scene.node(edge.source), scene.node(edge.target)) else {
				continue;
			};
			let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
			let anchor = if edge.edge.is_self_loop() {
				self_loop_label_anchor(x1, y1)
			} else {
				((x1 + x2) / 2.0, (y1 + y2) / 2.0)
			};
			draw_edge_label(ctx, scale, theme, anchor, edge.edge.label());
		}
	}
}

/// Straight edge from box border to box border, ending in an arrowhead.
/// Stroke and fill styles are set by the caller.
fn draw_edge(ctx: &CanvasRenderingContext2d, scale: &ScaledValues, from: (f64, f64), to: (f64, f64)) {
	let ((x1, y1), (x2, y2)) = (from, to);
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = dx.hypot(dy);
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let exit = box_exit(ux, uy);
	if dist <= 2.0 * exit {
		// Overlapping boxes, nothing visible to draw.
		return;
	}

	let (start_x, start_y) = (x1 + ux * exit, y1 + uy * exit);
	let (tip_x, tip_y) = (x2 - ux * exit, y2 - uy * exit);
	let back = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);

	ctx.begin_path();
	ctx.move_to(start_x, start_y);
	ctx.line_to(back.0, back.1);
	ctx.stroke();

	draw_arrowhead(ctx, scale, (tip_x, tip_y), (ux, uy));
}

/// Loop around the top-right corner of the box centred at `centre`, leaving
/// through the top edge and re-entering through the right edge.
fn draw_self_loop(ctx: &CanvasRenderingContext2d, scale: &ScaledValues, centre: (f64, f64)) {
	let SelfLoop {
		cx,
		cy,
		radius,
		start,
		end,
	} = SelfLoop::at(centre.0, centre.1);
	let (tip_x, tip_y) = (cx + radius * end.cos(), cy + radius * end.sin());
	// Tangent of a clockwise (increasing angle) arc at the end point.
	let (ux, uy) = (-end.sin(), end.cos());
	let trimmed = end - (scale.arrow_size / radius).min(end - start);

	ctx.begin_path();
	let _ = ctx.arc(cx, cy, radius, start, trimmed);
	ctx.stroke();

	draw_arrowhead(ctx, scale, (tip_x, tip_y), (ux, uy));
}

/// Filled arrowhead with its tip at `tip`, pointing along the unit vector `dir`.
fn draw_arrowhead(ctx: &CanvasRenderingContext2d, scale: &ScaledValues, tip: (f64, f64), dir: (f64, f64)) {
	let ((tip_x, tip_y), (ux, uy)) = (tip, dir);
	let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
	let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	(mx, my): (f64, f64),
	label: &str,
) {
	ctx.set_global_alpha(scale.label_alpha);
	ctx.set_font(&scale.label_font);
	let width = ctx
		.measure_text(label)
		.map(|metrics| metrics.width())
		.unwrap_or(label.len() as f64 * 6.0);
	let (pad_x, box_h) = (4.0, 16.0);

	ctx.set_fill_style_str(&theme.edge.label_background.to_css());
	ctx.fill_rect(mx - width / 2.0 - pad_x, my - box_h / 2.0, width + 2.0 * pad_x, box_h);

	ctx.set_fill_style_str(&theme.edge.label.to_css());
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, mx, my);
	ctx.set_global_alpha(1.0);
}

/// Circle arc used for an edge from a node to itself.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SelfLoop {
	cx: f64,
	cy: f64,
	radius: f64,
	/// Canvas angles (radians, clockwise from +x) of the visible part.
	start: f64,
	end: f64,
}

impl SelfLoop {
	const RADIUS: f64 = 18.0;

	/// Loop for the box centred at `(x, y)`: a circle on its top-right corner,
	/// drawn over the three quarters outside the box.
	fn at(x: f64, y: f64) -> Self {
		Self {
			cx: x + NODE_WIDTH / 2.0,
			cy: y - NODE_HEIGHT / 2.0,
			radius: Self::RADIUS,
			start: PI,
			end: 2.5 * PI,
		}
	}
}

fn self_loop_label_anchor(x: f64, y: f64) -> (f64, f64) {
	let lp = SelfLoop::at(x, y);
	(lp.cx, lp.cy - lp.radius - 10.0)
}

fn draw_nodes(scene: &GraphScene, ctx: &CanvasRenderingContext2d, scale: &ScaledValues, theme: &Theme) {
	let max_t = smooth_step(scene.highlight.max_intensity());
	let dim_alpha = 1.0 - 0.5 * max_t;

	// Pass 1: nodes outside the hovered neighbourhood
	scene.graph.visit_nodes(|node| {
		if scene.highlight.node_intensity(node.index()) > 0.001 {
			return;
		}
		draw_node(ctx, node, scale, theme, dim_alpha, false);
	});

	// Pass 2: highlighted nodes on top
	scene.graph.visit_nodes(|node| {
		let idx = node.index();
		let node_t = smooth_step(scene.highlight.node_intensity(idx));
		if node_t <= 0.001 {
			return;
		}
		let alpha = dim_alpha + (1.0 - dim_alpha) * node_t;
		let hovered = scene.highlight.hovered_node == Some(idx);
		draw_node(ctx, node, scale, theme, alpha, hovered);
	});

	ctx.set_global_alpha(1.0);
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	let r = r.min(w / 2.0).min(h / 2.0);
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	hovered: bool,
) {
	let info = &node.data.user_data;
	let (cx, cy) = (node.x() as f64, node.y() as f64);
	let (left, top) = (cx - NODE_WIDTH / 2.0, cy - NODE_HEIGHT / 2.0);
	let colors = theme.node_colors(info.node_type);

	ctx.set_global_alpha(alpha);

	rounded_rect(ctx, left, top, NODE_WIDTH, NODE_HEIGHT, theme.node.corner_radius);
	ctx.set_fill_style_str(&colors.fill.to_css());
	ctx.fill();
	let border = if hovered {
		theme.node.border_width + scale.hover_border
	} else {
		theme.node.border_width
	};
	ctx.set_stroke_style_str(&colors.border.to_css());
	ctx.set_line_width(border);
	ctx.stroke();

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	let line_height = 16.0;
	let lines = info.title.len() as f64 + if info.year.is_some() { 1.0 } else { 0.0 };
	let mut y = cy - (lines - 1.0) * line_height / 2.0;

	ctx.set_font(&scale.title_font);
	ctx.set_fill_style_str(&theme.node.title_color.to_css());
	for line in &info.title {
		let _ = ctx.fill_text(line, cx, y);
		y += line_height;
	}

	if let Some(year) = &info.year {
		ctx.set_font(&scale.year_font);
		ctx.set_fill_style_str(&theme.node.year_color.to_css());
		let _ = ctx.fill_text(year, cx, y);
	}
}

/// Maps world coordinates into the minimap rectangle (screen space).
#[derive(Clone, Copy, Debug, PartialEq)]
struct MinimapProjection {
	left: f64,
	top: f64,
	scale: f64,
	offset_x: f64,
	offset_y: f64,
}

impl MinimapProjection {
	/// Fit `world` into a `width` x `height` box at `(left, top)`.
	fn new(world: Bounds, left: f64, top: f64, width: f64, height: f64) -> Self {
		let pad = 8.0;
		let scale = ((width - 2.0 * pad) / world.width().max(1.0))
			.min((height - 2.0 * pad) / world.height().max(1.0));
		let (cx, cy) = world.center();
		Self {
			left,
			top,
			scale,
			offset_x: width / 2.0 - cx * scale,
			offset_y: height / 2.0 - cy * scale,
		}
	}

	fn project(&self, x: f64, y: f64) -> (f64, f64) {
		(
			self.left + self.offset_x + x * self.scale,
			self.top + self.offset_y + y * self.scale,
		)
	}
}

fn draw_minimap(scene: &GraphScene, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let style = &theme.minimap;
	let Some(graph_bounds) = scene.bounds() else {
		return;
	};
	if scene.width < style.width * 2.0 || scene.height < style.height * 2.0 {
		return;
	}
	let (left, top) = (
		scene.width - style.width - style.margin,
		scene.height - style.height - style.margin,
	);

	let (vx0, vy0) = scene.screen_to_graph(0.0, 0.0);
	let (vx1, vy1) = scene.screen_to_graph(scene.width, scene.height);
	let world = Bounds {
		min_x: graph_bounds.min_x.min(vx0),
		min_y: graph_bounds.min_y.min(vy0),
		max_x: graph_bounds.max_x.max(vx1),
		max_y: graph_bounds.max_y.max(vy1),
	};
	let projection = MinimapProjection::new(world, left, top, style.width, style.height);

	ctx.set_fill_style_str(&style.background.to_css());
	ctx.fill_rect(left, top, style.width, style.height);
	ctx.set_stroke_style_str(&style.border.to_css());
	ctx.set_line_width(1.0);
	ctx.stroke_rect(left, top, style.width, style.height);

	ctx.save();
	ctx.begin_path();
	ctx.rect(left, top, style.width, style.height);
	ctx.clip();

	let (node_w, node_h) = (NODE_WIDTH * projection.scale, NODE_HEIGHT * projection.scale);
	scene.graph.visit_nodes(|node| {
		let (x, y) = projection.project(node.x() as f64, node.y() as f64);
		let colors = theme.node_colors(node.data.user_data.node_type);
		ctx.set_fill_style_str(&colors.minimap.to_css());
		ctx.fill_rect(x - node_w / 2.0, y - node_h / 2.0, node_w, node_h);
	});

	let (x0, y0) = projection.project(vx0, vy0);
	let (x1, y1) = projection.project(vx1, vy1);
	ctx.set_fill_style_str(&style.viewport.to_css());
	ctx.fill_rect(x0, y0, x1 - x0, y1 - y0);
	ctx.set_stroke_style_str(&style.viewport.with_alpha(0.5).to_css());
	ctx.stroke_rect(x0, y0, x1 - x0, y1 - y0);

	ctx.restore();
}
