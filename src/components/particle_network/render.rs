//! Canvas rendering for the particle network.
//!
//! Acts as the drawing backend for the shared buffers: it consumes dirty
//! attributes, projects them through the camera and field transform, and draws
//! in two passes:
//! 1. Link segments (the draw-range prefix only), translucent
//! 2. Points as depth-attenuated discs, composited per the theme blend mode,
//!    with an optional shadow-blur glow

use std::f64::consts::TAU;

use glam::{Mat4, Vec3};
use web_sys::CanvasRenderingContext2d;

use super::camera::{Camera, ScreenPoint};
use super::geometry::{LineGeometry, PointGeometry};
use super::state::NetworkState;
use super::theme::{Color, Theme};

/// Points smaller than this many pixels are still drawn at this radius.
const MIN_POINT_RADIUS: f64 = 0.5;

/// Renders one frame of the network to the canvas.
///
/// `pixel_ratio` scales from CSS pixels (the state's width/height) to the
/// canvas backing store.
pub fn render(
	state: &mut NetworkState,
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	pixel_ratio: f64,
) {
	let (width, height) = (state.width * pixel_ratio, state.height * pixel_ratio);
	let mvp = state.camera.view_projection() * state.field_matrix();
	let field_scale = state.config.field_scale as f64;

	draw_background(ctx, theme, width, height);

	let Some(buffers) = state.buffers_mut() else {
		return;
	};

	draw_lines(ctx, theme, &buffers.lines, &mvp, width, height, pixel_ratio);
	draw_points(
		ctx,
		theme,
		&buffers.points,
		&mvp,
		width,
		height,
		field_scale,
		pixel_ratio,
	);

	buffers.points.position.needs_update = false;
	buffers.points.color.needs_update = false;
	buffers.lines.position.needs_update = false;
}

fn draw_background(ctx: &CanvasRenderingContext2d, theme: &Theme, width: f64, height: f64) {
	let _ = ctx.set_global_composite_operation("source-over");
	match theme.background {
		Some(color) => {
			ctx.set_fill_style_str(&color.to_css());
			ctx.fill_rect(0.0, 0.0, width, height);
		}
		None => ctx.clear_rect(0.0, 0.0, width, height),
	}
}

fn draw_lines(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	lines: &LineGeometry,
	mvp: &Mat4,
	width: f64,
	height: f64,
	pixel_ratio: f64,
) {
	if lines.segment_count() == 0 || theme.line_opacity <= 0.0 {
		return;
	}

	ctx.set_stroke_style_str(&theme.line_color.with_alpha(theme.line_opacity).to_css());
	ctx.set_line_width(theme.line_width * pixel_ratio);

	// One path for all segments keeps overlapping links from stacking alpha.
	ctx.begin_path();
	for (a, b) in lines.segments() {
		if let (Some(pa), Some(pb)) = (
			Camera::project_with(mvp, a, width, height),
			Camera::project_with(mvp, b, width, height),
		) {
			ctx.move_to(pa.x, pa.y);
			ctx.line_to(pb.x, pb.y);
		}
	}
	ctx.stroke();
}

/// Pixel radius of a point of world diameter `size` seen at `depth`.
///
/// Matches perspective point-size attenuation: `size * (height / 2) / depth`
/// pixels across.
pub fn point_radius(size: f64, field_scale: f64, height: f64, point: &ScreenPoint) -> f64 {
	let diameter = size * field_scale * (height * 0.5) / point.depth.max(f64::EPSILON);
	(diameter * 0.5).max(MIN_POINT_RADIUS)
}

fn draw_points(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	points: &PointGeometry,
	mvp: &Mat4,
	width: f64,
	height: f64,
	field_scale: f64,
	pixel_ratio: f64,
) {
	let _ = ctx.set_global_composite_operation(theme.blend.composite_operation());
	let glow = theme.point_glow * pixel_ratio;
	ctx.set_shadow_blur(glow);

	for i in 0..points.len() {
		let Some(p) = Camera::project_with(mvp, points.position.get(i), width, height) else {
			continue;
		};
		let color: Vec3 = points.color.get(i);
		let css = Color::css_from_vec3(color, theme.point_opacity);
		if glow > 0.0 {
			ctx.set_shadow_color(&css);
		}
		ctx.set_fill_style_str(&css);

		ctx.begin_path();
		let _ = ctx.arc(
			p.x,
			p.y,
			point_radius(theme.point_size, field_scale, height, &p),
			0.0,
			TAU,
		);
		ctx.fill();
	}

	ctx.set_shadow_blur(0.0);
	let _ = ctx.set_global_composite_operation("source-over");
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn point_radius_shrinks_with_depth() {
		let near = ScreenPoint {
			x: 0.0,
			y: 0.0,
			depth: 10.0,
		};
		let far = ScreenPoint { depth: 20.0, ..near };
		let r_near = point_radius(0.06, 1.2, 600.0, &near);
		let r_far = point_radius(0.06, 1.2, 600.0, &far);
		assert!((r_near - 0.06 * 1.2 * 300.0 / 10.0 / 2.0).abs() < 1e-9);
		assert!(r_far < r_near);
	}

	#[test]
	fn tiny_points_stay_visible() {
		let distant = ScreenPoint {
			x: 0.0,
			y: 0.0,
			depth: 1e6,
		};
		assert_eq!(point_radius(0.06, 1.0, 600.0, &distant), MIN_POINT_RADIUS);
	}
}
