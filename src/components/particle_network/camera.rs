//! Perspective camera for viewing the field.
//!
//! The camera orbits the origin at a fixed distance and height 0. Matrices use
//! OpenGL clip conventions (NDC depth in `-1..1`). The pointer is unprojected
//! onto the plane through the field center facing the camera, so the pointer
//! target always sits among the particles rather than just in front of the lens.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use super::config::CameraConfig;

/// A point projected to canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
	pub x: f64,
	pub y: f64,
	/// Distance along the view direction, used for size attenuation.
	pub depth: f64,
}

/// Orbiting perspective camera.
#[derive(Clone, Debug)]
pub struct Camera {
	pub fov_y: f32,
	pub distance: f32,
	/// Orbit angle around the Y axis in radians.
	pub yaw: f32,
	pub near: f32,
	pub far: f32,
	/// Viewport width / height.
	pub aspect: f32,
	/// Orbit rate in the unit of [`CameraConfig::auto_rotate_speed`].
	pub auto_rotate_speed: f32,
}

impl Camera {
	pub fn new(config: &CameraConfig, width: f64, height: f64) -> Self {
		let mut camera = Self {
			fov_y: config.fov_degrees.to_radians(),
			distance: config.distance,
			yaw: 0.0,
			near: config.near,
			far: config.far,
			aspect: 1.0,
			auto_rotate_speed: config.auto_rotate_speed,
		};
		camera.resize(width, height);
		camera
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.aspect = if width > 0.0 && height > 0.0 {
			(width / height) as f32
		} else {
			1.0
		};
	}

	/// Advance the auto-orbit. At speed 1.0 the camera turns once per minute.
	pub fn orbit(&mut self, seconds: f32) {
		self.yaw += std::f32::consts::TAU / 60.0 * self.auto_rotate_speed * seconds;
	}

	pub fn position(&self) -> Vec3 {
		Vec3::new(
			self.distance * self.yaw.sin(),
			0.0,
			self.distance * self.yaw.cos(),
		)
	}

	pub fn view_matrix(&self) -> Mat4 {
		Mat4::look_at_rh(self.position(), Vec3::ZERO, Vec3::Y)
	}

	pub fn projection_matrix(&self) -> Mat4 {
		Mat4::perspective_rh_gl(self.fov_y, self.aspect, self.near, self.far)
	}

	pub fn view_projection(&self) -> Mat4 {
		self.projection_matrix() * self.view_matrix()
	}

	/// World-space point under normalized device coordinates at NDC depth `z`.
	pub fn unproject(&self, ndc: Vec2, z: f32) -> Vec3 {
		self.view_projection()
			.inverse()
			.project_point3(ndc.extend(z))
	}

	/// Where the ray through `ndc` crosses the plane through the origin facing the camera.
	pub fn pointer_target(&self, ndc: Vec2) -> Vec3 {
		let near = self.unproject(ndc, -1.0);
		let far = self.unproject(ndc, 1.0);
		let dir = far - near;
		let normal = self.position().normalize_or_zero();
		let along = dir.dot(normal);
		if along.abs() <= f32::EPSILON {
			return near;
		}
		near + dir * (-near.dot(normal) / along)
	}

	/// Project a point through `mvp` to canvas pixels. `None` if it is behind the camera.
	pub fn project_with(mvp: &Mat4, point: Vec3, width: f64, height: f64) -> Option<ScreenPoint> {
		let clip = *mvp * point.extend(1.0);
		if clip.w <= f32::EPSILON {
			return None;
		}
		let ndc = clip.xyz() / clip.w;
		Some(ScreenPoint {
			x: (ndc.x as f64 + 1.0) * 0.5 * width,
			y: (1.0 - ndc.y as f64) * 0.5 * height,
			depth: clip.w as f64,
		})
	}
}

/// Normalized device coordinates for a pointer at `(x, y)` relative to a box of `width × height`.
///
/// The top-left corner maps to `(-1, 1)` and the bottom-right to `(1, -1)`.
pub fn pointer_ndc(x: f64, y: f64, width: f64, height: f64) -> Option<Vec2> {
	if width <= 0.0 || height <= 0.0 {
		return None;
	}
	Some(Vec2::new(
		((x / width) * 2.0 - 1.0) as f32,
		(-(y / height) * 2.0 + 1.0) as f32,
	))
}
