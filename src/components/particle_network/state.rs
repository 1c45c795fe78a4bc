//! Widget state: the particle field, its buffers, and pointer tracking.
//!
//! One [`NetworkState`] is created when the component mounts and is mutated by
//! the animation loop and the pointer handlers. The field transform
//! (rotation and uniform scale) lives here too, since pointer targets have to
//! be brought into field space before the integrator can use them.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use log::debug;
use rand::Rng;

use super::camera::Camera;
use super::config::NetworkConfig;
use super::field::{Particle, generate_field, gradient_color};
use super::geometry::{LineGeometry, PointGeometry};
use super::integrator::{FieldRotation, MotionParams, REFERENCE_FRAME, integrate};
use super::linker::{LinkParams, build_links};
use super::theme::GradientPalette;

/// Hover flag and last known pointer position in field space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
	pub hovering: bool,
	pub target: Vec3,
}

impl PointerState {
	/// Attraction target for the integrator, present only while hovering.
	pub fn active_target(&self) -> Option<Vec3> {
		self.hovering.then_some(self.target)
	}
}

/// GPU-style buffers the renderer reads from. Allocated once at mount.
#[derive(Clone, Debug, Default)]
pub struct Buffers {
	pub points: PointGeometry,
	pub lines: LineGeometry,
}

/// Everything one mounted widget owns.
pub struct NetworkState {
	pub config: NetworkConfig,
	pub particles: Vec<Particle>,
	pub pointer: PointerState,
	pub rotation: FieldRotation,
	pub camera: Camera,
	pub width: f64,
	pub height: f64,
	/// `None` until [`NetworkState::allocate_buffers`] runs.
	buffers: Option<Buffers>,
	motion: MotionParams,
	links: LinkParams,
	link_count: usize,
}

impl NetworkState {
	pub fn new<R: Rng + ?Sized>(
		config: NetworkConfig,
		palette: &GradientPalette,
		width: f64,
		height: f64,
		rng: &mut R,
	) -> Self {
		let particles = generate_field(&config, palette, rng);
		debug!(
			"particle-network: generated {} particles in radius {}",
			particles.len(),
			config.radius
		);
		Self {
			camera: Camera::new(&config.camera, width, height),
			motion: MotionParams::from_config(&config),
			links: LinkParams::from_config(&config),
			particles,
			pointer: PointerState::default(),
			rotation: FieldRotation::default(),
			width,
			height,
			buffers: None,
			link_count: 0,
			config,
		}
	}

	/// Allocate the point and line buffers and fill them with the initial field.
	pub fn allocate_buffers(&mut self) {
		let mut points = PointGeometry::allocate(self.particles.len());
		points.write_positions(&self.particles);
		points.write_colors(&self.particles);
		self.buffers = Some(Buffers {
			points,
			lines: LineGeometry::allocate(self.config.link_capacity()),
		});
	}

	pub fn is_ready(&self) -> bool {
		self.buffers.is_some()
	}

	pub fn buffers(&self) -> Option<&Buffers> {
		self.buffers.as_ref()
	}

	pub fn buffers_mut(&mut self) -> Option<&mut Buffers> {
		self.buffers.as_mut()
	}

	/// Links recorded by the most recent frame.
	pub fn link_count(&self) -> usize {
		self.link_count
	}

	/// Model matrix of the field group: rotation then uniform scale.
	pub fn field_matrix(&self) -> Mat4 {
		Mat4::from_scale_rotation_translation(
			Vec3::splat(self.config.field_scale),
			Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0),
			Vec3::ZERO,
		)
	}

	/// Run one frame of `seconds` elapsed time.
	///
	/// Returns `false` without touching anything if the buffers have not been
	/// allocated yet.
	pub fn tick(&mut self, seconds: f32) -> bool {
		let Some(buffers) = self.buffers.as_mut() else {
			return false;
		};
		let motion = &self.config.motion;

		self.rotation.advance(seconds, motion.spin_x, motion.spin_y);
		self.camera.orbit(seconds);

		integrate(
			&mut self.particles,
			self.pointer.active_target(),
			&self.motion,
			seconds / REFERENCE_FRAME,
		);
		buffers.points.write_positions(&self.particles);

		self.link_count = build_links(&self.particles, &self.links, &mut buffers.lines);
		true
	}

	pub fn pointer_enter(&mut self) {
		self.pointer.hovering = true;
	}

	pub fn pointer_leave(&mut self) {
		self.pointer.hovering = false;
	}

	/// Update the attraction target from a pointer at `(x, y)` pixels inside the canvas.
	///
	/// Ignored unless the pointer is hovering.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if !self.pointer.hovering {
			return;
		}
		if let Some(ndc) = super::camera::pointer_ndc(x, y, self.width, self.height) {
			self.pointer.target = self.field_point_under(ndc);
		}
	}

	/// Field-space point under the pointer at `ndc`.
	pub fn field_point_under(&self, ndc: Vec2) -> Vec3 {
		let world = self.camera.pointer_target(ndc);
		self.field_matrix().inverse().transform_point3(world)
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.camera.resize(width, height);
	}

	/// Re-tint the existing particles with a new palette, keeping their identity.
	pub fn recolor(&mut self, palette: &GradientPalette) {
		let count = self.particles.len();
		for (i, p) in self.particles.iter_mut().enumerate() {
			p.color = gradient_color(palette, i, count);
		}
		if let Some(buffers) = self.buffers.as_mut() {
			buffers.points.write_colors(&self.particles);
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn state(config: NetworkConfig) -> NetworkState {
		let mut rng = SmallRng::seed_from_u64(1);
		NetworkState::new(config, &GradientPalette::neural(), 800.0, 600.0, &mut rng)
	}

	#[test]
	fn tick_is_refused_before_buffers_exist() {
		let mut state = state(NetworkConfig::default());
		let before = state.particles.clone();
		assert!(!state.is_ready());
		assert!(!state.tick(REFERENCE_FRAME));
		assert_eq!(state.particles, before);
		assert_eq!(state.rotation, FieldRotation::default());

		state.allocate_buffers();
		assert!(state.tick(REFERENCE_FRAME));
	}

	#[test]
	fn frames_respect_boundary_and_link_bounds() {
		let config = NetworkConfig::default();
		let limit = config.boundary_radius();
		let link_cap = config.link_capacity();
		let mut state = state(config);
		state.allocate_buffers();
		state.pointer_enter();
		state.pointer.target = Vec3::new(30.0, 0.0, 0.0);

		for _ in 0..300 {
			assert!(state.tick(REFERENCE_FRAME));
			for p in &state.particles {
				assert!(p.position.length() <= limit + 1e-3);
			}
			let buffers = state.buffers().unwrap();
			assert!(state.link_count() <= link_cap);
			assert!(state.link_count() <= buffers.lines.position.vertex_capacity() / 2);
			assert_eq!(buffers.lines.draw_range, state.link_count() * 2);
		}
	}

	#[test]
	fn tick_writes_positions_into_existing_buffer() {
		let mut state = state(NetworkConfig::default());
		state.allocate_buffers();
		let ptr = state.buffers().unwrap().points.position.array.as_ptr();
		state.buffers_mut().unwrap().points.position.needs_update = false;

		state.tick(REFERENCE_FRAME);
		let points = &state.buffers().unwrap().points;
		assert_eq!(points.position.array.as_ptr(), ptr);
		assert!(points.position.needs_update);
		assert_eq!(points.position.get(7), state.particles[7].position);
	}

	#[test]
	fn pointer_moves_only_count_while_hovering() {
		let mut state = state(NetworkConfig::default());
		state.pointer_move(100.0, 100.0);
		assert_eq!(state.pointer, PointerState::default());

		state.pointer_enter();
		state.pointer_move(400.0, 300.0);
		assert!(state.pointer.hovering);
		assert!(state.pointer.target.length() < 1e-3);

		state.pointer_move(0.0, 0.0);
		let corner = state.pointer.target;
		assert!(corner.x < 0.0 && corner.y > 0.0);

		state.pointer_leave();
		state.pointer_move(400.0, 300.0);
		assert_eq!(state.pointer.target, corner);
		assert_eq!(state.pointer.active_target(), None);
	}

	#[test]
	fn pointer_target_is_in_field_space() {
		let mut state = state(NetworkConfig::default());
		state.rotation.y = std::f32::consts::FRAC_PI_2;
		let ndc = Vec2::new(0.5, 0.0);
		let local = state.field_point_under(ndc);
		let world = state.camera.pointer_target(ndc);
		let back = state.field_matrix().transform_point3(local);
		assert!((back - world).length() < 1e-3);
		// Scale 1.2 shrinks world distances in field space.
		assert!((local.length() * 1.2 - world.length()).abs() < 1e-3);
	}

	#[test]
	fn recolor_keeps_particles_and_rewrites_colors() {
		let mut state = state(NetworkConfig::default());
		state.allocate_buffers();
		let positions: Vec<_> = state.particles.iter().map(|p| p.position).collect();

		let light = GradientPalette::neural_light();
		state.recolor(&light);
		assert_eq!(state.particles[0].color, light.sample(0.0));
		assert_eq!(state.buffers().unwrap().points.color.get(0), light.sample(0.0));
		let after: Vec<_> = state.particles.iter().map(|p| p.position).collect();
		assert_eq!(positions, after);
	}

	#[test]
	fn empty_field_is_inert() {
		let config = NetworkConfig {
			count: 0,
			..NetworkConfig::default()
		};
		let mut state = state(config);
		state.allocate_buffers();
		assert!(state.tick(REFERENCE_FRAME));
		assert_eq!(state.link_count(), 0);
		assert!(state.buffers().unwrap().points.is_empty());
	}
}
