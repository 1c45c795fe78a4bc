//! Per-frame particle motion.
//!
//! Velocities are measured in world units per reference frame (1/60 s), so a
//! `delta` of 1.0 advances each particle by exactly its damped velocity.
//! Forcing and damping are applied once per call; only the position update
//! scales with `delta`.

use glam::Vec3;

use super::config::NetworkConfig;
use super::field::Particle;

/// Seconds in one reference frame.
pub const REFERENCE_FRAME: f32 = 1.0 / 60.0;

/// Distances below this are treated as this when computing attraction.
const MIN_ATTRACTION_DISTANCE: f32 = 1e-4;

/// Constants used by [`integrate`], resolved from the config once at mount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
	pub damping: f32,
	pub restitution: f32,
	/// Radius of the containment sphere.
	pub limit: f32,
	pub attraction_strength: f32,
	pub attraction_max: f32,
}

impl MotionParams {
	pub fn from_config(config: &NetworkConfig) -> Self {
		Self {
			damping: config.motion.damping,
			restitution: config.motion.restitution,
			limit: config.boundary_radius(),
			attraction_strength: config.motion.attraction_strength,
			attraction_max: config.motion.attraction_max,
		}
	}
}

/// Ambient rotation of the whole field, as X/Y Euler angles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldRotation {
	pub x: f32,
	pub y: f32,
}

impl FieldRotation {
	pub fn advance(&mut self, seconds: f32, spin_x: f32, spin_y: f32) {
		self.y += spin_y * seconds;
		self.x += spin_x * seconds;
	}
}

/// Inverse-square pull toward `target`, clamped to `max`.
pub fn attraction(position: Vec3, target: Vec3, strength: f32, max: f32) -> Vec3 {
	let offset = target - position;
	let dist = offset.length().max(MIN_ATTRACTION_DISTANCE);
	let force = (strength / (dist * dist)).min(max);
	// Normalizing a zero offset yields zero rather than NaN.
	offset.normalize_or_zero() * force
}

/// Mirror `velocity` about the plane with unit `normal`.
pub fn reflect(velocity: Vec3, normal: Vec3) -> Vec3 {
	velocity - 2.0 * velocity.dot(normal) * normal
}

/// Advance every particle by one frame.
///
/// `pointer` is the attraction target in field space, present only while the
/// pointer hovers the widget. Particles that leave the containment sphere are
/// placed back on it and bounce inward with their velocity scaled by the
/// restitution factor.
pub fn integrate(
	particles: &mut [Particle],
	pointer: Option<Vec3>,
	params: &MotionParams,
	delta: f32,
) {
	for p in particles.iter_mut() {
		if let Some(target) = pointer {
			p.velocity += attraction(
				p.position,
				target,
				params.attraction_strength,
				params.attraction_max,
			);
		}

		p.velocity *= params.damping;
		p.position += p.velocity * delta;

		let dist = p.position.length();
		if dist > params.limit {
			let normal = p.position / dist;
			p.position = normal * params.limit;
			p.velocity = reflect(p.velocity, normal) * params.restitution;
		}
	}
}
