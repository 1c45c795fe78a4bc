//! Tunable parameters for the particle network.
//!
//! Every field has a documented default, and the whole record deserializes
//! from partial JSON so a host page only needs to name what it overrides.
//! Values are passed through [`NetworkConfig::sanitized`] before use, which
//! replaces out-of-range numbers instead of failing.

use log::warn;
use serde::Deserialize;

/// Motion constants for the per-frame integrator.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct MotionConfig {
	/// Velocity multiplier applied every frame. Must stay below 1.0.
	pub damping: f32,
	/// Fraction of velocity kept after bouncing off the boundary sphere.
	pub restitution: f32,
	/// Boundary radius as a multiple of the field radius.
	pub boundary_factor: f32,
	/// Numerator of the inverse-square pointer attraction.
	pub attraction_strength: f32,
	/// Upper bound on the attraction added in a single frame.
	pub attraction_max: f32,
	/// Ambient rotation of the field around X, radians per second.
	pub spin_x: f32,
	/// Ambient rotation of the field around Y, radians per second.
	pub spin_y: f32,
	/// Spread of initial velocity components (each in `±initial_speed / 2`).
	pub initial_speed: f32,
	/// Exponent applied to the uniform radial sample. Above 1 biases toward the center.
	pub radial_bias: f32,
}

impl Default for MotionConfig {
	fn default() -> Self {
		Self {
			damping: 0.985,
			restitution: 0.7,
			boundary_factor: 1.4,
			attraction_strength: 0.002,
			attraction_max: 0.002,
			spin_x: 0.02,
			spin_y: 0.08,
			initial_speed: 0.003,
			radial_bias: 1.5,
		}
	}
}

/// Perspective camera settings.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
	/// Vertical field of view in degrees.
	pub fov_degrees: f32,
	/// Distance from the camera to the field center.
	pub distance: f32,
	/// Slow orbit of the camera around the field (0 disables it).
	/// Same unit as a typical orbit control: 1.0 is one turn per minute at 60 fps.
	pub auto_rotate_speed: f32,
	pub near: f32,
	pub far: f32,
	/// Upper bound for the device pixel ratio used to size the canvas backing store.
	pub max_pixel_ratio: f64,
}

impl Default for CameraConfig {
	fn default() -> Self {
		Self {
			fov_degrees: 65.0,
			distance: 20.0,
			auto_rotate_speed: 0.25,
			near: 0.1,
			far: 2000.0,
			max_pixel_ratio: 2.0,
		}
	}
}

/// Complete widget configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
	/// Number of particles. Fixed for the lifetime of a widget instance.
	pub count: usize,
	/// Radius of the sphere the field is generated in.
	pub radius: f32,
	/// Two particles closer than this (inclusive) are linked.
	pub link_distance: f32,
	/// Maximum links recorded starting from one particle.
	pub max_links_per_node: usize,
	/// Maximum number of later particles examined per particle. `None` scans to the end.
	pub link_scan_window: Option<usize>,
	/// Above this population the linker only examines every other candidate.
	pub link_stride_threshold: usize,
	/// Uniform scale of the whole field group.
	pub field_scale: f32,
	/// Glow radius around points in CSS pixels, dark theme only. 0 disables it.
	pub point_glow: f64,
	pub motion: MotionConfig,
	pub camera: CameraConfig,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			count: 280,
			radius: 10.0,
			link_distance: 1.6,
			max_links_per_node: 6,
			link_scan_window: None,
			link_stride_threshold: 1200,
			field_scale: 1.2,
			point_glow: 0.0,
			motion: MotionConfig::default(),
			camera: CameraConfig::default(),
		}
	}
}

/// Largest particle population accepted from a config.
pub const MAX_COUNT: usize = 20_000;

/// Largest per-particle link cap accepted from a config.
pub const MAX_LINKS_PER_NODE: usize = 64;

/// Cap `value` at `max`, logging when it had to be lowered.
fn capped(name: &str, value: usize, max: usize) -> usize {
	if value > max {
		warn!("particle-network: {name} = {value} exceeds {max}, using {max}");
		max
	} else {
		value
	}
}

/// Replace a non-finite or out-of-range value with `fallback`, logging what was replaced.
fn checked(name: &str, value: f32, fallback: f32, valid: impl Fn(f32) -> bool) -> f32 {
	if value.is_finite() && valid(value) {
		value
	} else {
		warn!("particle-network: invalid {name} = {value}, using {fallback}");
		fallback
	}
}

impl NetworkConfig {
	/// Parse a (possibly partial) JSON config.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str::<Self>(json).map(Self::sanitized)
	}

	/// Capacity of the link buffer, in segments.
	pub fn link_capacity(&self) -> usize {
		self.count.saturating_mul(self.max_links_per_node)
	}

	/// Boundary sphere radius enforced by the integrator.
	pub fn boundary_radius(&self) -> f32 {
		self.radius * self.motion.boundary_factor
	}

	/// Clamp every numeric field into the range the simulation can use.
	///
	/// Zero counts and zero distances are valid and produce an inert field.
	/// `count` and `max_links_per_node` are capped at [`MAX_COUNT`] and
	/// [`MAX_LINKS_PER_NODE`], which keeps the link buffer allocatable.
	pub fn sanitized(self) -> Self {
		let defaults = Self::default();
		let m = self.motion;
		let dm = defaults.motion;
		let c = self.camera;
		let dc = defaults.camera;

		let max_pixel_ratio = if c.max_pixel_ratio.is_finite() && c.max_pixel_ratio >= 1.0 {
			c.max_pixel_ratio
		} else {
			warn!(
				"particle-network: invalid camera.max_pixel_ratio = {}, using {}",
				c.max_pixel_ratio, dc.max_pixel_ratio
			);
			dc.max_pixel_ratio
		};
		let near = checked("camera.near", c.near, dc.near, |v| v > 0.0);

		Self {
			count: capped("count", self.count, MAX_COUNT),
			radius: checked("radius", self.radius, defaults.radius, |v| v >= 0.0),
			link_distance: checked("link_distance", self.link_distance, 0.0, |v| v >= 0.0),
			max_links_per_node: capped(
				"max_links_per_node",
				self.max_links_per_node,
				MAX_LINKS_PER_NODE,
			),
			link_scan_window: self.link_scan_window,
			link_stride_threshold: self.link_stride_threshold,
			field_scale: checked("field_scale", self.field_scale, defaults.field_scale, |v| {
				v > 0.0
			}),
			point_glow: if self.point_glow.is_finite() && self.point_glow >= 0.0 {
				self.point_glow
			} else {
				warn!(
					"particle-network: invalid point_glow = {}, using 0",
					self.point_glow
				);
				0.0
			},
			motion: MotionConfig {
				damping: checked("motion.damping", m.damping, dm.damping, |v| {
					(0.0..1.0).contains(&v)
				}),
				restitution: checked("motion.restitution", m.restitution, dm.restitution, |v| {
					(0.0..=1.0).contains(&v)
				}),
				boundary_factor: checked(
					"motion.boundary_factor",
					m.boundary_factor,
					dm.boundary_factor,
					|v| v > 0.0,
				),
				attraction_strength: checked(
					"motion.attraction_strength",
					m.attraction_strength,
					dm.attraction_strength,
					|v| v >= 0.0,
				),
				attraction_max: checked(
					"motion.attraction_max",
					m.attraction_max,
					dm.attraction_max,
					|v| v >= 0.0,
				),
				spin_x: checked("motion.spin_x", m.spin_x, dm.spin_x, |_| true),
				spin_y: checked("motion.spin_y", m.spin_y, dm.spin_y, |_| true),
				initial_speed: checked(
					"motion.initial_speed",
					m.initial_speed,
					dm.initial_speed,
					|v| v >= 0.0,
				),
				radial_bias: checked("motion.radial_bias", m.radial_bias, dm.radial_bias, |v| {
					v > 0.0
				}),
			},
			camera: CameraConfig {
				fov_degrees: checked("camera.fov_degrees", c.fov_degrees, dc.fov_degrees, |v| {
					v > 1.0 && v < 179.0
				}),
				distance: checked("camera.distance", c.distance, dc.distance, |v| v > 0.0),
				auto_rotate_speed: checked(
					"camera.auto_rotate_speed",
					c.auto_rotate_speed,
					dc.auto_rotate_speed,
					|_| true,
				),
				near,
				far: checked("camera.far", c.far, dc.far.max(near * 2.0), |v| v > near),
				max_pixel_ratio,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::super::geometry::LineGeometry;
	use super::*;

	#[test]
	fn defaults_are_canonical_set() {
		let config = NetworkConfig::default();
		assert_eq!(config.count, 280);
		assert_eq!(config.radius, 10.0);
		assert_eq!(config.link_distance, 1.6);
		assert_eq!(config.max_links_per_node, 6);
		assert_eq!(config.link_capacity(), 280 * 6);
		assert!((config.boundary_radius() - 14.0).abs() < 1e-5);
	}

	#[test]
	fn partial_json_keeps_other_defaults() {
		let config =
			NetworkConfig::from_json(r#"{ "count": 50, "motion": { "damping": 0.9 } }"#).unwrap();
		assert_eq!(config.count, 50);
		assert_eq!(config.motion.damping, 0.9);
		assert_eq!(config.motion.restitution, MotionConfig::default().restitution);
		assert_eq!(config.camera, CameraConfig::default());
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(NetworkConfig::from_json("{ count: ").is_err());
	}

	#[test]
	fn sanitize_replaces_out_of_range_values() {
		let mut config = NetworkConfig::default();
		config.radius = -3.0;
		config.link_distance = f32::NAN;
		config.motion.damping = 1.0;
		config.motion.restitution = 2.0;
		config.camera.fov_degrees = 0.0;
		config.camera.max_pixel_ratio = 0.5;

		let config = config.sanitized();
		assert_eq!(config.radius, 10.0);
		assert_eq!(config.link_distance, 0.0);
		assert_eq!(config.motion.damping, 0.985);
		assert_eq!(config.motion.restitution, 0.7);
		assert_eq!(config.camera.fov_degrees, 65.0);
		assert_eq!(config.camera.max_pixel_ratio, 2.0);
	}

	#[test]
	fn degenerate_values_survive_sanitizing() {
		let mut config = NetworkConfig::default();
		config.count = 0;
		config.link_distance = 0.0;
		config.max_links_per_node = 0;

		let config = config.sanitized();
		assert_eq!(config.count, 0);
		assert_eq!(config.link_distance, 0.0);
		assert_eq!(config.link_capacity(), 0);
	}

	#[test]
	fn oversized_counts_are_capped_to_an_allocatable_buffer() {
		let config = NetworkConfig::from_json(
			r#"{ "count": 18446744073709551615, "max_links_per_node": 18446744073709551615 }"#,
		)
		.unwrap();
		assert_eq!(config.count, MAX_COUNT);
		assert_eq!(config.max_links_per_node, MAX_LINKS_PER_NODE);
		assert_eq!(config.link_capacity(), MAX_COUNT * MAX_LINKS_PER_NODE);

		let config =
			NetworkConfig::from_json(r#"{ "count": 280, "max_links_per_node": 18446744073709551615 }"#)
				.unwrap();
		let lines = LineGeometry::allocate(config.link_capacity());
		assert_eq!(lines.segment_capacity(), 280 * MAX_LINKS_PER_NODE);
	}

	#[test]
	fn negative_glow_is_disabled() {
		let config = NetworkConfig {
			point_glow: -4.0,
			..NetworkConfig::default()
		}
		.sanitized();
		assert_eq!(config.point_glow, 0.0);
	}
}
