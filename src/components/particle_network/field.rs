//! Particle field generation.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::config::NetworkConfig;
use super::theme::GradientPalette;

/// A single simulated point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
	pub position: Vec3,
	/// Displacement per reference frame.
	pub velocity: Vec3,
	/// Linear RGB in `0.0..=1.0`.
	pub color: Vec3,
}

impl Particle {
	pub fn new(position: Vec3, velocity: Vec3, color: Vec3) -> Self {
		Self {
			position,
			velocity,
			color,
		}
	}
}

/// Uniformly random unit vector.
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
	let theta = TAU * rng.r#gen::<f32>();
	let phi = (2.0 * rng.r#gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
	Vec3::new(phi.sin() * theta.cos(), phi.sin() * theta.sin(), phi.cos())
}

/// Color for particle `index` of `count`, spread evenly along the palette.
pub fn gradient_color(palette: &GradientPalette, index: usize, count: usize) -> Vec3 {
	let t = if count == 0 {
		0.0
	} else {
		index as f32 / count as f32
	};
	palette.sample(t)
}

/// Scatter `config.count` particles through a solid sphere of `config.radius`.
///
/// The radial fraction is `w^radial_bias` for uniform `w`, so with the default
/// bias of 1.5 particles crowd toward the center. Initial velocities are small
/// and uniformly random per component.
pub fn generate_field<R: Rng + ?Sized>(
	config: &NetworkConfig,
	palette: &GradientPalette,
	rng: &mut R,
) -> Vec<Particle> {
	let motion = &config.motion;
	let mut particles = Vec::with_capacity(config.count);

	for i in 0..config.count {
		let direction = random_direction(rng);
		let r = config.radius * rng.r#gen::<f32>().powf(motion.radial_bias);

		let velocity = Vec3::new(
			rng.r#gen::<f32>() - 0.5,
			rng.r#gen::<f32>() - 0.5,
			rng.r#gen::<f32>() - 0.5,
		) * motion.initial_speed;

		particles.push(Particle::new(
			direction * r,
			velocity,
			gradient_color(palette, i, config.count),
		));
	}

	particles
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	#[test]
	fn generates_exact_count_within_radius() {
		let mut rng = SmallRng::seed_from_u64(7);
		let palette = GradientPalette::neural();
		for count in [0, 1, 2, 280, 1000] {
			let config = NetworkConfig {
				count,
				..NetworkConfig::default()
			};
			let field = generate_field(&config, &palette, &mut rng);
			assert_eq!(field.len(), count);
			for p in &field {
				assert!(p.position.length() <= config.radius + 1e-4);
				assert!(p.velocity.abs().max_element() <= config.motion.initial_speed / 2.0);
			}
		}
	}

	#[test]
	fn density_is_biased_toward_center() {
		let mut rng = SmallRng::seed_from_u64(11);
		let config = NetworkConfig {
			count: 4000,
			..NetworkConfig::default()
		};
		let field = generate_field(&config, &GradientPalette::neural(), &mut rng);
		let inner = field
			.iter()
			.filter(|p| p.position.length() < config.radius * 0.5)
			.count();
		// Uniform volume density would put 1/8 of the points inside half the radius;
		// w^1.5 < 0.5 happens for w < 0.63, so roughly 63% land there.
		assert!(inner as f32 / config.count as f32 > 0.5);
	}

	#[test]
	fn colors_follow_index_gradient() {
		let mut rng = SmallRng::seed_from_u64(3);
		let palette = GradientPalette::neural();
		let config = NetworkConfig {
			count: 10,
			..NetworkConfig::default()
		};
		let field = generate_field(&config, &palette, &mut rng);
		assert_eq!(field[0].color, palette.sample(0.0));
		assert_eq!(field[5].color, palette.sample(0.5));
		assert_eq!(field[9].color, palette.sample(0.9));
	}

	#[test]
	fn same_seed_same_field() {
		let config = NetworkConfig::default();
		let palette = GradientPalette::neural();
		let a = generate_field(&config, &palette, &mut SmallRng::seed_from_u64(42));
		let b = generate_field(&config, &palette, &mut SmallRng::seed_from_u64(42));
		assert_eq!(a, b);
	}
}
