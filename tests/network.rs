//! End-to-end checks of the simulation through the public API.

#![allow(unused_crate_dependencies)]

use glam::Vec3;
use particle_network::components::particle_network::geometry::LineGeometry;
use particle_network::components::particle_network::{
	GradientPalette, LinkParams, MotionParams, REFERENCE_FRAME,
};
use particle_network::{NetworkConfig, NetworkState, Particle, build_links, integrate};
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// Build a mounted state with a fixed seed.
fn mounted(config: NetworkConfig) -> NetworkState {
	let mut rng = SmallRng::seed_from_u64(2024);
	let mut state = NetworkState::new(config, &GradientPalette::neural(), 1024.0, 700.0, &mut rng);
	state.allocate_buffers();
	state
}

#[test]
fn three_known_particles_one_frame() {
	let config = NetworkConfig::default();
	let motion = MotionParams::from_config(&config);
	let links = LinkParams::from_config(&config);

	let mut particles = vec![
		Particle::new(Vec3::new(-4.0, 0.0, 0.0), Vec3::new(0.002, 0.0, 0.0), Vec3::ONE),
		Particle::new(Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.001, 0.0), Vec3::ONE),
		Particle::new(Vec3::new(0.0, 4.0, 0.0), Vec3::new(0.0, 0.0, -0.003), Vec3::ONE),
	];
	let expected: Vec<Vec3> = particles
		.iter()
		.map(|p| p.position + motion.damping * p.velocity)
		.collect();

	integrate(&mut particles, None, &motion, 1.0);
	for (p, e) in particles.iter().zip(&expected) {
		assert!((p.position - *e).length() < 1e-6);
	}

	let mut lines = LineGeometry::allocate(config.link_capacity());
	assert_eq!(build_links(&particles, &links, &mut lines), 0);
	assert_eq!(lines.draw_range, 0);
}

#[test]
fn two_particles_at_threshold_link_once() {
	let config = NetworkConfig::default();
	let particles = [
		Particle::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE),
		Particle::new(Vec3::new(0.0, config.link_distance, 0.0), Vec3::ZERO, Vec3::ONE),
	];
	let mut lines = LineGeometry::allocate(2 * config.max_links_per_node);
	assert_eq!(build_links(&particles, &LinkParams::from_config(&config), &mut lines), 1);
}

#[test]
fn particle_outside_boundary_is_brought_back() {
	let config = NetworkConfig::default();
	let motion = MotionParams::from_config(&config);
	let start = Vec3::new(0.0, 0.0, -30.0);
	let velocity = Vec3::new(0.0, 0.0, -0.05);
	let mut particles = [Particle::new(start, velocity, Vec3::ONE)];

	integrate(&mut particles, None, &motion, 1.0);
	assert!((particles[0].position.length() - config.boundary_radius()).abs() < 1e-4);
	assert!(particles[0].velocity.z > 0.0);
}

#[test]
fn long_run_stays_bounded_with_hover() {
	let config = NetworkConfig::default();
	let limit = config.boundary_radius();
	let bound = config
		.link_capacity()
		.min(config.count * config.max_links_per_node);
	let mut state = mounted(config);

	state.pointer_enter();
	for frame in 0..600 {
		// Sweep the pointer across the canvas.
		let x = (frame % 120) as f64 / 120.0 * state.width;
		state.pointer_move(x, state.height * 0.5);
		assert!(state.tick(REFERENCE_FRAME));

		assert!(state.link_count() <= bound);
		assert!(
			state
				.particles
				.iter()
				.all(|p| p.position.length() <= limit + 1e-3 && p.position.is_finite())
		);
	}
	state.pointer_leave();
	assert!(state.pointer.active_target().is_none());
}

#[test]
fn large_population_uses_strided_scan() {
	let config = NetworkConfig {
		count: 1500,
		..NetworkConfig::default()
	};
	let bound = config.link_capacity();
	let mut state = mounted(config);
	assert!(state.tick(REFERENCE_FRAME));
	assert!(state.link_count() <= bound);
	assert_eq!(
		state.buffers().map(|b| b.lines.draw_range),
		Some(state.link_count() * 2)
	);
}

#[test]
fn config_json_drives_the_state() {
	let config =
		NetworkConfig::from_json(r#"{ "count": 12, "radius": 3.0, "link_distance": 0.0 }"#)
			.unwrap();
	let mut state = mounted(config);
	assert_eq!(state.particles.len(), 12);
	assert!(state.particles.iter().all(|p| p.position.length() <= 3.0 + 1e-4));
	assert!(state.tick(REFERENCE_FRAME));
	assert_eq!(state.link_count(), 0);
}
