//! Proximity links between nearby particles.
//!
//! Links are found with a bounded forward scan rather than a nearest-neighbor
//! search: each particle takes the first qualifying partners after it in index
//! order, up to a per-particle cap, until the shared buffer is full.

use super::config::NetworkConfig;
use super::field::Particle;
use super::geometry::LineGeometry;

/// Scan limits derived from the config for one pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkParams {
	pub max_distance_sq: f32,
	pub max_links_per_node: usize,
	/// Step between candidates (1 = every particle, 2 = every other).
	pub stride: usize,
	/// Maximum candidates examined per particle.
	pub window: usize,
}

impl LinkParams {
	pub fn from_config(config: &NetworkConfig) -> Self {
		Self {
			max_distance_sq: config.link_distance * config.link_distance,
			max_links_per_node: config.max_links_per_node,
			stride: if config.count > config.link_stride_threshold {
				2
			} else {
				1
			},
			window: config.link_scan_window.unwrap_or(usize::MAX),
		}
	}
}

/// Rebuild the link segments for the current particle positions.
///
/// Writes endpoints into `lines` from the front, sets its draw range and
/// returns the number of links. Vertices past the draw range are left as they
/// were. A non-positive threshold records nothing.
pub fn build_links(
	particles: &[Particle],
	params: &LinkParams,
	lines: &mut LineGeometry,
) -> usize {
	let capacity = lines.segment_capacity();
	let mut count = 0;

	if params.max_distance_sq > 0.0 && params.max_links_per_node > 0 {
		'outer: for (i, a) in particles.iter().enumerate() {
			let mut links = 0;
			let candidates = particles
				.iter()
				.skip(i + 1)
				.step_by(params.stride.max(1))
				.take(params.window);

			for b in candidates {
				if count >= capacity {
					break 'outer;
				}
				if a.position.distance_squared(b.position) <= params.max_distance_sq {
					lines.position.set(count * 2, a.position);
					lines.position.set(count * 2 + 1, b.position);
					count += 1;
					links += 1;
					if links >= params.max_links_per_node {
						break;
					}
				}
			}
		}
	}

	lines.draw_range = count * 2;
	lines.position.needs_update = true;
	count
}
