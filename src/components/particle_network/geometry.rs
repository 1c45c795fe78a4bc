//! Long-lived vertex buffers shared between the simulation and the canvas backend.
//!
//! Buffers are allocated once at mount and rewritten in place every frame.
//! Writers set `needs_update`; the backend clears it once it has consumed
//! the new contents.

use glam::Vec3;

use super::field::Particle;

/// A flat `f32` attribute with three components per vertex.
#[derive(Clone, Debug, Default)]
pub struct BufferAttribute {
	pub array: Vec<f32>,
	pub needs_update: bool,
}

impl BufferAttribute {
	pub const ITEM_SIZE: usize = 3;

	/// Zeroed attribute holding `vertices` entries.
	pub fn zeroed(vertices: usize) -> Self {
		Self {
			array: vec![0.0; vertices * Self::ITEM_SIZE],
			needs_update: true,
		}
	}

	/// Number of vertices the attribute can hold.
	pub fn vertex_capacity(&self) -> usize {
		self.array.len() / Self::ITEM_SIZE
	}

	pub fn set(&mut self, vertex: usize, value: Vec3) {
		let i = vertex * Self::ITEM_SIZE;
		self.array[i..i + Self::ITEM_SIZE].copy_from_slice(&value.to_array());
	}

	pub fn get(&self, vertex: usize) -> Vec3 {
		let i = vertex * Self::ITEM_SIZE;
		Vec3::from_slice(&self.array[i..i + Self::ITEM_SIZE])
	}
}

/// Positions and colors of the point cloud.
#[derive(Clone, Debug, Default)]
pub struct PointGeometry {
	pub position: BufferAttribute,
	pub color: BufferAttribute,
}

impl PointGeometry {
	pub fn allocate(count: usize) -> Self {
		Self {
			position: BufferAttribute::zeroed(count),
			color: BufferAttribute::zeroed(count),
		}
	}

	pub fn len(&self) -> usize {
		self.position.vertex_capacity()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Copy current particle positions into the position attribute.
	pub fn write_positions(&mut self, particles: &[Particle]) {
		for (i, p) in particles.iter().enumerate() {
			self.position.set(i, p.position);
		}
		self.position.needs_update = true;
	}

	/// Copy particle colors into the color attribute.
	pub fn write_colors(&mut self, particles: &[Particle]) {
		for (i, p) in particles.iter().enumerate() {
			self.color.set(i, p.color);
		}
		self.color.needs_update = true;
	}
}

/// Endpoints of the link segments. Only the first `draw_range` vertices are live.
#[derive(Clone, Debug, Default)]
pub struct LineGeometry {
	pub position: BufferAttribute,
	/// Number of valid vertices (two per segment) at the front of `position`.
	pub draw_range: usize,
}

impl LineGeometry {
	/// Room for `segments` links.
	pub fn allocate(segments: usize) -> Self {
		Self {
			position: BufferAttribute::zeroed(segments * 2),
			draw_range: 0,
		}
	}

	/// Total number of segments the buffer can hold.
	pub fn segment_capacity(&self) -> usize {
		self.position.vertex_capacity() / 2
	}

	/// Number of live segments.
	pub fn segment_count(&self) -> usize {
		self.draw_range / 2
	}

	/// Live segments as endpoint pairs.
	pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
		(0..self.segment_count()).map(|s| (self.position.get(s * 2), self.position.get(s * 2 + 1)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn attribute_round_trips_vertices() {
		let mut attr = BufferAttribute::zeroed(2);
		attr.set(1, Vec3::new(1.0, 2.0, 3.0));
		assert_eq!(attr.array, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);
		assert_eq!(attr.get(1), Vec3::new(1.0, 2.0, 3.0));
	}

	#[test]
	fn point_geometry_writes_in_place() {
		let mut geometry = PointGeometry::allocate(2);
		let before = geometry.position.array.as_ptr();
		geometry.position.needs_update = false;

		let particles = [
			Particle::new(Vec3::X, Vec3::ZERO, Vec3::ONE),
			Particle::new(Vec3::Y, Vec3::ZERO, Vec3::ZERO),
		];
		geometry.write_positions(&particles);

		assert!(geometry.position.needs_update);
		assert_eq!(geometry.position.array.as_ptr(), before);
		assert_eq!(geometry.position.get(1), Vec3::Y);
	}

	#[test]
	fn line_geometry_reports_only_draw_range() {
		let mut lines = LineGeometry::allocate(3);
		assert_eq!(lines.segment_capacity(), 3);
		lines.position.set(0, Vec3::X);
		lines.position.set(1, Vec3::Y);
		lines.position.set(2, Vec3::Z);
		lines.draw_range = 2;

		let segments: Vec<_> = lines.segments().collect();
		assert_eq!(segments, vec![(Vec3::X, Vec3::Y)]);
	}
}
