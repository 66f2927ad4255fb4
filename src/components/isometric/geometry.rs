use super::config::EngineConfig;
use super::projection::Projector;
use super::types::{Node, Point3, ScreenPoint};

/// World-space bounding box of a node glyph.
///
/// Corner order: `0..4` is the base at `y = 0`, `4..8` the same rectangle
/// at the top. Within each ring: (-x,-z), (+x,-z), (+x,+z), (-x,+z).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cuboid {
	pub corners: [Point3; 8],
	pub extent: f64,
}

impl Cuboid {
	pub fn of(node: &Node, config: &EngineConfig) -> Self {
		let (w, d) = footprint(node, config);
		let extent = vertical_extent(node, config);
		let (hw, hd) = (w / 2.0, d / 2.0);
		let ring = |y: f64| {
			[
				Point3::new(node.x - hw, y, node.z - hd),
				Point3::new(node.x + hw, y, node.z - hd),
				Point3::new(node.x + hw, y, node.z + hd),
				Point3::new(node.x - hw, y, node.z + hd),
			]
		};
		let (base, top) = (ring(0.0), ring(extent));
		Self {
			corners: [
				base[0], base[1], base[2], base[3], top[0], top[1], top[2], top[3],
			],
			extent,
		}
	}

	pub fn project(&self, projector: &Projector) -> [ScreenPoint; 8] {
		self.corners.map(|corner| projector.project(corner))
	}
}

/// Footprint with defaults applied for unset or non-positive sizes.
pub fn footprint(node: &Node, config: &EngineConfig) -> (f64, f64) {
	let pick = |value: Option<f64>, fallback: f64| match value {
		Some(v) if v > 0.0 && v.is_finite() => v,
		_ => fallback,
	};
	(
		pick(node.width, config.default_width),
		pick(node.depth, config.default_depth),
	)
}

/// World units from the ground to the top face.
pub fn vertical_extent(node: &Node, config: &EngineConfig) -> f64 {
	config.clamp_height(node.height) * config.height_scale
}

/// Hit-test anchor: the middle of the cuboid's vertical axis.
pub fn hit_anchor(node: &Node, config: &EngineConfig) -> Point3 {
	Point3::new(node.x, vertical_extent(node, config) / 2.0, node.z)
}

pub fn label_anchor(node: &Node, config: &EngineConfig) -> Point3 {
	Point3::new(node.x, vertical_extent(node, config) + config.label_offset, node.z)
}

pub fn handle_anchor(node: &Node, config: &EngineConfig) -> Point3 {
	Point3::new(node.x, vertical_extent(node, config) + config.handle_offset, node.z)
}

pub fn top_center(node: &Node, config: &EngineConfig) -> Point3 {
	Point3::new(node.x, vertical_extent(node, config), node.z)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn corners_span_footprint_and_height() {
		let config = EngineConfig::default();
		let node = Node::new("a", 100.0, -20.0, 2.0).with_footprint(60.0, 40.0);
		let cuboid = Cuboid::of(&node, &config);

		assert_eq!(cuboid.extent, 100.0);
		assert_eq!(cuboid.corners[0], Point3::new(70.0, 0.0, -40.0));
		assert_eq!(cuboid.corners[2], Point3::new(130.0, 0.0, 0.0));
		assert_eq!(cuboid.corners[6], Point3::new(130.0, 100.0, 0.0));
		for i in 0..4 {
			let (base, top) = (cuboid.corners[i], cuboid.corners[i + 4]);
			assert_eq!((base.x, base.z), (top.x, top.z));
			assert_eq!(base.y, 0.0);
		}
	}

	#[test]
	fn unset_footprint_uses_defaults() {
		let config = EngineConfig::default();
		let mut node = Node::new("a", 0.0, 0.0, 1.0);
		assert_eq!(footprint(&node, &config), (50.0, 50.0));
		node.width = Some(-3.0);
		node.depth = Some(80.0);
		assert_eq!(footprint(&node, &config), (50.0, 80.0));
	}

	#[test]
	fn extent_respects_height_floor() {
		let config = EngineConfig::default();
		let node = Node::new("flat", 0.0, 0.0, -1.0);
		assert!((vertical_extent(&node, &config) - 5.0).abs() < 1e-12);
	}
}
