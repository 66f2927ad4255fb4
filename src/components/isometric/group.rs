//! Derived bounds for site groups.

use super::config::EngineConfig;
use super::geometry::footprint;
use super::types::Node;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupBounds {
	pub x: f64,
	pub z: f64,
	pub width: f64,
	pub depth: f64,
}

/// Bounding box of the members' footprints plus padding, centered on them.
/// With no members the group keeps `center` and the minimum size.
pub fn bounds<'a>(
	members: impl IntoIterator<Item = &'a Node>,
	center: (f64, f64),
	config: &EngineConfig,
) -> GroupBounds {
	let mut extent: Option<(f64, f64, f64, f64)> = None;
	for member in members {
		let (w, d) = footprint(member, config);
		let (min_x, max_x) = (member.x - w / 2.0, member.x + w / 2.0);
		let (min_z, max_z) = (member.z - d / 2.0, member.z + d / 2.0);
		extent = Some(match extent {
			None => (min_x, max_x, min_z, max_z),
			Some((ax, bx, az, bz)) => (ax.min(min_x), bx.max(max_x), az.min(min_z), bz.max(max_z)),
		});
	}

	match extent {
		Some((min_x, max_x, min_z, max_z)) => {
			let pad = config.group_padding * 2.0;
			GroupBounds {
				x: (min_x + max_x) / 2.0,
				z: (min_z + max_z) / 2.0,
				width: (max_x - min_x + pad).max(config.group_min_width),
				depth: (max_z - min_z + pad).max(config.group_min_depth),
			}
		}
		None => GroupBounds {
			x: center.0,
			z: center.1,
			width: config.group_min_width,
			depth: config.group_min_depth,
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_group_collapses_to_minimum() {
		let config = EngineConfig::default();
		let b = bounds([], (30.0, -60.0), &config);
		assert_eq!(b, GroupBounds { x: 30.0, z: -60.0, width: 200.0, depth: 100.0 });
	}

	#[test]
	fn members_are_wrapped_with_padding() {
		let config = EngineConfig::default();
		let members = [
			Node::new("a", 0.0, 0.0, 1.0),
			Node::new("b", 400.0, 240.0, 1.0),
		];
		let b = bounds(&members, (0.0, 0.0), &config);
		assert_eq!((b.x, b.z), (200.0, 120.0));
		// 400 + 50 footprint + 2 * 50 padding
		assert_eq!(b.width, 550.0);
		assert_eq!(b.depth, 390.0);
	}

	#[test]
	fn single_member_respects_minimum_size() {
		let config = EngineConfig::default();
		let members = [Node::new("a", 120.0, 120.0, 1.0)];
		let b = bounds(&members, (0.0, 0.0), &config);
		assert_eq!((b.x, b.z, b.width, b.depth), (120.0, 120.0, 200.0, 150.0));
	}
}
