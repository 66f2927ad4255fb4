//! Orthogonal edge routing on the ground plane.
//!
//! Paths are axis-aligned in world space. Each waypoint is projected on its
//! own, so segments stay straight on screen but the bend is not a right
//! angle there: an axonometric image of a right angle is skewed.

use super::projection::Projector;
use super::types::{Point3, ScreenPoint};

/// Waypoints from `start` to `end` on `y = 0`, with at most one bend.
///
/// When both axes differ, the longer axis is travelled first.
pub fn manhattan_path(start: (f64, f64), end: (f64, f64)) -> Vec<Point3> {
	let (dx, dz) = (end.0 - start.0, end.1 - start.1);
	let mut path = vec![Point3::new(start.0, 0.0, start.1)];
	if dx != 0.0 && dz != 0.0 {
		let bend = if dx.abs() >= dz.abs() {
			(end.0, start.1)
		} else {
			(start.0, end.1)
		};
		path.push(Point3::new(bend.0, 0.0, bend.1));
	}
	path.push(Point3::new(end.0, 0.0, end.1));
	path
}

pub fn project_path(path: &[Point3], projector: &Projector) -> Vec<ScreenPoint> {
	path.iter().map(|&p| projector.project(p)).collect()
}

/// Screen-space arrowhead triangle at a path's terminus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrowhead {
	pub tip: ScreenPoint,
	pub angle: f64,
	pub points: [ScreenPoint; 3],
}

/// Triangle pointing along the last segment. `None` if it has no length.
pub fn arrowhead(path: &[ScreenPoint], size: f64) -> Option<Arrowhead> {
	let [.., from, tip] = path else {
		return None;
	};
	let (dx, dy) = (tip.x - from.x, tip.y - from.y);
	if dx.hypot(dy) < 1e-6 {
		return None;
	}
	let angle = dy.atan2(dx);
	let (cos, sin) = (angle.cos(), angle.sin());
	let place = |lx: f64, ly: f64| {
		ScreenPoint::new(tip.x + lx * cos - ly * sin, tip.y + lx * sin + ly * cos)
	};
	Some(Arrowhead {
		tip: *tip,
		angle,
		points: [
			*tip,
			place(-size, -size / 2.0),
			place(-size, size / 2.0),
		],
	})
}
