//! Face visibility and painter's ordering.
//!
//! Side faces are chosen by sector: the rotation is shifted by 45° and cut
//! into four 90° ranges, each exposing the two walls that face the viewer.
//! Across items the paint key is `x + z` in world space, ascending, ties in
//! input order.

use super::projection::normalize_degrees;

const SECTOR_PHASE_DEG: f64 = 45.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
	Bottom,
	Back,
	Left,
	Right,
	Front,
	Top,
}

impl Face {
	/// Corner indices into [`super::geometry::Cuboid::corners`], in outline order.
	pub fn corners(self) -> [usize; 4] {
		match self {
			Face::Bottom => [0, 1, 2, 3],
			Face::Back => [0, 1, 5, 4],
			Face::Left => [0, 3, 7, 4],
			Face::Right => [2, 1, 5, 6],
			Face::Front => [3, 2, 6, 7],
			Face::Top => [7, 6, 5, 4],
		}
	}

	/// Paint rank within one cuboid: lower paints first.
	pub fn rank(self) -> u8 {
		match self {
			Face::Bottom => 0,
			Face::Left => 1,
			Face::Back => 2,
			Face::Right => 3,
			Face::Front => 4,
			Face::Top => 5,
		}
	}
}

/// One of four 90° rotation ranges, named by the walls it exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sector {
	FrontRight,
	RightBack,
	BackLeft,
	LeftFront,
}

impl Sector {
	pub fn of(rotation_deg: f64) -> Self {
		let shifted = normalize_degrees(normalize_degrees(rotation_deg) + SECTOR_PHASE_DEG);
		match shifted {
			a if a < 90.0 => Sector::FrontRight,
			a if a < 180.0 => Sector::RightBack,
			a if a < 270.0 => Sector::BackLeft,
			_ => Sector::LeftFront,
		}
	}

	pub fn sides(self) -> [Face; 2] {
		match self {
			Sector::FrontRight => [Face::Front, Face::Right],
			Sector::RightBack => [Face::Right, Face::Back],
			Sector::BackLeft => [Face::Back, Face::Left],
			Sector::LeftFront => [Face::Left, Face::Front],
		}
	}
}

/// Faces of a cuboid with vertical extent `extent`, sorted back to front.
pub fn visible_faces(rotation_deg: f64, extent: f64, bottom_max_extent: f64) -> Vec<Face> {
	let mut faces = Vec::with_capacity(4);
	if extent <= bottom_max_extent {
		faces.push(Face::Bottom);
	}
	faces.extend(Sector::of(rotation_deg).sides());
	faces.push(Face::Top);
	faces.sort_by_key(|face| face.rank());
	faces
}

/// Stable back-to-front ordering of `(key, item)` pairs.
pub fn paint_order<T>(mut items: Vec<(f64, T)>) -> Vec<T> {
	items.sort_by(|(a, _), (b, _)| a.total_cmp(b));
	items.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn default_view_shows_front_and_right() {
		assert_eq!(
			visible_faces(0.0, 50.0, 25.0),
			vec![Face::Right, Face::Front, Face::Top]
		);
	}

	#[test]
	fn sector_boundaries_sit_on_diagonals() {
		assert_eq!(Sector::of(0.0), Sector::FrontRight);
		assert_eq!(Sector::of(44.9), Sector::FrontRight);
		assert_eq!(Sector::of(45.0), Sector::RightBack);
		assert_eq!(Sector::of(135.0), Sector::BackLeft);
		assert_eq!(Sector::of(225.0), Sector::LeftFront);
		assert_eq!(Sector::of(314.9), Sector::LeftFront);
		assert_eq!(Sector::of(315.0), Sector::FrontRight);
		assert_eq!(Sector::of(-45.0), Sector::FrontRight);
	}

	#[test]
	fn sweep_always_exposes_two_walls() {
		for tenth in 0..3600 {
			let angle = tenth as f64 / 10.0;
			for &(extent, bottom) in &[(50.0, false), (25.0, true), (5.0, true)] {
				let faces = visible_faces(angle, extent, 25.0);
				let sides = faces.iter().filter(|f| !matches!(f, Face::Top | Face::Bottom)).count();
				assert_eq!(sides, 2, "angle {angle}");
				assert_eq!(faces.last(), Some(&Face::Top));
				assert_eq!(faces.contains(&Face::Bottom), bottom);
				assert_eq!(faces.first() == Some(&Face::Bottom), bottom);
				assert!(faces.len() < 6);
			}
		}
	}

	#[test]
	fn paint_order_is_ascending_and_stable() {
		let ordered = paint_order(vec![(240.0, "b"), (0.0, "a"), (240.0, "c"), (-10.0, "z")]);
		assert_eq!(ordered, vec!["z", "a", "b", "c"]);
	}

	#[test]
	fn paint_order_tolerates_nan_keys() {
		let ordered = paint_order(vec![(f64::NAN, "nan"), (10.0, "b"), (0.0, "a")]);
		assert_eq!(ordered, vec!["a", "b", "nan"]);
	}
}
