//! World ↔ screen transforms.
//!
//! A world point is first rotated about the vertical axis by the camera's
//! rotation, then projected with a fixed-angle axonometric transform, then
//! scaled by zoom and offset by the viewport center plus pan. Rotating after
//! projecting (in screen space) skews the result and is not equivalent.
//!
//! The inverse is only exact on a horizontal plane (`y == y_hint`). It is
//! meant for incremental drag deltas; accumulated error under combined
//! rotation, pan and zoom makes it unsuitable for exact placement.

use super::config::EngineConfig;
use super::types::{Point3, ScreenPoint};

/// Fixed-angle axonometric projection with its trig constants precomputed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsometricProjection {
	cos_angle: f64,
	sin_angle: f64,
}

impl IsometricProjection {
	pub fn new(half_angle_deg: f64) -> Self {
		let angle = half_angle_deg.to_radians();
		Self {
			cos_angle: angle.cos(),
			sin_angle: angle.sin(),
		}
	}

	pub fn from_config(config: &EngineConfig) -> Self {
		Self::new(config.half_angle_deg)
	}

	pub fn project(&self, x: f64, y: f64, z: f64) -> (f64, f64) {
		((x - z) * self.cos_angle, (x + z) * self.sin_angle - y)
	}

	/// Solves [`Self::project`] for `(x, z)` on the plane `y = y_hint`.
	pub fn unproject(&self, screen_x: f64, screen_y: f64, y_hint: f64) -> (f64, f64) {
		let diff = screen_x / self.cos_angle;
		let sum = (screen_y + y_hint) / self.sin_angle;
		((diff + sum) / 2.0, (sum - diff) / 2.0)
	}
}

/// Wraps any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
	if !degrees.is_finite() {
		return 0.0;
	}
	let wrapped = degrees.rem_euclid(360.0);
	// rem_euclid can round tiny negatives up to exactly 360.0
	if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn center(&self) -> ScreenPoint {
		ScreenPoint::new(self.width / 2.0, self.height / 2.0)
	}
}

/// Transient view state: screen-space pan, zoom and rotation about the vertical axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pub pan_x: f64,
	pub pan_y: f64,
	zoom: f64,
	rotation_deg: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self {
			pan_x: 0.0,
			pan_y: 0.0,
			zoom: 1.0,
			rotation_deg: 0.0,
		}
	}
}

impl Camera {
	pub fn zoom(&self) -> f64 {
		self.zoom
	}

	pub fn rotation_deg(&self) -> f64 {
		self.rotation_deg
	}

	pub fn set_zoom(&mut self, zoom: f64, config: &EngineConfig) {
		self.zoom = config.clamp_zoom(zoom);
	}

	pub fn set_rotation(&mut self, degrees: f64) {
		self.rotation_deg = normalize_degrees(degrees);
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.pan_x += dx;
		self.pan_y += dy;
	}

	/// Multiplies zoom by `factor`, clamped. With a pivot, the point under the
	/// pivot stays put on screen.
	pub fn zoom_by(
		&mut self,
		factor: f64,
		pivot: Option<(ScreenPoint, Viewport)>,
		config: &EngineConfig,
	) {
		let old_zoom = self.zoom;
		let new_zoom = config.clamp_zoom(old_zoom * factor);
		if let Some((point, viewport)) = pivot {
			let center = viewport.center();
			let ratio = new_zoom / old_zoom;
			let (ox, oy) = (point.x - center.x, point.y - center.y);
			self.pan_x = ox - (ox - self.pan_x) * ratio;
			self.pan_y = oy - (oy - self.pan_y) * ratio;
		}
		self.zoom = new_zoom;
	}
}

/// Frame-local projector: caches the rotation trig for one camera state.
#[derive(Clone, Copy, Debug)]
pub struct Projector {
	projection: IsometricProjection,
	cos_rot: f64,
	sin_rot: f64,
	zoom: f64,
	offset: ScreenPoint,
}

impl Projector {
	pub fn new(projection: IsometricProjection, camera: &Camera, viewport: Viewport) -> Self {
		let theta = camera.rotation_deg().to_radians();
		let center = viewport.center();
		Self {
			projection,
			cos_rot: theta.cos(),
			sin_rot: theta.sin(),
			zoom: camera.zoom(),
			offset: ScreenPoint::new(center.x + camera.pan_x, center.y + camera.pan_y),
		}
	}

	pub fn zoom(&self) -> f64 {
		self.zoom
	}

	pub fn rotate(&self, x: f64, z: f64) -> (f64, f64) {
		(
			x * self.cos_rot - z * self.sin_rot,
			x * self.sin_rot + z * self.cos_rot,
		)
	}

	pub fn unrotate(&self, x: f64, z: f64) -> (f64, f64) {
		(
			x * self.cos_rot + z * self.sin_rot,
			-x * self.sin_rot + z * self.cos_rot,
		)
	}

	pub fn project(&self, point: Point3) -> ScreenPoint {
		let (rx, rz) = self.rotate(point.x, point.z);
		let (px, py) = self.projection.project(rx, point.y, rz);
		ScreenPoint::new(
			px * self.zoom + self.offset.x,
			py * self.zoom + self.offset.y,
		)
	}

	/// Ground position under a screen point, assuming the plane `y = y_hint`.
	pub fn screen_to_world(&self, screen: ScreenPoint, y_hint: f64) -> (f64, f64) {
		let (sx, sy) = (
			(screen.x - self.offset.x) / self.zoom,
			(screen.y - self.offset.y) / self.zoom,
		);
		let (rx, rz) = self.projection.unproject(sx, sy, y_hint);
		self.unrotate(rx, rz)
	}

	/// World-space ground delta for a screen-space pointer delta.
	pub fn screen_delta_to_world(&self, dx: f64, dy: f64) -> (f64, f64) {
		let (rx, rz) = self.projection.unproject(dx / self.zoom, dy / self.zoom, 0.0);
		self.unrotate(rx, rz)
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) const EPS: f64 = 1e-9;

	pub(crate) fn approx(a: f64, b: f64) -> bool {
		(a - b).abs() < EPS * (1.0 + a.abs().max(b.abs()))
	}

	fn projector(rotation: f64, zoom: f64) -> Projector {
		let config = EngineConfig::default();
		let mut camera = Camera::default();
		camera.set_rotation(rotation);
		camera.set_zoom(zoom, &config);
		Projector::new(
			IsometricProjection::from_config(&config),
			&camera,
			Viewport::new(800.0, 600.0),
		)
	}

	#[test]
	fn ground_plane_round_trip() {
		let projection = IsometricProjection::new(30.0);
		for &(x, z) in &[(0.0, 0.0), (240.0, 0.0), (-37.5, 912.25), (1e4, -3e3)] {
			let (sx, sy) = projection.project(x, 0.0, z);
			let (ux, uz) = projection.unproject(sx, sy, 0.0);
			assert!(approx(ux, x), "x: {ux} vs {x}");
			assert!(approx(uz, z), "z: {uz} vs {z}");
		}
	}

	#[test]
	fn raised_plane_round_trip_uses_hint() {
		let projection = IsometricProjection::new(30.0);
		let (sx, sy) = projection.project(80.0, 45.0, -20.0);
		let (ux, uz) = projection.unproject(sx, sy, 45.0);
		assert!(approx(ux, 80.0) && approx(uz, -20.0));
	}

	#[test]
	fn full_pipeline_inverts_under_rotation_pan_and_zoom() {
		let config = EngineConfig::default();
		let mut camera = Camera::default();
		camera.set_rotation(137.0);
		camera.set_zoom(1.7, &config);
		camera.pan_by(-42.0, 18.5);
		let p = Projector::new(IsometricProjection::from_config(&config), &camera, Viewport::new(1024.0, 768.0));

		let screen = p.project(Point3::new(310.0, 0.0, -95.0));
		let (x, z) = p.screen_to_world(screen, 0.0);
		assert!((x - 310.0).abs() < 1e-6 && (z + 95.0).abs() < 1e-6);
	}

	#[test]
	fn rotation_is_periodic() {
		for step in 0..36 {
			let theta = step as f64 * 10.0 + 3.0;
			let (a, b) = (projector(theta, 1.0), projector(theta + 360.0, 1.0));
			let point = Point3::new(123.0, 40.0, -77.0);
			let (pa, pb) = (a.project(point), b.project(point));
			assert!(approx(pa.x, pb.x) && approx(pa.y, pb.y));
		}
	}

	#[test]
	fn rotation_normalizes_into_range() {
		assert_eq!(normalize_degrees(360.0), 0.0);
		assert_eq!(normalize_degrees(-90.0), 270.0);
		assert_eq!(normalize_degrees(725.0), 5.0);
		assert_eq!(normalize_degrees(-1e-20), 0.0);
		assert_eq!(normalize_degrees(f64::NAN), 0.0);
	}

	#[test]
	fn height_moves_points_up_on_screen() {
		let p = projector(63.0, 1.4);
		let mut previous = f64::INFINITY;
		for h in 0..20 {
			let y = p.project(Point3::new(40.0, h as f64 * 7.5, 10.0)).y;
			assert!(y < previous);
			previous = y;
		}
	}

	#[test]
	fn zoom_clamps_are_sticky() {
		let config = EngineConfig::default();
		let mut camera = Camera::default();
		for _ in 0..100 {
			camera.zoom_by(config.zoom_out_factor, None, &config);
		}
		assert_eq!(camera.zoom(), 0.1);
		camera.zoom_by(config.zoom_out_factor, None, &config);
		assert_eq!(camera.zoom(), 0.1);

		for _ in 0..100 {
			camera.zoom_by(config.zoom_in_factor, None, &config);
		}
		assert_eq!(camera.zoom(), 3.0);
	}

	#[test]
	fn pivot_zoom_keeps_point_under_pointer() {
		let config = EngineConfig::default();
		let projection = IsometricProjection::from_config(&config);
		let viewport = Viewport::new(800.0, 600.0);
		let mut camera = Camera::default();
		camera.pan_by(30.0, -12.0);
		let pointer = ScreenPoint::new(612.0, 144.0);

		let before = Projector::new(projection, &camera, viewport).screen_to_world(pointer, 0.0);
		camera.zoom_by(config.zoom_in_factor, Some((pointer, viewport)), &config);
		let after = Projector::new(projection, &camera, viewport).screen_to_world(pointer, 0.0);

		assert!((before.0 - after.0).abs() < 1e-6 && (before.1 - after.1).abs() < 1e-6);
	}

	#[test]
	fn screen_delta_at_double_zoom() {
		let p = projector(0.0, 2.0);
		let (dx, dz) = p.screen_delta_to_world(50.0, 0.0);
		let expected = 25.0 / (30.0_f64.to_radians().cos() * 2.0);
		assert!(approx(dx, expected));
		assert!(approx(dz, -expected));
	}
}
