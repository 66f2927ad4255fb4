//! Tunable constants for projection, geometry and interaction.

/// Immutable engine configuration, built once per diagram.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
	/// Axonometric half-angle in degrees (30° gives the classic dimetric look).
	pub half_angle_deg: f64,
	/// World units of vertical extent per unit of logical node height.
	pub height_scale: f64,
	pub default_width: f64,
	pub default_depth: f64,
	pub min_height: f64,
	/// Vertical extent (world units) at or below which the bottom face is drawn.
	pub bottom_face_max_extent: f64,
	pub min_zoom: f64,
	pub max_zoom: f64,
	pub zoom_in_factor: f64,
	pub zoom_out_factor: f64,
	/// Screen-space hit radius at zoom 1.0, in pixels.
	pub hit_radius: f64,
	pub handle_hit_radius: f64,
	/// Logical height gained per pixel of upward drag.
	pub height_sensitivity: f64,
	pub grid_cell: f64,
	pub grid_extent: i32,
	/// Node placement grid. `None` disables snapping.
	pub snap_grid: Option<f64>,
	/// Route edges between grid-snapped anchors instead of raw positions.
	pub snap_edge_anchors: bool,
	pub group_padding: f64,
	pub group_min_width: f64,
	pub group_min_depth: f64,
	pub label_offset: f64,
	pub handle_offset: f64,
	pub arrow_size: f64,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			half_angle_deg: 30.0,
			height_scale: 50.0,
			default_width: 50.0,
			default_depth: 50.0,
			min_height: 0.1,
			bottom_face_max_extent: 25.0,
			min_zoom: 0.1,
			max_zoom: 3.0,
			zoom_in_factor: 1.1,
			zoom_out_factor: 0.9,
			hit_radius: 50.0,
			handle_hit_radius: 10.0,
			height_sensitivity: 0.02,
			grid_cell: 60.0,
			grid_extent: 15,
			snap_grid: Some(120.0),
			snap_edge_anchors: false,
			group_padding: 50.0,
			group_min_width: 200.0,
			group_min_depth: 100.0,
			label_offset: 20.0,
			handle_offset: 30.0,
			arrow_size: 10.0,
		}
	}
}

impl EngineConfig {
	pub fn clamp_height(&self, height: f64) -> f64 {
		if height.is_nan() {
			return self.min_height;
		}
		height.max(self.min_height)
	}

	pub fn clamp_zoom(&self, zoom: f64) -> f64 {
		if zoom.is_nan() {
			return 1.0_f64.clamp(self.min_zoom, self.max_zoom);
		}
		zoom.clamp(self.min_zoom, self.max_zoom)
	}

	/// Snaps a ground-plane position to the node grid, if one is configured.
	pub fn snap(&self, x: f64, z: f64) -> (f64, f64) {
		match self.snap_grid {
			Some(cell) if cell > 0.0 => (snap_to_grid(x, cell), snap_to_grid(z, cell)),
			_ => (x, z),
		}
	}
}

/// Rounds `value` to the nearest multiple of `cell`.
pub fn snap_to_grid(value: f64, cell: f64) -> f64 {
	(value / cell).round() * cell
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn height_clamp_floors_at_minimum() {
		let config = EngineConfig::default();
		assert_eq!(config.clamp_height(-4.0), 0.1);
		assert_eq!(config.clamp_height(0.0), 0.1);
		assert_eq!(config.clamp_height(f64::NAN), 0.1);
		assert_eq!(config.clamp_height(2.5), 2.5);
	}

	#[test]
	fn snap_rounds_to_nearest_cell() {
		assert_eq!(snap_to_grid(59.0, 120.0), 0.0);
		assert_eq!(snap_to_grid(61.0, 120.0), 120.0);
		assert_eq!(snap_to_grid(-190.0, 120.0), -240.0);

		let free = EngineConfig {
			snap_grid: None,
			..EngineConfig::default()
		};
		assert_eq!(free.snap(13.0, -7.0), (13.0, -7.0));
	}
}
