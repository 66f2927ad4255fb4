use std::collections::HashMap;

use log::{debug, warn};

use super::config::EngineConfig;
use super::controller::Gesture;
use super::depth::paint_order;
use super::geometry::{self, Cuboid};
use super::group;
use super::projection::{Camera, IsometricProjection, Projector, Viewport};
use super::types::{Edge, Node, ScreenPoint, TopologyData};

/// Nodes indexed by id, in input order.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
	nodes: Vec<Node>,
	index: HashMap<String, usize>,
}

impl NodeArena {
	/// Builds the arena: drops duplicate ids, clamps heights and links
	/// members into their group's child list. A group never contains itself.
	pub fn from_nodes(nodes: Vec<Node>, config: &EngineConfig) -> Self {
		let mut arena = Self::default();
		for mut node in nodes {
			if arena.index.contains_key(&node.id) {
				warn!("duplicate node id {:?} dropped", node.id);
				continue;
			}
			node.height = config.clamp_height(node.height);
			arena.index.insert(node.id.clone(), arena.nodes.len());
			arena.nodes.push(node);
		}

		let links: Vec<(usize, String)> = arena
			.nodes
			.iter()
			.filter_map(|n| {
				let parent = n.parent.as_deref().filter(|p| *p != n.id)?;
				let parent = arena.index.get(parent)?;
				arena.nodes[*parent].is_group().then(|| (*parent, n.id.clone()))
			})
			.collect();
		for (parent, child) in links {
			let children = &mut arena.nodes[parent].children;
			if !children.contains(&child) {
				children.push(child);
			}
		}

		let index = &arena.index;
		for Node { id, children, .. } in &mut arena.nodes {
			children.retain(|child| *child != *id && index.contains_key(child));
		}
		arena.refresh_all_groups(config);
		arena
	}

	pub fn get(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn get_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.index.get(id).map(|&i| &mut self.nodes[i])
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter()
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn members<'a>(&'a self, group: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
		group.children.iter().filter_map(|id| self.get(id))
	}

	/// Recomputes one group's position and footprint from its members.
	pub fn refresh_group(&mut self, id: &str, config: &EngineConfig) {
		let Some(group) = self.get(id).filter(|n| n.is_group()) else {
			return;
		};
		let bounds = group::bounds(self.members(group), (group.x, group.z), config);
		if let Some(group) = self.get_mut(id) {
			group.x = bounds.x;
			group.z = bounds.z;
			group.width = Some(bounds.width);
			group.depth = Some(bounds.depth);
		}
	}

	fn refresh_all_groups(&mut self, config: &EngineConfig) {
		let groups: Vec<String> = self
			.nodes
			.iter()
			.filter(|n| n.is_group())
			.map(|n| n.id.clone())
			.collect();
		for id in groups {
			self.refresh_group(&id, config);
		}
	}
}

/// Everything one diagram instance owns: working set, view and interaction.
pub struct DiagramState {
	pub config: EngineConfig,
	pub projection: IsometricProjection,
	pub camera: Camera,
	pub viewport: Viewport,
	pub nodes: NodeArena,
	pub edges: Vec<Edge>,
	pub selected: Option<String>,
	pub hovered: Option<String>,
	pub show_grid: bool,
	pub flow_time: f64,
	pub(crate) gesture: Gesture,
}

impl DiagramState {
	pub fn new(data: &TopologyData, width: f64, height: f64, config: EngineConfig) -> Self {
		let mut state = Self {
			projection: IsometricProjection::from_config(&config),
			camera: Camera::default(),
			viewport: Viewport::new(width, height),
			nodes: NodeArena::default(),
			edges: Vec::new(),
			selected: None,
			hovered: None,
			show_grid: true,
			flow_time: 0.0,
			gesture: Gesture::Idle,
			config,
		};
		state.set_nodes(data.nodes.clone());
		state.set_edges(data.edges.clone());
		state
	}

	/// Replaces the working set. Selection, hover and an in-flight drag whose
	/// node vanished are dropped.
	pub fn set_nodes(&mut self, nodes: Vec<Node>) {
		self.nodes = NodeArena::from_nodes(nodes, &self.config);
		if self.selected.as_deref().is_some_and(|id| !self.nodes.contains(id)) {
			self.selected = None;
		}
		if self.hovered.as_deref().is_some_and(|id| !self.nodes.contains(id)) {
			self.hovered = None;
		}
		self.guard_anchor();
		self.log_dangling_edges();
	}

	pub fn set_edges(&mut self, edges: Vec<Edge>) {
		self.edges = edges;
		self.log_dangling_edges();
	}

	pub fn set_rotation(&mut self, degrees: f64) {
		self.camera.set_rotation(degrees);
	}

	pub fn set_zoom(&mut self, zoom: f64) {
		self.camera.set_zoom(zoom, &self.config);
	}

	pub fn set_show_grid(&mut self, show: bool) {
		self.show_grid = show;
	}

	/// Host-driven selection. Unknown ids clear it.
	pub fn set_selection(&mut self, id: Option<&str>) {
		self.selected = id.filter(|id| self.nodes.contains(id)).map(str::to_owned);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.viewport = Viewport::new(width, height);
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
	}

	pub fn projector(&self) -> Projector {
		Projector::new(self.projection, &self.camera, self.viewport)
	}

	/// Device nodes (not groups), back to front.
	pub fn devices_in_paint_order(&self) -> Vec<&Node> {
		paint_order(
			self.nodes
				.iter()
				.filter(|n| !n.is_group())
				.map(|n| (n.depth_key(), n))
				.collect(),
		)
	}

	pub fn groups_in_paint_order(&self) -> Vec<&Node> {
		paint_order(
			self.nodes
				.iter()
				.filter(|n| n.is_group())
				.map(|n| (n.depth_key(), n))
				.collect(),
		)
	}

	/// Front-most device whose hit circle contains `at`.
	pub fn device_at(&self, at: ScreenPoint) -> Option<&Node> {
		let projector = self.projector();
		let radius = self.config.hit_radius * projector.zoom();
		self.devices_in_paint_order().into_iter().rev().find(|node| {
			let anchor = projector.project(geometry::hit_anchor(node, &self.config));
			anchor.distance(at) < radius
		})
	}

	/// Front-most group whose ground plate contains `at`.
	pub fn group_at(&self, at: ScreenPoint) -> Option<&Node> {
		let projector = self.projector();
		self.groups_in_paint_order().into_iter().rev().find(|node| {
			let corners = Cuboid::of(node, &self.config).project(&projector);
			point_in_quad(at, [corners[0], corners[1], corners[2], corners[3]])
		})
	}

	pub fn node_at(&self, at: ScreenPoint) -> Option<&Node> {
		self.device_at(at).or_else(|| self.group_at(at))
	}

	/// Whether `at` is on the height handle of the selected node.
	pub fn handle_hit(&self, at: ScreenPoint) -> Option<&Node> {
		let node = self.nodes.get(self.selected.as_deref()?)?;
		if node.is_group() {
			return None;
		}
		let handle = self.projector().project(geometry::handle_anchor(node, &self.config));
		(handle.distance(at) < self.config.handle_hit_radius).then_some(node)
	}

	/// Moves a node on the ground plane. Groups carry their members along;
	/// members refresh their parent's bounds. Returns every node that moved.
	pub fn move_node(&mut self, id: &str, dx: f64, dz: f64) -> Vec<(String, f64, f64)> {
		let Some(node) = self.nodes.get(id) else {
			return Vec::new();
		};
		let (is_group, parent, children) = (node.is_group(), node.parent.clone(), node.children.clone());

		let mut moved = Vec::new();
		let mut shift = |arena: &mut NodeArena, id: &str| {
			if let Some(n) = arena.get_mut(id) {
				n.x += dx;
				n.z += dz;
				moved.push((n.id.clone(), n.x, n.z));
			}
		};
		shift(&mut self.nodes, id);
		if is_group {
			for child in &children {
				shift(&mut self.nodes, child);
			}
			self.nodes.refresh_group(id, &self.config);
		} else if let Some(parent) = parent {
			self.nodes.refresh_group(&parent, &self.config);
		}
		moved
	}

	pub fn place_node(&mut self, id: &str, x: f64, z: f64) -> Vec<(String, f64, f64)> {
		match self.nodes.get(id) {
			Some(node) => {
				let (dx, dz) = (x - node.x, z - node.z);
				self.move_node(id, dx, dz)
			}
			None => Vec::new(),
		}
	}

	/// Sets a clamped height and returns it.
	pub fn set_node_height(&mut self, id: &str, height: f64) -> Option<f64> {
		let clamped = self.config.clamp_height(height);
		let node = self.nodes.get_mut(id)?;
		node.height = clamped;
		Some(clamped)
	}

	fn log_dangling_edges(&self) {
		for edge in &self.edges {
			match (self.nodes.get(&edge.source), self.nodes.get(&edge.target)) {
				(Some(source), Some(target)) => {
					if (source.x, source.z) == (target.x, target.z) {
						debug!("edge {:?} skipped: endpoints coincide", edge.id);
					}
				}
				_ => debug!(
					"edge {:?} skipped: {:?} -> {:?} does not resolve",
					edge.id, edge.source, edge.target
				),
			}
		}
	}
}

/// Point-in-convex-quad by consistent cross-product sign.
pub fn point_in_quad(p: ScreenPoint, quad: [ScreenPoint; 4]) -> bool {
	let mut sign = 0.0;
	for i in 0..4 {
		let (a, b) = (quad[i], quad[(i + 1) % 4]);
		let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
		if cross.abs() < 1e-12 {
			continue;
		}
		if sign == 0.0 {
			sign = cross.signum();
		} else if cross.signum() != sign {
			return false;
		}
	}
	true
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::isometric::types::{NodeKind, Point3};

	fn state_with(nodes: Vec<Node>) -> DiagramState {
		let data = TopologyData {
			nodes,
			edges: Vec::new(),
		};
		DiagramState::new(&data, 800.0, 600.0, EngineConfig::default())
	}

	fn site() -> Vec<Node> {
		vec![
			Node::new("site", 0.0, 0.0, 0.2).with_kind(NodeKind::Group),
			Node::new("r1", 0.0, 0.0, 1.0).with_parent("site"),
			Node::new("s1", 240.0, 120.0, 1.0).with_parent("site"),
		]
	}

	#[test]
	fn arena_links_members_and_sizes_groups() {
		let state = state_with(site());
		let group = state.nodes.get("site").unwrap();
		assert_eq!(group.children, vec!["r1".to_string(), "s1".to_string()]);
		assert_eq!((group.x, group.z), (120.0, 60.0));
		assert_eq!(group.width, Some(390.0));
	}

	#[test]
	fn arena_drops_duplicates_and_clamps_heights() {
		let state = state_with(vec![
			Node::new("a", 0.0, 0.0, -2.0),
			Node::new("a", 50.0, 0.0, 1.0),
		]);
		assert_eq!(state.nodes.len(), 1);
		assert_eq!(state.nodes.get("a").unwrap().height, 0.1);
		assert_eq!(state.nodes.get("a").unwrap().x, 0.0);
	}

	#[test]
	fn dragging_a_group_carries_members() {
		let mut state = state_with(site());
		let moved = state.move_node("site", 120.0, -120.0);
		assert_eq!(moved.len(), 3);
		assert_eq!(state.nodes.get("r1").map(|n| (n.x, n.z)), Some((120.0, -120.0)));
		assert_eq!(state.nodes.get("s1").map(|n| (n.x, n.z)), Some((360.0, 0.0)));
		let group = state.nodes.get("site").unwrap();
		assert_eq!((group.x, group.z), (240.0, -60.0));
	}

	#[test]
	fn moving_a_member_refreshes_its_group() {
		let mut state = state_with(site());
		state.move_node("s1", 240.0, 0.0);
		let group = state.nodes.get("site").unwrap();
		assert_eq!(group.x, 240.0);
		assert_eq!(group.width, Some(630.0));
	}

	#[test]
	fn group_never_contains_itself() {
		let mut looped = Node::new("site", 0.0, 0.0, 0.2)
			.with_kind(NodeKind::Group)
			.with_parent("site");
		looped.children.push("site".to_string());
		let mut state = state_with(vec![looped]);
		assert!(state.nodes.get("site").unwrap().children.is_empty());
		for _ in 0..5 {
			state.move_node("site", 10.0, 0.0);
		}
		let group = state.nodes.get("site").unwrap();
		assert_eq!((group.width, group.depth), (Some(200.0), Some(100.0)));
		assert_eq!(group.x, 50.0);
	}

	#[test]
	fn selection_is_cleared_when_node_disappears() {
		let mut state = state_with(site());
		state.set_selection(Some("r1"));
		assert_eq!(state.selected.as_deref(), Some("r1"));
		state.set_nodes(vec![Node::new("s1", 0.0, 0.0, 1.0)]);
		assert_eq!(state.selected, None);
		state.set_selection(Some("missing"));
		assert_eq!(state.selected, None);
	}

	#[test]
	fn front_most_device_wins_hit_test() {
		let state = state_with(vec![
			Node::new("back", 0.0, 0.0, 1.0),
			Node::new("front", 10.0, 10.0, 1.0),
		]);
		let at = state
			.projector()
			.project(geometry::hit_anchor(state.nodes.get("back").unwrap(), &state.config));
		assert_eq!(state.device_at(at).map(|n| n.id.as_str()), Some("front"));
	}

	#[test]
	fn group_plate_is_hit_between_members() {
		let state = state_with(site());
		let center = state.projector().project(Point3::new(120.0, 0.0, 60.0));
		assert_eq!(state.device_at(center).map(|n| n.id.as_str()), None);
		assert_eq!(state.node_at(center).map(|n| n.id.as_str()), Some("site"));
	}

	#[test]
	fn quad_containment() {
		let quad = [
			ScreenPoint::new(0.0, 0.0),
			ScreenPoint::new(10.0, 0.0),
			ScreenPoint::new(10.0, 10.0),
			ScreenPoint::new(0.0, 10.0),
		];
		assert!(point_in_quad(ScreenPoint::new(5.0, 5.0), quad));
		assert!(!point_in_quad(ScreenPoint::new(15.0, 5.0), quad));
	}
}
