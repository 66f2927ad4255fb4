/// Device role of a node. Groups are sites that contain other nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Router,
	Switch,
	#[default]
	Server,
	Client,
	Group,
}

impl NodeKind {
	pub fn default_color(self) -> &'static str {
		match self {
			NodeKind::Router => "#e74c3c",
			NodeKind::Switch => "#3498db",
			NodeKind::Server => "#2ecc71",
			NodeKind::Client => "#f39c12",
			NodeKind::Group => "#95a5a6",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub kind: NodeKind,
	pub x: f64,
	pub z: f64,
	pub height: f64,
	pub width: Option<f64>,
	pub depth: Option<f64>,
	pub color: Option<String>,
	pub label: String,
	pub parent: Option<String>,
	/// Member ids, only meaningful on groups.
	pub children: Vec<String>,
}

impl Node {
	pub fn new(id: impl Into<String>, x: f64, z: f64, height: f64) -> Self {
		let id = id.into();
		Self {
			label: id.clone(),
			id,
			kind: NodeKind::default(),
			x,
			z,
			height,
			width: None,
			depth: None,
			color: None,
			parent: None,
			children: Vec::new(),
		}
	}

	pub fn with_kind(mut self, kind: NodeKind) -> Self {
		self.kind = kind;
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	pub fn with_color(mut self, color: impl Into<String>) -> Self {
		self.color = Some(color.into());
		self
	}

	pub fn with_footprint(mut self, width: f64, depth: f64) -> Self {
		self.width = Some(width);
		self.depth = Some(depth);
		self
	}

	pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
		self.parent = Some(parent.into());
		self
	}

	pub fn is_group(&self) -> bool {
		self.kind == NodeKind::Group
	}

	/// Configured color, or the kind's default.
	pub fn base_color(&self) -> &str {
		self.color.as_deref().unwrap_or(self.kind.default_color())
	}

	/// Ground-plane depth key used for painter's ordering.
	pub fn depth_key(&self) -> f64 {
		self.x + self.z
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
	pub id: String,
	pub source: String,
	pub target: String,
}

impl Edge {
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopologyData {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

/// A world-space point: `y` is up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point3 {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Point3 {
	pub const fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}
}

/// A screen-space point in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
	pub x: f64,
	pub y: f64,
}

impl ScreenPoint {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: ScreenPoint) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Outbound notifications for the host application.
#[derive(Clone, Debug, PartialEq)]
pub enum DiagramEvent {
	NodeSelect(String),
	NodeHeightChange { id: String, height: f64 },
	NodePositionChange { id: String, x: f64, z: f64 },
	NodeAdd { x: f64, z: f64 },
	NodeDelete(String),
	HoverChange(Option<String>),
}
