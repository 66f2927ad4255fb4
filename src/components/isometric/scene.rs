//! Back-end-agnostic draw list for one frame.
//!
//! Paint order: background grid, group plates, then edges and devices
//! interleaved by depth key. An edge's key is the smaller of its endpoints'
//! keys; on ties edges go before devices.
//!
//! Edges touching the hovered or selected node are highlighted and the
//! rest are dimmed. Dangling and zero-length edges are skipped silently;
//! they are reported once when the working set changes.

use super::color::Rgb;
use super::depth::{self, Face, paint_order};
use super::geometry::{self, Cuboid};
use super::projection::Projector;
use super::routing;
use super::state::DiagramState;
use super::types::{Edge, Node, Point3, ScreenPoint};

const BACKGROUND: Rgb = Rgb::new(0xf8, 0xf9, 0xfa);
const GRID: Rgb = Rgb::new(0xd8, 0xd8, 0xd8);
const OUTLINE: Rgb = Rgb::new(0x33, 0x33, 0x33);
const HOVER_OUTLINE: Rgb = Rgb::new(0xff, 0x6b, 0x35);
const SELECTED_OUTLINE: Rgb = Rgb::new(0xe7, 0x4c, 0x3c);
const SELECTED_FILL: Rgb = Rgb::new(0xff, 0xd1, 0x66);
const HANDLE: Rgb = Rgb::new(0xe7, 0x4c, 0x3c);
const EDGE: Rgb = Rgb::new(0x77, 0x77, 0x77);
const EDGE_HIGHLIGHT: Rgb = Rgb::new(0x34, 0x98, 0xdb);
const EDGE_DIMMED: Rgb = Rgb::new(0x96, 0x96, 0x96);
const ARROW: Rgb = Rgb::new(0x55, 0x55, 0x55);
const LABEL: Rgb = Rgb::new(0x33, 0x33, 0x33);
const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
const BLACK: Rgb = Rgb::new(0, 0, 0);

const EDGE_DASH: f64 = 8.0;
const EDGE_GAP: f64 = 4.0;
const EDGE_FLOW_SPEED: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
	pub color: Rgb,
	pub alpha: f64,
	pub width: f64,
	pub dash: Option<Dash>,
}

impl Stroke {
	pub fn solid(color: Rgb, width: f64) -> Self {
		Self {
			color,
			alpha: 1.0,
			width,
			dash: None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
	pub on: f64,
	pub off: f64,
	pub offset: f64,
}

/// What a drawable belongs to, for adapters that want to group output.
#[derive(Clone, Debug, PartialEq)]
pub enum Owner {
	Grid,
	Group(String),
	Edge(String),
	Node(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
	Polygon {
		owner: Owner,
		face: Option<Face>,
		points: Vec<ScreenPoint>,
		fill: Rgb,
		fill_alpha: f64,
		stroke: Option<Stroke>,
	},
	Polyline {
		owner: Owner,
		points: Vec<ScreenPoint>,
		stroke: Stroke,
	},
	Text {
		owner: Owner,
		at: ScreenPoint,
		text: String,
		color: Rgb,
		size: f64,
		bold: bool,
	},
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
	pub width: f64,
	pub height: f64,
	pub background: Rgb,
	pub commands: Vec<DrawCommand>,
}

enum Item<'a> {
	Edge(&'a Edge, &'a Node, &'a Node),
	Device(&'a Node),
}

pub fn build_frame(state: &DiagramState) -> Frame {
	let projector = state.projector();
	let mut commands = Vec::new();

	if state.show_grid {
		push_grid(state, &projector, &mut commands);
	}
	for group in state.groups_in_paint_order() {
		push_group(state, &projector, group, &mut commands);
	}

	let mut items = Vec::new();
	for edge in &state.edges {
		match (state.nodes.get(&edge.source), state.nodes.get(&edge.target)) {
			(Some(source), Some(target)) => {
				let key = source.depth_key().min(target.depth_key());
				items.push((key, Item::Edge(edge, source, target)));
			}
			_ => {}
		}
	}
	for node in state.nodes.iter().filter(|n| !n.is_group()) {
		items.push((node.depth_key(), Item::Device(node)));
	}
	for item in paint_order(items) {
		match item {
			Item::Edge(edge, source, target) => {
				push_edge(state, &projector, edge, source, target, &mut commands)
			}
			Item::Device(node) => push_device(state, &projector, node, &mut commands),
		}
	}

	Frame {
		width: state.viewport.width,
		height: state.viewport.height,
		background: BACKGROUND,
		commands,
	}
}

fn push_grid(state: &DiagramState, projector: &Projector, out: &mut Vec<DrawCommand>) {
	let (cell, n) = (state.config.grid_cell, state.config.grid_extent);
	let reach = n as f64 * cell;
	let stroke = Stroke {
		alpha: 0.6,
		..Stroke::solid(GRID, 0.5)
	};
	for i in -n..=n {
		let at = i as f64 * cell;
		for (from, to) in [
			(Point3::new(at, 0.0, -reach), Point3::new(at, 0.0, reach)),
			(Point3::new(-reach, 0.0, at), Point3::new(reach, 0.0, at)),
		] {
			out.push(DrawCommand::Polyline {
				owner: Owner::Grid,
				points: vec![projector.project(from), projector.project(to)],
				stroke,
			});
		}
	}
}

fn outline_for(state: &DiagramState, id: &str) -> Stroke {
	if state.hovered.as_deref() == Some(id) {
		Stroke::solid(HOVER_OUTLINE, 3.0)
	} else if state.selected.as_deref() == Some(id) {
		Stroke::solid(SELECTED_OUTLINE, 2.0)
	} else {
		Stroke::solid(OUTLINE, 1.0)
	}
}

fn push_group(state: &DiagramState, projector: &Projector, group: &Node, out: &mut Vec<DrawCommand>) {
	let color = Rgb::parse_or_fallback(group.base_color());
	let corners = Cuboid::of(group, &state.config).project(projector);
	let plate = corners[..4].to_vec();
	let mut stroke = outline_for(state, &group.id);
	if stroke.color == OUTLINE {
		stroke = Stroke::solid(color.darken(0.2), 1.5);
	}
	stroke.dash = Some(Dash {
		on: 6.0,
		off: 4.0,
		offset: 0.0,
	});

	// label below whichever corner is nearest the viewer
	let front = plate
		.iter()
		.copied()
		.fold(plate[0], |best, p| if p.y > best.y { p } else { best });
	let owner = Owner::Group(group.id.clone());
	out.push(DrawCommand::Polygon {
		owner: owner.clone(),
		face: None,
		points: plate,
		fill: color,
		fill_alpha: 0.12,
		stroke: Some(stroke),
	});
	out.push(DrawCommand::Text {
		owner: owner.clone(),
		at: ScreenPoint::new(front.x, front.y + 18.0),
		text: group.label.clone(),
		color: color.darken(0.4),
		size: 13.0,
		bold: true,
	});
	if !group.children.is_empty() {
		out.push(DrawCommand::Text {
			owner,
			at: ScreenPoint::new(front.x, front.y + 34.0),
			text: match group.children.len() {
				1 => "1 node".to_string(),
				n => format!("{n} nodes"),
			},
			color: color.darken(0.3),
			size: 11.0,
			bold: false,
		});
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Emphasis {
	Normal,
	Highlighted,
	Dimmed,
}

/// Edges incident to the hovered or selected node stand out while one exists.
fn edge_emphasis(state: &DiagramState, edge: &Edge) -> Emphasis {
	let focus = [state.hovered.as_deref(), state.selected.as_deref()];
	if focus.iter().all(Option::is_none) {
		return Emphasis::Normal;
	}
	let touches = |id: &str| focus.iter().any(|f| *f == Some(id));
	if touches(&edge.source) || touches(&edge.target) {
		Emphasis::Highlighted
	} else {
		Emphasis::Dimmed
	}
}

fn push_edge(
	state: &DiagramState,
	projector: &Projector,
	edge: &Edge,
	source: &Node,
	target: &Node,
	out: &mut Vec<DrawCommand>,
) {
	let anchor = |n: &Node| {
		if state.config.snap_edge_anchors {
			state.config.snap(n.x, n.z)
		} else {
			(n.x, n.z)
		}
	};
	let path = routing::manhattan_path(anchor(source), anchor(target));
	let points = routing::project_path(&path, projector);
	let Some(head) = routing::arrowhead(&points, state.config.arrow_size) else {
		return;
	};
	let owner = Owner::Edge(edge.id.clone());
	let (color, alpha, width) = match edge_emphasis(state, edge) {
		Emphasis::Normal => (EDGE, 1.0, 3.0),
		Emphasis::Highlighted => (EDGE_HIGHLIGHT, 1.0, 4.0),
		Emphasis::Dimmed => (EDGE_DIMMED, 0.3, 1.0),
	};

	out.push(DrawCommand::Polyline {
		owner: owner.clone(),
		points: points.iter().map(|p| ScreenPoint::new(p.x + 2.0, p.y + 2.0)).collect(),
		stroke: Stroke {
			alpha: 0.2,
			..Stroke::solid(BLACK, 4.0)
		},
	});
	out.push(DrawCommand::Polyline {
		owner: owner.clone(),
		points,
		stroke: Stroke {
			dash: Some(Dash {
				on: EDGE_DASH,
				off: EDGE_GAP,
				offset: -(state.flow_time * EDGE_FLOW_SPEED) % (EDGE_DASH + EDGE_GAP),
			}),
			alpha,
			..Stroke::solid(color, width)
		},
	});
	out.push(DrawCommand::Polygon {
		owner,
		face: None,
		points: head.points.to_vec(),
		fill: if color == EDGE { ARROW } else { color },
		fill_alpha: alpha,
		stroke: Some(Stroke::solid(OUTLINE, 0.5)),
	});
}

fn push_device(state: &DiagramState, projector: &Projector, node: &Node, out: &mut Vec<DrawCommand>) {
	let config = &state.config;
	let selected = state.selected.as_deref() == Some(node.id.as_str());
	let base = if selected {
		SELECTED_FILL
	} else {
		Rgb::parse_or_fallback(node.base_color())
	};
	let cuboid = Cuboid::of(node, config);
	let corners = cuboid.project(projector);
	let stroke = outline_for(state, &node.id);
	let owner = Owner::Node(node.id.clone());

	for face in depth::visible_faces(state.camera.rotation_deg(), cuboid.extent, config.bottom_face_max_extent) {
		out.push(DrawCommand::Polygon {
			owner: owner.clone(),
			face: Some(face),
			points: face.corners().iter().map(|&i| corners[i]).collect(),
			fill: base.shade(face),
			fill_alpha: 1.0,
			stroke: Some(stroke),
		});
	}

	out.push(DrawCommand::Text {
		owner: owner.clone(),
		at: projector.project(geometry::label_anchor(node, config)),
		text: node.label.clone(),
		color: LABEL,
		size: 12.0,
		bold: true,
	});

	if selected {
		let top = projector.project(geometry::top_center(node, config));
		let handle = projector.project(geometry::handle_anchor(node, config));
		out.push(DrawCommand::Polyline {
			owner: owner.clone(),
			points: vec![top, handle],
			stroke: Stroke {
				dash: Some(Dash {
					on: 3.0,
					off: 3.0,
					offset: 0.0,
				}),
				..Stroke::solid(HANDLE, 2.0)
			},
		});
		out.push(DrawCommand::Polygon {
			owner,
			face: None,
			points: vec![
				ScreenPoint::new(handle.x, handle.y - 8.0),
				ScreenPoint::new(handle.x - 6.0, handle.y + 4.0),
				ScreenPoint::new(handle.x + 6.0, handle.y + 4.0),
			],
			fill: HANDLE,
			fill_alpha: 1.0,
			stroke: Some(Stroke::solid(WHITE, 2.0)),
		});
	}
}
