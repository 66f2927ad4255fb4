//! Pointer, wheel and keyboard handling.
//!
//! One gesture at a time: pointer-down picks the gesture from what is under
//! the pointer and the held modifiers, moves feed it incremental deltas and
//! pointer-up returns to idle. Every handler returns the notifications it
//! produced, in order.

use log::{debug, warn};

use super::state::DiagramState;
use super::types::{DiagramEvent, ScreenPoint};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	PanningCamera {
		last: ScreenPoint,
	},
	DraggingNodePosition {
		anchor: String,
		last: ScreenPoint,
	},
	DraggingNodeHeight {
		anchor: String,
		last: ScreenPoint,
	},
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
	None,
	Camera,
	Move,
	Height,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
	pub shift: bool,
	pub ctrl: bool,
	pub meta: bool,
}

impl Modifiers {
	/// Turns a device press into a height edit.
	pub fn height_edit(&self) -> bool {
		self.shift
	}

	/// Ctrl or Cmd: drag a node without touching the selection.
	pub fn move_only(&self) -> bool {
		self.ctrl || self.meta
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	Primary,
	Secondary,
	Other,
}

impl PointerButton {
	pub fn from_dom(button: i16) -> Self {
		match button {
			0 => PointerButton::Primary,
			2 => PointerButton::Secondary,
			_ => PointerButton::Other,
		}
	}
}

impl Gesture {
	pub fn mode(&self) -> DragMode {
		match self {
			Gesture::Idle => DragMode::None,
			Gesture::PanningCamera { .. } => DragMode::Camera,
			Gesture::DraggingNodePosition { .. } => DragMode::Move,
			Gesture::DraggingNodeHeight { .. } => DragMode::Height,
		}
	}

	pub fn anchor(&self) -> Option<&str> {
		match self {
			Gesture::DraggingNodePosition { anchor, .. } | Gesture::DraggingNodeHeight { anchor, .. } => {
				Some(anchor)
			}
			_ => None,
		}
	}
}

impl DiagramState {
	pub fn drag_mode(&self) -> DragMode {
		self.gesture.mode()
	}

	pub fn pointer_down(
		&mut self,
		at: ScreenPoint,
		button: PointerButton,
		modifiers: Modifiers,
	) -> Vec<DiagramEvent> {
		let mut events = Vec::new();
		if button != PointerButton::Primary || self.gesture != Gesture::Idle {
			return events;
		}

		let handle = self.handle_hit(at).map(|n| n.id.clone());
		let hit = self.node_at(at).map(|n| (n.id.clone(), n.is_group()));
		if let Some(anchor) = handle {
			self.gesture = Gesture::DraggingNodeHeight { anchor, last: at };
		} else if let Some((id, is_group)) = hit {
			if modifiers.height_edit() && !is_group {
				self.gesture = Gesture::DraggingNodeHeight { anchor: id, last: at };
			} else if modifiers.move_only() {
				self.gesture = Gesture::DraggingNodePosition { anchor: id, last: at };
			} else {
				self.selected = Some(id.clone());
				events.push(DiagramEvent::NodeSelect(id.clone()));
				self.gesture = Gesture::DraggingNodePosition { anchor: id, last: at };
			}
		} else {
			self.gesture = Gesture::PanningCamera { last: at };
		}
		debug!("pointer down: {:?}", self.gesture.mode());
		events
	}

	pub fn pointer_move(&mut self, at: ScreenPoint) -> Vec<DiagramEvent> {
		if !self.guard_anchor() {
			return Vec::new();
		}
		match std::mem::take(&mut self.gesture) {
			Gesture::Idle => self.update_hover(at),
			Gesture::PanningCamera { last } => {
				self.camera.pan_by(at.x - last.x, at.y - last.y);
				self.gesture = Gesture::PanningCamera { last: at };
				Vec::new()
			}
			Gesture::DraggingNodePosition { anchor, last } => {
				let (dx, dz) = self.projector().screen_delta_to_world(at.x - last.x, at.y - last.y);
				let events: Vec<DiagramEvent> = self
					.move_node(&anchor, dx, dz)
					.into_iter()
					.map(|(id, x, z)| DiagramEvent::NodePositionChange { id, x, z })
					.collect();
				self.gesture = Gesture::DraggingNodePosition { anchor, last: at };
				events
			}
			Gesture::DraggingNodeHeight { anchor, last } => {
				let current = self.nodes.get(&anchor).map_or(self.config.min_height, |n| n.height);
				let target = current + (last.y - at.y) * self.config.height_sensitivity;
				let events: Vec<DiagramEvent> = self
					.set_node_height(&anchor, target)
					.map(|height| DiagramEvent::NodeHeightChange {
						id: anchor.clone(),
						height,
					})
					.into_iter()
					.collect();
				self.gesture = Gesture::DraggingNodeHeight { anchor, last: at };
				events
			}
		}
	}

	/// Ends any gesture. A position drag lands on the snap grid, if any.
	pub fn pointer_up(&mut self) -> Vec<DiagramEvent> {
		if !self.guard_anchor() {
			return Vec::new();
		}
		let gesture = std::mem::take(&mut self.gesture);
		debug!("pointer up: {:?} ended", gesture.mode());
		let Gesture::DraggingNodePosition { anchor, .. } = gesture else {
			return Vec::new();
		};
		let Some(node) = self.nodes.get(&anchor).filter(|n| !n.is_group()) else {
			return Vec::new();
		};
		let (x, z) = self.config.snap(node.x, node.z);
		if (x, z) == (node.x, node.z) {
			return Vec::new();
		}
		self.place_node(&anchor, x, z)
			.into_iter()
			.map(|(id, x, z)| DiagramEvent::NodePositionChange { id, x, z })
			.collect()
	}

	/// Pointer left the surface: finish the gesture and drop hover.
	pub fn pointer_leave(&mut self) -> Vec<DiagramEvent> {
		let mut events = self.pointer_up();
		if self.hovered.take().is_some() {
			events.push(DiagramEvent::HoverChange(None));
		}
		events
	}

	/// Double-click on empty ground requests a new node there. Devices and
	/// group plates both count as occupied.
	pub fn double_click(&mut self, at: ScreenPoint) -> Vec<DiagramEvent> {
		if self.node_at(at).is_some() {
			return Vec::new();
		}
		let (x, z) = self.projector().screen_to_world(at, 0.0);
		let (x, z) = self.config.snap(x, z);
		vec![DiagramEvent::NodeAdd { x, z }]
	}

	/// Context gesture on a node requests its deletion. Selection and the
	/// current gesture are untouched.
	pub fn context_menu(&mut self, at: ScreenPoint) -> Vec<DiagramEvent> {
		self.node_at(at)
			.map(|node| DiagramEvent::NodeDelete(node.id.clone()))
			.into_iter()
			.collect()
	}

	/// Wheel zoom about the pointer. Legal in any gesture.
	pub fn wheel(&mut self, at: ScreenPoint, delta_y: f64) -> Vec<DiagramEvent> {
		let factor = if delta_y > 0.0 {
			self.config.zoom_out_factor
		} else {
			self.config.zoom_in_factor
		};
		self.camera.zoom_by(factor, Some((at, self.viewport)), &self.config);
		Vec::new()
	}

	pub fn key_down(&mut self, key: &str) -> Vec<DiagramEvent> {
		match key {
			"Escape" => {
				self.cancel_gesture();
				Vec::new()
			}
			"Delete" | "Backspace" => self
				.selected
				.clone()
				.map(DiagramEvent::NodeDelete)
				.into_iter()
				.collect(),
			_ => Vec::new(),
		}
	}

	/// Abandons the current gesture without snapping.
	pub fn cancel_gesture(&mut self) {
		if self.gesture != Gesture::Idle {
			debug!("gesture {:?} cancelled", self.gesture.mode());
		}
		self.gesture = Gesture::Idle;
	}

	/// Drops a drag whose anchor is gone. Returns `false` if it did.
	pub(crate) fn guard_anchor(&mut self) -> bool {
		let Some(anchor) = self.gesture.anchor() else {
			return true;
		};
		if self.nodes.contains(anchor) {
			return true;
		}
		warn!("drag anchor {anchor:?} no longer exists, aborting gesture");
		self.gesture = Gesture::Idle;
		false
	}

	fn update_hover(&mut self, at: ScreenPoint) -> Vec<DiagramEvent> {
		let hovered = self.node_at(at).map(|n| n.id.clone());
		if hovered == self.hovered {
			return Vec::new();
		}
		self.hovered = hovered.clone();
		vec![DiagramEvent::HoverChange(hovered)]
	}
}
