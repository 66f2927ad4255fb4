use leptos::prelude::*;
use log::debug;

use crate::components::isometric::{DiagramEvent, Edge, IsometricCanvas, Node, NodeKind, TopologyData};

/// A small two-site network used as the demo topology.
fn sample_topology() -> TopologyData {
	let nodes = vec![
		Node::new("hq", 0.0, 0.0, 0.1)
			.with_kind(NodeKind::Group)
			.with_label("Headquarters"),
		Node::new("branch", 0.0, 240.0, 0.1)
			.with_kind(NodeKind::Group)
			.with_label("Branch Office"),
		Node::new("1", 0.0, 0.0, 1.0)
			.with_kind(NodeKind::Router)
			.with_color("#4285f4")
			.with_label("Development")
			.with_parent("hq"),
		Node::new("2", 240.0, 0.0, 2.0)
			.with_kind(NodeKind::Switch)
			.with_color("#ea4335")
			.with_label("Management")
			.with_parent("hq"),
		Node::new("3", 480.0, 0.0, 1.5)
			.with_kind(NodeKind::Server)
			.with_color("#34a853")
			.with_label("Production")
			.with_parent("hq"),
		Node::new("4", 120.0, 240.0, 0.8)
			.with_kind(NodeKind::Client)
			.with_color("#fbbc04")
			.with_label("Sales")
			.with_parent("branch"),
		Node::new("5", 360.0, 240.0, 2.5)
			.with_kind(NodeKind::Server)
			.with_color("#ff6d01")
			.with_label("IT")
			.with_footprint(60.0, 60.0)
			.with_parent("branch"),
	];
	let edges = vec![
		Edge::new("e1", "1", "2"),
		Edge::new("e2", "2", "3"),
		Edge::new("e3", "1", "4"),
		Edge::new("e4", "4", "5"),
		Edge::new("e5", "2", "5"),
	];
	TopologyData { nodes, edges }
}

const NEW_NODE_COLORS: [&str; 5] = ["#4285f4", "#ea4335", "#34a853", "#fbbc04", "#ff6d01"];

fn next_node_id(data: &TopologyData) -> String {
	(data.nodes.len() + 1..)
		.map(|n| format!("node-{n}"))
		.find(|id| data.nodes.iter().all(|node| &node.id != id))
		.unwrap_or_default()
}

/// Applies an engine notification to the host-owned topology.
fn apply_event(data: &mut TopologyData, selected: &mut Option<String>, event: &DiagramEvent) {
	match event {
		DiagramEvent::NodeSelect(id) => {
			*selected = Some(id.clone());
		}
		DiagramEvent::NodeHeightChange { id, height } => {
			if let Some(node) = data.nodes.iter_mut().find(|n| &n.id == id) {
				node.height = *height;
			}
		}
		DiagramEvent::NodePositionChange { id, x, z } => {
			if let Some(node) = data.nodes.iter_mut().find(|n| &n.id == id) {
				node.x = *x;
				node.z = *z;
			}
		}
		DiagramEvent::NodeAdd { x, z } => {
			let id = next_node_id(data);
			let color = NEW_NODE_COLORS[data.nodes.len() % NEW_NODE_COLORS.len()];
			data.nodes.push(
				Node::new(id.clone(), *x, *z, 1.0)
					.with_color(color)
					.with_label(format!("Server {}", data.nodes.len() + 1)),
			);
			*selected = Some(id);
		}
		DiagramEvent::NodeDelete(id) => {
			data.nodes.retain(|n| &n.id != id);
			for node in &mut data.nodes {
				node.children.retain(|c| c != id);
				if node.parent.as_ref() == Some(id) {
					node.parent = None;
				}
			}
			data.edges.retain(|e| &e.source != id && &e.target != id);
			if selected.as_ref() == Some(id) {
				*selected = None;
			}
		}
		DiagramEvent::HoverChange(_) => {}
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let topology = RwSignal::new(sample_topology());
	let rotation = RwSignal::new(0.0_f64);
	let show_grid = RwSignal::new(true);
	let selected = RwSignal::new(None::<String>);
	let hovered = RwSignal::new(None::<String>);

	let on_event = move |event: DiagramEvent| {
		debug!("diagram event {event:?}");
		if let DiagramEvent::HoverChange(id) = &event {
			hovered.set(id.clone());
			return;
		}
		let mut sel = selected.get_untracked();
		topology.update(|data| apply_event(data, &mut sel, &event));
		if sel != selected.get_untracked() {
			selected.set(sel);
		}
	};

	let status = move || {
		let id = hovered.get().or_else(|| selected.get());
		let label = id.and_then(|id| {
			topology.with(|data| {
				data.nodes
					.iter()
					.find(|n| n.id == id)
					.map(|n| format!("{} ({:?}, height {:.1})", n.label, n.kind, n.height))
			})
		});
		label.unwrap_or_else(|| "Nothing selected".to_string())
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<IsometricCanvas
					data=topology
					rotation=rotation
					show_grid=show_grid
					selected=selected
					on_event=on_event
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Network Topology"</h1>
					<p class="subtitle">
						"Drag devices to move them, Shift-drag or the handle to change height. "
						"Double-click to add, right-click to delete. Scroll to zoom."
					</p>
					<label>
						"Rotation "
						<input
							type="range"
							min="0"
							max="360"
							step="1"
							prop:value=move || rotation.get().to_string()
							on:input=move |ev| {
								if let Ok(deg) = event_target_value(&ev).parse::<f64>() {
									rotation.set(deg);
								}
							}
						/>
						{move || format!(" {:.0}°", rotation.get())}
					</label>
					<label>
						<input
							type="checkbox"
							prop:checked=move || show_grid.get()
							on:change=move |ev| show_grid.set(event_target_checked(&ev))
						/>
						" Grid"
					</label>
					<p class="status">{status}</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn delete_drops_edges_and_selection() {
		let mut data = sample_topology();
		let mut selected = Some("2".to_string());
		apply_event(&mut data, &mut selected, &DiagramEvent::NodeDelete("2".into()));
		assert!(data.nodes.iter().all(|n| n.id != "2"));
		assert!(data.edges.iter().all(|e| e.source != "2" && e.target != "2"));
		assert_eq!(data.edges.len(), 2);
		assert_eq!(selected, None);
	}

	#[test]
	fn add_generates_fresh_id() {
		let mut data = sample_topology();
		let mut selected = None;
		apply_event(&mut data, &mut selected, &DiagramEvent::NodeAdd { x: 120.0, z: 120.0 });
		let added = data.nodes.last().unwrap();
		assert_eq!(added.id, "node-8");
		assert_eq!((added.x, added.z), (120.0, 120.0));
		assert_eq!(selected.as_deref(), Some("node-8"));
	}
}
