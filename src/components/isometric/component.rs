use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use super::config::EngineConfig;
use super::controller::{DragMode, Modifiers, PointerButton};
use super::render;
use super::scene;
use super::state::DiagramState;
use super::types::{DiagramEvent, ScreenPoint, TopologyData};

type SharedState = Rc<RefCell<Option<DiagramState>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> ScreenPoint {
	let rect = canvas.get_bounding_client_rect();
	ScreenPoint::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn modifiers(ev: &MouseEvent) -> Modifiers {
	Modifiers {
		shift: ev.shift_key(),
		ctrl: ev.ctrl_key(),
		meta: ev.meta_key(),
	}
}

fn cursor_for(state: &DiagramState) -> &'static str {
	match state.drag_mode() {
		DragMode::Camera | DragMode::Move => "grabbing",
		DragMode::Height => "ns-resize",
		DragMode::None if state.hovered.is_some() => "pointer",
		DragMode::None => "grab",
	}
}

#[component]
pub fn IsometricCanvas(
	#[prop(into)] data: Signal<TopologyData>,
	#[prop(into)] rotation: Signal<f64>,
	#[prop(into)] show_grid: Signal<bool>,
	#[prop(optional, into)] selected: Option<Signal<Option<String>>>,
	#[prop(optional, into)] on_event: Option<Callback<DiagramEvent>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(default = 1.0)] initial_zoom: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	let dispatch = move |events: Vec<DiagramEvent>| {
		if let Some(callback) = on_event {
			for event in events {
				callback.run(event);
			}
		}
	};

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("no window, isometric canvas disabled");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			warn!("canvas has no 2d context, isometric canvas disabled");
			return;
		};

		let mut diagram = DiagramState::new(&data.get_untracked(), w, h, EngineConfig::default());
		diagram.set_rotation(rotation.get_untracked());
		diagram.set_show_grid(show_grid.get_untracked());
		diagram.set_zoom(initial_zoom);
		if let Some(selected) = selected {
			diagram.set_selection(selected.get_untracked().as_deref());
		}
		info!(
			"isometric canvas {}x{} with {} nodes, {} edges",
			w,
			h,
			diagram.nodes.len(),
			diagram.edges.len()
		);
		*state_init.borrow_mut() = Some(diagram);

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				render::render(&scene::build_frame(s), &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_data = state.clone();
	Effect::new(move |_| {
		let data = data.get();
		if let Some(ref mut s) = *state_data.borrow_mut() {
			s.set_nodes(data.nodes);
			s.set_edges(data.edges);
		}
	});

	let state_view = state.clone();
	Effect::new(move |_| {
		let (degrees, grid) = (rotation.get(), show_grid.get());
		if let Some(ref mut s) = *state_view.borrow_mut() {
			s.set_rotation(degrees);
			s.set_show_grid(grid);
		}
	});

	let state_sel = state.clone();
	Effect::new(move |_| {
		let Some(selected) = selected else {
			return;
		};
		let id = selected.get();
		if let Some(ref mut s) = *state_sel.borrow_mut() {
			s.set_selection(id.as_deref());
		}
	});

	// Runs a handler against the state, updates the cursor for the new
	// gesture, then notifies the host once the borrow is released.
	let with_state = {
		let state = state.clone();
		move |f: &dyn Fn(&mut DiagramState, &HtmlCanvasElement) -> Vec<DiagramEvent>| {
			let Some(canvas) = canvas_ref.get() else {
				return;
			};
			let canvas: HtmlCanvasElement = canvas.into();
			let (events, cursor) = match *state.borrow_mut() {
				Some(ref mut s) => (f(s, &canvas), cursor_for(s)),
				None => return,
			};
			let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
			dispatch(events);
		}
	};

	let handler = with_state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		handler(&|s, canvas| {
			s.pointer_down(
				local_point(canvas, &ev),
				PointerButton::from_dom(ev.button()),
				modifiers(&ev),
			)
		});
	};

	let handler = with_state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		handler(&|s, canvas| s.pointer_move(local_point(canvas, &ev)));
	};

	let handler = with_state.clone();
	let on_mouseup = move |_: MouseEvent| {
		handler(&|s, _| s.pointer_up());
	};

	let handler = with_state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		handler(&|s, _| s.pointer_leave());
	};

	let handler = with_state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		handler(&|s, canvas| s.double_click(local_point(canvas, &ev)));
	};

	let handler = with_state.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		handler(&|s, canvas| s.context_menu(local_point(canvas, &ev)));
	};

	let handler = with_state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		handler(&|s, canvas| s.wheel(local_point(canvas, &ev), ev.delta_y()));
	};

	let handler = with_state;
	let on_keydown = move |ev: KeyboardEvent| {
		handler(&|s, _| s.key_down(&ev.key()));
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="isometric-canvas"
			tabindex="0"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:contextmenu=on_contextmenu
			on:wheel=on_wheel
			on:keydown=on_keydown
			style="display: block; cursor: grab; outline: none;"
		/>
	}
}
