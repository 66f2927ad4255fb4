use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scene::{DrawCommand, Frame, Stroke};
use super::types::ScreenPoint;

pub fn render(frame: &Frame, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&frame.background.to_css());
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
	ctx.set_line_join("round");
	ctx.set_line_cap("round");
	for command in &frame.commands {
		draw(command, ctx);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw(command: &DrawCommand, ctx: &CanvasRenderingContext2d) {
	match command {
		DrawCommand::Polygon {
			points,
			fill,
			fill_alpha,
			stroke,
			..
		} => {
			if !trace(ctx, points) {
				return;
			}
			ctx.close_path();
			ctx.set_fill_style_str(&fill.to_css_alpha(*fill_alpha));
			ctx.fill();
			if let Some(stroke) = stroke {
				apply_stroke(ctx, stroke);
				ctx.stroke();
			}
		}
		DrawCommand::Polyline { points, stroke, .. } => {
			if !trace(ctx, points) {
				return;
			}
			apply_stroke(ctx, stroke);
			ctx.stroke();
		}
		DrawCommand::Text {
			at,
			text,
			color,
			size,
			bold,
			..
		} => {
			let weight = if *bold { "bold " } else { "" };
			ctx.set_font(&format!("{weight}{size}px Arial, sans-serif"));
			ctx.set_text_align("center");
			ctx.set_fill_style_str(&color.to_css());
			let _ = ctx.fill_text(text, at.x, at.y);
		}
	}
}

fn trace(ctx: &CanvasRenderingContext2d, points: &[ScreenPoint]) -> bool {
	let [first, rest @ ..] = points else {
		return false;
	};
	ctx.begin_path();
	ctx.move_to(first.x, first.y);
	for p in rest {
		ctx.line_to(p.x, p.y);
	}
	true
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke) {
	ctx.set_stroke_style_str(&stroke.color.to_css_alpha(stroke.alpha));
	ctx.set_line_width(stroke.width);
	match stroke.dash {
		Some(dash) => {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash.on),
				&JsValue::from_f64(dash.off),
			));
			ctx.set_line_dash_offset(dash.offset);
		}
		None => {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}
	}
}
