//! Leptos component wrapping the author graph canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for node clicks, dragging, panning, and zooming. An animation loop
//! runs via `requestAnimationFrame`, animating highlights and influence dashes
//! and redrawing each frame. A new `AuthorGraph` value rebuilds the scene and
//! refits the view.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::scale::ScaleConfig;
use super::state::GraphScene;
use super::theme::Theme;
use super::types::NodeClick;
use crate::model::AuthorGraph;

const ZOOM_STEP: f64 = 1.2;
const FALLBACK_WIDTH: f64 = 800.0;

/// Bundles the scene with visual configuration.
struct GraphContext {
	scene: GraphScene,
	scale: ScaleConfig,
	theme: Theme,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;
type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Browser callbacks registered by a mounted graph.
///
/// The animation closure re-arms itself through `animate`, so it keeps itself
/// (and the scene it draws) alive until [`Handles::release`] breaks the cycle.
#[derive(Default)]
struct Handles {
	animate: SharedClosure,
	frame: Rc<Cell<Option<i32>>>,
	resize: Option<Closure<dyn FnMut()>>,
}

impl Handles {
	/// Cancel the pending frame, detach the resize listener and drop both
	/// closures. Safe to call more than once.
	fn release(&mut self) {
		let (frame, resize) = (self.frame.take(), self.resize.take());
		if (frame.is_some() || resize.is_some())
			&& let Some(window) = web_sys::window()
		{
			if let Some(id) = frame {
				let _ = window.cancel_animation_frame(id);
			}
			if let Some(on_resize) = resize
				&& window
					.remove_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
					.is_err()
			{
				warn!("reading-graph: could not detach resize listener");
			}
			debug!("reading-graph: graph view released");
		}
		self.animate.borrow_mut().take();
	}
}

fn canvas_width(canvas: &HtmlCanvasElement) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(FALLBACK_WIDTH)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(callback.as_ref().unchecked_ref())
		.ok()
}

fn start_animation(context: SharedContext, ctx: CanvasRenderingContext2d, handles: &Handles) {
	let (animate_inner, frame) = (handles.animate.clone(), handles.frame.clone());
	*handles.animate.borrow_mut() = Some(Closure::new(move || {
		if let Some(ref mut c) = *context.borrow_mut() {
			c.scene.tick(0.016);
			render::render(&c.scene, &ctx, &c.scale, &c.theme);
		}
		if let Some(ref cb) = *animate_inner.borrow() {
			frame.set(request_frame(cb));
		}
	}));
	let first = handles.animate.borrow().as_ref().and_then(request_frame);
	handles.frame.set(first);
	if first.is_none() {
		warn!("reading-graph: requestAnimationFrame unavailable, graph will not render");
	}
}

fn listen_for_resize(context: SharedContext, canvas: HtmlCanvasElement) -> Option<Closure<dyn FnMut()>> {
	let window = web_sys::window()?;
	let on_resize = Closure::<dyn FnMut()>::new(move || {
		let width = canvas_width(&canvas);
		canvas.set_width(width as u32);
		if let Some(ref mut c) = *context.borrow_mut() {
			let height = c.scene.height;
			c.scene.resize(width, height);
		}
	});
	if window
		.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
		.is_err()
	{
		warn!("reading-graph: could not attach resize listener");
		return None;
	}
	Some(on_resize)
}

/// Renders an [`AuthorGraph`] as an interactive layered diagram on a canvas.
///
/// The canvas fills its parent's width and is `height` pixels tall. Clicking a
/// node (press and release without dragging) invokes `on_node_click` with the
/// node's id and type.
#[component]
pub fn AuthorGraphView(
	/// Graph to draw; a new value rebuilds the scene and refits the view.
	#[prop(into)]
	data: Signal<AuthorGraph>,
	/// Called when a node is clicked without being dragged.
	#[prop(optional, into)]
	on_node_click: Option<Callback<NodeClick>>,
	/// Canvas height in pixels.
	#[prop(default = 600.0)]
	height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let handles = StoredValue::new_local(Handles::default());

	// Runs before the owner disposes `handles`.
	on_cleanup(move || handles.update_value(Handles::release));

	let context_init = context.clone();
	Effect::new(move |started: Option<bool>| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return false;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let width = canvas_width(&canvas);
		canvas.set_width(width as u32);
		canvas.set_height(height as u32);

		debug!(
			"reading-graph: building scene with {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);
		*context_init.borrow_mut() = Some(GraphContext {
			scene: GraphScene::from_graph(&graph, width, height),
			scale: ScaleConfig::default(),
			theme: Theme::default(),
		});

		if started == Some(true) {
			return true;
		}
		let Some(ctx) = context_2d(&canvas) else {
			warn!("reading-graph: 2d canvas context unavailable");
			return false;
		};
		handles.update_value(|h| {
			h.resize = listen_for_resize(context_init.clone(), canvas);
			start_animation(context_init.clone(), ctx, h);
		});
		true
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			c.scene.press(x, y);
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.scene.pointer_move(x, y);
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		let click = context_mu
			.borrow_mut()
			.as_mut()
			.and_then(|c| c.scene.release());
		if let (Some(click), Some(callback)) = (click, on_node_click) {
			callback.run(click);
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.scene.leave();
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			c.scene.zoom_at(x, y, factor, &c.scale);
		}
	};

	let context_zi = context.clone();
	let zoom_in = move |_| {
		if let Some(ref mut c) = *context_zi.borrow_mut() {
			c.scene.zoom_by(ZOOM_STEP, &c.scale);
		}
	};
	let context_zo = context.clone();
	let zoom_out = move |_| {
		if let Some(ref mut c) = *context_zo.borrow_mut() {
			c.scene.zoom_by(1.0 / ZOOM_STEP, &c.scale);
		}
	};
	let context_fit = context;
	let fit_view = move |_| {
		if let Some(ref mut c) = *context_fit.borrow_mut() {
			c.scene.fit_view();
		}
	};

	view! {
		<div class="author-graph" style="position: relative; width: 100%;">
			<canvas
				node_ref=canvas_ref
				class="author-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab; border: 1px solid #e5e7eb; border-radius: 8px;"
			/>
			<div
				class="author-graph-controls"
				style="position: absolute; left: 12px; bottom: 12px; display: flex; flex-direction: column; gap: 4px;"
			>
				<button type="button" title="Zoom in" on:click=zoom_in>"+"</button>
				<button type="button" title="Zoom out" on:click=zoom_out>"−"</button>
				<button type="button" title="Fit view" on:click=fit_view>"⤢"</button>
			</div>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn release_empties_every_slot_and_can_repeat() {
		let mut handles = Handles::default();
		handles.release();
		handles.release();
		assert!(handles.animate.borrow().is_none());
		assert_eq!(handles.frame.get(), None);
		assert!(handles.resize.is_none());
	}
}
