//! Leptos component wrapping the particle network canvas.
//!
//! The component creates an HTML canvas sized to its parent and wires pointer
//! enter/move/leave handlers to the hover flag and attraction target. An
//! animation loop runs via `requestAnimationFrame`, advancing the simulation
//! and drawing each frame until the component is unmounted.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, error, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, Window};

use super::config::NetworkConfig;
use super::integrator::REFERENCE_FRAME;
use super::render;
use super::state::NetworkState;
use super::theme::{Theme, ThemeMode};

/// Longest frame the simulation will take in one step, e.g. after a background tab resumes.
const MAX_FRAME_SECONDS: f64 = 0.1;

/// Fallback size when the canvas has no laid-out parent.
const FALLBACK_SIZE: (f64, f64) = (800.0, 600.0);

/// Bundles the simulation with its drawing surface and visual configuration.
struct NetworkContext {
	state: NetworkState,
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	pixel_ratio: f64,
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type ResizeCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// CSS size of the canvas's parent element.
fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or(FALLBACK_SIZE)
}

/// Device pixel ratio clamped to `1.0..=max`.
fn pixel_ratio(window: &Window, max: f64) -> f64 {
	window.device_pixel_ratio().clamp(1.0, max)
}

/// Size the canvas backing store for `width × height` CSS pixels.
fn size_canvas(canvas: &HtmlCanvasElement, width: f64, height: f64, ratio: f64) {
	canvas.set_width((width * ratio).round() as u32);
	canvas.set_height((height * ratio).round() as u32);
}

/// Drop the frame callback and the widget state after unmount.
///
/// The callback captures its own slot, so it must be taken out explicitly for
/// either to be freed.
fn release<F, C>(frame: &RefCell<Option<F>>, context: &RefCell<Option<C>>) {
	frame.borrow_mut().take();
	context.borrow_mut().take();
}

/// Build the widget state for a freshly mounted canvas.
fn mount(
	canvas: &HtmlCanvasElement,
	window: &Window,
	config: NetworkConfig,
	mode: ThemeMode,
) -> Result<NetworkContext, JsValue> {
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or_else(|| JsValue::from_str("2d canvas context unavailable"))?
		.dyn_into()?;

	let (w, h) = parent_size(canvas);
	let ratio = pixel_ratio(window, config.camera.max_pixel_ratio);
	size_canvas(canvas, w, h, ratio);

	let theme = Theme::for_mode(mode).with_glow(config.point_glow);
	let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
	let mut rng = SmallRng::seed_from_u64(seed);
	let mut state = NetworkState::new(config, &theme.palette, w, h, &mut rng);
	state.allocate_buffers();

	info!(
		"particle-network: mounted {} particles on {}x{} canvas (ratio {})",
		state.particles.len(),
		w,
		h,
		ratio
	);

	Ok(NetworkContext {
		state,
		ctx,
		theme,
		pixel_ratio: ratio,
	})
}

/// Renders the decorative particle network on a canvas element.
///
/// The canvas fills its parent, so give the parent an explicit height. Pass
/// the page theme via the reactive `theme` signal; switching it re-tints the
/// existing particles in place.
#[component]
pub fn ParticleNetworkCanvas(
	#[prop(into)] theme: Signal<ThemeMode>,
	#[prop(default = NetworkConfig::default())] config: NetworkConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<NetworkContext>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: ResizeCallback = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let (context_init, animate_init, resize_cb_init, alive_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		alive.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		match mount(&canvas, &window, config.clone(), theme.get_untracked()) {
			Ok(c) => *context_init.borrow_mut() = Some(c),
			Err(e) => {
				error!("particle-network: failed to mount: {:?}", e);
				return;
			}
		}

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = parent_size(&canvas_resize);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.pixel_ratio = pixel_ratio(&win, c.state.config.camera.max_pixel_ratio);
				size_canvas(&canvas_resize, nw, nh, c.pixel_ratio);
				c.state.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner, resize_anim, alive_anim) = (
			context_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			alive_init.clone(),
		);
		let last_frame = Cell::new(None::<f64>);
		*animate_init.borrow_mut() = Some(Closure::new(move |now: f64| {
			let Some(win) = web_sys::window() else {
				return;
			};

			if !alive_anim.load(Ordering::Relaxed) {
				if let Some(cb) = resize_anim.borrow_mut().take() {
					let _ = win
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				release(&animate_inner, &context_anim);
				debug!("particle-network: animation stopped");
				return;
			}

			let seconds = match last_frame.replace(Some(now)) {
				Some(prev) => ((now - prev) / 1000.0).clamp(0.0, MAX_FRAME_SECONDS),
				None => REFERENCE_FRAME as f64,
			};

			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(seconds as f32);
				render::render(&mut c.state, &c.ctx, &c.theme, c.pixel_ratio);
			}

			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_theme = context.clone();
	Effect::new(move |_| {
		let mode = theme.get();
		if let Some(ref mut c) = *context_theme.borrow_mut() {
			if c.theme.mode != mode {
				c.theme = Theme::for_mode(mode).with_glow(c.state.config.point_glow);
				c.state.recolor(&c.theme.palette);
				debug!("particle-network: switched to {} theme", c.theme.name);
			}
		}
	});

	on_cleanup(move || alive.store(false, Ordering::Relaxed));

	let context_pe = context.clone();
	let on_pointerenter = move |_: PointerEvent| {
		if let Some(ref mut c) = *context_pe.borrow_mut() {
			c.state.pointer_enter();
		}
	};

	let context_pm = context.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut c) = *context_pm.borrow_mut() {
			// A pointer already inside the canvas at mount never fires `pointerenter`.
			c.state.pointer_enter();
			c.state.pointer_move(x, y);
		}
	};

	let context_pl = context.clone();
	let on_pointerleave = move |_: PointerEvent| {
		if let Some(ref mut c) = *context_pl.borrow_mut() {
			c.state.pointer_leave();
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-network-canvas"
			on:pointerenter=on_pointerenter
			on:pointermove=on_pointermove
			on:pointerleave=on_pointerleave
			style="display: block; width: 100%; height: 100%; background: transparent;"
		/>
	}
}
