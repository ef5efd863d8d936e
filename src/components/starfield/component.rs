//! Leptos component wrapping the starfield canvas.
//!
//! The component creates a fixed full-viewport canvas and, once mounted, wires
//! window events (resize, pointer, scroll, touch, load) into the animator. The
//! animation loop itself is started lazily: after a delay following page load,
//! or on the first scroll, pointer move, or touch, whichever comes first.
//! Unmounting the component cancels the frame loop, clears the start timer
//! and removes every window listener.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

use super::config::StarfieldConfig;
use super::dom::{FrameLoop, Timeout, WindowListener};
use super::render::CanvasSurface;
use super::state::{StarfieldState, StartReason, normalize_pointer, normalize_scroll};
use super::theme::ThemeMode;

/// Bundles the animator with the surface it draws on.
struct StarfieldContext {
	state: StarfieldState,
	surface: CanvasSurface,
}

type SharedContext = Rc<RefCell<Option<StarfieldContext>>>;

/// Browser resources owned by a mounted starfield. Dropping it tears them down.
struct StarfieldRuntime {
	frame_loop: Rc<FrameLoop>,
	_listeners: Vec<WindowListener>,
	start_timer: Rc<RefCell<Option<Timeout>>>,
}

impl StarfieldRuntime {
	fn stop(self) {
		self.frame_loop.stop();
		self.start_timer.borrow_mut().take();
		log::debug!("starfield: stopped");
	}
}

/// Renders the animated starfield behind the page content.
///
/// `light` is the page theme signal; every change after mount triggers a
/// cross-fade into a regenerated field. `config` overrides the tuning
/// defaults.
#[component]
pub fn StarfieldCanvas(
	#[prop(into)] light: Signal<bool>,
	#[prop(optional)] config: Option<StarfieldConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let runtime = StoredValue::new_local(None::<StarfieldRuntime>);
	let config = match config.map(|c| c.validate().map(|()| c)) {
		Some(Ok(c)) => c,
		Some(Err(e)) => {
			log::warn!("starfield: rejected config, using defaults: {}", e);
			StarfieldConfig::default()
		}
		None => StarfieldConfig::default(),
	};

	let context_init = context.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if runtime.with_value(Option::is_some) {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		match mount(
			canvas,
			context_init.clone(),
			config.clone(),
			light.get_untracked(),
		) {
			Ok(rt) => runtime.set_value(Some(rt)),
			Err(e) => log::warn!("starfield: failed to mount: {:?}", e),
		}
	});

	let context_theme = context.clone();
	Effect::new(move |prev: Option<bool>| {
		let is_light = light.get();
		if prev.is_some_and(|p| p != is_light) {
			let now = web_sys::window().map_or(0.0, |w| performance_now(&w));
			if let Some(ref mut c) = *context_theme.borrow_mut() {
				c.state.on_theme_change(is_light, now);
			}
			log::debug!(
				"starfield: theme changed to {:?}",
				ThemeMode::from_is_light(is_light)
			);
		}
		is_light
	});

	on_cleanup(move || {
		if let Some(rt) = runtime.try_update_value(Option::take).flatten() {
			rt.stop();
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			id="starfield"
			class="starfield-canvas"
			style="position: fixed; inset: 0; z-index: -1; display: block; pointer-events: none;"
		/>
	}
}

fn viewport_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

fn performance_now(window: &Window) -> f64 {
	window.performance().map_or(0.0, |p| p.now())
}

fn start_animation(context: &SharedContext, frame_loop: &FrameLoop, reason: StartReason) {
	let started = context
		.borrow_mut()
		.as_mut()
		.is_some_and(|c| c.state.on_interaction(reason));
	if started {
		frame_loop.start();
	}
}

fn on_page_loaded(
	window: &Window,
	context: &SharedContext,
	frame_loop: &Rc<FrameLoop>,
	timer: &Rc<RefCell<Option<Timeout>>>,
) {
	let delay_ms = context
		.borrow_mut()
		.as_mut()
		.and_then(|c| c.state.on_load_complete(performance_now(window)));
	let Some(delay_ms) = delay_ms else {
		return;
	};
	let (context, frame_loop) = (context.clone(), frame_loop.clone());
	match Timeout::new(window, delay_ms, move || {
		let now = web_sys::window().map_or(0.0, |w| performance_now(&w));
		let started = context
			.borrow_mut()
			.as_mut()
			.is_some_and(|c| c.state.on_start_timer(now));
		if started {
			frame_loop.start();
		}
	}) {
		Ok(t) => *timer.borrow_mut() = Some(t),
		Err(e) => log::warn!("starfield: failed to schedule start: {:?}", e),
	}
}

fn mount(
	canvas: HtmlCanvasElement,
	context: SharedContext,
	config: StarfieldConfig,
	is_light: bool,
) -> Result<StarfieldRuntime, JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
	let (w, h) = viewport_size(&window);

	let mut surface = CanvasSurface::new(canvas)?;
	let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
	let mut state = StarfieldState::new(
		config,
		w,
		h,
		ThemeMode::from_is_light(is_light),
		StdRng::seed_from_u64(seed),
	);
	state.on_resize(w, h, &mut surface);
	log::info!(
		"starfield: mounted at {}x{}, {} particles on start",
		w,
		h,
		state.particle_count
	);
	*context.borrow_mut() = Some(StarfieldContext { state, surface });

	let context_frame = context.clone();
	let frame_loop = Rc::new(FrameLoop::new(move |timestamp| {
		if let Some(ref mut c) = *context_frame.borrow_mut() {
			c.state.step(timestamp, &mut c.surface);
		}
	}));

	let mut listeners = Vec::new();

	let context_resize = context.clone();
	listeners.push(WindowListener::new(&window, "resize", move |_| {
		let Some(win) = web_sys::window() else {
			return;
		};
		let (nw, nh) = viewport_size(&win);
		if let Some(ref mut c) = *context_resize.borrow_mut() {
			c.state.on_resize(nw, nh, &mut c.surface);
		}
	})?);

	let (context_mm, frame_loop_mm) = (context.clone(), frame_loop.clone());
	listeners.push(WindowListener::new(&window, "mousemove", move |ev| {
		let Ok(ev) = ev.dyn_into::<MouseEvent>() else {
			return;
		};
		let Some(win) = web_sys::window() else {
			return;
		};
		let (vw, vh) = viewport_size(&win);
		let (nx, ny) = normalize_pointer(ev.client_x() as f64, ev.client_y() as f64, vw, vh);
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			c.state.on_pointer_move(nx, ny);
		}
		start_animation(&context_mm, &frame_loop_mm, StartReason::PointerMove);
	})?);

	let (context_scroll, frame_loop_scroll) = (context.clone(), frame_loop.clone());
	listeners.push(WindowListener::new(&window, "scroll", move |_| {
		let Some(win) = web_sys::window() else {
			return;
		};
		let scroll_y = win.scroll_y().unwrap_or(0.0);
		let (_, vh) = viewport_size(&win);
		if let Some(ref mut c) = *context_scroll.borrow_mut() {
			c.state.on_scroll(normalize_scroll(scroll_y, vh));
		}
		start_animation(&context_scroll, &frame_loop_scroll, StartReason::Scroll);
	})?);

	let (context_touch, frame_loop_touch) = (context.clone(), frame_loop.clone());
	listeners.push(WindowListener::new(&window, "touchstart", move |_| {
		start_animation(&context_touch, &frame_loop_touch, StartReason::Touch);
	})?);

	let start_timer: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
	let load_complete = window
		.document()
		.is_some_and(|d| d.ready_state() == "complete");
	if load_complete {
		on_page_loaded(&window, &context, &frame_loop, &start_timer);
	} else {
		let (context_load, frame_loop_load, timer_load) =
			(context.clone(), frame_loop.clone(), start_timer.clone());
		listeners.push(WindowListener::new(&window, "load", move |_| {
			let Some(win) = web_sys::window() else {
				return;
			};
			on_page_loaded(&win, &context_load, &frame_loop_load, &timer_load);
		})?);
	}

	Ok(StarfieldRuntime {
		frame_loop,
		_listeners: listeners,
		start_timer,
	})
}
