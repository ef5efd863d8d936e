//! Browser scheduling and event plumbing with explicit teardown.
//!
//! Every handle here owns the JS closure it registered and unregisters it on
//! drop, so dropping the starfield runtime stops all callbacks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Event, Window};

/// A self-rescheduling `requestAnimationFrame` loop that can be stopped.
pub struct FrameLoop {
	callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
	handle: Rc<Cell<Option<i32>>>,
	running: Rc<Cell<bool>>,
}

impl FrameLoop {
	/// Wrap `on_frame`, which receives the frame timestamp in milliseconds.
	/// The loop is idle until [`start`](Self::start).
	pub fn new(mut on_frame: impl FnMut(f64) + 'static) -> Self {
		let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
		let handle = Rc::new(Cell::new(None));
		let running = Rc::new(Cell::new(false));
		let (callback_inner, handle_inner, running_inner) =
			(callback.clone(), handle.clone(), running.clone());

		*callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			handle_inner.set(None);
			if !running_inner.get() {
				return;
			}
			on_frame(timestamp);
			if let Some(ref cb) = *callback_inner.borrow() {
				handle_inner.set(request_frame(cb));
			}
		}));

		Self {
			callback,
			handle,
			running,
		}
	}

	/// Schedule the first frame. Calling this while running is a no-op.
	pub fn start(&self) {
		if self.running.replace(true) {
			return;
		}
		if let Some(ref cb) = *self.callback.borrow() {
			self.handle.set(request_frame(cb));
		}
	}

	/// Cancel the pending frame and stop rescheduling.
	pub fn stop(&self) {
		self.running.set(false);
		if let Some(id) = self.handle.take()
			&& let Some(window) = web_sys::window()
		{
			let _ = window.cancel_animation_frame(id);
		}
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.stop();
		// The closure holds an Rc to its own slot; clearing it breaks the cycle.
		self.callback.borrow_mut().take();
	}
}

fn request_frame(cb: &Closure<dyn FnMut(f64)>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

/// A `window` event listener removed on drop.
pub struct WindowListener {
	window: Window,
	event: &'static str,
	closure: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
	pub fn new(
		window: &Window,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<Self, JsValue> {
		let closure: Closure<dyn FnMut(Event)> = Closure::new(handler);
		window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
		Ok(Self {
			window: window.clone(),
			event,
			closure,
		})
	}
}

impl Drop for WindowListener {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
	}
}

/// A one-shot `setTimeout` cleared on drop.
pub struct Timeout {
	window: Window,
	id: i32,
	_closure: Closure<dyn FnMut()>,
}

impl Timeout {
	pub fn new(window: &Window, delay_ms: f64, handler: impl FnMut() + 'static) -> Result<Self, JsValue> {
		let closure: Closure<dyn FnMut()> = Closure::new(handler);
		let id = window.set_timeout_with_callback_and_timeout_and_arguments_0(
			closure.as_ref().unchecked_ref(),
			delay_ms.max(0.0).ceil() as i32,
		)?;
		Ok(Self {
			window: window.clone(),
			id,
			_closure: closure,
		})
	}
}

impl Drop for Timeout {
	fn drop(&mut self) {
		self.window.clear_timeout_with_handle(self.id);
	}
}
