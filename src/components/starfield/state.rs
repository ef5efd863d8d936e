//! Starfield animation state.
//!
//! Owns the particle field together with every smoothed input (pointer
//! parallax, field opacity) and the frame clock. The host calls [`step`] once
//! per display refresh and forwards pointer, scroll, resize, and theme events
//! between frames; since everything runs on one thread, each step sees a
//! consistent snapshot of the latest inputs.
//!
//! [`step`]: StarfieldState::step

use rand::Rng;
use rand::rngs::StdRng;

use super::config::StarfieldConfig;
use super::particles::ParticleField;
use super::render::Surface;
use super::theme::{StarfieldTheme, ThemeMode};

/// Move `current` a fixed fraction of the way toward `target`.
///
/// With `rate` in `(0, 1]` repeated application converges monotonically and
/// never overshoots.
pub fn approach(current: f64, target: f64, rate: f64) -> f64 {
	current + (target - current) * rate
}

/// Why the animation was started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartReason {
	/// The post-load delay elapsed.
	LoadDelay,
	Scroll,
	PointerMove,
	Touch,
}

/// Browsers may coarsen `performance.now()`, so a timer can appear to fire
/// slightly before its deadline.
const TIMER_SLACK_MS: f64 = 1.0;

/// Lazy start policy: a delay after page load, or the first interaction,
/// whichever comes first. Only one start ever happens.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartGate {
	delay_ms: f64,
	loaded_at: Option<f64>,
	started: bool,
}

impl StartGate {
	pub fn new(delay_ms: f64) -> Self {
		Self {
			delay_ms,
			loaded_at: None,
			started: false,
		}
	}

	pub fn is_started(&self) -> bool {
		self.started
	}

	/// Record page load completion at `now`.
	///
	/// Returns the delay to arm the start timer with, or `None` when the
	/// timer is already armed or the animation already started.
	pub fn load_complete(&mut self, now: f64) -> Option<f64> {
		if self.started || self.loaded_at.is_some() {
			return None;
		}
		self.loaded_at = Some(now);
		Some(self.delay_ms)
	}

	/// The start timer fired at `now`.
	pub fn timer_fired(&mut self, now: f64) -> Option<StartReason> {
		let loaded_at = self.loaded_at?;
		if self.started || now - loaded_at + TIMER_SLACK_MS < self.delay_ms {
			return None;
		}
		self.started = true;
		Some(StartReason::LoadDelay)
	}

	/// A scroll, pointer move, or touch arrived.
	pub fn interaction(&mut self, reason: StartReason) -> Option<StartReason> {
		if self.started {
			return None;
		}
		self.started = true;
		Some(reason)
	}
}

/// A smoothed 2D offset chasing a raw target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Parallax {
	pub x: f64,
	pub y: f64,
	pub target_x: f64,
	pub target_y: f64,
}

impl Parallax {
	pub fn tick(&mut self, rate: f64) {
		self.x = approach(self.x, self.target_x, rate);
		self.y = approach(self.y, self.target_y, rate);
	}
}

/// Whole-field opacity animated toward 0 or 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldFade {
	pub opacity: f64,
	pub target: f64,
	/// Timestamp at which the faded-out field regenerates and fades back in.
	pub reset_at: Option<f64>,
}

impl Default for FieldFade {
	fn default() -> Self {
		// Start invisible so the first frames fade the field in.
		Self {
			opacity: 0.0,
			target: 1.0,
			reset_at: None,
		}
	}
}

/// Normalize a client-space pointer position into `[-1, 1]` on each axis.
pub fn normalize_pointer(client_x: f64, client_y: f64, width: f64, height: f64) -> (f64, f64) {
	if width <= 0.0 || height <= 0.0 {
		return (0.0, 0.0);
	}
	(
		(client_x / width - 0.5) * 2.0,
		(client_y / height - 0.5) * 2.0,
	)
}

/// Normalize a vertical scroll position by the viewport height.
pub fn normalize_scroll(scroll_y: f64, viewport_height: f64) -> f64 {
	if viewport_height <= 0.0 {
		return 0.0;
	}
	scroll_y / viewport_height
}

/// Core animator state, generic over its random source.
pub struct StarfieldState<R: Rng = StdRng> {
	pub config: StarfieldConfig,
	pub field: ParticleField,
	pub theme: StarfieldTheme,
	pub parallax: Parallax,
	pub fade: FieldFade,
	/// Normalized vertical scroll position.
	pub scroll: f64,
	pub width: f64,
	pub height: f64,
	/// Cardinality fixed at construction from the initial viewport width.
	pub particle_count: usize,
	pub gate: StartGate,
	last_frame: Option<f64>,
	rng: R,
}

impl<R: Rng> StarfieldState<R> {
	/// Create an idle animator for a `width` x `height` viewport.
	///
	/// No particles exist until the start gate opens or a theme reset.
	pub fn new(config: StarfieldConfig, width: f64, height: f64, mode: ThemeMode, rng: R) -> Self {
		let particle_count = config.particle_count(width);
		let gate = StartGate::new(config.timing.start_delay_ms);
		Self {
			config,
			field: ParticleField::default(),
			theme: StarfieldTheme::for_mode(mode),
			parallax: Parallax::default(),
			fade: FieldFade::default(),
			scroll: 0.0,
			width,
			height,
			particle_count,
			gate,
			last_frame: None,
			rng,
		}
	}

	/// Replace the particle set with `count` fresh random particles.
	pub fn initialize(&mut self, count: usize) {
		self.field = ParticleField::generate(
			&mut self.rng,
			count,
			self.width,
			self.height,
			&self.config,
		);
	}

	fn begin(&mut self, reason: Option<StartReason>) -> bool {
		let Some(reason) = reason else {
			return false;
		};
		self.initialize(self.particle_count);
		log::info!(
			"starfield: started ({:?}) with {} particles",
			reason,
			self.field.len()
		);
		true
	}

	/// Page load completed at `now`; returns the start timer delay to arm.
	pub fn on_load_complete(&mut self, now: f64) -> Option<f64> {
		self.gate.load_complete(now)
	}

	/// Start timer callback. Returns `true` only if this call started the field.
	pub fn on_start_timer(&mut self, now: f64) -> bool {
		let reason = self.gate.timer_fired(now);
		self.begin(reason)
	}

	/// First-interaction start. Returns `true` only if this call started the field.
	pub fn on_interaction(&mut self, reason: StartReason) -> bool {
		let reason = self.gate.interaction(reason);
		self.begin(reason)
	}

	pub fn on_pointer_move(&mut self, nx: f64, ny: f64) {
		self.parallax.target_x = nx;
		self.parallax.target_y = ny;
	}

	pub fn on_scroll(&mut self, normalized_scroll_y: f64) {
		self.scroll = normalized_scroll_y;
	}

	/// Adopt new viewport dimensions and rebuild the cached backgrounds.
	pub fn on_resize<S: Surface>(&mut self, width: f64, height: f64, surface: &mut S) {
		self.width = width;
		self.height = height;
		self.field.clamp_depth(width);
		surface.set_size(width, height);
		for mode in [ThemeMode::Dark, ThemeMode::Light] {
			surface.cache_background(mode, &StarfieldTheme::for_mode(mode).background);
		}
		log::debug!("starfield: resized to {}x{}", width, height);
	}

	/// Switch theme and begin the fade-out, regenerate, fade-in sequence.
	pub fn on_theme_change(&mut self, is_light: bool, now: f64) {
		self.theme = StarfieldTheme::for_mode(ThemeMode::from_is_light(is_light));
		self.fade.target = 0.0;
		self.fade.reset_at = Some(now + self.config.timing.crossfade_delay_ms);
	}

	/// Projection center for the current parallax and scroll inputs.
	pub fn projection_center(&self) -> (f64, f64) {
		let scale = self.config.parallax_scale(self.width);
		let scroll_shift = self.scroll * self.config.parallax.scroll_factor;
		(
			self.width / 2.0 + self.parallax.x * scale,
			self.height / 2.0 + self.parallax.y * scale - scroll_shift,
		)
	}

	/// Advance and draw one frame.
	///
	/// Frames closer than the configured interval to the previous executed
	/// frame are skipped without touching any state or the surface.
	pub fn step<S: Surface>(&mut self, timestamp: f64, surface: &mut S) {
		if let Some(last) = self.last_frame
			&& timestamp - last < self.config.motion.frame_interval_ms
		{
			return;
		}
		self.last_frame = Some(timestamp);

		if let Some(reset_at) = self.fade.reset_at
			&& timestamp >= reset_at
		{
			self.fade.reset_at = None;
			self.initialize(self.particle_count);
			self.fade.target = 1.0;
			log::debug!(
				"starfield: regenerated {} particles for {:?} theme",
				self.field.len(),
				self.theme.mode
			);
		}

		surface.fill_background(self.theme.mode);

		self.parallax.tick(self.config.parallax.smoothing);
		let (cx, cy) = self.projection_center();

		let motion = &self.config.motion;
		let twinkle = &self.config.twinkle;
		let (width, height) = (self.width, self.height);

		for (i, p) in self.field.particles.iter_mut().enumerate() {
			p.advance(motion.depth_step, width);
			p.twinkle(&mut self.rng, twinkle.min_opacity, twinkle.max_opacity);

			let (px, py) = p.project(motion.perspective, cx, cy);
			if !(0.0..=width).contains(&px) || !(0.0..=height).contains(&py) {
				continue;
			}

			let size = (1.0 - p.z / width) * motion.max_size;
			let (color, alpha) = self.theme.star_paint(i, p.opacity);
			surface.set_global_alpha(alpha);
			surface.fill_square(px, py, size, color);
		}

		self.fade.opacity = approach(
			self.fade.opacity,
			self.fade.target,
			self.config.parallax.smoothing,
		);
		surface.set_opacity(self.fade.opacity);
		surface.set_global_alpha(1.0);
	}
}
