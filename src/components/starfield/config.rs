//! Tuning configuration for the starfield.
//!
//! This module centralizes every constant that shapes how the field looks and
//! moves, so they can be tuned in one place or overridden from the page.
//!
//! # Units
//!
//! - **Pixels**: canvas coordinates. Depth shares the same unit as canvas width,
//!   since particles respawn at a depth equal to the canvas width.
//! - **Milliseconds**: all timings use the same clock as `requestAnimationFrame`
//!   timestamps and `performance.now()`.
//!
//! # Overriding
//!
//! Every field has a default, so a page can supply a partial JSON object in a
//! `<script id="starfield-config" type="application/json">` element and only
//! the listed values change. Overrides that parse but fall outside the ranges
//! the animator relies on are rejected by [`StarfieldConfig::validate`].

use serde::Deserialize;
use thiserror::Error;

/// Why a config override was rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid JSON: {0}")]
	Parse(#[from] serde_json::Error),
	#[error("{field} = {value} is out of range, expected {expected}")]
	OutOfRange {
		field: &'static str,
		value: f64,
		expected: &'static str,
	},
}

fn check(
	field: &'static str,
	value: f64,
	ok: bool,
	expected: &'static str,
) -> Result<(), ConfigError> {
	if ok {
		Ok(())
	} else {
		Err(ConfigError::OutOfRange {
			field,
			value,
			expected,
		})
	}
}

/// Particle population settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
	/// Hard cap on the number of particles.
	pub max_particles: usize,
	/// Particles per pixel of viewport width.
	pub density: f64,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			max_particles: 800,
			density: 0.5,
		}
	}
}

/// Depth motion and projection settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
	/// Depth removed from every particle each executed frame.
	pub depth_step: f64,
	/// Numerator of the perspective divide (`offset * perspective / depth`).
	pub perspective: f64,
	/// Side of a particle square at zero depth, in pixels.
	pub max_size: f64,
	/// Minimum time between executed frames.
	pub frame_interval_ms: f64,
}

impl Default for MotionConfig {
	fn default() -> Self {
		Self {
			depth_step: 1.2,
			perspective: 128.0,
			max_size: 2.0,
			frame_interval_ms: 16.0,
		}
	}
}

/// Pointer and scroll parallax settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
	/// Fraction of the remaining distance covered per frame by smoothed values.
	pub smoothing: f64,
	/// Viewport width below which the narrow scale applies.
	pub breakpoint: f64,
	/// Pixel shift per unit of pointer offset on narrow viewports.
	pub narrow_scale: f64,
	/// Pixel shift per unit of pointer offset on wide viewports.
	pub wide_scale: f64,
	/// Vertical shift per unit of normalized scroll.
	pub scroll_factor: f64,
}

impl Default for ParallaxConfig {
	fn default() -> Self {
		Self {
			smoothing: 0.05,
			breakpoint: 768.0,
			narrow_scale: 15.0,
			wide_scale: 30.0,
			scroll_factor: 0.1,
		}
	}
}

/// Opacity random walk settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TwinkleConfig {
	/// Lower clamp for particle opacity after a step.
	pub min_opacity: f64,
	/// Upper clamp for particle opacity after a step.
	pub max_opacity: f64,
	/// Smallest per-particle walk step.
	pub fade_speed_min: f64,
	/// Largest per-particle walk step (exclusive).
	pub fade_speed_max: f64,
}

impl Default for TwinkleConfig {
	fn default() -> Self {
		Self {
			min_opacity: 0.1,
			max_opacity: 1.0,
			fade_speed_min: 0.002,
			fade_speed_max: 0.004,
		}
	}
}

/// Startup and theme transition timings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
	/// Delay after page load before the animation starts on its own.
	pub start_delay_ms: f64,
	/// Time the field stays faded out before particles regenerate.
	/// Must match the page stylesheet's theme transition duration.
	pub crossfade_delay_ms: f64,
}

impl Default for TimingConfig {
	fn default() -> Self {
		Self {
			start_delay_ms: 800.0,
			crossfade_delay_ms: 400.0,
		}
	}
}

/// Complete starfield configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
	pub field: FieldConfig,
	pub motion: MotionConfig,
	pub parallax: ParallaxConfig,
	pub twinkle: TwinkleConfig,
	pub timing: TimingConfig,
}

impl StarfieldConfig {
	/// Parse and validate a (possibly partial) JSON override.
	pub fn from_json(text: &str) -> Result<Self, ConfigError> {
		let config: Self = serde_json::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Reject values that would break depth, opacity or smoothing bounds.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let (motion, parallax, twinkle) = (&self.motion, &self.parallax, &self.twinkle);
		check(
			"parallax.smoothing",
			parallax.smoothing,
			parallax.smoothing > 0.0 && parallax.smoothing <= 1.0,
			"0 < smoothing <= 1",
		)?;
		check(
			"motion.depth_step",
			motion.depth_step,
			motion.depth_step > 0.0,
			"> 0",
		)?;
		check(
			"motion.perspective",
			motion.perspective,
			motion.perspective > 0.0,
			"> 0",
		)?;
		check(
			"motion.frame_interval_ms",
			motion.frame_interval_ms,
			motion.frame_interval_ms >= 0.0,
			">= 0",
		)?;
		check(
			"twinkle.min_opacity",
			twinkle.min_opacity,
			twinkle.min_opacity <= twinkle.max_opacity,
			"<= twinkle.max_opacity",
		)?;
		check(
			"twinkle.fade_speed_min",
			twinkle.fade_speed_min,
			twinkle.fade_speed_min >= 0.0,
			">= 0",
		)?;
		Ok(())
	}

	/// Number of particles for a viewport of the given width.
	///
	/// A fractional product rounds up, so a 1001px viewport gets 501 particles.
	pub fn particle_count(&self, viewport_width: f64) -> usize {
		let adaptive = (viewport_width.max(0.0) * self.field.density).ceil() as usize;
		adaptive.min(self.field.max_particles)
	}

	/// Pixel shift per unit of pointer offset for a viewport of the given width.
	pub fn parallax_scale(&self, viewport_width: f64) -> f64 {
		if viewport_width < self.parallax.breakpoint {
			self.parallax.narrow_scale
		} else {
			self.parallax.wide_scale
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_particle_count_scales_with_width() {
		let config = StarfieldConfig::default();
		assert_eq!(config.particle_count(1000.0), 500);
		assert_eq!(config.particle_count(375.0), 188);
		assert_eq!(config.particle_count(1001.0), 501);
	}

	#[test]
	fn test_particle_count_is_capped() {
		let config = StarfieldConfig::default();
		assert_eq!(config.particle_count(1600.0), 800);
		assert_eq!(config.particle_count(3840.0), 800);
		assert_eq!(config.particle_count(0.0), 0);
	}

	#[test]
	fn test_parallax_breakpoint() {
		let config = StarfieldConfig::default();
		assert_eq!(config.parallax_scale(767.0), 15.0);
		assert_eq!(config.parallax_scale(768.0), 30.0);
		assert_eq!(config.parallax_scale(1920.0), 30.0);
	}

	#[test]
	fn test_partial_json_keeps_defaults() {
		let config =
			StarfieldConfig::from_json(r#"{ "field": { "max_particles": 300 } }"#).unwrap();
		assert_eq!(config.field.max_particles, 300);
		assert_eq!(config.field.density, 0.5);
		assert_eq!(config.timing.crossfade_delay_ms, 400.0);
		assert_eq!(config.particle_count(1000.0), 300);
	}

	#[test]
	fn test_invalid_json_is_an_error() {
		assert!(matches!(
			StarfieldConfig::from_json("{ field: }"),
			Err(ConfigError::Parse(_))
		));
		assert!(matches!(
			StarfieldConfig::from_json(r#"{ "motion": { "depth_step": "fast" } }"#),
			Err(ConfigError::Parse(_))
		));
	}

	fn rejected_field(json: &str) -> &'static str {
		match StarfieldConfig::from_json(json) {
			Err(ConfigError::OutOfRange { field, .. }) => field,
			other => panic!("expected range error for {json}, got {other:?}"),
		}
	}

	#[test]
	fn test_defaults_are_valid() {
		assert!(StarfieldConfig::default().validate().is_ok());
		assert!(StarfieldConfig::from_json("{}").is_ok());
	}

	#[test]
	fn test_out_of_range_overrides_are_rejected() {
		assert_eq!(
			rejected_field(r#"{ "parallax": { "smoothing": 1.8 } }"#),
			"parallax.smoothing"
		);
		assert_eq!(
			rejected_field(r#"{ "parallax": { "smoothing": 0.0 } }"#),
			"parallax.smoothing"
		);
		assert_eq!(
			rejected_field(r#"{ "motion": { "depth_step": -5.0 } }"#),
			"motion.depth_step"
		);
		assert_eq!(
			rejected_field(r#"{ "motion": { "depth_step": 0.0 } }"#),
			"motion.depth_step"
		);
		assert_eq!(
			rejected_field(r#"{ "motion": { "perspective": 0.0 } }"#),
			"motion.perspective"
		);
		assert_eq!(
			rejected_field(r#"{ "motion": { "frame_interval_ms": -1.0 } }"#),
			"motion.frame_interval_ms"
		);
		assert_eq!(
			rejected_field(r#"{ "twinkle": { "min_opacity": 0.9, "max_opacity": 0.2 } }"#),
			"twinkle.min_opacity"
		);
		assert_eq!(
			rejected_field(r#"{ "twinkle": { "fade_speed_min": -0.01 } }"#),
			"twinkle.fade_speed_min"
		);
	}

	#[test]
	fn test_boundary_values_are_accepted() {
		let config = StarfieldConfig::from_json(
			r#"{ "parallax": { "smoothing": 1.0 }, "motion": { "frame_interval_ms": 0.0 },
			     "twinkle": { "min_opacity": 0.5, "max_opacity": 0.5, "fade_speed_min": 0.0 } }"#,
		)
		.unwrap();
		assert_eq!(config.parallax.smoothing, 1.0);
		assert_eq!(config.twinkle.min_opacity, config.twinkle.max_opacity);
	}
}
