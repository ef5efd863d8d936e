//! Drawing surface abstraction and its canvas implementation.
//!
//! The animator only needs a handful of raster operations: fill the whole
//! canvas with a cached background, fill small squares, set global alpha, and
//! set the element-level opacity used for cross-fades. [`Surface`] captures
//! exactly those so the frame logic can run against a recording double in
//! tests.

use std::collections::HashMap;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasGradient, CanvasRenderingContext2d, ContextAttributes2d, HtmlCanvasElement};

use super::theme::{BackgroundStyle, Color, ThemeMode};

/// Raster operations the starfield draws with.
pub trait Surface {
	/// Match the backing pixel size to the viewport.
	fn set_size(&mut self, width: f64, height: f64);
	/// Build and cache the background fill for `mode` at the current size.
	fn cache_background(&mut self, mode: ThemeMode, style: &BackgroundStyle);
	/// Fill the whole surface with the cached background for `mode`.
	fn fill_background(&mut self, mode: ThemeMode);
	fn set_global_alpha(&mut self, alpha: f64);
	/// Fill an axis-aligned square with its top-left corner at `(x, y)`.
	fn fill_square(&mut self, x: f64, y: f64, size: f64, color: Color);
	/// Element-level opacity, animated by the cross-fade.
	fn set_opacity(&mut self, opacity: f64);
}

/// A background ready to be used as a fill style.
enum CachedFill {
	Solid(String),
	Gradient(CanvasGradient),
}

/// [`Surface`] backed by an HTML canvas and its 2D context.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
	backgrounds: HashMap<ThemeMode, CachedFill>,
	opacity_warned: bool,
}

impl CanvasSurface {
	/// Acquire an opaque 2D context for `canvas`.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
		let attrs = ContextAttributes2d::new();
		attrs.set_alpha(false);
		let ctx: CanvasRenderingContext2d = canvas
			.get_context_with_context_options("2d", &attrs)?
			.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
			.dyn_into()?;

		let style = canvas.style();
		style.set_property("will-change", "transform")?;
		style.set_property("opacity", "0")?;

		Ok(Self {
			width: canvas.width() as f64,
			height: canvas.height() as f64,
			canvas,
			ctx,
			backgrounds: HashMap::new(),
			opacity_warned: false,
		})
	}

	fn build_fill(&self, style: &BackgroundStyle) -> Result<CachedFill, JsValue> {
		match style {
			BackgroundStyle::Solid(color) => Ok(CachedFill::Solid(color.to_css())),
			BackgroundStyle::Vertical { top, bottom } => {
				let gradient = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, self.height);
				gradient.add_color_stop(0.0, &top.to_css())?;
				gradient.add_color_stop(1.0, &bottom.to_css())?;
				Ok(CachedFill::Gradient(gradient))
			}
		}
	}
}

impl Surface for CanvasSurface {
	fn set_size(&mut self, width: f64, height: f64) {
		self.canvas.set_width(width as u32);
		self.canvas.set_height(height as u32);
		self.width = width;
		self.height = height;
	}

	fn cache_background(&mut self, mode: ThemeMode, style: &BackgroundStyle) {
		match self.build_fill(style) {
			Ok(fill) => {
				self.backgrounds.insert(mode, fill);
			}
			Err(e) => log::warn!("starfield: failed to build background: {:?}", e),
		}
	}

	fn fill_background(&mut self, mode: ThemeMode) {
		match self.backgrounds.get(&mode) {
			Some(CachedFill::Solid(css)) => self.ctx.set_fill_style_str(css),
			Some(CachedFill::Gradient(gradient)) => {
				#[allow(deprecated)]
				self.ctx.set_fill_style(gradient);
			}
			None => return,
		}
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.ctx.set_global_alpha(alpha);
	}

	fn fill_square(&mut self, x: f64, y: f64, size: f64, color: Color) {
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill_rect(x, y, size, size);
	}

	fn set_opacity(&mut self, opacity: f64) {
		let result = self
			.canvas
			.style()
			.set_property("opacity", &opacity.to_string());
		// Runs every frame; report the first failure only.
		if let Err(e) = result
			&& !self.opacity_warned
		{
			self.opacity_warned = true;
			log::warn!("starfield: failed to set canvas opacity: {:?}", e);
		}
	}
}
