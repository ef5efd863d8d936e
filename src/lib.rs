//! starfield-wasm: parallax starfield background for a portfolio site.
//!
//! This crate provides a WASM-based canvas background with perspective star
//! motion, twinkle, pointer and scroll parallax, and a cross-fade on theme
//! change, plus the theme toggle that drives it.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::starfield::{StarfieldCanvas, StarfieldConfig, ThemeMode};
pub use components::theme_toggle::ThemeToggle;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("starfield: logging initialized");
}

/// Load configuration overrides from a script element with id="starfield-config".
/// Expected format: a (possibly partial) JSON [`StarfieldConfig`].
fn load_config() -> Option<StarfieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("starfield-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match StarfieldConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"starfield: loaded config, up to {} particles",
				config.field.max_particles
			);
			Some(config)
		}
		Err(e) => {
			warn!("starfield: rejected config, using defaults: {}", e);
			None
		}
	}
}

/// Main application component.
/// Resolves the theme, then renders the starfield behind the page content.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();
	let mode = RwSignal::new(components::theme_toggle::read_preference());
	let light = Signal::derive(move || mode.get().is_light());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme=move || mode.get().as_str() />
		<Title text="Portfolio" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<StarfieldCanvas light=light config=config />
		<ThemeToggle mode=mode />
	}
}
