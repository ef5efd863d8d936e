//! Light/dark theme preference and toggle button.
//!
//! The preference lives in `localStorage` under `"theme"` as `"light"` or
//! `"dark"`. Without a stored value the `prefers-color-scheme` media query
//! decides.

use leptos::prelude::*;

use super::starfield::ThemeMode;

const STORAGE_KEY: &str = "theme";

/// Resolve the initial theme from a stored value and the system preference.
pub fn resolve_mode(stored: Option<&str>, prefers_light: bool) -> ThemeMode {
	stored
		.and_then(ThemeMode::parse)
		.unwrap_or(ThemeMode::from_is_light(prefers_light))
}

/// Read the persisted theme, falling back to the system color scheme.
pub fn read_preference() -> ThemeMode {
	let Some(window) = web_sys::window() else {
		return ThemeMode::default();
	};

	let stored = window
		.local_storage()
		.ok()
		.flatten()
		.and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten());

	let prefers_light = window
		.match_media("(prefers-color-scheme: light)")
		.ok()
		.flatten()
		.is_some_and(|mq| mq.matches());

	resolve_mode(stored.as_deref(), prefers_light)
}

/// Persist the theme choice.
pub fn store_preference(mode: ThemeMode) {
	let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
		return;
	};
	if let Err(e) = storage.set_item(STORAGE_KEY, mode.as_str()) {
		log::warn!("starfield: failed to persist theme: {:?}", e);
	}
}

/// Button flipping the theme signal and persisting the result.
#[component]
pub fn ThemeToggle(mode: RwSignal<ThemeMode>) -> impl IntoView {
	let on_click = move |_| {
		let next = mode.get_untracked().toggled();
		store_preference(next);
		mode.set(next);
	};

	let label = move || {
		if mode.get().is_light() {
			"Switch to dark theme"
		} else {
			"Switch to light theme"
		}
	};

	view! {
		<button id="theme-toggle" class="theme-toggle" on:click=on_click aria-label=label>
			{move || if mode.get().is_light() { "☀" } else { "☾" }}
		</button>
	}
}
