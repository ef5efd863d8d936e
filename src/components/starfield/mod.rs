//! Parallax starfield background component.
//!
//! Renders a twinkling star field on a full-viewport HTML canvas with:
//! - Perspective projection of particles flying toward the viewer
//! - Random-walk twinkle on every star
//! - Smoothed pointer parallax and scroll offset
//! - Cross-fade into a regenerated field when the page theme changes
//!
//! # Example
//!
//! ```ignore
//! use starfield_wasm::StarfieldCanvas;
//!
//! let (light, set_light) = signal(false);
//! view! { <StarfieldCanvas light=light /> }
//! ```

mod component;
pub mod config;
mod dom;
mod particles;
mod render;
mod state;
pub mod theme;

pub use component::StarfieldCanvas;
pub use config::StarfieldConfig;
pub use particles::{Particle, ParticleField};
pub use render::{CanvasSurface, Surface};
pub use state::{StarfieldState, StartGate, StartReason};
pub use theme::ThemeMode;
