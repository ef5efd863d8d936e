//! UI components.

pub mod starfield;
pub mod theme_toggle;
