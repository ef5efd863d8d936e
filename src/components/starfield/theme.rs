//! Visual theming for the starfield.
//!
//! Each [`ThemeMode`] maps to a background fill and a particle paint scheme.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Light or dark page theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThemeMode {
	Light,
	#[default]
	Dark,
}

impl ThemeMode {
	pub fn from_is_light(is_light: bool) -> Self {
		if is_light { Self::Light } else { Self::Dark }
	}

	pub fn is_light(self) -> bool {
		self == Self::Light
	}

	/// Value stored under the `"theme"` key in local storage.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Light => "light",
			Self::Dark => "dark",
		}
	}

	/// Parse a stored preference. Unknown values yield `None`.
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"light" => Some(Self::Light),
			"dark" => Some(Self::Dark),
			_ => None,
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			Self::Light => Self::Dark,
			Self::Dark => Self::Light,
		}
	}
}

/// Full-canvas background fill.
#[derive(Clone, Debug, PartialEq)]
pub enum BackgroundStyle {
	/// Single solid color.
	Solid(Color),
	/// Two-stop gradient running from the top edge to the bottom edge.
	Vertical { top: Color, bottom: Color },
}

/// How particles are colored.
#[derive(Clone, Debug, PartialEq)]
pub enum StarPaint {
	/// One color whose alpha tracks the particle opacity. Global alpha is the
	/// opacity as well, so the effective alpha is squared.
	Mono(Color),
	/// Colors cycled by particle index, drawn at a scaled global alpha.
	Palette { colors: Vec<Color>, alpha_scale: f64 },
}

/// Complete visual theme for one mode.
#[derive(Clone, Debug)]
pub struct StarfieldTheme {
	pub mode: ThemeMode,
	pub background: BackgroundStyle,
	pub paint: StarPaint,
}

impl StarfieldTheme {
	/// Black sky with white stars.
	pub fn dark() -> Self {
		Self {
			mode: ThemeMode::Dark,
			background: BackgroundStyle::Solid(Color::rgb(0, 0, 0)),
			paint: StarPaint::Mono(Color::rgb(255, 255, 255)),
		}
	}

	/// Pale blue sky with pastel stars.
	pub fn light() -> Self {
		Self {
			mode: ThemeMode::Light,
			background: BackgroundStyle::Vertical {
				top: Color::rgb(245, 249, 255),
				bottom: Color::rgb(214, 237, 255),
			},
			paint: StarPaint::Palette {
				colors: vec![
					Color::rgb(160, 216, 239), // Sky
					Color::rgb(247, 198, 255), // Lilac
					Color::rgb(255, 230, 179), // Peach
					Color::rgb(184, 247, 212), // Mint
				],
				alpha_scale: 0.8,
			},
		}
	}

	pub fn for_mode(mode: ThemeMode) -> Self {
		match mode {
			ThemeMode::Light => Self::light(),
			ThemeMode::Dark => Self::dark(),
		}
	}

	/// Fill color and global alpha for the particle at `index` with `opacity`.
	pub fn star_paint(&self, index: usize, opacity: f64) -> (Color, f64) {
		match &self.paint {
			StarPaint::Mono(color) => (color.with_alpha(opacity), opacity),
			StarPaint::Palette {
				colors,
				alpha_scale,
			} => {
				let color = if colors.is_empty() {
					Color::rgb(255, 255, 255)
				} else {
					colors[index % colors.len()]
				};
				(color, opacity * alpha_scale)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_mode_storage_values() {
		assert_eq!(ThemeMode::parse("light"), Some(ThemeMode::Light));
		assert_eq!(ThemeMode::parse("dark"), Some(ThemeMode::Dark));
		assert_eq!(ThemeMode::parse("sepia"), None);
		assert_eq!(ThemeMode::parse(ThemeMode::Light.as_str()), Some(ThemeMode::Light));
		assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
		assert!(ThemeMode::from_is_light(true).is_light());
	}

	#[test]
	fn test_dark_paint_uses_opacity_twice() {
		let theme = StarfieldTheme::dark();
		let (color, alpha) = theme.star_paint(7, 0.4);
		assert_eq!(color.to_css(), "rgba(255, 255, 255, 0.4)");
		assert!((alpha - 0.4).abs() < 1e-12);
	}

	#[test]
	fn test_light_paint_cycles_palette() {
		let theme = StarfieldTheme::light();
		let (first, alpha) = theme.star_paint(0, 0.5);
		let (wrapped, _) = theme.star_paint(4, 0.5);
		let (fourth, _) = theme.star_paint(3, 0.5);
		assert_eq!(first.to_css(), "#a0d8ef");
		assert_eq!(wrapped, first);
		assert_eq!(fourth.to_css(), "#b8f7d4");
		assert!((alpha - 0.4).abs() < 1e-12);
	}

	#[test]
	fn test_backgrounds() {
		assert_eq!(
			StarfieldTheme::dark().background,
			BackgroundStyle::Solid(Color::rgb(0, 0, 0))
		);
		match StarfieldTheme::light().background {
			BackgroundStyle::Vertical { top, bottom } => {
				assert_eq!(top.to_css(), "#f5f9ff");
				assert_eq!(bottom.to_css(), "#d6edff");
			}
			other => panic!("unexpected light background {other:?}"),
		}
	}
}
