//! Visual theming for the particle network.
//!
//! Provides the color gradient particles are tinted with, line and point
//! styles, and the dark/light preference persisted in local storage.

use glam::Vec3;
use log::debug;

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

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Build an opaque color from `0xRRGGBB`.
	pub const fn hex(rgb: u32) -> Self {
		Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Channels as floats in `0.0..=1.0`, the form stored in the color buffer.
	pub fn to_vec3(self) -> Vec3 {
		Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
	}

	/// CSS `rgba()` string for a float color triple and an explicit alpha.
	pub fn css_from_vec3(rgb: Vec3, alpha: f64) -> String {
		let c = (rgb.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
		format!("rgba({}, {}, {}, {})", c.x as u8, c.y as u8, c.z as u8, alpha)
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Colors particles are spread across, from the first to the last particle.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientPalette {
	pub stops: Vec<Color>,
}

impl GradientPalette {
	/// Blue, cyan, violet. The canonical dark-theme field.
	pub fn neural() -> Self {
		Self {
			stops: vec![
				Color::hex(0x60a5fa), // Blue 400
				Color::hex(0x22d3ee), // Cyan 400
				Color::hex(0x8b5cf6), // Violet 500
			],
		}
	}

	/// Deeper tones that stay readable on a white page.
	pub fn neural_light() -> Self {
		Self {
			stops: vec![
				Color::hex(0x2563eb), // Blue 600
				Color::hex(0x0891b2), // Cyan 600
				Color::hex(0x7c3aed), // Violet 600
			],
		}
	}

	/// Sample the gradient at `t` in `0.0..=1.0`.
	///
	/// The stops are spaced evenly, so with three stops the middle one sits at
	/// `t = 0.5`. An empty palette samples as white.
	pub fn sample(&self, t: f32) -> Vec3 {
		match self.stops.as_slice() {
			[] => Vec3::ONE,
			[only] => only.to_vec3(),
			stops => {
				let segments = (stops.len() - 1) as f32;
				let scaled = t.clamp(0.0, 1.0) * segments;
				let idx = (scaled.floor() as usize).min(stops.len() - 2);
				let local = scaled - idx as f32;
				stops[idx].to_vec3().lerp(stops[idx + 1].to_vec3(), local)
			}
		}
	}
}

/// How points are composited onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
	/// Overlapping points brighten each other. Reads well on dark backgrounds.
	Additive,
	/// Plain alpha compositing.
	Normal,
}

impl BlendMode {
	/// Canvas `globalCompositeOperation` value.
	pub fn composite_operation(self) -> &'static str {
		match self {
			BlendMode::Additive => "lighter",
			BlendMode::Normal => "source-over",
		}
	}
}

/// Dark or light page mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
	#[default]
	Dark,
	Light,
}

impl ThemeMode {
	pub fn as_str(self) -> &'static str {
		match self {
			ThemeMode::Dark => "dark",
			ThemeMode::Light => "light",
		}
	}

	pub fn parse(value: &str) -> Option<Self> {
		match value.trim() {
			"dark" => Some(ThemeMode::Dark),
			"light" => Some(ThemeMode::Light),
			_ => None,
		}
	}

	pub fn toggled(self) -> Self {
		match self {
			ThemeMode::Dark => ThemeMode::Light,
			ThemeMode::Light => ThemeMode::Dark,
		}
	}

	/// Resolve the mode from a stored preference, falling back to the system setting.
	pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
		stored.and_then(Self::parse).unwrap_or(if prefers_dark {
			ThemeMode::Dark
		} else {
			ThemeMode::Light
		})
	}
}

/// Local storage key holding the preference.
const STORAGE_KEY: &str = "theme";

/// Read the stored preference, or the `prefers-color-scheme` media query when none is stored.
pub fn load_theme_mode() -> ThemeMode {
	let Some(window) = web_sys::window() else {
		return ThemeMode::default();
	};
	let stored = window
		.local_storage()
		.ok()
		.flatten()
		.and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten());
	let prefers_dark = window
		.match_media("(prefers-color-scheme: dark)")
		.ok()
		.flatten()
		.is_some_and(|query| query.matches());
	ThemeMode::resolve(stored.as_deref(), prefers_dark)
}

/// Persist the preference and toggle the `dark` class on the document element.
pub fn apply_theme_mode(mode: ThemeMode) {
	let Some(window) = web_sys::window() else {
		return;
	};
	if let Some(root) = window.document().and_then(|d| d.document_element()) {
		let classes = root.class_list();
		let _ = match mode {
			ThemeMode::Dark => classes.add_1("dark"),
			ThemeMode::Light => classes.remove_1("dark"),
		};
	}
	if let Ok(Some(storage)) = window.local_storage() {
		let _ = storage.set_item(STORAGE_KEY, mode.as_str());
	}
	debug!("particle-network: theme set to {}", mode.as_str());
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub mode: ThemeMode,
	pub palette: GradientPalette,
	/// Canvas fill behind the field. `None` leaves the canvas transparent.
	pub background: Option<Color>,
	pub line_color: Color,
	pub line_opacity: f64,
	pub line_width: f64,
	/// Point diameter in world units, attenuated by depth.
	pub point_size: f64,
	pub point_opacity: f64,
	/// Shadow blur drawn around each point in CSS pixels. 0 draws no glow.
	pub point_glow: f64,
	pub blend: BlendMode,
}

impl Theme {
	/// Glowing field on a dark page (default)
	pub fn dark() -> Self {
		Self {
			name: "dark",
			mode: ThemeMode::Dark,
			palette: GradientPalette::neural(),
			background: None,
			line_color: Color::hex(0x7dd3fc),
			line_opacity: 0.25,
			line_width: 1.0,
			point_size: 0.06,
			point_opacity: 0.9,
			point_glow: 0.0,
			blend: BlendMode::Additive,
		}
	}

	/// Deeper colors and normal blending for a light page
	pub fn light() -> Self {
		Self {
			name: "light",
			mode: ThemeMode::Light,
			palette: GradientPalette::neural_light(),
			background: None,
			line_color: Color::hex(0x0284c7),
			line_opacity: 0.3,
			line_width: 1.0,
			point_size: 0.07,
			point_opacity: 0.85,
			point_glow: 0.0,
			blend: BlendMode::Normal,
		}
	}

	pub fn for_mode(mode: ThemeMode) -> Self {
		match mode {
			ThemeMode::Dark => Self::dark(),
			ThemeMode::Light => Self::light(),
		}
	}

	/// Glow points by `blur` pixels. Only the dark theme glows; the light theme is returned as is.
	pub fn with_glow(self, blur: f64) -> Self {
		match self.mode {
			ThemeMode::Dark => Self {
				point_glow: blur.max(0.0),
				..self
			},
			ThemeMode::Light => self,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}
