//! Cached team color.
//!
//! The team's primary color is stored as `{"color": "#rrggbb"}` so the shell
//! can paint it before the backend answers. Invalid colors and corrupt JSON
//! are ignored.

use serde::{Deserialize, Serialize};

use crate::dom::Shell;
use crate::storage::{Storage, StorageError, read_json, write_json};
use crate::warn_log;

/// CSS custom property carrying the team color.
pub const THEME_COLOR_VARIABLE: &str = "--team-color";

/// Fallback when nothing valid is cached.
pub const DEFAULT_THEME_COLOR: &str = "#1f6feb";

/// A cached theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
	/// Hex color, `#rgb` or `#rrggbb`.
	pub color: String,
}

impl Theme {
	/// Creates a theme, rejecting anything that is not a hex color.
	pub fn new(color: impl Into<String>) -> Option<Self> {
		let color = color.into();
		is_hex_color(&color).then_some(Self { color })
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			color: DEFAULT_THEME_COLOR.to_string(),
		}
	}
}

/// Whether `value` is `#rgb` or `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
	let Some(hex) = value.strip_prefix('#') else {
		return false;
	};
	matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Reads and writes the cached theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeCache {
	key: String,
}

impl ThemeCache {
	/// Uses `key` in durable storage.
	pub fn new(key: impl Into<String>) -> Self {
		Self { key: key.into() }
	}

	/// The cached theme, if present and valid.
	pub fn load(&self, storage: &dyn Storage) -> Option<Theme> {
		let theme = read_json::<Theme>(storage, &self.key)?;
		if is_hex_color(&theme.color) {
			Some(theme)
		} else {
			warn_log!("Ignoring cached theme color '{}'", theme.color);
			None
		}
	}

	/// Caches `theme`.
	pub fn store(&self, storage: &dyn Storage, theme: &Theme) -> Result<(), StorageError> {
		write_json(storage, &self.key, theme)
	}

	/// Removes the cached theme.
	pub fn clear(&self, storage: &dyn Storage) -> Result<(), StorageError> {
		storage.remove_item(&self.key)
	}

	/// Paints the cached theme, or the default, onto the shell.
	pub fn apply(&self, storage: &dyn Storage, shell: &dyn Shell) -> Theme {
		let theme = self.load(storage).unwrap_or_default();
		shell.set_css_variable(THEME_COLOR_VARIABLE, &theme.color);
		theme
	}
}
