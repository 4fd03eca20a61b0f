//! # Huddle Settings
//!
//! Configuration for the Huddle client shell.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. [`Settings::default()`]
//! 2. TOML text via [`Settings::from_toml_str`]
//! 3. `HUDDLE_*` key/value overrides via [`Settings::with_env_overrides`]
//!
//! The browser bundle has no process environment, so the backend endpoint and
//! anon key are captured at compile time by [`Settings::from_build_env`].
//!
//! ## Example
//!
//! ```
//! use huddle_conf::Settings;
//!
//! let settings = Settings::from_toml_str(
//!     r#"
//!     [routing]
//!     default_route = "roster"
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(settings.routing.default_route, "roster");
//! assert_eq!(settings.sidebar.storage_key, "sidebarState");
//! ```

pub mod env;
pub mod settings;
pub mod validation;

pub use env::{Env, EnvError, parse_bool, parse_list};
pub use settings::{
	BackendSettings, RoutingSettings, Settings, SidebarSettings, StorageKeys, TransitionSettings,
};
pub use validation::{ValidationError, ValidationResult};

/// Errors raised while loading settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// The TOML source could not be parsed.
	#[error("Invalid settings TOML: {0}")]
	Toml(#[from] toml::de::Error),

	/// An environment override could not be applied.
	#[error(transparent)]
	Env(#[from] EnvError),

	/// The merged settings failed validation.
	#[error(transparent)]
	Validation(#[from] ValidationError),
}
