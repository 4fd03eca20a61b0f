//! Settings structures and their defaults.

use serde::{Deserialize, Serialize};

use crate::SettingsError;
use crate::env::Env;

/// Name of the route the shell falls back to when the hash is empty.
pub const DEFAULT_ROUTE: &str = "dashboard";

/// Main settings structure for the client shell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Hosted auth/database backend.
	pub backend: BackendSettings,

	/// Hash routing and the public route allow-list.
	pub routing: RoutingSettings,

	/// Page fade transitions.
	pub transition: TransitionSettings,

	/// Sidebar persistence and responsive breakpoints.
	pub sidebar: SidebarSettings,

	/// Durable client storage keys.
	pub storage: StorageKeys,
}

/// Connection details for the hosted backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
	/// Base URL of the backend project.
	pub url: String,

	/// Public anon key sent with every request.
	pub anon_key: String,
}

/// Hash routing configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
	/// Route used when the hash is empty, and the redirect target for
	/// signed-in users visiting a public route.
	pub default_route: String,

	/// Route unauthenticated users are redirected to.
	pub login_route: String,

	/// Segment under which the not-found page is registered.
	pub not_found_segment: String,

	/// Routes reachable without a session.
	pub public_routes: Vec<String>,
}

impl Default for RoutingSettings {
	fn default() -> Self {
		Self {
			default_route: DEFAULT_ROUTE.to_string(),
			login_route: "login".to_string(),
			not_found_segment: "404".to_string(),
			public_routes: vec![
				"login".to_string(),
				"signup".to_string(),
				"reset-password".to_string(),
				"404".to_string(),
			],
		}
	}
}

/// Fade transition configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
	/// Duration of each fade phase in milliseconds.
	pub fade_duration_ms: u64,

	/// Class applied to the content region while fading out.
	pub fade_out_class: String,

	/// Class applied to the content region while fading in.
	pub fade_in_class: String,
}

impl Default for TransitionSettings {
	fn default() -> Self {
		Self {
			fade_duration_ms: 300,
			fade_out_class: "page-fade-out".to_string(),
			fade_in_class: "page-fade-in".to_string(),
		}
	}
}

/// Sidebar configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarSettings {
	/// Storage key holding the persisted sidebar state.
	pub storage_key: String,

	/// Viewports narrower than this (in CSS pixels) force the sidebar closed.
	pub mobile_breakpoint: u32,

	/// Viewports narrower than this shrink an expanded sidebar to icons.
	pub tablet_breakpoint: u32,
}

impl Default for SidebarSettings {
	fn default() -> Self {
		Self {
			storage_key: "sidebarState".to_string(),
			mobile_breakpoint: 768,
			tablet_breakpoint: 1024,
		}
	}
}

/// Keys used in durable client storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
	/// Serialized session cache.
	pub session: String,

	/// Flag marking the cached session as temporary.
	pub temporary_session: String,

	/// Cached theme (`{"color": ...}`).
	pub theme: String,
}

impl Default for StorageKeys {
	fn default() -> Self {
		Self {
			session: "huddle.session".to_string(),
			temporary_session: "huddle.session.temporary".to_string(),
			theme: "huddle.theme".to_string(),
		}
	}
}

impl Settings {
	/// Parses settings from TOML, filling missing fields with defaults.
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Settings = toml::from_str(source)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Builds settings from the `HUDDLE_*` variables captured when the crate
	/// was compiled.
	///
	/// Only the backend section is read this way; everything else keeps its
	/// default.
	pub fn from_build_env() -> Self {
		let mut settings = Settings::default();
		if let Some(url) = option_env!("HUDDLE_BACKEND_URL") {
			settings.backend.url = url.to_string();
		}
		if let Some(key) = option_env!("HUDDLE_BACKEND_ANON_KEY") {
			settings.backend.anon_key = key.to_string();
		}
		if settings.backend.url.is_empty() {
			tracing::warn!("HUDDLE_BACKEND_URL was not set at build time");
		}
		settings
	}

	/// Reads `HUDDLE_*` overrides from the process environment.
	///
	/// Used by native builds (server-side rendering, tests). Browser builds
	/// should use [`Settings::from_build_env`].
	pub fn from_env() -> Result<Self, SettingsError> {
		Settings::default().with_env_overrides(std::env::vars())
	}

	/// Applies `HUDDLE_*` overrides from an iterator of key/value pairs and
	/// validates the result.
	///
	/// Unknown keys are ignored.
	pub fn with_env_overrides<I, K, V>(mut self, vars: I) -> Result<Self, SettingsError>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let env = Env::from_pairs("HUDDLE_", vars);

		if let Some(url) = env.str("BACKEND_URL") {
			self.backend.url = url;
		}
		if let Some(key) = env.str("BACKEND_ANON_KEY") {
			self.backend.anon_key = key;
		}
		if let Some(route) = env.str("DEFAULT_ROUTE") {
			self.routing.default_route = route;
		}
		if let Some(route) = env.str("LOGIN_ROUTE") {
			self.routing.login_route = route;
		}
		if let Some(routes) = env.list("PUBLIC_ROUTES") {
			self.routing.public_routes = routes;
		}
		if let Some(ms) = env.u64("FADE_DURATION_MS")? {
			self.transition.fade_duration_ms = ms;
		}
		if let Some(px) = env.u32("MOBILE_BREAKPOINT")? {
			self.sidebar.mobile_breakpoint = px;
		}
		if let Some(px) = env.u32("TABLET_BREAKPOINT")? {
			self.sidebar.tablet_breakpoint = px;
		}

		self.validate()?;
		Ok(self)
	}

	/// Returns `true` when `route` is on the public allow-list.
	///
	/// Comparison ignores ASCII case.
	pub fn is_public_route(&self, route: &str) -> bool {
		self.routing
			.public_routes
			.iter()
			.any(|public| public.eq_ignore_ascii_case(route))
	}
}
