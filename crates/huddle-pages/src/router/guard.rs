//! Authentication guard for routes.

use huddle_conf::RoutingSettings;

use super::hash::Route;

/// Decision taken before any page code is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardAction {
	/// Continue with the navigation.
	Allow,
	/// Send a signed-out user to the login page.
	RedirectToLogin,
	/// Send a signed-in user away from a public page.
	RedirectToDefault,
}

/// Allow-list based guard.
///
/// | logged in | public route | action              |
/// |-----------|--------------|---------------------|
/// | no        | no           | redirect to login   |
/// | no        | yes          | allow               |
/// | yes       | yes          | redirect to default |
/// | yes       | no           | allow               |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
	public_routes: Vec<String>,
	login_route: String,
	default_route: String,
}

impl RouteGuard {
	/// Creates a guard. Public route names are matched case-insensitively.
	pub fn new(
		login_route: impl Into<String>,
		default_route: impl Into<String>,
		public_routes: impl IntoIterator<Item = impl AsRef<str>>,
	) -> Self {
		Self {
			public_routes: public_routes
				.into_iter()
				.map(|r| r.as_ref().trim().to_ascii_lowercase())
				.collect(),
			login_route: login_route.into(),
			default_route: default_route.into(),
		}
	}

	/// Guard configured from the routing settings.
	pub fn from_settings(settings: &RoutingSettings) -> Self {
		Self::new(
			settings.login_route.clone(),
			settings.default_route.clone(),
			&settings.public_routes,
		)
	}

	/// Whether `route` needs a signed-in user. Only the base segment counts.
	pub fn is_protected(&self, route: &Route) -> bool {
		let base = route.base().to_ascii_lowercase();
		!self.public_routes.iter().any(|r| *r == base)
	}

	/// Applies the guard table.
	pub fn decide(&self, is_logged_in: bool, route: &Route) -> GuardAction {
		match (is_logged_in, self.is_protected(route)) {
			(false, true) => GuardAction::RedirectToLogin,
			(true, false) => GuardAction::RedirectToDefault,
			_ => GuardAction::Allow,
		}
	}

	/// Hash to assign for a redirecting action.
	pub fn redirect_hash(&self, action: GuardAction) -> Option<String> {
		match action {
			GuardAction::Allow => None,
			GuardAction::RedirectToLogin => Some(format!("#/{}", self.login_route)),
			GuardAction::RedirectToDefault => Some(format!("#/{}", self.default_route)),
		}
	}
}
