//! Settings validation.
//!
//! Validation runs after every merge step so an invalid override is rejected
//! before the shell starts.

use crate::settings::Settings;

/// Upper bound for a single fade phase.
pub const MAX_FADE_DURATION_MS: u64 = 5_000;

/// Validation result
pub type ValidationResult = Result<(), ValidationError>;

/// Validation error
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("Invalid value for '{key}': {message}")]
	InvalidValue { key: String, message: String },

	#[error("Missing required field: {0}")]
	MissingRequired(String),

	#[error("Multiple validation errors: {0:?}")]
	Multiple(Vec<ValidationError>),
}

impl Settings {
	/// Checks cross-field constraints.
	pub fn validate(&self) -> ValidationResult {
		let mut errors = Vec::new();

		if self.routing.default_route.trim().is_empty() {
			errors.push(ValidationError::MissingRequired(
				"routing.default_route".to_string(),
			));
		} else if self.is_public_route(route_base(&self.routing.default_route)) {
			// A signed-in user on a public route is sent to the default route.
			errors.push(ValidationError::InvalidValue {
				key: "routing.default_route".to_string(),
				message: format!(
					"'{}' is public, signed-in users would be redirected to it forever",
					self.routing.default_route
				),
			});
		}
		if self.routing.login_route.trim().is_empty() {
			errors.push(ValidationError::MissingRequired(
				"routing.login_route".to_string(),
			));
		} else if !self.is_public_route(&self.routing.login_route) {
			errors.push(ValidationError::InvalidValue {
				key: "routing.public_routes".to_string(),
				message: format!(
					"must contain the login route '{}'",
					self.routing.login_route
				),
			});
		}
		if !self.routing.not_found_segment.trim().is_empty()
			&& !self.is_public_route(&self.routing.not_found_segment)
		{
			errors.push(ValidationError::InvalidValue {
				key: "routing.public_routes".to_string(),
				message: format!(
					"must contain the not-found segment '{}'",
					self.routing.not_found_segment
				),
			});
		}
		if self.sidebar.mobile_breakpoint >= self.sidebar.tablet_breakpoint {
			errors.push(ValidationError::InvalidValue {
				key: "sidebar.mobile_breakpoint".to_string(),
				message: format!(
					"{} must be below tablet_breakpoint {}",
					self.sidebar.mobile_breakpoint, self.sidebar.tablet_breakpoint
				),
			});
		}
		if self.transition.fade_duration_ms > MAX_FADE_DURATION_MS {
			errors.push(ValidationError::InvalidValue {
				key: "transition.fade_duration_ms".to_string(),
				message: format!("must not exceed {}ms", MAX_FADE_DURATION_MS),
			});
		}
		if self.sidebar.storage_key.is_empty() {
			errors.push(ValidationError::MissingRequired(
				"sidebar.storage_key".to_string(),
			));
		}

		match errors.len() {
			0 => Ok(()),
			1 => Err(errors.remove(0)),
			_ => Err(ValidationError::Multiple(errors)),
		}
	}
}

/// First path segment, which is what the guard checks.
fn route_base(route: &str) -> &str {
	let route = route.trim().trim_start_matches('/');
	route.split('/').next().unwrap_or(route)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_empty_default_route_rejected() {
		let mut settings = Settings::default();
		settings.routing.default_route = " ".to_string();

		assert_eq!(
			settings.validate(),
			Err(ValidationError::MissingRequired(
				"routing.default_route".to_string()
			))
		);
	}

	#[rstest]
	fn test_login_route_must_be_public() {
		let mut settings = Settings::default();
		settings.routing.public_routes = vec!["signup".to_string()];

		assert!(matches!(
			settings.validate(),
			Err(ValidationError::InvalidValue { ref key, .. }) if key == "routing.public_routes"
		));
	}

	#[rstest]
	#[case("login")]
	#[case("SignUp")]
	#[case("404")]
	#[case("login/help")]
	fn test_public_default_route_rejected(#[case] route: &str) {
		let mut settings = Settings::default();
		settings.routing.default_route = route.to_string();

		assert!(matches!(
			settings.validate(),
			Err(ValidationError::InvalidValue { ref key, .. }) if key == "routing.default_route"
		));
	}

	#[rstest]
	fn test_not_found_segment_must_be_public() {
		let mut settings = Settings::default();
		settings.routing.not_found_segment = "lost".to_string();

		assert!(matches!(
			settings.validate(),
			Err(ValidationError::InvalidValue { ref message, .. }) if message.contains("'lost'")
		));

		settings.routing.public_routes.push("lost".to_string());
		assert!(settings.validate().is_ok());
	}

	#[rstest]
	fn test_fade_duration_upper_bound() {
		let mut settings = Settings::default();
		settings.transition.fade_duration_ms = MAX_FADE_DURATION_MS;
		assert!(settings.validate().is_ok());

		settings.transition.fade_duration_ms = MAX_FADE_DURATION_MS + 1;
		assert!(settings.validate().is_err());
	}

	#[rstest]
	fn test_multiple_errors_collected() {
		let mut settings = Settings::default();
		settings.routing.default_route.clear();
		settings.sidebar.mobile_breakpoint = 2000;

		match settings.validate() {
			Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 2),
			other => panic!("expected multiple errors, got {:?}", other),
		}
	}
}
