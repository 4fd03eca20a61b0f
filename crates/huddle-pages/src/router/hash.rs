//! Parsing of `location.hash`.

use huddle_conf::settings::DEFAULT_ROUTE;

/// A parsed route: `#/<base>/<sub>?<query>`.
///
/// Derived from the hash on every navigation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
	base: String,
	sub: Option<String>,
	full: String,
	query: Vec<(String, String)>,
}

impl Route {
	/// Parses a raw hash.
	///
	/// Accepts `""`, `"#"`, `"#/base"`, `"#/base/sub"`, with or without a
	/// trailing slash or `?query`. Everything after the first `/` of the path
	/// is the `sub` segment. An empty base becomes `default_route` (or
	/// `dashboard` if that is blank too). Never fails.
	pub fn parse(hash: &str, default_route: &str) -> Self {
		let raw = hash.trim();
		let raw = raw.strip_prefix('#').unwrap_or(raw);
		let raw = raw.trim_start_matches('/');

		let (path, query) = match raw.split_once('?') {
			Some((path, query)) => (path, parse_query(query)),
			None => (raw, Vec::new()),
		};
		let path = path.trim_matches('/');

		let (base, sub) = match path.split_once('/') {
			Some((base, rest)) => (base, Some(rest.trim_matches('/'))),
			None => (path, None),
		};
		let sub = sub.filter(|s| !s.is_empty()).map(str::to_string);

		let base = if !base.is_empty() {
			base.to_string()
		} else if !default_route.trim().is_empty() {
			default_route.trim().to_string()
		} else {
			DEFAULT_ROUTE.to_string()
		};

		let full = match &sub {
			Some(sub) => format!("{}/{}", base, sub),
			None => base.clone(),
		};

		Self {
			base,
			sub,
			full,
			query,
		}
	}

	/// First path segment.
	pub fn base(&self) -> &str {
		&self.base
	}

	/// Remainder of the path after the base, if any.
	pub fn sub(&self) -> Option<&str> {
		self.sub.as_deref()
	}

	/// `base` or `base/sub`.
	pub fn full(&self) -> &str {
		&self.full
	}

	/// Decoded query pairs, in order.
	pub fn query_pairs(&self) -> &[(String, String)] {
		&self.query
	}

	/// First value for `key` in the query string.
	pub fn query(&self, key: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Canonical hash for this route, without the query.
	pub fn to_hash(&self) -> String {
		format!("#/{}", self.full)
	}
}

impl std::fmt::Display for Route {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.full)
	}
}

/// Decodes a query string, yielding nothing for malformed input.
fn parse_query(query: &str) -> Vec<(String, String)> {
	serde_urlencoded::from_str::<Vec<(String, String)>>(query).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", "dashboard", None)]
	#[case("#", "dashboard", None)]
	#[case("#/", "dashboard", None)]
	#[case("#/roster", "roster", None)]
	#[case("#/roster/", "roster", None)]
	#[case("#roster", "roster", None)]
	#[case("#/playbook/edit", "playbook", Some("edit"))]
	#[case("#/playbook/edit/42", "playbook", Some("edit/42"))]
	#[case("#//playbook//edit", "playbook", Some("edit"))]
	#[case("#/reset-password?type=recovery", "reset-password", None)]
	#[case("#/?type=recovery", "dashboard", None)]
	#[case("  #/roster  ", "roster", None)]
	fn test_parse(#[case] hash: &str, #[case] base: &str, #[case] sub: Option<&str>) {
		let route = Route::parse(hash, "dashboard");
		assert_eq!(route.base(), base);
		assert_eq!(route.sub(), sub);
	}

	#[rstest]
	fn test_full_joins_segments() {
		assert_eq!(Route::parse("#/playbook/edit", "dashboard").full(), "playbook/edit");
		assert_eq!(Route::parse("#/roster?x=1", "dashboard").full(), "roster");
	}

	#[rstest]
	fn test_query_is_decoded_but_not_matched() {
		let route = Route::parse("#/reset-password?type=recovery&email=a%40b.c", "dashboard");

		assert_eq!(route.full(), "reset-password");
		assert_eq!(route.query("type"), Some("recovery"));
		assert_eq!(route.query("email"), Some("a@b.c"));
		assert_eq!(route.query("missing"), None);
	}

	#[rstest]
	fn test_blank_default_route_uses_builtin() {
		assert_eq!(Route::parse("#/", "  ").base(), "dashboard");
	}

	#[rstest]
	fn test_to_hash_drops_query() {
		let route = Route::parse("#/playbook/edit?id=3", "dashboard");
		assert_eq!(route.to_hash(), "#/playbook/edit");
	}

	#[rstest]
	fn test_case_is_preserved() {
		assert_eq!(Route::parse("#/Roster/Edit", "dashboard").full(), "Roster/Edit");
	}
}
