//! Environment variable handling.
//!
//! [`Env`] is a prefix-scoped snapshot of key/value pairs. It is built from an
//! iterator rather than read from `std::env` directly so that the same code
//! path serves the process environment, `.env`-style maps, and tests.

use std::collections::HashMap;

/// Errors raised while reading environment overrides.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
	/// The variable is present but could not be parsed.
	#[error("Failed to parse environment variable '{key}' ({value_len} bytes): {error}")]
	ParseError {
		key: String,
		value_len: usize,
		error: String,
	},
}

/// Prefix-scoped snapshot of environment variables.
#[derive(Debug, Clone, Default)]
pub struct Env {
	prefix: String,
	vars: HashMap<String, String>,
}

impl Env {
	/// Keeps only the pairs whose key starts with `prefix`, stripping it.
	pub fn from_pairs<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let prefix = prefix.into();
		let vars = vars
			.into_iter()
			.filter_map(|(key, value)| {
				key.as_ref()
					.strip_prefix(prefix.as_str())
					.map(|name| (name.to_string(), value.as_ref().to_string()))
			})
			.collect();
		Self { prefix, vars }
	}

	/// Number of prefixed variables captured.
	pub fn len(&self) -> usize {
		self.vars.len()
	}

	/// Returns `true` when no prefixed variable was captured.
	pub fn is_empty(&self) -> bool {
		self.vars.is_empty()
	}

	/// Reads a string value. Blank values count as unset.
	pub fn str(&self, key: &str) -> Option<String> {
		self.vars
			.get(key)
			.map(|value| value.trim())
			.filter(|value| !value.is_empty())
			.map(str::to_string)
	}

	/// Reads a comma-separated list.
	pub fn list(&self, key: &str) -> Option<Vec<String>> {
		self.vars.get(key).map(|value| parse_list(value))
	}

	/// Reads an unsigned 64-bit integer.
	pub fn u64(&self, key: &str) -> Result<Option<u64>, EnvError> {
		self.parse_with(key, |value| value.parse::<u64>().map_err(|e| e.to_string()))
	}

	/// Reads an unsigned 32-bit integer.
	pub fn u32(&self, key: &str) -> Result<Option<u32>, EnvError> {
		self.parse_with(key, |value| value.parse::<u32>().map_err(|e| e.to_string()))
	}

	/// Reads a boolean (`true/false`, `yes/no`, `on/off`, `1/0`).
	pub fn bool(&self, key: &str) -> Result<Option<bool>, EnvError> {
		self.parse_with(key, parse_bool)
	}

	fn parse_with<T>(
		&self,
		key: &str,
		parse: impl FnOnce(&str) -> Result<T, String>,
	) -> Result<Option<T>, EnvError> {
		let Some(value) = self.str(key) else {
			return Ok(None);
		};
		parse(&value).map(Some).map_err(|error| EnvError::ParseError {
			key: format!("{}{}", self.prefix, key),
			value_len: value.len(),
			error,
		})
	}
}

/// Parses a boolean environment value.
pub fn parse_bool(value: &str) -> Result<bool, String> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Ok(true),
		"false" | "no" | "off" | "0" => Ok(false),
		other => Err(format!("expected a boolean, got '{}'", other)),
	}
}

/// Splits a comma-separated value, trimming entries and dropping blanks.
pub fn parse_list(value: &str) -> Vec<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|item| !item.is_empty())
		.map(str::to_string)
		.collect()
}
