//! Session data and its durable cache.

use serde::{Deserialize, Serialize};

use huddle_conf::StorageKeys;

use crate::storage::{Storage, StorageError, read_json, write_json};
use crate::warn_log;

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Backend user id.
	pub id: String,
	/// Email address, when the provider exposes one.
	#[serde(default)]
	pub email: Option<String>,
}

impl User {
	/// Creates a user.
	pub fn new(id: impl Into<String>, email: Option<&str>) -> Self {
		Self {
			id: id.into(),
			email: email.map(str::to_string),
		}
	}
}

/// A session issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
	/// Bearer token for backend requests.
	pub access_token: String,
	/// Token used to obtain a fresh access token.
	#[serde(default)]
	pub refresh_token: Option<String>,
	/// Expiry as Unix seconds. `None` never expires.
	#[serde(default)]
	pub expires_at: Option<i64>,
	/// The signed-in user.
	pub user: User,
}

impl Session {
	/// Creates a session without expiry.
	pub fn new(access_token: impl Into<String>, user: User) -> Self {
		Self {
			access_token: access_token.into(),
			refresh_token: None,
			expires_at: None,
			user,
		}
	}

	/// Sets the expiry (Unix seconds).
	pub fn with_expiry(mut self, expires_at: i64) -> Self {
		self.expires_at = Some(expires_at);
		self
	}

	/// Sets the refresh token.
	pub fn with_refresh_token(mut self, token: impl Into<String>) -> Self {
		self.refresh_token = Some(token.into());
		self
	}

	/// Whether the session has expired at `now` (Unix seconds).
	pub fn is_expired(&self, now: i64) -> bool {
		self.expires_at.is_some_and(|at| at <= now)
	}
}

/// Current time as Unix seconds.
#[cfg(target_arch = "wasm32")]
pub fn now_unix() -> i64 {
	(js_sys::Date::now() / 1000.0) as i64
}

/// Current time as Unix seconds.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_unix() -> i64 {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs() as i64)
		.unwrap_or_default()
}

/// A session read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedSession {
	/// The cached session.
	pub session: Session,
	/// Whether it was stored as temporary ("remember me" unchecked).
	pub temporary: bool,
}

/// The session copy kept in durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCache {
	session_key: String,
	temporary_key: String,
}

impl SessionCache {
	/// Uses the configured storage keys.
	pub fn new(keys: &StorageKeys) -> Self {
		Self {
			session_key: keys.session.clone(),
			temporary_key: keys.temporary_session.clone(),
		}
	}

	/// Key holding the serialized session.
	pub fn session_key(&self) -> &str {
		&self.session_key
	}

	/// Key holding the temporary flag.
	pub fn temporary_key(&self) -> &str {
		&self.temporary_key
	}

	/// Persists `session`, marking it temporary when requested.
	pub fn store(&self, storage: &dyn Storage, session: &Session, temporary: bool) -> Result<(), StorageError> {
		write_json(storage, &self.session_key, session)?;
		if temporary {
			storage.set_item(&self.temporary_key, "true")
		} else {
			storage.remove_item(&self.temporary_key)
		}
	}

	/// Whether the cached session is flagged temporary.
	pub fn is_temporary(&self, storage: &dyn Storage) -> bool {
		matches!(storage.get_item(&self.temporary_key), Ok(Some(flag)) if flag == "true")
	}

	/// Reads the cached session.
	///
	/// Corrupt or expired entries are removed and reported as absent.
	pub fn load(&self, storage: &dyn Storage, now: i64) -> Option<CachedSession> {
		let Some(session) = read_json::<Session>(storage, &self.session_key) else {
			if matches!(storage.get_item(&self.session_key), Ok(Some(_))) {
				self.clear(storage);
			}
			return None;
		};
		if session.is_expired(now) {
			warn_log!("Cached session for {} has expired", session.user.id);
			self.clear(storage);
			return None;
		}
		Some(CachedSession {
			temporary: self.is_temporary(storage),
			session,
		})
	}

	/// Removes the session and its flag.
	pub fn clear(&self, storage: &dyn Storage) {
		for key in [&self.session_key, &self.temporary_key] {
			if let Err(err) = storage.remove_item(key) {
				warn_log!("Failed to clear '{}': {}", key, err);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::storage::MemoryStorage;
	use rstest::{fixture, rstest};

	#[fixture]
	fn cache() -> SessionCache {
		SessionCache::new(&StorageKeys::default())
	}

	fn session() -> Session {
		Session::new("access", User::new("u-1", Some("coach@example.com")))
			.with_refresh_token("refresh")
			.with_expiry(2_000)
	}

	#[rstest]
	fn test_store_and_load(cache: SessionCache) {
		let storage = MemoryStorage::new();
		cache.store(&storage, &session(), false).unwrap();

		let cached = cache.load(&storage, 1_000).unwrap();
		assert_eq!(cached.session, session());
		assert!(!cached.temporary);
		assert!(!storage.contains(cache.temporary_key()));
	}

	#[rstest]
	fn test_temporary_flag_round_trips(cache: SessionCache) {
		let storage = MemoryStorage::new();
		cache.store(&storage, &session(), true).unwrap();
		assert!(cache.load(&storage, 1_000).unwrap().temporary);

		// Re-storing as durable drops the flag.
		cache.store(&storage, &session(), false).unwrap();
		assert!(!cache.is_temporary(&storage));
	}

	#[rstest]
	fn test_expired_session_is_dropped(cache: SessionCache) {
		let storage = MemoryStorage::new();
		cache.store(&storage, &session(), true).unwrap();

		assert_eq!(cache.load(&storage, 2_000), None);
		assert!(storage.is_empty());
	}

	#[rstest]
	fn test_corrupt_session_is_dropped(cache: SessionCache) {
		let storage = MemoryStorage::with_items([("huddle.session", "{\"access_token\":")]);

		assert_eq!(cache.load(&storage, 0), None);
		assert!(!storage.contains("huddle.session"));
	}

	#[rstest]
	fn test_session_without_expiry_never_expires() {
		let session = Session::new("t", User::new("u", None));
		assert!(!session.is_expired(i64::MAX));
	}

	#[rstest]
	fn test_session_deserializes_with_optional_fields_missing() {
		let session: Session =
			serde_json::from_str(r#"{"access_token":"t","user":{"id":"u"}}"#).unwrap();
		assert_eq!(session.refresh_token, None);
		assert_eq!(session.user.email, None);
	}
}
