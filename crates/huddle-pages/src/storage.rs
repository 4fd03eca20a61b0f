//! Durable client storage.
//!
//! The browser's `localStorage` behind a small [`Storage`] trait, so the
//! sidebar, session cache, and theme cache can be exercised natively with
//! [`MemoryStorage`].
//!
//! Values are strings. Structured values go through [`read_json`] and
//! [`write_json`]; a value that fails to parse is reported and treated as
//! absent, never as an error the caller has to handle.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::warn_log;

#[cfg(target_arch = "wasm32")]
pub use browser::LocalStorage;

/// Error type for storage operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
	/// No storage area is available (private mode, sandboxed frame, no window).
	#[error("Storage is not available")]
	Unavailable,
	/// The browser rejected the write, typically because the quota is full.
	#[error("Failed to write '{key}': {message}")]
	WriteFailed {
		/// Key being written.
		key: String,
		/// Browser-supplied reason.
		message: String,
	},
	/// The value could not be serialized.
	#[error("Failed to serialize '{key}': {message}")]
	Serialize {
		/// Key being written.
		key: String,
		/// Serializer message.
		message: String,
	},
}

/// A string key/value store that survives page reloads.
pub trait Storage {
	/// Reads a value.
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

	/// Writes a value, replacing any previous one.
	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

	/// Deletes a value. Deleting a missing key succeeds.
	fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Reads and deserializes a JSON value.
///
/// Missing keys, unavailable storage, and corrupt JSON all yield `None`.
pub fn read_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
	let raw = match storage.get_item(key) {
		Ok(Some(raw)) => raw,
		Ok(None) => return None,
		Err(err) => {
			warn_log!("Reading '{}' from storage failed: {}", key, err);
			return None;
		}
	};
	match serde_json::from_str(&raw) {
		Ok(value) => Some(value),
		Err(err) => {
			warn_log!("Ignoring corrupt value under '{}': {}", key, err);
			None
		}
	}
}

/// Serializes and writes a JSON value.
pub fn write_json<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) -> Result<(), StorageError> {
	let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
		key: key.to_string(),
		message: e.to_string(),
	})?;
	storage.set_item(key, &raw)
}

/// In-memory [`Storage`].
///
/// Clones share the same backing map, so a test can keep a handle while the
/// context owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
	items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store pre-populated with `items`.
	pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
	where
		K: Into<String>,
		V: Into<String>,
	{
		let storage = Self::new();
		storage
			.items
			.borrow_mut()
			.extend(items.into_iter().map(|(k, v)| (k.into(), v.into())));
		storage
	}

	/// Reads a value directly, bypassing the trait's `Result`.
	pub fn get(&self, key: &str) -> Option<String> {
		self.items.borrow().get(key).cloned()
	}

	/// Whether `key` is present.
	pub fn contains(&self, key: &str) -> bool {
		self.items.borrow().contains_key(key)
	}

	/// Number of stored keys.
	pub fn len(&self) -> usize {
		self.items.borrow().len()
	}

	/// Whether the store is empty.
	pub fn is_empty(&self) -> bool {
		self.items.borrow().is_empty()
	}
}

impl Storage for MemoryStorage {
	fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
		Ok(self.get(key))
	}

	fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
		self.items
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove_item(&self, key: &str) -> Result<(), StorageError> {
		self.items.borrow_mut().remove(key);
		Ok(())
	}
}

#[cfg(target_arch = "wasm32")]
mod browser {
	use super::{Storage, StorageError};

	/// `window.localStorage`.
	#[derive(Debug, Clone)]
	pub struct LocalStorage {
		inner: web_sys::Storage,
	}

	impl LocalStorage {
		/// Opens the window's local storage area.
		pub fn open() -> Result<Self, StorageError> {
			let inner = web_sys::window()
				.and_then(|w| w.local_storage().ok().flatten())
				.ok_or(StorageError::Unavailable)?;
			Ok(Self { inner })
		}
	}

	impl Storage for LocalStorage {
		fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
			self.inner
				.get_item(key)
				.map_err(|_| StorageError::Unavailable)
		}

		fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
			self.inner
				.set_item(key, value)
				.map_err(|e| StorageError::WriteFailed {
					key: key.to_string(),
					message: e.as_string().unwrap_or_else(|| format!("{:?}", e)),
				})
		}

		fn remove_item(&self, key: &str) -> Result<(), StorageError> {
			self.inner
				.remove_item(key)
				.map_err(|_| StorageError::Unavailable)
		}
	}
}
