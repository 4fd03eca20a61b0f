//! Settings, profile, and membership records from the hosted database.
//!
//! The database is reached through [`TableClient`], a thin query-builder
//! interface. [`TeamRepository`] sits on top of it and never fails: a query
//! error is logged and the caller gets an empty or default value, so a page
//! can render its empty state instead of breaking.

use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{IntoView, View};
use crate::error_log;

/// Tables the shell reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
	/// `profiles`
	Profiles,
	/// `team_settings`
	TeamSettings,
	/// `team_memberships`
	TeamMemberships,
	/// `user_settings`
	UserSettings,
}

impl Table {
	/// Table name in the database.
	pub fn as_str(self) -> &'static str {
		match self {
			Table::Profiles => "profiles",
			Table::TeamSettings => "team_settings",
			Table::TeamMemberships => "team_memberships",
			Table::UserSettings => "user_settings",
		}
	}
}

impl std::fmt::Display for Table {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error type for table operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
	/// The database rejected the query.
	#[error("Query on '{table}' failed: {message}")]
	Query {
		/// Table queried.
		table: Table,
		/// Database message.
		message: String,
	},
	/// A row did not have the expected shape.
	#[error("Unexpected row shape in '{table}': {message}")]
	Decode {
		/// Table queried.
		table: Table,
		/// Deserializer message.
		message: String,
	},
	/// The request did not reach the database.
	#[error("Database request failed: {0}")]
	Network(String),
}

/// An equality filter (`column = value`).
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
	/// Column name.
	pub column: String,
	/// Expected value.
	pub value: Value,
}

impl Filter {
	/// `column = value`
	pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
		Self {
			column: column.into(),
			value: value.into(),
		}
	}

	/// Whether `row` satisfies this filter.
	pub fn matches(&self, row: &Value) -> bool {
		row.get(&self.column) == Some(&self.value)
	}
}

/// Query-builder interface of the hosted database.
#[async_trait(?Send)]
pub trait TableClient {
	/// Rows matching every filter.
	async fn select(&self, table: Table, filters: &[Filter]) -> Result<Vec<Value>, BackendError>;

	/// Merges `patch` into the matching rows and returns them.
	async fn update(&self, table: Table, filters: &[Filter], patch: Value) -> Result<Vec<Value>, BackendError>;

	/// Inserts a row and returns it as stored.
	async fn insert(&self, table: Table, row: Value) -> Result<Value, BackendError>;
}

/// A row of `profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	/// User id.
	pub id: String,
	/// Display name.
	#[serde(default)]
	pub full_name: Option<String>,
	/// Avatar image URL.
	#[serde(default)]
	pub avatar_url: Option<String>,
}

/// A row of `team_settings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSettings {
	/// Team id.
	pub team_id: String,
	/// Team display name.
	#[serde(default)]
	pub team_name: Option<String>,
	/// Sport played.
	#[serde(default)]
	pub sport: Option<String>,
	/// Team color (`#rrggbb`).
	#[serde(default)]
	pub primary_color: Option<String>,
}

/// A row of `team_memberships`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
	/// Team id.
	pub team_id: String,
	/// User id.
	pub user_id: String,
	/// Role within the team (`coach`, `player`, ...).
	pub role: String,
}

/// A row of `user_settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
	/// User id.
	pub user_id: String,
	/// Team shown on the dashboard.
	#[serde(default)]
	pub active_team_id: Option<String>,
	/// Whether playbook animations autoplay.
	#[serde(default)]
	pub autoplay_animations: bool,
}

impl UserSettings {
	/// Defaults for `user_id`.
	pub fn for_user(user_id: impl Into<String>) -> Self {
		Self {
			user_id: user_id.into(),
			..Self::default()
		}
	}
}

/// Degrade-on-error reads over the shell's tables.
pub struct TeamRepository<C: TableClient> {
	client: Rc<C>,
}

impl<C: TableClient> std::fmt::Debug for TeamRepository<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TeamRepository").finish_non_exhaustive()
	}
}

impl<C: TableClient> TeamRepository<C> {
	/// Wraps a table client.
	pub fn new(client: Rc<C>) -> Self {
		Self { client }
	}

	/// The user's profile, or `None` when missing or unreadable.
	pub async fn profile(&self, user_id: &str) -> Option<Profile> {
		self.first(Table::Profiles, &[Filter::eq("id", user_id)]).await
	}

	/// Settings of one team, or `None` when missing or unreadable.
	pub async fn team_settings(&self, team_id: &str) -> Option<TeamSettings> {
		self.first(Table::TeamSettings, &[Filter::eq("team_id", team_id)])
			.await
	}

	/// The user's team memberships. Empty on error.
	pub async fn memberships(&self, user_id: &str) -> Vec<TeamMembership> {
		let rows = self
			.client
			.select(Table::TeamMemberships, &[Filter::eq("user_id", user_id)])
			.await;
		match rows.and_then(|rows| decode_rows(Table::TeamMemberships, rows)) {
			Ok(memberships) => memberships,
			Err(err) => {
				error_log!("{}", err);
				Vec::new()
			}
		}
	}

	/// The user's settings, falling back to defaults.
	pub async fn user_settings(&self, user_id: &str) -> UserSettings {
		self.first(Table::UserSettings, &[Filter::eq("user_id", user_id)])
			.await
			.unwrap_or_else(|| UserSettings::for_user(user_id))
	}

	/// Writes the user's settings, inserting the row if it does not exist.
	///
	/// Unlike the reads, a failed write is returned so the settings form can
	/// show it.
	pub async fn save_user_settings(&self, settings: &UserSettings) -> Result<(), BackendError> {
		let row = serde_json::to_value(settings).map_err(|e| BackendError::Decode {
			table: Table::UserSettings,
			message: e.to_string(),
		})?;
		let filters = [Filter::eq("user_id", settings.user_id.as_str())];

		let updated = self
			.client
			.update(Table::UserSettings, &filters, row.clone())
			.await?;
		if updated.is_empty() {
			self.client.insert(Table::UserSettings, row).await?;
		}
		Ok(())
	}

	async fn first<T: DeserializeOwned>(&self, table: Table, filters: &[Filter]) -> Option<T> {
		let rows = self.client.select(table, filters).await;
		match rows.and_then(|rows| decode_rows::<T>(table, rows)) {
			Ok(mut rows) if !rows.is_empty() => Some(rows.swap_remove(0)),
			Ok(_) => None,
			Err(err) => {
				error_log!("{}", err);
				None
			}
		}
	}
}

fn decode_rows<T: DeserializeOwned>(table: Table, rows: Vec<Value>) -> Result<Vec<T>, BackendError> {
	rows.into_iter()
		.map(|row| {
			serde_json::from_value(row).map_err(|e| BackendError::Decode {
				table,
				message: e.to_string(),
			})
		})
		.collect()
}

/// Team settings panel, or its empty state when nothing could be loaded.
pub fn team_settings_view(settings: Option<&TeamSettings>) -> View {
	let Some(settings) = settings else {
		return View::element("p")
			.class("empty-state")
			.child("No team settings yet.")
			.into_view();
	};

	let name = settings
		.team_name
		.clone()
		.unwrap_or_else(|| settings.team_id.clone());
	View::element("section")
		.class("team-settings")
		.child(View::element("h2").child(name))
		.child(
			settings
				.sport
				.clone()
				.map(|sport| View::element("p").class("team-sport").child(sport)),
		)
		.into_view()
}
