//! Application context.
//!
//! One [`AppContext`] per mounted app holds what the shell components share:
//! settings, the durable store, the document, and the current session. It is
//! created by [`AppContext::init`] and passed to the router, sidebar, and auth
//! service explicitly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use huddle_conf::Settings;

use crate::auth::{Session, User};
use crate::dom::Shell;
use crate::storage::Storage;

/// Shared state for one mounted application.
pub struct AppContext {
	settings: Settings,
	storage: Rc<dyn Storage>,
	shell: Rc<dyn Shell>,
	session: RefCell<Option<Session>>,
	active: Cell<bool>,
}

impl std::fmt::Debug for AppContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppContext")
			.field("settings", &self.settings)
			.field("logged_in", &self.is_logged_in())
			.field("active", &self.active.get())
			.finish()
	}
}

impl AppContext {
	/// Creates an active context with no session.
	pub fn init(settings: Settings, storage: Rc<dyn Storage>, shell: Rc<dyn Shell>) -> Rc<Self> {
		Rc::new(Self {
			settings,
			storage,
			shell,
			session: RefCell::new(None),
			active: Cell::new(true),
		})
	}

	/// The settings the context was created with.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// The durable client store.
	pub fn storage(&self) -> &dyn Storage {
		self.storage.as_ref()
	}

	/// The document.
	pub fn shell(&self) -> &dyn Shell {
		self.shell.as_ref()
	}

	/// A clone of the current session.
	pub fn session(&self) -> Option<Session> {
		self.session.borrow().clone()
	}

	/// The signed-in user, if any.
	pub fn current_user(&self) -> Option<User> {
		self.session.borrow().as_ref().map(|s| s.user.clone())
	}

	/// Whether a user is currently present. This is the only auth fact the
	/// route guard consults.
	pub fn is_logged_in(&self) -> bool {
		self.session.borrow().is_some()
	}

	/// Replaces the current session.
	pub fn set_session(&self, session: Option<Session>) {
		*self.session.borrow_mut() = session;
	}

	/// Whether [`AppContext::teardown`] has not run yet.
	pub fn is_active(&self) -> bool {
		self.active.get()
	}

	/// Drops in-memory session state and closes open overlays.
	///
	/// Persisted values are left alone; the next `init` picks them up.
	pub fn teardown(&self) {
		self.session.borrow_mut().take();
		self.shell.clear_overlays();
		self.active.set(false);
	}
}
