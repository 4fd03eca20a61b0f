//! Applies auth client results to the application context.

use std::rc::Rc;

use super::client::{AuthClient, AuthError, AuthEvent, SignUpOutcome, Subscription};
use super::session::{Session, SessionCache, User, now_unix};
use crate::component::{IntoView, View};
use crate::context::AppContext;
use crate::dom::OverlayKind;
use crate::{info_log, warn_log};

/// Sign-in, sign-up, sign-out, and session restore for one app.
///
/// Failures never touch the context: the session stays what it was, the
/// error is shown as a toast and returned to the caller.
pub struct AuthService<C: AuthClient> {
	client: Rc<C>,
	ctx: Rc<AppContext>,
	cache: SessionCache,
}

impl<C: AuthClient> std::fmt::Debug for AuthService<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthService")
			.field("cache", &self.cache)
			.finish()
	}
}

impl<C: AuthClient + 'static> AuthService<C> {
	/// Creates a service using the context's storage keys.
	pub fn new(ctx: Rc<AppContext>, client: Rc<C>) -> Self {
		let cache = SessionCache::new(&ctx.settings().storage);
		Self { client, ctx, cache }
	}

	/// The session cache this service writes to.
	pub fn cache(&self) -> &SessionCache {
		&self.cache
	}

	/// The wrapped client.
	pub fn client(&self) -> &C {
		&self.client
	}

	/// Restores the session at boot.
	///
	/// A cached durable session is applied directly. A cached temporary
	/// session is not carried across boots: it is cleared and the client is
	/// signed out. Without a cache entry the client is asked.
	pub async fn restore(&self) -> Option<User> {
		let storage = self.ctx.storage();

		if let Some(cached) = self.cache.load(storage, now_unix()) {
			if cached.temporary {
				info_log!("Discarding temporary session for {}", cached.session.user.id);
				self.cache.clear(storage);
				if let Err(err) = self.client.sign_out().await {
					warn_log!("Sign-out of temporary session failed: {}", err);
				}
				self.ctx.set_session(None);
				return None;
			}
			let user = cached.session.user.clone();
			self.ctx.set_session(Some(cached.session));
			return Some(user);
		}

		match self.client.get_session().await {
			Ok(Some(session)) => {
				let user = session.user.clone();
				self.apply(session, false);
				Some(user)
			}
			Ok(None) => None,
			Err(err) => {
				self.report(&err);
				None
			}
		}
	}

	/// Password sign-in. `remember` keeps the session across reloads.
	pub async fn sign_in(&self, email: &str, password: &str, remember: bool) -> Result<User, AuthError> {
		let email = email.trim();
		if email.is_empty() || password.is_empty() {
			return Err(self.report(&AuthError::MissingCredentials));
		}

		let session = self
			.client
			.sign_in(email, password)
			.await
			.map_err(|err| self.report(&err))?;
		let user = session.user.clone();
		self.apply(session, !remember);
		Ok(user)
	}

	/// Password sign-up. A session returned by the service is applied as a
	/// remembered sign-in.
	pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
		let email = email.trim();
		if email.is_empty() || password.is_empty() {
			return Err(self.report(&AuthError::MissingCredentials));
		}

		let outcome = self
			.client
			.sign_up(email, password)
			.await
			.map_err(|err| self.report(&err))?;
		if let SignUpOutcome::SignedIn(session) = &outcome {
			self.apply(session.clone(), false);
		}
		Ok(outcome)
	}

	/// Signs out. The local session is kept if the service call fails.
	pub async fn sign_out(&self) -> Result<(), AuthError> {
		self.client
			.sign_out()
			.await
			.map_err(|err| self.report(&err))?;
		self.cache.clear(self.ctx.storage());
		self.ctx.set_session(None);
		Ok(())
	}

	/// Applies an auth state change pushed by the service.
	pub fn handle_event(&self, event: AuthEvent, session: Option<&Session>) {
		match (event, session) {
			(AuthEvent::SignedOut, _) => {
				self.cache.clear(self.ctx.storage());
				self.ctx.set_session(None);
			}
			(AuthEvent::PasswordRecovery, Some(session)) => {
				// Recovery sessions only live until the password is reset.
				self.apply(session.clone(), true);
			}
			(_, Some(session)) => {
				let temporary = self.cache.is_temporary(self.ctx.storage());
				self.apply(session.clone(), temporary);
			}
			(event, None) => {
				warn_log!("Auth event {:?} arrived without a session", event);
			}
		}
	}

	/// Subscribes [`AuthService::handle_event`] to the client's state changes.
	///
	/// The listener holds a weak reference; it goes quiet once the service is
	/// dropped.
	pub fn subscribe(self: &Rc<Self>) -> Subscription {
		let weak = Rc::downgrade(self);
		self.client
			.on_auth_state_change(Box::new(move |event: AuthEvent, session: Option<&Session>| {
				if let Some(service) = weak.upgrade() {
					service.handle_event(event, session);
				}
			}))
	}

	fn apply(&self, session: Session, temporary: bool) {
		if let Err(err) = self.cache.store(self.ctx.storage(), &session, temporary) {
			warn_log!("Failed to cache session: {}", err);
		}
		self.ctx.set_session(Some(session));
	}

	fn report(&self, err: &AuthError) -> AuthError {
		warn_log!("Auth error: {}", err);
		let toast = View::element("div")
			.class("toast-message toast-error")
			.attr("role", "alert")
			.child(err.to_string())
			.into_view();
		self.ctx.shell().show_overlay(OverlayKind::Toast, &toast);
		err.clone()
	}
}
