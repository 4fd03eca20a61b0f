//! The hosted auth service, as consumed by the shell.

use async_trait::async_trait;

use super::session::{Session, User};

/// Error type for auth operations.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
	/// Email or password was left blank.
	#[error("Email and password are required")]
	MissingCredentials,
	/// The service rejected the email/password pair.
	#[error("Invalid login credentials")]
	InvalidCredentials,
	/// The account exists but the email is not confirmed yet.
	#[error("Email not confirmed")]
	EmailNotConfirmed,
	/// The request did not reach the service.
	#[error("Auth request failed: {0}")]
	Network(String),
	/// The service answered with an error.
	#[error("Auth service error ({status}): {message}")]
	Service {
		/// HTTP status.
		status: u16,
		/// Service message.
		message: String,
	},
}

/// Auth state changes pushed by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
	/// A session was established.
	SignedIn,
	/// The session ended.
	SignedOut,
	/// The access token was refreshed.
	TokenRefreshed,
	/// User attributes changed.
	UserUpdated,
	/// The user arrived through a password recovery link.
	PasswordRecovery,
}

/// Listener registered with [`AuthClient::on_auth_state_change`].
pub type AuthCallback = Box<dyn Fn(AuthEvent, Option<&Session>)>;

/// Handle for an auth state listener. Dropping it unsubscribes.
pub struct Subscription {
	cancel: Option<Box<dyn FnOnce()>>,
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription")
			.field("active", &self.cancel.is_some())
			.finish()
	}
}

impl Subscription {
	/// Wraps the closure that removes the listener.
	pub fn new(cancel: impl FnOnce() + 'static) -> Self {
		Self {
			cancel: Some(Box::new(cancel)),
		}
	}

	/// A subscription with nothing to cancel.
	pub fn noop() -> Self {
		Self { cancel: None }
	}

	/// Removes the listener now.
	pub fn unsubscribe(mut self) {
		self.cancel_now();
	}

	fn cancel_now(&mut self) {
		if let Some(cancel) = self.cancel.take() {
			cancel();
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.cancel_now();
	}
}

/// Result of a sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpOutcome {
	/// The account was created and signed in immediately.
	SignedIn(Session),
	/// The account was created; a confirmation email was sent.
	ConfirmationSent(User),
}

/// Client for the hosted auth service.
///
/// Futures are `!Send`: the shell runs on the browser's single thread.
#[async_trait(?Send)]
pub trait AuthClient {
	/// The service's current session, if any.
	async fn get_session(&self) -> Result<Option<Session>, AuthError>;

	/// The user behind the current session, if any.
	async fn get_user(&self) -> Result<Option<User>, AuthError>;

	/// Password sign-in.
	async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

	/// Password sign-up.
	async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError>;

	/// Ends the current session.
	async fn sign_out(&self) -> Result<(), AuthError>;

	/// Registers a listener for auth state changes.
	fn on_auth_state_change(&self, callback: AuthCallback) -> Subscription;
}
