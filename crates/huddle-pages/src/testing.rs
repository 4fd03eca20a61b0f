//! Test doubles for the shell's collaborators.
//!
//! - [`MockAuthClient`]: scripted auth service with call recording and
//!   event emission
//! - [`MockTableClient`]: in-memory tables that can be switched to failing
//! - [`InstantTimer`]: resolves every sleep immediately, recording durations
//! - [`YieldTimer`]: yields once per sleep so concurrent navigations
//!   interleave deterministically
//!
//! Everything here is single-threaded, like the shell itself.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use serde_json::Value;

use crate::auth::{AuthCallback, AuthClient, AuthError, AuthEvent, Session, SignUpOutcome, Subscription, User};
use crate::backend::{BackendError, Filter, Table, TableClient};
use crate::router::Timer;

type Listener = Rc<dyn Fn(AuthEvent, Option<&Session>)>;

/// Scripted [`AuthClient`].
///
/// Without scripting, `sign_in` and `sign_up` succeed with a session derived
/// from the email, and `sign_out` succeeds.
pub struct MockAuthClient {
	session: RefCell<Option<Session>>,
	sign_in_results: RefCell<Vec<Result<Session, AuthError>>>,
	sign_up_result: RefCell<Option<Result<SignUpOutcome, AuthError>>>,
	get_session_error: RefCell<Option<AuthError>>,
	sign_out_error: RefCell<Option<AuthError>>,
	listeners: Rc<RefCell<Vec<(u64, Listener)>>>,
	next_listener: Cell<u64>,
	calls: RefCell<Vec<&'static str>>,
}

impl std::fmt::Debug for MockAuthClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MockAuthClient")
			.field("session", &self.session.borrow())
			.field("calls", &self.calls.borrow())
			.field("listeners", &self.listener_count())
			.finish_non_exhaustive()
	}
}

impl Default for MockAuthClient {
	fn default() -> Self {
		Self::new()
	}
}

impl MockAuthClient {
	/// A client with no session.
	pub fn new() -> Self {
		Self {
			session: RefCell::new(None),
			sign_in_results: RefCell::new(Vec::new()),
			sign_up_result: RefCell::new(None),
			get_session_error: RefCell::new(None),
			sign_out_error: RefCell::new(None),
			listeners: Rc::new(RefCell::new(Vec::new())),
			next_listener: Cell::new(0),
			calls: RefCell::new(Vec::new()),
		}
	}

	/// A client that already holds `session`.
	pub fn with_session(session: Session) -> Self {
		let client = Self::new();
		*client.session.borrow_mut() = Some(session);
		client
	}

	/// Queues the result of the next `sign_in`.
	pub fn push_sign_in_result(&self, result: Result<Session, AuthError>) {
		self.sign_in_results.borrow_mut().push(result);
	}

	/// Sets the result of every following `sign_up`.
	pub fn set_sign_up_result(&self, result: Result<SignUpOutcome, AuthError>) {
		*self.sign_up_result.borrow_mut() = Some(result);
	}

	/// Makes `get_session` fail with `error`.
	pub fn fail_get_session(&self, error: AuthError) {
		*self.get_session_error.borrow_mut() = Some(error);
	}

	/// Makes `sign_out` fail with `error`.
	pub fn fail_sign_out(&self, error: AuthError) {
		*self.sign_out_error.borrow_mut() = Some(error);
	}

	/// The session the client currently holds.
	pub fn session(&self) -> Option<Session> {
		self.session.borrow().clone()
	}

	/// Names of the trait methods called so far, in order.
	pub fn calls(&self) -> Vec<&'static str> {
		self.calls.borrow().clone()
	}

	/// How many times `method` was called.
	pub fn call_count(&self, method: &str) -> usize {
		self.calls.borrow().iter().filter(|c| **c == method).count()
	}

	/// Number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}

	/// Delivers an auth state change to every listener.
	pub fn emit(&self, event: AuthEvent, session: Option<&Session>) {
		let listeners: Vec<Listener> = self
			.listeners
			.borrow()
			.iter()
			.map(|(_, listener)| Rc::clone(listener))
			.collect();
		for listener in listeners {
			listener(event, session);
		}
	}

	/// Session handed out for `email` when nothing is scripted.
	pub fn session_for(email: &str) -> Session {
		Session::new(format!("token-{}", email), User::new(format!("user-{}", email), Some(email)))
	}

	fn record(&self, method: &'static str) {
		self.calls.borrow_mut().push(method);
	}
}

#[async_trait(?Send)]
impl AuthClient for MockAuthClient {
	async fn get_session(&self) -> Result<Option<Session>, AuthError> {
		self.record("get_session");
		if let Some(err) = self.get_session_error.borrow().clone() {
			return Err(err);
		}
		Ok(self.session())
	}

	async fn get_user(&self) -> Result<Option<User>, AuthError> {
		self.record("get_user");
		Ok(self.session().map(|s| s.user))
	}

	async fn sign_in(&self, email: &str, _password: &str) -> Result<Session, AuthError> {
		self.record("sign_in");
		let scripted = {
			let mut results = self.sign_in_results.borrow_mut();
			(!results.is_empty()).then(|| results.remove(0))
		};
		let session = scripted.unwrap_or_else(|| Ok(Self::session_for(email)))?;
		*self.session.borrow_mut() = Some(session.clone());
		Ok(session)
	}

	async fn sign_up(&self, email: &str, _password: &str) -> Result<SignUpOutcome, AuthError> {
		self.record("sign_up");
		let outcome = self
			.sign_up_result
			.borrow()
			.clone()
			.unwrap_or_else(|| Ok(SignUpOutcome::SignedIn(Self::session_for(email))))?;
		if let SignUpOutcome::SignedIn(session) = &outcome {
			*self.session.borrow_mut() = Some(session.clone());
		}
		Ok(outcome)
	}

	async fn sign_out(&self) -> Result<(), AuthError> {
		self.record("sign_out");
		if let Some(err) = self.sign_out_error.borrow().clone() {
			return Err(err);
		}
		*self.session.borrow_mut() = None;
		Ok(())
	}

	fn on_auth_state_change(&self, callback: AuthCallback) -> Subscription {
		let id = self.next_listener.get();
		self.next_listener.set(id + 1);
		self.listeners.borrow_mut().push((id, Rc::from(callback)));

		let listeners = Rc::downgrade(&self.listeners);
		Subscription::new(move || {
			if let Some(listeners) = listeners.upgrade() {
				listeners.borrow_mut().retain(|(other, _)| *other != id);
			}
		})
	}
}

/// In-memory [`TableClient`].
#[derive(Debug, Default)]
pub struct MockTableClient {
	rows: RefCell<HashMap<Table, Vec<Value>>>,
	failing: Cell<bool>,
	queries: Cell<usize>,
}

impl MockTableClient {
	/// Empty tables.
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds `table` with `rows`.
	pub fn with_rows(self, table: Table, rows: impl IntoIterator<Item = Value>) -> Self {
		self.rows
			.borrow_mut()
			.entry(table)
			.or_default()
			.extend(rows);
		self
	}

	/// Makes every following operation fail (or succeed again).
	pub fn set_failing(&self, failing: bool) {
		self.failing.set(failing);
	}

	/// Current rows of `table`.
	pub fn rows(&self, table: Table) -> Vec<Value> {
		self.rows.borrow().get(&table).cloned().unwrap_or_default()
	}

	/// Operations attempted so far.
	pub fn query_count(&self) -> usize {
		self.queries.get()
	}

	fn check(&self, table: Table) -> Result<(), BackendError> {
		self.queries.set(self.queries.get() + 1);
		if self.failing.get() {
			return Err(BackendError::Query {
				table,
				message: "simulated failure".to_string(),
			});
		}
		Ok(())
	}
}

#[async_trait(?Send)]
impl TableClient for MockTableClient {
	async fn select(&self, table: Table, filters: &[Filter]) -> Result<Vec<Value>, BackendError> {
		self.check(table)?;
		Ok(self
			.rows(table)
			.into_iter()
			.filter(|row| filters.iter().all(|f| f.matches(row)))
			.collect())
	}

	async fn update(&self, table: Table, filters: &[Filter], patch: Value) -> Result<Vec<Value>, BackendError> {
		self.check(table)?;
		let mut tables = self.rows.borrow_mut();
		let mut updated = Vec::new();
		for row in tables.entry(table).or_default().iter_mut() {
			if !filters.iter().all(|f| f.matches(row)) {
				continue;
			}
			if let (Value::Object(target), Value::Object(fields)) = (&mut *row, &patch) {
				for (key, value) in fields {
					target.insert(key.clone(), value.clone());
				}
			}
			updated.push(row.clone());
		}
		Ok(updated)
	}

	async fn insert(&self, table: Table, row: Value) -> Result<Value, BackendError> {
		self.check(table)?;
		self.rows
			.borrow_mut()
			.entry(table)
			.or_default()
			.push(row.clone());
		Ok(row)
	}
}

/// [`Timer`] whose sleeps complete immediately.
#[derive(Debug, Default)]
pub struct InstantTimer {
	sleeps: RefCell<Vec<Duration>>,
}

impl InstantTimer {
	/// A timer with no recorded sleeps.
	pub fn new() -> Self {
		Self::default()
	}

	/// Durations requested so far.
	pub fn sleeps(&self) -> Vec<Duration> {
		self.sleeps.borrow().clone()
	}
}

impl Timer for InstantTimer {
	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
		self.sleeps.borrow_mut().push(duration);
		Box::pin(std::future::ready(()))
	}
}

/// [`Timer`] whose sleeps return `Pending` once before completing.
///
/// Under `join!`, each sleep hands control to the other futures exactly
/// once, which is enough to start a second navigation in the middle of the
/// first one's fade.
#[derive(Debug, Default)]
pub struct YieldTimer {
	sleeps: Cell<usize>,
}

impl YieldTimer {
	/// A fresh timer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of sleeps requested.
	pub fn sleep_count(&self) -> usize {
		self.sleeps.get()
	}
}

impl Timer for YieldTimer {
	fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
		self.sleeps.set(self.sleeps.get() + 1);
		Box::pin(YieldOnce { yielded: false })
	}
}

struct YieldOnce {
	yielded: bool,
}

impl Future for YieldOnce {
	type Output = ();

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
		if self.yielded {
			return Poll::Ready(());
		}
		self.yielded = true;
		cx.waker().wake_by_ref();
		Poll::Pending
	}
}
