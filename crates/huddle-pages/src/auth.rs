//! Authentication glue.
//!
//! The hosted auth service is an external collaborator reached through the
//! [`AuthClient`] trait. This module owns what sits around it:
//!
//! - [`Session`] and [`User`], the serializable session shape
//! - [`SessionCache`], the copy of the session kept in durable storage
//! - [`AuthService`], which applies client results to the [`AppContext`]
//!   and surfaces failures as toasts
//!
//! The router only ever asks [`AppContext::is_logged_in`].
//!
//! [`AppContext`]: crate::context::AppContext
//! [`AppContext::is_logged_in`]: crate::context::AppContext::is_logged_in

mod client;
mod service;
mod session;

pub use client::{AuthCallback, AuthClient, AuthError, AuthEvent, SignUpOutcome, Subscription};
pub use service::AuthService;
pub use session::{CachedSession, Session, SessionCache, User, now_unix};
