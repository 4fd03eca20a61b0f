//! Hash-based client-side routing.
//!
//! A navigation runs these steps, in order:
//!
//! 1. [`Route::parse`] turns `location.hash` into `{base, sub}`
//! 2. [`RouteGuard::decide`] allows the route or redirects; protected page
//!    code is never loaded before this returns
//! 3. [`PageRegistry::resolve`] finds `pages/<base>/<sub>`, then
//!    `pages/<base>/index`
//! 4. the module is loaded (once) and invoked; any failure falls back to the
//!    not-found page
//! 5. [`TransitionController`] fades the old content out, the
//!    [`PageRenderer`] swaps it, and the new content fades in
//!
//! [`Navigator`] sequences the steps and discards navigations superseded by a
//! newer one.

mod guard;
mod hash;
mod navigation;
mod page;
mod registry;
mod render;
mod transition;

pub use guard::{GuardAction, RouteGuard};
pub use hash::Route;
pub use navigation::{NavigationOutcome, NavigationToken, Navigator};
pub use page::{Container, PageEntry, PageError, PageModule, RouteParams};
pub use registry::{ModulePath, PageFuture, PageLoader, PageRegistry, PageRegistryBuilder, RegistryEntry};
pub use render::{PageRenderer, not_found_view};
#[cfg(target_arch = "wasm32")]
pub use transition::BrowserTimer;
#[cfg(not(target_arch = "wasm32"))]
pub use transition::TokioTimer;
pub use transition::{Timer, TransitionController, default_timer};

/// Error type for router setup.
///
/// Navigation itself never fails: misses and page errors end on the
/// not-found page. These errors come from building the registry or from
/// programmatic navigation with a malformed target.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouterError {
	/// A registry path is not `pages/<base>` or `pages/<base>/<sub>`.
	#[error("Invalid module path: {0}")]
	InvalidModulePath(String),
	/// Two registry entries resolve to the same path.
	#[error("Duplicate module path: {0}")]
	DuplicateModule(String),
	/// A navigation target is empty or malformed.
	#[error("Invalid route: {0:?}")]
	InvalidRoute(String),
}
