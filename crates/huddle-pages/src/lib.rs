//! Huddle Pages - WASM client shell
//!
//! The navigation and layout core of the Huddle team management app. It owns
//! everything between a `hashchange` event and the content region of the page:
//!
//! - [`router`]: hash parsing, the route guard, the static page registry, page
//!   rendering, and fade transitions, sequenced by the [`Navigator`]
//! - [`sidebar`]: the three-state sidebar (`expanded`, `icon`, `collapsed`)
//!   with persistence and responsive breakpoints
//! - [`auth`]: session cache and the glue around the hosted auth client
//! - [`backend`]: degrade-on-error access to the settings/profile tables
//! - [`theme`]: cached team color
//! - [`dom`] and [`storage`]: the browser seams, with in-memory twins used by
//!   native builds and tests
//!
//! All of it runs on a single thread. Shared state lives in an explicit
//! [`AppContext`] rather than module-level globals.
//!
//! ## Example
//!
//! ```ignore
//! use huddle_pages::prelude::*;
//!
//! fn dashboard(params: &RouteParams) -> Result<View, PageError> {
//!     Ok(View::element("h1").child(format!("Dashboard {}", params.full())).into_view())
//! }
//!
//! let registry = PageRegistry::builder()
//!     .index("dashboard", PageModule::render("dashboard", dashboard))
//!     .build()?;
//! ```

#![warn(missing_docs)]

// Core modules
pub mod component;
pub mod dom;
pub mod logging;
pub mod storage;

// Application state
pub mod context;

// Collaborators
pub mod auth;
pub mod backend;
pub mod theme;

// Client-side routing
pub mod router;

// Layout
pub mod sidebar;

// Launcher wiring the pieces to browser events
pub mod app;

// Testing utilities (mock collaborators and timers)
pub mod testing;

pub mod prelude;

pub use app::App;
pub use auth::{AuthClient, AuthError, AuthEvent, AuthService, Session, SessionCache, User};
pub use backend::{BackendError, Table, TableClient, TeamRepository};
pub use component::{ElementView, IntoView, View};
pub use context::AppContext;
pub use dom::{MemoryShell, MountError, OverlayKind, Shell};
pub use router::{
	Container, GuardAction, ModulePath, NavigationOutcome, Navigator, PageError, PageModule,
	PageRegistry, Route, RouteGuard, RouteParams, RouterError, Timer, TransitionController,
};
pub use sidebar::{RenderPlan, Sidebar, SidebarState, SidebarTransition};
pub use storage::{MemoryStorage, Storage, StorageError};
pub use theme::{Theme, ThemeCache};

#[doc(hidden)]
pub use tracing as __tracing;

// Logging macros are exported via #[macro_export]:
// huddle_pages::debug_log!, info_log!, warn_log!, error_log!
