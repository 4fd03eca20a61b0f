//! Common imports for page modules and app setup.
//!
//! ```ignore
//! use huddle_pages::prelude::*;
//! ```

pub use crate::app::App;
pub use crate::auth::{AuthClient, AuthError, AuthEvent, AuthService, Session, User};
pub use crate::backend::{TableClient, TeamRepository};
pub use crate::component::{ElementView, IntoView, View};
pub use crate::context::AppContext;
pub use crate::dom::{MemoryShell, Shell};
pub use crate::router::{
	Container, NavigationOutcome, Navigator, PageError, PageFuture, PageModule, PageRegistry,
	RegistryEntry, Route, RouteParams, RouterError, Timer, default_timer,
};
pub use crate::sidebar::{Sidebar, SidebarState};
pub use crate::storage::{MemoryStorage, Storage};
pub use crate::{debug_log, error_log, info_log, warn_log};
pub use huddle_conf::Settings;
