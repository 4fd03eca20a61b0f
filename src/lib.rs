//! # Huddle
//!
//! Client shell for the Huddle team management app.
//!
//! The shell is a single-page application driven by the URL fragment: a hash
//! router picks a page module, a guard keeps signed-out visitors on the public
//! routes, and a sidebar state machine owns the navigation chrome.
//!
//! ## Feature Flags
//!
//! - `pages` (default) - The client shell ([`pages`])
//! - `conf` - Settings loading and validation ([`conf`])
//! - `debug-hooks` - Enables `debug_log!` output in debug builds
//! - `console_error_panic_hook` - Readable panic messages in the browser console
//! - `full` - All of the above that are not debugging aids
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use huddle::prelude::*;
//!
//! let registry = PageRegistry::builder()
//!     .index("dashboard", PageModule::render("dashboard", |_| Ok(View::text("Welcome"))))
//!     .build()?;
//! ```

#[cfg(feature = "conf")]
pub use huddle_conf as conf;

#[cfg(feature = "pages")]
pub use huddle_pages as pages;

#[cfg(feature = "pages")]
pub mod prelude {
	pub use huddle_pages::prelude::*;
}
