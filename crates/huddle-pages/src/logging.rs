//! Logging abstraction layer for huddle-pages
//!
//! These macros work across WASM and native targets. In the browser they
//! write to the developer console; natively they emit `tracing` events so
//! server-side rendering and tests can install a subscriber.
//!
//! ## Macro Overview
//!
//! | Macro | Debug Assertions | Feature Required | WASM | Non-WASM |
//! |-------|------------------|------------------|------|----------|
//! | `debug_log!` | Required | `debug-hooks` | `console.debug` | `tracing::debug!` |
//! | `info_log!` | Required | None | `console.info` | `tracing::info!` |
//! | `warn_log!` | No | None | `console.warn` | `tracing::warn!` |
//! | `error_log!` | No | None | `console.error` | `tracing::error!` |
//!
//! Warnings and errors stay on in release builds: degraded backend reads and
//! corrupt cache entries are reported through them.
//!
//! ## Example
//!
//! ```ignore
//! use huddle_pages::{debug_log, info_log, warn_log, error_log};
//!
//! debug_log!("Resolved {} -> {}", route.full(), path);
//! info_log!("Sidebar state: {}", state);
//! warn_log!("Ignoring invalid sidebar state '{}'", raw);
//! error_log!("team_settings query failed: {}", err);
//! ```

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", target_arch = "wasm32"))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		web_sys::console::debug_1(&format!($($arg)*).into());
	}};
}

/// Logs a debug message (requires `debug-hooks` feature + `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, feature = "debug-hooks", not(target_arch = "wasm32")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		$crate::__tracing::debug!("{}", format!($($arg)*));
	}};
}

/// No-op debug_log when conditions are not met
#[macro_export]
#[cfg(not(all(debug_assertions, feature = "debug-hooks")))]
macro_rules! debug_log {
	($($arg:tt)*) => {{}};
}

/// Logs an info message (requires `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, target_arch = "wasm32"))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		web_sys::console::info_1(&format!($($arg)*).into());
	}};
}

/// Logs an info message (requires `debug_assertions`)
#[macro_export]
#[cfg(all(debug_assertions, not(target_arch = "wasm32")))]
macro_rules! info_log {
	($($arg:tt)*) => {{
		$crate::__tracing::info!("{}", format!($($arg)*));
	}};
}

/// No-op info_log in release builds
#[macro_export]
#[cfg(not(debug_assertions))]
macro_rules! info_log {
	($($arg:tt)*) => {{}};
}

/// Logs a warning message
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		web_sys::console::warn_1(&format!($($arg)*).into());
	}};
}

/// Logs a warning message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		$crate::__tracing::warn!("{}", format!($($arg)*));
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(target_arch = "wasm32")]
macro_rules! error_log {
	($($arg:tt)*) => {{
		web_sys::console::error_1(&format!($($arg)*).into());
	}};
}

/// Logs an error message
#[macro_export]
#[cfg(not(target_arch = "wasm32"))]
macro_rules! error_log {
	($($arg:tt)*) => {{
		$crate::__tracing::error!("{}", format!($($arg)*));
	}};
}
