//! View tree for page and sidebar content.
//!
//! Pages return a [`View`]; the shell turns it into markup when mounting.

mod into_view;

pub use into_view::{ElementView, IntoView, View};
