//! Mounting page views into the content region.

use super::hash::Route;
use super::page::RouteParams;
use crate::component::{IntoView, View};
use crate::dom::{MountError, Shell};

/// Wraps page views in the standard layout and swaps them into the shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRenderer;

impl PageRenderer {
	/// `<div class="page-layout" data-route="..."><main class="page-content">`
	/// around the page's own view.
	pub fn layout(content: View, params: &RouteParams) -> View {
		View::element("div")
			.class("page-layout")
			.attr("data-route", params.full().to_string())
			.child(View::element("main").class("page-content").child(content))
			.into_view()
	}

	/// Replaces the content region.
	///
	/// Open overlays are closed before the swap. Once the new content is in
	/// place it takes focus and its scroll position is reset.
	pub fn mount(&self, shell: &dyn Shell, content: View, params: &RouteParams) -> Result<(), MountError> {
		shell.clear_overlays();
		shell.mount_content(&Self::layout(content, params))?;
		shell.focus_content();
		shell.reset_content_scroll();
		Ok(())
	}
}

/// Built-in page shown when no not-found module is registered, or when it
/// fails too.
pub fn not_found_view(route: &Route) -> View {
	View::element("section")
		.class("not-found")
		.child(View::element("h1").child("Page not found"))
		.child(
			View::element("p").child(format!("Nothing lives at '{}'.", route.full())),
		)
		.child(
			View::element("a")
				.attr("href", "#/")
				.child("Back to the dashboard"),
		)
		.into_view()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::{MemoryShell, OverlayKind, ShellEvent};
	use rstest::rstest;

	fn params(hash: &str) -> RouteParams {
		RouteParams::new(Route::parse(hash, "dashboard"))
	}

	#[rstest]
	fn test_mount_order() {
		let shell = MemoryShell::new();
		shell.show_overlay(OverlayKind::Modal, &View::text("dialog"));

		PageRenderer
			.mount(&shell, View::text("roster"), &params("#/roster"))
			.unwrap();

		let events = shell.events();
		let position = |target: fn(&ShellEvent) -> bool| events.iter().position(target).unwrap();
		let cleared = position(|e| matches!(e, ShellEvent::ClearOverlays(1)));
		let mounted = position(|e| matches!(e, ShellEvent::MountContent(_)));
		let focused = position(|e| matches!(e, ShellEvent::FocusContent));
		let scrolled = position(|e| matches!(e, ShellEvent::ResetScroll));
		assert!(cleared < mounted && mounted < focused && focused < scrolled);
		assert!(shell.overlays().is_empty());
	}

	#[rstest]
	fn test_layout_wraps_content() {
		let view = PageRenderer::layout(View::text("hi"), &params("#/playbook/edit"));
		assert_eq!(
			view.render_to_string(),
			"<div class=\"page-layout\" data-route=\"playbook/edit\"><main class=\"page-content\">hi</main></div>"
		);
	}

	#[rstest]
	fn test_missing_region_is_reported() {
		let shell = MemoryShell::new().without_content_region();
		let result = PageRenderer.mount(&shell, View::text("x"), &params("#/x"));
		assert_eq!(result, Err(MountError::MissingTarget("page-view".into())));
	}

	#[rstest]
	fn test_not_found_view_names_route() {
		let view = not_found_view(&Route::parse("#/nope/deeper", "dashboard"));
		assert!(view.text_content().contains("nope/deeper"));
		assert_eq!(view.find_by_class("not-found").len(), 1);
	}
}
