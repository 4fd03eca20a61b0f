//! `web-sys` implementation of [`Shell`].

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use super::{MountError, OverlayKind, Shell};
use crate::component::View;

/// Element id of the content region.
pub const CONTENT_REGION_ID: &str = "page-view";

/// Element id of the sidebar root.
pub const SIDEBAR_ID: &str = "sidebar";

/// Class set on the sidebar root while labels are hidden.
const LABELS_HIDDEN_CLASS: &str = "labels-hidden";

/// The browser document.
#[derive(Debug, Clone)]
pub struct BrowserShell {
	content_id: String,
	sidebar_id: String,
}

impl Default for BrowserShell {
	fn default() -> Self {
		Self::new()
	}
}

impl BrowserShell {
	/// Targets `#page-view` and `#sidebar`.
	pub fn new() -> Self {
		Self::with_ids(CONTENT_REGION_ID, SIDEBAR_ID)
	}

	/// Targets custom element ids.
	pub fn with_ids(content_id: impl Into<String>, sidebar_id: impl Into<String>) -> Self {
		Self {
			content_id: content_id.into(),
			sidebar_id: sidebar_id.into(),
		}
	}

	fn window(&self) -> Option<Window> {
		web_sys::window()
	}

	fn document(&self) -> Option<Document> {
		self.window().and_then(|w| w.document())
	}

	fn content(&self) -> Option<Element> {
		self.document()?.get_element_by_id(&self.content_id)
	}

	fn sidebar_root(&self) -> Result<Element, MountError> {
		let document = self.document().ok_or(MountError::NoDocument)?;
		document
			.get_element_by_id(&self.sidebar_id)
			.ok_or_else(|| MountError::MissingTarget(self.sidebar_id.clone()))
	}
}

impl Shell for BrowserShell {
	fn has_content_region(&self) -> bool {
		self.content().is_some()
	}

	fn add_content_class(&self, class: &str) {
		if let Some(el) = self.content() {
			let _ = el.class_list().add_1(class);
		}
	}

	fn remove_content_class(&self, class: &str) {
		if let Some(el) = self.content() {
			let _ = el.class_list().remove_1(class);
		}
	}

	fn mount_content(&self, view: &View) -> Result<(), MountError> {
		self.window().ok_or(MountError::NoWindow)?;
		let el = self
			.content()
			.ok_or_else(|| MountError::MissingTarget(self.content_id.clone()))?;
		el.set_inner_html(&view.render_to_string());
		Ok(())
	}

	fn focus_content(&self) {
		let Some(el) = self.content().and_then(|e| e.dyn_into::<HtmlElement>().ok()) else {
			return;
		};
		if !el.has_attribute("tabindex") {
			let _ = el.set_attribute("tabindex", "-1");
		}
		let _ = el.focus();
	}

	fn reset_content_scroll(&self) {
		if let Some(el) = self.content() {
			el.set_scroll_top(0);
		}
		if let Some(window) = self.window() {
			window.scroll_to_with_x_and_y(0.0, 0.0);
		}
	}

	fn show_overlay(&self, kind: OverlayKind, view: &View) {
		let Some(document) = self.document() else {
			return;
		};
		let (Ok(layer), Some(body)) = (document.create_element("div"), document.body()) else {
			return;
		};
		layer.set_class_name(kind.class());
		layer.set_inner_html(&view.render_to_string());
		let _ = body.append_child(&layer);
	}

	fn clear_overlays(&self) -> usize {
		let Some(document) = self.document() else {
			return 0;
		};
		let selector = OverlayKind::ALL
			.iter()
			.map(|kind| format!(".{}", kind.class()))
			.collect::<Vec<_>>()
			.join(", ");
		let Ok(nodes) = document.query_selector_all(&selector) else {
			return 0;
		};

		let mut removed = 0;
		for index in 0..nodes.length() {
			if let Some(el) = nodes.item(index).and_then(|n| n.dyn_into::<Element>().ok()) {
				el.remove();
				removed += 1;
			}
		}
		removed
	}

	fn hash(&self) -> String {
		self.window()
			.and_then(|w| w.location().hash().ok())
			.unwrap_or_default()
	}

	fn set_hash(&self, hash: &str) {
		if let Some(window) = self.window() {
			let _ = window.location().set_hash(hash);
		}
	}

	fn set_layout_class(&self, class: &str, enabled: bool) {
		if let Some(body) = self.document().and_then(|d| d.body()) {
			let _ = body.class_list().toggle_with_force(class, enabled);
		}
	}

	fn mount_sidebar(&self, view: &View) -> Result<(), MountError> {
		let root = self.sidebar_root()?;
		root.set_inner_html(&view.render_to_string());
		Ok(())
	}

	fn set_sidebar_labels_visible(&self, visible: bool) {
		let Ok(root) = self.sidebar_root() else {
			return;
		};
		let _ = root
			.class_list()
			.toggle_with_force(LABELS_HIDDEN_CLASS, !visible);

		let Ok(labels) = root.query_selector_all(".sidebar-label") else {
			return;
		};
		for index in 0..labels.length() {
			if let Some(label) = labels.item(index).and_then(|n| n.dyn_into::<Element>().ok()) {
				if visible {
					let _ = label.remove_attribute("hidden");
				} else {
					let _ = label.set_attribute("hidden", "");
				}
			}
		}
	}

	fn set_css_variable(&self, name: &str, value: &str) {
		let root = self
			.document()
			.and_then(|d| d.document_element())
			.and_then(|e| e.dyn_into::<HtmlElement>().ok());
		if let Some(root) = root {
			let _ = root.style().set_property(name, value);
		}
	}

	fn viewport_width(&self) -> Option<u32> {
		let width = self.window()?.inner_width().ok()?.as_f64()?;
		Some(width.max(0.0) as u32)
	}
}
