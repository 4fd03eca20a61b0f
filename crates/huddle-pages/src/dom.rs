//! The document seam.
//!
//! Everything the router and sidebar do to the page goes through [`Shell`]:
//! the content region (`#page-view`), the overlay layers, the location hash,
//! layout classes on the document body, and the sidebar root.
//!
//! [`MemoryShell`] keeps that state in memory and records every mutation. It
//! backs native builds and tests. On `wasm32`, [`BrowserShell`] drives the
//! real DOM through `web-sys`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;

use crate::component::View;

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserShell;

/// Error type for mounting views to the DOM.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MountError {
	/// Window object not available.
	#[error("Window object not available")]
	NoWindow,
	/// Document object not available.
	#[error("Document object not available")]
	NoDocument,
	/// The target region is not in the document.
	#[error("Mount target '{0}' not found")]
	MissingTarget(String),
	/// An event listener could not be attached.
	#[error("Failed to listen for '{0}'")]
	Listener(String),
}

/// Overlay layers cleared on every navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
	/// Modal dialog.
	Modal,
	/// Transient notification.
	Toast,
	/// Image zoom layer.
	Zoom,
}

impl OverlayKind {
	/// All overlay kinds, in stacking order.
	pub const ALL: [OverlayKind; 3] = [OverlayKind::Modal, OverlayKind::Toast, OverlayKind::Zoom];

	/// CSS class identifying this layer in the document.
	pub fn class(self) -> &'static str {
		match self {
			OverlayKind::Modal => "modal-overlay",
			OverlayKind::Toast => "toast",
			OverlayKind::Zoom => "zoom-overlay",
		}
	}
}

impl fmt::Display for OverlayKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.class())
	}
}

/// Operations the client shell performs on the document.
///
/// Methods take `&self`: like the DOM itself, implementations use interior
/// mutability and are only touched from the UI thread.
pub trait Shell {
	/// Whether the content region is present in the document.
	fn has_content_region(&self) -> bool;

	/// Adds a class to the content region. No-op if it is missing.
	fn add_content_class(&self, class: &str);

	/// Removes a class from the content region. No-op if it is missing.
	fn remove_content_class(&self, class: &str);

	/// Replaces the content region's children with `view`.
	fn mount_content(&self, view: &View) -> Result<(), MountError>;

	/// Moves keyboard focus to the content region.
	fn focus_content(&self);

	/// Scrolls the content region back to the top.
	fn reset_content_scroll(&self);

	/// Shows an overlay layer.
	fn show_overlay(&self, kind: OverlayKind, view: &View);

	/// Removes every open overlay layer, returning how many were removed.
	fn clear_overlays(&self) -> usize;

	/// Current location hash, including the leading `#` when present.
	fn hash(&self) -> String;

	/// Sets the location hash.
	fn set_hash(&self, hash: &str);

	/// Toggles a layout class on the document body.
	fn set_layout_class(&self, class: &str, enabled: bool);

	/// Replaces the sidebar root's contents with `view`.
	fn mount_sidebar(&self, view: &View) -> Result<(), MountError>;

	/// Shows or hides the sidebar navigation labels without rebuilding it.
	fn set_sidebar_labels_visible(&self, visible: bool);

	/// Sets a CSS custom property on the document root.
	fn set_css_variable(&self, name: &str, value: &str);

	/// Current viewport width in CSS pixels, if known.
	fn viewport_width(&self) -> Option<u32>;
}

/// A mutation recorded by [`MemoryShell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
	/// Class added to the content region.
	AddContentClass(String),
	/// Class removed from the content region.
	RemoveContentClass(String),
	/// Content region replaced; carries the rendered markup.
	MountContent(String),
	/// Focus moved to the content region.
	FocusContent,
	/// Content scroll reset.
	ResetScroll,
	/// Overlays cleared; carries how many were open.
	ClearOverlays(usize),
	/// Hash changed.
	SetHash(String),
	/// Sidebar rebuilt.
	MountSidebar,
	/// Sidebar labels toggled.
	SidebarLabels(bool),
}

/// In-memory [`Shell`] used by native builds and tests.
#[derive(Debug)]
pub struct MemoryShell {
	content_region: Cell<bool>,
	content: RefCell<Option<View>>,
	content_classes: RefCell<Vec<String>>,
	overlays: RefCell<Vec<(OverlayKind, View)>>,
	hash: RefCell<String>,
	layout_classes: RefCell<Vec<String>>,
	sidebar: RefCell<Option<View>>,
	sidebar_labels_visible: Cell<bool>,
	css_variables: RefCell<BTreeMap<String, String>>,
	viewport_width: Cell<Option<u32>>,
	events: RefCell<Vec<ShellEvent>>,
}

impl Default for MemoryShell {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryShell {
	/// Creates a shell with an empty content region and no hash.
	pub fn new() -> Self {
		Self {
			content_region: Cell::new(true),
			content: RefCell::new(None),
			content_classes: RefCell::new(Vec::new()),
			overlays: RefCell::new(Vec::new()),
			hash: RefCell::new(String::new()),
			layout_classes: RefCell::new(Vec::new()),
			sidebar: RefCell::new(None),
			sidebar_labels_visible: Cell::new(true),
			css_variables: RefCell::new(BTreeMap::new()),
			viewport_width: Cell::new(None),
			events: RefCell::new(Vec::new()),
		}
	}

	/// Creates a shell whose location hash starts at `hash`.
	pub fn with_hash(hash: impl Into<String>) -> Self {
		let shell = Self::new();
		*shell.hash.borrow_mut() = hash.into();
		shell
	}

	/// Removes the content region, as if `#page-view` were absent.
	pub fn without_content_region(self) -> Self {
		self.content_region.set(false);
		self
	}

	/// Sets the reported viewport width.
	pub fn set_viewport_width(&self, width: u32) {
		self.viewport_width.set(Some(width));
	}

	/// The currently mounted content, if any.
	pub fn content(&self) -> Option<View> {
		self.content.borrow().clone()
	}

	/// Markup of the currently mounted content.
	pub fn content_html(&self) -> String {
		self.content
			.borrow()
			.as_ref()
			.map(View::render_to_string)
			.unwrap_or_default()
	}

	/// Classes currently on the content region.
	pub fn content_classes(&self) -> Vec<String> {
		self.content_classes.borrow().clone()
	}

	/// Open overlay layers.
	pub fn overlays(&self) -> Vec<OverlayKind> {
		self.overlays.borrow().iter().map(|(kind, _)| *kind).collect()
	}

	/// Text of the open overlays of one kind.
	pub fn overlay_texts(&self, kind: OverlayKind) -> Vec<String> {
		self.overlays
			.borrow()
			.iter()
			.filter(|(k, _)| *k == kind)
			.map(|(_, view)| view.text_content())
			.collect()
	}

	/// Layout classes currently on the body.
	pub fn layout_classes(&self) -> Vec<String> {
		self.layout_classes.borrow().clone()
	}

	/// The mounted sidebar view, if any.
	pub fn sidebar(&self) -> Option<View> {
		self.sidebar.borrow().clone()
	}

	/// Whether sidebar labels are currently visible.
	pub fn sidebar_labels_visible(&self) -> bool {
		self.sidebar_labels_visible.get()
	}

	/// Value of a CSS custom property set through the shell.
	pub fn css_variable(&self, name: &str) -> Option<String> {
		self.css_variables.borrow().get(name).cloned()
	}

	/// Every mutation so far, oldest first.
	pub fn events(&self) -> Vec<ShellEvent> {
		self.events.borrow().clone()
	}

	/// Number of recorded events matching `predicate`.
	pub fn count_events(&self, predicate: impl Fn(&ShellEvent) -> bool) -> usize {
		self.events.borrow().iter().filter(|e| predicate(e)).count()
	}

	/// Forgets recorded events.
	pub fn clear_events(&self) {
		self.events.borrow_mut().clear();
	}

	fn record(&self, event: ShellEvent) {
		self.events.borrow_mut().push(event);
	}
}

impl Shell for MemoryShell {
	fn has_content_region(&self) -> bool {
		self.content_region.get()
	}

	fn add_content_class(&self, class: &str) {
		if !self.has_content_region() {
			return;
		}
		let mut classes = self.content_classes.borrow_mut();
		if !classes.iter().any(|c| c == class) {
			classes.push(class.to_string());
		}
		drop(classes);
		self.record(ShellEvent::AddContentClass(class.to_string()));
	}

	fn remove_content_class(&self, class: &str) {
		if !self.has_content_region() {
			return;
		}
		self.content_classes.borrow_mut().retain(|c| c != class);
		self.record(ShellEvent::RemoveContentClass(class.to_string()));
	}

	fn mount_content(&self, view: &View) -> Result<(), MountError> {
		if !self.has_content_region() {
			return Err(MountError::MissingTarget("page-view".to_string()));
		}
		*self.content.borrow_mut() = Some(view.clone());
		self.record(ShellEvent::MountContent(view.render_to_string()));
		Ok(())
	}

	fn focus_content(&self) {
		if self.has_content_region() {
			self.record(ShellEvent::FocusContent);
		}
	}

	fn reset_content_scroll(&self) {
		if self.has_content_region() {
			self.record(ShellEvent::ResetScroll);
		}
	}

	fn show_overlay(&self, kind: OverlayKind, view: &View) {
		self.overlays.borrow_mut().push((kind, view.clone()));
	}

	fn clear_overlays(&self) -> usize {
		let removed = self.overlays.borrow_mut().drain(..).count();
		self.record(ShellEvent::ClearOverlays(removed));
		removed
	}

	fn hash(&self) -> String {
		self.hash.borrow().clone()
	}

	fn set_hash(&self, hash: &str) {
		*self.hash.borrow_mut() = hash.to_string();
		self.record(ShellEvent::SetHash(hash.to_string()));
	}

	fn set_layout_class(&self, class: &str, enabled: bool) {
		let mut classes = self.layout_classes.borrow_mut();
		classes.retain(|c| c != class);
		if enabled {
			classes.push(class.to_string());
		}
	}

	fn mount_sidebar(&self, view: &View) -> Result<(), MountError> {
		*self.sidebar.borrow_mut() = Some(view.clone());
		self.record(ShellEvent::MountSidebar);
		Ok(())
	}

	fn set_sidebar_labels_visible(&self, visible: bool) {
		self.sidebar_labels_visible.set(visible);
		self.record(ShellEvent::SidebarLabels(visible));
	}

	fn set_css_variable(&self, name: &str, value: &str) {
		self.css_variables
			.borrow_mut()
			.insert(name.to_string(), value.to_string());
	}

	fn viewport_width(&self) -> Option<u32> {
		self.viewport_width.get()
	}
}
