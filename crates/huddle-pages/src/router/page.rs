//! Page modules and the two entry styles they may expose.

use std::fmt;
use std::rc::Rc;

use super::hash::Route;
use crate::component::{IntoView, View};

/// Error type for loading and rendering a page.
///
/// The navigator never lets these escape: it logs them and shows the
/// not-found page instead.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
	/// The module could not be fetched.
	#[error("Failed to load '{path}': {message}")]
	LoadFailed {
		/// Registry path.
		path: String,
		/// Loader message.
		message: String,
	},
	/// The module's entry returned an error.
	#[error("Failed to render '{page}': {message}")]
	RenderFailed {
		/// Module name.
		page: String,
		/// Page message.
		message: String,
	},
	/// The module exposes no usable entry.
	#[error("Page '{0}' has no entry point")]
	MissingEntry(String),
	/// No module matched and no not-found page is registered.
	#[error("No page for '{0}'")]
	NotFound(String),
}

impl PageError {
	/// Shorthand for [`PageError::RenderFailed`].
	pub fn render(page: impl Into<String>, message: impl fmt::Display) -> Self {
		Self::RenderFailed {
			page: page.into(),
			message: message.to_string(),
		}
	}

	/// Shorthand for [`PageError::LoadFailed`].
	pub fn load(path: impl Into<String>, message: impl fmt::Display) -> Self {
		Self::LoadFailed {
			path: path.into(),
			message: message.to_string(),
		}
	}
}

/// What a page receives when it is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParams {
	route: Route,
}

impl RouteParams {
	/// Parameters for `route`.
	pub fn new(route: Route) -> Self {
		Self { route }
	}

	/// First path segment.
	pub fn base(&self) -> &str {
		self.route.base()
	}

	/// Path after the base.
	pub fn sub(&self) -> Option<&str> {
		self.route.sub()
	}

	/// `base` or `base/sub`.
	pub fn full(&self) -> &str {
		self.route.full()
	}

	/// First query value for `key`.
	pub fn query(&self, key: &str) -> Option<&str> {
		self.route.query(key)
	}

	/// The parsed route.
	pub fn route(&self) -> &Route {
		&self.route
	}
}

/// Stand-in for the content region handed to legacy pages.
///
/// Legacy pages write into a container instead of returning a view. The
/// container is turned into a view afterwards, so both entry styles reach
/// the shell the same way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Container {
	classes: Vec<String>,
	children: Vec<View>,
}

impl Container {
	/// An empty container.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a child.
	pub fn append(&mut self, child: impl IntoView) -> &mut Self {
		let view = child.into_view();
		if !view.is_empty() {
			self.children.push(view);
		}
		self
	}

	/// Replaces all children with plain text.
	pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
		self.children = vec![View::text(text.into())];
		self
	}

	/// Adds a class to the wrapper element.
	pub fn add_class(&mut self, class: impl Into<String>) -> &mut Self {
		let class = class.into();
		if !self.classes.contains(&class) {
			self.classes.push(class);
		}
		self
	}

	/// Removes every child.
	pub fn clear(&mut self) {
		self.children.clear();
	}

	/// Whether nothing was written.
	pub fn is_empty(&self) -> bool {
		self.children.is_empty()
	}
}

impl IntoView for Container {
	fn into_view(self) -> View {
		if self.classes.is_empty() {
			return View::fragment(self.children);
		}
		View::element("div")
			.class(self.classes.join(" "))
			.children(self.children)
			.into_view()
	}
}

type RenderFn = dyn Fn(&RouteParams) -> Result<View, PageError>;
type MountFn = dyn Fn(&mut Container, &RouteParams) -> Result<(), PageError>;

/// Entry point exposed by a page module.
#[derive(Clone)]
pub enum PageEntry {
	/// Returns the page's view.
	Render(Rc<RenderFn>),
	/// Writes into a container (legacy pages).
	Container(Rc<MountFn>),
}

impl fmt::Debug for PageEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			PageEntry::Render(_) => f.write_str("PageEntry::Render"),
			PageEntry::Container(_) => f.write_str("PageEntry::Container"),
		}
	}
}

/// A loaded page.
#[derive(Debug, Clone)]
pub struct PageModule {
	name: String,
	entry: Option<PageEntry>,
}

impl PageModule {
	/// A page that returns its view.
	pub fn render<F>(name: impl Into<String>, render: F) -> Self
	where
		F: Fn(&RouteParams) -> Result<View, PageError> + 'static,
	{
		Self {
			name: name.into(),
			entry: Some(PageEntry::Render(Rc::new(render))),
		}
	}

	/// A legacy page that writes into a [`Container`].
	pub fn legacy<F>(name: impl Into<String>, mount: F) -> Self
	where
		F: Fn(&mut Container, &RouteParams) -> Result<(), PageError> + 'static,
	{
		Self {
			name: name.into(),
			entry: Some(PageEntry::Container(Rc::new(mount))),
		}
	}

	/// A module without an entry point. Invoking it fails with
	/// [`PageError::MissingEntry`].
	pub fn without_entry(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			entry: None,
		}
	}

	/// Module name, used in logs.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The entry, if any.
	pub fn entry(&self) -> Option<&PageEntry> {
		self.entry.as_ref()
	}

	/// Runs the entry and returns the resulting view, whichever style the
	/// page uses.
	pub fn invoke(&self, params: &RouteParams) -> Result<View, PageError> {
		match &self.entry {
			Some(PageEntry::Render(render)) => render(params),
			Some(PageEntry::Container(mount)) => {
				let mut container = Container::new();
				mount(&mut container, params)?;
				Ok(container.into_view())
			}
			None => Err(PageError::MissingEntry(self.name.clone())),
		}
	}
}
