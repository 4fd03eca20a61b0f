//! IntoView trait and View enum for page rendering.

use std::borrow::Cow;

/// A unified representation of renderable content.
///
/// Every page module produces a `View`, and the sidebar is rendered as one.
/// Mounting goes through [`View::render_to_string`] so the same tree serves
/// the browser shell and the in-memory shell used natively.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
	/// A DOM element.
	Element(ElementView),
	/// A text node.
	Text(Cow<'static, str>),
	/// A fragment containing multiple views (no wrapper element).
	Fragment(Vec<View>),
	/// An empty view (renders nothing).
	Empty,
}

/// Represents a DOM element in the view tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementView {
	/// The tag name (e.g., "div", "span").
	tag: Cow<'static, str>,
	/// HTML attributes.
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	/// Child views.
	children: Vec<View>,
	/// Whether this is a void element (no closing tag).
	is_void: bool,
}

impl ElementView {
	/// Creates a new element view.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		let tag = tag.into();
		let is_void = matches!(
			tag.as_ref(),
			"area"
				| "base" | "br"
				| "col" | "embed"
				| "hr" | "img"
				| "input" | "link"
				| "meta" | "source"
				| "track" | "wbr"
		);
		Self {
			tag,
			attrs: Vec::new(),
			children: Vec::new(),
			is_void,
		}
	}

	/// Adds an attribute.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Sets the `class` attribute.
	pub fn class(self, class: impl Into<Cow<'static, str>>) -> Self {
		self.attr("class", class)
	}

	/// Adds a child view.
	pub fn child(mut self, child: impl IntoView) -> Self {
		self.children.push(child.into_view());
		self
	}

	/// Adds multiple child views.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoView>) -> Self {
		self.children
			.extend(children.into_iter().map(|c| c.into_view()));
		self
	}

	/// Returns the tag name.
	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	/// Returns the attributes.
	pub fn attrs(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
		&self.attrs
	}

	/// Returns the value of the first attribute named `name`.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_ref())
	}

	/// Returns `true` when the `class` attribute lists `class`.
	pub fn has_class(&self, class: &str) -> bool {
		self.get_attr("class")
			.is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
	}

	/// Returns the child views.
	pub fn child_views(&self) -> &[View] {
		&self.children
	}

	/// Returns whether this is a void element.
	pub fn is_void(&self) -> bool {
		self.is_void
	}
}

impl View {
	/// Creates an element view.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> ElementView {
		ElementView::new(tag)
	}

	/// Creates a text view.
	pub fn text(content: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(content.into())
	}

	/// Creates a fragment view.
	pub fn fragment(children: impl IntoIterator<Item = impl IntoView>) -> Self {
		Self::Fragment(children.into_iter().map(|c| c.into_view()).collect())
	}

	/// Creates an empty view.
	pub fn empty() -> Self {
		Self::Empty
	}

	/// Returns `true` for [`View::Empty`] and fragments of empty views.
	pub fn is_empty(&self) -> bool {
		match self {
			View::Empty => true,
			View::Fragment(children) => children.iter().all(View::is_empty),
			_ => false,
		}
	}

	/// Concatenated text of the whole tree, without markup.
	pub fn text_content(&self) -> String {
		let mut output = String::new();
		self.collect_text(&mut output);
		output
	}

	fn collect_text(&self, output: &mut String) {
		match self {
			View::Element(el) => el.children.iter().for_each(|c| c.collect_text(output)),
			View::Text(text) => output.push_str(text),
			View::Fragment(children) => children.iter().for_each(|c| c.collect_text(output)),
			View::Empty => {}
		}
	}

	/// Depth-first search for elements carrying `class`.
	pub fn find_by_class(&self, class: &str) -> Vec<&ElementView> {
		let mut found = Vec::new();
		self.collect_by_class(class, &mut found);
		found
	}

	fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a ElementView>) {
		match self {
			View::Element(el) => {
				if el.has_class(class) {
					found.push(el);
				}
				for child in &el.children {
					child.collect_by_class(class, found);
				}
			}
			View::Fragment(children) => {
				for child in children {
					child.collect_by_class(class, found);
				}
			}
			View::Text(_) | View::Empty => {}
		}
	}

	/// Renders the view to an HTML string.
	pub fn render_to_string(&self) -> String {
		let mut output = String::new();
		self.render_to_string_inner(&mut output);
		output
	}

	fn render_to_string_inner(&self, output: &mut String) {
		match self {
			View::Element(el) => {
				output.push('<');
				output.push_str(el.tag_name());

				for (name, value) in el.attrs() {
					output.push(' ');
					output.push_str(name);
					output.push_str("=\"");
					output.push_str(&html_escape(value));
					output.push('"');
				}

				if el.is_void() {
					output.push_str(" />");
				} else {
					output.push('>');
					for child in el.child_views() {
						child.render_to_string_inner(output);
					}
					output.push_str("</");
					output.push_str(el.tag_name());
					output.push('>');
				}
			}
			View::Text(text) => {
				output.push_str(&html_escape(text));
			}
			View::Fragment(children) => {
				for child in children {
					child.render_to_string_inner(output);
				}
			}
			View::Empty => {}
		}
	}
}

/// Trait for types that can be converted into a View.
pub trait IntoView {
	/// Converts self into a View.
	fn into_view(self) -> View;
}

impl IntoView for View {
	fn into_view(self) -> View {
		self
	}
}

impl IntoView for ElementView {
	fn into_view(self) -> View {
		View::Element(self)
	}
}

impl IntoView for String {
	fn into_view(self) -> View {
		View::Text(Cow::Owned(self))
	}
}

impl IntoView for &'static str {
	fn into_view(self) -> View {
		View::Text(Cow::Borrowed(self))
	}
}

impl<T: IntoView> IntoView for Option<T> {
	fn into_view(self) -> View {
		match self {
			Some(v) => v.into_view(),
			None => View::Empty,
		}
	}
}

impl<T: IntoView> IntoView for Vec<T> {
	fn into_view(self) -> View {
		View::Fragment(self.into_iter().map(|v| v.into_view()).collect())
	}
}

impl IntoView for () {
	fn into_view(self) -> View {
		View::Empty
	}
}

impl<A: IntoView, B: IntoView> IntoView for (A, B) {
	fn into_view(self) -> View {
		View::Fragment(vec![self.0.into_view(), self.1.into_view()])
	}
}

/// Escapes HTML special characters.
fn html_escape(s: &str) -> Cow<'_, str> {
	if s.contains(['&', '<', '>', '"', '\'']) {
		let mut escaped = String::with_capacity(s.len() + 8);
		for c in s.chars() {
			match c {
				'&' => escaped.push_str("&amp;"),
				'<' => escaped.push_str("&lt;"),
				'>' => escaped.push_str("&gt;"),
				'"' => escaped.push_str("&quot;"),
				'\'' => escaped.push_str("&#x27;"),
				_ => escaped.push(c),
			}
		}
		Cow::Owned(escaped)
	} else {
		Cow::Borrowed(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_render_element_with_children() {
		let view = ElementView::new("div")
			.child("Hello, ")
			.child(ElementView::new("strong").child("World"))
			.into_view();
		assert_eq!(
			view.render_to_string(),
			"<div>Hello, <strong>World</strong></div>"
		);
	}

	#[test]
	fn test_render_void_element() {
		let view = ElementView::new("br").into_view();
		assert_eq!(view.render_to_string(), "<br />");
	}

	#[test]
	fn test_render_text_with_escaping() {
		let view = View::text("<script>alert('xss')</script>");
		assert_eq!(
			view.render_to_string(),
			"&lt;script&gt;alert(&#x27;xss&#x27;)&lt;/script&gt;"
		);
	}

	#[test]
	fn test_has_class_matches_whole_tokens() {
		let el = ElementView::new("span").class("sidebar-label hidden");
		assert!(el.has_class("sidebar-label"));
		assert!(el.has_class("hidden"));
		assert!(!el.has_class("sidebar"));
	}

	#[test]
	fn test_find_by_class_descends_fragments() {
		let view = View::fragment([
			ElementView::new("li").class("nav-item").child("A"),
			ElementView::new("li")
				.class("nav-item")
				.child(ElementView::new("span").class("nav-item")),
		]);
		assert_eq!(view.find_by_class("nav-item").len(), 3);
		assert!(view.find_by_class("missing").is_empty());
	}

	#[test]
	fn test_text_content_skips_markup() {
		let view = ElementView::new("p")
			.child("Page ")
			.child(ElementView::new("em").child("not found"))
			.into_view();
		assert_eq!(view.text_content(), "Page not found");
	}

	#[test]
	fn test_is_empty() {
		assert!(View::empty().is_empty());
		assert!(View::fragment(Vec::<View>::new()).is_empty());
		assert!(!View::text("x").is_empty());
	}

	#[test]
	fn test_get_attr() {
		let el = ElementView::new("a").attr("href", "#/roster");
		assert_eq!(el.get_attr("href"), Some("#/roster"));
		assert_eq!(el.get_attr("id"), None);
	}
}
