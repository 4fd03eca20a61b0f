//! Static page registry and module resolution.
//!
//! Every page module the app can show is registered up front under a
//! lowercase `pages/<base>/<sub>` or `pages/<base>/index` path. Resolution
//! only ever looks paths up in this table; a route can never name arbitrary
//! code. Loaders run at most once per successful load.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::rc::Rc;

use futures_util::FutureExt;
use futures_util::future::LocalBoxFuture;
use huddle_conf::RoutingSettings;

use super::RouterError;
use super::hash::Route;
use super::page::{PageError, PageModule};
use crate::debug_log;

/// Future returned by a page loader.
pub type PageFuture = LocalBoxFuture<'static, Result<PageModule, PageError>>;

/// Fetches a page module.
pub type PageLoader = Rc<dyn Fn() -> PageFuture>;

const PREFIX: &str = "pages";
const INDEX: &str = "index";

/// Normalized registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(String);

impl ModulePath {
	/// `pages/<base>/<sub>`, lowercased.
	pub fn nested(base: &str, sub: &str) -> Self {
		Self(format!("{}/{}/{}", PREFIX, base, sub).to_lowercase())
	}

	/// `pages/<base>/index`, lowercased.
	pub fn index(base: &str) -> Self {
		Self::nested(base, INDEX)
	}

	/// Validates and normalizes a registry path.
	///
	/// Accepts `pages/<base>/<sub>`, `pages/<base>` (meaning the index), and
	/// the same without the `pages/` prefix. Segments must be non-empty and
	/// free of whitespace.
	pub fn parse(raw: &str) -> Result<Self, RouterError> {
		let invalid = || RouterError::InvalidModulePath(raw.to_string());

		let trimmed = raw.trim().trim_matches('/').to_lowercase();
		let rest = match trimmed.strip_prefix("pages/") {
			Some(rest) => rest.to_string(),
			None if trimmed == PREFIX => return Err(invalid()),
			None => trimmed.clone(),
		};

		let (base, sub) = match rest.split_once('/') {
			Some((base, sub)) => (base, sub),
			None => (rest.as_str(), INDEX),
		};
		let valid = |s: &str| {
			!s.is_empty() && s.split('/').all(|seg| !seg.is_empty() && !seg.chars().any(char::is_whitespace))
		};
		if !valid(base) || !valid(sub) {
			return Err(invalid());
		}
		Ok(Self::nested(base, sub))
	}

	/// The normalized path.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ModulePath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// One row of a compile-time page table.
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
	/// Registry path, as accepted by [`ModulePath::parse`].
	pub path: &'static str,
	/// Loader for the module.
	pub load: fn() -> PageFuture,
}

struct Slot {
	loader: PageLoader,
	loaded: RefCell<Option<PageModule>>,
}

/// The table of loadable pages.
pub struct PageRegistry {
	slots: HashMap<ModulePath, Slot>,
	not_found: ModulePath,
}

impl fmt::Debug for PageRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut paths: Vec<_> = self.slots.keys().map(ModulePath::as_str).collect();
		paths.sort_unstable();
		f.debug_struct("PageRegistry")
			.field("paths", &paths)
			.field("not_found", &self.not_found)
			.finish()
	}
}

impl PageRegistry {
	/// Starts an empty registry.
	pub fn builder() -> PageRegistryBuilder {
		PageRegistryBuilder::default()
	}

	/// Starts an empty registry using the configured not-found segment.
	pub fn builder_for(settings: &RoutingSettings) -> PageRegistryBuilder {
		PageRegistryBuilder::default().not_found_segment(settings.not_found_segment.clone())
	}

	/// Builds a registry from a compile-time table.
	pub fn from_entries(entries: &[RegistryEntry]) -> Result<Self, RouterError> {
		entries
			.iter()
			.fold(Self::builder(), |builder, entry| {
				let load = entry.load;
				builder.loader(entry.path, move || load())
			})
			.build()
	}

	/// Finds the module for a route: the exact `pages/<base>/<sub>` first,
	/// then `pages/<base>/index`. Matching ignores case.
	///
	/// Pure lookup; calling it again with the same route gives the same
	/// answer and loads nothing.
	pub fn resolve(&self, route: &Route) -> Option<ModulePath> {
		if let Some(sub) = route.sub() {
			let exact = ModulePath::nested(route.base(), sub);
			if self.slots.contains_key(&exact) {
				return Some(exact);
			}
		}
		let index = ModulePath::index(route.base());
		self.slots.contains_key(&index).then_some(index)
	}

	/// Path of the registered not-found page, if there is one.
	pub fn resolve_not_found(&self) -> Option<ModulePath> {
		self.slots
			.contains_key(&self.not_found)
			.then(|| self.not_found.clone())
	}

	/// Whether `path` is registered.
	pub fn contains(&self, path: &ModulePath) -> bool {
		self.slots.contains_key(path)
	}

	/// Whether `path` has been loaded successfully.
	pub fn is_loaded(&self, path: &ModulePath) -> bool {
		self.slots
			.get(path)
			.is_some_and(|slot| slot.loaded.borrow().is_some())
	}

	/// Number of registered paths.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Whether nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Loads `path`, reusing an earlier successful load. Failures are not
	/// cached, so the next navigation retries.
	pub async fn load(&self, path: &ModulePath) -> Result<PageModule, PageError> {
		let slot = self
			.slots
			.get(path)
			.ok_or_else(|| PageError::NotFound(path.to_string()))?;

		if let Some(module) = slot.loaded.borrow().as_ref() {
			return Ok(module.clone());
		}

		debug_log!("Loading page module {}", path);
		let module = (slot.loader)().await?;
		*slot.loaded.borrow_mut() = Some(module.clone());
		Ok(module)
	}
}

/// Builder for [`PageRegistry`].
pub struct PageRegistryBuilder {
	entries: Vec<(String, PageLoader)>,
	not_found_segment: String,
}

impl Default for PageRegistryBuilder {
	fn default() -> Self {
		Self {
			entries: Vec::new(),
			not_found_segment: "404".to_string(),
		}
	}
}

impl fmt::Debug for PageRegistryBuilder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PageRegistryBuilder")
			.field("paths", &self.entries.iter().map(|(p, _)| p).collect::<Vec<_>>())
			.field("not_found_segment", &self.not_found_segment)
			.finish()
	}
}

impl PageRegistryBuilder {
	/// Registers an asynchronous loader under `path`.
	pub fn loader<F, Fut>(mut self, path: &str, load: F) -> Self
	where
		F: Fn() -> Fut + 'static,
		Fut: Future<Output = Result<PageModule, PageError>> + 'static,
	{
		let loader: PageLoader = Rc::new(move || load().boxed_local());
		self.entries.push((path.to_string(), loader));
		self
	}

	/// Registers an already-available module as `pages/<base>/<sub>`.
	pub fn page(self, base: &str, sub: &str, module: PageModule) -> Self {
		self.ready(&format!("{}/{}/{}", PREFIX, base, sub), module)
	}

	/// Registers an already-available module as `pages/<base>/index`.
	pub fn index(self, base: &str, module: PageModule) -> Self {
		self.ready(&format!("{}/{}/{}", PREFIX, base, INDEX), module)
	}

	/// Registers the not-found page.
	pub fn not_found(self, module: PageModule) -> Self {
		let segment = self.not_found_segment.clone();
		self.index(&segment, module)
	}

	/// Route segment of the not-found page. Defaults to `404`.
	///
	/// Set this before calling [`PageRegistryBuilder::not_found`].
	pub fn not_found_segment(mut self, segment: impl Into<String>) -> Self {
		self.not_found_segment = segment.into();
		self
	}

	/// Validates every path and builds the registry.
	pub fn build(self) -> Result<PageRegistry, RouterError> {
		let not_found = ModulePath::parse(&self.not_found_segment)?;
		let mut slots = HashMap::with_capacity(self.entries.len());

		for (raw, loader) in self.entries {
			let path = ModulePath::parse(&raw)?;
			if slots.contains_key(&path) {
				return Err(RouterError::DuplicateModule(path.to_string()));
			}
			slots.insert(
				path,
				Slot {
					loader,
					loaded: RefCell::new(None),
				},
			);
		}

		Ok(PageRegistry { slots, not_found })
	}

	fn ready(self, path: &str, module: PageModule) -> Self {
		self.loader(path, move || std::future::ready(Ok(module.clone())))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::View;
	use rstest::rstest;
	use std::cell::Cell;

	fn page(name: &'static str) -> PageModule {
		PageModule::render(name, move |_| Ok(View::text(name)))
	}

	fn route(hash: &str) -> Route {
		Route::parse(hash, "dashboard")
	}

	fn registry() -> PageRegistry {
		PageRegistry::builder()
			.index("dashboard", page("dashboard"))
			.index("playbook", page("playbook"))
			.page("playbook", "edit", page("playbook-edit"))
			.not_found(page("404"))
			.build()
			.unwrap()
	}

	#[rstest]
	#[case("pages/roster/index", "pages/roster/index")]
	#[case("pages/Roster", "pages/roster/index")]
	#[case("roster/edit", "pages/roster/edit")]
	#[case("/pages/roster/edit/", "pages/roster/edit")]
	#[case("404", "pages/404/index")]
	fn test_module_path_parse(#[case] raw: &str, #[case] expected: &str) {
		assert_eq!(ModulePath::parse(raw).unwrap().as_str(), expected);
	}

	#[rstest]
	#[case("")]
	#[case("pages")]
	#[case("pages//edit")]
	#[case("pages/my page")]
	fn test_module_path_rejects(#[case] raw: &str) {
		assert!(matches!(
			ModulePath::parse(raw),
			Err(RouterError::InvalidModulePath(_))
		));
	}

	#[rstest]
	#[case("#/playbook/edit", Some("pages/playbook/edit"))]
	#[case("#/playbook/view", Some("pages/playbook/index"))]
	#[case("#/playbook", Some("pages/playbook/index"))]
	#[case("#/PlayBook/EDIT", Some("pages/playbook/edit"))]
	#[case("#/", Some("pages/dashboard/index"))]
	#[case("#/roster", None)]
	fn test_resolve(#[case] hash: &str, #[case] expected: Option<&str>) {
		let resolved = registry().resolve(&route(hash));
		assert_eq!(resolved.as_ref().map(ModulePath::as_str), expected);
	}

	#[rstest]
	fn test_resolve_does_not_load() {
		let registry = registry();
		let path = registry.resolve(&route("#/playbook")).unwrap();
		assert!(!registry.is_loaded(&path));
	}

	#[rstest]
	fn test_duplicate_paths_rejected() {
		let result = PageRegistry::builder()
			.index("roster", page("a"))
			.loader("pages/Roster/index", || std::future::ready(Ok(page("b"))))
			.build();
		assert_eq!(
			result.unwrap_err(),
			RouterError::DuplicateModule("pages/roster/index".into())
		);
	}

	#[rstest]
	fn test_not_found_segment() {
		let registry = PageRegistry::builder()
			.not_found_segment("missing")
			.not_found(page("missing"))
			.build()
			.unwrap();
		assert_eq!(
			registry.resolve_not_found().unwrap().as_str(),
			"pages/missing/index"
		);
	}

	#[rstest]
	fn test_builder_for_settings() {
		let mut settings = RoutingSettings::default();
		settings.not_found_segment = "lost".into();
		let registry = PageRegistry::builder_for(&settings)
			.not_found(page("lost"))
			.build()
			.unwrap();
		assert_eq!(registry.resolve_not_found(), Some(ModulePath::index("lost")));
	}

	#[rstest]
	fn test_no_not_found_page() {
		let registry = PageRegistry::builder()
			.index("dashboard", page("dashboard"))
			.build()
			.unwrap();
		assert!(registry.resolve_not_found().is_none());
	}

	#[tokio::test]
	async fn test_load_runs_loader_once() {
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);
		let registry = PageRegistry::builder()
			.loader("pages/stats/index", move || {
				counter.set(counter.get() + 1);
				std::future::ready(Ok(page("stats")))
			})
			.build()
			.unwrap();
		let path = ModulePath::index("stats");

		registry.load(&path).await.unwrap();
		registry.load(&path).await.unwrap();

		assert_eq!(calls.get(), 1);
		assert!(registry.is_loaded(&path));
	}

	#[tokio::test]
	async fn test_failed_load_is_retried() {
		let calls = Rc::new(Cell::new(0));
		let counter = Rc::clone(&calls);
		let registry = PageRegistry::builder()
			.loader("pages/stats/index", move || {
				counter.set(counter.get() + 1);
				let result = if counter.get() == 1 {
					Err(PageError::load("pages/stats/index", "network"))
				} else {
					Ok(page("stats"))
				};
				std::future::ready(result)
			})
			.build()
			.unwrap();
		let path = ModulePath::index("stats");

		assert!(registry.load(&path).await.is_err());
		assert!(registry.load(&path).await.is_ok());
		assert_eq!(calls.get(), 2);
	}

	#[tokio::test]
	async fn test_from_entries() {
		fn dashboard() -> PageFuture {
			Box::pin(std::future::ready(Ok(PageModule::render("dashboard", |_| {
				Ok(View::text("home"))
			}))))
		}
		static ENTRIES: &[RegistryEntry] = &[RegistryEntry {
			path: "pages/dashboard/index",
			load: dashboard,
		}];

		let registry = PageRegistry::from_entries(ENTRIES).unwrap();
		let module = registry.load(&ModulePath::index("dashboard")).await.unwrap();
		assert_eq!(module.name(), "dashboard");
	}
}
