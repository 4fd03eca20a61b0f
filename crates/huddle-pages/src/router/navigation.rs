//! Navigation sequencing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::RouterError;
use super::guard::{GuardAction, RouteGuard};
use super::hash::Route;
use super::page::RouteParams;
use super::registry::{ModulePath, PageRegistry};
use super::render::{PageRenderer, not_found_view};
use super::transition::{Timer, TransitionController};
use crate::component::View;
use crate::context::AppContext;
use crate::{debug_log, error_log, info_log, warn_log};

/// How a navigation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// Content was swapped in.
	Rendered {
		/// The route navigated to.
		route: Route,
		/// Module that produced the content; `None` for the built-in
		/// not-found view.
		module: Option<ModulePath>,
		/// Whether the not-found page was shown instead of the route's page.
		not_found: bool,
	},
	/// The guard replaced the hash. The resulting `hashchange` starts a new
	/// navigation.
	Redirected {
		/// The route that was refused.
		from: Route,
		/// Hash assigned instead.
		to: String,
	},
	/// A newer navigation started before this one reached the swap.
	Superseded {
		/// The route that was abandoned.
		route: Route,
	},
	/// The application was shut down. Nothing was touched.
	Inactive {
		/// The route that was ignored.
		route: Route,
	},
}

/// Identifies one navigation. Only the most recent token is current.
#[derive(Debug, Clone)]
pub struct NavigationToken {
	generation: u64,
	latest: Rc<Cell<u64>>,
}

impl NavigationToken {
	/// Whether no newer navigation has started.
	pub fn is_current(&self) -> bool {
		self.latest.get() == self.generation
	}

	/// Sequence number of this navigation.
	pub fn generation(&self) -> u64 {
		self.generation
	}
}

/// Runs navigations against one application context.
///
/// Navigations may overlap (the user clicks again mid-fade). Each one takes
/// a token when it starts and checks it after every await; a navigation
/// whose token is no longer current stops without touching the content
/// region, so the last navigation requested is the one that renders.
pub struct Navigator {
	ctx: Rc<AppContext>,
	registry: PageRegistry,
	guard: RouteGuard,
	transitions: TransitionController,
	renderer: PageRenderer,
	latest: Rc<Cell<u64>>,
	current: RefCell<Option<Route>>,
}

impl std::fmt::Debug for Navigator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Navigator")
			.field("registry", &self.registry)
			.field("guard", &self.guard)
			.field("generation", &self.latest.get())
			.field("current", &self.current.borrow())
			.finish_non_exhaustive()
	}
}

impl Navigator {
	/// Creates a navigator using the context's routing and transition
	/// settings.
	pub fn new(ctx: Rc<AppContext>, registry: PageRegistry, timer: Rc<dyn Timer>) -> Self {
		let guard = RouteGuard::from_settings(&ctx.settings().routing);
		let transitions = TransitionController::new(&ctx.settings().transition, timer);
		Self {
			ctx,
			registry,
			guard,
			transitions,
			renderer: PageRenderer,
			latest: Rc::new(Cell::new(0)),
			current: RefCell::new(None),
		}
	}

	/// The page registry.
	pub fn registry(&self) -> &PageRegistry {
		&self.registry
	}

	/// The route guard.
	pub fn guard(&self) -> &RouteGuard {
		&self.guard
	}

	/// Route of the content currently on screen.
	pub fn current_route(&self) -> Option<Route> {
		self.current.borrow().clone()
	}

	/// Starts a navigation, superseding any in flight.
	pub fn begin(&self) -> NavigationToken {
		let generation = self.latest.get().wrapping_add(1);
		self.latest.set(generation);
		NavigationToken {
			generation,
			latest: Rc::clone(&self.latest),
		}
	}

	/// Navigates to whatever the shell's hash currently says.
	pub async fn handle_hash_change(&self) -> NavigationOutcome {
		let hash = self.ctx.shell().hash();
		self.navigate(&hash).await
	}

	/// Requests a navigation by assigning the hash. The navigation itself
	/// runs on the resulting `hashchange`.
	pub fn go(&self, target: &str) -> Result<(), RouterError> {
		let target = target.trim().trim_start_matches('#').trim_start_matches('/');
		if target.is_empty() || target.contains('#') || target.chars().any(char::is_whitespace) {
			return Err(RouterError::InvalidRoute(target.to_string()));
		}
		self.ctx.shell().set_hash(&format!("#/{}", target));
		Ok(())
	}

	/// Runs one navigation for `hash`.
	///
	/// Never fails: unknown routes and broken pages end on the not-found
	/// page, and an absent content region turns the swap into a no-op.
	/// After [`AppContext::teardown`] every navigation is ignored.
	pub async fn navigate(&self, hash: &str) -> NavigationOutcome {
		let settings = self.ctx.settings();
		let route = Route::parse(hash, &settings.routing.default_route);
		if !self.ctx.is_active() {
			debug_log!("Ignoring navigation to '{}' after shutdown", route);
			return NavigationOutcome::Inactive { route };
		}
		let token = self.begin();

		let action = self.guard.decide(self.ctx.is_logged_in(), &route);
		if let Some(to) = self.guard.redirect_hash(action) {
			match action {
				GuardAction::RedirectToLogin => info_log!("'{}' requires sign-in, redirecting to {}", route, to),
				_ => debug_log!("'{}' is public, redirecting to {}", route, to),
			}
			self.ctx.shell().set_hash(&to);
			return NavigationOutcome::Redirected { from: route, to };
		}

		let params = RouteParams::new(route.clone());
		let (module, content, not_found) = self.load_content(&params).await;
		if !token.is_current() {
			debug_log!("Navigation to '{}' superseded while loading", route);
			return NavigationOutcome::Superseded { route };
		}

		let shell = self.ctx.shell();
		self.transitions.fade_out(shell).await;
		if !token.is_current() {
			debug_log!("Navigation to '{}' superseded during fade-out", route);
			return NavigationOutcome::Superseded { route };
		}
		if !self.ctx.is_active() {
			return NavigationOutcome::Inactive { route };
		}

		if let Err(err) = self.renderer.mount(shell, content, &params) {
			warn_log!("Skipping swap for '{}': {}", route, err);
		}
		*self.current.borrow_mut() = Some(route.clone());
		self.transitions.fade_in(shell).await;

		NavigationOutcome::Rendered {
			route,
			module,
			not_found,
		}
	}

	async fn load_content(&self, params: &RouteParams) -> (Option<ModulePath>, View, bool) {
		match self.registry.resolve(params.route()) {
			Some(path) => {
				let rendered = match self.registry.load(&path).await {
					Ok(module) => module.invoke(params),
					Err(err) => Err(err),
				};
				match rendered {
					Ok(view) => return (Some(path), view, false),
					Err(err) => warn_log!("Page {} failed, showing not-found: {}", path, err),
				}
			}
			None => debug_log!("No page module for '{}'", params.full()),
		}
		self.load_not_found(params).await
	}

	async fn load_not_found(&self, params: &RouteParams) -> (Option<ModulePath>, View, bool) {
		if let Some(path) = self.registry.resolve_not_found() {
			let rendered = match self.registry.load(&path).await {
				Ok(module) => module.invoke(params),
				Err(err) => Err(err),
			};
			match rendered {
				Ok(view) => return (Some(path), view, true),
				Err(err) => error_log!("Not-found page {} failed: {}", path, err),
			}
		}
		(None, not_found_view(params.route()), true)
	}
}
