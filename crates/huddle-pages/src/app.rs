//! Application launcher.
//!
//! [`App`] wires the router, sidebar, and theme to one [`AppContext`] and
//! exposes the handlers the browser events call. On `wasm32`,
//! [`App::mount`] builds the context from the real document and binds
//! `hashchange` and `resize`.

use std::rc::Rc;

use crate::auth::{AuthClient, AuthService};
use crate::context::AppContext;
use crate::router::{NavigationOutcome, Navigator, PageRegistry, Timer};
use crate::sidebar::{Sidebar, SidebarTransition};
use crate::theme::ThemeCache;
use crate::{info_log, warn_log};

/// A running shell.
pub struct App {
	ctx: Rc<AppContext>,
	navigator: Navigator,
	sidebar: Sidebar,
	theme: ThemeCache,
}

impl std::fmt::Debug for App {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("App")
			.field("navigator", &self.navigator)
			.field("sidebar", &self.sidebar)
			.finish_non_exhaustive()
	}
}

impl App {
	/// Assembles the shell. Nothing is rendered until [`App::start`].
	pub fn new(ctx: Rc<AppContext>, registry: PageRegistry, timer: Rc<dyn Timer>) -> Self {
		let navigator = Navigator::new(Rc::clone(&ctx), registry, timer);
		let sidebar = Sidebar::load(Rc::clone(&ctx));
		let theme = ThemeCache::new(ctx.settings().storage.theme.clone());
		Self {
			ctx,
			navigator,
			sidebar,
			theme,
		}
	}

	/// The shared context.
	pub fn context(&self) -> &Rc<AppContext> {
		&self.ctx
	}

	/// The navigator.
	pub fn navigator(&self) -> &Navigator {
		&self.navigator
	}

	/// The sidebar.
	pub fn sidebar(&self) -> &Sidebar {
		&self.sidebar
	}

	/// Boots the shell: restores the session, paints the cached theme,
	/// renders the sidebar, and navigates to the current hash.
	pub async fn start<C: AuthClient + 'static>(&self, auth: &AuthService<C>) -> NavigationOutcome {
		let user = auth.restore().await;
		info_log!(
			"Starting shell ({})",
			user.map_or_else(|| "signed out".to_string(), |u| format!("user {}", u.id))
		);

		let shell = self.ctx.shell();
		self.theme.apply(self.ctx.storage(), shell);
		if let Err(err) = self.sidebar.render() {
			warn_log!("Failed to render sidebar: {}", err);
		}
		self.on_resize();

		self.navigator.handle_hash_change().await
	}

	/// `hashchange` handler.
	pub async fn on_hash_change(&self) -> NavigationOutcome {
		self.navigator.handle_hash_change().await
	}

	/// `resize` handler.
	pub fn on_resize(&self) -> Option<SidebarTransition> {
		let width = self.ctx.shell().viewport_width()?;
		self.sidebar.on_resize(width)
	}

	/// Sidebar toggle button handler.
	pub fn toggle_sidebar(&self) -> SidebarTransition {
		self.sidebar.cycle()
	}

	/// Tears the context down, dropping the session and open overlays.
	pub fn shutdown(&self) {
		self.ctx.teardown();
	}
}

#[cfg(target_arch = "wasm32")]
mod browser {
	use std::rc::Rc;

	use huddle_conf::Settings;
	use wasm_bindgen::JsCast;
	use wasm_bindgen::prelude::*;

	use super::App;
	use crate::auth::{AuthClient, AuthEvent, AuthService, Session};
	use crate::context::AppContext;
	use crate::dom::{BrowserShell, MountError};
	use crate::router::{PageRegistry, default_timer};
	use crate::storage::{LocalStorage, MemoryStorage, Storage};
	use crate::{error_log, warn_log};

	impl App {
		/// Mounts the shell on the current document.
		///
		/// Uses build-time settings, `localStorage` (or memory when it is
		/// unavailable), and binds `hashchange`, `resize`, and auth state
		/// changes. The first navigation runs in the background.
		pub fn mount<C: AuthClient + 'static>(registry: PageRegistry, client: Rc<C>) -> Result<Rc<App>, MountError> {
			#[cfg(feature = "console_error_panic_hook")]
			console_error_panic_hook::set_once();

			let window = web_sys::window().ok_or(MountError::NoWindow)?;
			let storage: Rc<dyn Storage> = match LocalStorage::open() {
				Ok(storage) => Rc::new(storage),
				Err(err) => {
					warn_log!("{}; state will not survive a reload", err);
					Rc::new(MemoryStorage::new())
				}
			};
			let ctx = AppContext::init(Settings::from_build_env(), storage, Rc::new(BrowserShell::new()));
			let app = Rc::new(App::new(Rc::clone(&ctx), registry, default_timer()));
			let auth = Rc::new(AuthService::new(ctx, Rc::clone(&client)));

			listen(&window, "hashchange", {
				let app = Rc::clone(&app);
				move || {
					let app = Rc::clone(&app);
					wasm_bindgen_futures::spawn_local(async move {
						app.on_hash_change().await;
					});
				}
			})?;
			listen(&window, "resize", {
				let app = Rc::clone(&app);
				move || {
					app.on_resize();
				}
			})?;

			// Auth changes may make the current page inaccessible.
			std::mem::forget(auth.subscribe());
			std::mem::forget(client.on_auth_state_change(Box::new({
				let app = Rc::clone(&app);
				move |_: AuthEvent, _: Option<&Session>| {
					let app = Rc::clone(&app);
					wasm_bindgen_futures::spawn_local(async move {
						app.on_hash_change().await;
					});
				}
			})));

			let started = Rc::clone(&app);
			wasm_bindgen_futures::spawn_local(async move {
				started.start(&auth).await;
			});
			Ok(app)
		}
	}

	fn listen(window: &web_sys::Window, event: &str, handler: impl Fn() + 'static) -> Result<(), MountError> {
		let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| handler()) as Box<dyn FnMut(_)>);
		window
			.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
			.map_err(|_| {
				error_log!("Failed to add {} listener", event);
				MountError::Listener(event.to_string())
			})?;
		closure.forget();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::component::View;
	use crate::dom::{MemoryShell, Shell};
	use crate::router::PageModule;
	use crate::sidebar::{RenderPlan, SidebarState};
	use crate::storage::{MemoryStorage, Storage};
	use crate::testing::{InstantTimer, MockAuthClient};
	use crate::theme::THEME_COLOR_VARIABLE;
	use huddle_conf::Settings;

	fn app(shell: Rc<MemoryShell>) -> App {
		let ctx = AppContext::init(Settings::default(), Rc::new(MemoryStorage::new()), shell);
		let registry = PageRegistry::builder()
			.index("dashboard", PageModule::render("dashboard", |_| Ok(View::text("home"))))
			.index("login", PageModule::render("login", |_| Ok(View::text("sign in"))))
			.build()
			.unwrap();
		App::new(ctx, registry, Rc::new(InstantTimer::new()))
	}

	#[tokio::test]
	async fn test_start_signed_out_redirects_then_renders_login() {
		let shell = Rc::new(MemoryShell::with_hash("#/dashboard"));
		let app = app(Rc::clone(&shell));
		let auth = AuthService::new(Rc::clone(app.context()), Rc::new(MockAuthClient::new()));

		let outcome = app.start(&auth).await;
		assert!(matches!(outcome, NavigationOutcome::Redirected { .. }));
		assert_eq!(shell.hash(), "#/login");

		app.on_hash_change().await;
		assert!(shell.content_html().contains("sign in"));
		assert!(shell.sidebar().is_some());
		assert!(shell.css_variable(THEME_COLOR_VARIABLE).is_some());
	}

	#[tokio::test]
	async fn test_start_with_session_renders_dashboard() {
		let shell = Rc::new(MemoryShell::with_hash(""));
		let app = app(Rc::clone(&shell));
		let client = MockAuthClient::with_session(MockAuthClient::session_for("coach@example.com"));
		let auth = AuthService::new(Rc::clone(app.context()), Rc::new(client));

		let outcome = app.start(&auth).await;

		assert!(matches!(outcome, NavigationOutcome::Rendered { not_found: false, .. }));
		assert!(shell.content_html().contains("home"));
	}

	#[tokio::test]
	async fn test_start_applies_viewport() {
		let shell = Rc::new(MemoryShell::with_hash("#/login"));
		shell.set_viewport_width(500);
		let app = app(Rc::clone(&shell));
		let auth = AuthService::new(Rc::clone(app.context()), Rc::new(MockAuthClient::new()));

		app.start(&auth).await;

		assert_eq!(app.sidebar().state(), SidebarState::Collapsed);
	}

	#[test]
	fn test_toggle_cycles_sidebar() {
		let app = app(Rc::new(MemoryShell::new()));
		assert_eq!(app.toggle_sidebar().to, SidebarState::Collapsed);
	}

	#[test]
	fn test_shutdown_deactivates_context() {
		let app = app(Rc::new(MemoryShell::new()));
		app.shutdown();
		assert!(!app.context().is_active());
	}

	#[tokio::test]
	async fn test_listeners_ignored_after_shutdown() {
		let shell = Rc::new(MemoryShell::with_hash("#/dashboard"));
		let app = app(Rc::clone(&shell));
		let before = app.sidebar().state();
		app.shutdown();
		shell.set_hash("#/login");
		shell.set_viewport_width(500);
		shell.clear_events();

		let outcome = app.on_hash_change().await;
		let toggled = app.toggle_sidebar();

		assert!(matches!(outcome, NavigationOutcome::Inactive { .. }));
		assert_eq!(toggled.plan, RenderPlan::None);
		assert_eq!(app.on_resize(), None);
		assert_eq!(app.sidebar().state(), before);
		assert_eq!(app.context().storage().get_item("sidebarState").unwrap(), None);
		assert!(shell.events().is_empty());
		assert_eq!(shell.content_html(), "");
	}
}
