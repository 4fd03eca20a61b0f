//! Integration tests for hash navigation
//!
//! These tests drive the [`Navigator`] end to end against a `MemoryShell`:
//! 1. Guard redirects happen before any page code is loaded
//! 2. Unknown routes and broken pages end on the not-found page
//! 3. Content swaps clear overlays, focus the region, and reset scroll
//! 4. Fade classes wrap the swap in order
//! 5. Overlapping navigations: only the latest one renders

use std::cell::Cell;
use std::rc::Rc;

use huddle_conf::Settings;
use huddle_pages::auth::{Session, User};
use huddle_pages::component::{IntoView, View};
use huddle_pages::context::AppContext;
use huddle_pages::dom::{MemoryShell, OverlayKind, Shell, ShellEvent};
use huddle_pages::router::{
	ModulePath, NavigationOutcome, Navigator, PageError, PageModule, PageRegistry, PageRegistryBuilder,
	Route, RouteGuard, GuardAction,
};
use huddle_pages::storage::MemoryStorage;
use huddle_pages::testing::{InstantTimer, YieldTimer};
use rstest::rstest;

fn text_page(name: &'static str) -> PageModule {
	PageModule::render(name, move |params| {
		Ok(View::element("h1")
			.class("page-title")
			.child(format!("{} {}", name, params.full()))
			.into_view())
	})
}

fn base_registry() -> PageRegistryBuilder {
	PageRegistry::builder()
		.index("dashboard", text_page("dashboard"))
		.index("login", text_page("login"))
		.index("playbook", text_page("playbook"))
		.page("playbook", "edit", text_page("playbook-edit"))
		.not_found(PageModule::render("404", |_| Ok(View::text("404 Not Found"))))
}

struct Harness {
	navigator: Navigator,
	shell: Rc<MemoryShell>,
	ctx: Rc<AppContext>,
}

fn harness(registry: PageRegistry, logged_in: bool) -> Harness {
	let shell = Rc::new(MemoryShell::new());
	let ctx = AppContext::init(
		Settings::default(),
		Rc::new(MemoryStorage::new()),
		shell.clone(),
	);
	if logged_in {
		ctx.set_session(Some(Session::new("token", User::new("u-1", Some("coach@example.com")))));
	}
	let navigator = Navigator::new(Rc::clone(&ctx), registry, Rc::new(InstantTimer::new()));
	Harness {
		navigator,
		shell,
		ctx,
	}
}

/// Unknown route while signed in shows the not-found page
#[tokio::test]
async fn test_unknown_route_renders_not_found() {
	let h = harness(base_registry().build().unwrap(), true);

	let outcome = h.navigator.navigate("#/nonexistent-page").await;

	match outcome {
		NavigationOutcome::Rendered { module, not_found, .. } => {
			assert!(not_found);
			assert_eq!(module, Some(ModulePath::index("404")));
		}
		other => panic!("unexpected outcome: {:?}", other),
	}
	assert!(h.shell.content_html().contains("404 Not Found"));
}

/// Protected route while signed out redirects to login
#[tokio::test]
async fn test_protected_route_redirects_to_login() {
	let h = harness(base_registry().build().unwrap(), false);

	let outcome = h.navigator.navigate("#/dashboard").await;

	assert!(matches!(outcome, NavigationOutcome::Redirected { ref to, .. } if to == "#/login"));
	assert_eq!(h.shell.hash(), "#/login");
	assert!(h.shell.content().is_none());
}

/// Public route while signed in redirects to the default route
#[tokio::test]
async fn test_public_route_redirects_signed_in_user() {
	let h = harness(base_registry().build().unwrap(), true);

	h.navigator.navigate("#/login").await;

	assert_eq!(h.shell.hash(), "#/dashboard");
}

/// The guard runs before the resolver: protected code is never loaded
#[tokio::test]
async fn test_protected_page_not_loaded_when_signed_out() {
	let loads = Rc::new(Cell::new(0));
	let counter = Rc::clone(&loads);
	let registry = base_registry()
		.loader("pages/roster/index", move || {
			counter.set(counter.get() + 1);
			std::future::ready(Ok(text_page("roster")))
		})
		.build()
		.unwrap();
	let h = harness(registry, false);

	h.navigator.navigate("#/roster").await;
	assert_eq!(loads.get(), 0);

	h.ctx.set_session(Some(Session::new("token", User::new("u-1", None))));
	h.navigator.navigate("#/roster").await;
	h.navigator.navigate("#/roster").await;
	assert_eq!(loads.get(), 1);
}

#[rstest]
#[case("#/playbook/edit", "playbook-edit playbook/edit")]
#[case("#/playbook/view", "playbook playbook/view")]
#[case("#/PLAYBOOK", "playbook PLAYBOOK")]
#[case("#/", "dashboard dashboard")]
#[case("", "dashboard dashboard")]
#[tokio::test]
async fn test_resolution_priority(#[case] hash: &str, #[case] expected: &str) {
	let h = harness(base_registry().build().unwrap(), true);

	h.navigator.navigate(hash).await;

	let content = h.shell.content().unwrap();
	assert_eq!(content.find_by_class("page-title").len(), 1);
	assert!(content.text_content().contains(expected));
}

/// Load failures, missing entries, and render errors all fall back to 404
#[rstest]
#[case::load_failure(PageRegistry::builder().loader("pages/stats/index", || {
	std::future::ready(Err(PageError::load("pages/stats/index", "chunk missing")))
}))]
#[case::missing_entry(PageRegistry::builder().index("stats", PageModule::without_entry("stats")))]
#[case::render_error(PageRegistry::builder().index("stats", PageModule::render("stats", |_| {
	Err(PageError::render("stats", "no data"))
})))]
#[tokio::test]
async fn test_page_failures_fall_back(#[case] builder: PageRegistryBuilder) {
	let registry = builder
		.not_found(PageModule::render("404", |_| Ok(View::text("404 Not Found"))))
		.build()
		.unwrap();
	let h = harness(registry, true);

	let outcome = h.navigator.navigate("#/stats").await;

	assert!(matches!(outcome, NavigationOutcome::Rendered { not_found: true, .. }));
	assert!(h.shell.content_html().contains("404 Not Found"));
}

/// A broken not-found page still leaves the built-in view on screen
#[tokio::test]
async fn test_broken_not_found_page_uses_builtin() {
	let registry = PageRegistry::builder()
		.not_found(PageModule::without_entry("404"))
		.build()
		.unwrap();
	let h = harness(registry, true);

	let outcome = h.navigator.navigate("#/anything").await;

	assert!(matches!(
		outcome,
		NavigationOutcome::Rendered { module: None, not_found: true, .. }
	));
	assert!(h.shell.content_html().contains("Page not found"));
}

/// Legacy container pages render like view pages
#[tokio::test]
async fn test_legacy_container_page() {
	let registry = PageRegistry::builder()
		.index(
			"schedule",
			PageModule::legacy("schedule", |container, params| {
				container
					.add_class("legacy-schedule")
					.append(View::element("p").child(format!("week {}", params.query("week").unwrap_or("1"))));
				Ok(())
			}),
		)
		.build()
		.unwrap();
	let h = harness(registry, true);

	h.navigator.navigate("#/schedule?week=7").await;

	let html = h.shell.content_html();
	assert!(html.contains("<div class=\"legacy-schedule\"><p>week 7</p></div>"));
	assert!(html.starts_with("<div class=\"page-layout\" data-route=\"schedule\">"));
}

/// Overlays close before the swap; focus and scroll follow it
#[tokio::test]
async fn test_swap_sequence() {
	let h = harness(base_registry().build().unwrap(), true);
	for kind in OverlayKind::ALL {
		h.shell.show_overlay(kind, &View::text("open"));
	}

	h.navigator.navigate("#/dashboard").await;

	let events: Vec<ShellEvent> = h
		.shell
		.events()
		.into_iter()
		.filter(|e| !matches!(e, ShellEvent::AddContentClass(_) | ShellEvent::RemoveContentClass(_)))
		.collect();
	assert!(matches!(
		events.as_slice(),
		[
			ShellEvent::ClearOverlays(3),
			ShellEvent::MountContent(_),
			ShellEvent::FocusContent,
			ShellEvent::ResetScroll,
		]
	));
	assert!(h.shell.overlays().is_empty());
}

/// Fade-out precedes the swap, fade-in follows it, and no fade class remains
#[tokio::test]
async fn test_fade_classes_wrap_swap() {
	let h = harness(base_registry().build().unwrap(), true);

	h.navigator.navigate("#/dashboard").await;

	let events = h.shell.events();
	let index = |target: &ShellEvent| events.iter().position(|e| e == target).unwrap();
	let fade_out = index(&ShellEvent::AddContentClass("page-fade-out".into()));
	let mount = events
		.iter()
		.position(|e| matches!(e, ShellEvent::MountContent(_)))
		.unwrap();
	let fade_in = index(&ShellEvent::AddContentClass("page-fade-in".into()));
	assert!(fade_out < mount && mount < fade_in);
	assert!(h.shell.content_classes().is_empty());
}

/// Without a content region navigation completes and touches nothing
#[tokio::test]
async fn test_missing_content_region() {
	let shell = Rc::new(MemoryShell::new().without_content_region());
	let ctx = AppContext::init(Settings::default(), Rc::new(MemoryStorage::new()), shell.clone());
	ctx.set_session(Some(Session::new("token", User::new("u-1", None))));
	let navigator = Navigator::new(ctx, base_registry().build().unwrap(), Rc::new(InstantTimer::new()));

	let outcome = navigator.navigate("#/dashboard").await;

	assert!(matches!(outcome, NavigationOutcome::Rendered { not_found: false, .. }));
	assert!(shell.content().is_none());
}

/// Two overlapping navigations: the first is superseded, the second renders
#[tokio::test]
async fn test_rapid_navigation_last_wins() {
	let shell = Rc::new(MemoryShell::new());
	let ctx = AppContext::init(Settings::default(), Rc::new(MemoryStorage::new()), shell.clone());
	ctx.set_session(Some(Session::new("token", User::new("u-1", None))));
	let navigator = Navigator::new(ctx, base_registry().build().unwrap(), Rc::new(YieldTimer::new()));

	let (first, second) = futures::join!(
		navigator.navigate("#/dashboard"),
		navigator.navigate("#/playbook/edit"),
	);

	assert!(matches!(first, NavigationOutcome::Superseded { .. }));
	assert!(matches!(second, NavigationOutcome::Rendered { not_found: false, .. }));
	assert_eq!(shell.count_events(|e| matches!(e, ShellEvent::MountContent(_))), 1);
	assert!(shell.content_html().contains("playbook-edit"));
	assert_eq!(navigator.current_route().unwrap().full(), "playbook/edit");
}

/// Resolution is a pure lookup
#[rstest]
#[case("#/playbook/edit")]
#[case("#/Playbook/Unknown")]
#[case("#/missing")]
fn test_resolver_idempotent(#[case] hash: &str) {
	let registry = base_registry().build().unwrap();
	let route = Route::parse(hash, "dashboard");

	let first = registry.resolve(&route);
	let second = registry.resolve(&route);

	assert_eq!(first, second);
	if let Some(path) = first {
		assert!(!registry.is_loaded(&path));
	}
}

#[rstest]
#[case(false, true, GuardAction::RedirectToLogin)]
#[case(true, false, GuardAction::RedirectToDefault)]
#[case(true, true, GuardAction::Allow)]
#[case(false, false, GuardAction::Allow)]
fn test_guard_truth_table(#[case] logged_in: bool, #[case] protected: bool, #[case] expected: GuardAction) {
	let guard = RouteGuard::from_settings(&Settings::default().routing);
	let hash = if protected { "#/roster" } else { "#/signup" };
	let route = Route::parse(hash, "dashboard");

	assert_eq!(guard.is_protected(&route), protected);
	assert_eq!(guard.decide(logged_in, &route), expected);
}
