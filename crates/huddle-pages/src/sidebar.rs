//! Three-state navigation sidebar.
//!
//! The sidebar cycles `expanded → icon → collapsed → expanded`. The state is
//! kept in memory, written to durable storage on every change, and then
//! re-rendered:
//!
//! - entering or leaving `collapsed` rebuilds the sidebar, since the nav list
//!   only exists outside `collapsed`
//! - switching between `expanded` and `icon` only toggles label visibility
//!
//! Narrowing the viewport forces a compliant state: `collapsed` below the
//! mobile breakpoint, `icon` below the tablet breakpoint when `expanded`.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::component::{IntoView, View};
use crate::context::AppContext;
use crate::dom::MountError;
use crate::{debug_log, info_log, warn_log};

/// Display state of the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarState {
	/// Icons and labels.
	Expanded,
	/// Icons only.
	#[default]
	Icon,
	/// Hidden.
	Collapsed,
}

impl SidebarState {
	/// Every state, in cycle order.
	pub const ALL: [SidebarState; 3] = [SidebarState::Expanded, SidebarState::Icon, SidebarState::Collapsed];

	/// Stored and displayed name.
	pub fn as_str(self) -> &'static str {
		match self {
			SidebarState::Expanded => "expanded",
			SidebarState::Icon => "icon",
			SidebarState::Collapsed => "collapsed",
		}
	}

	/// Next state in the cycle.
	pub fn next(self) -> Self {
		match self {
			SidebarState::Expanded => SidebarState::Icon,
			SidebarState::Icon => SidebarState::Collapsed,
			SidebarState::Collapsed => SidebarState::Expanded,
		}
	}

	/// Whether nav labels are shown.
	pub fn labels_visible(self) -> bool {
		self == SidebarState::Expanded
	}

	/// Class set on the layout for this state.
	pub fn layout_class(self) -> &'static str {
		match self {
			SidebarState::Expanded => "sidebar-expanded",
			SidebarState::Icon => "sidebar-icon",
			SidebarState::Collapsed => "sidebar-collapsed",
		}
	}
}

impl fmt::Display for SidebarState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A string that names no sidebar state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid sidebar state: {0:?}")]
pub struct InvalidSidebarState(pub String);

impl FromStr for SidebarState {
	type Err = InvalidSidebarState;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"expanded" => Ok(SidebarState::Expanded),
			"icon" => Ok(SidebarState::Icon),
			"collapsed" => Ok(SidebarState::Collapsed),
			other => Err(InvalidSidebarState(other.to_string())),
		}
	}
}

/// Size class of the viewport. Ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ViewportClass {
	/// Below the mobile breakpoint.
	Mobile,
	/// Below the tablet breakpoint.
	Tablet,
	/// Anything wider.
	Desktop,
}

impl ViewportClass {
	/// Classifies `width` against the breakpoints.
	pub fn classify(width: u32, mobile_breakpoint: u32, tablet_breakpoint: u32) -> Self {
		if width < mobile_breakpoint {
			ViewportClass::Mobile
		} else if width < tablet_breakpoint {
			ViewportClass::Tablet
		} else {
			ViewportClass::Desktop
		}
	}
}

/// Re-render needed by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPlan {
	/// Rebuild the sidebar.
	Full,
	/// Only toggle label visibility.
	ToggleLabels,
	/// Nothing changed on screen.
	None,
}

impl RenderPlan {
	/// Plan for moving from `from` to `to`.
	pub fn between(from: SidebarState, to: SidebarState) -> Self {
		if from == to {
			RenderPlan::None
		} else if from == SidebarState::Collapsed || to == SidebarState::Collapsed {
			RenderPlan::Full
		} else {
			RenderPlan::ToggleLabels
		}
	}
}

/// A state change and how it was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarTransition {
	/// State before.
	pub from: SidebarState,
	/// State after.
	pub to: SidebarState,
	/// Re-render applied.
	pub plan: RenderPlan,
}

/// One sidebar link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
	/// Route base the link points to.
	pub route: &'static str,
	/// Visible label.
	pub label: &'static str,
	/// Icon name.
	pub icon: &'static str,
}

/// Links shown in the sidebar.
pub const NAV_ITEMS: &[NavItem] = &[
	NavItem { route: "dashboard", label: "Dashboard", icon: "home" },
	NavItem { route: "roster", label: "Roster", icon: "users" },
	NavItem { route: "playbook", label: "Playbook", icon: "clipboard" },
	NavItem { route: "schedule", label: "Schedule", icon: "calendar" },
	NavItem { route: "settings", label: "Settings", icon: "settings" },
];

/// The sidebar bound to an application context.
pub struct Sidebar {
	ctx: Rc<AppContext>,
	state: Cell<SidebarState>,
	viewport: Cell<Option<ViewportClass>>,
}

impl fmt::Debug for Sidebar {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Sidebar")
			.field("state", &self.state.get())
			.field("viewport", &self.viewport.get())
			.finish_non_exhaustive()
	}
}

impl Sidebar {
	/// Restores the persisted state, or the default when it is missing or
	/// invalid. Nothing is rendered yet.
	pub fn load(ctx: Rc<AppContext>) -> Self {
		let key = &ctx.settings().sidebar.storage_key;
		let state = match ctx.storage().get_item(key) {
			Ok(Some(raw)) => raw.parse::<SidebarState>().unwrap_or_else(|err| {
				warn_log!("{}; using default", err);
				SidebarState::default()
			}),
			Ok(None) => SidebarState::default(),
			Err(err) => {
				warn_log!("Failed to read sidebar state: {}", err);
				SidebarState::default()
			}
		};
		debug_log!("Sidebar state restored: {}", state);

		Self {
			ctx,
			state: Cell::new(state),
			viewport: Cell::new(None),
		}
	}

	/// Current state.
	pub fn state(&self) -> SidebarState {
		self.state.get()
	}

	/// Advances to the next state in the cycle.
	pub fn cycle(&self) -> SidebarTransition {
		self.set(self.state().next())
	}

	/// Sets a state given by name. An unknown name is logged and ignored.
	pub fn force_state(&self, raw: &str) -> Option<SidebarTransition> {
		match raw.parse::<SidebarState>() {
			Ok(state) => Some(self.set(state)),
			Err(err) => {
				warn_log!("{}", err);
				None
			}
		}
	}

	/// Sets `state`, persists it, and re-renders what changed.
	///
	/// After [`AppContext::teardown`] the request is ignored and the
	/// returned transition has [`RenderPlan::None`].
	pub fn set(&self, state: SidebarState) -> SidebarTransition {
		if !self.ctx.is_active() {
			debug_log!("Ignoring sidebar state {} after shutdown", state);
			return self.unchanged();
		}
		let from = self.state.replace(state);
		self.persist(state);

		let plan = RenderPlan::between(from, state);
		match plan {
			RenderPlan::Full => {
				if let Err(err) = self.render() {
					warn_log!("Failed to render sidebar: {}", err);
				}
			}
			RenderPlan::ToggleLabels => self.apply_layout(),
			RenderPlan::None => {}
		}
		info_log!("Sidebar state: {} -> {}", from, state);

		SidebarTransition { from, to: state, plan }
	}

	/// Reacts to a viewport width change.
	///
	/// Acts only when the width crosses into a narrower class than last seen
	/// (or on the first observation), and only when the current state does
	/// not already fit.
	pub fn on_resize(&self, width: u32) -> Option<SidebarTransition> {
		let settings = &self.ctx.settings().sidebar;
		let class = ViewportClass::classify(width, settings.mobile_breakpoint, settings.tablet_breakpoint);
		let previous = self.viewport.replace(Some(class));
		if !previous.is_none_or(|p| class < p) {
			return None;
		}

		match (class, self.state()) {
			(ViewportClass::Mobile, state) if state != SidebarState::Collapsed => {
				Some(self.set(SidebarState::Collapsed))
			}
			(ViewportClass::Tablet, SidebarState::Expanded) => Some(self.set(SidebarState::Icon)),
			_ => None,
		}
	}

	/// Returns to the default state and forgets the persisted value.
	pub fn reset(&self) -> SidebarTransition {
		if !self.ctx.is_active() {
			return self.unchanged();
		}
		let default = SidebarState::default();
		let from = self.state.replace(default);
		if let Err(err) = self
			.ctx
			.storage()
			.remove_item(&self.ctx.settings().sidebar.storage_key)
		{
			warn_log!("Failed to clear sidebar state: {}", err);
		}
		if let Err(err) = self.render() {
			warn_log!("Failed to render sidebar: {}", err);
		}
		SidebarTransition {
			from,
			to: default,
			plan: RenderPlan::Full,
		}
	}

	/// Rebuilds the sidebar for the current state.
	pub fn render(&self) -> Result<(), MountError> {
		self.ctx.shell().mount_sidebar(&Self::view(self.state()))?;
		self.apply_layout();
		Ok(())
	}

	/// Markup for `state`. `collapsed` keeps only the toggle button.
	pub fn view(state: SidebarState) -> View {
		let toggle = View::element("button")
			.class("sidebar-toggle")
			.attr("type", "button")
			.attr("aria-label", "Toggle sidebar");

		let nav = (state != SidebarState::Collapsed).then(|| {
			View::element("ul").class("sidebar-nav").children(NAV_ITEMS.iter().map(|item| {
				let mut label = View::element("span").class("sidebar-label").child(item.label);
				if !state.labels_visible() {
					label = label.attr("hidden", "");
				}
				View::element("li").child(
					View::element("a")
						.class("sidebar-link")
						.attr("href", format!("#/{}", item.route))
						.attr("title", item.label)
						.child(
							View::element("span")
								.class("sidebar-icon")
								.attr("data-icon", item.icon),
						)
						.child(label),
				)
			}))
		});

		View::element("nav")
			.class(format!("sidebar {}", state.layout_class()))
			.attr("data-state", state.as_str())
			.child(toggle)
			.child(nav)
			.into_view()
	}

	fn apply_layout(&self) {
		let shell = self.ctx.shell();
		let state = self.state();
		for candidate in SidebarState::ALL {
			shell.set_layout_class(candidate.layout_class(), candidate == state);
		}
		shell.set_sidebar_labels_visible(state.labels_visible());
	}

	fn unchanged(&self) -> SidebarTransition {
		let state = self.state();
		SidebarTransition {
			from: state,
			to: state,
			plan: RenderPlan::None,
		}
	}

	fn persist(&self, state: SidebarState) {
		let key = &self.ctx.settings().sidebar.storage_key;
		if let Err(err) = self.ctx.storage().set_item(key, state.as_str()) {
			warn_log!("Failed to persist sidebar state: {}", err);
		}
	}
}
