//! Fade transitions on the content region.

use std::rc::Rc;
use std::time::Duration;

use futures_util::future::LocalBoxFuture;
use huddle_conf::TransitionSettings;

use crate::dom::Shell;

/// Source of delays.
///
/// Transitions wait on this rather than on a runtime directly, so tests can
/// substitute a timer that resolves immediately.
pub trait Timer {
	/// Completes after `duration`.
	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Timer backed by the tokio runtime.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(not(target_arch = "wasm32"))]
impl Timer for TokioTimer {
	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
		Box::pin(tokio::time::sleep(duration))
	}
}

/// Timer backed by `setTimeout`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimer;

#[cfg(target_arch = "wasm32")]
impl Timer for BrowserTimer {
	fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
		Box::pin(gloo_timers::future::sleep(duration))
	}
}

/// The platform's timer.
pub fn default_timer() -> Rc<dyn Timer> {
	#[cfg(target_arch = "wasm32")]
	{
		Rc::new(BrowserTimer)
	}
	#[cfg(not(target_arch = "wasm32"))]
	{
		Rc::new(TokioTimer)
	}
}

/// Adds and removes the fade classes around a content swap.
///
/// Both fades are no-ops when the shell has no content region.
pub struct TransitionController {
	duration: Duration,
	fade_out_class: String,
	fade_in_class: String,
	timer: Rc<dyn Timer>,
}

impl std::fmt::Debug for TransitionController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TransitionController")
			.field("duration", &self.duration)
			.field("fade_out_class", &self.fade_out_class)
			.field("fade_in_class", &self.fade_in_class)
			.finish_non_exhaustive()
	}
}

impl TransitionController {
	/// Controller using the configured classes and duration.
	pub fn new(settings: &TransitionSettings, timer: Rc<dyn Timer>) -> Self {
		Self {
			duration: Duration::from_millis(settings.fade_duration_ms),
			fade_out_class: settings.fade_out_class.clone(),
			fade_in_class: settings.fade_in_class.clone(),
			timer,
		}
	}

	/// Length of each fade.
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Starts the fade-out and waits for it to finish.
	pub async fn fade_out(&self, shell: &dyn Shell) {
		if !shell.has_content_region() {
			return;
		}
		shell.remove_content_class(&self.fade_in_class);
		shell.add_content_class(&self.fade_out_class);
		self.timer.sleep(self.duration).await;
	}

	/// Replaces the fade-out with a fade-in, then clears the fade-in once it
	/// has played.
	pub async fn fade_in(&self, shell: &dyn Shell) {
		if !shell.has_content_region() {
			return;
		}
		shell.remove_content_class(&self.fade_out_class);
		shell.add_content_class(&self.fade_in_class);
		self.timer.sleep(self.duration).await;
		shell.remove_content_class(&self.fade_in_class);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::dom::{MemoryShell, ShellEvent};
	use crate::testing::InstantTimer;

	fn controller(timer: Rc<InstantTimer>) -> TransitionController {
		TransitionController::new(&TransitionSettings::default(), timer)
	}

	#[tokio::test]
	async fn test_fade_out_leaves_class_applied() {
		let shell = MemoryShell::new();
		let timer = Rc::new(InstantTimer::new());

		controller(Rc::clone(&timer)).fade_out(&shell).await;

		assert_eq!(shell.content_classes(), vec!["page-fade-out".to_string()]);
		assert_eq!(timer.sleeps(), vec![Duration::from_millis(300)]);
	}

	#[tokio::test]
	async fn test_fade_in_swaps_and_clears() {
		let shell = MemoryShell::new();
		let controller = controller(Rc::new(InstantTimer::new()));

		controller.fade_out(&shell).await;
		controller.fade_in(&shell).await;

		assert!(shell.content_classes().is_empty());
		assert_eq!(
			shell.count_events(|e| matches!(e, ShellEvent::AddContentClass(c) if c == "page-fade-in")),
			1
		);
	}

	#[tokio::test]
	async fn test_no_content_region_is_noop() {
		let shell = MemoryShell::new().without_content_region();
		let timer = Rc::new(InstantTimer::new());
		let controller = controller(Rc::clone(&timer));

		controller.fade_out(&shell).await;
		controller.fade_in(&shell).await;

		assert!(shell.events().is_empty());
		assert!(timer.sleeps().is_empty());
	}

	#[tokio::test]
	async fn test_tokio_timer_waits_for_duration() {
		let start = std::time::Instant::now();
		TokioTimer.sleep(Duration::from_millis(5)).await;
		assert!(start.elapsed() >= Duration::from_millis(5));
	}
}
