use core::fmt::{Debug, Formatter};
use core::sync::atomic::{AtomicBool, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;

/// Refresh rate for progress updates (10 Hz).
const REFRESH_INTERVAL_MS: u64 = 100;

const TEMPLATE: &str = "{prefix:>12.bold.cyan} {spinner} {elapsed} {msg}";
const TEMPLATE_NO_COLOR: &str = "{prefix:>12} {spinner} {elapsed} {msg}";

struct DelayedProgressState {
    visible_after: Instant,
    visible: AtomicBool,
}

impl Debug for DelayedProgressState {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DelayedProgressState")
            .field("visible_after", &self.visible_after)
            .field("visible", &self.visible)
            .finish()
    }
}

/// A spinner on stderr that stays hidden until remote calls take longer than a threshold.
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
    state: Arc<DelayedProgressState>,
    reveal_task: Option<Arc<JoinHandle<()>>>,
}

impl ProgressReporter {
    /// Create a progress reporter that shows itself once `delay` has passed.
    ///
    /// When `enabled` is false (stderr is not a terminal, or logging is on) nothing is ever drawn.
    #[must_use]
    pub fn new(delay: Duration, enabled: bool, use_colors: bool) -> Self {
        let bar = ProgressBar::hidden();
        let template = if use_colors { TEMPLATE } else { TEMPLATE_NO_COLOR };
        if let Ok(style) = ProgressStyle::default_spinner().template(template) {
            bar.set_style(style);
        }

        let state = Arc::new(DelayedProgressState {
            visible_after: Instant::now() + delay,
            visible: AtomicBool::new(false),
        });

        let reveal_task = enabled.then(|| Arc::new(tokio::spawn(reveal_task(bar.clone(), Arc::clone(&state)))));

        Self { bar, state, reveal_task }
    }

    /// A reporter that never draws anything.
    #[cfg(test)]
    #[must_use]
    pub fn hidden() -> Self {
        Self::new(Duration::ZERO, false, false)
    }

    /// Set the label in front of the spinner (e.g., "Searching", "Fetching").
    pub fn set_phase(&self, phase: &str) {
        self.bar.set_prefix(phase.to_string());
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    /// Print a message line without disrupting the spinner.
    pub fn println(&self, msg: &str) {
        self.bar.suspend(|| eprintln!("{msg}"));
    }

    /// Finish and clear the spinner.
    pub fn done(&self) {
        if let Some(task) = &self.reveal_task {
            task.abort();
        }

        if self.state.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state.visible.load(Ordering::Relaxed)
    }
}

impl Debug for ProgressReporter {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("bar", &self.bar)
            .field("state", &self.state)
            .field("reveal_task", &"<task>")
            .finish()
    }
}

/// Background task that attaches the spinner to stderr once the delay has passed.
async fn reveal_task(bar: ProgressBar, state: Arc<DelayedProgressState>) {
    let now = Instant::now();
    if state.visible_after > now {
        tokio::time::sleep(state.visible_after - now).await;
    }

    state.visible.store(true, Ordering::Relaxed);
    bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
    bar.enable_steady_tick(Duration::from_millis(REFRESH_INTERVAL_MS));
}
