//! Progress display for CLI operations.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use retar::progress::{MutationEvent, ProgressReporter};

/// Spinner on stderr that logs every mutation event above itself.
///
/// Cancellation follows the shared flag set by the Ctrl-C handler.
pub struct CliProgress {
    bar: ProgressBar,
    quiet: bool,
    cancel: Arc<AtomicBool>,
}

impl CliProgress {
    /// Creates a progress display.
    ///
    /// With `interactive` the spinner does not tick on its own, so it does
    /// not redraw over a collision prompt.
    pub fn new(quiet: bool, interactive: bool, cancel: Arc<AtomicBool>) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {pos} changes {wide_msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            if !interactive {
                pb.enable_steady_tick(Duration::from_millis(100));
            }
            pb
        };

        Self {
            bar,
            quiet,
            cancel,
        }
    }

    /// Sets the message next to the spinner
    pub fn set_message(&self, msg: impl Into<String>) {
        if !self.quiet {
            self.bar.set_message(msg.into());
        }
    }

    /// Removes the spinner
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Leaves the spinner with a final message
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.bar.abandon_with_message(msg.into());
    }
}

impl ProgressReporter for CliProgress {
    fn on_event(&mut self, event: &MutationEvent<'_>) {
        if self.quiet {
            return;
        }
        self.bar.suspend(|| eprintln!("{}", event));
        self.bar.set_message(truncate_name(event.name()));
        self.bar.inc(1);
    }

    fn on_warning(&mut self, message: &str) {
        if !self.quiet {
            self.bar.suspend(|| eprintln!("{} {}", style("Warning:").for_stderr().yellow(), message));
        }
    }

    fn should_cancel(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }
}

fn truncate_name(name: &str) -> String {
    let count = name.chars().count();
    if count > 40 {
        let tail: String = name.chars().skip(count - 37).collect();
        format!("...{}", tail)
    } else {
        name.to_string()
    }
}
