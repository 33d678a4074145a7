//! Progress reporting for archive mutations.
//!
//! Every change the planner makes to the member set is reported as a
//! [`MutationEvent`]. Events are emitted while the new member set is being
//! built, so they describe intended changes: if the final write fails the
//! archive on disk is unchanged even though events were delivered.
//!
//! # Example
//!
//! ```rust,no_run
//! use retar::edit::ArchiveEditor;
//! use retar::progress::progress_fn;
//!
//! let mut reporter = progress_fn(|event| eprintln!("{}", event));
//! let result = ArchiveEditor::open("site.tar.gz")
//!     .delete("cache/")?
//!     .apply(&mut reporter)?;
//! # Ok::<(), retar::Error>(())
//! ```

use std::fmt;

/// A single change to the member set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationEvent<'a> {
    /// A new member was appended.
    Added {
        /// Member name.
        name: &'a str,
        /// Content size in bytes.
        size: u64,
    },
    /// A member was inserted or replaced by an update.
    Updated {
        /// Member name.
        name: &'a str,
        /// Content size in bytes.
        size: u64,
    },
    /// An appended member collided and was stored under a new name.
    Renamed {
        /// Name the member was requested under.
        from: &'a str,
        /// Name it was stored under.
        to: &'a str,
    },
    /// An appended member collided and was left out.
    Skipped {
        /// Member name.
        name: &'a str,
    },
    /// A member was removed by a delete pattern.
    Deleted {
        /// Member name.
        name: &'a str,
    },
}

impl MutationEvent<'_> {
    /// Returns the member name the event is about.
    ///
    /// For renames this is the stored name.
    pub fn name(&self) -> &str {
        match self {
            Self::Added { name, .. }
            | Self::Updated { name, .. }
            | Self::Skipped { name }
            | Self::Deleted { name } => name,
            Self::Renamed { to, .. } => to,
        }
    }
}

impl fmt::Display for MutationEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { name, size } => write!(f, "Appended: {} ({} bytes)", name, size),
            Self::Updated { name, size } => {
                write!(f, "Added or updated: {} ({} bytes)", name, size)
            }
            Self::Renamed { to, .. } => write!(f, "Duplicated file renamed to: {}", to),
            Self::Skipped { name } => write!(f, "Skipping file: {}", name),
            Self::Deleted { name } => write!(f, "Deleted: {}", name),
        }
    }
}

/// Receives mutation events and may request cancellation.
///
/// All methods have no-op defaults.
pub trait ProgressReporter: Send {
    /// Called once for every change to the member set.
    fn on_event(&mut self, event: &MutationEvent<'_>) {
        let _ = event;
    }

    /// Called for conditions that do not stop the operation.
    fn on_warning(&mut self, message: &str) {
        let _ = message;
    }

    /// Checked between requests and before the archive is rewritten.
    ///
    /// Returning `true` aborts with [`Error::Cancelled`](crate::Error::Cancelled)
    /// and leaves the archive untouched.
    fn should_cancel(&self) -> bool {
        false
    }
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for &mut P {
    fn on_event(&mut self, event: &MutationEvent<'_>) {
        (**self).on_event(event);
    }

    fn on_warning(&mut self, message: &str) {
        (**self).on_warning(message);
    }

    fn should_cancel(&self) -> bool {
        (**self).should_cancel()
    }
}

/// A progress reporter that does nothing.
#[derive(Debug, Default, Clone)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// A progress reporter that records each event's display line.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    lines: Vec<String>,
    warnings: Vec<String>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded event lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns the recorded warnings in order.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl ProgressReporter for EventLog {
    fn on_event(&mut self, event: &MutationEvent<'_>) {
        self.lines.push(event.to_string());
    }

    fn on_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }
}

/// A progress reporter that calls a closure for each event.
pub struct ClosureProgress<F> {
    callback: F,
}

impl<F> ClosureProgress<F>
where
    F: FnMut(&MutationEvent<'_>) + Send,
{
    /// Creates a new closure-based reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgress<F>
where
    F: FnMut(&MutationEvent<'_>) + Send,
{
    fn on_event(&mut self, event: &MutationEvent<'_>) {
        (self.callback)(event);
    }
}

/// Creates a closure-based progress reporter.
pub fn progress_fn<F>(f: F) -> ClosureProgress<F>
where
    F: FnMut(&MutationEvent<'_>) + Send,
{
    ClosureProgress::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_messages() {
        let cases = [
            (
                MutationEvent::Added { name: "a.txt", size: 3 },
                "Appended: a.txt (3 bytes)",
            ),
            (
                MutationEvent::Updated { name: "b.txt", size: 0 },
                "Added or updated: b.txt (0 bytes)",
            ),
            (
                MutationEvent::Renamed { from: "r.txt", to: "r_1.txt" },
                "Duplicated file renamed to: r_1.txt",
            ),
            (MutationEvent::Skipped { name: "s" }, "Skipping file: s"),
            (MutationEvent::Deleted { name: "logs/x" }, "Deleted: logs/x"),
        ];
        for (event, expected) in cases {
            assert_eq!(event.to_string(), expected);
        }
    }

    #[test]
    fn test_event_name() {
        let event = MutationEvent::Renamed { from: "r.txt", to: "r_1.txt" };
        assert_eq!(event.name(), "r_1.txt");
    }

    #[test]
    fn test_no_progress() {
        let mut progress = NoProgress;
        progress.on_event(&MutationEvent::Deleted { name: "x" });
        assert!(!progress.should_cancel());
    }

    #[test]
    fn test_event_log() {
        let mut log = EventLog::new();
        log.on_event(&MutationEvent::Deleted { name: "x" });
        log.on_warning("careful");
        assert_eq!(log.lines(), ["Deleted: x"]);
        assert_eq!(log.warnings(), ["careful"]);
    }

    #[test]
    fn test_closure_progress_through_mut_ref() {
        fn deliver(mut reporter: impl ProgressReporter) {
            reporter.on_event(&MutationEvent::Skipped { name: "dup" });
        }

        let mut seen = Vec::new();
        {
            let mut progress = progress_fn(|e| seen.push(e.name().to_string()));
            deliver(&mut progress);
        }
        assert_eq!(seen, ["dup"]);
    }
}
