//! Applying mutation requests to the member set.

use crate::progress::{MutationEvent, ProgressReporter};
use crate::{Error, Result};

use super::collision::{CollisionPolicy, Resolution};
use super::members::MemberSet;
use super::operation::Operation;

/// Counts of the changes a plan made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    /// Members inserted by add requests, renamed ones included.
    pub added: usize,
    /// Members inserted or replaced by update requests.
    pub updated: usize,
    /// Added members stored under a suffixed name.
    pub renamed: usize,
    /// Added members left out after a collision.
    pub skipped: usize,
    /// Members removed by delete requests.
    pub deleted: usize,
}

/// Applies `operations` to `members` left to right.
///
/// Each request sees the effects of the ones before it. Every change is
/// reported to `reporter`, and cancellation is checked before each request.
///
/// # Errors
///
/// Stops at the first failing request: a source that cannot be read, a
/// collision under [`CollisionPolicy::Fail`], or cancellation. `members` may
/// then be partially modified; callers discard it.
pub fn plan(
    members: &mut MemberSet,
    operations: &[Operation],
    policy: &CollisionPolicy,
    reporter: &mut dyn ProgressReporter,
) -> Result<PlanSummary> {
    let mut summary = PlanSummary::default();

    for operation in operations {
        if reporter.should_cancel() {
            return Err(Error::Cancelled);
        }
        log::debug!("applying {} request", operation.operation_type());

        match operation {
            Operation::Add { source, recursive } => {
                for mut entry in source.collect(*recursive)? {
                    match policy.resolve(&entry.name, entry.is_dir(), members)? {
                        Resolution::Original => {}
                        Resolution::Renamed(new_name) => {
                            log::warn!("'{}' already exists, storing as '{}'", entry.name, new_name);
                            reporter.on_event(&MutationEvent::Renamed {
                                from: &entry.name,
                                to: &new_name,
                            });
                            entry.name = new_name;
                            summary.renamed += 1;
                        }
                        Resolution::Abandon => {
                            reporter.on_event(&MutationEvent::Skipped { name: &entry.name });
                            summary.skipped += 1;
                            continue;
                        }
                    }
                    reporter.on_event(&MutationEvent::Added {
                        name: &entry.name,
                        size: entry.size(),
                    });
                    members.insert(entry);
                    summary.added += 1;
                }
            }
            Operation::Update { source, recursive } => {
                for entry in source.collect(*recursive)? {
                    reporter.on_event(&MutationEvent::Updated {
                        name: &entry.name,
                        size: entry.size(),
                    });
                    members.insert(entry);
                    summary.updated += 1;
                }
            }
            Operation::Delete { pattern } => {
                let removed = members.remove_where(|name| pattern.matches(name));
                if removed.is_empty() {
                    log::debug!("pattern '{}' matched nothing", pattern);
                }
                for entry in &removed {
                    reporter.on_event(&MutationEvent::Deleted { name: &entry.name });
                }
                summary.deleted += removed.len();
            }
        }
    }

    Ok(summary)
}
