//! Name collision handling for appended members.
//!
//! A proposed name collides with the archive when a member of that exact
//! name exists, or when an earlier rename left a member named
//! `base_<n><ext>` behind. So once `report.txt` has been renamed to
//! `report_1.txt`, both names count as taken for the next append.

use std::fmt;
use std::sync::Arc;

use crate::archive_path::split_extension;
use crate::{Error, Result};

use super::members::MemberSet;

/// Decides whether a colliding member should be kept under a new name.
pub trait CollisionPrompt: Send + Sync {
    /// Returns true to store `name` under a suffixed name, false to skip it.
    fn confirm(&self, name: &str) -> bool;
}

impl<F> CollisionPrompt for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, name: &str) -> bool {
        self(name)
    }
}

/// What to do when an appended member collides with an existing one.
#[derive(Clone, Default)]
pub enum CollisionPolicy {
    /// Store the new member under the first free `name_<n>.ext`.
    #[default]
    Rename,
    /// Leave the new member out.
    Skip,
    /// Abort the whole operation with [`Error::EntryExists`].
    Fail,
    /// Ask the prompt once per collision.
    Ask(Arc<dyn CollisionPrompt>),
}

impl CollisionPolicy {
    /// Wraps a prompt into [`CollisionPolicy::Ask`].
    pub fn ask(prompt: impl CollisionPrompt + 'static) -> Self {
        Self::Ask(Arc::new(prompt))
    }

    /// Resolves a proposed name against the current members.
    ///
    /// Directories never collide; pass `is_dir` to exempt them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntryExists`] under [`CollisionPolicy::Fail`].
    pub fn resolve(&self, name: &str, is_dir: bool, members: &MemberSet) -> Result<Resolution> {
        if is_dir || !collides(members, name) {
            return Ok(Resolution::Original);
        }
        let accept = match self {
            Self::Rename => true,
            Self::Skip => false,
            Self::Fail => {
                return Err(Error::EntryExists {
                    path: name.to_string(),
                });
            }
            Self::Ask(prompt) => prompt.confirm(name),
        };
        if accept {
            Ok(Resolution::Renamed(next_free_name(members, name)))
        } else {
            Ok(Resolution::Abandon)
        }
    }
}

impl fmt::Debug for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rename => f.write_str("Rename"),
            Self::Skip => f.write_str("Skip"),
            Self::Fail => f.write_str("Fail"),
            Self::Ask(_) => f.write_str("Ask(..)"),
        }
    }
}

/// Outcome of collision resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Use the proposed name.
    Original,
    /// Use this suffixed name instead.
    Renamed(String),
    /// Do not add the member.
    Abandon,
}

/// Returns true if `name` collides with a member of `members`.
pub fn collides(members: &MemberSet, name: &str) -> bool {
    if members.contains(name) {
        return true;
    }
    let (base, ext) = split_extension(name);
    members.names().any(|existing| is_suffixed_variant(existing, base, ext))
}

/// Returns the first `base_<n><ext>`, counting from 1, that does not
/// collide.
pub fn next_free_name(members: &MemberSet, name: &str) -> String {
    let (base, ext) = split_extension(name);
    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{}_{}{}", base, counter, ext);
        if !collides(members, &candidate) {
            return candidate;
        }
        counter += 1;
    }
}

fn is_suffixed_variant(existing: &str, base: &str, ext: &str) -> bool {
    existing
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix(ext))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
