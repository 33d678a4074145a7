//! Member selection for delete and extract.

use std::fmt;

use glob::{MatchOptions, Pattern};

use crate::{Error, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled member pattern.
///
/// A name matches when the glob matches the whole name (wildcards never
/// cross `/`), or when the name lies below the pattern taken as a directory:
/// `logs/` and `logs` both select `logs/app.log`, but only `logs` selects a
/// member named exactly `logs`.
///
/// ```
/// use retar::edit::MemberPattern;
///
/// let pattern = MemberPattern::new("logs/")?;
/// assert!(pattern.matches("logs/app.log"));
/// assert!(pattern.matches("logs/"));
/// assert!(!pattern.matches("logs"));
/// assert!(!pattern.matches("logs-old/app.log"));
///
/// let glob = MemberPattern::new("*.tmp")?;
/// assert!(glob.matches("a.tmp"));
/// assert!(!glob.matches("cache/a.tmp"));
/// # Ok::<(), retar::Error>(())
/// ```
#[derive(Clone)]
pub struct MemberPattern {
    raw: String,
    glob: Pattern,
    subtree: String,
}

impl MemberPattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if the glob syntax is invalid.
    pub fn new(pattern: &str) -> Result<Self> {
        let glob = Pattern::new(pattern).map_err(|e| Error::Pattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        let root = pattern.trim_end_matches('/');
        Ok(Self {
            raw: pattern.to_string(),
            glob,
            subtree: format!("{}/", root),
        })
    }

    /// Returns the pattern as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if `name` is selected by this pattern.
    pub fn matches(&self, name: &str) -> bool {
        self.glob.matches_with(name, MATCH_OPTIONS) || name.starts_with(&self.subtree)
    }
}

impl fmt::Debug for MemberPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MemberPattern").field(&self.raw).finish()
    }
}

impl fmt::Display for MemberPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl TryFrom<&str> for MemberPattern {
    type Error = Error;

    fn try_from(pattern: &str) -> Result<Self> {
        Self::new(pattern)
    }
}

/// Returns true if any of `patterns` selects `name`.
///
/// An empty pattern list selects everything.
pub fn matches_any(patterns: &[MemberPattern], name: &str) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| p.matches(name))
}
