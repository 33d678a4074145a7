//! Expansion of command line input arguments.

use std::fmt;
use std::path::PathBuf;

/// Error type for input expansion
#[derive(Debug)]
pub enum InputError {
    /// The argument is not a valid glob pattern
    Pattern(String, glob::PatternError),
    /// A glob pattern matched nothing
    NoMatch(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pattern(arg, e) => write!(f, "Invalid glob pattern '{}': {}", arg, e),
            Self::NoMatch(arg) => write!(f, "No files match '{}'", arg),
        }
    }
}

impl std::error::Error for InputError {}

/// Expands glob metacharacters in input arguments.
///
/// Arguments without metacharacters are passed through unchanged so a
/// missing file is reported by the library with its path. Matches of one
/// pattern are kept in sorted order.
pub fn expand_inputs(args: &[String]) -> Result<Vec<PathBuf>, InputError> {
    let mut paths = Vec::new();
    for arg in args {
        if !has_glob_meta(arg) {
            paths.push(PathBuf::from(arg));
            continue;
        }

        let walker = glob::glob(arg).map_err(|e| InputError::Pattern(arg.clone(), e))?;
        let mut matched: Vec<PathBuf> = walker
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    log::warn!("skipping unreadable match for '{}': {}", arg, e);
                    None
                }
            })
            .collect();
        if matched.is_empty() {
            return Err(InputError::NoMatch(arg.clone()));
        }
        matched.sort();
        paths.extend(matched);
    }
    Ok(paths)
}

fn has_glob_meta(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}
