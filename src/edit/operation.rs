//! Archive mutation requests.

use super::pattern::MemberPattern;
use super::source::EntrySource;
use crate::Result;

/// A pending mutation of an archive.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Add members, resolving name collisions with the collision policy.
    Add {
        /// Where the members come from.
        source: EntrySource,
        /// Walk directories.
        recursive: bool,
    },
    /// Insert members, replacing any member of the same name.
    Update {
        /// Where the members come from.
        source: EntrySource,
        /// Walk directories.
        recursive: bool,
    },
    /// Remove every member the pattern selects.
    Delete {
        /// Selection pattern.
        pattern: MemberPattern,
    },
}

impl Operation {
    /// Returns the operation type as a string.
    pub fn operation_type(&self) -> &'static str {
        match self {
            Operation::Add { .. } => "add",
            Operation::Update { .. } => "update",
            Operation::Delete { .. } => "delete",
        }
    }
}

/// Builder for creating operations fluently.
#[derive(Debug, Default)]
pub struct OperationBuilder {
    operations: Vec<Operation>,
}

impl OperationBuilder {
    /// Creates a new operation builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an add operation that walks directories.
    pub fn add(mut self, source: impl Into<EntrySource>) -> Self {
        self.operations.push(Operation::Add {
            source: source.into(),
            recursive: true,
        });
        self
    }

    /// Adds an update operation that walks directories.
    pub fn update(mut self, source: impl Into<EntrySource>) -> Self {
        self.operations.push(Operation::Update {
            source: source.into(),
            recursive: true,
        });
        self
    }

    /// Adds a delete operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`](crate::Error::Pattern) if the pattern does
    /// not compile.
    pub fn delete(mut self, pattern: &str) -> Result<Self> {
        self.operations.push(Operation::Delete {
            pattern: MemberPattern::new(pattern)?,
        });
        Ok(self)
    }

    /// Appends an already built operation.
    pub fn push(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Builds the list of operations.
    pub fn build(self) -> Vec<Operation> {
        self.operations
    }
}
