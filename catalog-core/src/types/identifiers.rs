//! Identifier newtypes.
//!
//! A DID is identified by `(scope, name)` everywhere — in Association rows,
//! temp tables, updated-DID markers, and follow rows. Giving the pair its
//! own type keeps call sites from reconstructing it ad hoc out of loose
//! `(String, String)` tuples.

use std::fmt;

/// `(scope, name)` — the primary key of a live or deleted DID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DidKey {
    pub scope: String,
    pub name: String,
}

impl DidKey {
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for DidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.name)
    }
}
