//! Scope — namespace grouping DIDs, owned by an account and tagged with a VO.

/// A namespace under which `(scope, name)` DIDs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub scope: String,
    pub account: String,
    /// Virtual organization tag. `None` means the default VO — event
    /// payloads only carry `vo` when it differs from this (spec §6).
    pub vo: Option<String>,
}

impl Scope {
    pub fn new(scope: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            account: account.into(),
            vo: None,
        }
    }

    pub fn with_vo(mut self, vo: impl Into<String>) -> Self {
        self.vo = Some(vo.into());
        self
    }
}
