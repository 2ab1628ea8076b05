//! Updated-DID marker — the signal the external rule engine (Judge)
//! consumes to know a DID's attachments changed (spec §3, §4.3, §4.4).

/// Why the parent's attachment set changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DidAction {
    Attach,
    Detach,
}

impl DidAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Attach => "ATTACH",
            Self::Detach => "DETACH",
        }
    }
}

/// `{scope, name, action}` — pending rule re-evaluation signal.
///
/// Derives `Hash`/`Eq` so a batch of markers can be deduplicated in a
/// `HashSet` before being bulk-inserted (spec §4.3 step 5: "Deduplicate
/// emitted markers across the batch").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdatedDidMarker {
    pub scope: String,
    pub name: String,
    pub action: DidAction,
}

impl UpdatedDidMarker {
    pub fn new(scope: impl Into<String>, name: impl Into<String>, action: DidAction) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            action,
        }
    }
}
