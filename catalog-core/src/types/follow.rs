//! Follow and Follow Event (spec §3, §4.9).

use super::did::DidType;

/// `(scope, name, account)` subscription row.
#[derive(Debug, Clone, PartialEq)]
pub struct Follow {
    pub scope: String,
    pub name: String,
    pub account: String,
    pub did_type: DidType,
}

/// An event recorded for a followed DID, pending digest delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowEvent {
    pub scope: String,
    pub name: String,
    pub account: String,
    pub did_type: DidType,
    pub event_type: String,
    pub payload: String,
    pub created_at: i64,
}
