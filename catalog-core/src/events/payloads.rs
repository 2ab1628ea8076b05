//! Payload shapes for every event the engine emits (spec §6).
//!
//! `vo` is only populated when it differs from the default VO — callers
//! populate it from `Scope::vo`; the engine never guesses a default VO
//! itself.

use crate::types::DidType;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateCntPayload {
    pub account: String,
    pub scope: String,
    pub name: String,
    pub expired_at: Option<i64>,
    pub vo: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegisterCntPayload {
    pub account: String,
    pub scope: String,
    pub name: String,
    pub child_scope: String,
    pub child_name: String,
    pub child_type: DidType,
    pub vo: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErasePayload {
    pub account: String,
    pub scope: String,
    pub name: String,
    pub vo: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetachPayload {
    pub scope: String,
    pub name: String,
    pub did_type: DidType,
    pub child_scope: String,
    pub child_name: String,
    pub child_type: DidType,
    pub vo: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosePayload {
    pub scope: String,
    pub name: String,
    pub bytes: i64,
    pub length: i64,
    pub events: i64,
    pub vo: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenPayload {
    pub scope: String,
    pub name: String,
    pub vo: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmailPayload {
    pub to: String,
    pub subject: String,
    pub body: String,
}
