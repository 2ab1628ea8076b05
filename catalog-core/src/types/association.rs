//! Association, Archive Constituent, and Association History (spec §3).

use super::did::DidType;

/// A directed edge `(parent_scope, parent_name) -> (child_scope, child_name)`.
/// Primary key is the 4-tuple; cached columns mirror the child FILE's
/// canonical attributes so downstream aggregation doesn't need a join.
#[derive(Debug, Clone, PartialEq)]
pub struct Association {
    pub parent_scope: String,
    pub parent_name: String,
    pub child_scope: String,
    pub child_name: String,
    pub did_type: DidType,
    pub child_type: DidType,
    pub bytes: Option<i64>,
    pub adler32: Option<String>,
    pub md5: Option<String>,
    pub guid: Option<String>,
    pub events: Option<i64>,
    pub rule_evaluation: bool,
}

/// `(archive_scope, archive_name) -> (file_scope, file_name)`. Parallel
/// relation to `Association`, reserved for files inside archive files
/// (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveConstituent {
    pub archive_scope: String,
    pub archive_name: String,
    pub file_scope: String,
    pub file_name: String,
    pub bytes: Option<i64>,
    pub adler32: Option<String>,
    pub md5: Option<String>,
    pub guid: Option<String>,
}

/// Immutable log row written when an `Association` is removed.
#[derive(Debug, Clone, PartialEq)]
pub struct AssociationHistory {
    pub parent_scope: String,
    pub parent_name: String,
    pub child_scope: String,
    pub child_name: String,
    pub did_type: DidType,
    pub child_type: DidType,
    pub bytes: Option<i64>,
    pub adler32: Option<String>,
    pub md5: Option<String>,
    pub guid: Option<String>,
    pub events: Option<i64>,
    /// `created_at` of the parent DID at the moment of removal.
    pub did_created_at: Option<i64>,
    pub deleted_at: i64,
}
