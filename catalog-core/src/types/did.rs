//! The DID entity and its lifecycle-adjacent value types (spec §3).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The three DID types. Dispatch on this tag, never on a class hierarchy
/// (spec §9: "Dynamic dispatch on DID type" — represent as a tagged variant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DidType {
    File,
    Dataset,
    Container,
}

impl DidType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Dataset => "DATASET",
            Self::Container => "CONTAINER",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "FILE" => Some(Self::File),
            "DATASET" => Some(Self::Dataset),
            "CONTAINER" => Some(Self::Container),
            _ => None,
        }
    }
}

/// Replica availability for FILE DIDs (spec §3 invariant 9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    Available,
    Lost,
    Deleted,
}

impl Availability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Lost => "LOST",
            Self::Deleted => "DELETED",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(Self::Available),
            "LOST" => Some(Self::Lost),
            "DELETED" => Some(Self::Deleted),
            _ => None,
        }
    }
}

/// A data identifier: a file, dataset, or container (spec §3).
///
/// Domain-specific columns (`project`, `datatype`, `run_number`, ...) that
/// the distilled spec passes through opaquely live in `extra` rather than
/// as hard-coded fields — the same sparse-bag pattern the teacher uses for
/// `parse_result_json` when a column set is open-ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Did {
    pub scope: String,
    pub name: String,
    pub did_type: DidType,
    pub account: String,
    pub is_open: bool,
    pub monotonic: bool,

    pub expired_at: Option<i64>,
    pub created_at: i64,
    pub closed_at: Option<i64>,
    pub accessed_at: Option<i64>,
    pub access_cnt: i64,

    // FILE-only physical attributes.
    pub bytes: Option<i64>,
    pub length: Option<i64>,
    pub events: Option<i64>,
    pub md5: Option<String>,
    pub adler32: Option<String>,
    pub guid: Option<String>,
    pub availability: Option<Availability>,

    pub is_archive: bool,
    pub constituent: bool,
    pub is_new: bool,
    pub purge_replicas: bool,
    pub hidden: bool,
    pub obsolete: bool,
    pub complete: bool,
    pub suppressed: bool,

    pub extra: BTreeMap<String, Value>,
}

impl Did {
    /// `length=1` for every FILE DID (spec §3 invariant, §8 quantified
    /// invariant: "length=1 and aggregate operations treat D as a single
    /// file").
    pub fn effective_length(&self) -> i64 {
        match self.did_type {
            DidType::File => 1,
            _ => self.length.unwrap_or(0),
        }
    }
}

/// Snapshot of a deleted dataset/container row (spec §3: files are not
/// archived here — only collections are).
#[derive(Debug, Clone)]
pub struct DeletedDid {
    pub scope: String,
    pub name: String,
    pub did_type: DidType,
    pub account: String,
    pub is_open: bool,
    pub bytes: Option<i64>,
    pub length: Option<i64>,
    pub events: Option<i64>,
    pub created_at: i64,
    pub closed_at: Option<i64>,
    pub deleted_at: i64,
    pub extra: BTreeMap<String, Value>,
}
