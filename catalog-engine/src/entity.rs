//! DID Entity Layer: in-transaction construction and per-row invariant
//! checks for a DID (spec §2 "DID Entity Layer", §3 invariants).

use catalog_core::types::{Did, DidType};

/// Extensions that mark a FILE as an archive (spec §3 invariant 6, §4.3
/// step 3: "allowed only if parent name matches archive extension
/// policy"). Matched against the DID `name`, not any separate field —
/// the original implementation has no dedicated archive-type column.
const ARCHIVE_EXTENSIONS: &[&str] = &[".zip", ".tar", ".tar.gz", ".tgz", ".tar.bz2"];

pub fn is_archive_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ARCHIVE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Build a new FILE DID from caller-supplied attributes (spec §4.3.1: new
/// constituent files created implicitly by the Archive sub-routine; spec
/// §6 `add_dids`: explicit single-file creation).
#[allow(clippy::too_many_arguments)]
pub fn new_file(
    scope: impl Into<String>,
    name: impl Into<String>,
    account: impl Into<String>,
    bytes: Option<i64>,
    adler32: Option<String>,
    md5: Option<String>,
    guid: Option<String>,
    events: Option<i64>,
    constituent: bool,
    created_at: i64,
    extra: std::collections::BTreeMap<String, serde_json::Value>,
) -> Did {
    Did {
        scope: scope.into(),
        name: name.into(),
        did_type: DidType::File,
        account: account.into(),
        is_open: true,
        monotonic: false,
        expired_at: None,
        created_at,
        closed_at: None,
        accessed_at: None,
        access_cnt: 0,
        bytes,
        length: Some(1),
        events,
        md5,
        adler32,
        guid,
        availability: Some(catalog_core::types::Availability::Available),
        is_archive: false,
        constituent,
        is_new: false,
        purge_replicas: true,
        hidden: false,
        obsolete: false,
        complete: false,
        suppressed: false,
        extra,
    }
}

/// Build a new DATASET or CONTAINER DID (spec §6 `add_dids`).
pub fn new_collection(
    scope: impl Into<String>,
    name: impl Into<String>,
    did_type: DidType,
    account: impl Into<String>,
    created_at: i64,
    extra: std::collections::BTreeMap<String, serde_json::Value>,
) -> Did {
    debug_assert!(did_type != DidType::File);
    Did {
        scope: scope.into(),
        name: name.into(),
        did_type,
        account: account.into(),
        is_open: true,
        monotonic: false,
        expired_at: None,
        created_at,
        closed_at: None,
        accessed_at: None,
        access_cnt: 0,
        bytes: None,
        length: Some(0),
        events: None,
        md5: None,
        adler32: None,
        guid: None,
        availability: None,
        is_archive: false,
        constituent: false,
        is_new: false,
        purge_replicas: true,
        hidden: false,
        obsolete: false,
        complete: false,
        suppressed: false,
        extra,
    }
}
