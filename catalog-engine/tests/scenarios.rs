//! The six literal scenarios and the boundary behaviors named in spec §8,
//! run against an in-memory `catalog-storage` database.

use std::collections::BTreeMap;

use catalog_core::errors::CatalogError;
use catalog_core::traits::{
    AccountDirectory, NullReplicaEngine, NullRuleEngine, PermissiveAccountDirectory,
    RecordingMessageSink,
};
use catalog_core::types::{DidKey, DidType};
use catalog_core::CatalogConfig;
use catalog_storage::queries::{association_history, associations, dids, scopes};
use catalog_storage::DatabaseManager;

use catalog_engine::attach::{attach_dids_to_dids, Attachment, ChildAttachment};
use catalog_engine::delete::{delete_dids, DeleteInput};
use catalog_engine::entity::{new_collection, new_file};
use catalog_engine::set_status::close;

const NOW: i64 = 1_700_000_000;

fn open_db() -> DatabaseManager {
    DatabaseManager::open_in_memory().expect("in-memory db")
}

fn child(scope: &str, name: &str, bytes: Option<i64>, events: Option<i64>) -> ChildAttachment {
    ChildAttachment {
        scope: scope.to_string(),
        name: name.to_string(),
        bytes,
        adler32: None,
        md5: None,
        guid: None,
        events,
        extra: BTreeMap::new(),
    }
}

/// Scenario 1: dataset with 2 files, closed, aggregates resolved.
#[test]
fn create_dataset_with_two_files_and_close() {
    let mut db = open_db();
    let mut tx = db.begin().expect("begin");

    scopes::register_scope(tx.raw(), "S", "root", None).unwrap();
    dids::insert_did(tx.raw(), &new_file("S", "f1", "root", Some(10), None, None, None, Some(3), false, NOW, BTreeMap::new())).unwrap();
    dids::insert_did(tx.raw(), &new_file("S", "f2", "root", Some(20), None, None, None, Some(7), false, NOW, BTreeMap::new())).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "D", DidType::Dataset, "root", NOW, BTreeMap::new())).unwrap();

    let sink = RecordingMessageSink::new();
    attach_dids_to_dids(
        &mut tx,
        &[Attachment {
            parent: DidKey::new("S", "D"),
            children: vec![child("S", "f1", Some(10), Some(3)), child("S", "f2", Some(20), Some(7))],
            rse_id: None,
        }],
        "root",
        false,
        &NullReplicaEngine,
        &sink,
        NOW,
    )
    .expect("attach");

    let config = CatalogConfig::default();
    close(&mut tx, &DidKey::new("S", "D"), &config, &NullRuleEngine, &sink, NOW + 10).expect("close");

    let did = dids::get_did(tx.raw(), &DidKey::new("S", "D")).unwrap().expect("dataset exists");
    assert_eq!(did.length, Some(2));
    assert_eq!(did.bytes, Some(30));
    assert_eq!(did.events, Some(10));
    assert!(!did.is_open);
}

/// Scenario 2: attaching a CONTAINER under its own descendant is rejected.
#[test]
fn cycle_rejection() {
    let mut db = open_db();
    let mut tx = db.begin().expect("begin");
    scopes::register_scope(tx.raw(), "S", "root", None).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "C1", DidType::Container, "root", NOW, BTreeMap::new())).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "C2", DidType::Container, "root", NOW, BTreeMap::new())).unwrap();

    let sink = RecordingMessageSink::new();
    attach_dids_to_dids(
        &mut tx,
        &[Attachment {
            parent: DidKey::new("S", "C1"),
            children: vec![child("S", "C2", None, None)],
            rse_id: None,
        }],
        "root",
        false,
        &NullReplicaEngine,
        &sink,
        NOW,
    )
    .expect("first attach succeeds");

    let err = attach_dids_to_dids(
        &mut tx,
        &[Attachment {
            parent: DidKey::new("S", "C2"),
            children: vec![child("S", "C1", None, None)],
            rse_id: None,
        }],
        "root",
        false,
        &NullReplicaEngine,
        &sink,
        NOW,
    )
    .unwrap_err();
    assert!(matches!(err, CatalogError::UnsupportedOperation { .. }));
}

/// Scenario 3: a CONTAINER's children must all share one type.
#[test]
fn mixed_type_container_rejection() {
    let mut db = open_db();
    let mut tx = db.begin().expect("begin");
    scopes::register_scope(tx.raw(), "S", "root", None).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "C", DidType::Container, "root", NOW, BTreeMap::new())).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "D", DidType::Dataset, "root", NOW, BTreeMap::new())).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "C2", DidType::Container, "root", NOW, BTreeMap::new())).unwrap();

    let sink = RecordingMessageSink::new();
    attach_dids_to_dids(
        &mut tx,
        &[Attachment {
            parent: DidKey::new("S", "C"),
            children: vec![child("S", "D", None, None)],
            rse_id: None,
        }],
        "root",
        false,
        &NullReplicaEngine,
        &sink,
        NOW,
    )
    .expect("dataset child accepted");

    let err = attach_dids_to_dids(
        &mut tx,
        &[Attachment {
            parent: DidKey::new("S", "C"),
            children: vec![child("S", "C2", None, None)],
            rse_id: None,
        }],
        "root",
        false,
        &NullReplicaEngine,
        &sink,
        NOW,
    )
    .unwrap_err();
    assert!(matches!(err, CatalogError::UnsupportedOperation { .. }));
}

/// Scenario 4: attaching a FILE whose bytes disagree with the stored FILE.
#[test]
fn file_consistency_mismatch() {
    let mut db = open_db();
    let mut tx = db.begin().expect("begin");
    scopes::register_scope(tx.raw(), "S", "root", None).unwrap();
    dids::insert_did(tx.raw(), &new_file("S", "f1", "root", Some(10), None, None, None, None, false, NOW, BTreeMap::new())).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "D", DidType::Dataset, "root", NOW, BTreeMap::new())).unwrap();

    let sink = RecordingMessageSink::new();
    let err = attach_dids_to_dids(
        &mut tx,
        &[Attachment {
            parent: DidKey::new("S", "D"),
            children: vec![child("S", "f1", Some(99), None)],
            rse_id: None,
        }],
        "root",
        false,
        &NullReplicaEngine,
        &sink,
        NOW,
    )
    .unwrap_err();
    assert!(matches!(err, CatalogError::FileConsistencyMismatch { .. }));
}

/// Scenario 5: `list_expired_dids` shards 1000 DIDs across 4 disjoint,
/// exhaustive worker sets.
#[test]
fn expired_did_shard_coverage() {
    let mut db = open_db();
    let mut tx = db.begin().expect("begin");
    scopes::register_scope(tx.raw(), "S", "root", None).unwrap();

    for i in 0..1000 {
        let f = new_file(
            "S",
            format!("f{i}"),
            "root",
            Some(1),
            None,
            None,
            None,
            None,
            false,
            NOW,
            BTreeMap::new(),
        );
        dids::insert_did(tx.raw(), &f).unwrap();
        let key = DidKey::new("S", format!("f{i}"));
        dids::set_expiry(tx.raw(), &key, NOW - 3600).unwrap();
    }

    let mut union = std::collections::HashSet::new();
    let mut total = 0;
    for worker in 0..4u64 {
        let batch =
            catalog_engine::scan::list_expired_dids(&tx, worker, 4, 2000, &NullRuleEngine).unwrap();
        for expired in &batch {
            assert!(union.insert(expired.key.clone()), "disjoint across workers");
        }
        total += batch.len();
    }
    assert_eq!(total, 1000);
}

/// Scenario 6: deleting a dataset with an existing parent container defers
/// terminal removal (Phase F early-exit) but still detaches it.
#[test]
fn delete_with_existing_parent_defers_removal() {
    let mut db = open_db();
    let mut tx = db.begin().expect("begin");
    scopes::register_scope(tx.raw(), "S", "root", None).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "D", DidType::Dataset, "root", NOW, BTreeMap::new())).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "C", DidType::Container, "root", NOW, BTreeMap::new())).unwrap();

    let sink = RecordingMessageSink::new();
    attach_dids_to_dids(
        &mut tx,
        &[Attachment {
            parent: DidKey::new("S", "C"),
            children: vec![child("S", "D", None, None)],
            rse_id: None,
        }],
        "root",
        false,
        &NullReplicaEngine,
        &sink,
        NOW,
    )
    .expect("attach dataset under container");

    let config = CatalogConfig::default();
    delete_dids(
        &mut tx,
        &[DeleteInput {
            key: DidKey::new("S", "D"),
            did_type: DidType::Dataset,
            purge_replicas: true,
        }],
        "root",
        false,
        &config,
        &NullRuleEngine,
        &catalog_core::traits::InMemoryMetadataPlugin::new(),
        &sink,
        NOW + 100,
    )
    .expect("delete defers");

    let history = association_history::count_for_parent(tx.raw(), "S", "C").unwrap();
    assert_eq!(history, 1);
    assert!(associations::get_association(tx.raw(), &DidKey::new("S", "C"), &DidKey::new("S", "D")).unwrap().is_none());

    let survivor = dids::get_did(tx.raw(), &DidKey::new("S", "D")).unwrap();
    assert!(survivor.is_some(), "dataset row survives Phase F early-exit");
}

/// Round-trip: attach then detach leaves the Association set unchanged
/// and produces one history row per child.
#[test]
fn attach_then_detach_round_trip() {
    let mut db = open_db();
    let mut tx = db.begin().expect("begin");
    scopes::register_scope(tx.raw(), "S", "root", None).unwrap();
    dids::insert_did(tx.raw(), &new_file("S", "f1", "root", Some(1), None, None, None, None, false, NOW, BTreeMap::new())).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "D", DidType::Dataset, "root", NOW, BTreeMap::new())).unwrap();

    let sink = RecordingMessageSink::new();
    attach_dids_to_dids(
        &mut tx,
        &[Attachment {
            parent: DidKey::new("S", "D"),
            children: vec![child("S", "f1", Some(1), None)],
            rse_id: None,
        }],
        "root",
        false,
        &NullReplicaEngine,
        &sink,
        NOW,
    )
    .unwrap();

    assert_eq!(associations::count_children(tx.raw(), &DidKey::new("S", "D")).unwrap(), 1);

    catalog_engine::detach::detach(&mut tx, &DidKey::new("S", "D"), &[DidKey::new("S", "f1")], &sink, NOW + 5).unwrap();

    assert_eq!(associations::count_children(tx.raw(), &DidKey::new("S", "D")).unwrap(), 0);
    assert_eq!(association_history::count_for_parent(tx.raw(), "S", "D").unwrap(), 1);
}

/// Boundary: attaching to a closed DATASET is rejected.
#[test]
fn attach_to_closed_dataset_rejected() {
    let mut db = open_db();
    let mut tx = db.begin().expect("begin");
    scopes::register_scope(tx.raw(), "S", "root", None).unwrap();
    dids::insert_did(tx.raw(), &new_file("S", "f1", "root", Some(1), None, None, None, None, false, NOW, BTreeMap::new())).unwrap();
    dids::insert_did(tx.raw(), &new_collection("S", "D", DidType::Dataset, "root", NOW, BTreeMap::new())).unwrap();

    let config = CatalogConfig::default();
    let sink = RecordingMessageSink::new();
    close(&mut tx, &DidKey::new("S", "D"), &config, &NullRuleEngine, &sink, NOW).unwrap();

    let err = attach_dids_to_dids(
        &mut tx,
        &[Attachment {
            parent: DidKey::new("S", "D"),
            children: vec![child("S", "f1", Some(1), None)],
            rse_id: None,
        }],
        "root",
        false,
        &NullReplicaEngine,
        &sink,
        NOW,
    )
    .unwrap_err();
    assert!(matches!(err, CatalogError::UnsupportedOperation { .. }));
}

/// `NullRuleEngine`/`PermissiveAccountDirectory`/`AccountDirectory` are
/// exercised indirectly by `delete_dids`/`create_reports`; this asserts
/// the trait object plumbing actually compiles and runs for a plain
/// account lookup, independent of the engine.
#[test]
fn permissive_account_directory_smoke() {
    let dir = PermissiveAccountDirectory;
    assert!(dir.account_exists("root").unwrap());
    assert_eq!(dir.account_email("root").unwrap(), None);
}
