//! Typed, per-entity query modules. Each mirrors one table from
//! `schema.rs` with explicit row structs and `rusqlite`-backed functions —
//! no generic ORM layer, matching `drift_storage::queries::detections`.

pub mod archive_constituents;
pub mod association_history;
pub mod associations;
pub mod deleted_dids;
pub mod dids;
pub mod follow_events;
pub mod follows;
pub mod graph;
pub mod scopes;
pub mod updated_did_markers;
