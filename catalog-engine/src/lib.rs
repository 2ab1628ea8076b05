//! DID catalog engine: the graph operations layered on `catalog-storage`
//! (attach/detach/delete, set-status, scan/sharding, aggregation,
//! follow/reports, resurrect, and the Get/List surface).
//!
//! Every entry point takes an explicit `&CatalogTx`/`&mut CatalogTx` and an
//! explicit `now: i64` rather than reaching for a clock or a thread-local
//! session — callers own the transaction boundary and the time source.

pub mod aggregation;
pub mod attach;
pub mod cycle_check;
pub mod delete;
pub mod detach;
pub mod entity;
pub mod follow;
pub mod graph;
pub mod metadata;
pub mod queries;
pub mod resurrect;
pub mod scan;
pub mod set_status;

pub use attach::{attach_dids_to_dids, Attachment, ChildAttachment};
pub use delete::{delete_dids, DeleteInput};
pub use detach::detach;
pub use resurrect::revive_dids;
pub use scan::{list_expired_dids, list_new_dids, shard_of, ExpiredDid};
pub use set_status::{close, reopen};
