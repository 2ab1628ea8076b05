//! # catalog-storage
//!
//! SQLite persistence layer for the DID catalog engine.
//! WAL mode, explicit transaction handles, per-transaction temp tables,
//! schema bootstrap, typed per-entity query modules.

pub mod connection;
pub mod queries;
pub mod schema;
pub mod temp_tables;
pub mod tx;

pub use connection::DatabaseManager;
pub use temp_tables::{TempTable, TempTableManager};
pub use tx::CatalogTx;
