//! # catalog-core
//!
//! Foundation crate for the DID catalog engine.
//! Defines all types, errors, config, traits, and events.
//! Every other crate in the workspace depends on this.

#![allow(dead_code)]

pub mod config;
pub mod errors;
pub mod events;
pub mod traits;
pub mod types;

// Re-export the most commonly used types at the crate root.
pub use config::CatalogConfig;
pub use errors::error_code::CatalogErrorCode;
pub use errors::{CatalogError, StorageError};
pub use types::did::{Did, DidType};
pub use types::identifiers::DidKey;
