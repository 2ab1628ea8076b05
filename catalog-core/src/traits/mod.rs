//! Collaborator trait module — contracts between the DID catalog engine
//! and the external subsystems spec §1 declares out of scope (replica
//! placement, rule evaluation, metadata plugins, messaging transport,
//! identity). The engine only ever holds `Arc<dyn Trait>` — it never knows
//! a concrete implementation.
//!
//! Pattern reference: `drift_core::traits::storage` — object-safe,
//! `Send + Sync`, blanket `Arc<T>` impls.

pub mod account_directory;
pub mod message_sink;
pub mod metadata_plugin;
pub mod replica_engine;
pub mod rule_engine;

pub use account_directory::{AccountDirectory, PermissiveAccountDirectory};
pub use message_sink::{MessageSink, RecordingMessageSink};
pub use metadata_plugin::{InMemoryMetadataPlugin, MetadataPlugin};
pub use replica_engine::{NullReplicaEngine, ReplicaEngine};
pub use rule_engine::{NullRuleEngine, ReplicationRule, RuleEngine};
