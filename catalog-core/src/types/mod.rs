//! Entity and value types for the DID catalog (spec §3).

pub mod association;
pub mod did;
pub mod follow;
pub mod identifiers;
pub mod marker;
pub mod scope;

pub use association::{Association, ArchiveConstituent, AssociationHistory};
pub use did::{Availability, DeletedDid, Did, DidType};
pub use follow::{Follow, FollowEvent};
pub use identifiers::DidKey;
pub use marker::{DidAction, UpdatedDidMarker};
pub use scope::Scope;
