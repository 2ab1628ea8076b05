//! The full error taxonomy exposed to callers of the DID catalog engine
//! (spec §7). Every variant aborts the enclosing transaction; the engine
//! never catches anything except `UndefinedPolicy` during deletion.

use super::error_code::{self, CatalogErrorCode};
use super::storage_error::StorageError;

/// Error raised by a DID catalog operation.
///
/// Every variant carries the `(scope, name)` keys involved wherever the
/// failure is tied to a specific DID, per spec §7's "human-readable message
/// including the (scope, name) keys involved".
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("data identifier {scope}:{name} not found")]
    DidNotFound { scope: String, name: String },

    #[error("scope {scope} not found")]
    ScopeNotFound { scope: String },

    #[error("account {account} not found")]
    AccountNotFound { account: String },

    #[error("data identifier {scope}:{name} already exists")]
    DidAlreadyExists { scope: String, name: String },

    #[error("file {scope}:{name} already exists")]
    FileAlreadyExists { scope: String, name: String },

    #[error("duplicate content: {scope}:{name} is already attached under {parent_scope}:{parent_name}")]
    DuplicateContent {
        scope: String,
        name: String,
        parent_scope: String,
        parent_name: String,
    },

    #[error("unsupported operation on {scope}:{name}: {reason}")]
    UnsupportedOperation {
        scope: String,
        name: String,
        reason: String,
    },

    #[error("file consistency mismatch for {scope}:{name}: {reason}")]
    FileConsistencyMismatch {
        scope: String,
        name: String,
        reason: String,
    },

    #[error("unsupported status transition for {scope}:{name}: {reason}")]
    UnsupportedStatus {
        scope: String,
        name: String,
        reason: String,
    },

    #[error("identity error: {message}")]
    IdentityError { message: String },

    #[error("undefined policy: {message}")]
    UndefinedPolicy { message: String },

    #[error("database exception: {0}")]
    DatabaseException(#[from] StorageError),
}

impl CatalogErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DidNotFound { .. } => error_code::DID_NOT_FOUND,
            Self::ScopeNotFound { .. } => error_code::SCOPE_NOT_FOUND,
            Self::AccountNotFound { .. } => error_code::ACCOUNT_NOT_FOUND,
            Self::DidAlreadyExists { .. } => error_code::DID_ALREADY_EXISTS,
            Self::FileAlreadyExists { .. } => error_code::FILE_ALREADY_EXISTS,
            Self::DuplicateContent { .. } => error_code::DUPLICATE_CONTENT,
            Self::UnsupportedOperation { .. } => error_code::UNSUPPORTED_OPERATION,
            Self::FileConsistencyMismatch { .. } => error_code::FILE_CONSISTENCY_MISMATCH,
            Self::UnsupportedStatus { .. } => error_code::UNSUPPORTED_STATUS,
            Self::IdentityError { .. } => error_code::IDENTITY_ERROR,
            Self::UndefinedPolicy { .. } => error_code::UNDEFINED_POLICY,
            Self::DatabaseException(e) => e.error_code(),
        }
    }
}

impl CatalogError {
    /// True for the one policy error the Delete Engine recovers from
    /// internally (spec §7: "the engine recovers only `UndefinedPolicy`
    /// during deletion").
    pub fn is_undefined_policy(&self) -> bool {
        matches!(self, Self::UndefinedPolicy { .. })
    }
}
