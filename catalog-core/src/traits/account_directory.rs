//! `AccountDirectory` — identity/account management collaborator
//! (spec §1: "only: account exists, account has VO").

use std::sync::Arc;

use crate::errors::CatalogError;

pub trait AccountDirectory: Send + Sync {
    fn account_exists(&self, account: &str) -> Result<bool, CatalogError>;

    fn account_has_vo(&self, account: &str, vo: &str) -> Result<bool, CatalogError>;

    /// Used by `create_reports` (spec §4.9) to deliver the digest.
    fn account_email(&self, account: &str) -> Result<Option<String>, CatalogError>;
}

impl<T: AccountDirectory + ?Sized> AccountDirectory for Arc<T> {
    fn account_exists(&self, account: &str) -> Result<bool, CatalogError> {
        (**self).account_exists(account)
    }
    fn account_has_vo(&self, account: &str, vo: &str) -> Result<bool, CatalogError> {
        (**self).account_has_vo(account, vo)
    }
    fn account_email(&self, account: &str) -> Result<Option<String>, CatalogError> {
        (**self).account_email(account)
    }
}

/// An account directory that treats every account as existing, in the
/// default VO, with no known email — for tests that don't exercise
/// identity checks.
pub struct PermissiveAccountDirectory;

impl AccountDirectory for PermissiveAccountDirectory {
    fn account_exists(&self, _account: &str) -> Result<bool, CatalogError> {
        Ok(true)
    }
    fn account_has_vo(&self, _account: &str, _vo: &str) -> Result<bool, CatalogError> {
        Ok(true)
    }
    fn account_email(&self, _account: &str) -> Result<Option<String>, CatalogError> {
        Ok(None)
    }
}
