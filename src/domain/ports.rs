use crate::domain::model::{HostScope, PreferenceValue, UserScope};
use crate::utils::error::Result;

/// Read-only access to a layered preference store.
///
/// A missing value is `Ok(None)`. `Err` is reserved for the store itself
/// failing, which callers treat as fatal.
pub trait PreferenceStore {
    /// Effective value after the store's own precedence rules.
    fn copy_app_value(&self, domain: &str, key: &str) -> Result<Option<PreferenceValue>>;

    /// Whether the key is pinned by a managed profile.
    fn is_forced(&self, domain: &str, key: &str) -> Result<bool>;

    /// Raw value of one scope, bypassing the merge.
    fn copy_value(
        &self,
        domain: &str,
        key: &str,
        user: UserScope,
        host: HostScope,
    ) -> Result<Option<PreferenceValue>>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn copy_app_value(&self, domain: &str, key: &str) -> Result<Option<PreferenceValue>> {
        (**self).copy_app_value(domain, key)
    }

    fn is_forced(&self, domain: &str, key: &str) -> Result<bool> {
        (**self).is_forced(domain, key)
    }

    fn copy_value(
        &self,
        domain: &str,
        key: &str,
        user: UserScope,
        host: HostScope,
    ) -> Result<Option<PreferenceValue>> {
        (**self).copy_value(domain, key, user, host)
    }
}
