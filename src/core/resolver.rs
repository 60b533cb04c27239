use crate::domain::model::PreferenceValue;
use crate::domain::ports::PreferenceStore;
use crate::utils::error::Result;

/// Thin wrapper over the store's merged lookups.
pub struct Resolver<'a, S: PreferenceStore> {
    store: &'a S,
}

impl<'a, S: PreferenceStore> Resolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Effective value of `key` in `domain`, or `None` when unset everywhere.
    pub fn resolve(&self, domain: &str, key: &str) -> Result<Option<PreferenceValue>> {
        let value = self.store.copy_app_value(domain, key)?;
        tracing::debug!(domain, key, found = value.is_some(), "resolved effective value");
        Ok(value)
    }

    pub fn is_forced(&self, domain: &str, key: &str) -> Result<bool> {
        let forced = self.store.is_forced(domain, key)?;
        tracing::debug!(domain, key, forced, "checked managed state");
        Ok(forced)
    }
}
