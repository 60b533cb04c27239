use crate::domain::model::{HostScope, PreferenceValue, UserScope, GLOBAL_DOMAIN};
use crate::domain::ports::PreferenceStore;
use crate::utils::error::Result;
use std::collections::HashMap;

/// Lookup order of the merged view after forced values: (global domain?, user, host).
const MERGE_ORDER: [(bool, UserScope, HostScope); 8] = [
    (false, UserScope::Current, HostScope::Current),
    (false, UserScope::Current, HostScope::Any),
    (true, UserScope::Current, HostScope::Current),
    (true, UserScope::Current, HostScope::Any),
    (false, UserScope::Any, HostScope::Current),
    (false, UserScope::Any, HostScope::Any),
    (true, UserScope::Any, HostScope::Current),
    (true, UserScope::Any, HostScope::Any),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScopedKey {
    domain: String,
    key: String,
    user: UserScope,
    host: HostScope,
}

/// An in-memory layered store with the platform's merge order.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scoped: HashMap<ScopedKey, PreferenceValue>,
    forced: HashMap<(String, String), PreferenceValue>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(
        &mut self,
        domain: impl Into<String>,
        key: impl Into<String>,
        user: UserScope,
        host: HostScope,
        value: PreferenceValue,
    ) {
        self.scoped.insert(
            ScopedKey {
                domain: domain.into(),
                key: key.into(),
                user,
                host,
            },
            value,
        );
    }

    /// Pins `key` to `value`, overriding every scope.
    pub fn force(&mut self, domain: impl Into<String>, key: impl Into<String>, value: PreferenceValue) {
        self.forced.insert((domain.into(), key.into()), value);
    }

    pub fn with_value(
        mut self,
        domain: &str,
        key: &str,
        user: UserScope,
        host: HostScope,
        value: PreferenceValue,
    ) -> Self {
        self.set(domain, key, user, host, value);
        self
    }

    pub fn with_forced(mut self, domain: &str, key: &str, value: PreferenceValue) -> Self {
        self.force(domain, key, value);
        self
    }

    fn forced_value(&self, domain: &str, key: &str) -> Option<&PreferenceValue> {
        self.forced.get(&(domain.to_string(), key.to_string()))
    }

    fn scoped_value(
        &self,
        domain: &str,
        key: &str,
        user: UserScope,
        host: HostScope,
    ) -> Option<&PreferenceValue> {
        self.scoped.get(&ScopedKey {
            domain: domain.to_string(),
            key: key.to_string(),
            user,
            host,
        })
    }
}

impl PreferenceStore for MemoryStore {
    fn copy_app_value(&self, domain: &str, key: &str) -> Result<Option<PreferenceValue>> {
        if let Some(value) = self.forced_value(domain, key) {
            return Ok(Some(value.clone()));
        }

        let found = MERGE_ORDER.iter().find_map(|&(global, user, host)| {
            let search_domain = if global { GLOBAL_DOMAIN } else { domain };
            self.scoped_value(search_domain, key, user, host)
        });
        Ok(found.cloned())
    }

    fn is_forced(&self, domain: &str, key: &str) -> Result<bool> {
        Ok(self.forced_value(domain, key).is_some())
    }

    fn copy_value(
        &self,
        domain: &str,
        key: &str,
        user: UserScope,
        host: HostScope,
    ) -> Result<Option<PreferenceValue>> {
        Ok(self.scoped_value(domain, key, user, host).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_specific_scope() {
        let store = MemoryStore::new()
            .with_value("app", "k", UserScope::Any, HostScope::Any, PreferenceValue::Integer(1))
            .with_value("app", "k", UserScope::Current, HostScope::Any, PreferenceValue::Integer(2));

        assert_eq!(
            store.copy_app_value("app", "k").unwrap(),
            Some(PreferenceValue::Integer(2))
        );
    }

    #[test]
    fn test_app_domain_beats_global_for_same_user() {
        let store = MemoryStore::new()
            .with_value(GLOBAL_DOMAIN, "k", UserScope::Current, HostScope::Current, PreferenceValue::Integer(1))
            .with_value("app", "k", UserScope::Current, HostScope::Any, PreferenceValue::Integer(2));

        assert_eq!(
            store.copy_app_value("app", "k").unwrap(),
            Some(PreferenceValue::Integer(2))
        );
    }

    #[test]
    fn test_global_domain_fills_in() {
        let store = MemoryStore::new().with_value(
            GLOBAL_DOMAIN,
            "AppleLocale",
            UserScope::Current,
            HostScope::Any,
            PreferenceValue::String("en_US".to_string()),
        );

        assert_eq!(
            store.copy_app_value("com.example.app", "AppleLocale").unwrap(),
            Some(PreferenceValue::String("en_US".to_string()))
        );
        assert!(store
            .copy_value("com.example.app", "AppleLocale", UserScope::Current, HostScope::Any)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_forced_overrides_everything() {
        let store = MemoryStore::new()
            .with_value("app", "k", UserScope::Current, HostScope::Current, PreferenceValue::Integer(1))
            .with_forced("app", "k", PreferenceValue::Integer(9));

        assert!(store.is_forced("app", "k").unwrap());
        assert!(!store.is_forced("app", "other").unwrap());
        assert_eq!(
            store.copy_app_value("app", "k").unwrap(),
            Some(PreferenceValue::Integer(9))
        );
    }

    #[test]
    fn test_unset_key_is_none() {
        let store = MemoryStore::new();
        assert!(store.copy_app_value("app", "missing").unwrap().is_none());
    }
}
