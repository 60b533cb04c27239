use crate::core::classify::classify;
use crate::core::defaults::DefaultsTable;
use crate::core::locator::Locator;
use crate::core::resolver::Resolver;
use crate::domain::model::ResolutionResult;
use crate::domain::ports::PreferenceStore;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Resolves a key, classifies it and attributes it to a scope.
pub struct Inspector<S: PreferenceStore> {
    store: S,
    defaults: DefaultsTable,
    home: PathBuf,
    host_id: String,
}

impl<S: PreferenceStore> Inspector<S> {
    pub fn new(
        store: S,
        defaults: DefaultsTable,
        home: impl Into<PathBuf>,
        host_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            defaults,
            home: home.into(),
            host_id: host_id.into(),
        }
    }

    pub fn inspect(&self, domain: &str, key: &str) -> Result<ResolutionResult> {
        let resolver = Resolver::new(&self.store);
        let value = resolver.resolve(domain, key)?;
        let forced = resolver.is_forced(domain, key)?;
        let kind = classify(value.as_ref());

        let locator = Locator::new(&self.store, &self.defaults, &self.home, &self.host_id);
        let origin = locator.locate_with_forced(domain, key, value.as_ref(), forced)?;

        tracing::info!(domain, key, kind = %kind, origin = %origin, "inspection finished");

        Ok(ResolutionResult {
            domain: domain.to_string(),
            key: key.to_string(),
            value,
            kind,
            origin,
            forced,
        })
    }
}
