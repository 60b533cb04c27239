use crate::core::defaults::DefaultsTable;
use crate::core::scopes::storage_scopes;
use crate::domain::model::{Origin, PreferenceValue};
use crate::domain::ports::PreferenceStore;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Attributes an already-resolved value to the scope it came from.
///
/// There is no provenance API to ask, so each candidate scope is re-queried
/// in precedence order and the first equal value wins.
pub struct Locator<'a, S: PreferenceStore> {
    store: &'a S,
    defaults: &'a DefaultsTable,
    home: PathBuf,
    host_id: String,
}

impl<'a, S: PreferenceStore> Locator<'a, S> {
    pub fn new(
        store: &'a S,
        defaults: &'a DefaultsTable,
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

    pub fn locate(
        &self,
        domain: &str,
        key: &str,
        resolved: Option<&PreferenceValue>,
    ) -> Result<Origin> {
        let forced = self.store.is_forced(domain, key)?;
        self.locate_with_forced(domain, key, resolved, forced)
    }

    /// Same as [`Locator::locate`] with the managed state already known.
    pub fn locate_with_forced(
        &self,
        domain: &str,
        key: &str,
        resolved: Option<&PreferenceValue>,
        forced: bool,
    ) -> Result<Origin> {
        // Managed values are not attributable to any scope file.
        if forced {
            return Ok(Origin::Managed);
        }

        let Some(resolved) = resolved else {
            return Ok(Origin::NotSet);
        };

        for scope in storage_scopes(domain, &self.home, &self.host_id) {
            let raw = self
                .store
                .copy_value(&scope.domain, key, scope.user, scope.host)?;
            let matched = raw.as_ref() == Some(resolved);
            tracing::debug!(
                file = %scope.file,
                user = ?scope.user,
                host = ?scope.host,
                present = raw.is_some(),
                matched,
                "probed scope"
            );
            if matched {
                return Ok(Origin::Scope(scope.file));
            }
        }

        if self.defaults.get(domain, key) == Some(resolved) {
            return Ok(Origin::Default);
        }

        tracing::debug!(domain, key, "value not attributable to any known scope");
        Ok(Origin::Unknown)
    }
}
