use crate::domain::model::PreferenceValue;
use std::collections::HashMap;

/// Known factory defaults, keyed by (domain, key).
///
/// Built once at start-up and only read afterwards. Nothing is built in;
/// entries come from the `[defaults]` section of the config file.
#[derive(Debug, Clone, Default)]
pub struct DefaultsTable {
    entries: HashMap<(String, String), PreferenceValue>,
}

impl DefaultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String, PreferenceValue)>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(domain, key, value)| ((domain, key), value))
                .collect(),
        }
    }

    pub fn get(&self, domain: &str, key: &str) -> Option<&PreferenceValue> {
        self.entries.get(&(domain.to_string(), key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
