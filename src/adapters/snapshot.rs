//! A preference store loaded from a TOML description of each scope.
//!
//! ```toml
//! [[forced]]
//! domain = "com.apple.dock"
//! key = "autohide"
//! value = true
//!
//! [[entry]]
//! domain = "com.apple.dock"
//! user = "current"
//! host = "any"
//! key = "autohide"
//! value = true
//! ```
//!
//! TOML has no binary type, so data values are written as a table holding a
//! single hex string: `value = { "$data" = "deadbeef" }`.

use crate::adapters::memory::MemoryStore;
use crate::domain::model::{HostScope, PreferenceValue, UserScope};
use crate::domain::ports::PreferenceStore;
use crate::utils::error::{PrefError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_required_field};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const DATA_MARKER: &str = "$data";

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    forced: Vec<ForcedEntry>,
    #[serde(default, rename = "entry")]
    entries: Vec<ScopedEntry>,
}

#[derive(Debug, Deserialize)]
struct ForcedEntry {
    domain: String,
    key: String,
    value: Option<toml::Value>,
}

#[derive(Debug, Deserialize)]
struct ScopedEntry {
    domain: String,
    key: String,
    user: UserScope,
    host: HostScope,
    value: Option<toml::Value>,
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    inner: MemoryStore,
}

impl SnapshotStore {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PrefError::IoError)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded preference snapshot");
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        // Captured values are kept verbatim, `${VAR}` included.
        let file: SnapshotFile = toml::from_str(content).map_err(|e| {
            PrefError::config(format!("snapshot parsing error: {}", e))
        })?;

        let mut inner = MemoryStore::new();

        for (i, entry) in file.forced.into_iter().enumerate() {
            let field = format!("forced[{}]", i);
            validate_entry_names(&field, &entry.domain, &entry.key)?;
            let value = validate_required_field(&format!("{}.value", field), &entry.value)?;
            inner.force(entry.domain, entry.key, value_from_toml(value, &field)?);
        }

        for (i, entry) in file.entries.into_iter().enumerate() {
            let field = format!("entry[{}]", i);
            validate_entry_names(&field, &entry.domain, &entry.key)?;
            let value = validate_required_field(&format!("{}.value", field), &entry.value)?;
            inner.set(
                entry.domain,
                entry.key,
                entry.user,
                entry.host,
                value_from_toml(value, &field)?,
            );
        }

        Ok(Self { inner })
    }
}

fn validate_entry_names(field: &str, domain: &str, key: &str) -> Result<()> {
    validate_non_empty_string(&format!("{}.domain", field), domain)?;
    validate_non_empty_string(&format!("{}.key", field), key)
}

impl PreferenceStore for SnapshotStore {
    fn copy_app_value(&self, domain: &str, key: &str) -> Result<Option<PreferenceValue>> {
        self.inner.copy_app_value(domain, key)
    }

    fn is_forced(&self, domain: &str, key: &str) -> Result<bool> {
        self.inner.is_forced(domain, key)
    }

    fn copy_value(
        &self,
        domain: &str,
        key: &str,
        user: UserScope,
        host: HostScope,
    ) -> Result<Option<PreferenceValue>> {
        self.inner.copy_value(domain, key, user, host)
    }
}

/// Converts a TOML value; `field` names the value in error messages.
pub fn value_from_toml(value: &toml::Value, field: &str) -> Result<PreferenceValue> {
    let converted = match value {
        toml::Value::Boolean(b) => PreferenceValue::Boolean(*b),
        toml::Value::Integer(n) => PreferenceValue::Integer(*n),
        toml::Value::Float(r) => PreferenceValue::Real(*r),
        toml::Value::String(s) => PreferenceValue::String(s.clone()),
        toml::Value::Datetime(dt) => PreferenceValue::Date(parse_datetime(&dt.to_string(), field)?),
        toml::Value::Array(items) => PreferenceValue::Array(
            items
                .iter()
                .map(|item| value_from_toml(item, field))
                .collect::<Result<Vec<_>>>()?,
        ),
        toml::Value::Table(table) => {
            if let (1, Some(toml::Value::String(hex))) = (table.len(), table.get(DATA_MARKER)) {
                PreferenceValue::Data(decode_hex(hex, field)?)
            } else {
                let mut map = BTreeMap::new();
                for (k, v) in table {
                    map.insert(k.clone(), value_from_toml(v, field)?);
                }
                PreferenceValue::Dictionary(map)
            }
        }
    };
    Ok(converted)
}

/// Offset datetimes keep their instant; local ones are taken as UTC.
fn parse_datetime(text: &str, field: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, pattern) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(naive) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }

    Err(PrefError::InvalidConfigValueError {
        field: field.to_string(),
        value: text.to_string(),
        reason: "Dates need a calendar date".to_string(),
    })
}

fn decode_hex(hex: &str, field: &str) -> Result<Vec<u8>> {
    let cleaned: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    let invalid = |reason: &str| PrefError::InvalidConfigValueError {
        field: field.to_string(),
        value: hex.to_string(),
        reason: reason.to_string(),
    };

    if cleaned.len() % 2 != 0 {
        return Err(invalid("Hex data needs an even number of digits"));
    }

    (0..cleaned.len())
        .step_by(2)
        .map(|i| {
            cleaned
                .get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| invalid("Hex data contains a non-hex digit"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_snapshot() {
        let content = r#"
[[forced]]
domain = "com.example.managed"
key = "Locked"
value = "yes"

[[entry]]
domain = "com.apple.dock"
user = "current"
host = "any"
key = "autohide"
value = true
"#;

        let store = SnapshotStore::from_toml_str(content).unwrap();

        assert!(store.is_forced("com.example.managed", "Locked").unwrap());
        assert_eq!(
            store
                .copy_value("com.apple.dock", "autohide", UserScope::Current, HostScope::Any)
                .unwrap(),
            Some(PreferenceValue::Boolean(true))
        );
        assert_eq!(
            store.copy_app_value("com.apple.dock", "autohide").unwrap(),
            Some(PreferenceValue::Boolean(true))
        );
    }

    #[test]
    fn test_placeholders_in_values_are_not_expanded() {
        std::env::set_var("PREF_ORIGIN_SNAPSHOT_TEST_VAR", "expanded");

        let content = r#"
[[entry]]
domain = "com.example.app"
user = "current"
host = "any"
key = "LastPath"
value = "${PREF_ORIGIN_SNAPSHOT_TEST_VAR}/x"

[[entry]]
domain = "com.example.app"
user = "current"
host = "any"
key = "Template"
value = "${HOME}/x"
"#;
        let store = SnapshotStore::from_toml_str(content).unwrap();

        std::env::remove_var("PREF_ORIGIN_SNAPSHOT_TEST_VAR");

        assert_eq!(
            store.copy_app_value("com.example.app", "LastPath").unwrap(),
            Some(PreferenceValue::String(
                "${PREF_ORIGIN_SNAPSHOT_TEST_VAR}/x".to_string()
            ))
        );
        assert_eq!(
            store.copy_app_value("com.example.app", "Template").unwrap(),
            Some(PreferenceValue::String("${HOME}/x".to_string()))
        );
    }

    #[test]
    fn test_scope_aliases() {
        let content = r#"
[[entry]]
domain = "d"
user = "any-user"
host = "current-host"
key = "k"
value = 1
"#;
        let store = SnapshotStore::from_toml_str(content).unwrap();
        assert_eq!(
            store.copy_value("d", "k", UserScope::Any, HostScope::Current).unwrap(),
            Some(PreferenceValue::Integer(1))
        );
    }

    #[test]
    fn test_missing_value_is_rejected() {
        let content = r#"
[[entry]]
domain = "d"
user = "current"
host = "any"
key = "k"
"#;
        let err = SnapshotStore::from_toml_str(content).unwrap_err();
        assert!(matches!(err, PrefError::MissingConfigError { field } if field == "entry[0].value"));
    }

    #[test]
    fn test_unknown_scope_is_rejected() {
        let content = r#"
[[entry]]
domain = "d"
user = "everyone"
host = "any"
key = "k"
value = 1
"#;
        assert!(matches!(
            SnapshotStore::from_toml_str(content),
            Err(PrefError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_value_conversion() {
        let table: toml::Table = toml::from_str(
            r#"
blob = { "$data" = "dead beef" }
when = 2024-01-02T03:04:05Z
day = 2024-01-02
nested = { list = [1, 2.5, "x"] }
"#,
        )
        .unwrap();

        assert_eq!(
            value_from_toml(&table["blob"], "blob").unwrap(),
            PreferenceValue::Data(vec![0xde, 0xad, 0xbe, 0xef])
        );
        assert_eq!(
            value_from_toml(&table["when"], "when").unwrap(),
            PreferenceValue::Date(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap())
        );
        assert_eq!(
            value_from_toml(&table["day"], "day").unwrap(),
            PreferenceValue::Date(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );

        let mut expected = BTreeMap::new();
        expected.insert(
            "list".to_string(),
            PreferenceValue::Array(vec![
                PreferenceValue::Integer(1),
                PreferenceValue::Real(2.5),
                PreferenceValue::String("x".to_string()),
            ]),
        );
        assert_eq!(
            value_from_toml(&table["nested"], "nested").unwrap(),
            PreferenceValue::Dictionary(expected)
        );
    }

    #[test]
    fn test_bad_hex_is_rejected() {
        assert!(decode_hex("abc", "f").is_err());
        assert!(decode_hex("zz", "f").is_err());
        assert_eq!(decode_hex("", "f").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_snapshot_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[[entry]]
domain = "com.example.app"
user = "any"
host = "any"
key = "Greeting"
value = "hello"
"#,
            )
            .unwrap();

        let store = SnapshotStore::from_file(temp_file.path()).unwrap();
        assert_eq!(
            store.copy_app_value("com.example.app", "Greeting").unwrap(),
            Some(PreferenceValue::String("hello".to_string()))
        );
    }
}
