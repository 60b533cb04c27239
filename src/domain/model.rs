use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Domain holding the global defaults shared by every application.
pub const GLOBAL_DOMAIN: &str = ".GlobalPreferences";

/// A read-only snapshot of a preference value. Null is `Option::None`.
#[derive(Debug, Clone)]
pub enum PreferenceValue {
    Boolean(bool),
    Integer(i64),
    Real(f64),
    String(String),
    Data(Vec<u8>),
    Date(DateTime<Utc>),
    Array(Vec<PreferenceValue>),
    Dictionary(BTreeMap<String, PreferenceValue>),
    /// A platform value of a type outside the property-list kinds.
    Unknown {
        type_name: String,
        /// Platform description of the value, used for equality
        description: String,
    },
}

/// Integers and reals are both platform numbers and compare by value.
/// Every other pair of different kinds is unequal.
impl PartialEq for PreferenceValue {
    fn eq(&self, other: &Self) -> bool {
        use PreferenceValue::*;
        match (self, other) {
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            (Real(a), Real(b)) => a == b,
            (Integer(a), Real(b)) | (Real(b), Integer(a)) => integer_equals_real(*a, *b),
            (String(a), String(b)) => a == b,
            (Data(a), Data(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Array(a), Array(b)) => a == b,
            (Dictionary(a), Dictionary(b)) => a == b,
            (
                Unknown {
                    type_name: a_type,
                    description: a_desc,
                },
                Unknown {
                    type_name: b_type,
                    description: b_desc,
                },
            ) => a_type == b_type && a_desc == b_desc,
            _ => false,
        }
    }
}

/// Exact comparison; `i64 as f64` would round above 2^53.
fn integer_equals_real(int: i64, real: f64) -> bool {
    // 2^63 is exactly representable; the valid range is [-2^63, 2^63).
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    real.fract() == 0.0 && real >= -LIMIT && real < LIMIT && int == real as i64
}

/// Kind label reported on the `Type:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Null,
    Boolean,
    Integer,
    Real,
    String,
    Data,
    Date,
    Array,
    Dictionary,
    Unknown,
}

impl TypeTag {
    pub fn label(&self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Boolean => "boolean",
            TypeTag::Integer => "integer",
            TypeTag::Real => "real",
            TypeTag::String => "string",
            TypeTag::Data => "data",
            TypeTag::Date => "date",
            TypeTag::Array => "array",
            TypeTag::Dictionary => "dictionary",
            TypeTag::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserScope {
    #[serde(alias = "current-user")]
    Current,
    #[serde(alias = "any-user")]
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostScope {
    #[serde(alias = "current-host")]
    Current,
    #[serde(alias = "any-host")]
    Any,
}

/// Where a resolved value was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Stored in the file backing one of the candidate scopes
    Scope(String),
    /// Pinned by a managed profile
    Managed,
    /// Matches a known factory default
    Default,
    /// No value in any scope
    NotSet,
    /// Resolved but not attributable to any scope we enumerate
    Unknown,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Scope(path) => f.write_str(path),
            Origin::Managed => f.write_str("MANAGED"),
            Origin::Default => f.write_str("default"),
            Origin::NotSet => f.write_str("not set"),
            Origin::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolutionResult {
    pub domain: String,
    pub key: String,
    pub value: Option<PreferenceValue>,
    pub kind: TypeTag,
    pub origin: Origin,
    pub forced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_never_equals_integer() {
        assert_ne!(PreferenceValue::Boolean(true), PreferenceValue::Integer(1));
        assert_ne!(PreferenceValue::Integer(0), PreferenceValue::Boolean(false));
    }

    #[test]
    fn test_numbers_compare_by_value() {
        assert_eq!(PreferenceValue::Integer(2), PreferenceValue::Real(2.0));
        assert_eq!(PreferenceValue::Real(2.0), PreferenceValue::Integer(2));
        assert_ne!(PreferenceValue::Integer(2), PreferenceValue::Real(2.5));
    }

    #[test]
    fn test_mismatched_kinds_are_unequal() {
        assert_ne!(
            PreferenceValue::String("1".to_string()),
            PreferenceValue::Integer(1)
        );
        assert_ne!(
            PreferenceValue::Array(vec![]),
            PreferenceValue::Dictionary(BTreeMap::new())
        );
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        // 2^53 + 1 has no exact f64 counterpart
        assert_ne!(
            PreferenceValue::Integer(9_007_199_254_740_993),
            PreferenceValue::Real(9_007_199_254_740_992.0)
        );
        assert_eq!(
            PreferenceValue::Integer(9_007_199_254_740_992),
            PreferenceValue::Real(9_007_199_254_740_992.0)
        );
        assert_ne!(PreferenceValue::Integer(i64::MAX), PreferenceValue::Real(9.3e18));
        assert_ne!(PreferenceValue::Integer(0), PreferenceValue::Real(f64::NAN));
        assert_eq!(PreferenceValue::Integer(i64::MIN), PreferenceValue::Real(-9.223372036854775808e18));
    }

    #[test]
    fn test_unknown_values_compare_by_description() {
        let url = |description: &str| PreferenceValue::Unknown {
            type_name: "CFURL".to_string(),
            description: description.to_string(),
        };

        assert_eq!(url("file:///tmp/"), url("file:///tmp/"));
        assert_ne!(url("file:///tmp/"), url("file:///var/"));
        assert_ne!(
            url("x"),
            PreferenceValue::Unknown {
                type_name: "CFUUID".to_string(),
                description: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_nested_equality() {
        let mut a = BTreeMap::new();
        a.insert(
            "items".to_string(),
            PreferenceValue::Array(vec![PreferenceValue::Integer(1), PreferenceValue::Real(2.0)]),
        );
        let mut b = BTreeMap::new();
        b.insert(
            "items".to_string(),
            PreferenceValue::Array(vec![PreferenceValue::Real(1.0), PreferenceValue::Integer(2)]),
        );
        assert_eq!(PreferenceValue::Dictionary(a), PreferenceValue::Dictionary(b));
    }

    #[test]
    fn test_origin_labels() {
        assert_eq!(Origin::Managed.to_string(), "MANAGED");
        assert_eq!(Origin::NotSet.to_string(), "not set");
        assert_eq!(Origin::Default.to_string(), "default");
        assert_eq!(Origin::Unknown.to_string(), "unknown");
        assert_eq!(
            Origin::Scope("/Library/Preferences/x.plist".to_string()).to_string(),
            "/Library/Preferences/x.plist"
        );
    }
}
