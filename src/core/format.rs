use crate::domain::model::{PreferenceValue, ResolutionResult};
use crate::utils::error::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// key/value, Type and Defined lines
    Verbose,
    /// The value representation alone
    Value,
    /// One JSON object
    Json,
}

impl OutputMode {
    /// `value` as the optional third argument selects terse output.
    pub fn from_args(mode: Option<&str>, json: bool) -> Self {
        if json {
            OutputMode::Json
        } else if mode == Some("value") {
            OutputMode::Value
        } else {
            OutputMode::Verbose
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    domain: &'a str,
    key: &'a str,
    value: String,
    #[serde(rename = "type")]
    kind: &'static str,
    defined: String,
    forced: bool,
}

/// Renders a report. The returned text has no trailing newline.
pub fn format_report(result: &ResolutionResult, mode: OutputMode) -> Result<String> {
    let repr = represent(result.value.as_ref());

    let text = match mode {
        OutputMode::Value => repr,
        OutputMode::Verbose => format!(
            "{}: {}\nType: {}\nDefined: {}",
            result.key, repr, result.kind, result.origin
        ),
        OutputMode::Json => serde_json::to_string(&JsonReport {
            domain: &result.domain,
            key: &result.key,
            value: repr,
            kind: result.kind.label(),
            defined: result.origin.to_string(),
            forced: result.forced,
        })?,
    };

    Ok(text)
}

/// Single-line representation of a value, `None` for null.
pub fn represent(value: Option<&PreferenceValue>) -> String {
    match value {
        None => "None".to_string(),
        Some(value) => represent_value(value),
    }
}

fn represent_value(value: &PreferenceValue) -> String {
    match value {
        PreferenceValue::Boolean(true) => "True".to_string(),
        PreferenceValue::Boolean(false) => "False".to_string(),
        PreferenceValue::Integer(n) => n.to_string(),
        PreferenceValue::Real(r) => represent_real(*r),
        PreferenceValue::String(s) => quote(s),
        PreferenceValue::Data(bytes) => represent_data(bytes),
        PreferenceValue::Date(date) => date.format("%Y-%m-%d %H:%M:%S +0000").to_string(),
        PreferenceValue::Array(items) => {
            let items: Vec<String> = items.iter().map(represent_value).collect();
            format!("[{}]", items.join(", "))
        }
        PreferenceValue::Dictionary(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", quote(k), represent_value(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        PreferenceValue::Unknown { type_name, .. } => format!("<{}>", type_name),
    }
}

fn represent_real(r: f64) -> String {
    if r.is_nan() {
        "nan".to_string()
    } else if r.is_infinite() {
        let text = if r > 0.0 { "inf" } else { "-inf" };
        text.to_string()
    } else {
        // Debug keeps the fractional part on whole numbers (1.0, not 1)
        format!("{:?}", r)
    }
}

fn represent_data(bytes: &[u8]) -> String {
    let groups: Vec<String> = bytes
        .chunks(4)
        .map(|chunk| chunk.iter().map(|b| format!("{:02x}", b)).collect())
        .collect();
    format!("<{}>", groups.join(" "))
}

/// Quotes with `'` unless the text holds a `'` and no `"`.
fn quote(s: &str) -> String {
    let delimiter = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{:02x}", code));
                } else {
                    out.push_str(&format!("\\u{:04x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}
