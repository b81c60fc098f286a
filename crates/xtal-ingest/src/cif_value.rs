//! Tagged scalar values and their CIF text form.

use std::fmt;

use serde_json::Value;

use crate::error::IngestError;

/// A scalar as it appears in mmJSON and similar tagged-value sources.
#[derive(Debug, Clone, PartialEq)]
pub enum CifValue {
    Int(i64),
    Real(f64),
    /// Unknown value, written as `?`.
    Null,
    Text(String),
}

impl CifValue {
    /// CIF token for this value, quoted where the syntax requires it.
    pub fn to_cif(&self) -> String {
        match self {
            CifValue::Int(n) => n.to_string(),
            CifValue::Real(x) if !x.is_finite() => "?".to_string(),
            CifValue::Real(x) => {
                let text = x.to_string();
                if text.contains(['.', 'e', 'E']) {
                    text
                } else {
                    format!("{text}.0")
                }
            }
            CifValue::Null => "?".to_string(),
            CifValue::Text(s) => quote(s),
        }
    }
}

impl fmt::Display for CifValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cif())
    }
}

impl TryFrom<&Value> for CifValue {
    type Error = IngestError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(CifValue::Null),
            Value::Number(n) => Ok(match n.as_i64() {
                Some(i) => CifValue::Int(i),
                None => CifValue::Real(n.as_f64().unwrap_or(f64::NAN)),
            }),
            Value::String(s) => Ok(CifValue::Text(s.clone())),
            Value::Bool(_) => Err(IngestError::UnsupportedJsonValue { kind: "boolean" }),
            Value::Array(_) => Err(IngestError::UnsupportedJsonValue { kind: "array" }),
            Value::Object(_) => Err(IngestError::UnsupportedJsonValue { kind: "object" }),
        }
    }
}

/// Quote `s` so that it reads back as a single CIF value.
///
/// Safe strings are returned unchanged. Otherwise single quotes are
/// preferred, then double quotes; strings containing both, or a line
/// break, become a semicolon-delimited text field.
pub fn quote(s: &str) -> String {
    if !needs_quoting(s) {
        return s.to_string();
    }
    if s.contains(['\n', '\r']) || (s.contains('\'') && s.contains('"')) {
        return format!(";{s}\n;");
    }
    if s.contains('\'') {
        format!("\"{s}\"")
    } else {
        format!("'{s}'")
    }
}

fn needs_quoting(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return true;
    };
    if matches!(first, '_' | '#' | '$' | '\'' | '"' | '[' | ']' | ';') {
        return true;
    }
    if s.chars().any(char::is_whitespace) || s == "?" || s == "." {
        return true;
    }
    is_reserved_word(s)
}

fn is_reserved_word(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("data_")
        || lower.starts_with("save_")
        || matches!(lower.as_str(), "loop_" | "global_" | "stop_")
}
