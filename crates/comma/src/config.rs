//! Loose option maps and lenient field parsing.
//!
//! Render options usually arrive as untyped key/value pairs (request
//! parameters, config files), so booleans may come in as `"true"` or `1`.
//! Typed option structs read those maps through [`from_config`].

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Opaque options handed through to the table writer.
pub type WriterConfig = serde_json::Map<String, JsonValue>;

/// Reads a typed options struct out of a loose option map.
pub fn from_config<T: DeserializeOwned>(config: &WriterConfig) -> Result<T> {
    Ok(serde_json::from_value(JsonValue::Object(config.clone()))?)
}

/// Parses a boolean written as a bool, a number or a string.
///
/// Accepts `true`/`false`, `1`/`0`, and the strings `"true"`, `"yes"`,
/// `"on"`, `"1"` (and their negatives, plus `""`), case-insensitively.
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    match JsonValue::deserialize(deserializer)? {
        JsonValue::Bool(b) => Ok(b),
        JsonValue::Null => Ok(false),
        JsonValue::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(de::Error::custom(format!("expected 0 or 1, got {}", n))),
        },
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" | "" => Ok(false),
            other => Err(de::Error::custom(format!("expected a boolean, got '{}'", other))),
        },
        other => Err(de::Error::custom(format!("expected a boolean, got {}", other))),
    }
}

/// Parses a string written as a string or a number.
pub(crate) fn text<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!("expected a string, got {}", other))),
    }
}
