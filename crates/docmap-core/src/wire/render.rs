//! Rendering of wire values.
//!
//! `Display` produces shell syntax for logs and diagnostics; `to_json`
//! produces extended JSON.

use crate::wire::{WireDocument, WireValue};
use chrono::DateTime;
use serde_json::{Map, Value as JsonValue, json};
use std::fmt::{self, Write as _};

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(items) => {
                if items.is_empty() {
                    return f.write_str("[ ]");
                }
                f.write_str("[ ")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(" ]")
            }
            Self::Binary(bytes) => write!(f, "new BinData(\"{}\", \"0\")", hex(bytes)),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Date(ms) => match DateTime::from_timestamp_millis(*ms) {
                Some(dt) => write!(f, "new Date(\"{}\")", dt.to_rfc2822()),
                None => write!(f, "new Date({ms})"),
            },
            Self::Document(doc) => write!(f, "{doc}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Null => f.write_str("null"),
            Self::ObjectId(id) => write!(f, "ObjectId(\"{id}\")"),
            Self::Text(s) => write_quoted(f, s),
            Self::Timestamp(secs) => write!(f, "Timestamp({secs}, 0)"),
        }
    }
}

impl fmt::Display for WireDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{ ")?;
        for (idx, (key, value)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write_quoted(f, key)?;
            write!(f, ": {value}")?;
        }
        f.write_str(" }")
    }
}

impl WireValue {
    /// Extended JSON view (`$oid`, `$date`, `$binary`, `$timestamp`).
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Array(items) => JsonValue::Array(items.iter().map(Self::to_json).collect()),
            Self::Binary(bytes) => json!({ "$binary": hex(bytes) }),
            Self::Bool(v) => JsonValue::Bool(*v),
            Self::Date(ms) => json!({ "$date": ms }),
            Self::Document(doc) => doc.to_json(),
            Self::Float(v) => json!(v),
            Self::Int(v) => json!(v),
            Self::Null => JsonValue::Null,
            Self::ObjectId(id) => json!({ "$oid": id.to_string() }),
            Self::Text(s) => JsonValue::String(s.clone()),
            Self::Timestamp(secs) => json!({ "$timestamp": { "t": secs, "i": 0 } }),
        }
    }
}

impl WireDocument {
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        let map: Map<String, JsonValue> = self
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_json()))
            .collect();

        JsonValue::Object(map)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    match serde_json::to_string(s) {
        Ok(quoted) => f.write_str(&quoted),
        Err(_) => Err(fmt::Error),
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
            let _ = write!(out, "{b:02x}");
            out
        })
}

///
/// TESTS
///
