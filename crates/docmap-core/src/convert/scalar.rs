//! Default scalar converters.

use crate::{
    convert::{ConvertError, ValueConverter},
    value::Value,
    wire::{WireDocument, WireValue},
};
use chrono::{DateTime, Utc};
use docmap_primitives::ScalarKind;
use std::collections::BTreeMap;
use ulid::Ulid;

/// Default converter for a scalar kind.
#[must_use]
pub fn default_converter(kind: ScalarKind) -> Box<dyn ValueConverter> {
    match kind {
        ScalarKind::Bin => Box::new(BinConverter),
        ScalarKind::Bool => Box::new(BoolConverter),
        ScalarKind::Collection => Box::new(CollectionConverter),
        ScalarKind::Date => Box::new(DateConverter),
        ScalarKind::Float => Box::new(FloatConverter),
        ScalarKind::Hash => Box::new(HashConverter),
        ScalarKind::Id => Box::new(IdConverter),
        ScalarKind::Int => Box::new(IntConverter),
        ScalarKind::Text => Box::new(TextConverter),
        ScalarKind::Timestamp => Box::new(TimestampConverter),
    }
}

const fn mismatch(kind: ScalarKind, found: &'static str) -> ConvertError {
    ConvertError::TypeMismatch { kind, found }
}

fn parse_error(kind: ScalarKind, input: &str, reason: impl ToString) -> ConvertError {
    ConvertError::Parse {
        kind,
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

fn date_from_millis(kind: ScalarKind, ms: i64) -> Result<DateTime<Utc>, ConvertError> {
    DateTime::from_timestamp_millis(ms).ok_or(ConvertError::OutOfRange { kind })
}

///
/// BinConverter
///

pub struct BinConverter;

impl ValueConverter for BinConverter {
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
        match value {
            Value::Bytes(bytes) => Ok(WireValue::Binary(bytes.clone())),
            Value::Text(s) => Ok(WireValue::Binary(s.as_bytes().to_vec())),
            other => Err(mismatch(ScalarKind::Bin, other.kind_name())),
        }
    }

    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
        match wire {
            WireValue::Binary(bytes) => Ok(Value::Bytes(bytes.clone())),
            other => Err(mismatch(ScalarKind::Bin, other.kind_name())),
        }
    }
}

///
/// BoolConverter
///

pub struct BoolConverter;

impl ValueConverter for BoolConverter {
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
        match value {
            Value::Bool(v) => Ok(WireValue::Bool(*v)),
            Value::Int(v) => Ok(WireValue::Bool(*v != 0)),
            other => Err(mismatch(ScalarKind::Bool, other.kind_name())),
        }
    }

    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
        match wire {
            WireValue::Bool(v) => Ok(Value::Bool(*v)),
            other => Err(mismatch(ScalarKind::Bool, other.kind_name())),
        }
    }
}

///
/// CollectionConverter
///
/// Lists of plain values.
///

pub struct CollectionConverter;

impl ValueConverter for CollectionConverter {
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
        match value {
            Value::List(_) => plain_to_wire(value),
            other => Err(ConvertError::ExpectedList {
                found: other.kind_name(),
            }),
        }
    }

    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
        match wire {
            WireValue::Array(_) => plain_from_wire(wire),
            other => Err(ConvertError::ExpectedList {
                found: other.kind_name(),
            }),
        }
    }
}

///
/// DateConverter
///
/// Integers are unix seconds; text is RFC 3339.
///

pub struct DateConverter;

impl ValueConverter for DateConverter {
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
        const KIND: ScalarKind = ScalarKind::Date;

        match value {
            Value::Date(dt) => Ok(WireValue::Date(dt.timestamp_millis())),
            Value::Int(secs) => secs
                .checked_mul(1_000)
                .map(WireValue::Date)
                .ok_or(ConvertError::OutOfRange { kind: KIND }),
            Value::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| WireValue::Date(dt.timestamp_millis()))
                .map_err(|err| parse_error(KIND, s, err)),
            other => Err(mismatch(KIND, other.kind_name())),
        }
    }

    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
        match wire {
            WireValue::Date(ms) => date_from_millis(ScalarKind::Date, *ms).map(Value::Date),
            other => Err(mismatch(ScalarKind::Date, other.kind_name())),
        }
    }
}

///
/// FloatConverter
///

pub struct FloatConverter;

impl ValueConverter for FloatConverter {
    #[expect(clippy::cast_precision_loss)]
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
        match value {
            Value::Float(v) => Ok(WireValue::Float(*v)),
            Value::Int(v) => Ok(WireValue::Float(*v as f64)),
            Value::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(WireValue::Float)
                .map_err(|err| parse_error(ScalarKind::Float, s, err)),
            other => Err(mismatch(ScalarKind::Float, other.kind_name())),
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
        match wire {
            WireValue::Float(v) => Ok(Value::Float(*v)),
            WireValue::Int(v) => Ok(Value::Float(*v as f64)),
            other => Err(mismatch(ScalarKind::Float, other.kind_name())),
        }
    }
}

///
/// HashConverter
///
/// String-keyed maps of plain values.
///

pub struct HashConverter;

impl ValueConverter for HashConverter {
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
        match value {
            Value::Hash(_) => plain_to_wire(value),
            other => Err(mismatch(ScalarKind::Hash, other.kind_name())),
        }
    }

    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
        match wire {
            WireValue::Document(_) => plain_from_wire(wire),
            other => Err(ConvertError::ExpectedDocument {
                found: other.kind_name(),
            }),
        }
    }
}

///
/// IdConverter
///

pub struct IdConverter;

impl ValueConverter for IdConverter {
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
        match value {
            Value::Id(id) => Ok(WireValue::ObjectId(*id)),
            Value::Text(s) => Ulid::from_string(s)
                .map(WireValue::ObjectId)
                .map_err(|err| parse_error(ScalarKind::Id, s, err)),
            other => Err(mismatch(ScalarKind::Id, other.kind_name())),
        }
    }

    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
        match wire {
            WireValue::ObjectId(id) => Ok(Value::Id(*id)),
            WireValue::Text(s) => Ulid::from_string(s)
                .map(Value::Id)
                .map_err(|err| parse_error(ScalarKind::Id, s, err)),
            other => Err(mismatch(ScalarKind::Id, other.kind_name())),
        }
    }
}

///
/// IntConverter
///
/// Floats are truncated toward zero.
///

pub struct IntConverter;

impl IntConverter {
    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn truncate(v: f64) -> Result<i64, ConvertError> {
        let t = v.trunc();
        if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
            Ok(t as i64)
        } else {
            Err(ConvertError::OutOfRange {
                kind: ScalarKind::Int,
            })
        }
    }
}

impl ValueConverter for IntConverter {
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
        match value {
            Value::Int(v) => Ok(WireValue::Int(*v)),
            Value::Float(v) => Self::truncate(*v).map(WireValue::Int),
            Value::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(WireValue::Int)
                .map_err(|err| parse_error(ScalarKind::Int, s, err)),
            other => Err(mismatch(ScalarKind::Int, other.kind_name())),
        }
    }

    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
        match wire {
            WireValue::Int(v) => Ok(Value::Int(*v)),
            WireValue::Float(v) => Self::truncate(*v).map(Value::Int),
            other => Err(mismatch(ScalarKind::Int, other.kind_name())),
        }
    }
}

///
/// TextConverter
///

pub struct TextConverter;

impl ValueConverter for TextConverter {
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
        let text = match value {
            Value::Text(s) => s.clone(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
            Value::Id(id) => id.to_string(),
            other => return Err(mismatch(ScalarKind::Text, other.kind_name())),
        };

        Ok(WireValue::Text(text))
    }

    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
        match wire {
            WireValue::Text(s) => Ok(Value::Text(s.clone())),
            other => Err(mismatch(ScalarKind::Text, other.kind_name())),
        }
    }
}

///
/// TimestampConverter
///
/// Second-resolution timestamps; read back as integer seconds.
///

pub struct TimestampConverter;

impl ValueConverter for TimestampConverter {
    fn to_wire(&self, value: &Value) -> Result<WireValue, ConvertError> {
        match value {
            Value::Int(secs) => Ok(WireValue::Timestamp(*secs)),
            Value::Date(dt) => Ok(WireValue::Timestamp(dt.timestamp())),
            other => Err(mismatch(ScalarKind::Timestamp, other.kind_name())),
        }
    }

    fn to_value(&self, wire: &WireValue) -> Result<Value, ConvertError> {
        match wire {
            WireValue::Timestamp(secs) => Ok(Value::Int(*secs)),
            other => Err(mismatch(ScalarKind::Timestamp, other.kind_name())),
        }
    }
}

/// Convert a plain (non-mapped) value, recursing through lists and hashes.
///
/// Documents are mapped objects and are rejected here.
pub fn plain_to_wire(value: &Value) -> Result<WireValue, ConvertError> {
    Ok(match value {
        Value::Bool(v) => WireValue::Bool(*v),
        Value::Bytes(bytes) => WireValue::Binary(bytes.clone()),
        Value::Date(dt) => WireValue::Date(dt.timestamp_millis()),
        Value::Document(_) => {
            return Err(mismatch(ScalarKind::Collection, value.kind_name()));
        }
        Value::Float(v) => WireValue::Float(*v),
        Value::Hash(map) => {
            let mut doc = WireDocument::new();
            for (key, item) in map {
                doc.insert(key.clone(), plain_to_wire(item)?);
            }
            WireValue::Document(doc)
        }
        Value::Id(id) => WireValue::ObjectId(*id),
        Value::Int(v) => WireValue::Int(*v),
        Value::List(items) => {
            WireValue::Array(items.iter().map(plain_to_wire).collect::<Result<_, _>>()?)
        }
        Value::Null => WireValue::Null,
        Value::Text(s) => WireValue::Text(s.clone()),
    })
}

/// Inverse of [`plain_to_wire`]. Timestamps read back as integer seconds.
pub fn plain_from_wire(wire: &WireValue) -> Result<Value, ConvertError> {
    Ok(match wire {
        WireValue::Array(items) => {
            Value::List(items.iter().map(plain_from_wire).collect::<Result<_, _>>()?)
        }
        WireValue::Binary(bytes) => Value::Bytes(bytes.clone()),
        WireValue::Bool(v) => Value::Bool(*v),
        WireValue::Date(ms) => Value::Date(date_from_millis(ScalarKind::Date, *ms)?),
        WireValue::Document(doc) => {
            let mut map = BTreeMap::new();
            for (key, item) in doc.iter() {
                map.insert(key.to_string(), plain_from_wire(item)?);
            }
            Value::Hash(map)
        }
        WireValue::Float(v) => Value::Float(*v),
        WireValue::Int(v) | WireValue::Timestamp(v) => Value::Int(*v),
        WireValue::Null => Value::Null,
        WireValue::ObjectId(id) => Value::Id(*id),
        WireValue::Text(s) => Value::Text(s.clone()),
    })
}
