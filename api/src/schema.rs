//! Decoding of the MessagePack document printed by `nvim --api-info`.

use rmpv::Value;
use serde::de::{DeserializeOwned, Error as _};
use serde::Deserialize;

use crate::error::SchemaError;

/// Top-level keys this crate understands
pub const KNOWN_KEYS: [&str; 5] = ["functions", "types", "ui_events", "error_types", "version"];

/// A `[type, name]` pair
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawParameter {
    pub type_name: String,
    pub name: String,
}

impl RawParameter {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            name: name.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawFunction {
    pub name: String,
    pub since: u64,
    pub return_type: String,
    pub parameters: Vec<RawParameter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawEvent {
    pub name: String,
    pub since: u64,
    pub parameters: Vec<RawParameter>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawExtType {
    pub id: i64,
    pub prefix: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawErrorType {
    pub id: i64,
}

/// The decoded API info. `types` and `error_types` keep their wire order.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiInfo {
    pub functions: Vec<RawFunction>,
    pub types: Vec<(String, RawExtType)>,
    pub ui_events: Vec<RawEvent>,
    pub error_types: Vec<(String, RawErrorType)>,
    pub version: Option<Value>,
    /// Every top-level key, in wire order
    pub keys: Vec<String>,
}

impl ApiInfo {
    pub fn from_msgpack(mut bytes: &[u8]) -> Result<Self, SchemaError> {
        let value = rmpv::decode::read_value(&mut bytes)?;
        Self::from_value(decode_utf8(value)?)
    }

    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        let Value::Map(entries) = value else {
            return Err(SchemaError::NotAMap);
        };

        let mut functions = None;
        let mut types = None;
        let mut ui_events = None;
        let mut error_types = Vec::new();
        let mut version = None;
        let mut keys = Vec::with_capacity(entries.len());

        for (key, value) in entries {
            let key = match key {
                Value::String(key) => key.into_str().ok_or(SchemaError::InvalidUtf8)?,
                other => other.to_string(),
            };
            match key.as_str() {
                "functions" => functions = Some(entries_of::<RawFunction>("function", value)?),
                "types" => types = Some(named_entries::<RawExtType>("type", value)?),
                "ui_events" => ui_events = Some(entries_of::<RawEvent>("ui event", value)?),
                "error_types" => error_types = named_entries::<RawErrorType>("error type", value)?,
                "version" => version = Some(value),
                _ => {}
            }
            keys.push(key);
        }

        Ok(Self {
            functions: functions.ok_or(SchemaError::MissingKey("functions"))?,
            types: types.ok_or(SchemaError::MissingKey("types"))?,
            ui_events: ui_events.ok_or(SchemaError::MissingKey("ui_events"))?,
            error_types,
            version,
            keys,
        })
    }

    /// Top-level keys that are not in [`KNOWN_KEYS`]
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .map(String::as_str)
            .filter(|key| !KNOWN_KEYS.contains(key))
    }
}

fn entries_of<T: DeserializeOwned>(kind: &'static str, value: Value) -> Result<Vec<T>, SchemaError> {
    rmpv::ext::from_value(value).map_err(|source| SchemaError::Entry { kind, source })
}

fn named_entries<T: DeserializeOwned>(
    kind: &'static str,
    value: Value,
) -> Result<Vec<(String, T)>, SchemaError> {
    let Value::Map(entries) = value else {
        return Err(SchemaError::Entry {
            kind,
            source: rmpv::ext::Error::custom(format!("expected a map of {kind}s")),
        });
    };
    entries
        .into_iter()
        .map(|(name, info)| -> Result<(String, T), SchemaError> {
            let name = rmpv::ext::from_value::<String>(name)
                .map_err(|source| SchemaError::Entry { kind, source })?;
            let info =
                rmpv::ext::from_value(info).map_err(|source| SchemaError::Entry { kind, source })?;
            Ok((name, info))
        })
        .collect()
}

/// Recursively turns binary leaves into strings.
fn decode_utf8(value: Value) -> Result<Value, SchemaError> {
    Ok(match value {
        Value::Binary(bytes) => {
            Value::from(String::from_utf8(bytes).map_err(|_| SchemaError::InvalidUtf8)?)
        }
        Value::String(text) if !text.is_str() => return Err(SchemaError::InvalidUtf8),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(decode_utf8)
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(entries) => Value::Map(
            entries
                .into_iter()
                .map(|(key, value)| -> Result<_, SchemaError> {
                    Ok((decode_utf8(key)?, decode_utf8(value)?))
                })
                .collect::<Result<_, _>>()?,
        ),
        other => other,
    })
}
