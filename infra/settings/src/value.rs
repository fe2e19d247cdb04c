use crate::error::SettingsError;
use crate::keys::{SettingKey, ValueKind};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// A value stored in one setting slot.
///
/// The tagged union mirrors [`ValueKind`] exactly; a `SettingValue` written
/// to a slot must carry the kind the key declares. On disk every variant is
/// plain JSON: scalars stay scalars, timestamps are RFC 3339 strings, and
/// `Json` holds whatever document the caller serialized.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Json(Value),
}

impl SettingValue {
    /// The kind of this value (matched against the key's declared policy).
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Text(_) => ValueKind::Text,
            Self::Timestamp(_) => ValueKind::Timestamp,
            Self::Json(_) => ValueKind::Json,
        }
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Lowers the value into its on-disk JSON shape.
    pub(crate) fn to_json(&self, key: SettingKey) -> Result<Value, SettingsError> {
        let json = match self {
            Self::Bool(value) => Value::Bool(*value),
            Self::Int(value) => Value::from(*value),
            Self::Float(value) => serde_json::Number::from_f64(*value)
                .map(Value::Number)
                .ok_or(SettingsError::WrongShape { key: key.identifier(), expected: ValueKind::Float })?,
            Self::Text(value) => Value::String(value.clone()),
            Self::Timestamp(value) => Value::String(value.to_rfc3339()),
            Self::Json(value) => value.clone(),
        };
        Ok(json)
    }

    /// Serializes the value for its slot file.
    pub(crate) fn encode(&self, key: SettingKey) -> Result<Vec<u8>, SettingsError> {
        let json = self.to_json(key)?;
        serde_json::to_vec(&json)
            .map_err(|source| SettingsError::Serialize { key: key.identifier(), source })
    }

    /// Parses slot bytes against the key's declared policy.
    ///
    /// A slot that holds JSON of the wrong shape (e.g. a string where the
    /// key declares `Bool`) is rejected; callers degrade to the default.
    pub(crate) fn decode(key: SettingKey, bytes: &[u8]) -> Result<Self, SettingsError> {
        let identifier = key.identifier();
        let json: Value = serde_json::from_slice(bytes)
            .map_err(|source| SettingsError::Malformed { key: identifier, source })?;

        let expected = key.kind();
        let mismatch = SettingsError::WrongShape { key: identifier, expected };
        let value = match expected {
            ValueKind::Bool => Self::Bool(json.as_bool().ok_or(mismatch)?),
            ValueKind::Int => Self::Int(json.as_i64().ok_or(mismatch)?),
            ValueKind::Float => Self::Float(json.as_f64().ok_or(mismatch)?),
            ValueKind::Text => Self::Text(json.as_str().ok_or(mismatch)?.to_owned()),
            ValueKind::Timestamp => {
                let raw = json.as_str().ok_or(mismatch)?;
                let parsed = DateTime::parse_from_rfc3339(raw)
                    .map_err(|_| SettingsError::WrongShape { key: identifier, expected })?;
                Self::Timestamp(parsed.with_timezone(&Utc))
            },
            ValueKind::Json => Self::Json(json),
        };
        Ok(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for SettingValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<Value> for SettingValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}
