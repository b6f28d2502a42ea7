use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value as Json};

use crate::errors::BindError;
use crate::types::{FieldDescriptor, FieldKind, Schema};

/// A converted field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Boolean(bool),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(value) => Some(*value),
            Value::Integer(value) => Some(Decimal::from(*value)),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Renders the value for a compact string or a display cell.
    ///
    /// Dates use the field's format when given; `Null` renders as `null_token`.
    pub fn render(&self, kind: &FieldKind, null_token: &str) -> String {
        match self {
            Value::Text(text) => text.clone(),
            Value::Integer(value) => value.to_string(),
            Value::Decimal(value) => value.to_string(),
            Value::Date(date) => match kind {
                FieldKind::Date { format } => date.format(format).to_string(),
                _ => date.to_string(),
            },
            Value::Boolean(value) => value.to_string(),
            Value::Null => null_token.to_string(),
        }
    }

    /// JSON shape consumed by serde when decoding into an entity.
    ///
    /// Decimals travel as strings to keep their exact digits; dates use ISO 8601.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Text(text) => Json::String(text.clone()),
            Value::Integer(value) => Json::Number(Number::from(*value)),
            Value::Decimal(value) => Json::String(value.to_string()),
            Value::Date(date) => Json::String(date.format("%Y-%m-%d").to_string()),
            Value::Boolean(value) => Json::Bool(*value),
            Value::Null => Json::Null,
        }
    }

    /// Reads a serialized entity field back into a value of the given kind.
    pub fn from_json(kind: &FieldKind, json: &Json) -> Option<Value> {
        if json.is_null() {
            return Some(Value::Null);
        }
        match kind {
            FieldKind::Text | FieldKind::Choice { .. } => json.as_str().map(|text| Value::Text(text.to_string())),
            FieldKind::Integer { .. } => json.as_i64().map(Value::Integer),
            FieldKind::Decimal => match json {
                Json::String(text) => Decimal::from_str(text).ok().map(Value::Decimal),
                Json::Number(number) => Decimal::from_str(&number.to_string()).ok().map(Value::Decimal),
                _ => None,
            },
            FieldKind::Date { .. } => json
                .as_str()
                .and_then(|text| NaiveDate::parse_from_str(text, "%Y-%m-%d").ok())
                .map(Value::Date),
            FieldKind::Boolean => json.as_bool().map(Value::Boolean),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}

/// A successfully parsed entity: field name to value, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    entity: String,
    values: Vec<(String, Value)>,
}

impl Record {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            values: Vec::new(),
        }
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Sets a value, replacing an earlier one for the same field.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.values.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(existing, _)| existing == name).map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        for (name, value) in &self.values {
            map.insert(name.clone(), value.to_json());
        }
        Json::Object(map)
    }

    /// Decodes the record into a concrete entity type.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, BindError> {
        serde_json::from_value(self.to_json()).map_err(|source| BindError::Decode {
            entity: self.entity.clone(),
            source,
        })
    }

    /// Builds a record from a serialized entity, following the schema's fields.
    pub fn from_entity<T: Serialize>(entity: &T, schema: &Schema) -> Result<Self, BindError> {
        let json = serde_json::to_value(entity).map_err(|source| BindError::Encode {
            entity: schema.entity.clone(),
            source,
        })?;
        let mut record = Record::new(schema.entity.clone());
        for field in &schema.fields {
            let raw = json.get(&field.name).unwrap_or(&Json::Null);
            let value = Value::from_json(&field.kind, raw).ok_or_else(|| BindError::Encode {
                entity: schema.entity.clone(),
                source: unexpected_shape(field, raw),
            })?;
            record.insert(field.name.clone(), value);
        }
        Ok(record)
    }
}

fn unexpected_shape(field: &FieldDescriptor, raw: &Json) -> serde_json::Error {
    serde::de::Error::custom(format!(
        "field `{}` serialized as {raw}, which is not a valid {}",
        field.name,
        field.kind.label()
    ))
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json().serialize(serializer)
    }
}
