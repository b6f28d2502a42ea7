//! Strict, locale-independent conversion of raw segments into typed values.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::FieldIssue;
use crate::options::ParseOptions;
use crate::types::{FieldDescriptor, FieldKind};
use crate::value::Value;

/// Converts one raw (already trimmed) segment for `field`.
///
/// Empty input or the NULL sentinel become `Null` on optional fields. Empty
/// input on a required field is reported as missing.
pub(crate) fn convert(field: &FieldDescriptor, raw: &str, options: &ParseOptions) -> Result<Value, FieldIssue> {
    if field.optional && (raw.is_empty() || options.is_null_token(raw)) {
        return Ok(Value::Null);
    }
    if raw.is_empty() {
        return Err(FieldIssue::missing(&field.key));
    }
    convert_kind(field, raw)
}

fn convert_kind(field: &FieldDescriptor, raw: &str) -> Result<Value, FieldIssue> {
    let key = field.key.as_str();
    match &field.kind {
        FieldKind::Text => Ok(Value::Text(raw.to_string())),
        FieldKind::Integer { min, max } => {
            let parsed = raw
                .parse::<i64>()
                .map_err(|_| FieldIssue::conversion(key, format!("invalid {key} format: expected a whole number")))?;
            if parsed < *min || parsed > *max {
                return Err(FieldIssue::conversion(
                    key,
                    format!("invalid {key} format: {parsed} does not fit between {min} and {max}"),
                ));
            }
            Ok(Value::Integer(parsed))
        }
        FieldKind::Decimal => Decimal::from_str(raw)
            .map(Value::Decimal)
            .map_err(|_| FieldIssue::conversion(key, format!("invalid {key} format: expected a decimal number"))),
        FieldKind::Date { format } => NaiveDate::parse_from_str(raw, format)
            .map(Value::Date)
            .map_err(|_| FieldIssue::conversion(key, format!("invalid {key} format: expected a date like {format}"))),
        FieldKind::Boolean => {
            if raw.eq_ignore_ascii_case("true") {
                Ok(Value::Boolean(true))
            } else if raw.eq_ignore_ascii_case("false") {
                Ok(Value::Boolean(false))
            } else {
                Err(FieldIssue::conversion(key, format!("invalid {key} format: expected true or false")))
            }
        }
        FieldKind::Choice {
            allowed,
            case_insensitive,
        } => allowed
            .iter()
            .find(|candidate| {
                if *case_insensitive {
                    candidate.to_lowercase() == raw.to_lowercase()
                } else {
                    candidate.as_str() == raw
                }
            })
            .map(|canonical| Value::Text(canonical.clone()))
            .ok_or_else(|| FieldIssue::conversion(key, format!("invalid {key}: expected one of {}", allowed.join(", ")))),
    }
}
