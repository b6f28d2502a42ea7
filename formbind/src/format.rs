//! Canonical compact rendering of records.

use crate::errors::{BindResult, FieldErrors, FieldIssue};
use crate::options::ParseOptions;
use crate::types::{CompactFormat, Schema};
use crate::value::{Record, Value};

/// Renders `record` as the canonical compact string for `schema`.
///
/// Nulls are written with the default `NULL` sentinel; use
/// [`format_record_with`] when parsing uses a different one.
pub fn format_record(record: &Record, schema: &Schema) -> BindResult<String> {
    format_record_with(record, schema, &ParseOptions::default())
}

/// Renders `record` so that parsing it with `options` yields an equal record.
///
/// Values that contain the delimiter cannot be represented and are reported
/// as format issues.
pub fn format_record_with(record: &Record, schema: &Schema, options: &ParseOptions) -> BindResult<String> {
    let null_token = options.null_sentinel.as_str();
    let mut issues = Vec::new();
    let rendered = match &schema.format {
        CompactFormat::Positional { delimiter, .. } => {
            let mut segments = Vec::new();
            for field in schema.compact_fields() {
                let value = record.get(&field.name).unwrap_or(&Value::Null);
                let text = value.render(&field.kind, null_token);
                if text.contains(delimiter.as_str()) {
                    issues.push(delimiter_issue(&field.key, delimiter));
                }
                segments.push(text);
            }
            segments.join(delimiter)
        }
        CompactFormat::KeyValue {
            pair_delimiter,
            separator,
        } => {
            let mut pairs = Vec::new();
            for field in schema.compact_fields() {
                let value = record.get(&field.name).unwrap_or(&Value::Null);
                // An absent key would pick up the default on re-parse.
                if value.is_null() && field.default.is_none() {
                    continue;
                }
                let text = value.render(&field.kind, null_token);
                if text.contains(pair_delimiter.as_str()) {
                    issues.push(delimiter_issue(&field.key, pair_delimiter));
                }
                pairs.push(format!("{}{separator}{text}", field.key));
            }
            pairs.join(pair_delimiter)
        }
    };
    if issues.is_empty() {
        Ok(rendered)
    } else {
        Err(FieldErrors::new(issues))
    }
}

fn delimiter_issue(key: &str, delimiter: &str) -> FieldIssue {
    FieldIssue::format(key, format!("{key} contains the delimiter '{delimiter}' and cannot be formatted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IssueKind;
    use crate::parser::parse;
    use crate::types::{FieldDescriptor, FieldKind};

    #[test]
    fn positional_nulls_render_as_sentinel() {
        let schema = Schema::positional("employee", "|")
            .field(FieldDescriptor::new("last_name", "HoNV", FieldKind::Text))
            .field(FieldDescriptor::new("manager_id", "Ma_NQL", FieldKind::Text).optional());
        let mut record = Record::new("employee");
        record.insert("last_name", Value::Text("Nguyen".into()));
        record.insert("manager_id", Value::Null);
        assert_eq!(format_record(&record, &schema), Ok("Nguyen|NULL".to_string()));
    }

    #[test]
    fn key_value_skips_nulls() {
        let schema = Schema::key_value("student", "|", ":")
            .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
            .field(FieldDescriptor::new("address", "Address", FieldKind::Text).optional());
        let mut record = Record::new("student");
        record.insert("name", Value::Text("Nguyen Van A".into()));
        record.insert("address", Value::Null);
        assert_eq!(format_record(&record, &schema), Ok("Name:Nguyen Van A".to_string()));
    }

    #[test]
    fn delimiter_inside_value_is_rejected() {
        let schema = Schema::positional("product", "-")
            .field(FieldDescriptor::new("name", "Name", FieldKind::Text));
        let mut record = Record::new("product");
        record.insert("name", Value::Text("Wi-Fi Router".into()));
        let err = format_record(&record, &schema).unwrap_err();
        assert_eq!(err.issues[0].kind, IssueKind::Format);
        assert_eq!(err.issues[0].field, "Name");
    }

    #[test]
    fn configured_sentinel_round_trips() {
        let schema = Schema::positional("employee", "|")
            .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
            .field(FieldDescriptor::new("manager", "Manager", FieldKind::integer()).optional());
        let options = ParseOptions::new().with_null_sentinel("-");
        let record = parse("Lan|-", &schema, &options).expect("parsed");
        assert_eq!(record.get("manager"), Some(&Value::Null));

        let canonical = format_record_with(&record, &schema, &options).expect("formatted");
        assert_eq!(canonical, "Lan|-");
        assert_eq!(parse(&canonical, &schema, &options), Ok(record));
    }

    #[test]
    fn key_value_keeps_nulls_that_would_default() {
        let schema = Schema::key_value("product", "|", ":")
            .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
            .field(FieldDescriptor::new("color", "Color", FieldKind::Text).optional().default_value("Mist"));
        let options = ParseOptions::default();
        let record = parse("Name:Pen|Color:NULL", &schema, &options).expect("parsed");
        assert_eq!(record.get("color"), Some(&Value::Null));

        let canonical = format_record(&record, &schema).expect("formatted");
        assert_eq!(canonical, "Name:Pen|Color:NULL");
        assert_eq!(parse(&canonical, &schema, &options), Ok(record));
    }
}
