use crate::errors::{BindResult, FieldErrors, FieldIssue};
use crate::options::ParseOptions;
use crate::types::{Arity, ErrorPolicy, Schema};
use crate::value::Record;

use super::{IssueCollector, clean, resolve_field};

/// Splits `raw` and checks the segment count, returning one segment per compact field.
///
/// Surplus segments under [`Arity::AtLeast`] are dropped.
pub(crate) fn split_segments<'a>(raw: &'a str, schema: &Schema, delimiter: &str, arity: Arity) -> BindResult<Vec<&'a str>> {
    let expected = schema.compact_fields().count();
    let parts: Vec<&str> = raw.split(delimiter).map(|part| clean(part, schema.trim)).collect();
    let accepted = match arity {
        Arity::Exact => parts.len() == expected,
        Arity::AtLeast => parts.len() >= expected,
    };
    if !accepted {
        log::debug!(
            "{} input has {} segment(s), expected {}{}",
            schema.entity,
            parts.len(),
            if arity == Arity::AtLeast { "at least " } else { "" },
            expected
        );
        return Err(FieldErrors::single(FieldIssue::format(
            schema.compact_field.clone(),
            format!("invalid format, expected: {}", schema.expected_layout()),
        )));
    }
    Ok(parts.into_iter().take(expected).collect())
}

pub(super) fn parse(
    raw: &str,
    schema: &Schema,
    delimiter: &str,
    arity: Arity,
    policy: ErrorPolicy,
    options: &ParseOptions,
) -> BindResult<Record> {
    let segments = split_segments(raw, schema, delimiter, arity)?;
    let today = options.reference_date();
    let mut collector = IssueCollector::new(policy);
    let mut record = Record::new(schema.entity.clone());
    let mut next_segment = segments.into_iter();

    for field in &schema.fields {
        let raw_value = if field.compact { next_segment.next() } else { None };
        match resolve_field(field, raw_value, options, today) {
            Ok(value) => record.insert(field.name.clone(), value),
            Err(issues) => collector.extend(issues),
        }
        if collector.should_stop() {
            break;
        }
    }

    collector.finish(record)
}
