//! Delimited-format entity parser.
//!
//! `parse` turns one compact string into a [`Record`] or the ordered list of
//! issues explaining why it could not. It is pure: no I/O, no shared state.

mod key_value;
mod positional;

use chrono::NaiveDate;

use crate::errors::{BindResult, FieldErrors, FieldIssue};
use crate::options::ParseOptions;
use crate::types::{CompactFormat, ErrorPolicy, FieldDescriptor, Schema};
use crate::validators::check_rules;
use crate::value::{Record, Value};

pub(crate) use key_value::scan_pairs;
pub(crate) use positional::split_segments;

/// Parses a compact string against `schema`.
///
/// # Examples
///
/// ```
/// use formbind::parse;
/// use formbind::options::ParseOptions;
/// use formbind::types::{FieldDescriptor, FieldKind, Schema};
///
/// let schema = Schema::positional("course", "|")
///     .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
///     .field(FieldDescriptor::new("start_date", "StartDate", FieldKind::date()));
/// let record = parse("Math 101|2024-09-01", &schema, &ParseOptions::default()).unwrap();
/// assert_eq!(record.get("name").and_then(|v| v.as_str()), Some("Math 101"));
/// ```
pub fn parse(raw: &str, schema: &Schema, options: &ParseOptions) -> BindResult<Record> {
    let policy = options.effective_error_policy(schema);
    log::debug!(
        "parsing compact {} input ({} fields, {:?})",
        schema.entity,
        schema.fields.len(),
        policy
    );
    let result = match &schema.format {
        CompactFormat::Positional { delimiter, arity } => {
            positional::parse(raw, schema, delimiter, *arity, policy, options)
        }
        CompactFormat::KeyValue {
            pair_delimiter,
            separator,
        } => key_value::parse(raw, schema, pair_delimiter, separator, policy, options),
    };
    if let Err(errors) = &result {
        log::debug!("{} input rejected with {} issue(s)", schema.entity, errors.len());
    }
    result
}

/// Gathers issues according to the active error policy.
pub(crate) struct IssueCollector {
    policy: ErrorPolicy,
    issues: Vec<FieldIssue>,
}

impl IssueCollector {
    pub(crate) fn new(policy: ErrorPolicy) -> Self {
        Self {
            policy,
            issues: Vec::new(),
        }
    }

    /// Records issues; fail-fast keeps only the first one overall.
    pub(crate) fn extend<I>(&mut self, issues: I)
    where
        I: IntoIterator<Item = FieldIssue>,
    {
        for issue in issues {
            if self.should_stop() {
                return;
            }
            self.issues.push(issue);
        }
    }

    pub(crate) fn push(&mut self, issue: FieldIssue) {
        self.extend([issue]);
    }

    pub(crate) fn should_stop(&self) -> bool {
        self.policy == ErrorPolicy::FailFast && !self.issues.is_empty()
    }

    pub(crate) fn finish(self, record: Record) -> BindResult<Record> {
        if self.issues.is_empty() {
            Ok(record)
        } else {
            Err(FieldErrors::new(self.issues))
        }
    }
}

/// Produces the final value for a field from its raw input, if any.
///
/// Absent input falls back to the field default, then `Null` for optional
/// fields, then a missing-field issue. Domain rules run after conversion.
pub(crate) fn resolve_field(
    field: &FieldDescriptor,
    raw: Option<&str>,
    options: &ParseOptions,
    today: NaiveDate,
) -> Result<Value, Vec<FieldIssue>> {
    let source = match raw {
        Some(raw) => raw,
        None => match field.default.as_deref() {
            Some(default) => default,
            None if field.optional => return Ok(Value::Null),
            None => return Err(vec![FieldIssue::missing(&field.key)]),
        },
    };
    let value = crate::convert::convert(field, source, options).map_err(|issue| vec![issue])?;
    let issues = check_rules(field, &value, today);
    if issues.is_empty() {
        log::trace!("{} = {:?}", field.name, value);
        Ok(value)
    } else {
        Err(issues)
    }
}

pub(crate) fn clean(raw: &str, trim: bool) -> &str {
    if trim { raw.trim() } else { raw }
}
