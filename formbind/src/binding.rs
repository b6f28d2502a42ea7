//! Binding adapter: chooses between the compact field and standard form keys.

use crate::convert::convert;
use crate::errors::BindResult;
use crate::options::ParseOptions;
use crate::parser::{self, IssueCollector, clean, resolve_field, scan_pairs, split_segments};
use crate::types::{BindPolicy, CompactFormat, ErrorPolicy, Schema};
use crate::value::{Record, Value};

/// Submitted form values in arrival order.
///
/// Lookups ignore ASCII case and return the first value for a key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pairs: Vec<(String, String)>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs.into_iter().map(|(key, value)| (key.into(), value.into())).collect(),
        }
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    pub fn from_urlencoded(body: &str) -> Self {
        Self {
            pairs: url::form_urlencoded::parse(body.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Value for `key` when present and not blank.
    pub fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

/// Binds submitted form values to a record of `schema`.
///
/// Under [`BindPolicy::EitherOr`] a non-blank compact field is parsed on its
/// own and the standard keys are ignored; otherwise every field is read from
/// its own key. [`BindPolicy::Merge`] prefers standard keys and falls back to
/// the compact value field by field.
pub fn bind(form: &FormValues, schema: &Schema, options: &ParseOptions) -> BindResult<Record> {
    let compact = form.non_blank(&schema.compact_field);
    match (options.effective_bind_policy(schema), compact) {
        (BindPolicy::EitherOr, Some(raw)) => {
            log::debug!("binding {} from compact field {}", schema.entity, schema.compact_field);
            parser::parse(raw, schema, options)
        }
        (BindPolicy::EitherOr, None) => {
            log::debug!("binding {} from standard form fields", schema.entity);
            bind_standard(form, schema, options, &vec![None; schema.fields.len()])
        }
        (BindPolicy::Merge, compact) => {
            log::debug!(
                "merging {} standard fields with {} compact input",
                schema.entity,
                if compact.is_some() { "the" } else { "no" }
            );
            let fallbacks = match compact {
                Some(raw) => lenient_compact_values(raw, schema, options)?,
                None => vec![None; schema.fields.len()],
            };
            bind_standard(form, schema, options, &fallbacks)
        }
    }
}

/// Reads each field from its own form key, falling back to `fallbacks`.
///
/// Standard values are converted strictly and all issues are collected.
fn bind_standard(
    form: &FormValues,
    schema: &Schema,
    options: &ParseOptions,
    fallbacks: &[Option<Value>],
) -> BindResult<Record> {
    let today = options.reference_date();
    let mut collector = IssueCollector::new(ErrorPolicy::CollectAll);
    let mut record = Record::new(schema.entity.clone());

    for (field, fallback) in schema.fields.iter().zip(fallbacks) {
        let standard = form.non_blank(&field.key).map(|raw| clean(raw, schema.trim));
        let resolved = match (standard, fallback) {
            (Some(raw), _) => resolve_field(field, Some(raw), options, today),
            (None, Some(value)) => {
                let issues = crate::validators::check_rules(field, value, today);
                if issues.is_empty() { Ok(value.clone()) } else { Err(issues) }
            }
            (None, None) => resolve_field(field, None, options, today),
        };
        match resolved {
            Ok(value) => record.insert(field.name.clone(), value),
            Err(issues) => collector.extend(issues),
        }
    }

    collector.finish(record)
}

/// Extracts compact values for merge binding.
///
/// The segment count (or pair syntax) must be valid; individual values that
/// fail to convert are left out instead of reported.
fn lenient_compact_values(raw: &str, schema: &Schema, options: &ParseOptions) -> BindResult<Vec<Option<Value>>> {
    let raw_slots: Vec<Option<String>> = match &schema.format {
        CompactFormat::Positional { delimiter, arity } => {
            let mut segments = split_segments(raw, schema, delimiter, *arity)?.into_iter();
            schema
                .fields
                .iter()
                .map(|field| {
                    if field.compact {
                        segments.next().map(str::to_string)
                    } else {
                        None
                    }
                })
                .collect()
        }
        CompactFormat::KeyValue {
            pair_delimiter,
            separator,
        } => {
            let mut collector = IssueCollector::new(ErrorPolicy::FailFast);
            let slots = scan_pairs(raw, schema, pair_delimiter, separator, &mut collector);
            collector.finish(Record::new(schema.entity.clone()))?;
            slots
        }
    };

    Ok(schema
        .fields
        .iter()
        .zip(raw_slots)
        .map(|(field, slot)| {
            slot.and_then(|raw| match convert(field, &raw, options) {
                Ok(value) => Some(value),
                Err(issue) => {
                    log::debug!("ignoring compact value for {}: {}", field.key, issue.message);
                    None
                }
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IssueKind;
    use crate::types::{FieldDescriptor, FieldKind};

    fn course_schema() -> Schema {
        Schema::positional("course", "|")
            .compact_field("customCourse")
            .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
            .field(FieldDescriptor::new("start_date", "StartDate", FieldKind::date()))
    }

    #[test]
    fn urlencoded_bodies_are_decoded() {
        let form = FormValues::from_urlencoded("customCourse=Math+101%7C2024-09-01&Name=ignored");
        assert_eq!(form.get("customcourse"), Some("Math 101|2024-09-01"));
        assert_eq!(form.get("NAME"), Some("ignored"));
    }

    #[test]
    fn compact_field_wins_under_either_or() {
        let form = FormValues::from_pairs([
            ("customCourse", "Math 101|2024-09-01"),
            ("Name", "Physics"),
            ("StartDate", "2023-01-01"),
        ]);
        let record = bind(&form, &course_schema(), &ParseOptions::default()).expect("bound");
        assert_eq!(record.get("name"), Some(&Value::Text("Math 101".into())));
    }

    #[test]
    fn blank_compact_field_falls_back_to_standard() {
        let form = FormValues::from_pairs([("customCourse", "   "), ("Name", "Physics"), ("StartDate", "2023-01-01")]);
        let record = bind(&form, &course_schema(), &ParseOptions::default()).expect("bound");
        assert_eq!(record.get("name"), Some(&Value::Text("Physics".into())));
    }

    #[test]
    fn standard_path_collects_every_issue() {
        let form = FormValues::from_pairs([("StartDate", "yesterday")]);
        let err = bind(&form, &course_schema(), &ParseOptions::default()).unwrap_err();
        let kinds: Vec<IssueKind> = err.issues.iter().map(|issue| issue.kind).collect();
        assert_eq!(kinds, vec![IssueKind::Missing, IssueKind::Conversion]);
    }
}
