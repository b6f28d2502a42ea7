use crate::errors::{BindResult, FieldIssue};
use crate::options::ParseOptions;
use crate::types::{ErrorPolicy, Schema};
use crate::value::Record;

use super::{IssueCollector, clean, resolve_field};

/// Scans `key{separator}value` pairs into one slot per schema field.
///
/// Malformed pairs and unknown keys are reported to `collector`. When a key
/// repeats, the last value wins.
pub(crate) fn scan_pairs(
    raw: &str,
    schema: &Schema,
    pair_delimiter: &str,
    separator: &str,
    collector: &mut IssueCollector,
) -> Vec<Option<String>> {
    let mut slots: Vec<Option<String>> = vec![None; schema.fields.len()];
    for pair in raw.split(pair_delimiter) {
        if collector.should_stop() {
            break;
        }
        let Some((key, value)) = pair.split_once(separator) else {
            collector.push(FieldIssue::format(
                schema.compact_field.clone(),
                format!("invalid pair '{}', expected Key{separator}Value", pair.trim()),
            ));
            continue;
        };
        let key = clean(key, schema.trim);
        match schema.compact_field_by_key(key) {
            Some((index, _)) => {
                if slots[index].is_some() {
                    log::debug!("{} input repeats key {key}; keeping the last value", schema.entity);
                }
                slots[index] = Some(clean(value, schema.trim).to_string());
            }
            None => collector.push(FieldIssue::unknown_field(key)),
        }
    }
    slots
}

pub(super) fn parse(
    raw: &str,
    schema: &Schema,
    pair_delimiter: &str,
    separator: &str,
    policy: ErrorPolicy,
    options: &ParseOptions,
) -> BindResult<Record> {
    let mut collector = IssueCollector::new(policy);
    let slots = scan_pairs(raw, schema, pair_delimiter, separator, &mut collector);
    let today = options.reference_date();
    let mut record = Record::new(schema.entity.clone());

    for (field, slot) in schema.fields.iter().zip(&slots) {
        if collector.should_stop() {
            break;
        }
        match resolve_field(field, slot.as_deref(), options, today) {
            Ok(value) => record.insert(field.name.clone(), value),
            Err(issues) => collector.extend(issues),
        }
    }

    collector.finish(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IssueKind;
    use crate::types::{FieldDescriptor, FieldKind};

    fn schema() -> Schema {
        Schema::key_value("student", "|", ":")
            .compact_field("customData")
            .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
            .field(FieldDescriptor::new("address", "Address", FieldKind::Text).optional())
    }

    #[test]
    fn value_may_contain_separator() {
        let mut collector = IssueCollector::new(ErrorPolicy::CollectAll);
        let slots = scan_pairs("Name:Nguyen|Address:12:B Street", &schema(), "|", ":", &mut collector);
        assert_eq!(slots[1].as_deref(), Some("12:B Street"));
        assert!(collector.finish(Record::new("student")).is_ok());
    }

    #[test]
    fn duplicate_keys_keep_last_value() {
        let mut collector = IssueCollector::new(ErrorPolicy::CollectAll);
        let slots = scan_pairs("Name:First|name:Second", &schema(), "|", ":", &mut collector);
        assert_eq!(slots[0].as_deref(), Some("Second"));
    }

    #[test]
    fn pair_without_separator_is_a_format_issue() {
        let mut collector = IssueCollector::new(ErrorPolicy::CollectAll);
        scan_pairs("Name:A|garbage", &schema(), "|", ":", &mut collector);
        let errors = collector.finish(Record::new("student")).unwrap_err();
        assert_eq!(errors.issues[0].kind, IssueKind::Format);
        assert_eq!(errors.issues[0].field, "customData");
        assert!(errors.issues[0].message.contains("garbage"));
    }

    #[test]
    fn untrimmed_schema_keeps_key_whitespace() {
        let mut collector = IssueCollector::new(ErrorPolicy::CollectAll);
        let slots = scan_pairs(" Name: A ", &schema().trim(false), "|", ":", &mut collector);
        assert_eq!(slots[0], None);
        let errors = collector.finish(Record::new("student")).unwrap_err();
        assert_eq!(errors.issues[0].kind, IssueKind::UnknownField);
        assert_eq!(errors.issues[0].field, " Name");

        let mut collector = IssueCollector::new(ErrorPolicy::CollectAll);
        let slots = scan_pairs(" Name: A ", &schema(), "|", ":", &mut collector);
        assert_eq!(slots[0].as_deref(), Some("A"));
    }
}
