pub mod bind;
pub mod format;
pub mod parse;
pub mod schema;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use serde::Serialize;

use formbind::errors::FieldErrors;
use formbind::options::ParseOptions;
use formbind::types::Schema;
use formbind::{Record, find_schema, format_record_with};

use crate::output::{Console, GlobalOptions, TableDisplay, table_with_header};

pub fn resolve_schema(name: &str) -> Result<&'static Schema> {
    find_schema(name).context("Run 'formbind schema list' to see the registered entities")
}

/// A successfully bound record, ready for display
#[derive(Serialize)]
pub struct RecordView {
    pub entity: String,
    pub values: serde_json::Value,
    /// Canonical compact string, when the record can be represented
    pub compact: Option<String>,
    #[serde(skip)]
    rows: Vec<[String; 3]>,
}

impl RecordView {
    pub fn new(record: &Record, schema: &Schema, options: &ParseOptions) -> Self {
        let rows = schema
            .fields
            .iter()
            .filter_map(|field| {
                record.get(&field.name).map(|value| {
                    [
                        field.key.clone(),
                        field.kind.label().to_string(),
                        value.render(&field.kind, &options.null_sentinel),
                    ]
                })
            })
            .collect();
        Self {
            entity: record.entity().to_string(),
            values: record.to_json(),
            compact: format_record_with(record, schema, options).ok(),
            rows,
        }
    }
}

impl TableDisplay for RecordView {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = table_with_header(&["Field", "Type", "Value"], options);
        for row in &self.rows {
            table.add_row(row.iter().map(Cell::new).collect::<Vec<_>>());
        }
        table
    }

    fn to_compact(&self) -> String {
        self.compact.clone().unwrap_or_else(|| self.values.to_string())
    }
}

#[derive(Serialize)]
pub struct IssueView {
    pub field: String,
    pub code: &'static str,
    pub message: String,
}

/// Field issues for a rejected input
#[derive(Serialize)]
pub struct IssueReport {
    pub entity: String,
    pub issues: Vec<IssueView>,
}

impl IssueReport {
    pub fn new(entity: &str, errors: &FieldErrors) -> Self {
        Self {
            entity: entity.to_string(),
            issues: errors
                .issues
                .iter()
                .map(|issue| IssueView {
                    field: issue.field.clone(),
                    code: issue.code(),
                    message: issue.message.clone(),
                })
                .collect(),
        }
    }
}

impl TableDisplay for IssueReport {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = table_with_header(&["Field", "Code", "Message"], options);
        for issue in &self.issues {
            table.add_row(vec![Cell::new(&issue.field), Cell::new(issue.code), Cell::new(&issue.message)]);
        }
        table
    }

    fn to_compact(&self) -> String {
        self.issues
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Render the issues and turn them into the command's error
pub fn reject(output: &Console, entity: &str, errors: &FieldErrors) -> anyhow::Error {
    let report = IssueReport::new(entity, errors);
    output.error(&format!("{} rejected with {} issue(s)", entity, errors.len()));
    if let Err(err) = output.display(&report) {
        return err;
    }
    anyhow::anyhow!("invalid {entity} input")
}

#[cfg(test)]
mod tests {
    use super::*;
    use formbind::Bindable;
    use formbind::entities::Course;
    use formbind::errors::FieldIssue;
    use formbind::types::{FieldDescriptor, FieldKind};

    #[test]
    fn test_issue_report_compact() {
        let errors = FieldErrors::new([FieldIssue::unknown_field("Age"), FieldIssue::missing("Email")]);
        let report = IssueReport::new("student", &errors);
        assert_eq!(report.issues[0].code, "bind.unknown_field");
        assert_eq!(
            report.to_compact(),
            "Age: unknown field: Age; Email: missing required field: Email"
        );
    }

    #[test]
    fn test_record_view_rows_follow_schema() {
        let schema = Course::schema();
        let record = formbind::parse("Rust 101|2024-09-01", schema, &Default::default()).expect("parsed");
        let view = RecordView::new(&record, schema, &ParseOptions::default());
        assert_eq!(view.to_compact(), "Rust 101|2024-09-01");
        assert_eq!(view.rows[0], ["Name".to_string(), "text".to_string(), "Rust 101".to_string()]);
    }

    #[test]
    fn test_record_view_uses_configured_null_token() {
        let schema = Schema::positional("employee", "|")
            .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
            .field(FieldDescriptor::new("manager", "Manager", FieldKind::integer()).optional());
        let options = ParseOptions::new().with_null_sentinel("-");
        let record = formbind::parse("Lan|-", &schema, &options).expect("parsed");
        let view = RecordView::new(&record, &schema, &options);
        assert_eq!(view.rows[1][2], "-");
        assert_eq!(view.compact.as_deref(), Some("Lan|-"));
    }
}
