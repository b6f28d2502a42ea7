use chrono::NaiveDate;
use formbind::{
    FieldErrors, IssueKind, Value, format_record, parse,
    options::ParseOptions,
    types::{Arity, ErrorPolicy, FieldDescriptor, FieldKind, Schema, ValidationRule},
};
use rust_decimal::Decimal;

fn product_schema() -> Schema {
    Schema::positional("product", "-")
        .arity(Arity::AtLeast)
        .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
        .field(FieldDescriptor::new("category", "Category", FieldKind::Text))
        .field(FieldDescriptor::new("price", "Price", FieldKind::Decimal))
}

fn student_schema() -> Schema {
    Schema::key_value("student", "|", ":")
        .compact_field("customData")
        .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
        .field(FieldDescriptor::new("email", "Email", FieldKind::Text).validate(ValidationRule::Email))
        .field(FieldDescriptor::new("phone", "Phone", FieldKind::Text).optional())
        .field(
            FieldDescriptor::new("gpa", "GPA", FieldKind::Decimal).validate(ValidationRule::Range {
                min: Some("0".to_string()),
                max: Some("4".to_string()),
            }),
        )
}

fn rejected(raw: &str, schema: &Schema, options: &ParseOptions) -> FieldErrors {
    match parse(raw, schema, options) {
        Ok(record) => panic!("expected {raw:?} to be rejected, got {record:?}"),
        Err(errors) => errors,
    }
}

#[test]
fn whitespace_around_segments_is_ignored() {
    let options = ParseOptions::default();
    let spaced = parse("A - B - 10", &product_schema(), &options).expect("spaced");
    let tight = parse("A-B-10", &product_schema(), &options).expect("tight");
    assert_eq!(spaced, tight);
    assert_eq!(tight.get("price"), Some(&Value::Decimal(Decimal::new(10, 0))));
}

#[test]
fn too_few_segments_is_a_single_format_issue() {
    let errors = rejected("A-B", &product_schema(), &ParseOptions::default());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.issues[0].kind, IssueKind::Format);
    assert_eq!(errors.issues[0].field, "product");
    assert_eq!(errors.issues[0].message, "invalid format, expected: Name-Category-Price");
    assert_eq!(errors.issues[0].code(), "bind.format");
}

#[test]
fn positional_stops_at_first_issue_unless_told_otherwise() {
    let schema = Schema::positional("pair", "|")
        .field(FieldDescriptor::new("left", "Left", FieldKind::integer()))
        .field(FieldDescriptor::new("right", "Right", FieldKind::integer()));

    let errors = rejected("x|y", &schema, &ParseOptions::default());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.issues[0].field, "Left");

    let collect = ParseOptions::new().with_error_policy(ErrorPolicy::CollectAll);
    let errors = rejected("x|y", &schema, &collect);
    assert_eq!(errors.len(), 2);
    assert!(errors.of_kind(IssueKind::Conversion).all(|issue| issue.message.contains("whole number")));
}

#[test]
fn key_value_collects_every_issue() {
    let errors = rejected("Name:Bob|Email:not-an-email|GPA:5.0", &student_schema(), &ParseOptions::default());
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.issues[0].field, "Email");
    assert_eq!(errors.issues[1].field, "GPA");
    assert!(errors.issues.iter().all(|issue| issue.kind == IssueKind::Range));
}

#[test]
fn unknown_keys_are_reported_by_name() {
    let raw = "Name:Bob|Email:bob@example.com|GPA:3.0|Nickname:bobby";
    let errors = rejected(raw, &student_schema(), &ParseOptions::default());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.issues[0].kind, IssueKind::UnknownField);
    assert_eq!(errors.issues[0].field, "Nickname");
    assert_eq!(errors.issues[0].message, "unknown field: Nickname");
}

#[test]
fn missing_required_keys_are_reported() {
    let errors = rejected("Name:Bob", &student_schema(), &ParseOptions::default());
    let missing: Vec<&str> = errors.of_kind(IssueKind::Missing).map(|issue| issue.field.as_str()).collect();
    assert_eq!(missing, vec!["Email", "GPA"]);
}

#[test]
fn null_sentinel_is_configurable() {
    let schema = student_schema();
    let options = ParseOptions::new().with_null_sentinel("-");
    let record = parse("Name:Bob|Email:bob@example.com|Phone:-|GPA:2", &schema, &options).expect("parsed");
    assert_eq!(record.get("phone"), Some(&Value::Null));

    let record = parse("Name:Bob|Email:bob@example.com|Phone:NULL|GPA:2", &schema, &options).expect("parsed");
    assert_eq!(record.get("phone"), Some(&Value::Text("NULL".to_string())));
}

#[test]
fn formatting_produces_the_canonical_string() {
    let options = ParseOptions::default();
    let record = parse("  Notebook - A5 dotted - 4.50 ", &product_schema(), &options).expect("parsed");
    let canonical = format_record(&record, &product_schema()).expect("formatted");
    assert_eq!(canonical, "Notebook-A5 dotted-4.50");
    assert_eq!(parse(&canonical, &product_schema(), &options), Ok(record));

    let record = parse("gpa:3.5|email:bob@example.com|name:Bob", &student_schema(), &options).expect("parsed");
    assert_eq!(
        format_record(&record, &student_schema()).expect("formatted"),
        "Name:Bob|Email:bob@example.com|GPA:3.5"
    );
}

#[test]
fn custom_date_formats_round_trip() {
    let schema = Schema::positional("holiday", ";")
        .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
        .field(FieldDescriptor::new(
            "on",
            "On",
            FieldKind::Date {
                format: "%d/%m/%Y".to_string(),
            },
        ));
    let record = parse("Tet;29/01/2025", &schema, &ParseOptions::default()).expect("parsed");
    assert_eq!(record.get("on"), Some(&Value::Date(NaiveDate::from_ymd_opt(2025, 1, 29).expect("date"))));
    assert_eq!(format_record(&record, &schema).expect("formatted"), "Tet;29/01/2025");
}
