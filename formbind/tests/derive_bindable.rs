use chrono::NaiveDate;
use formbind::{
    BindError, Bindable, FormValues, IssueKind, find_schema,
    options::ParseOptions,
    types::{Arity, BindPolicy, CompactFormat, ErrorPolicy, FieldKind, ValidationRule},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize, Bindable)]
#[bind(positional(delimiter = ";", arity = "at_least"), errors = "collect_all")]
struct Ticket {
    #[bind(validate(length(min = 2)))]
    title: String,
    #[bind(choice(allowed = ["Low", "High"], case_insensitive))]
    priority: String,
    #[bind(validate(range(min = 1, max = 10)))]
    seats: u8,
    #[bind(date_format = "%d/%m/%Y")]
    on: NaiveDate,
    note: Option<String>,
    #[bind(skip_compact, default = "false")]
    vip: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Bindable)]
#[bind(entity = "order_line", compact = "line", key_value, merge)]
struct OrderLine {
    #[bind(key = "SKU")]
    sku: String,
    quantity: i32,
    #[bind(validate(range(min = -100.5)))]
    adjustment: Option<Decimal>,
}

fn today() -> ParseOptions {
    ParseOptions::new().with_today(NaiveDate::from_ymd_opt(2025, 6, 1).expect("date"))
}

#[test]
fn derived_schema_reflects_attributes() {
    let schema = Ticket::schema();
    assert_eq!(schema.entity, "ticket");
    assert_eq!(schema.compact_field, "ticket");
    assert_eq!(schema.type_name, "Ticket");
    assert_eq!(schema.error_policy, ErrorPolicy::CollectAll);
    assert_eq!(
        schema.format,
        CompactFormat::Positional {
            delimiter: ";".to_string(),
            arity: Arity::AtLeast
        }
    );
    assert_eq!(schema.expected_layout(), "Title;Priority;Seats;On;Note");

    let seats = schema.field_by_name("seats").expect("seats field");
    assert_eq!(seats.kind, FieldKind::Integer { min: 0, max: 255 });
    assert_eq!(
        seats.validations,
        vec![ValidationRule::Range {
            min: Some("1".to_string()),
            max: Some("10".to_string())
        }]
    );

    let vip = schema.field_by_name("vip").expect("vip field");
    assert!(!vip.compact);
    assert_eq!(vip.default.as_deref(), Some("false"));
    assert!(schema.field_by_name("note").expect("note field").optional);
}

#[test]
fn derived_entities_parse_and_format() {
    let ticket = Ticket::parse_compact_with("Concert; high ;2;14/02/2026;null;extra", &today()).expect("parsed");
    assert_eq!(
        ticket,
        Ticket {
            title: "Concert".to_string(),
            priority: "High".to_string(),
            seats: 2,
            on: NaiveDate::from_ymd_opt(2026, 2, 14).expect("date"),
            note: None,
            vip: false,
        }
    );
    assert_eq!(ticket.to_compact().expect("formatted"), "Concert;High;2;14/02/2026;NULL");
}

#[test]
fn derived_entities_collect_issues() {
    let Err(BindError::Invalid(errors)) = Ticket::parse_compact_with("X;urgent;300;2026-02-14;", &today()) else {
        panic!("expected invalid input");
    };
    let fields: Vec<&str> = errors.issues.iter().map(|issue| issue.field.as_str()).collect();
    assert_eq!(fields, vec!["Title", "Priority", "Seats", "On"]);
    assert_eq!(errors.issues[0].kind, IssueKind::Range);
    assert!(errors.of_kind(IssueKind::Conversion).count() == 3);
}

#[test]
fn key_value_entity_merges_standard_fields() {
    let schema = OrderLine::schema();
    assert_eq!(schema.bind_policy, BindPolicy::Merge);
    assert_eq!(schema.expected_layout(), "SKU:value|Quantity:value|Adjustment:value");

    let form = FormValues::from_pairs([("line", "sku:A-1|quantity:3|adjustment:-2.5"), ("Quantity", "5")]);
    let line = OrderLine::bind_form(&form).expect("bound");
    assert_eq!(line.sku, "A-1");
    assert_eq!(line.quantity, 5);
    assert_eq!(line.adjustment, Some(Decimal::new(-25, 1)));

    let Err(BindError::Invalid(errors)) = OrderLine::parse_compact("SKU:A-1|Quantity:1|Adjustment:-200") else {
        panic!("expected invalid input");
    };
    assert_eq!(errors.issues[0].message, "Adjustment must be at least -100.5");
}

#[test]
fn derived_types_are_registered() {
    let by_entity = find_schema("ticket").expect("registered by entity");
    assert_eq!(by_entity.type_name, "Ticket");
    let upper = find_schema("ORDER_LINE").expect("registered case-insensitively");
    assert_eq!(upper.compact_field, "line");
}
