use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Bindable;

/// Sign-up form shortcut: `FirstName|LastName|Email|DateBirth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Bindable)]
#[bind(compact = "student", positional(delimiter = "|"))]
pub struct StudentSignup {
    pub first_name: String,
    pub last_name: String,
    #[bind(validate(email))]
    pub email: String,
    pub date_birth: NaiveDate,
}

/// Enrolled student, entered as `Name:..|Email:..|Phone:..|DOB:..|Address:..|GPA:..`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Bindable)]
#[bind(entity = "student", compact = "customData", key_value(pairs = "|", separator = ":"))]
pub struct Student {
    #[bind(validate(length(min = 3, max = 100)))]
    pub name: String,
    #[bind(validate(email))]
    pub email: String,
    #[bind(validate(regex = "^0[0-9]{9}$"))]
    pub phone: String,
    #[bind(key = "DOB", validate(min_age = 18))]
    pub date_of_birth: NaiveDate,
    #[bind(validate(length(max = 200)))]
    pub address: Option<String>,
    #[bind(key = "GPA", validate(range(min = 0.0, max = 4.0)))]
    pub gpa: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::FormValues;
    use crate::errors::{BindError, IssueKind};
    use crate::options::ParseOptions;

    fn options() -> ParseOptions {
        ParseOptions::new().with_today(NaiveDate::from_ymd_opt(2025, 6, 1).expect("date"))
    }

    #[test]
    fn parses_key_value_pairs_in_any_order() {
        let raw = "gpa:3.5|Name:Nguyen Van A|EMAIL:a@example.com|Phone:0912345678|DOB:2000-05-20";
        let student = Student::parse_compact_with(raw, &options()).expect("parsed");
        assert_eq!(student.name, "Nguyen Van A");
        assert_eq!(student.address, None);
        assert_eq!(student.gpa, Decimal::new(35, 1));
    }

    #[test]
    fn collects_every_issue_by_default() {
        let raw = "Name:Al|Email:nope|Phone:123|DOB:2010-01-01|GPA:4.5|Age:20";
        let Err(BindError::Invalid(errors)) = Student::parse_compact_with(raw, &options()) else {
            panic!("expected invalid input");
        };
        let fields: Vec<&str> = errors.issues.iter().map(|issue| issue.field.as_str()).collect();
        assert_eq!(fields, vec!["Age", "Name", "Email", "Phone", "DOB", "GPA"]);
        assert!(errors.has_kind(IssueKind::UnknownField));
        assert_eq!(errors.of_kind(IssueKind::Range).count(), 5);
    }

    #[test]
    fn minimum_age_counts_full_years() {
        let almost = "Name:Bob Tran|Email:b@example.com|Phone:0912345678|DOB:2007-06-02|GPA:3";
        assert!(Student::parse_compact_with(almost, &options()).is_err());
        let exactly = "Name:Bob Tran|Email:b@example.com|Phone:0912345678|DOB:2007-06-01|GPA:3";
        assert!(Student::parse_compact_with(exactly, &options()).is_ok());
    }

    #[test]
    fn signup_from_standard_fields() {
        let form = FormValues::from_pairs([
            ("FirstName", "Minh"),
            ("LastName", "Pham"),
            ("Email", "minh@example.com"),
            ("DateBirth", "2001-11-30"),
        ]);
        let signup = StudentSignup::bind_form(&form).expect("bound");
        assert_eq!(signup.first_name, "Minh");
    }
}
