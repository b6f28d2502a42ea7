use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Bindable;

/// Full employee record: `MaNV|HoNV|TenLot|TenNV|Phai|DChi|Luong|NgaySinh|PHG|Ma_NQL`.
///
/// `Ma_NQL` accepts the NULL sentinel for employees without a manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Bindable)]
#[bind(compact = "customNhanVien", positional(delimiter = "|"))]
pub struct Employee {
    #[bind(key = "MaNV", validate(range(min = 1)))]
    pub id: i32,
    #[bind(key = "HoNV")]
    pub last_name: String,
    #[bind(key = "TenLot")]
    pub middle_name: String,
    #[bind(key = "TenNV")]
    pub first_name: String,
    #[bind(key = "Phai", choice(allowed = ["Nam", "Nữ"], case_insensitive))]
    pub gender: String,
    #[bind(key = "DChi")]
    pub address: String,
    #[bind(key = "Luong", validate(range(min = 0)))]
    pub salary: Decimal,
    #[bind(key = "NgaySinh")]
    pub birth_date: NaiveDate,
    #[bind(key = "PHG")]
    pub department: i32,
    #[bind(key = "Ma_NQL")]
    pub manager_id: Option<String>,
}

/// Employee without an id, as entered on the quick-add form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Bindable)]
#[bind(compact = "nhanvien", positional(delimiter = "|"))]
pub struct EmployeeDraft {
    #[bind(key = "HoNV")]
    pub last_name: String,
    #[bind(key = "TenLot")]
    pub middle_name: String,
    #[bind(key = "TenNV")]
    pub first_name: String,
    #[bind(key = "Phai", choice(allowed = ["Nam", "Nữ"], case_insensitive))]
    pub gender: String,
    #[bind(key = "DChi")]
    pub address: String,
    #[bind(key = "Luong", validate(range(min = 0)))]
    pub salary: Decimal,
    #[bind(key = "NgaySinh")]
    pub birth_date: NaiveDate,
    #[bind(key = "PHG")]
    pub department: i32,
    #[bind(key = "Ma_NQL")]
    pub manager_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{BindError, IssueKind};

    #[test]
    fn null_manager_is_absent() {
        let employee = Employee::parse_compact("123|Nguyen|Van|A|Nam|Ha Noi|15000000|1990-01-15|1|NULL").expect("parsed");
        assert_eq!(employee.id, 123);
        assert_eq!(employee.gender, "Nam");
        assert_eq!(employee.salary, Decimal::from(15_000_000));
        assert_eq!(employee.manager_id, None);
    }

    #[test]
    fn sentinel_ignores_case_and_choice_is_canonicalized() {
        let draft = EmployeeDraft::parse_compact("Tran|Thi|B|nữ|Da Nang|9000000|1995-03-02|2|null").expect("parsed");
        assert_eq!(draft.gender, "Nữ");
        assert_eq!(draft.manager_id, None);
    }

    #[test]
    fn manager_id_is_kept_when_present() {
        let employee = Employee::parse_compact("7|Le|Van|C|Nam|Hue|1000|1980-12-31|3|123").expect("parsed");
        assert_eq!(employee.manager_id.as_deref(), Some("123"));
    }

    #[test]
    fn required_field_null_is_an_ordinary_value() {
        // HoNV is required, so "NULL" is just a surname here
        let employee = Employee::parse_compact("1|NULL|Van|A|Nam|Ha Noi|1|1990-01-15|1|NULL").expect("parsed");
        assert_eq!(employee.last_name, "NULL");
    }

    #[test]
    fn wrong_segment_count_names_the_layout() {
        let Err(BindError::Invalid(errors)) = Employee::parse_compact("123|Nguyen|Van") else {
            panic!("expected invalid input");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.issues[0].kind, IssueKind::Format);
        assert_eq!(
            errors.issues[0].message,
            "invalid format, expected: MaNV|HoNV|TenLot|TenNV|Phai|DChi|Luong|NgaySinh|PHG|Ma_NQL"
        );
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let Err(BindError::Invalid(errors)) =
            EmployeeDraft::parse_compact("Tran|Thi|B|X|Da Nang|9000000|1995-03-02|2|NULL")
        else {
            panic!("expected invalid input");
        };
        assert_eq!(errors.issues[0].field, "Phai");
    }
}
