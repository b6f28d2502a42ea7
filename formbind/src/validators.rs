use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use email_address::EmailAddress;
use regex::Regex;
use rust_decimal::Decimal;
use url::Url;

use crate::errors::FieldIssue;
use crate::types::{FieldDescriptor, ValidationRule};
use crate::value::Value;

/// Returns `true` if the provided string is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value)
}

/// Returns `true` if the provided string parses as a URL with a scheme.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Returns `true` when `pattern` compiles and matches `value`.
pub fn matches_pattern(pattern: &str, value: &str) -> bool {
    Regex::new(pattern).map(|regex| regex.is_match(value)).unwrap_or(false)
}

/// Full years between `born` and `today`.
pub fn age_on(born: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    age
}

/// Checks a converted value against the field's domain rules.
///
/// `Null` values are never checked; absence is handled by the required-field logic.
pub(crate) fn check_rules(field: &FieldDescriptor, value: &Value, today: NaiveDate) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    if value.is_null() {
        return issues;
    }
    for rule in &field.validations {
        check_rule(field, rule, value, today, &mut issues);
    }
    issues
}

fn check_rule(field: &FieldDescriptor, rule: &ValidationRule, value: &Value, today: NaiveDate, issues: &mut Vec<FieldIssue>) {
    let key = field.key.as_str();
    match rule {
        ValidationRule::Length { min, max } => {
            if let Some(text) = value.as_str() {
                let len = text.chars().count();
                if let Some(min_len) = min
                    && len < *min_len
                {
                    issues.push(FieldIssue::range(key, format!("{key} must be at least {min_len} characters")));
                }
                if let Some(max_len) = max
                    && len > *max_len
                {
                    issues.push(FieldIssue::range(key, format!("{key} must be at most {max_len} characters")));
                }
            }
        }
        ValidationRule::Range { min, max } => {
            if let Some(candidate) = value.as_decimal() {
                let below = bound(min).is_some_and(|lower| candidate < lower);
                let above = bound(max).is_some_and(|upper| candidate > upper);
                if below || above {
                    issues.push(FieldIssue::range(key, range_message(key, min, max)));
                }
            }
        }
        ValidationRule::Regex { pattern } => {
            if let Some(text) = value.as_str()
                && !matches_pattern(pattern, text)
            {
                issues.push(FieldIssue::range(key, format!("{key} does not match pattern {pattern}")));
            }
        }
        ValidationRule::Email => {
            if let Some(text) = value.as_str()
                && !is_valid_email(text)
            {
                issues.push(FieldIssue::range(key, format!("{key} must be a valid email address")));
            }
        }
        ValidationRule::Url => {
            if let Some(text) = value.as_str()
                && !is_valid_url(text)
            {
                issues.push(FieldIssue::range(key, format!("{key} must be a valid URL")));
            }
        }
        ValidationRule::MinAge { years } => {
            if let Some(born) = value.as_date()
                && age_on(born, today) < i32::try_from(*years).unwrap_or(i32::MAX)
            {
                issues.push(FieldIssue::range(key, format!("{key} must be at least {years} years ago")));
            }
        }
    }
}

fn bound(repr: &Option<String>) -> Option<Decimal> {
    repr.as_deref().and_then(|text| Decimal::from_str(text).ok())
}

fn range_message(key: &str, min: &Option<String>, max: &Option<String>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{key} must be between {min} and {max}"),
        (Some(min), None) => format!("{key} must be at least {min}"),
        (None, Some(max)) => format!("{key} must be at most {max}"),
        (None, None) => format!("{key} is out of range"),
    }
}
