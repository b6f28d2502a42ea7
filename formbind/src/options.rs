use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::{BindPolicy, DEFAULT_NULL_SENTINEL, ErrorPolicy, Schema};

/// Per-call knobs for parsing and binding.
///
/// Everything defaults to the schema's own settings; the `[parser]` section of
/// `formbind.toml` deserializes into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Overrides the schema's error policy when set.
    pub error_policy: Option<ErrorPolicy>,
    /// Overrides the schema's bind policy when set.
    pub bind_policy: Option<BindPolicy>,
    /// Token mapped to `Null` for optional fields, compared ignoring ASCII case.
    pub null_sentinel: String,
    /// Reference date for age rules; local today when unset.
    pub today: Option<NaiveDate>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_policy: None,
            bind_policy: None,
            null_sentinel: DEFAULT_NULL_SENTINEL.to_string(),
            today: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = Some(policy);
        self
    }

    pub fn with_bind_policy(mut self, policy: BindPolicy) -> Self {
        self.bind_policy = Some(policy);
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_null_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.null_sentinel = sentinel.into();
        self
    }

    pub fn effective_error_policy(&self, schema: &Schema) -> ErrorPolicy {
        self.error_policy.unwrap_or(schema.error_policy)
    }

    pub fn effective_bind_policy(&self, schema: &Schema) -> BindPolicy {
        self.bind_policy.unwrap_or(schema.bind_policy)
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn is_null_token(&self, raw: &str) -> bool {
        raw.eq_ignore_ascii_case(&self.null_sentinel)
    }
}
