use std::fmt;

use thiserror::Error;

/// Top-level error type returned by typed binding operations.
#[derive(Debug, Error)]
pub enum BindError {
    /// The input was rejected for one or more fields.
    #[error("binding failed: {0}")]
    Invalid(#[from] FieldErrors),

    /// A validated record could not be decoded into the target type.
    #[error("failed to decode {entity} record: {source}")]
    Decode {
        entity: String,
        #[source]
        source: serde_json::Error,
    },

    /// An entity could not be encoded back into a record.
    #[error("failed to encode {entity}: {source}")]
    Encode {
        entity: String,
        #[source]
        source: serde_json::Error,
    },

    /// No schema is registered under the requested name.
    #[error("no schema registered for '{name}'")]
    UnknownEntity { name: String },

    /// Configuration could not be read or parsed.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

/// Distinguishes the conditions a compact string or form can fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueKind {
    /// Wrong number of delimited segments, or a pair without a separator.
    Format,
    /// Key:value input named a key the schema does not know.
    UnknownField,
    /// A segment could not be converted to the declared type.
    Conversion,
    /// A converted value violates a domain rule (bounds, length, pattern, age).
    Range,
    /// A required field had no value.
    Missing,
}

impl IssueKind {
    /// Stable machine-readable code for the kind.
    pub fn code(self) -> &'static str {
        match self {
            IssueKind::Format => "bind.format",
            IssueKind::UnknownField => "bind.unknown_field",
            IssueKind::Conversion => "bind.conversion",
            IssueKind::Range => "bind.range",
            IssueKind::Missing => "bind.missing",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Detailed failure for a single field, key, or the compact input as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub kind: IssueKind,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    pub fn format(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, IssueKind::Format, message)
    }

    pub fn unknown_field(key: &str) -> Self {
        Self::new(key, IssueKind::UnknownField, format!("unknown field: {key}"))
    }

    pub fn conversion(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, IssueKind::Conversion, message)
    }

    pub fn range(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(field, IssueKind::Range, message)
    }

    pub fn missing(key: &str) -> Self {
        Self::new(key, IssueKind::Missing, format!("missing required field: {key}"))
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered list of issues produced by a failed parse or bind.
///
/// Never empty when returned as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct FieldErrors {
    pub issues: Vec<FieldIssue>,
}

impl FieldErrors {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = FieldIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for a single-issue error list.
    pub fn single(issue: FieldIssue) -> Self {
        Self { issues: vec![issue] }
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Issues of the given kind, in order.
    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &FieldIssue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    pub fn has_kind(&self, kind: IssueKind) -> bool {
        self.of_kind(kind).next().is_some()
    }

    /// Human-readable messages, suitable for display next to the originating form.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for issue in &self.issues {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
            first = false;
        }
        Ok(())
    }
}

impl IntoIterator for FieldErrors {
    type Item = FieldIssue;
    type IntoIter = std::vec::IntoIter<FieldIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

/// Result alias for parser and adapter output.
pub type BindResult<T> = Result<T, FieldErrors>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_codes_are_distinct() {
        let kinds = [
            IssueKind::Format,
            IssueKind::UnknownField,
            IssueKind::Conversion,
            IssueKind::Range,
            IssueKind::Missing,
        ];
        let mut codes: Vec<&str> = kinds.iter().map(|kind| kind.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn display_joins_issues_in_order() {
        let errors = FieldErrors::new([
            FieldIssue::unknown_field("Age"),
            FieldIssue::missing("Email"),
        ]);
        assert_eq!(errors.to_string(), "Age: unknown field: Age; Email: missing required field: Email");
        assert!(errors.has_kind(IssueKind::Missing));
        assert!(!errors.has_kind(IssueKind::Range));
    }
}
