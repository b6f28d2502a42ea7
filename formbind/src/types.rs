use serde::{Deserialize, Serialize};

/// Default date format used when a field does not declare one.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default token meaning "no value" for optional fields.
pub const DEFAULT_NULL_SENTINEL: &str = "NULL";

/// Compile-time description of an entity's compact format and fields.
///
/// Emitted by `#[derive(Bindable)]`, or assembled by hand with the builder
/// methods below.
///
/// # Examples
///
/// ```
/// use formbind::types::{FieldDescriptor, FieldKind, Schema};
///
/// let schema = Schema::positional("product", "-")
///     .field(FieldDescriptor::new("name", "Name", FieldKind::Text))
///     .field(FieldDescriptor::new("price", "Price", FieldKind::Decimal));
/// assert_eq!(schema.expected_layout(), "Name-Price");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub entity: String,
    pub type_name: String,
    /// Form key that carries the compact string.
    pub compact_field: String,
    pub format: CompactFormat,
    pub error_policy: ErrorPolicy,
    pub bind_policy: BindPolicy,
    /// Whether segments and values are trimmed before conversion.
    pub trim: bool,
    pub fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Starts a positional schema with exact arity and fail-fast errors.
    pub fn positional(entity: impl Into<String>, delimiter: impl Into<String>) -> Self {
        let format = CompactFormat::Positional {
            delimiter: delimiter.into(),
            arity: Arity::Exact,
        };
        Self::with_format(entity.into(), format)
    }

    /// Starts a key:value schema with collect-all errors.
    pub fn key_value(
        entity: impl Into<String>,
        pair_delimiter: impl Into<String>,
        separator: impl Into<String>,
    ) -> Self {
        let format = CompactFormat::KeyValue {
            pair_delimiter: pair_delimiter.into(),
            separator: separator.into(),
        };
        Self::with_format(entity.into(), format)
    }

    fn with_format(entity: String, format: CompactFormat) -> Self {
        Self {
            type_name: entity.clone(),
            compact_field: entity.clone(),
            entity,
            error_policy: ErrorPolicy::default_for(&format),
            format,
            bind_policy: BindPolicy::EitherOr,
            trim: true,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn compact_field(mut self, name: impl Into<String>) -> Self {
        self.compact_field = name.into();
        self
    }

    pub fn type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = name.into();
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        if let CompactFormat::Positional { arity: current, .. } = &mut self.format {
            *current = arity;
        }
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn bind_policy(mut self, policy: BindPolicy) -> Self {
        self.bind_policy = policy;
        self
    }

    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Fields that participate in the compact format, in declaration order.
    pub fn compact_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.compact)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Looks up a compact field by key, ignoring ASCII case.
    pub fn compact_field_by_key(&self, key: &str) -> Option<(usize, &FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.compact && field.key.eq_ignore_ascii_case(key))
    }

    /// Human-readable layout of the compact format, e.g. `Name-Category-Price`.
    pub fn expected_layout(&self) -> String {
        match &self.format {
            CompactFormat::Positional { delimiter, .. } => self
                .compact_fields()
                .map(|field| field.key.as_str())
                .collect::<Vec<_>>()
                .join(delimiter),
            CompactFormat::KeyValue {
                pair_delimiter,
                separator,
            } => self
                .compact_fields()
                .map(|field| format!("{}{separator}value", field.key))
                .collect::<Vec<_>>()
                .join(pair_delimiter),
        }
    }
}

/// How the compact string encodes its fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CompactFormat {
    /// Values in fixed order, separated by `delimiter`.
    Positional { delimiter: String, arity: Arity },
    /// `key{separator}value` pairs joined by `pair_delimiter`.
    KeyValue { pair_delimiter: String, separator: String },
}

impl CompactFormat {
    pub fn is_positional(&self) -> bool {
        matches!(self, CompactFormat::Positional { .. })
    }
}

/// Accepted segment count for positional formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// The segment count must equal the number of compact fields.
    #[default]
    Exact,
    /// At least that many segments; surplus segments are ignored.
    AtLeast,
}

/// Whether the first issue stops the parse or all issues are gathered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    FailFast,
    CollectAll,
}

impl ErrorPolicy {
    /// Positional formats stop at the first issue; key:value formats collect.
    pub fn default_for(format: &CompactFormat) -> Self {
        if format.is_positional() {
            ErrorPolicy::FailFast
        } else {
            ErrorPolicy::CollectAll
        }
    }
}

/// How the binding adapter combines compact and standard form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindPolicy {
    /// A non-blank compact field wins outright; otherwise standard fields are read.
    #[default]
    EitherOr,
    /// Standard fields first, compact values fill the gaps field by field.
    Merge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    /// Record key; matches the Rust field name for derived schemas.
    pub name: String,
    /// Key used in key:value input, standard form lookup and messages.
    pub key: String,
    pub kind: FieldKind,
    pub optional: bool,
    /// Whether the field is part of the compact format.
    pub compact: bool,
    /// Raw value applied when the input does not supply one.
    pub default: Option<String>,
    pub validations: Vec<ValidationRule>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            kind,
            optional: false,
            compact: true,
            default: None,
            validations: Vec::new(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn skip_compact(mut self) -> Self {
        self.compact = false;
        self
    }

    pub fn default_value(mut self, raw: impl Into<String>) -> Self {
        self.default = Some(raw.into());
        self
    }

    pub fn validate(mut self, rule: ValidationRule) -> Self {
        self.validations.push(rule);
        self
    }
}

/// Semantic type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    /// Whole number bounded by the width of the target Rust type.
    Integer { min: i64, max: i64 },
    Decimal,
    Date { format: String },
    Boolean,
    /// One of a fixed set of strings; stored in its canonical spelling.
    Choice { allowed: Vec<String>, case_insensitive: bool },
}

impl FieldKind {
    pub fn integer() -> Self {
        FieldKind::Integer {
            min: i64::MIN,
            max: i64::MAX,
        }
    }

    pub fn date() -> Self {
        FieldKind::Date {
            format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Decimal => "decimal",
            FieldKind::Date { .. } => "date",
            FieldKind::Boolean => "boolean",
            FieldKind::Choice { .. } => "choice",
        }
    }
}

/// Domain rule checked after a value converts successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationRule {
    Length { min: Option<usize>, max: Option<usize> },
    /// Inclusive numeric bounds, kept as their source text.
    Range { min: Option<String>, max: Option<String> },
    Regex { pattern: String },
    Email,
    Url,
    /// Dates only: at least `years` full years before today.
    MinAge { years: u32 },
}

impl ValidationRule {
    pub fn describe(&self) -> String {
        match self {
            ValidationRule::Length { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("length {min}..={max}"),
                (Some(min), None) => format!("length >= {min}"),
                (None, Some(max)) => format!("length <= {max}"),
                (None, None) => "length".to_string(),
            },
            ValidationRule::Range { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("range {min}..={max}"),
                (Some(min), None) => format!(">= {min}"),
                (None, Some(max)) => format!("<= {max}"),
                (None, None) => "range".to_string(),
            },
            ValidationRule::Regex { pattern } => format!("matches {pattern}"),
            ValidationRule::Email => "email".to_string(),
            ValidationRule::Url => "url".to_string(),
            ValidationRule::MinAge { years } => format!("age >= {years}"),
        }
    }
}
