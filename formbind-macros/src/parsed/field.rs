use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Error, Expr, ExprArray, ExprLit, ExprUnary, Field, Ident, Lit, LitInt, LitStr, Result, UnOp};

use super::types::{FieldBase, TypeInfo, classify_type, to_pascal_case};

pub(crate) struct ParsedField {
    pub ident: Ident,
    pub name: String,
    pub key: String,
    ty: TypeInfo,
    pub compact: bool,
    default: Option<String>,
    date_format: Option<String>,
    choice: Option<ChoiceSpec>,
    validations: Vec<ValidationData>,
}

struct ChoiceSpec {
    allowed: Vec<String>,
    case_insensitive: bool,
}

enum ValidationData {
    Length { min: Option<usize>, max: Option<usize> },
    Range { min: Option<String>, max: Option<String> },
    Regex { pattern: String },
    Email,
    Url,
    MinAge { years: u32 },
}

impl ParsedField {
    pub(crate) fn from_field(field: &Field) -> Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new(field.span(), "Bindable requires named fields"))?;
        let name = ident.unraw().to_string();
        let ty = classify_type(&field.ty).ok_or_else(|| {
            Error::new(
                field.ty.span(),
                "unsupported field type; expected String, an integer, Decimal, NaiveDate, bool or Option of one",
            )
        })?;

        let mut parsed = Self {
            key: to_pascal_case(&name),
            ident,
            name,
            ty,
            compact: true,
            default: None,
            date_format: None,
            choice: None,
            validations: Vec::new(),
        };

        for attr in &field.attrs {
            if attr.path().is_ident("bind") {
                parsed.parse_field_attr(attr)?;
            }
        }

        if !parsed.compact && !parsed.ty.optional && parsed.default.is_none() {
            return Err(Error::new(
                parsed.ident.span(),
                format!(
                    "`{}` is excluded from the compact format; give it a default or make it an Option",
                    parsed.name
                ),
            ));
        }

        Ok(parsed)
    }

    fn parse_field_attr(&mut self, attr: &Attribute) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().trim().is_empty() {
                    return Err(Error::new(value.span(), "key cannot be empty"));
                }
                self.key = value.value();
            } else if meta.path.is_ident("skip_compact") {
                self.compact = false;
            } else if meta.path.is_ident("default") {
                let value: LitStr = meta.value()?.parse()?;
                self.default = Some(value.value());
            } else if meta.path.is_ident("date_format") {
                if self.ty.base != FieldBase::Date {
                    return Err(meta.error("date_format requires a NaiveDate field"));
                }
                let value: LitStr = meta.value()?.parse()?;
                self.date_format = Some(value.value());
            } else if meta.path.is_ident("choice") {
                if self.ty.base != FieldBase::Text {
                    return Err(meta.error("choice requires a String field"));
                }
                self.choice = Some(parse_choice(&meta)?);
            } else if meta.path.is_ident("validate") {
                meta.parse_nested_meta(|rule| self.parse_validation_rule(rule))?;
            } else {
                return Err(meta.error("unknown bind field attribute"));
            }
            Ok(())
        })
    }

    fn parse_validation_rule(&mut self, rule: ParseNestedMeta) -> Result<()> {
        let ident = rule
            .path
            .get_ident()
            .cloned()
            .ok_or_else(|| Error::new(rule.path.span(), format!("unsupported validator on `{}`", self.name)))?;
        let base = self.ty.base;
        let data = match ident.to_string().as_str() {
            "length" => {
                ensure(base == FieldBase::Text, &ident, "length requires a String field")?;
                let mut min = None;
                let mut max = None;
                rule.parse_nested_meta(|item| {
                    if item.path.is_ident("min") {
                        let lit: LitInt = item.value()?.parse()?;
                        min = Some(lit.base10_parse()?);
                    } else if item.path.is_ident("max") {
                        let lit: LitInt = item.value()?.parse()?;
                        max = Some(lit.base10_parse()?);
                    } else {
                        return Err(item.error("expected `min` or `max`"));
                    }
                    Ok(())
                })?;
                ValidationData::Length { min, max }
            }
            "range" => {
                ensure(base.is_numeric(), &ident, "range requires an integer or Decimal field")?;
                let mut min = None;
                let mut max = None;
                rule.parse_nested_meta(|item| {
                    if item.path.is_ident("min") {
                        let expr: Expr = item.value()?.parse()?;
                        min = Some(numeric_literal(&expr)?);
                    } else if item.path.is_ident("max") {
                        let expr: Expr = item.value()?.parse()?;
                        max = Some(numeric_literal(&expr)?);
                    } else {
                        return Err(item.error("expected `min` or `max`"));
                    }
                    Ok(())
                })?;
                ValidationData::Range { min, max }
            }
            "regex" => {
                ensure(base == FieldBase::Text, &ident, "regex requires a String field")?;
                let lit: LitStr = rule.value()?.parse()?;
                let pattern = lit.value();
                if let Err(err) = regex::Regex::new(&pattern) {
                    return Err(Error::new(lit.span(), format!("invalid regex: {err}")));
                }
                ValidationData::Regex { pattern }
            }
            "email" => {
                ensure(base == FieldBase::Text, &ident, "email requires a String field")?;
                ValidationData::Email
            }
            "url" => {
                ensure(base == FieldBase::Text, &ident, "url requires a String field")?;
                ValidationData::Url
            }
            "min_age" => {
                ensure(base == FieldBase::Date, &ident, "min_age requires a NaiveDate field")?;
                let lit: LitInt = rule.value()?.parse()?;
                ValidationData::MinAge {
                    years: lit.base10_parse()?,
                }
            }
            other => {
                return Err(Error::new(ident.span(), format!("unknown validator `{other}` on `{}`", self.name)));
            }
        };
        self.validations.push(data);
        Ok(())
    }

    pub(crate) fn to_descriptor_tokens(&self) -> TokenStream2 {
        let name = LitStr::new(&self.name, Span::call_site());
        let key = LitStr::new(&self.key, Span::call_site());
        let kind = self.kind_tokens();
        let optional = self.ty.optional.then(|| quote! { .optional() });
        let skip = (!self.compact).then(|| quote! { .skip_compact() });
        let default = self.default.as_ref().map(|raw| {
            let lit = LitStr::new(raw, Span::call_site());
            quote! { .default_value(#lit) }
        });
        let rules = self.validations.iter().map(|data| {
            let rule = data.to_tokens();
            quote! { .validate(#rule) }
        });
        quote! {
            ::formbind::types::FieldDescriptor::new(#name, #key, #kind)
                #optional
                #skip
                #default
                #(#rules)*
        }
    }

    fn kind_tokens(&self) -> TokenStream2 {
        if let Some(choice) = &self.choice {
            let allowed = choice.allowed.iter().map(|value| {
                let lit = LitStr::new(value, Span::call_site());
                quote! { #lit.to_string() }
            });
            let case_insensitive = choice.case_insensitive;
            return quote! {
                ::formbind::types::FieldKind::Choice {
                    allowed: vec![#(#allowed),*],
                    case_insensitive: #case_insensitive,
                }
            };
        }
        match self.ty.base {
            FieldBase::Text => quote! { ::formbind::types::FieldKind::Text },
            FieldBase::Integer(_) => {
                let (min, max) = self
                    .ty
                    .base
                    .integer_bounds()
                    .unwrap_or_else(|| (quote! { i64::MIN }, quote! { i64::MAX }));
                quote! { ::formbind::types::FieldKind::Integer { min: #min, max: #max } }
            }
            FieldBase::Decimal => quote! { ::formbind::types::FieldKind::Decimal },
            FieldBase::Date => match &self.date_format {
                Some(format) => {
                    let lit = LitStr::new(format, Span::call_site());
                    quote! { ::formbind::types::FieldKind::Date { format: #lit.to_string() } }
                }
                None => quote! { ::formbind::types::FieldKind::date() },
            },
            FieldBase::Boolean => quote! { ::formbind::types::FieldKind::Boolean },
        }
    }
}

impl ValidationData {
    fn to_tokens(&self) -> TokenStream2 {
        match self {
            ValidationData::Length { min, max } => {
                let min = optional_usize_tokens(*min);
                let max = optional_usize_tokens(*max);
                quote! { ::formbind::types::ValidationRule::Length { min: #min, max: #max } }
            }
            ValidationData::Range { min, max } => {
                let min = optional_string_tokens(min);
                let max = optional_string_tokens(max);
                quote! { ::formbind::types::ValidationRule::Range { min: #min, max: #max } }
            }
            ValidationData::Regex { pattern } => {
                let lit = LitStr::new(pattern, Span::call_site());
                quote! { ::formbind::types::ValidationRule::Regex { pattern: #lit.to_string() } }
            }
            ValidationData::Email => quote! { ::formbind::types::ValidationRule::Email },
            ValidationData::Url => quote! { ::formbind::types::ValidationRule::Url },
            ValidationData::MinAge { years } => quote! { ::formbind::types::ValidationRule::MinAge { years: #years } },
        }
    }
}

fn parse_choice(meta: &ParseNestedMeta) -> Result<ChoiceSpec> {
    let mut allowed = Vec::new();
    let mut case_insensitive = false;
    meta.parse_nested_meta(|item| {
        if item.path.is_ident("allowed") {
            let array: ExprArray = item.value()?.parse()?;
            for element in &array.elems {
                match element {
                    Expr::Lit(ExprLit { lit: Lit::Str(lit), .. }) => allowed.push(lit.value()),
                    other => return Err(Error::new(other.span(), "choice values must be string literals")),
                }
            }
        } else if item.path.is_ident("case_insensitive") {
            case_insensitive = true;
        } else {
            return Err(item.error("expected `allowed` or `case_insensitive`"));
        }
        Ok(())
    })?;
    if allowed.is_empty() {
        return Err(meta.error("choice requires at least one allowed value"));
    }
    Ok(ChoiceSpec {
        allowed,
        case_insensitive,
    })
}

/// Source text of an integer or float literal, optionally negated.
fn numeric_literal(expr: &Expr) -> Result<String> {
    match expr {
        Expr::Lit(ExprLit { lit: Lit::Int(lit), .. }) => Ok(lit.base10_digits().to_string()),
        Expr::Lit(ExprLit { lit: Lit::Float(lit), .. }) => Ok(lit.base10_digits().to_string()),
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(_), expr, ..
        }) => numeric_literal(expr).map(|digits| format!("-{digits}")),
        other => Err(Error::new(other.span(), "range bounds must be numeric literals")),
    }
}

fn ensure(condition: bool, ident: &Ident, message: &str) -> Result<()> {
    if condition { Ok(()) } else { Err(Error::new(ident.span(), message)) }
}

fn optional_usize_tokens(value: Option<usize>) -> TokenStream2 {
    match value {
        Some(v) => quote! { Some(#v) },
        None => quote! { None },
    }
}

fn optional_string_tokens(value: &Option<String>) -> TokenStream2 {
    match value {
        Some(v) => {
            let lit = LitStr::new(v, Span::call_site());
            quote! { Some(#lit.to_string()) }
        }
        None => quote! { None },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(tokens: syn::FieldsNamed) -> Result<ParsedField> {
        let first = tokens.named.first().cloned().expect("one field");
        ParsedField::from_field(&first)
    }

    #[test]
    fn key_defaults_to_pascal_case() {
        let parsed = field(syn::parse_quote!({ start_date: NaiveDate })).expect("parsed");
        assert_eq!(parsed.key, "StartDate");
        assert!(parsed.compact);
    }

    #[test]
    fn excluded_field_needs_default_or_option() {
        let err = field(syn::parse_quote!({ #[bind(skip_compact)] color: String }))
            .err()
            .expect("rejected");
        assert!(err.to_string().contains("excluded from the compact format"));
        assert!(field(syn::parse_quote!({ #[bind(skip_compact, default = "Mist")] color: String })).is_ok());
        assert!(field(syn::parse_quote!({ #[bind(skip_compact)] image_url: Option<String> })).is_ok());
    }

    #[test]
    fn rejects_invalid_regex_and_range_bounds() {
        assert!(field(syn::parse_quote!({ #[bind(validate(regex = "(unclosed"))] phone: String })).is_err());
        assert!(field(syn::parse_quote!({ #[bind(validate(range(min = "zero")))] price: Decimal })).is_err());
        assert!(field(syn::parse_quote!({ #[bind(validate(range(min = 0, max = 4.0)))] gpa: Decimal })).is_ok());
    }

    #[test]
    fn negative_bounds_keep_their_sign() {
        let expr: Expr = syn::parse_quote!(-10);
        assert_eq!(numeric_literal(&expr).expect("numeric"), "-10");
    }

    #[test]
    fn rules_must_match_the_field_type() {
        assert!(field(syn::parse_quote!({ #[bind(validate(email))] age: u32 })).is_err());
        assert!(field(syn::parse_quote!({ #[bind(validate(min_age = 18))] name: String })).is_err());
    }
}
