use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{GenericArgument, PathArguments, Type, TypePath};

/// Semantic base of a supported field type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum FieldBase {
    Text,
    Integer(IntWidth),
    Decimal,
    Date,
    Boolean,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum IntWidth {
    /// Fits in i64; bounds come from the type's own MIN/MAX.
    Narrow(&'static str),
    /// u64/usize: capped at i64::MAX.
    WideUnsigned,
}

pub(crate) struct TypeInfo {
    pub optional: bool,
    pub base: FieldBase,
}

impl FieldBase {
    pub(crate) fn is_numeric(self) -> bool {
        matches!(self, FieldBase::Integer(_) | FieldBase::Decimal)
    }

    /// Bounds of an integer base as `(min, max)` i64 expressions.
    pub(crate) fn integer_bounds(self) -> Option<(TokenStream2, TokenStream2)> {
        match self {
            FieldBase::Integer(IntWidth::Narrow(name)) => {
                let ty = format_ident!("{}", name);
                Some((quote! { #ty::MIN as i64 }, quote! { #ty::MAX as i64 }))
            }
            FieldBase::Integer(IntWidth::WideUnsigned) => Some((quote! { 0i64 }, quote! { i64::MAX })),
            _ => None,
        }
    }
}

/// Classifies a field type, or returns `None` when it is unsupported.
pub(crate) fn classify_type(ty: &Type) -> Option<TypeInfo> {
    if let Some(inner) = unwrap_option(ty) {
        let info = classify_type(inner)?;
        if info.optional {
            return None;
        }
        return Some(TypeInfo {
            optional: true,
            base: info.base,
        });
    }

    let base = match last_ident_str(ty)?.as_str() {
        "String" => FieldBase::Text,
        "i8" => FieldBase::Integer(IntWidth::Narrow("i8")),
        "i16" => FieldBase::Integer(IntWidth::Narrow("i16")),
        "i32" => FieldBase::Integer(IntWidth::Narrow("i32")),
        "i64" => FieldBase::Integer(IntWidth::Narrow("i64")),
        "isize" => FieldBase::Integer(IntWidth::Narrow("isize")),
        "u8" => FieldBase::Integer(IntWidth::Narrow("u8")),
        "u16" => FieldBase::Integer(IntWidth::Narrow("u16")),
        "u32" => FieldBase::Integer(IntWidth::Narrow("u32")),
        "u64" | "usize" => FieldBase::Integer(IntWidth::WideUnsigned),
        "Decimal" => FieldBase::Decimal,
        "NaiveDate" => FieldBase::Date,
        "bool" => FieldBase::Boolean,
        _ => return None,
    };
    Some(TypeInfo { optional: false, base })
}

fn unwrap_option(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.first().and_then(|arg| match arg {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        }),
        _ => None,
    }
}

fn last_ident_str(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(TypePath { path, .. }) => path.segments.last().map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

/// Converts a snake_case identifier to PascalCase
pub(crate) fn to_pascal_case(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Converts a PascalCase identifier to snake_case
pub(crate) fn to_snake_case(name: &str) -> String {
    let mut result = String::new();
    for (i, ch) in name.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
