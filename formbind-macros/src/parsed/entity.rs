use std::collections::HashMap;

use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Data, DeriveInput, Error, Fields, Ident, LitStr, Result};

use super::field::ParsedField;
use super::types::to_snake_case;

pub(crate) struct ParsedEntity {
    name: Ident,
    entity: String,
    compact: String,
    format: FormatSpec,
    errors: Option<ErrorsSpec>,
    merge: bool,
    no_trim: bool,
    fields: Vec<ParsedField>,
}

enum FormatSpec {
    Positional { delimiter: String, at_least: bool },
    KeyValue { pairs: String, separator: String },
}

#[derive(Clone, Copy)]
enum ErrorsSpec {
    FailFast,
    CollectAll,
}

#[derive(Default)]
struct ContainerAttrs {
    entity: Option<String>,
    compact: Option<String>,
    format: Option<FormatSpec>,
    errors: Option<ErrorsSpec>,
    merge: bool,
    no_trim: bool,
}

impl ParsedEntity {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        if !input.generics.params.is_empty() {
            return Err(Error::new_spanned(&input.generics, "Bindable does not support generic types"));
        }

        let mut attrs = ContainerAttrs::default();
        for attr in &input.attrs {
            if attr.path().is_ident("bind") {
                Self::parse_container_attr(attr, &mut attrs)?;
            }
        }

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named
                    .named
                    .iter()
                    .map(ParsedField::from_field)
                    .collect::<Result<Vec<_>>>()?,
                _ => return Err(Error::new(input.ident.span(), "Bindable requires named fields")),
            },
            _ => return Err(Error::new(input.ident.span(), "Bindable can only be derived for structs")),
        };

        let format = attrs.format.ok_or_else(|| {
            Error::new(
                input.ident.span(),
                "Bindable requires #[bind(positional(delimiter = \"..\"))] or #[bind(key_value(..))]",
            )
        })?;

        Self::check_keys(&fields)?;
        if !fields.iter().any(|field| field.compact) {
            return Err(Error::new(input.ident.span(), "Bindable needs at least one compact field"));
        }

        let entity = attrs.entity.unwrap_or_else(|| to_snake_case(&input.ident.to_string()));
        Ok(Self {
            name: input.ident.clone(),
            compact: attrs.compact.unwrap_or_else(|| entity.clone()),
            entity,
            format,
            errors: attrs.errors,
            merge: attrs.merge,
            no_trim: attrs.no_trim,
            fields,
        })
    }

    fn parse_container_attr(attr: &Attribute, attrs: &mut ContainerAttrs) -> Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("entity") {
                attrs.entity = Some(non_empty(&meta, "entity")?);
            } else if meta.path.is_ident("compact") {
                attrs.compact = Some(non_empty(&meta, "compact")?);
            } else if meta.path.is_ident("positional") {
                if attrs.format.is_some() {
                    return Err(meta.error("only one compact format may be declared"));
                }
                attrs.format = Some(Self::parse_positional(&meta)?);
            } else if meta.path.is_ident("key_value") {
                if attrs.format.is_some() {
                    return Err(meta.error("only one compact format may be declared"));
                }
                attrs.format = Some(Self::parse_key_value(&meta)?);
            } else if meta.path.is_ident("errors") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.errors = Some(match value.value().as_str() {
                    "fail_fast" => ErrorsSpec::FailFast,
                    "collect_all" => ErrorsSpec::CollectAll,
                    other => {
                        return Err(Error::new(
                            value.span(),
                            format!("unknown error policy `{other}`, expected `fail_fast` or `collect_all`"),
                        ));
                    }
                });
            } else if meta.path.is_ident("merge") {
                attrs.merge = true;
            } else if meta.path.is_ident("no_trim") {
                attrs.no_trim = true;
            } else {
                return Err(meta.error("unknown bind container attribute"));
            }
            Ok(())
        })
    }

    fn parse_positional(meta: &ParseNestedMeta) -> Result<FormatSpec> {
        let mut delimiter = None;
        let mut at_least = false;
        meta.parse_nested_meta(|item| {
            if item.path.is_ident("delimiter") {
                delimiter = Some(non_empty(&item, "delimiter")?);
            } else if item.path.is_ident("arity") {
                let value: LitStr = item.value()?.parse()?;
                at_least = match value.value().as_str() {
                    "exact" => false,
                    "at_least" => true,
                    other => {
                        return Err(Error::new(
                            value.span(),
                            format!("unknown arity `{other}`, expected `exact` or `at_least`"),
                        ));
                    }
                };
            } else {
                return Err(item.error("expected `delimiter` or `arity`"));
            }
            Ok(())
        })?;
        let delimiter = delimiter.ok_or_else(|| meta.error("positional format requires a delimiter"))?;
        Ok(FormatSpec::Positional { delimiter, at_least })
    }

    fn parse_key_value(meta: &ParseNestedMeta) -> Result<FormatSpec> {
        let mut pairs = "|".to_string();
        let mut separator = ":".to_string();
        if meta.input.peek(syn::token::Paren) {
            meta.parse_nested_meta(|item| {
                if item.path.is_ident("pairs") {
                    pairs = non_empty(&item, "pairs")?;
                } else if item.path.is_ident("separator") {
                    separator = non_empty(&item, "separator")?;
                } else {
                    return Err(item.error("expected `pairs` or `separator`"));
                }
                Ok(())
            })?;
        }
        if pairs == separator {
            return Err(meta.error("pair delimiter and separator must differ"));
        }
        Ok(FormatSpec::KeyValue { pairs, separator })
    }

    fn check_keys(fields: &[ParsedField]) -> Result<()> {
        let mut seen: HashMap<String, &ParsedField> = HashMap::new();
        for field in fields {
            if let Some(previous) = seen.insert(field.key.to_lowercase(), field) {
                return Err(Error::new(
                    field.ident.span(),
                    format!("`{}` reuses key `{}` already used by `{}`", field.name, field.key, previous.name),
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let name = &self.name;
        let type_name = LitStr::new(&name.to_string(), Span::call_site());
        let entity = LitStr::new(&self.entity, Span::call_site());
        let compact = LitStr::new(&self.compact, Span::call_site());

        let constructor = match &self.format {
            FormatSpec::Positional { delimiter, at_least } => {
                let delimiter = LitStr::new(delimiter, Span::call_site());
                let arity = if *at_least {
                    quote! { ::formbind::types::Arity::AtLeast }
                } else {
                    quote! { ::formbind::types::Arity::Exact }
                };
                quote! { ::formbind::types::Schema::positional(#entity, #delimiter).arity(#arity) }
            }
            FormatSpec::KeyValue { pairs, separator } => {
                let pairs = LitStr::new(pairs, Span::call_site());
                let separator = LitStr::new(separator, Span::call_site());
                quote! { ::formbind::types::Schema::key_value(#entity, #pairs, #separator) }
            }
        };

        let errors = self.errors.map(|policy| match policy {
            ErrorsSpec::FailFast => quote! { .error_policy(::formbind::types::ErrorPolicy::FailFast) },
            ErrorsSpec::CollectAll => quote! { .error_policy(::formbind::types::ErrorPolicy::CollectAll) },
        });
        let merge = self
            .merge
            .then(|| quote! { .bind_policy(::formbind::types::BindPolicy::Merge) });
        let no_trim = self.no_trim.then(|| quote! { .trim(false) });
        let fields = self.fields.iter().map(|field| {
            let descriptor = field.to_descriptor_tokens();
            quote! { .field(#descriptor) }
        });

        quote! {
            impl ::formbind::Bindable for #name {
                fn schema() -> &'static ::formbind::types::Schema {
                    static SCHEMA: ::std::sync::OnceLock<::formbind::types::Schema> = ::std::sync::OnceLock::new();
                    SCHEMA.get_or_init(|| {
                        #constructor
                            .compact_field(#compact)
                            .type_name(#type_name)
                            #errors
                            #merge
                            #no_trim
                            #(#fields)*
                    })
                }
            }

            ::formbind::inventory::submit! {
                ::formbind::registry::SchemaRegistration {
                    type_name: #type_name,
                    entity: #entity,
                    schema_fn: <#name as ::formbind::Bindable>::schema,
                }
            }
        }
    }
}

fn non_empty(meta: &ParseNestedMeta, what: &str) -> Result<String> {
    let value: LitStr = meta.value()?.parse()?;
    if value.value().is_empty() {
        return Err(Error::new(value.span(), format!("{what} cannot be empty")));
    }
    Ok(value.value())
}
