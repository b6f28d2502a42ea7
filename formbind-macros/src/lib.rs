use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod parsed;

use parsed::ParsedEntity;

/// Derives `formbind::Bindable` for a struct with named fields.
///
/// The container carries the compact format, fields carry keys, defaults and
/// domain rules:
///
/// ```text
/// #[derive(Deserialize, Serialize, Bindable)]
/// #[bind(compact = "product", positional(delimiter = "-", arity = "at_least"))]
/// pub struct CatalogProduct {
///     pub name: String,
///     pub category: String,
///     #[bind(validate(range(min = 0)))]
///     pub price: Decimal,
///     #[bind(skip_compact, default = "Standard")]
///     pub color: String,
/// }
/// ```
///
/// Keys default to the field name in PascalCase (`start_date` -> `StartDate`);
/// the entity name defaults to the type name in snake_case.
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ParsedEntity::from_input(&input) {
        Ok(parsed) => parsed.emit().into(),
        Err(err) => err.to_compile_error().into(),
    }
}
