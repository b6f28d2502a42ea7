use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Bindable;

/// `Name-Description-Price`; trailing segments are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Bindable)]
#[bind(compact = "product", positional(delimiter = "-", arity = "at_least"))]
pub struct Product {
    pub name: String,
    pub description: String,
    #[bind(validate(range(min = 0)))]
    pub price: Decimal,
}

/// `Name-Category-Price`, with catalog defaults for everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Bindable)]
#[bind(compact = "product", positional(delimiter = "-", arity = "at_least"))]
pub struct CatalogProduct {
    pub name: String,
    pub category: String,
    #[bind(validate(range(min = 0)))]
    pub price: Decimal,
    #[bind(skip_compact, default = "Standard")]
    pub color: String,
    #[bind(skip_compact, default = "1", validate(range(min = 0)))]
    pub available_quantity: u32,
    #[bind(skip_compact, default = "https://placehold.co/600x600?text=Fast+Track", validate(url))]
    pub image_url: Option<String>,
}

/// Quick-entry product: standard form fields first, `RawProduct` fills the gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Bindable)]
#[bind(compact = "RawProduct", positional(delimiter = "-"), merge)]
pub struct QuickProduct {
    pub name: String,
    #[bind(validate(range(min = 0)))]
    pub price: Decimal,
    #[bind(validate(range(min = 0)))]
    pub quantity: i32,
    pub status: bool,
}
