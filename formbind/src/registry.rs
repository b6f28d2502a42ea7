//! Schema auto-registration via the inventory crate.
//!
//! `#[derive(Bindable)]` submits one [`SchemaRegistration`] per type, so the
//! CLI and other tooling can look schemas up by name at runtime.

use crate::errors::BindError;
use crate::types::Schema;

/// Metadata submitted to the inventory by the `Bindable` derive.
pub struct SchemaRegistration {
    /// The Rust type name (e.g. "CatalogProduct")
    pub type_name: &'static str,
    /// The entity name (e.g. "catalog_product")
    pub entity: &'static str,
    pub schema_fn: fn() -> &'static Schema,
}

impl SchemaRegistration {
    pub fn schema(&self) -> &'static Schema {
        (self.schema_fn)()
    }

    fn answers_to(&self, name: &str) -> bool {
        self.entity.eq_ignore_ascii_case(name) || self.type_name.eq_ignore_ascii_case(name)
    }
}

inventory::collect!(SchemaRegistration);

/// All registered schemas, sorted by entity name.
pub fn registered_schemas() -> Vec<&'static SchemaRegistration> {
    let mut all: Vec<_> = inventory::iter::<SchemaRegistration>().collect();
    all.sort_by_key(|registration| registration.entity);
    all
}

/// Looks a schema up by entity or type name, ignoring ASCII case.
pub fn find_schema(name: &str) -> Result<&'static Schema, BindError> {
    inventory::iter::<SchemaRegistration>()
        .find(|registration| registration.answers_to(name))
        .map(SchemaRegistration::schema)
        .ok_or_else(|| BindError::UnknownEntity { name: name.to_string() })
}
