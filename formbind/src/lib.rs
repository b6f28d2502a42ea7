//! formbind core library.
//!
//! Turns compact delimited strings (`Name-Category-Price`,
//! `Key:Value|Key:Value`) and submitted form fields into validated records or
//! typed entities, reporting every problem as an ordered list of field issues.

extern crate self as formbind;

pub mod binding;
pub mod config;
mod convert;
pub mod entities;
pub mod errors;
pub mod format;
pub mod options;
pub mod parser;
pub mod registry;
pub mod store;
pub mod types;
pub mod validators;
pub mod value;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use binding::{FormValues, bind};
pub use errors::*;
pub use format::{format_record, format_record_with};
pub use formbind_macros::Bindable;
pub use options::ParseOptions;
pub use parser::parse;
pub use registry::{SchemaRegistration, find_schema, registered_schemas};
pub use types::Schema;
pub use value::{Record, Value};

// Re-export inventory for registration in the derive macro
pub use inventory;

/// A struct with a compile-time compact format.
///
/// Implemented by `#[derive(Bindable)]`; the provided methods route through
/// [`parse`], [`bind`] and [`format_record`] and decode the resulting record
/// with serde.
pub trait Bindable: DeserializeOwned + Sized {
    fn schema() -> &'static Schema;

    fn from_record(record: &Record) -> Result<Self, BindError> {
        record.decode()
    }

    fn parse_compact(raw: &str) -> Result<Self, BindError> {
        Self::parse_compact_with(raw, &ParseOptions::default())
    }

    fn parse_compact_with(raw: &str, options: &ParseOptions) -> Result<Self, BindError> {
        let record = parse(raw, Self::schema(), options)?;
        Self::from_record(&record)
    }

    fn bind_form(form: &FormValues) -> Result<Self, BindError> {
        Self::bind_form_with(form, &ParseOptions::default())
    }

    fn bind_form_with(form: &FormValues, options: &ParseOptions) -> Result<Self, BindError> {
        let record = bind(form, Self::schema(), options)?;
        Self::from_record(&record)
    }

    fn to_record(&self) -> Result<Record, BindError>
    where
        Self: Serialize,
    {
        Record::from_entity(self, Self::schema())
    }

    /// Canonical compact string for this entity.
    fn to_compact(&self) -> Result<String, BindError>
    where
        Self: Serialize,
    {
        self.to_compact_with(&ParseOptions::default())
    }

    /// Compact string that `parse_compact_with(options)` reads back.
    fn to_compact_with(&self, options: &ParseOptions) -> Result<String, BindError>
    where
        Self: Serialize,
    {
        let record = self.to_record()?;
        Ok(format_record_with(&record, Self::schema(), options)?)
    }
}
