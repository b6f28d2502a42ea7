//! Ready-made entities for the common compact formats.
//!
//! Each type derives [`Bindable`](crate::Bindable), so its schema is
//! registered and reachable through [`find_schema`](crate::find_schema).

mod course;
mod employee;
mod product;
mod student;

pub use course::Course;
pub use employee::{Employee, EmployeeDraft};
pub use product::{CatalogProduct, Product, QuickProduct};
pub use student::{Student, StudentSignup};
