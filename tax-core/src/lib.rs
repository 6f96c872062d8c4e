//! Core types and calculations for Thai personal income tax.
//!
//! - [`models`]: filings, allowance ceilings, bracket tables and results.
//! - [`validation`]: rules applied to user and admin input.
//! - [`calculations`]: allowance aggregation and the bracket engine.
//! - [`db`]: the storage trait implemented by backend crates.

pub mod calculations;
pub mod db;
pub mod models;
pub mod validation;

pub use db::repository::{RepositoryError, TaxRepository};
pub use models::*;
pub use validation::ValidationError;
