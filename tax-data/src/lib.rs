//! Batch input for the tax calculator.
//!
//! [`csv_batch`] turns a `totalIncome,wht,donation` CSV file into validated
//! filings ready for [`tax_core::calculations::TaxCalculator::calculate_batch`];
//! [`ceilings`] loads the stored ceiling snapshot they are calculated against.

pub mod ceilings;
pub mod csv_batch;

pub use ceilings::{CeilingsError, load_ceilings};
pub use csv_batch::{CsvBatchError, EXPECTED_HEADER, parse_batch, parse_batch_str};
