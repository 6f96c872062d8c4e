//! Tax calculations for Thai personal income tax.
//!
//! Calculation runs in two stages: [`AllowanceAggregator`] reduces claims to
//! a capped deduction, then [`TaxBracketEngine`] taxes the remaining net
//! income and settles withholding. [`TaxCalculator`] wires the two together.

pub mod allowance;
pub mod brackets;
pub mod calculator;
pub mod common;

pub use allowance::AllowanceAggregator;
pub use brackets::{BracketTableError, TaxBracketEngine};
pub use calculator::TaxCalculator;
