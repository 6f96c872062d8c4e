//! Progressive bracket engine.
//!
//! Net income is taxed marginally: each bracket's rate applies only to the
//! slice of income between the previous bracket's upper bound and its own.
//! Withholding tax is settled against the bracket total afterwards, yielding
//! either an amount owed or a refund.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxBracketEngine;
//!
//! let engine = TaxBracketEngine::personal_income();
//! let result = engine.calculate_tax(dec!(1000001), dec!(0));
//!
//! assert_eq!(result.tax_owed, dec!(110000.2));
//! assert_eq!(result.rounded().tax_owed, dec!(110000));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::TaxBracket;
use crate::calculations::common::min;
use crate::models::{BracketTax, TaxResult};

/// Problems with a bracket table detected when building an engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    /// Upper bounds must be positive and strictly increasing.
    #[error("bracket {0} upper bound is not above the previous bound")]
    NotAscending(usize),

    #[error("bracket {0} has no upper bound but is not the last bracket")]
    UnboundedBeforeLast(usize),

    #[error("last bracket must be unbounded")]
    BoundedLast,

    #[error("bracket {index} rate must be in [0, 1), got {rate}")]
    InvalidRate { index: usize, rate: Decimal },
}

/// Applies a validated bracket table to net income.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBracketEngine {
    brackets: Vec<TaxBracket>,
}

impl TaxBracketEngine {
    /// Validates `brackets` and builds an engine over them.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        validate_table(&brackets)?;
        Ok(Self { brackets })
    }

    /// Engine over [`TaxBracket::personal_income_schedule`].
    pub fn personal_income() -> Self {
        Self {
            brackets: TaxBracket::personal_income_schedule(),
        }
    }

    /// Computes per-bracket tax for `net_income` and settles it against
    /// `wht`.
    ///
    /// The result is exact; use [`TaxResult::rounded`] for whole-unit totals.
    pub fn calculate_tax(
        &self,
        net_income: Decimal,
        wht: Decimal,
    ) -> TaxResult {
        if net_income < Decimal::ZERO {
            warn!(
                net_income = %net_income,
                "Net income is negative; no bracket tax applies"
            );
        }

        let breakdown = self.breakdown(net_income);
        let total_tax: Decimal = breakdown.iter().map(|b| b.tax).sum();
        let (tax_owed, refund) = settle(total_tax, wht);

        debug!(
            net_income = %net_income,
            total_tax = %total_tax,
            wht = %wht,
            tax_owed = %tax_owed,
            refund = %refund,
            "calculated bracket tax"
        );

        TaxResult {
            tax_owed,
            refund,
            breakdown,
        }
    }

    fn breakdown(
        &self,
        net_income: Decimal,
    ) -> Vec<BracketTax> {
        let mut lower = Decimal::ZERO;

        self.brackets
            .iter()
            .map(|bracket| {
                let tax = if net_income <= lower {
                    Decimal::ZERO
                } else {
                    let upper = bracket.max_income.map_or(net_income, |max| min(net_income, max));
                    (upper - lower) * bracket.tax_rate
                };
                if let Some(max) = bracket.max_income {
                    lower = max;
                }
                BracketTax {
                    level: bracket.label.clone(),
                    tax,
                }
            })
            .collect()
    }
}

/// Splits `total_tax - wht` into (owed, refund).
fn settle(
    total_tax: Decimal,
    wht: Decimal,
) -> (Decimal, Decimal) {
    let net = total_tax - wht;
    if net < Decimal::ZERO {
        (Decimal::ZERO, -net)
    } else {
        (net, Decimal::ZERO)
    }
}

fn validate_table(brackets: &[TaxBracket]) -> Result<(), BracketTableError> {
    if brackets.is_empty() {
        return Err(BracketTableError::Empty);
    }

    let last = brackets.len() - 1;
    let mut previous = Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate >= Decimal::ONE {
            return Err(BracketTableError::InvalidRate {
                index,
                rate: bracket.tax_rate,
            });
        }

        match bracket.max_income {
            Some(_) if index == last => return Err(BracketTableError::BoundedLast),
            None if index != last => return Err(BracketTableError::UnboundedBeforeLast(index)),
            Some(max) if max <= previous => return Err(BracketTableError::NotAscending(index)),
            Some(max) => previous = max,
            None => {}
        }
    }

    Ok(())
}
