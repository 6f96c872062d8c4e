use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;

/// Tax attributed to one bracket of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTax {
    pub level: String,
    pub tax: Decimal,
}

/// Outcome of a calculation after withholding tax has been settled.
///
/// At most one of `tax_owed` and `refund` is non-zero; both are zero when
/// withholding exactly matches the computed tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub tax_owed: Decimal,
    pub refund: Decimal,
    pub breakdown: Vec<BracketTax>,
}

impl TaxResult {
    /// Sum of the per-bracket amounts, before withholding.
    pub fn total_tax(&self) -> Decimal {
        self.breakdown.iter().map(|b| b.tax).sum()
    }

    /// Copy with `tax_owed` and `refund` rounded to whole currency units.
    /// Breakdown entries keep their precision.
    pub fn rounded(&self) -> Self {
        Self {
            tax_owed: round_half_up(self.tax_owed),
            refund: round_half_up(self.refund),
            breakdown: self.breakdown.clone(),
        }
    }
}

/// One row of a batch calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTaxResult {
    pub total_income: Decimal,
    pub result: TaxResult,
}
