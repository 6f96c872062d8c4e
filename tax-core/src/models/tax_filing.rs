use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::AllowanceClaim;

/// An allowance line exactly as submitted, before its type is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceInput {
    pub allowance_type: String,
    pub amount: Decimal,
}

/// Unvalidated calculation request.
///
/// Call [`TaxFilingInput::validate`] to obtain a [`TaxFiling`] the
/// calculator accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxFilingInput {
    pub total_income: Decimal,
    #[serde(default)]
    pub wht: Decimal,
    #[serde(default)]
    pub allowances: Vec<AllowanceInput>,
}

/// A validated filing: non-negative income, WHT within income, and only
/// recognised, non-negative allowance claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxFiling {
    pub(crate) total_income: Decimal,
    pub(crate) wht: Decimal,
    pub(crate) allowances: Vec<AllowanceClaim>,
}

impl TaxFiling {
    pub fn total_income(&self) -> Decimal {
        self.total_income
    }

    pub fn wht(&self) -> Decimal {
        self.wht
    }

    pub fn allowances(&self) -> &[AllowanceClaim] {
        &self.allowances
    }
}
