//! Input validation performed before anything reaches the calculator.
//!
//! The calculations themselves accept any numeric input; every rule about
//! what a taxpayer or an administrator may submit lives here.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AllowanceClaim, AllowanceType, TaxFiling, TaxFilingInput};

/// Lowest personal deduction an administrator may configure.
pub const PERSONAL_DEDUCTION_MIN: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Highest personal deduction an administrator may configure.
pub const PERSONAL_DEDUCTION_MAX: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Highest k-receipt ceiling an administrator may configure.
pub const K_RECEIPT_CEILING_MAX: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Rejections raised while validating user or admin input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("total income must be greater than or equal to 0")]
    InvalidTotalIncome,

    #[error("wht must be greater than or equal to 0 and less than or equal to total income")]
    InvalidWht,

    #[error("allowances must be donation and k-receipt only, got '{0}'")]
    InvalidAllowanceType(String),

    #[error("allowance amount must be greater than or equal to 0")]
    InvalidAllowanceAmount,

    #[error("personal deduction must be at least 10000, got {0}")]
    PersonalDeductionTooLow(Decimal),

    #[error("personal deduction must not exceed 100000, got {0}")]
    PersonalDeductionTooHigh(Decimal),

    #[error("k-receipt ceiling must be greater than 0, got {0}")]
    KReceiptCeilingTooLow(Decimal),

    #[error("k-receipt ceiling must not exceed 100000, got {0}")]
    KReceiptCeilingTooHigh(Decimal),
}

impl TaxFilingInput {
    /// Checks the request field by field and converts it into a [`TaxFiling`].
    ///
    /// Fields are checked in order (income, WHT, then each allowance) and the
    /// first failure is returned.
    pub fn validate(self) -> Result<TaxFiling, ValidationError> {
        validate_total_income(self.total_income)?;
        validate_wht(self.wht, self.total_income)?;

        let allowances = self
            .allowances
            .into_iter()
            .map(|input| {
                let allowance_type = AllowanceType::parse(&input.allowance_type)
                    .ok_or(ValidationError::InvalidAllowanceType(input.allowance_type))?;
                let claim = AllowanceClaim::new(allowance_type, input.amount);
                validate_claim(&claim)?;
                Ok(claim)
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Ok(TaxFiling {
            total_income: self.total_income,
            wht: self.wht,
            allowances,
        })
    }
}

impl TaxFiling {
    /// Builds a filing from already-typed claims, applying the same rules as
    /// [`TaxFilingInput::validate`].
    pub fn new(
        total_income: Decimal,
        wht: Decimal,
        allowances: Vec<AllowanceClaim>,
    ) -> Result<Self, ValidationError> {
        validate_total_income(total_income)?;
        validate_wht(wht, total_income)?;
        for claim in &allowances {
            validate_claim(claim)?;
        }

        Ok(Self {
            total_income,
            wht,
            allowances,
        })
    }
}

fn validate_total_income(total_income: Decimal) -> Result<(), ValidationError> {
    if total_income < Decimal::ZERO {
        return Err(ValidationError::InvalidTotalIncome);
    }
    Ok(())
}

fn validate_wht(
    wht: Decimal,
    total_income: Decimal,
) -> Result<(), ValidationError> {
    if wht < Decimal::ZERO || wht > total_income {
        return Err(ValidationError::InvalidWht);
    }
    Ok(())
}

fn validate_claim(claim: &AllowanceClaim) -> Result<(), ValidationError> {
    if claim.amount < Decimal::ZERO {
        return Err(ValidationError::InvalidAllowanceAmount);
    }
    Ok(())
}

/// Range check for the admin personal-deduction update.
pub fn validate_personal_deduction(amount: Decimal) -> Result<(), ValidationError> {
    if amount < PERSONAL_DEDUCTION_MIN {
        return Err(ValidationError::PersonalDeductionTooLow(amount));
    }
    if amount > PERSONAL_DEDUCTION_MAX {
        return Err(ValidationError::PersonalDeductionTooHigh(amount));
    }
    Ok(())
}

/// Range check for the admin k-receipt ceiling update.
pub fn validate_k_receipt_ceiling(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::KReceiptCeilingTooLow(amount));
    }
    if amount > K_RECEIPT_CEILING_MAX {
        return Err(ValidationError::KReceiptCeilingTooHigh(amount));
    }
    Ok(())
}
