//! Allowance aggregation.
//!
//! Itemized claims are summed per category and capped at the category
//! ceiling. The personal deduction is applied to every filing regardless of
//! what was claimed.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::AllowanceAggregator;
//! use tax_core::{AllowanceCeilings, AllowanceClaim, AllowanceType};
//!
//! let ceilings = AllowanceCeilings {
//!     donation_max: dec!(100000),
//!     k_receipt_max: dec!(50000),
//!     personal_deduction: dec!(60000),
//! };
//! let claims = vec![
//!     AllowanceClaim::new(AllowanceType::KReceipt, dec!(20000)),
//!     AllowanceClaim::new(AllowanceType::Donation, dec!(105000)),
//! ];
//!
//! let aggregated = AllowanceAggregator::new(&ceilings).aggregate(&claims);
//!
//! assert_eq!(aggregated.donation, dec!(100000));
//! assert_eq!(aggregated.total(), dec!(180000));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::min;
use crate::models::{AggregatedAllowance, AllowanceCeilings, AllowanceClaim, AllowanceType};

/// Caps and sums allowance claims against a ceiling snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AllowanceAggregator<'a> {
    ceilings: &'a AllowanceCeilings,
}

impl<'a> AllowanceAggregator<'a> {
    pub fn new(ceilings: &'a AllowanceCeilings) -> Self {
        Self { ceilings }
    }

    /// Reduces `claims` to capped per-category totals.
    ///
    /// Amounts beyond a category ceiling are discarded, including sums too
    /// large to represent. Claims are assumed to be non-negative, which
    /// validation guarantees.
    pub fn aggregate(
        &self,
        claims: &[AllowanceClaim],
    ) -> AggregatedAllowance {
        let mut donation = Decimal::ZERO;
        let mut k_receipt = Decimal::ZERO;

        for claim in claims {
            let running = match claim.allowance_type {
                AllowanceType::Donation => &mut donation,
                AllowanceType::KReceipt => &mut k_receipt,
            };
            *running = self.capped(claim.allowance_type, running.saturating_add(claim.amount));
        }

        let aggregated = AggregatedAllowance {
            donation,
            k_receipt,
            personal: self.ceilings.personal_deduction,
        };
        debug!(
            donation = %aggregated.donation,
            k_receipt = %aggregated.k_receipt,
            personal = %aggregated.personal,
            "aggregated allowances"
        );
        aggregated
    }

    fn capped(
        &self,
        allowance_type: AllowanceType,
        running: Decimal,
    ) -> Decimal {
        min(running, self.ceilings.max_for(allowance_type))
    }
}
