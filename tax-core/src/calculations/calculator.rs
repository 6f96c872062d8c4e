//! Full calculation for a filing: allowances first, then brackets.

use tracing::debug;

use crate::calculations::{AllowanceAggregator, TaxBracketEngine};
use crate::models::{AllowanceCeilings, BatchTaxResult, TaxFiling, TaxResult};

/// Combines allowance aggregation with a bracket engine.
///
/// Holds no mutable state; a single instance can be shared between request
/// handlers behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxCalculator {
    engine: TaxBracketEngine,
}

impl TaxCalculator {
    pub fn new(engine: TaxBracketEngine) -> Self {
        Self { engine }
    }

    /// Net income is total income less capped allowances. WHT is applied only
    /// at settlement, never to net income.
    pub fn calculate(
        &self,
        filing: &TaxFiling,
        ceilings: &AllowanceCeilings,
    ) -> TaxResult {
        let allowances = AllowanceAggregator::new(ceilings).aggregate(filing.allowances());
        let net_income = filing.total_income() - allowances.total();

        debug!(
            total_income = %filing.total_income(),
            allowances = %allowances.total(),
            net_income = %net_income,
            "computed net income"
        );

        self.engine.calculate_tax(net_income, filing.wht())
    }

    /// Calculates every filing independently, in input order, against the
    /// same ceiling snapshot.
    pub fn calculate_batch(
        &self,
        filings: &[TaxFiling],
        ceilings: &AllowanceCeilings,
    ) -> Vec<BatchTaxResult> {
        filings
            .iter()
            .map(|filing| BatchTaxResult {
                total_income: filing.total_income(),
                result: self.calculate(filing, ceilings),
            })
            .collect()
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new(TaxBracketEngine::personal_income())
    }
}
