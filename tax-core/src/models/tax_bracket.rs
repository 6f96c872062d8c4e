use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal band of a progressive schedule.
///
/// The lower bound is implied by the previous bracket's `max_income`
/// (zero for the first). `max_income` is `None` only for the top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub label: String,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        label: impl Into<String>,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            max_income,
            tax_rate,
        }
    }

    /// The Thai personal income tax schedule.
    ///
    /// | Net income              | Rate |
    /// |-------------------------|------|
    /// | 0 – 150,000             | 0%   |
    /// | 150,001 – 500,000       | 10%  |
    /// | 500,001 – 1,000,000     | 15%  |
    /// | 1,000,001 – 2,000,000   | 20%  |
    /// | 2,000,001 and above     | 35%  |
    pub fn personal_income_schedule() -> Vec<TaxBracket> {
        vec![
            TaxBracket::new("0-150,000", Some(Decimal::from(150_000)), Decimal::ZERO),
            TaxBracket::new(
                "150,001-500,000",
                Some(Decimal::from(500_000)),
                Decimal::new(10, 2),
            ),
            TaxBracket::new(
                "500,001-1,000,000",
                Some(Decimal::from(1_000_000)),
                Decimal::new(15, 2),
            ),
            TaxBracket::new(
                "1,000,001-2,000,000",
                Some(Decimal::from(2_000_000)),
                Decimal::new(20, 2),
            ),
            TaxBracket::new("2,000,001 ขึ้นไป", None, Decimal::new(35, 2)),
        ]
    }
}
