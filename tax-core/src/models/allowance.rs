use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Allowance categories a taxpayer may claim against their income.
///
/// The personal deduction is not claimable; it is applied automatically
/// from [`AllowanceCeilings::personal_deduction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllowanceType {
    Donation,
    KReceipt,
}

impl AllowanceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donation => "donation",
            Self::KReceipt => "k-receipt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "donation" => Some(Self::Donation),
            "k-receipt" => Some(Self::KReceipt),
            _ => None,
        }
    }
}

/// Keys of the configurable ceiling table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CeilingType {
    Donation,
    KReceipt,
    Personal,
}

impl CeilingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donation => "donation",
            Self::KReceipt => "k-receipt",
            Self::Personal => "personal",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "donation" => Some(Self::Donation),
            "k-receipt" => Some(Self::KReceipt),
            "personal" => Some(Self::Personal),
            _ => None,
        }
    }
}

impl From<AllowanceType> for CeilingType {
    fn from(value: AllowanceType) -> Self {
        match value {
            AllowanceType::Donation => Self::Donation,
            AllowanceType::KReceipt => Self::KReceipt,
        }
    }
}

/// A single itemized claim, built per request from user input or a CSV row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceClaim {
    pub allowance_type: AllowanceType,
    pub amount: Decimal,
}

impl AllowanceClaim {
    pub fn new(
        allowance_type: AllowanceType,
        amount: Decimal,
    ) -> Self {
        Self {
            allowance_type,
            amount,
        }
    }
}

/// A stored ceiling row as persisted by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceCeiling {
    pub ceiling_type: CeilingType,
    pub max_amount: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot of the ceiling table used for a single calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllowanceCeilings {
    pub donation_max: Decimal,
    pub k_receipt_max: Decimal,
    pub personal_deduction: Decimal,
}

impl AllowanceCeilings {
    /// Folds stored ceiling rows into a snapshot.
    ///
    /// A category without a row contributes a ceiling of zero, so claims in
    /// that category are capped away entirely.
    pub fn from_records(records: &[AllowanceCeiling]) -> Self {
        let mut ceilings = Self::default();
        let mut seen = Vec::with_capacity(records.len());

        for record in records {
            seen.push(record.ceiling_type);
            match record.ceiling_type {
                CeilingType::Donation => ceilings.donation_max = record.max_amount,
                CeilingType::KReceipt => ceilings.k_receipt_max = record.max_amount,
                CeilingType::Personal => ceilings.personal_deduction = record.max_amount,
            }
        }

        for expected in [CeilingType::Donation, CeilingType::KReceipt, CeilingType::Personal] {
            if !seen.contains(&expected) {
                warn!(ceiling = expected.as_str(), "no stored ceiling, using zero");
            }
        }

        ceilings
    }

    /// Ceiling for a claimable allowance category.
    pub fn max_for(
        &self,
        allowance_type: AllowanceType,
    ) -> Decimal {
        match allowance_type {
            AllowanceType::Donation => self.donation_max,
            AllowanceType::KReceipt => self.k_receipt_max,
        }
    }
}

/// Capped allowance totals produced by the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregatedAllowance {
    pub donation: Decimal,
    pub k_receipt: Decimal,
    pub personal: Decimal,
}

impl AggregatedAllowance {
    /// Total deductible allowance.
    pub fn total(&self) -> Decimal {
        self.donation + self.k_receipt + self.personal
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn record(
        ceiling_type: CeilingType,
        max_amount: Decimal,
    ) -> AllowanceCeiling {
        AllowanceCeiling {
            ceiling_type,
            max_amount,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn allowance_type_round_trips_through_str() {
        for t in [AllowanceType::Donation, AllowanceType::KReceipt] {
            assert_eq!(AllowanceType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn allowance_type_rejects_personal_and_unknown() {
        assert_eq!(AllowanceType::parse("personal"), None);
        assert_eq!(AllowanceType::parse("Donation"), None);
        assert_eq!(AllowanceType::parse(""), None);
    }

    #[test]
    fn allowance_type_serializes_kebab_case() {
        let json = serde_json::to_string(&AllowanceType::KReceipt).unwrap();

        assert_eq!(json, "\"k-receipt\"");
    }

    #[test]
    fn ceiling_type_parses_all_store_keys() {
        assert_eq!(CeilingType::parse("donation"), Some(CeilingType::Donation));
        assert_eq!(CeilingType::parse("k-receipt"), Some(CeilingType::KReceipt));
        assert_eq!(CeilingType::parse("personal"), Some(CeilingType::Personal));
        assert_eq!(CeilingType::parse("KReceipt"), None);
    }

    #[test]
    fn from_records_maps_each_row() {
        let records = vec![
            record(CeilingType::Personal, dec!(60000)),
            record(CeilingType::Donation, dec!(100000)),
            record(CeilingType::KReceipt, dec!(50000)),
        ];

        let ceilings = AllowanceCeilings::from_records(&records);

        assert_eq!(
            ceilings,
            AllowanceCeilings {
                donation_max: dec!(100000),
                k_receipt_max: dec!(50000),
                personal_deduction: dec!(60000),
            }
        );
    }

    #[test]
    fn from_records_defaults_missing_rows_to_zero() {
        let records = vec![record(CeilingType::Personal, dec!(60000))];

        let ceilings = AllowanceCeilings::from_records(&records);

        assert_eq!(ceilings.donation_max, Decimal::ZERO);
        assert_eq!(ceilings.k_receipt_max, Decimal::ZERO);
        assert_eq!(ceilings.personal_deduction, dec!(60000));
    }

    #[test]
    fn aggregated_total_sums_all_parts() {
        let aggregated = AggregatedAllowance {
            donation: dec!(100000),
            k_receipt: dec!(20000),
            personal: dec!(60000),
        };

        assert_eq!(aggregated.total(), dec!(180000));
    }
}
