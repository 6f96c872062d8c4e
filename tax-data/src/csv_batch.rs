//! CSV reader for batch tax calculations.
//!
//! ## CSV Format
//!
//! Exactly three columns, in this order, with this header:
//!
//! | Column        | Type    | Notes                                  |
//! |---------------|---------|----------------------------------------|
//! | `totalIncome` | decimal | gross income, `>= 0`                   |
//! | `wht`         | decimal | withholding tax, `0 <= wht <= income`  |
//! | `donation`    | decimal | donation claim, `>= 0`                 |
//!
//! Values may use `,` as a thousands separator (quote the cell) and may be
//! padded with whitespace. Every cell is required.
//!
//! ```csv
//! totalIncome,wht,donation
//! 500000,0,0
//! "600,000",40000,20000
//! ```
//!
//! Processing is all-or-nothing: the first bad row aborts the whole batch.

use std::io::Read;
use std::str::FromStr;

use rust_decimal::Decimal;
use tax_core::{AllowanceClaim, AllowanceType, TaxFiling, ValidationError};
use thiserror::Error;
use tracing::{debug, warn};

/// Required header, in column order.
pub const EXPECTED_HEADER: [&str; 3] = ["totalIncome", "wht", "donation"];

/// Errors that abort a CSV batch.
///
/// Row numbers are 1-based and count data rows only (the header is row 0).
#[derive(Debug, Error)]
pub enum CsvBatchError {
    #[error("invalid CSV header, expected totalIncome, wht, donation")]
    InvalidHeader,

    #[error("invalid CSV data value cannot be empty (row {row}, column {column})")]
    EmptyValue { row: usize, column: &'static str },

    #[error("invalid number '{value}' in row {row}, column {column}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("invalid row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: ValidationError,
    },

    /// The underlying CSV reader failed (bad quoting, ragged rows, I/O).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
}

/// Parses and validates every row of a batch file.
///
/// The donation column becomes a single [`AllowanceType::Donation`] claim.
pub fn parse_batch<R: Read>(reader: R) -> Result<Vec<TaxFiling>, CsvBatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    check_header(reader.headers()?)?;

    let filings = reader
        .records()
        .enumerate()
        .map(|(idx, result)| {
            let record = result?;
            convert_record(&record, idx + 1)
        })
        .collect::<Result<Vec<_>, CsvBatchError>>()?;

    debug!(rows = filings.len(), "parsed CSV batch");
    Ok(filings)
}

/// [`parse_batch`] over in-memory text.
pub fn parse_batch_str(input: &str) -> Result<Vec<TaxFiling>, CsvBatchError> {
    parse_batch(input.as_bytes())
}

fn check_header(header: &csv::StringRecord) -> Result<(), CsvBatchError> {
    if header.iter().ne(EXPECTED_HEADER) {
        warn!(header = ?header, "rejected CSV header");
        return Err(CsvBatchError::InvalidHeader);
    }
    Ok(())
}

fn convert_record(
    record: &csv::StringRecord,
    row: usize,
) -> Result<TaxFiling, CsvBatchError> {
    let total_income = parse_cell(record, row, 0)?;
    let wht = parse_cell(record, row, 1)?;
    let donation = parse_cell(record, row, 2)?;

    TaxFiling::new(
        total_income,
        wht,
        vec![AllowanceClaim::new(AllowanceType::Donation, donation)],
    )
    .map_err(|source| CsvBatchError::InvalidRow { row, source })
}

fn parse_cell(
    record: &csv::StringRecord,
    row: usize,
    index: usize,
) -> Result<Decimal, CsvBatchError> {
    let column = EXPECTED_HEADER[index];
    let raw = record.get(index).unwrap_or_default();
    if raw.is_empty() {
        return Err(CsvBatchError::EmptyValue { row, column });
    }

    parse_amount(raw).ok_or_else(|| CsvBatchError::InvalidValue {
        row,
        column,
        value: raw.to_string(),
    })
}

/// Parses an amount, ignoring `,` thousands separators and outer whitespace.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let normalized = s.trim().replace(',', "");
    Decimal::from_str(&normalized).ok()
}
