//! Taxpayer endpoints.
//!
//! - **POST `/tax/calculations`**: calculate tax for one filing
//! - **POST `/tax/calculations/upload-csv`**: calculate a CSV batch uploaded
//!   as multipart field `taxFile` (or `file`)

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::{BatchTaxResult, TaxFilingInput, TaxResult};
use tax_data::parse_batch;
use tracing::info;

use crate::error::AppError;
use crate::routes::extract_json;
use crate::state::AppState;

/// Multipart field names accepted for the CSV upload.
const CSV_FIELDS: [&str; 2] = ["taxFile", "file"];

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Tax attributed to one bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLevelResponse {
    pub level: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
}

/// Result of a single calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_refund: Decimal,
    pub tax_level: Vec<TaxLevelResponse>,
}

impl From<TaxResult> for TaxResponse {
    fn from(result: TaxResult) -> Self {
        let rounded = result.rounded();
        Self {
            tax: rounded.tax_owed,
            tax_refund: rounded.refund,
            tax_level: rounded
                .breakdown
                .into_iter()
                .map(|b| TaxLevelResponse {
                    level: b.level,
                    tax: b.tax,
                })
                .collect(),
        }
    }
}

/// One row of a batch result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTaxRow {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_refund: Decimal,
}

impl From<BatchTaxResult> for BatchTaxRow {
    fn from(row: BatchTaxResult) -> Self {
        let rounded = row.result.rounded();
        Self {
            total_income: row.total_income,
            tax: rounded.tax_owed,
            tax_refund: rounded.refund,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTaxResponse {
    pub taxes: Vec<BatchTaxRow>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tax/calculations", post(calculate))
        .route("/tax/calculations/upload-csv", post(upload_csv))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn calculate(
    State(state): State<AppState>,
    body: Result<Json<TaxFilingInput>, JsonRejection>,
) -> Result<Json<TaxResponse>, AppError> {
    let filing = extract_json(body)?.validate()?;
    let ceilings = state.repo.get_allowance_ceilings().await?;

    let result = state.calculator.calculate(&filing, &ceilings);

    Ok(Json(result.into()))
}

async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchTaxResponse>, AppError> {
    let contents = read_csv_field(&mut multipart).await?;
    let filings = parse_batch(contents.as_slice())?;
    let ceilings = state.repo.get_allowance_ceilings().await?;

    let results = state.calculator.calculate_batch(&filings, &ceilings);
    info!(rows = results.len(), "calculated CSV batch");

    Ok(Json(BatchTaxResponse {
        taxes: results.into_iter().map(BatchTaxRow::from).collect(),
    }))
}

/// Returns the bytes of the first CSV field in the form.
async fn read_csv_field(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name().is_some_and(|name| CSV_FIELDS.contains(&name)) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(AppError::BadRequest(
        "missing CSV file in form field 'taxFile'".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::BracketTax;

    use super::*;

    #[test]
    fn tax_response_rounds_totals_but_not_levels() {
        let result = TaxResult {
            tax_owed: dec!(35000.15),
            refund: dec!(0),
            breakdown: vec![
                BracketTax {
                    level: "0-150,000".to_string(),
                    tax: dec!(0),
                },
                BracketTax {
                    level: "150,001-500,000".to_string(),
                    tax: dec!(35000),
                },
                BracketTax {
                    level: "500,001-1,000,000".to_string(),
                    tax: dec!(0.15),
                },
            ],
        };

        let response = TaxResponse::from(result);

        assert_eq!(response.tax, dec!(35000));
        assert_eq!(response.tax_level[2].tax, dec!(0.15));
    }

    #[test]
    fn tax_response_serializes_numbers_in_camel_case() {
        let response = TaxResponse {
            tax: dec!(29000),
            tax_refund: dec!(0),
            tax_level: vec![TaxLevelResponse {
                level: "150,001-500,000".to_string(),
                tax: dec!(29000),
            }],
        };

        let json = serde_json::to_value(&response).expect("serialize");

        assert_eq!(
            json,
            serde_json::json!({
                "tax": 29000.0,
                "taxRefund": 0.0,
                "taxLevel": [{"level": "150,001-500,000", "tax": 29000.0}]
            })
        );
    }

    #[test]
    fn batch_row_uses_rounded_settlement() {
        let row = BatchTaxResult {
            total_income: dec!(600000),
            result: TaxResult {
                tax_owed: dec!(0),
                refund: dec!(1999.5),
                breakdown: vec![],
            },
        };

        let response = BatchTaxRow::from(row);

        assert_eq!(
            response,
            BatchTaxRow {
                total_income: dec!(600000),
                tax: dec!(0),
                tax_refund: dec!(2000),
            }
        );
    }
}
