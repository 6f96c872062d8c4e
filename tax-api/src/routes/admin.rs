//! Admin endpoints, mounted behind [`crate::auth::require_admin`].
//!
//! - **GET `/admin/deductions`**: list every stored ceiling
//! - **POST `/admin/deductions/personal`**: set the personal deduction
//! - **POST `/admin/deductions/k-receipt`**: set the k-receipt ceiling

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::validation::{validate_k_receipt_ceiling, validate_personal_deduction};
use tax_core::{AllowanceCeiling, CeilingType};

use crate::error::AppError;
use crate::routes::extract_json;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CeilingResponse {
    pub allowance_type: CeilingType,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_amount: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl From<AllowanceCeiling> for CeilingResponse {
    fn from(ceiling: AllowanceCeiling) -> Self {
        Self {
            allowance_type: ceiling.ceiling_type,
            max_amount: ceiling.max_amount,
            updated_at: ceiling.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDeductionResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub personal_deduction: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KReceiptResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub k_receipt: Decimal,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/deductions", get(list_ceilings))
        .route("/admin/deductions/personal", post(set_personal_deduction))
        .route("/admin/deductions/k-receipt", post(set_k_receipt_ceiling))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_ceilings(
    State(state): State<AppState>,
) -> Result<Json<Vec<CeilingResponse>>, AppError> {
    let ceilings = state.repo.list_allowance_ceilings().await?;
    Ok(Json(ceilings.into_iter().map(CeilingResponse::from).collect()))
}

async fn set_personal_deduction(
    State(state): State<AppState>,
    body: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<PersonalDeductionResponse>, AppError> {
    let AmountRequest { amount } = extract_json(body)?;
    validate_personal_deduction(amount)?;

    let updated = state
        .repo
        .update_allowance_ceiling(CeilingType::Personal, amount)
        .await?;

    Ok(Json(PersonalDeductionResponse {
        personal_deduction: updated.max_amount,
    }))
}

async fn set_k_receipt_ceiling(
    State(state): State<AppState>,
    body: Result<Json<AmountRequest>, JsonRejection>,
) -> Result<Json<KReceiptResponse>, AppError> {
    let AmountRequest { amount } = extract_json(body)?;
    validate_k_receipt_ceiling(amount)?;

    let updated = state
        .repo
        .update_allowance_ceiling(CeilingType::KReceipt, amount)
        .await?;

    Ok(Json(KReceiptResponse {
        k_receipt: updated.max_amount,
    }))
}
