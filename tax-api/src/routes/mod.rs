pub mod admin;
pub mod tax;

use axum::Json;
use axum::extract::rejection::JsonRejection;

use crate::error::AppError;

/// Unwraps a JSON body, mapping deserialization failures to
/// [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
