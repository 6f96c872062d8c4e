//! HTTP Basic authentication for the admin routes.
//!
//! Credentials come from configuration ([`AdminCredentials`]) and are compared
//! in constant time. Failures return 401 with a `WWW-Authenticate: Basic`
//! challenge.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::headers::authorization::Basic;
use axum_extra::headers::{Authorization, HeaderMapExt};
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

/// Admin username and password.
///
/// Custom `Debug` redacts the password to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl AdminCredentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Both fields must match; each comparison runs in constant time and
    /// both always run.
    pub fn matches(
        &self,
        username: &str,
        password: &str,
    ) -> bool {
        let user_ok = constant_time_eq(username, &self.username);
        let pass_ok = constant_time_eq(password, &self.password);
        user_ok & pass_ok
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Constant-time string comparison.
///
/// When lengths differ, performs a dummy comparison so the mismatch takes
/// roughly as long as a full comparison.
fn constant_time_eq(
    provided: &str,
    expected: &str,
) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Rejects requests without valid admin Basic credentials.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(basic) = request.headers().typed_get::<Authorization<Basic>>() else {
        tracing::warn!("admin authentication failed: missing basic credentials");
        return Err(AppError::Unauthorized("missing basic credentials".to_string()));
    };

    if !state.admin.matches(basic.username(), basic.password()) {
        tracing::warn!(username = basic.username(), "admin authentication failed");
        return Err(AppError::Unauthorized("invalid credentials".to_string()));
    }

    Ok(next.run(request).await)
}
