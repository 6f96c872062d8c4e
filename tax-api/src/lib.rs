//! HTTP service for Thai personal income tax calculations.
//!
//! ## API Surface
//!
//! | Path                            | Module             | Auth  |
//! |---------------------------------|--------------------|-------|
//! | `/`, `/health`                  | here               | none  |
//! | `/tax/calculations*`            | [`routes::tax`]    | none  |
//! | `/admin/deductions*`            | [`routes::admin`]  | basic |

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let admin = routes::admin::router().layer(from_fn_with_state(
        state.clone(),
        auth::require_admin,
    ));

    Router::new()
        .route("/", get(greeting))
        .route("/health", get(health))
        .merge(routes::tax::router())
        .merge(admin)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn greeting() -> &'static str {
    "Hello, Thai income tax!"
}

async fn health() -> &'static str {
    "ok"
}
