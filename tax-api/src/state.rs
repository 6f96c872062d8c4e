use std::sync::Arc;

use tax_core::TaxRepository;
use tax_core::calculations::TaxCalculator;

use crate::auth::AdminCredentials;

/// Shared handler state.
///
/// The calculator is immutable; the repository is the only thing handlers
/// read from or write to.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn TaxRepository>,
    pub calculator: Arc<TaxCalculator>,
    pub admin: Arc<AdminCredentials>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn TaxRepository>,
        calculator: TaxCalculator,
        admin: AdminCredentials,
    ) -> Self {
        Self {
            repo,
            calculator: Arc::new(calculator),
            admin: Arc::new(admin),
        }
    }
}
