use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AllowanceCeiling, AllowanceCeilings, CeilingType};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

#[async_trait]
pub trait TaxRepository: Send + Sync {
    // Allowance ceilings
    async fn list_allowance_ceilings(&self) -> Result<Vec<AllowanceCeiling>, RepositoryError>;

    async fn get_allowance_ceiling(
        &self,
        ceiling_type: CeilingType,
    ) -> Result<AllowanceCeiling, RepositoryError>;

    /// Snapshot of every ceiling for a single calculation.
    async fn get_allowance_ceilings(&self) -> Result<AllowanceCeilings, RepositoryError> {
        let records = self.list_allowance_ceilings().await?;
        Ok(AllowanceCeilings::from_records(&records))
    }

    // Admin updates
    async fn update_allowance_ceiling(
        &self,
        ceiling_type: CeilingType,
        max_amount: Decimal,
    ) -> Result<AllowanceCeiling, RepositoryError>;
}
