//! Ceiling snapshot for a batch run.

use tax_core::{AllowanceCeilings, RepositoryError, TaxRepository};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CeilingsError {
    /// The table exists but holds no rows, usually a fresh database that
    /// was migrated without seeds.
    #[error("no allowance ceilings stored, load them with --seeds")]
    Empty,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Reads the stored ceilings, refusing to continue when none exist.
///
/// Without any rows every filing would be taxed with a zero personal
/// deduction.
pub async fn load_ceilings<R>(repo: &R) -> Result<AllowanceCeilings, CeilingsError>
where
    R: TaxRepository + ?Sized,
{
    let records = repo.list_allowance_ceilings().await?;
    if records.is_empty() {
        return Err(CeilingsError::Empty);
    }

    debug!(rows = records.len(), "loaded allowance ceilings");
    Ok(AllowanceCeilings::from_records(&records))
}
