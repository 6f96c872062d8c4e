use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Row, sqlite::SqlitePool};
use tax_core::{AllowanceCeiling, CeilingType, RepositoryError, TaxRepository};
use tracing::{debug, info};

use crate::decimal::{decimal_to_f64, get_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(file = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_allowance_ceiling(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<AllowanceCeiling, RepositoryError> {
    let allowance_type: String = row
        .try_get("allowance_type")
        .map_err(|e| RepositoryError::Database(e.to_string()))?;
    let ceiling_type = CeilingType::parse(&allowance_type).ok_or_else(|| {
        RepositoryError::Database(format!("Unknown allowance type '{}'", allowance_type))
    })?;

    Ok(AllowanceCeiling {
        ceiling_type,
        max_amount: get_decimal(row, "max_amount")?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get updated_at: {}", e)))?,
    })
}

#[async_trait]
impl TaxRepository for SqliteRepository {
    async fn list_allowance_ceilings(&self) -> Result<Vec<AllowanceCeiling>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT allowance_type, max_amount, updated_at
             FROM allowance_ceilings ORDER BY allowance_type",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter().map(row_to_allowance_ceiling).collect()
    }

    async fn get_allowance_ceiling(
        &self,
        ceiling_type: CeilingType,
    ) -> Result<AllowanceCeiling, RepositoryError> {
        let row = sqlx::query(
            "SELECT allowance_type, max_amount, updated_at
             FROM allowance_ceilings WHERE allowance_type = ?",
        )
        .bind(ceiling_type.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?
        .ok_or(RepositoryError::NotFound)?;

        row_to_allowance_ceiling(&row)
    }

    async fn update_allowance_ceiling(
        &self,
        ceiling_type: CeilingType,
        max_amount: Decimal,
    ) -> Result<AllowanceCeiling, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE allowance_ceilings SET max_amount = ?, updated_at = ?
             WHERE allowance_type = ?",
        )
        .bind(decimal_to_f64(max_amount))
        .bind(now)
        .bind(ceiling_type.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!(
            allowance_type = ceiling_type.as_str(),
            max_amount = %max_amount,
            "updated allowance ceiling"
        );

        self.get_allowance_ceiling(ceiling_type).await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;
    use tax_core::AllowanceCeilings;

    use super::*;

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");
        repo
    }

    async fn setup_seeded_db() -> SqliteRepository {
        let repo = setup_test_db().await;
        repo.run_seeds(Path::new("./seeds"))
            .await
            .expect("Should run seeds successfully");
        repo
    }

    async fn insert_ceiling(
        repo: &SqliteRepository,
        allowance_type: &str,
        max_amount: f64,
    ) {
        sqlx::query("INSERT INTO allowance_ceilings (allowance_type, max_amount) VALUES (?, ?)")
            .bind(allowance_type)
            .bind(max_amount)
            .execute(repo.pool())
            .await
            .expect("Failed to insert test ceiling");
    }

    #[tokio::test]
    async fn test_list_allowance_ceilings_empty() {
        let repo = setup_test_db().await;

        let ceilings = repo
            .list_allowance_ceilings()
            .await
            .expect("Should list ceilings");

        assert!(ceilings.is_empty());
    }

    #[tokio::test]
    async fn test_list_allowance_ceilings() {
        let repo = setup_test_db().await;
        insert_ceiling(&repo, "personal", 60000.0).await;
        insert_ceiling(&repo, "donation", 100000.0).await;

        let ceilings = repo
            .list_allowance_ceilings()
            .await
            .expect("Should list ceilings");

        let summary: Vec<(CeilingType, Decimal)> = ceilings
            .iter()
            .map(|c| (c.ceiling_type, c.max_amount))
            .collect();
        assert_eq!(
            summary,
            vec![
                (CeilingType::Donation, dec!(100000)),
                (CeilingType::Personal, dec!(60000)),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_allowance_ceilings_unknown_type() {
        let repo = setup_test_db().await;
        insert_ceiling(&repo, "mortgage", 1.0).await;

        let result = repo.list_allowance_ceilings().await;

        assert_eq!(
            result,
            Err(RepositoryError::Database(
                "Unknown allowance type 'mortgage'".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_get_allowance_ceiling() {
        let repo = setup_test_db().await;
        insert_ceiling(&repo, "k-receipt", 50000.0).await;

        let ceiling = repo
            .get_allowance_ceiling(CeilingType::KReceipt)
            .await
            .expect("Should find k-receipt ceiling");

        assert_eq!(ceiling.ceiling_type, CeilingType::KReceipt);
        assert_eq!(ceiling.max_amount, dec!(50000));
    }

    #[tokio::test]
    async fn test_get_allowance_ceiling_not_found() {
        let repo = setup_test_db().await;

        let result = repo.get_allowance_ceiling(CeilingType::Personal).await;

        assert_eq!(result, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_get_allowance_ceilings_snapshot() {
        let repo = setup_seeded_db().await;

        let snapshot = repo
            .get_allowance_ceilings()
            .await
            .expect("Should build snapshot");

        assert_eq!(
            snapshot,
            AllowanceCeilings {
                donation_max: dec!(100000),
                k_receipt_max: dec!(50000),
                personal_deduction: dec!(60000),
            }
        );
    }

    #[tokio::test]
    async fn test_update_allowance_ceiling() {
        let repo = setup_seeded_db().await;
        let before = repo
            .get_allowance_ceiling(CeilingType::Personal)
            .await
            .expect("Should find personal ceiling");

        let updated = repo
            .update_allowance_ceiling(CeilingType::Personal, dec!(70000))
            .await
            .expect("Should update personal ceiling");

        assert_eq!(updated.ceiling_type, CeilingType::Personal);
        assert_eq!(updated.max_amount, dec!(70000));
        assert!(updated.updated_at >= before.updated_at);

        let reread = repo
            .get_allowance_ceiling(CeilingType::Personal)
            .await
            .expect("Should find personal ceiling");
        assert_eq!(reread.max_amount, dec!(70000));
    }

    #[tokio::test]
    async fn test_update_allowance_ceiling_keeps_other_rows() {
        let repo = setup_seeded_db().await;

        repo.update_allowance_ceiling(CeilingType::KReceipt, dec!(80000))
            .await
            .expect("Should update k-receipt ceiling");

        let snapshot = repo
            .get_allowance_ceilings()
            .await
            .expect("Should build snapshot");
        assert_eq!(snapshot.k_receipt_max, dec!(80000));
        assert_eq!(snapshot.donation_max, dec!(100000));
        assert_eq!(snapshot.personal_deduction, dec!(60000));
    }

    #[tokio::test]
    async fn test_update_allowance_ceiling_fractional_amount() {
        let repo = setup_seeded_db().await;

        let updated = repo
            .update_allowance_ceiling(CeilingType::KReceipt, dec!(12345.5))
            .await
            .expect("Should update k-receipt ceiling");

        assert_eq!(updated.max_amount, dec!(12345.5));
    }

    #[tokio::test]
    async fn test_update_allowance_ceiling_not_found() {
        let repo = setup_test_db().await;

        let result = repo
            .update_allowance_ceiling(CeilingType::Personal, dec!(70000))
            .await;

        assert_eq!(result, Err(RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_allowance_ceiling_rejects_negative() {
        let repo = setup_seeded_db().await;

        let result = repo
            .update_allowance_ceiling(CeilingType::Donation, dec!(-1))
            .await;

        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }

    #[tokio::test]
    async fn test_run_seeds_keeps_admin_changes() {
        let repo = setup_seeded_db().await;
        repo.update_allowance_ceiling(CeilingType::Personal, dec!(90000))
            .await
            .expect("Should update personal ceiling");

        repo.run_seeds(Path::new("./seeds"))
            .await
            .expect("Should re-run seeds");

        let ceilings = repo
            .list_allowance_ceilings()
            .await
            .expect("Should list ceilings");
        assert_eq!(ceilings.len(), 3);
        let personal = repo
            .get_allowance_ceiling(CeilingType::Personal)
            .await
            .expect("Should find personal ceiling");
        assert_eq!(personal.max_amount, dec!(90000));
    }

    #[tokio::test]
    async fn test_run_seeds_nonexistent_directory() {
        let repo = setup_test_db().await;

        let result = repo.run_seeds(Path::new("./nonexistent")).await;

        let err = result.expect_err("Should fail for nonexistent directory");
        assert_eq!(
            err.to_string(),
            "Failed to read seeds directory './nonexistent'"
        );
    }
}
