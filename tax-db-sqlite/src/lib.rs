//! SQLite storage for allowance ceilings.
//!
//! Migrations are embedded at compile time; seed files are read from disk at
//! runtime so packaged builds can ship their own defaults.

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

pub mod decimal;
pub mod repository;

pub use repository::SqliteRepository;

/// Resolve the seeds directory at runtime so it works in both development and
/// packaged distribution.
///
/// Resolution order:
/// 1. **`TAX_DB_SQLITE_SEEDS_DIR`** if set.
/// 2. **`./seeds`** if the directory exists in the current working directory.
/// 3. **`$CARGO_MANIFEST_DIR/seeds`** as last resort (dev/tests from the
///    build tree).
pub fn seeds_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TAX_DB_SQLITE_SEEDS_DIR") {
        return PathBuf::from(dir);
    }
    let cwd_seeds = PathBuf::from("./seeds");
    if cwd_seeds.is_dir() {
        return cwd_seeds;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
}

/// Connects to `database_url`, applies migrations and loads seed files.
///
/// `seeds` overrides [`seeds_dir`] when given.
pub async fn open(
    database_url: &str,
    seeds: Option<&Path>,
) -> Result<SqliteRepository> {
    let repo = SqliteRepository::new(database_url).await?;
    repo.run_migrations().await?;

    let seeds = seeds.map(Path::to_path_buf).unwrap_or_else(seeds_dir);
    repo.run_seeds(&seeds).await?;

    info!(database = database_url, seeds = %seeds.display(), "database ready");
    Ok(repo)
}
