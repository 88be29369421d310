//! Two-phase schema initialization.
//!
//! The primary phase runs the application's dedicated init routine as a child
//! process and waits for it. A non-zero exit (or a command that cannot be
//! started) hands over to the fallback phase, which creates the schema
//! in-process and seeds the default account. Only a fallback failure is fatal.

use crate::config::{Config, SeedAccount};
use crate::db::{UserStorage, connect};
use crate::error::BootError;
use crate::service::seeder::{SeedOutcome, seed_default_account};
use std::path::Path;
use std::process::ExitStatus;
use tokio::process::Command;
use tracing::{error, info, warn};

/// Observed result of the primary phase.
#[derive(Debug)]
pub enum PrimaryOutcome {
    Disabled,
    Succeeded,
    Failed(ExitStatus),
    SpawnFailed(std::io::Error),
}

impl PrimaryOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, PrimaryOutcome::Succeeded)
    }
}

/// Which path produced the final schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaPath {
    Primary,
    Fallback(InitReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub migrated: Vec<String>,
    pub seed: SeedOutcome,
}

/// Run the dedicated init command from `cwd` and wait for it to exit.
pub async fn run_primary(argv: Option<&[String]>, cwd: &Path) -> PrimaryOutcome {
    let Some((program, args)) = argv.and_then(|a| a.split_first()) else {
        info!("no init command configured; using in-process schema creation");
        return PrimaryOutcome::Disabled;
    };

    info!(program = %program, args = ?args, "running init command");
    match Command::new(program).args(args).current_dir(cwd).status().await {
        Ok(status) if status.success() => {
            info!("init command completed");
            PrimaryOutcome::Succeeded
        }
        Ok(status) => {
            warn!(%status, "init command failed; falling back to in-process schema creation");
            PrimaryOutcome::Failed(status)
        }
        Err(e) => {
            warn!(program = %program, error = %e, "init command could not be started; falling back");
            PrimaryOutcome::SpawnFailed(e)
        }
    }
}

/// Create all tables, apply column migrations and seed the default account.
/// This is also what `qrboot init-db` runs as a standalone process.
pub async fn init_database(db_path: &Path, seed: SeedAccount) -> Result<InitReport, BootError> {
    let storage = UserStorage::new(connect(db_path).await?);
    let result = create_and_seed(&storage, seed).await;
    storage.close().await;
    let report = result?;
    info!(path = %db_path.display(), "database initialized");
    Ok(report)
}

async fn create_and_seed(storage: &UserStorage, seed: SeedAccount) -> Result<InitReport, BootError> {
    storage.init_schema().await?;
    let migrated = storage.apply_migrations().await?;
    for column in &migrated {
        info!(column = %column, "added missing column");
    }
    let seed = seed_default_account(storage, seed).await?;
    Ok(InitReport { migrated, seed })
}

/// Add missing columns to an existing database, or create the whole schema
/// when the file does not exist yet.
pub async fn migrate_database(db_path: &Path) -> Result<Vec<String>, BootError> {
    let fresh = !db_path.exists();
    let storage = UserStorage::new(connect(db_path).await?);
    let result = if fresh {
        info!(path = %db_path.display(), "database not found; creating schema");
        storage.init_schema().await.map(|_| Vec::new())
    } else {
        storage.apply_migrations().await
    };
    storage.close().await;
    let migrated = result?;
    if migrated.is_empty() {
        info!("schema is up to date");
    }
    for column in &migrated {
        info!(column = %column, "added missing column");
    }
    Ok(migrated)
}

/// Fallback phase: any error is logged with its full cause chain and wrapped
/// as the single fatal schema error.
pub async fn run_fallback(db_path: &Path, seed: SeedAccount) -> Result<InitReport, BootError> {
    init_database(db_path, seed).await.map_err(|e| {
        error!(
            path = %db_path.display(),
            error = %e.chain(),
            "in-process schema creation failed"
        );
        BootError::Schema(Box::new(e))
    })
}

/// Primary phase, then fallback if the primary did not succeed.
pub async fn initialize_schema(cfg: &Config) -> Result<SchemaPath, BootError> {
    let argv = cfg.init_argv();
    let primary = run_primary(argv.as_deref(), &cfg.app_root).await;
    if primary.succeeded() {
        return Ok(SchemaPath::Primary);
    }
    let report = run_fallback(&cfg.database_path(), cfg.seed_account()).await?;
    Ok(SchemaPath::Fallback(report))
}
