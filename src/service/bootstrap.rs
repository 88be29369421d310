//! The ordered startup sequence:
//! directories → write probe → schema (primary, then fallback) → permissions → handover.

use crate::config::Config;
use crate::error::BootError;
use crate::service::handover::handover;
use crate::service::layout::prepare_dirs;
use crate::service::permissions::normalize_db_permissions;
use crate::service::probe::probe_writable;
use crate::service::schema_init::{SchemaPath, initialize_schema};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootReport {
    pub writable: bool,
    pub schema: SchemaPath,
    pub permissions_ok: bool,
}

/// Every step before handover. Errors here are fatal and must keep the
/// server from starting.
pub async fn prepare(cfg: &Config) -> Result<BootReport, BootError> {
    prepare_dirs(&cfg.required_dirs())?;
    let writable = probe_writable(&cfg.instance_dir());
    let schema = initialize_schema(cfg).await?;
    let permissions_ok = normalize_db_permissions(&cfg.database_path());

    let report = BootReport {
        writable,
        schema,
        permissions_ok,
    };
    info!(
        writable = report.writable,
        fallback = matches!(report.schema, SchemaPath::Fallback(_)),
        permissions_ok = report.permissions_ok,
        "bootstrap complete"
    );
    Ok(report)
}

/// Full sequence ending in handover to `server`.
pub async fn run(cfg: &Config, server: &[String]) -> Result<i32, BootError> {
    if server.is_empty() {
        return Err(BootError::EmptyCommand);
    }
    prepare(cfg).await?;
    handover(server).await
}
