use crate::error::BootError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DIR_MODE: u32 = 0o755;

/// Create every directory in `dirs` (parents included). Directories that
/// already exist are left untouched.
pub fn prepare_dirs(dirs: &[PathBuf]) -> Result<(), BootError> {
    for dir in dirs {
        ensure_dir(dir)?;
    }
    info!(count = dirs.len(), "directory layout ready");
    Ok(())
}

fn ensure_dir(path: &Path) -> Result<(), BootError> {
    if path.is_dir() {
        debug!(path = %path.display(), "directory exists");
        return Ok(());
    }
    if path.exists() {
        return Err(BootError::NotADirectory(path.to_path_buf()));
    }

    create_dir_all(path).map_err(|source| BootError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    // recursive creation tolerates a concurrent creator; make sure it was a dir
    if !fs::metadata(path)?.is_dir() {
        return Err(BootError::NotADirectory(path.to_path_buf()));
    }
    info!(path = %path.display(), "created directory");
    Ok(())
}

#[cfg(unix)]
fn create_dir_all(path: &Path) -> std::io::Result<()> {
    use std::fs::DirBuilder;
    use std::os::unix::fs::DirBuilderExt;

    DirBuilder::new().recursive(true).mode(DIR_MODE).create(path)
}

#[cfg(not(unix))]
fn create_dir_all(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}
