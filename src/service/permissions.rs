use std::path::Path;
use tracing::{info, warn};

pub const DB_FILE_MODE: u32 = 0o664;
pub const DB_DIR_MODE: u32 = 0o755;

/// Make the database file group-readable/writable and its directory
/// traversable. Failures are logged; returns whether every change applied.
pub fn normalize_db_permissions(db_path: &Path) -> bool {
    if !db_path.is_file() {
        warn!(path = %db_path.display(), "database file not found; skipping permission fix");
        return false;
    }

    let mut ok = set_mode(db_path, DB_FILE_MODE);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ok &= set_mode(parent, DB_DIR_MODE);
    }
    if ok {
        info!(path = %db_path.display(), "database permissions normalized");
    }
    ok
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> bool {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    match fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), mode = %format!("{mode:o}"), error = %e, "failed to set permissions");
            false
        }
    }
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> bool {
    true
}
