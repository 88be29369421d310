use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

const MARKER: &str = ".write_test";

/// Create and remove a marker file in `dir`. Returns `false` (after logging)
/// when either step fails; never aborts the bootstrap.
pub fn probe_writable(dir: &Path) -> bool {
    let marker = dir.join(MARKER);
    let result = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&marker)
        .and_then(|mut f| f.write_all(b"ok"))
        .and_then(|_| fs::remove_file(&marker));

    match result {
        Ok(()) => {
            info!(path = %dir.display(), "storage directory is writable");
            true
        }
        Err(e) => {
            warn!(
                path = %dir.display(),
                error = %e,
                "storage directory is not writable; continuing with schema initialization"
            );
            false
        }
    }
}
