use crate::error::BootError;
use tokio::process::Command;
use tracing::{info, warn};

/// Hand control to the server command. On Unix the current process image is
/// replaced, so this only returns on failure. Elsewhere the server runs as a
/// supervised child and its exit code is returned.
pub async fn handover(argv: &[String]) -> Result<i32, BootError> {
    #[cfg(unix)]
    {
        Err(exec(argv))
    }
    #[cfg(not(unix))]
    {
        supervise(argv).await
    }
}

#[cfg(unix)]
fn exec(argv: &[String]) -> BootError {
    use std::os::unix::process::CommandExt;

    let Some((program, args)) = argv.split_first() else {
        return BootError::EmptyCommand;
    };
    info!(program = %program, args = ?args, "handing over to server process");
    let source = std::process::Command::new(program).args(args).exec();
    BootError::Handover {
        program: program.clone(),
        source,
    }
}

/// Spawn the server as a child, kill it on Ctrl-C, and return its exit code.
pub async fn supervise(argv: &[String]) -> Result<i32, BootError> {
    let Some((program, args)) = argv.split_first() else {
        return Err(BootError::EmptyCommand);
    };
    info!(program = %program, args = ?args, "starting server process");
    let mut child = Command::new(program)
        .args(args)
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| BootError::Handover {
            program: program.clone(),
            source,
        })?;

    let status = tokio::select! {
        status = child.wait() => status?,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupt received; stopping server process");
            child.start_kill()?;
            child.wait().await?
        }
    };
    // a child killed by a signal has no code
    Ok(status.code().unwrap_or(1))
}
