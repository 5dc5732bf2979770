//! Stop a `tokio::process::Child`: SIGTERM, wait, then SIGKILL.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// How long the child gets to exit after SIGTERM.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Terminate `child` and reap it.
///
/// On Unix the child gets SIGTERM and [`SHUTDOWN_GRACE`] to exit before
/// SIGKILL. Elsewhere it is killed right away.
pub async fn shutdown_child(child: &mut Child) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        terminate_gracefully(child, SHUTDOWN_GRACE).await
    }

    #[cfg(not(unix))]
    {
        child.kill().await?;
        child.wait().await
    }
}

#[cfg(unix)]
async fn terminate_gracefully(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    // Already reaped (or exited and reaped by try_wait).
    let Some(pid) = child.id() else {
        return child.wait().await;
    };
    let pid = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;

    match signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        Ok(()) => {}
        Err(nix::errno::Errno::ESRCH) => return child.wait().await,
        Err(e) => return Err(io::Error::other(e)),
    }

    if let Ok(status) = tokio::time::timeout(grace, child.wait()).await {
        return status;
    }

    tracing::warn!(target: "fastqwen.engine", pid, "Engine ignored SIGTERM, killing");
    child.kill().await?;
    child.wait().await
}
