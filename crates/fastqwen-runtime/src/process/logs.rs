//! Forward engine output into the process log.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tracing::debug;

/// Spawn reader tasks that re-emit each stdout/stderr line of `child` as a
/// debug event under target `fastqwen.engine`.
///
/// Tasks end on their own when the pipe closes.
pub fn forward_child_output(child: &mut Child, port: u16) {
    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(forward_lines(stdout, port, "stdout"));
    }
    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(forward_lines(stderr, port, "stderr"));
    }
}

async fn forward_lines<R>(pipe: R, port: u16, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(pipe).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        debug!(target: "fastqwen.engine", port, stream, "{line}");
    }
    debug!(target: "fastqwen.engine", port, stream, "Output reader exiting");
}
