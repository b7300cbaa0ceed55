//! Child-process execution for the analyzer.
//!
//! [`run_command`] spawns the analyzer with the video path as its last
//! argument, captures stdout/stderr in full and enforces the timeout. The
//! analyzer runs in its own process group; if the run times out or the
//! request future is dropped, the whole group is killed, helpers it forked
//! included.

use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::command::{AnalyzerCommand, AnalyzerError, AnalyzerOutput};

/// Maximum stdout or stderr size captured per stream (10 MiB).
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Run `command` against `video_path` and capture its output.
///
/// The timeout covers the process exit and both pipes reaching EOF, so a
/// background process holding stdout open cannot outlive it.
///
/// A non-zero exit is not an error at this level; the caller classifies it.
pub async fn run_command(
    command: &AnalyzerCommand,
    video_path: &Path,
) -> Result<AnalyzerOutput, AnalyzerError> {
    let mut cmd = Command::new(&command.program);
    cmd.args(&command.args)
        .arg(video_path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    #[cfg(unix)]
    cmd.process_group(0);

    let start = Instant::now();

    let mut child = cmd.spawn().map_err(AnalyzerError::Launch)?;
    let mut group = ProcessGroup::new(child.id());

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let run = async {
        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            read_stream(stdout_handle),
            read_stream(stderr_handle),
        );
        status.map(|status| (status, stdout, stderr))
    };

    let outcome = tokio::time::timeout(command.timeout, run).await;

    match outcome {
        Ok(Ok((status, stdout_bytes, stderr_bytes))) => {
            group.disarm();
            Ok(AnalyzerOutput {
                stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
                stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
                exit_code: status.code().unwrap_or(-1),
                duration_ms: start.elapsed().as_millis() as u64,
            })
        }
        Ok(Err(e)) => Err(AnalyzerError::Io(e)),
        Err(_elapsed) => {
            group.kill();
            let _ = child.kill().await;
            Err(AnalyzerError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
    }
}

/// Read an entire output stream into a byte buffer, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
    }
    buf
}

/// Kills the analyzer's process group when dropped, unless disarmed.
struct ProcessGroup {
    pgid: Option<u32>,
}

impl ProcessGroup {
    fn new(pgid: Option<u32>) -> Self {
        Self { pgid }
    }

    /// The run finished normally; leave the group alone.
    fn disarm(&mut self) {
        self.pgid = None;
    }

    fn kill(&mut self) {
        if let Some(pgid) = self.pgid.take() {
            kill_group(pgid);
        }
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

#[cfg(unix)]
fn kill_group(pgid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pgid) else {
        return;
    };
    // Safety: kill(2) only sends a signal; a negative pid targets the group.
    let ret = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if ret != 0 {
        tracing::debug!(pgid, "Analyzer process group already gone");
    }
}

#[cfg(not(unix))]
fn kill_group(_pgid: u32) {}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;

    use super::*;
    use crate::analyzer::test_helpers::{bash_analyzer, write_temp_script};

    #[tokio::test]
    async fn passes_video_path_as_last_argument() {
        let script = write_temp_script("echo \"$1\"\n");
        let output = run_command(&bash_analyzer(&script), Path::new("/videos/match.mp4"))
            .await
            .expect("run");
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout.trim(), "/videos/match.mp4");
    }

    #[tokio::test]
    async fn captures_stderr_and_exit_code() {
        let script = write_temp_script("echo 'Cannot open video' >&2\nexit 1\n");
        let output = run_command(&bash_analyzer(&script), Path::new("/nope.mp4"))
            .await
            .expect("run");
        assert_eq!(output.exit_code, 1);
        assert!(!output.success());
        assert_eq!(output.stderr.trim(), "Cannot open video");
    }

    #[tokio::test]
    async fn stdin_is_closed() {
        let script = write_temp_script("cat\necho done\n");
        let output = run_command(&bash_analyzer(&script), Path::new("/v.mp4"))
            .await
            .expect("run");
        assert_eq!(output.stdout.trim(), "done");
    }

    #[tokio::test]
    async fn timeout_kills_process() {
        let script = write_temp_script("sleep 60\n");
        let command = bash_analyzer(&script).with_timeout(Duration::from_millis(200));
        let result = run_command(&command, Path::new("/v.mp4")).await;
        assert_matches!(result, Err(AnalyzerError::Timeout { .. }));
    }

    #[tokio::test]
    async fn timeout_covers_pipes_held_by_background_processes() {
        let script = write_temp_script("sleep 4 &\necho '{}'\nexit 0\n");
        let command = bash_analyzer(&script).with_timeout(Duration::from_millis(300));

        let start = Instant::now();
        let result = run_command(&command, Path::new("/v.mp4")).await;

        assert_matches!(result, Err(AnalyzerError::Timeout { .. }));
        assert!(
            start.elapsed() < Duration::from_secs(2),
            "run took {:?}",
            start.elapsed()
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_kills_forked_helpers() {
        let dir = tempfile::tempdir().expect("tempdir");
        let marker = dir.path().join("helper-ran");
        let script = write_temp_script("(sleep 1; touch \"$1\") &\nsleep 30\n");
        let command = bash_analyzer(&script).with_timeout(Duration::from_millis(200));

        let result = run_command(&command, &marker).await;
        assert_matches!(result, Err(AnalyzerError::Timeout { .. }));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists(), "helper outlived the analyzer");
    }

    #[tokio::test]
    async fn missing_program_is_launch_error() {
        let command = AnalyzerCommand::new("/definitely/not/a/real/analyzer");
        let result = run_command(&command, Path::new("/v.mp4")).await;
        assert_matches!(result, Err(AnalyzerError::Launch(_)));
    }
}
