//! Analyzer command description, captured output, and error taxonomy.

use std::time::Duration;

/// Default wall-clock limit for one analyzer run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default number of analyzer processes allowed to run at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// How to launch the external analyzer.
///
/// The stored video's absolute path is appended after `args`, so
/// `program = "python3"`, `args = ["analyze_video.py"]` runs
/// `python3 analyze_video.py /abs/path/to/video.mp4`.
#[derive(Debug, Clone)]
pub struct AnalyzerCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Maximum wall-clock time before the process is killed.
    pub timeout: Duration,
    /// Upper bound on concurrently running analyzer processes.
    pub max_concurrent: usize,
}

impl AnalyzerCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }
}

/// Captured output from a finished analyzer process.
#[derive(Debug, Clone)]
pub struct AnalyzerOutput {
    /// Complete stdout (capped at the subprocess read limit).
    pub stdout: String,
    /// Complete stderr (capped at the subprocess read limit).
    pub stderr: String,
    /// Process exit code (`-1` if killed by signal).
    pub exit_code: i32,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl AnalyzerOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Coarse classification reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The process could not run to a successful exit.
    AnalyzerFailure,
    /// The process succeeded but its stdout is not a JSON report.
    MalformedOutput,
}

/// Errors from a single analyzer invocation.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// The analyzer program could not be started.
    #[error("failed to start analyzer: {0}")]
    Launch(#[source] std::io::Error),

    /// The analyzer ran and exited with a non-zero code.
    #[error("analyzer exited with code {exit_code}: {stderr}")]
    ExitFailure { exit_code: i32, stderr: String },

    /// The analyzer exceeded its timeout and was killed.
    #[error("analyzer timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// Waiting on the running process failed.
    #[error("I/O error while waiting for analyzer: {0}")]
    Io(#[source] std::io::Error),

    /// The analyzer exited zero but stdout is not a JSON object.
    #[error("analyzer output is not a JSON report: {reason}")]
    MalformedOutput { reason: String, raw: String },

    /// The admission limiter was shut down.
    #[error("analyzer is not accepting work")]
    Unavailable,
}

impl AnalyzerError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MalformedOutput { .. } => FailureKind::MalformedOutput,
            _ => FailureKind::AnalyzerFailure,
        }
    }

    /// Best available diagnostic text: stderr for failed runs, raw stdout
    /// for malformed output, the error message otherwise.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::ExitFailure { stderr, .. } if !stderr.trim().is_empty() => {
                stderr.trim().to_string()
            }
            Self::MalformedOutput { raw, .. } => raw.trim().to_string(),
            other => other.to_string(),
        }
    }
}
