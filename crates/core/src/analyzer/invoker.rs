//! Single-shot analyzer invocation with an admission limit.

use std::path::Path;

use serde_json::Value;
use tokio::sync::Semaphore;

use super::command::{AnalyzerCommand, AnalyzerError, AnalyzerOutput};
use super::subprocess;
use crate::report::AnalysisReport;

/// A successful analyzer run.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The document exactly as the analyzer printed it.
    pub raw: Value,
    /// Typed view of `raw`.
    pub report: AnalysisReport,
    pub duration_ms: u64,
}

/// Runs the configured analyzer, at most `max_concurrent` at a time.
///
/// There are no retries: each call is exactly one process launch.
pub struct AnalysisInvoker {
    command: AnalyzerCommand,
    permits: Semaphore,
}

impl AnalysisInvoker {
    pub fn new(command: AnalyzerCommand) -> Self {
        let permits = Semaphore::new(command.max_concurrent.max(1));
        Self { command, permits }
    }

    /// Analyze the video at `video_path`.
    ///
    /// Waits for a free slot first; the timeout only covers the process run.
    pub async fn analyze(&self, video_path: &Path) -> Result<Analysis, AnalyzerError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AnalyzerError::Unavailable)?;

        tracing::debug!(
            program = %self.command.program,
            video = %video_path.display(),
            "Starting analyzer",
        );

        let output = subprocess::run_command(&self.command, video_path).await?;

        tracing::info!(
            exit_code = output.exit_code,
            duration_ms = output.duration_ms,
            "Analyzer finished",
        );

        classify(output)
    }
}

/// Turn captured process output into a report or a classified error.
///
/// Stdout is only parsed when the process exited zero.
pub fn classify(output: AnalyzerOutput) -> Result<Analysis, AnalyzerError> {
    if !output.success() {
        return Err(AnalyzerError::ExitFailure {
            exit_code: output.exit_code,
            stderr: output.stderr,
        });
    }

    let raw: Value = serde_json::from_str(output.stdout.trim()).map_err(|e| {
        AnalyzerError::MalformedOutput {
            reason: e.to_string(),
            raw: output.stdout.clone(),
        }
    })?;

    if !raw.is_object() {
        return Err(AnalyzerError::MalformedOutput {
            reason: "expected a JSON object".into(),
            raw: output.stdout,
        });
    }

    let report = AnalysisReport::from_value(&raw);
    Ok(Analysis {
        raw,
        report,
        duration_ms: output.duration_ms,
    })
}
