use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use analyst_core::analyzer::command::{DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT};
use analyst_core::analyzer::AnalyzerCommand;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`).
    pub request_timeout_secs: u64,
    /// Directory uploaded videos are written to (default: `uploads`).
    pub uploads_dir: PathBuf,
    /// Maximum accepted request body in bytes (default: 512 MiB).
    pub max_upload_bytes: usize,
    /// External analyzer, or `None` to store uploads without analysis.
    pub analyzer: Option<AnalyzerCommand>,
    /// Include (redacted) analyzer diagnostics in 500 responses.
    pub expose_analyzer_diagnostics: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `HOST`                        | `0.0.0.0`               |
    /// | `PORT`                        | `5000`                  |
    /// | `CORS_ORIGINS`                | `*`                     |
    /// | `REQUEST_TIMEOUT_SECS`        | `120`                   |
    /// | `UPLOADS_DIR`                 | `uploads`               |
    /// | `MAX_UPLOAD_BYTES`            | `536870912`             |
    /// | `ANALYZER_PROGRAM`            | unset (no analysis)     |
    /// | `ANALYZER_ARGS`               | empty                   |
    /// | `ANALYZER_TIMEOUT_SECS`       | `60`                    |
    /// | `ANALYZER_MAX_CONCURRENT`     | `4`                     |
    /// | `EXPOSE_ANALYZER_DIAGNOSTICS` | `false`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port: u16 = env_parse("PORT", 5000);

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()),
        );

        let request_timeout_secs: u64 = env_parse("REQUEST_TIMEOUT_SECS", 120);

        let uploads_dir = std::env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let max_upload_bytes: usize = env_parse("MAX_UPLOAD_BYTES", 512 * 1024 * 1024);

        let analyzer = std::env::var("ANALYZER_PROGRAM")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(|program| {
                let args = std::env::var("ANALYZER_ARGS").unwrap_or_default();
                let timeout_secs: u64 =
                    env_parse("ANALYZER_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs());
                let max_concurrent: usize =
                    env_parse("ANALYZER_MAX_CONCURRENT", DEFAULT_MAX_CONCURRENT);

                AnalyzerCommand::new(program.trim())
                    .with_args(args.split_whitespace())
                    .with_timeout(Duration::from_secs(timeout_secs))
                    .with_max_concurrent(max_concurrent)
            });

        let expose_analyzer_diagnostics = std::env::var("EXPOSE_ANALYZER_DIAGNOSTICS")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            uploads_dir,
            max_upload_bytes,
            analyzer,
            expose_analyzer_diagnostics,
        }
    }

    /// Whether CORS should accept any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Read and parse `key`, falling back to `default` when unset.
///
/// Panics on an unparsable value: misconfiguration should fail at startup.
fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be valid: {e}")),
        Err(_) => default,
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_filtered() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn flags() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" YES "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
