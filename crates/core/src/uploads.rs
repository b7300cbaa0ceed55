//! Upload storage.
//!
//! Uploaded videos are written once under a single directory with a
//! generated, collision-resistant name:
//!
//! ```text
//! {unix_millis}-{8 hex tie-break}-{sanitized original name}
//! ```
//!
//! Files are created with create-new semantics, so a name is never reused
//! even if two uploads land in the same millisecond with the same tie-break.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::CoreError;

/// Name used when nothing usable survives sanitization.
const FALLBACK_NAME: &str = "video";

/// Longest sanitized original name kept in a generated name.
const MAX_ORIGINAL_LEN: usize = 128;

/// Attempts at finding a free name before giving up.
const MAX_NAME_ATTEMPTS: usize = 4;

/// A video persisted by [`UploadStore::store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVideo {
    /// Generated file name, safe to hand to clients.
    pub file_name: String,
    /// Absolute path on disk. Never sent to clients.
    pub path: PathBuf,
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// Directory parts are dropped and every character outside
/// `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_ORIGINAL_LEN)
        .collect();

    if cleaned.chars().all(|c| c == '.' || c == '_') {
        FALLBACK_NAME.to_string()
    } else {
        cleaned
    }
}

/// Build a generated file name for an upload received at `now`.
pub fn generate_file_name(original: &str, now: DateTime<Utc>) -> String {
    let tie_break = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        now.timestamp_millis(),
        &tie_break[..8],
        sanitize_file_name(original)
    )
}

/// Returns `true` if `name` could have come from [`generate_file_name`]:
/// a single, non-hidden path component of safe characters.
pub fn is_valid_stored_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Directory holding uploaded videos.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open (creating if needed) the uploads directory.
    ///
    /// The path is canonicalized so [`StoredVideo::path`] is always absolute.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, CoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).await?;
        let dir = fs::canonicalize(dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `data` under a fresh generated name.
    ///
    /// The file is fully written and flushed before this returns, so the
    /// returned name always refers to an existing file.
    pub async fn store(&self, original_name: &str, data: &[u8]) -> Result<StoredVideo, CoreError> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let file_name = generate_file_name(original_name, Utc::now());
            let path = self.dir.join(&file_name);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    tracing::debug!(file_name = %file_name, "Generated name taken, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let written = async {
                file.write_all(data).await?;
                file.sync_all().await
            }
            .await;

            if let Err(e) = written {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(e.into());
            }

            tracing::info!(file_name = %file_name, bytes = data.len(), "Stored upload");
            return Ok(StoredVideo { file_name, path });
        }

        Err(CoreError::Internal(
            "Could not allocate a unique upload name".into(),
        ))
    }

    /// Absolute path of a previously stored video, if `file_name` is a valid
    /// stored name and the file exists.
    pub async fn resolve(&self, file_name: &str) -> Option<PathBuf> {
        if !is_valid_stored_name(file_name) {
            return None;
        }
        let path = self.dir.join(file_name);
        fs::metadata(&path)
            .await
            .ok()
            .filter(|m| m.is_file())
            .map(|_| path)
    }
}
