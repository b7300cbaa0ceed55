use std::sync::Arc;

use analyst_core::analyzer::AnalysisInvoker;
use analyst_core::uploads::UploadStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Where uploaded videos are written and served from.
    pub uploads: Arc<UploadStore>,
    /// External analyzer, absent when analysis is disabled.
    pub analyzer: Option<Arc<AnalysisInvoker>>,
}

impl AppState {
    /// Open the uploads directory and build the analyzer from `config`.
    pub async fn from_config(config: ServerConfig) -> Result<Self, analyst_core::error::CoreError> {
        let uploads = UploadStore::open(&config.uploads_dir).await?;
        let analyzer = config
            .analyzer
            .clone()
            .map(|command| Arc::new(AnalysisInvoker::new(command)));

        Ok(Self {
            config: Arc::new(config),
            uploads: Arc::new(uploads),
            analyzer,
        })
    }
}
