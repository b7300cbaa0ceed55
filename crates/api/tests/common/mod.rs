#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use analyst_api::config::ServerConfig;
use analyst_api::router::build_app_router;
use analyst_api::state::AppState;
use analyst_core::analyzer::AnalyzerCommand;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::{NamedTempFile, TempDir};
use tower::ServiceExt;

const BOUNDARY: &str = "analyst-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as the only CORS origin, a 30-second
/// request timeout and no analyzer.
pub fn test_config(uploads_dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        uploads_dir: uploads_dir.to_path_buf(),
        max_upload_bytes: 10 * 1024 * 1024,
        analyzer: None,
        expose_analyzer_diagnostics: false,
    }
}

/// A router plus the temporary resources it points at.
///
/// Keep this alive for the duration of the test: dropping it removes the
/// uploads directory and the analyzer script.
pub struct TestApp {
    pub router: Router,
    pub uploads: TempDir,
    pub script: Option<NamedTempFile>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Names of the files currently in the uploads directory.
    pub fn stored_files(&self) -> Vec<String> {
        std::fs::read_dir(self.uploads.path())
            .expect("read uploads dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect()
    }

    pub fn uploads_path(&self) -> PathBuf {
        self.uploads.path().canonicalize().expect("canonical uploads dir")
    }
}

/// Build the app with no analyzer configured.
pub async fn build_test_app() -> TestApp {
    build_test_app_with(None, |_| {}).await
}

/// Build the app with a bash analyzer script whose body is `script_body`.
pub async fn build_test_app_with_analyzer(script_body: &str) -> TestApp {
    build_test_app_with(Some(script_body), |_| {}).await
}

/// Build the app, optionally with an analyzer script, letting the caller
/// tweak the config before the state is created.
pub async fn build_test_app_with(
    script_body: Option<&str>,
    tweak: impl FnOnce(&mut ServerConfig),
) -> TestApp {
    let uploads = tempfile::tempdir().expect("create uploads dir");
    let mut config = test_config(uploads.path());

    let script = script_body.map(write_script);
    if let Some(script) = &script {
        config.analyzer = Some(
            AnalyzerCommand::new("bash")
                .with_args([script.path().to_str().expect("script path")])
                .with_timeout(Duration::from_secs(5)),
        );
    }
    tweak(&mut config);

    let state = AppState::from_config(config).await.expect("build state");
    TestApp {
        router: build_app_router(state),
        uploads,
        script,
    }
}

fn write_script(body: &str) -> NamedTempFile {
    let mut f = tempfile::Builder::new()
        .suffix(".sh")
        .tempfile()
        .expect("create script");
    writeln!(f, "#!/bin/bash").expect("write shebang");
    write!(f, "{body}").expect("write body");
    f.flush().expect("flush script");
    f
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A part of a multipart form body.
pub enum Part<'a> {
    File {
        name: &'a str,
        file_name: &'a str,
        data: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

/// Encode `parts` as a `multipart/form-data` body.
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                name,
                file_name,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart form to `uri`.
pub async fn post_multipart(app: Router, uri: &str, parts: &[Part<'_>]) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Upload a single `video` file to `/api/upload`.
pub async fn upload_video(app: Router, file_name: &str, data: &[u8]) -> Response {
    post_multipart(
        app,
        "/api/upload",
        &[Part::File {
            name: "video",
            file_name,
            data,
        }],
    )
    .await
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}
