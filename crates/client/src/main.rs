//! `analyst-upload` -- upload a match video from the command line.
//!
//! ```text
//! analyst-upload <video> [player1 name] [player2 name]
//! ```
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                 | Description                        |
//! |------------------------|----------|-------------------------|------------------------------------|
//! | `ANALYST_SERVER_URL`   | no       | `http://localhost:5000` | Base URL of the server             |
//! | `ANALYST_CAMERA_ANGLE` | no       | `Top`                   | Camera angle (`Top`, `Side`, `Player`) |

use std::path::PathBuf;

use analyst_client::client::{UploadClient, DEFAULT_SERVER_URL};
use analyst_client::presenter::Presenter;
use analyst_client::session::{UploadForm, UploadSession};
use analyst_core::chart::{ChartSpec, ChartSurface, ChartView};
use analyst_core::dashboard::DashboardView;
use analyst_core::report::format_number;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Writes every UI update to the terminal.
struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        tracing::debug!(enabled, "Upload trigger");
    }

    fn set_status(&self, text: &str) {
        println!("{text}");
    }

    fn set_result_text(&self, text: &str) {
        if !text.is_empty() {
            println!("{text}");
        }
    }

    fn show_video(&self, url: &str) {
        println!("Video: {url}");
    }

    fn render_dashboard(&self, view: &DashboardView) {
        for (slot, value) in view.slots() {
            println!("  {slot:<10} {value}");
        }
    }

    fn set_active_angle(&self, angle: &str) {
        println!("Camera angle: {angle}");
    }
}

/// Prints each chart instance as one row per series.
struct TextChart;

impl ChartSurface for TextChart {
    type Handle = ();

    fn create(&mut self, spec: &ChartSpec) {
        println!(
            "{} {:?} (accuracy {}-{})",
            spec.x_title,
            spec.labels,
            format_number(spec.y_min),
            format_number(spec.y_max)
        );
        for series in &spec.datasets {
            let values: Vec<String> = series.data.iter().map(|v| format_number(*v)).collect();
            println!("  {:<24} {}", series.label, values.join(" "));
        }
    }

    fn destroy(&mut self, _handle: ()) {}
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analyst_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let form = UploadForm {
        video: args.next().map(PathBuf::from),
        player1_name: args.next().unwrap_or_default(),
        player2_name: args.next().unwrap_or_default(),
    };

    let server_url =
        std::env::var("ANALYST_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.into());
    tracing::info!(server = %server_url, "Starting upload");

    let session = UploadSession::new(UploadClient::new(server_url), ConsolePresenter, TextChart);

    if let Ok(angle) = std::env::var("ANALYST_CAMERA_ANGLE") {
        if let Err(err) = session.select_angle(angle.trim()) {
            eprintln!("{err}; available angles: {}", session.angles().join(", "));
            std::process::exit(2);
        }
    }

    match session.submit(&form).await {
        Ok(summary) => {
            if summary.dashboard.is_some() {
                session.show_chart(ChartView::Both);
            }
        }
        Err(err) => {
            tracing::debug!(error = ?err, "Upload did not complete");
            std::process::exit(1);
        }
    }
}
