//! One dashboard's upload flow.
//!
//! Submit validates the form, claims the trigger, uploads, and on success
//! forwards the report to the dashboard and reseeds the trend chart. Every
//! failure ends with a failure status and a re-enabled trigger.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use analyst_core::angles::AngleSelector;
use analyst_core::chart::{
    ChartSpec, ChartSurface, ChartView, PlaceholderSeries, SeriesSource, TrendChart,
};
use analyst_core::dashboard::{DashboardView, PlayerNames};
use analyst_core::report::AnalysisReport;
use serde_json::Value;

use crate::client::{UploadClient, UploadReply};
use crate::error::ClientError;
use crate::presenter::Presenter;
use crate::trigger::Trigger;

pub const STATUS_UPLOADING: &str = "Uploading & analyzing video...";
pub const STATUS_COMPLETE: &str = "Analysis complete";
pub const STATUS_FAILED: &str = "Upload or analysis failed";

/// What the user filled in before pressing upload.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub video: Option<PathBuf>,
    pub player1_name: String,
    pub player2_name: String,
}

/// Result of a successful submit.
#[derive(Debug, Clone)]
pub struct UploadSummary {
    pub message: String,
    pub video_url: Option<String>,
    pub analysis: Option<Value>,
    pub dashboard: Option<DashboardView>,
}

pub struct UploadSession<P: Presenter, S: ChartSurface> {
    client: UploadClient,
    presenter: P,
    trigger: Trigger,
    chart: Mutex<TrendChart<S>>,
    series: Box<dyn SeriesSource + Send + Sync>,
    angles: Mutex<AngleSelector>,
}

impl<P: Presenter, S: ChartSurface> UploadSession<P, S> {
    pub fn new(client: UploadClient, presenter: P, surface: S) -> Self {
        Self {
            client,
            presenter,
            trigger: Trigger::new(),
            chart: Mutex::new(TrendChart::new(surface)),
            series: Box::new(PlaceholderSeries),
            angles: Mutex::new(AngleSelector::default()),
        }
    }

    /// Replace the offered camera angles. The first one starts active.
    pub fn with_angles<I, A>(mut self, angles: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.angles = Mutex::new(AngleSelector::new(angles)?);
        Ok(self)
    }

    /// Replace the source of chart series values.
    pub fn with_series_source(mut self, source: impl SeriesSource + Send + Sync + 'static) -> Self {
        self.series = Box::new(source);
        self
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn is_uploading(&self) -> bool {
        self.trigger.is_in_flight()
    }

    /// Run one upload.
    ///
    /// With no video selected the user is alerted and no request is sent.
    pub async fn submit(&self, form: &UploadForm) -> Result<UploadSummary, ClientError> {
        let Some(video) = form.video.as_deref() else {
            self.presenter.alert(&ClientError::NoFileSelected.to_string());
            return Err(ClientError::NoFileSelected);
        };

        let Some(_in_flight) = self.trigger.acquire(&self.presenter) else {
            return Err(ClientError::RequestInFlight);
        };

        let names = PlayerNames::new(&form.player1_name, &form.player2_name);

        self.presenter.set_status(STATUS_UPLOADING);
        self.presenter.set_result_text("");

        match self.client.upload(video).await {
            Ok(reply) => Ok(self.apply(reply, &names)),
            Err(err) => {
                tracing::warn!(error = %err, "Upload failed");
                self.presenter.set_status(STATUS_FAILED);
                self.presenter.set_result_text(&format!("Error: {err}"));
                Err(err)
            }
        }
    }

    /// Draw `view` on the trend chart. Does nothing before the first report.
    pub fn show_chart(&self, view: ChartView) -> Option<ChartSpec> {
        self.lock_chart().show(view).cloned()
    }

    /// Make `angle` the only active camera angle and mirror it on the
    /// presenter. An unknown angle leaves the current one active.
    pub fn select_angle(&self, angle: &str) -> Result<(), ClientError> {
        let mut angles = self.angles.lock().unwrap_or_else(PoisonError::into_inner);
        angles.select(angle)?;
        self.presenter.set_active_angle(angles.active());
        Ok(())
    }

    pub fn active_angle(&self) -> String {
        self.angles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active()
            .to_string()
    }

    pub fn angles(&self) -> Vec<String> {
        self.angles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .angles()
            .to_vec()
    }

    fn apply(&self, reply: UploadReply, names: &PlayerNames) -> UploadSummary {
        let message = reply
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| STATUS_COMPLETE.to_string());
        self.presenter.set_status(&message);

        if let Some(analysis) = &reply.analysis {
            let pretty =
                serde_json::to_string_pretty(analysis).unwrap_or_else(|_| analysis.to_string());
            self.presenter.set_result_text(&pretty);
        }

        // Only reference the video once the server has confirmed its name.
        let video_url = reply.video.as_deref().map(|v| self.client.video_url(v));
        if let Some(url) = &video_url {
            self.presenter.show_video(url);
        }

        let dashboard = reply.analysis.as_ref().map(|analysis| {
            let report = AnalysisReport::from_value(analysis);
            let view = DashboardView::project(Some(&report), names);
            self.presenter.render_dashboard(&view);
            self.lock_chart()
                .seed(Some(&report), names, self.series.as_ref());
            view
        });

        UploadSummary {
            message,
            video_url,
            analysis: reply.analysis,
            dashboard,
        }
    }

    fn lock_chart(&self) -> std::sync::MutexGuard<'_, TrendChart<S>> {
        self.chart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
