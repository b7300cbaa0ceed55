//! Per-player accuracy trend chart.
//!
//! [`TrendChart`] owns the chart state for one dashboard: the two seeded
//! series and at most one live render instance on a [`ChartSurface`]. Every
//! view switch destroys the previous instance before creating the next one.
//!
//! Series values come from a [`SeriesSource`]. The analyzer does not emit
//! per-sample accuracy yet, so the only source shipped is
//! [`PlaceholderSeries`].

use serde::Serialize;

use crate::dashboard::PlayerNames;
use crate::report::AnalysisReport;

/// Number of samples on the x axis (ticks `1..=SAMPLE_COUNT`).
pub const SAMPLE_COUNT: usize = 10;

/// Lower bound of the displayed accuracy band.
pub const Y_MIN: f64 = 20.0;

/// Upper bound of the displayed accuracy band.
pub const Y_MAX: f64 = 90.0;

pub const X_AXIS_TITLE: &str = "Frames";

pub const PLAYER1_COLOR: &str = "#c9a24d";
pub const PLAYER2_COLOR: &str = "#6bbf9c";

const LINE_TENSION: f64 = 0.4;

const PLACEHOLDER_PLAYER1: [f64; SAMPLE_COUNT] =
    [20.0, 28.0, 35.0, 42.0, 50.0, 58.0, 65.0, 72.0, 78.0, 84.0];
const PLACEHOLDER_PLAYER2: [f64; SAMPLE_COUNT] =
    [15.0, 22.0, 30.0, 38.0, 45.0, 52.0, 60.0, 66.0, 72.0, 78.0];

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Accuracy samples for both players, one value per axis tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPair {
    pub player1: Vec<f64>,
    pub player2: Vec<f64>,
}

/// Supplies the per-sample values plotted for a completed analysis.
pub trait SeriesSource {
    fn series(&self, report: Option<&AnalysisReport>) -> SeriesPair;
}

/// Fixed illustrative values, independent of the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderSeries;

impl SeriesSource for PlaceholderSeries {
    fn series(&self, _report: Option<&AnalysisReport>) -> SeriesPair {
        SeriesPair {
            player1: PLACEHOLDER_PLAYER1.to_vec(),
            player2: PLACEHOLDER_PLAYER2.to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Render description
// ---------------------------------------------------------------------------

/// Which series the chart currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartView {
    Player1,
    Player2,
    Both,
}

/// A single plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: &'static str,
    pub tension: f64,
}

/// Everything a surface needs to draw one chart instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub labels: Vec<u32>,
    pub datasets: Vec<ChartSeries>,
    pub x_title: &'static str,
    pub y_min: f64,
    pub y_max: f64,
}

/// A drawing target able to host chart instances.
///
/// The chart guarantees it destroys the previous handle before creating a
/// new one.
pub trait ChartSurface {
    type Handle;

    fn create(&mut self, spec: &ChartSpec) -> Self::Handle;

    fn destroy(&mut self, handle: Self::Handle);
}

// ---------------------------------------------------------------------------
// Chart state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Seeded {
    names: PlayerNames,
    series: SeriesPair,
}

/// Trend chart component with an explicit lifecycle.
pub struct TrendChart<S: ChartSurface> {
    surface: S,
    seeded: Option<Seeded>,
    instance: Option<S::Handle>,
    view: Option<ChartView>,
    spec: Option<ChartSpec>,
}

impl<S: ChartSurface> TrendChart<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            seeded: None,
            instance: None,
            view: None,
            spec: None,
        }
    }

    /// Load series for a freshly completed analysis.
    ///
    /// Any chart drawn for a previous report is torn down; nothing is drawn
    /// until a view is requested.
    pub fn seed(
        &mut self,
        report: Option<&AnalysisReport>,
        names: &PlayerNames,
        source: &dyn SeriesSource,
    ) {
        self.clear();
        let mut series = source.series(report);
        series.player1.truncate(SAMPLE_COUNT);
        series.player2.truncate(SAMPLE_COUNT);
        self.seeded = Some(Seeded {
            names: names.clone(),
            series,
        });
    }

    /// Switch to `view`, replacing whatever is drawn.
    ///
    /// Returns `None` (and draws nothing) until the chart has been seeded.
    pub fn show(&mut self, view: ChartView) -> Option<&ChartSpec> {
        let spec = build_spec(self.seeded.as_ref()?, view);

        if let Some(previous) = self.instance.take() {
            self.surface.destroy(previous);
        }
        self.instance = Some(self.surface.create(&spec));
        self.view = Some(view);
        self.spec = Some(spec);
        self.spec.as_ref()
    }

    /// Destroy the live instance, if any.
    pub fn clear(&mut self) {
        if let Some(previous) = self.instance.take() {
            self.surface.destroy(previous);
        }
        self.view = None;
        self.spec = None;
    }

    pub fn view(&self) -> Option<ChartView> {
        self.view
    }

    pub fn current_spec(&self) -> Option<&ChartSpec> {
        self.spec.as_ref()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded.is_some()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

fn build_spec(seeded: &Seeded, view: ChartView) -> ChartSpec {
    let names = &seeded.names;
    let series = &seeded.series;

    let datasets = match view {
        ChartView::Player1 => vec![line(
            format!("{} Accuracy %", names.player1),
            &series.player1,
            PLAYER1_COLOR,
        )],
        ChartView::Player2 => vec![line(
            format!("{} Accuracy %", names.player2),
            &series.player2,
            PLAYER2_COLOR,
        )],
        ChartView::Both => vec![
            line(names.player1.clone(), &series.player1, PLAYER1_COLOR),
            line(names.player2.clone(), &series.player2, PLAYER2_COLOR),
        ],
    };

    ChartSpec {
        labels: (1..=SAMPLE_COUNT as u32).collect(),
        datasets,
        x_title: X_AXIS_TITLE,
        y_min: Y_MIN,
        y_max: Y_MAX,
    }
}

fn line(label: String, data: &[f64], color: &'static str) -> ChartSeries {
    ChartSeries {
        label,
        data: data.to_vec(),
        border_color: color,
        tension: LINE_TENSION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Surface that tracks how many instances are alive.
    #[derive(Default)]
    struct CountingSurface {
        next_id: u32,
        alive: Vec<u32>,
        created: u32,
    }

    impl ChartSurface for CountingSurface {
        type Handle = u32;

        fn create(&mut self, _spec: &ChartSpec) -> u32 {
            self.next_id += 1;
            self.created += 1;
            self.alive.push(self.next_id);
            self.next_id
        }

        fn destroy(&mut self, handle: u32) {
            self.alive.retain(|id| *id != handle);
        }
    }

    fn seeded_chart() -> TrendChart<CountingSurface> {
        let mut chart = TrendChart::new(CountingSurface::default());
        chart.seed(None, &PlayerNames::new("Alice", "Bob"), &PlaceholderSeries);
        chart
    }

    #[test]
    fn switching_views_keeps_one_instance_alive() {
        let mut chart = seeded_chart();

        for view in [ChartView::Player1, ChartView::Player2, ChartView::Both] {
            chart.show(view).expect("seeded chart renders");
            assert_eq!(chart.surface().alive.len(), 1);
        }
        assert_eq!(chart.surface().created, 3);
        assert_eq!(chart.view(), Some(ChartView::Both));
    }

    #[test]
    fn unseeded_chart_draws_nothing() {
        let mut chart = TrendChart::new(CountingSurface::default());
        assert!(chart.show(ChartView::Both).is_none());
        assert!(chart.surface().alive.is_empty());
        assert_eq!(chart.view(), None);
    }

    #[test]
    fn reseeding_tears_down_previous_instance() {
        let mut chart = seeded_chart();
        chart.show(ChartView::Player1);
        chart.seed(None, &PlayerNames::new("Carol", "Dan"), &PlaceholderSeries);

        assert!(chart.surface().alive.is_empty());
        assert_eq!(chart.view(), None);

        let spec = chart.show(ChartView::Player2).expect("renders");
        assert_eq!(spec.datasets[0].label, "Dan Accuracy %");
    }

    #[test]
    fn single_view_labels_and_colors() {
        let mut chart = seeded_chart();
        let spec = chart.show(ChartView::Player1).expect("renders");

        assert_eq!(spec.datasets.len(), 1);
        assert_eq!(spec.datasets[0].label, "Alice Accuracy %");
        assert_eq!(spec.datasets[0].border_color, PLAYER1_COLOR);
        assert_eq!(spec.datasets[0].data, PLACEHOLDER_PLAYER1.to_vec());
    }

    #[test]
    fn compare_view_uses_plain_names() {
        let mut chart = seeded_chart();
        let spec = chart.show(ChartView::Both).expect("renders");

        let labels: Vec<_> = spec.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Alice", "Bob"]);
        assert_eq!(spec.datasets[1].border_color, PLAYER2_COLOR);
    }

    #[test]
    fn axis_is_fixed() {
        let mut chart = seeded_chart();
        let spec = chart.show(ChartView::Both).expect("renders");

        assert_eq!(spec.labels, (1..=10).collect::<Vec<u32>>());
        assert_eq!(spec.x_title, "Frames");
        assert_eq!((spec.y_min, spec.y_max), (20.0, 90.0));
    }

    #[test]
    fn long_series_are_truncated_to_axis() {
        struct Long;
        impl SeriesSource for Long {
            fn series(&self, _report: Option<&AnalysisReport>) -> SeriesPair {
                SeriesPair {
                    player1: vec![50.0; 25],
                    player2: vec![60.0; 3],
                }
            }
        }

        let mut chart = TrendChart::new(CountingSurface::default());
        chart.seed(None, &PlayerNames::default(), &Long);
        let spec = chart.show(ChartView::Both).expect("renders");
        assert_eq!(spec.datasets[0].data.len(), SAMPLE_COUNT);
        assert_eq!(spec.datasets[1].data.len(), 3);
    }

    #[test]
    fn clear_destroys_instance() {
        let mut chart = seeded_chart();
        chart.show(ChartView::Player2);
        chart.clear();
        assert!(chart.surface().alive.is_empty());
        assert!(chart.current_spec().is_none());
        assert!(chart.is_seeded());
    }
}
