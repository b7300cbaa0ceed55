//! UI seam for the upload client.
//!
//! A [`Presenter`] owns the visible page elements: the alert prompt, the
//! upload button, the status line, the raw-result box, the video element and
//! the dashboard slots. Methods take `&self` because UI handles are shared;
//! implementations use interior mutability where they need it.

use analyst_core::dashboard::DashboardView;

pub trait Presenter {
    /// Blocking notification, shown before any request is made.
    fn alert(&self, message: &str);

    /// Enable or disable the upload trigger.
    fn set_trigger_enabled(&self, enabled: bool);

    fn set_status(&self, text: &str);

    /// Replace the contents of the raw-result box.
    fn set_result_text(&self, text: &str);

    /// Point the video element at `url` and make it visible.
    fn show_video(&self, url: &str);

    fn render_dashboard(&self, view: &DashboardView);

    /// Highlight `angle` as the only active camera angle.
    fn set_active_angle(&self, angle: &str);
}
