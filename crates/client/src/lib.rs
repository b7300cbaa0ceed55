//! Upload client for the snooker video analyst.
//!
//! [`session::UploadSession`] is the client-side half of the pipeline: it
//! validates the form, uploads the video, and drives a [`presenter::Presenter`]
//! with the status line, raw report, video URL, dashboard and trend chart.

pub mod client;
pub mod error;
pub mod presenter;
pub mod session;
pub mod trigger;
