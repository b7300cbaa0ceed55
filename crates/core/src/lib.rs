//! Domain logic for the snooker video analyst.
//!
//! Everything here is free of HTTP concerns so the server and the upload
//! client can share it: report decoding, the dashboard projection, the
//! trend chart state machine, upload storage, and the external analyzer
//! invocation.

pub mod analyzer;
pub mod angles;
pub mod chart;
pub mod dashboard;
pub mod error;
pub mod report;
pub mod uploads;
