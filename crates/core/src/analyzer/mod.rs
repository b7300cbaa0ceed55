//! External analyzer invocation.
//!
//! The analyzer is an opaque program: it receives the absolute path of a
//! stored video as its last argument and prints one JSON document on stdout,
//! exiting zero on success. Nothing here knows how the analysis is done.

pub mod command;
pub mod invoker;
pub mod subprocess;

pub use command::{AnalyzerCommand, AnalyzerError, AnalyzerOutput, FailureKind};
pub use invoker::{classify, Analysis, AnalysisInvoker};
