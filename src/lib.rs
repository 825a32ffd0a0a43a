//! traceview library
//!
//! Command line front end over the trace model and timeline crates; exposed
//! for integration testing.

pub mod cli;
pub mod config;

pub use config::TraceviewConfig;
pub use traceview_trace_model as model;
pub use traceview_trace_timeline as timeline;
