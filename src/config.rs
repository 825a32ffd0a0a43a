//! Settings for the `traceview` command line tool.
//!
//! Loaded from YAML; every field has a default so a partial file is valid.

use serde::{Deserialize, Serialize};
use traceview_trace_timeline::TimelineLayout;

use crate::cli::output::OutputFormat;

pub const DEFAULT_WIDTH: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceviewConfig {
    #[serde(default)]
    pub timeline: TimelineLayout,
    #[serde(default)]
    pub output: OutputFormat,
    /// Timeline width in pixels when a command does not pass `--width`.
    #[serde(default = "default_width")]
    pub default_width: f64,
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

impl Default for TraceviewConfig {
    fn default() -> Self {
        Self {
            timeline: TimelineLayout::default(),
            output: OutputFormat::default(),
            default_width: DEFAULT_WIDTH,
        }
    }
}
