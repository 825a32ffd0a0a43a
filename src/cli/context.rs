use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::fs;
use tracing::info;
use traceview_trace_model::{open_trace, ContextEntry};
use traceview_trace_timeline::TimelineLayout;

use crate::cli::output::OutputFormat;
use crate::config::TraceviewConfig;

/// Widest timeline a command will lay out, in pixels.
pub const MAX_WIDTH_PX: f64 = 1_000_000.0;

pub struct CliContext {
    config: Arc<TraceviewConfig>,
    config_path: PathBuf,
    output: OutputFormat,
}

impl CliContext {
    pub fn new(config: TraceviewConfig, config_path: PathBuf, output: OutputFormat) -> Self {
        Self {
            config: Arc::new(config),
            config_path,
            output,
        }
    }

    pub fn config(&self) -> &TraceviewConfig {
        self.config.as_ref()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn layout(&self) -> &TimelineLayout {
        &self.config.timeline
    }

    /// `--width` if given, else the configured default.
    pub fn width(&self, requested: Option<f64>) -> Result<f64> {
        let width = requested.unwrap_or(self.config.default_width);
        if !(width.is_finite() && width > 0.0) {
            bail!("timeline width must be a positive number, got {width}");
        }
        if width > MAX_WIDTH_PX {
            bail!("timeline width {width} exceeds the {MAX_WIDTH_PX}px limit");
        }
        Ok(width)
    }

    /// Read, parse and index a trace file.
    pub async fn load_trace(&self, path: &Path) -> Result<Arc<ContextEntry>> {
        let text = fs::read_to_string(path)
            .await
            .with_context(|| format!("reading trace {}", path.display()))?;
        let context =
            open_trace(&text).with_context(|| format!("loading trace {}", path.display()))?;
        info!(
            path = %path.display(),
            pages = context.pages.len(),
            resources = context.resources.len(),
            "trace loaded"
        );
        Ok(Arc::new(context))
    }
}
