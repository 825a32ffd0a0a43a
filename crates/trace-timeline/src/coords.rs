use serde::{Deserialize, Serialize};
use traceview_trace_model::ContextEntry;

/// Timestamp range mapped onto the timeline width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundaries {
    pub minimum: f64,
    pub maximum: f64,
}

impl Boundaries {
    pub fn new(minimum: f64, maximum: f64) -> Self {
        Self { minimum, maximum }
    }

    pub fn from_context(context: &ContextEntry) -> Self {
        Self::new(context.start_time, context.end_time)
    }

    pub fn span(&self) -> f64 {
        self.maximum - self.minimum
    }

    /// Empty, inverted or non-finite ranges cannot be projected.
    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        !(span.is_finite() && span > 0.0)
    }
}

pub fn time_to_position(width: f64, boundaries: &Boundaries, time: f64) -> f64 {
    if boundaries.is_degenerate() || width <= 0.0 {
        return 0.0;
    }
    (time - boundaries.minimum) / boundaries.span() * width
}

pub fn position_to_time(width: f64, boundaries: &Boundaries, x: f64) -> f64 {
    if boundaries.is_degenerate() || width <= 0.0 {
        return boundaries.minimum;
    }
    x / width * boundaries.span() + boundaries.minimum
}
