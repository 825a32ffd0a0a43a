use serde::{Deserialize, Serialize};

/// Geometry of the rendered timeline, in pixels unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineLayout {
    pub min_tick_gap_px: f64,
    pub bar_height: f64,
    pub event_lane_top: f64,
    pub hover_slop_px: f64,
    /// Vertical distances closer than this count as the same lane when hit-testing.
    pub lane_epsilon: f64,
    /// Characters of selector/url detail kept in bar labels.
    pub label_limit: usize,
    /// Upper bound on grid ticks regardless of width.
    pub max_ticks: usize,
}

impl Default for TimelineLayout {
    fn default() -> Self {
        Self {
            min_tick_gap_px: 64.0,
            bar_height: 11.0,
            event_lane_top: 22.0,
            hover_slop_px: 5.0,
            lane_epsilon: 1e-2,
            label_limit: 50,
            max_ticks: 64,
        }
    }
}
