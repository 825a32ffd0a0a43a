use serde::Serialize;

use crate::coords::{time_to_position, Boundaries};
use crate::format::ms_to_string;
use crate::layout::TimelineLayout;

// Absorbs float noise when the span is an exact multiple of the step.
const COUNT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick {
    pub time: f64,
    pub position: f64,
    pub label: String,
}

/// Grid step in milliseconds: a power of ten, or a half or fifth of one, so
/// that neighbouring ticks sit between one and two and a half gaps apart.
///
/// On wide timelines the step is coarsened until the span holds at most
/// `layout.max_ticks` ticks.
pub fn tick_step(width: f64, boundaries: &Boundaries, layout: &TimelineLayout) -> Option<f64> {
    let gap = layout.min_tick_gap_px;
    if !width.is_finite() || width <= 0.0 || gap <= 0.0 || boundaries.is_degenerate() {
        return None;
    }

    let span = boundaries.span();
    let candidates = width / gap;
    let px_per_ms = width / span;
    let raw = span / candidates;

    let mut step = 10f64.powi(raw.log10().ceil() as i32);
    if step * px_per_ms >= 5.0 * gap {
        step /= 5.0;
    }
    if step * px_per_ms >= 2.0 * gap {
        step /= 2.0;
    }

    let max_ticks = layout.max_ticks.max(1) as f64;
    if span / step > max_ticks {
        step = round_step_up(span / max_ticks);
    }
    Some(step)
}

// Smallest 1, 2 or 5 times a power of ten that is >= `value`.
fn round_step_up(value: f64) -> f64 {
    let magnitude = 10f64.powi(value.log10().floor() as i32);
    [1.0, 2.0, 5.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|step| *step >= value)
        .unwrap_or(10.0 * magnitude)
}

pub fn ticks(width: f64, boundaries: &Boundaries, layout: &TimelineLayout) -> Vec<Tick> {
    let Some(step) = tick_step(width, boundaries, layout) else {
        return Vec::new();
    };
    let count = (boundaries.span() / step - COUNT_EPSILON).ceil().max(1.0) as usize;
    (0..count)
        .map(|i| {
            let time = boundaries.minimum + step * i as f64;
            Tick {
                time,
                position: time_to_position(width, boundaries, time),
                label: ms_to_string(time - boundaries.minimum),
            }
        })
        .collect()
}
