use tracing::trace;

use crate::bars::TimelineBar;
use crate::coords::{position_to_time, Boundaries};
use crate::layout::TimelineLayout;

/// Index of the bar under the pointer at `(x, y)`.
///
/// Only bars overlapping the `x ± hover_slop_px` window qualify. The closest
/// lane wins; within `lane_epsilon` of the same vertical distance the bar whose
/// midpoint is nearer in time wins.
pub fn find_hovered_bar(
    bars: &[TimelineBar],
    width: f64,
    boundaries: &Boundaries,
    x: f64,
    y: f64,
    layout: &TimelineLayout,
) -> Option<usize> {
    let hover_time = position_to_time(width, boundaries, x);
    let window_start = position_to_time(width, boundaries, x - layout.hover_slop_px);
    let window_end = position_to_time(width, boundaries, x + layout.hover_slop_px);

    let mut best: Option<(usize, f64, f64)> = None;
    for (idx, bar) in bars.iter().enumerate() {
        if bar.left_time > window_end || bar.right_time < window_start {
            continue;
        }
        let vertical = (y - bar.lane_middle(layout)).abs();
        let horizontal = (hover_time - (bar.left_time + bar.right_time) / 2.0).abs();
        let better = match best {
            None => true,
            Some((_, best_vertical, best_horizontal)) => {
                if (vertical - best_vertical).abs() < layout.lane_epsilon {
                    horizontal < best_horizontal
                } else {
                    vertical < best_vertical
                }
            }
        };
        if better {
            best = Some((idx, vertical, horizontal));
        }
    }

    let hit = best.map(|(idx, _, _)| idx);
    trace!(x, y, ?hit, "timeline hit test");
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bars::BarKind;

    fn bar(kind: BarKind, left: f64, right: f64) -> TimelineBar {
        TimelineBar {
            kind,
            page: 0,
            index: 0,
            call_id: format!("{left}-{right}"),
            left_time: left,
            right_time: right,
            left_position: left,
            right_position: right,
            label: String::new(),
            title: String::new(),
            type_name: String::new(),
            class_name: String::new(),
        }
    }

    fn setup() -> (Boundaries, TimelineLayout) {
        (Boundaries::new(0.0, 1_000.0), TimelineLayout::default())
    }

    #[test]
    fn no_bars_no_hit() {
        let (b, layout) = setup();
        assert_eq!(find_hovered_bar(&[], 1_000.0, &b, 10.0, 5.0, &layout), None);
    }

    #[test]
    fn bars_outside_the_window_are_ignored() {
        let (b, layout) = setup();
        let bars = vec![bar(BarKind::Action, 100.0, 200.0)];
        assert_eq!(find_hovered_bar(&bars, 1_000.0, &b, 300.0, 5.0, &layout), None);
        assert_eq!(find_hovered_bar(&bars, 1_000.0, &b, 204.0, 5.0, &layout), Some(0));
    }

    #[test]
    fn prefers_the_closest_lane() {
        let (b, layout) = setup();
        let bars = vec![
            bar(BarKind::Action, 100.0, 300.0),
            bar(BarKind::Event, 150.0, 150.0),
        ];
        // Action lane middle is 5.5, event lane middle is 27.5.
        assert_eq!(find_hovered_bar(&bars, 1_000.0, &b, 150.0, 4.0, &layout), Some(0));
        assert_eq!(find_hovered_bar(&bars, 1_000.0, &b, 150.0, 26.0, &layout), Some(1));
    }

    #[test]
    fn same_lane_falls_back_to_nearest_midpoint() {
        let (b, layout) = setup();
        let bars = vec![
            bar(BarKind::Action, 0.0, 400.0),
            bar(BarKind::Action, 300.0, 340.0),
        ];
        assert_eq!(find_hovered_bar(&bars, 1_000.0, &b, 320.0, 5.5, &layout), Some(1));
        assert_eq!(find_hovered_bar(&bars, 1_000.0, &b, 210.0, 5.5, &layout), Some(0));
    }
}
