use serde::Serialize;
use traceview_trace_model::{ActionTraceEvent, CallMetadata, ContextEntry};

use crate::coords::{time_to_position, Boundaries};
use crate::format::{ms_to_string, trim_right};
use crate::layout::TimelineLayout;

const TIMED_OUT: &str = "Timed Out";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarKind {
    Action,
    Event,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineBar {
    pub kind: BarKind,
    pub page: usize,
    pub index: usize,
    pub call_id: String,
    pub left_time: f64,
    pub right_time: f64,
    pub left_position: f64,
    pub right_position: f64,
    pub label: String,
    pub title: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub class_name: String,
}

impl TimelineBar {
    pub fn lane_top(&self, layout: &TimelineLayout) -> f64 {
        match self.kind {
            BarKind::Action => 0.0,
            BarKind::Event => layout.event_lane_top,
        }
    }

    pub fn lane_middle(&self, layout: &TimelineLayout) -> f64 {
        layout.bar_height / 2.0 + self.lane_top(layout)
    }
}

/// `apiName` plus the selector, or the url for navigations.
pub fn action_label(metadata: &CallMetadata, limit: usize) -> String {
    let detail = if metadata.method == "goto" {
        metadata.url()
    } else {
        metadata.selector()
    };
    let detail = trim_right(detail.unwrap_or_default(), limit);
    format!("{} {}", metadata.display_name(), detail)
        .trim_end()
        .to_string()
}

/// One bar per action and one zero-width bar per event, page by page.
///
/// Unfinished actions extend to the end of the boundaries.
pub fn build_bars(
    context: &ContextEntry,
    width: f64,
    boundaries: &Boundaries,
    layout: &TimelineLayout,
) -> Vec<TimelineBar> {
    let mut bars = Vec::new();
    for (page_idx, page) in context.pages.iter().enumerate() {
        for (idx, action) in page.actions.iter().enumerate() {
            let meta = &action.metadata;
            let right_time = if meta.is_finished() {
                meta.end_time
            } else {
                boundaries.maximum.max(meta.start_time)
            };
            bars.push(bar(
                BarKind::Action,
                page_idx,
                idx,
                action,
                (meta.start_time, right_time),
                action_label(meta, layout.label_limit),
                width,
                boundaries,
            ));
        }
        for (idx, event) in page.events.iter().enumerate() {
            let start = event.metadata.start_time;
            bars.push(bar(
                BarKind::Event,
                page_idx,
                idx,
                event,
                (start, start),
                event.metadata.method.clone(),
                width,
                boundaries,
            ));
        }
    }
    bars
}

#[allow(clippy::too_many_arguments)]
fn bar(
    kind: BarKind,
    page: usize,
    index: usize,
    entry: &ActionTraceEvent,
    (left_time, right_time): (f64, f64),
    label: String,
    width: f64,
    boundaries: &Boundaries,
) -> TimelineBar {
    let meta = &entry.metadata;
    let title = match (kind, meta.duration()) {
        (_, Some(duration)) => ms_to_string(duration),
        (BarKind::Event, None) => ms_to_string(0.0),
        (BarKind::Action, None) => TIMED_OUT.to_string(),
    };
    TimelineBar {
        kind,
        page,
        index,
        call_id: meta.id.clone(),
        left_time,
        right_time,
        left_position: time_to_position(width, boundaries, left_time),
        right_position: time_to_position(width, boundaries, right_time),
        label,
        title,
        type_name: format!("{}.{}", meta.type_name, meta.method),
        class_name: format!("{}_{}", meta.type_name, meta.method).to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use traceview_trace_model::PageEntry;

    fn meta(method: &str, params: serde_json::Value, start: f64, end: f64) -> CallMetadata {
        CallMetadata {
            id: format!("{method}@{start}"),
            type_name: "Frame".into(),
            method: method.into(),
            api_name: Some(format!("page.{method}")),
            params,
            start_time: start,
            end_time: end,
            ..CallMetadata::default()
        }
    }

    #[test]
    fn labels_prefer_url_for_navigation() {
        let goto = meta("goto", json!({"url": "https://a.test", "selector": "x"}), 0.0, 1.0);
        assert_eq!(action_label(&goto, 50), "page.goto https://a.test");

        let click = meta("click", json!({"selector": "#buy-now-button"}), 0.0, 1.0);
        assert_eq!(action_label(&click, 4), "page.click #buy\u{2026}");

        let plain = meta("reload", json!({}), 0.0, 1.0);
        assert_eq!(action_label(&plain, 50), "page.reload");
    }

    #[test]
    fn builds_action_and_event_bars() {
        let mut page = PageEntry::new("page@1");
        page.actions = vec![
            ActionTraceEvent::action(meta("click", json!({"selector": "a"}), 100.0, 350.0)),
            ActionTraceEvent::action(meta("fill", json!({"selector": "b"}), 400.0, 0.0)),
        ];
        page.events = vec![ActionTraceEvent::event(CallMetadata {
            type_name: "Page".into(),
            method: "console".into(),
            start_time: 200.0,
            end_time: 200.0,
            ..CallMetadata::default()
        })];
        let ctx = ContextEntry {
            start_time: 0.0,
            end_time: 1_000.0,
            pages: vec![page],
            ..ContextEntry::default()
        };
        let b = Boundaries::from_context(&ctx);
        let bars = build_bars(&ctx, 1_000.0, &b, &TimelineLayout::default());

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].title, "250ms");
        assert_eq!(bars[0].type_name, "Frame.click");
        assert_eq!(bars[0].class_name, "frame_click");
        assert_eq!(bars[0].left_position, 100.0);
        assert_eq!(bars[0].right_position, 350.0);

        assert_eq!(bars[1].title, "Timed Out");
        assert_eq!(bars[1].right_time, 1_000.0);

        assert_eq!(bars[2].kind, BarKind::Event);
        assert_eq!(bars[2].label, "console");
        assert_eq!(bars[2].left_position, bars[2].right_position);
        assert_eq!(bars[2].title, "0");
    }
}
