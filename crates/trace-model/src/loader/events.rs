use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::errors::{TraceError, TraceResult};
use crate::model::{
    ActionTraceEvent, CallMetadata, ContextEntry, PageEntry, ResourceSnapshot, ScreencastFrame,
    TraceEventKind,
};

/// One line of the recorder's event stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TraceEvent {
    ContextOptions(ContextOptionsEvent),
    ScreencastFrame(ScreencastFrameEvent),
    ResourceSnapshot(ResourceSnapshotEvent),
    FrameSnapshot(FrameSnapshotEvent),
    Action(CallEvent),
    Event(CallEvent),
    Object(ObjectEvent),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextOptionsEvent {
    #[serde(default)]
    pub browser_name: String,
    #[serde(default)]
    pub wall_time: Option<f64>,
    #[serde(default)]
    pub options: JsonValue,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreencastFrameEvent {
    pub page_id: String,
    pub sha1: String,
    pub timestamp: f64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceSnapshotEvent {
    pub snapshot: ResourceSnapshot,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FrameSnapshotEvent {
    #[serde(default)]
    pub snapshot: JsonValue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallEvent {
    pub metadata: CallMetadata,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEvent {
    pub page_id: String,
    pub guid: String,
    #[serde(default, alias = "initializer")]
    pub object_snapshot: JsonValue,
}

/// Accumulates trace events into a [`ContextEntry`].
///
/// Pages are created on first reference, in the order they are first seen.
#[derive(Debug)]
pub struct TraceModel {
    context: ContextEntry,
    pages: HashMap<String, usize>,
    bounds: Option<(f64, f64)>,
    frame_snapshots: usize,
    skipped: usize,
}

impl Default for TraceModel {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceModel {
    pub fn new() -> Self {
        Self {
            context: ContextEntry::default(),
            pages: HashMap::new(),
            bounds: None,
            frame_snapshots: 0,
            skipped: 0,
        }
    }

    pub fn append_lines(&mut self, text: &str) -> TraceResult<()> {
        for (idx, line) in text.lines().enumerate() {
            self.append_line(idx + 1, line)?;
        }
        Ok(())
    }

    pub fn append_line(&mut self, line_no: usize, line: &str) -> TraceResult<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        let event: TraceEvent =
            serde_json::from_str(line).map_err(|err| TraceError::Malformed {
                line: line_no,
                reason: err.to_string(),
            })?;
        self.append_event(event);
        Ok(())
    }

    pub fn append_event(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::ContextOptions(options) => {
                self.context.browser_name = options.browser_name;
                self.context.wall_time = options.wall_time;
                self.context.options = options.options;
            }
            TraceEvent::ScreencastFrame(frame) => {
                self.page_entry(&frame.page_id)
                    .screencast_frames
                    .push(ScreencastFrame {
                        sha1: frame.sha1,
                        timestamp: frame.timestamp,
                        width: frame.width,
                        height: frame.height,
                    });
            }
            TraceEvent::ResourceSnapshot(resource) => {
                self.context.resources.push(resource.snapshot);
            }
            TraceEvent::FrameSnapshot(_) => {
                self.frame_snapshots += 1;
            }
            TraceEvent::Action(call) => self.append_call(TraceEventKind::Action, call.metadata),
            TraceEvent::Event(call) => self.append_call(TraceEventKind::Event, call.metadata),
            TraceEvent::Object(object) => {
                self.page_entry(&object.page_id)
                    .objects
                    .insert(object.guid, object.object_snapshot);
            }
            TraceEvent::Unknown => {
                self.skipped += 1;
            }
        }
    }

    fn append_call(&mut self, kind: TraceEventKind, metadata: CallMetadata) {
        let Some(page_id) = metadata.page_id.clone() else {
            warn!(call = %metadata.id, method = %metadata.method, "trace call without page; skipping");
            self.skipped += 1;
            return;
        };

        let start = metadata.start_time;
        let end = metadata.end_time.max(start);
        self.bounds = Some(match self.bounds {
            Some((lo, hi)) => (lo.min(start), hi.max(end)),
            None => (start, end),
        });

        let page = self.page_entry(&page_id);
        match kind {
            TraceEventKind::Action => page.actions.push(ActionTraceEvent::action(metadata)),
            TraceEventKind::Event => page.events.push(ActionTraceEvent::event(metadata)),
        }
    }

    fn page_entry(&mut self, page_id: &str) -> &mut PageEntry {
        let idx = match self.pages.get(page_id) {
            Some(idx) => *idx,
            None => {
                let idx = self.context.pages.len();
                self.context.pages.push(PageEntry::new(page_id));
                self.pages.insert(page_id.to_string(), idx);
                idx
            }
        };
        &mut self.context.pages[idx]
    }

    /// Finish loading: order per-page entries by time and settle the context range.
    pub fn build(self) -> ContextEntry {
        let mut context = self.context;
        for page in &mut context.pages {
            page.actions
                .sort_by(|a, b| a.metadata.start_time.total_cmp(&b.metadata.start_time));
            page.events
                .sort_by(|a, b| a.metadata.start_time.total_cmp(&b.metadata.start_time));
            page.screencast_frames
                .sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
        }
        if let Some((start, end)) = self.bounds {
            context.start_time = start;
            context.end_time = end;
        }
        debug!(
            pages = context.pages.len(),
            resources = context.resources.len(),
            frame_snapshots = self.frame_snapshots,
            skipped = self.skipped,
            "trace event stream loaded"
        );
        context
    }
}
