//! In-memory shape of a recorded trace.
//!
//! The serialized fields mirror the `context` document the recorder produces.
//! Fields marked `#[serde(skip)]` are derived by [`crate::index::index_model`]
//! and are never read back from disk.

use std::collections::BTreeMap;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextEntry {
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub end_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_time: Option<f64>,
    #[serde(default)]
    pub browser_name: String,
    #[serde(default)]
    pub options: JsonValue,
    #[serde(default)]
    pub pages: Vec<PageEntry>,
    #[serde(default)]
    pub resources: Vec<ResourceSnapshot>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default)]
    pub actions: Vec<ActionTraceEvent>,
    #[serde(default)]
    pub events: Vec<ActionTraceEvent>,
    /// Objects referenced by events through an opaque `guid`, e.g. console messages.
    #[serde(default)]
    pub objects: BTreeMap<String, JsonValue>,
    #[serde(default)]
    pub screencast_frames: Vec<ScreencastFrame>,
    #[serde(skip)]
    pub(crate) position: Option<usize>,
}

impl PageEntry {
    pub fn new(page_id: impl Into<String>) -> Self {
        Self {
            page_id: Some(page_id.into()),
            ..Self::default()
        }
    }

    /// Position of this page inside its context, once indexed.
    pub fn position(&self) -> Option<usize> {
        self.position
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceEventKind {
    #[default]
    Action,
    Event,
}

/// Back and forward references computed by the indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLinks {
    pub page: usize,
    pub index: usize,
    pub next: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionTraceEvent {
    #[serde(rename = "type", default)]
    pub kind: TraceEventKind,
    pub metadata: CallMetadata,
    #[serde(skip)]
    pub(crate) links: Option<EntryLinks>,
    #[serde(skip)]
    pub(crate) events_memo: OnceCell<Vec<usize>>,
    #[serde(skip)]
    pub(crate) resources_memo: OnceCell<Vec<usize>>,
}

impl ActionTraceEvent {
    pub fn new(kind: TraceEventKind, metadata: CallMetadata) -> Self {
        Self {
            kind,
            metadata,
            links: None,
            events_memo: OnceCell::new(),
            resources_memo: OnceCell::new(),
        }
    }

    pub fn action(metadata: CallMetadata) -> Self {
        Self::new(TraceEventKind::Action, metadata)
    }

    pub fn event(metadata: CallMetadata) -> Self {
        Self::new(TraceEventKind::Event, metadata)
    }

    pub fn links(&self) -> Option<EntryLinks> {
        self.links
    }

    pub fn is_action(&self) -> bool {
        self.kind == TraceEventKind::Action
    }

    pub fn start_time(&self) -> f64 {
        self.metadata.start_time
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_name: Option<String>,
    #[serde(default)]
    pub params: JsonValue,
    #[serde(default)]
    pub start_time: f64,
    /// Zero when the call never finished.
    #[serde(default)]
    pub end_time: f64,
    #[serde(default)]
    pub log: Vec<String>,
    #[serde(default)]
    pub snapshots: Vec<SnapshotRef>,
    #[serde(default)]
    pub stack: Vec<StackFrame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<SerializedError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
}

impl CallMetadata {
    pub fn selector(&self) -> Option<&str> {
        self.params.get("selector").and_then(JsonValue::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.params.get("url").and_then(JsonValue::as_str)
    }

    /// Public API name, falling back to `<type>.<method>` for internal calls.
    pub fn display_name(&self) -> String {
        match &self.api_name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("{}.{}", self.type_name, self.method),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.end_time != 0.0
    }

    pub fn duration(&self) -> Option<f64> {
        self.is_finished().then(|| self.end_time - self.start_time)
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(|err| err.error.as_ref())
            .map(|details| details.message.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRef {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snapshot_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackFrame {
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default)]
    pub function: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSnapshot {
    #[serde(default)]
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub request_headers: Vec<HeaderEntry>,
    #[serde(default)]
    pub response_headers: Vec<HeaderEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_sha1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_sha1: Option<String>,
    /// Monotonic timestamp in milliseconds, same clock as `CallMetadata::start_time`.
    #[serde(default)]
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreencastFrame {
    pub sha1: String,
    pub timestamp: f64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}
