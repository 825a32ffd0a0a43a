pub mod accessors;
pub mod blobs;
pub mod errors;
pub mod index;
pub mod loader;
pub mod model;

pub use accessors::{
    all_actions, console_message, events_for_action, find_action, next_action, page_of,
    resources_for_action, stats, ActionStats, ConsoleMessage,
};
pub use blobs::{BlobStore, BODY_UNAVAILABLE};
pub use errors::{TraceError, TraceResult};
pub use index::index_model;
pub use loader::{open_trace, parse_trace, TraceEvent, TraceModel};
pub use model::{
    ActionTraceEvent, CallMetadata, ContextEntry, EntryLinks, ErrorDetails, HeaderEntry,
    PageEntry, ResourceSnapshot, ScreencastFrame, SerializedError, SnapshotRef, StackFrame,
    TraceEventKind,
};
