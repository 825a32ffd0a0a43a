mod context;
mod events;

use crate::errors::TraceResult;
use crate::index::index_model;
use crate::model::ContextEntry;

pub use context::from_context_document;
pub use events::{
    CallEvent, ContextOptionsEvent, FrameSnapshotEvent, ObjectEvent, ResourceSnapshotEvent,
    ScreencastFrameEvent, TraceEvent, TraceModel,
};

/// Parse either a serialized context document or a line-delimited event stream.
///
/// The result is not indexed; see [`open_trace`].
pub fn parse_trace(text: &str) -> TraceResult<ContextEntry> {
    if let Some(context) = from_context_document(text)? {
        return Ok(context);
    }
    let mut model = TraceModel::new();
    model.append_lines(text)?;
    Ok(model.build())
}

/// Parse and index a trace in one step.
pub fn open_trace(text: &str) -> TraceResult<ContextEntry> {
    let mut context = parse_trace(text)?;
    index_model(&mut context);
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessors::next_action;

    #[test]
    fn opened_traces_are_linked() {
        let text = concat!(
            r#"{"type":"action","metadata":{"id":"c1","pageId":"p","type":"Frame","method":"click","startTime":1,"endTime":2}}"#,
            "\n",
            r#"{"type":"action","metadata":{"id":"c2","pageId":"p","type":"Frame","method":"fill","startTime":3,"endTime":4}}"#,
        );
        let ctx = open_trace(text).unwrap();
        let first = &ctx.pages[0].actions[0];
        assert_eq!(first.links().map(|links| links.next), Some(Some(1)));
        assert_eq!(
            next_action(&ctx, first).map(|a| a.metadata.id.as_str()),
            Some("c2")
        );
    }

    #[test]
    fn malformed_text_is_rejected_before_indexing() {
        assert!(open_trace("{\"type\":\"action\"\n").is_err());
    }
}
