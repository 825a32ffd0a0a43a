use serde_json::Value as JsonValue;

use crate::errors::TraceResult;
use crate::model::ContextEntry;

const PAGES_KEY: &str = "pages";

/// Returns `Ok(None)` when `text` is not a single JSON object carrying a
/// `pages` array, so callers can fall back to the event-stream reader.
pub fn from_context_document(text: &str) -> TraceResult<Option<ContextEntry>> {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('{') {
        return Ok(None);
    }
    let value = match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(value) => value,
        Err(_) => return Ok(None),
    };
    let is_document = value
        .as_object()
        .map(|obj| obj.get(PAGES_KEY).map_or(false, JsonValue::is_array))
        .unwrap_or(false);
    if !is_document {
        return Ok(None);
    }
    let context: ContextEntry = serde_json::from_value(value)?;
    Ok(Some(context))
}
