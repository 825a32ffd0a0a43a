use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::model::{ActionTraceEvent, ContextEntry, PageEntry, ResourceSnapshot};

const CONSOLE_METHOD: &str = "console";
const PAGE_ERROR_METHOD: &str = "pageError";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStats {
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleMessage {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

pub fn page_of<'a>(context: &'a ContextEntry, entry: &ActionTraceEvent) -> Option<&'a PageEntry> {
    entry.links.and_then(|links| context.pages.get(links.page))
}

pub fn next_action<'a>(
    context: &'a ContextEntry,
    action: &ActionTraceEvent,
) -> Option<&'a ActionTraceEvent> {
    let links = action.links.filter(|_| action.is_action())?;
    context.pages.get(links.page)?.actions.get(links.next?)
}

/// Events of the action's page with `start <= t < next.start`.
///
/// The window is open-ended for the last action of a page. The result is
/// computed on first access and cached on the action until re-indexing.
pub fn events_for_action<'a>(
    context: &'a ContextEntry,
    action: &ActionTraceEvent,
) -> Vec<&'a ActionTraceEvent> {
    if !action.is_action() {
        return Vec::new();
    }
    let Some(page) = page_of(context, action) else {
        return Vec::new();
    };

    let indices = action.events_memo.get_or_init(|| {
        let start = action.metadata.start_time;
        let end = next_action(context, action).map(|next| next.metadata.start_time);
        page.events
            .iter()
            .enumerate()
            .filter(|(_, event)| {
                let ts = event.metadata.start_time;
                ts >= start && end.map_or(true, |end| ts < end)
            })
            .map(|(idx, _)| idx)
            .collect()
    });

    indices.iter().filter_map(|&idx| page.events.get(idx)).collect()
}

/// Resources of the context with `start <= t < next.start`.
///
/// Same half-open window as [`events_for_action`], so a resource stamped at an
/// action boundary belongs to exactly one action. Cached the same way.
pub fn resources_for_action<'a>(
    context: &'a ContextEntry,
    action: &ActionTraceEvent,
) -> Vec<&'a ResourceSnapshot> {
    if !action.is_action() || action.links.is_none() {
        return Vec::new();
    }

    let indices = action.resources_memo.get_or_init(|| {
        let start = action.metadata.start_time;
        let end = next_action(context, action).map(|next| next.metadata.start_time);
        context
            .resources
            .iter()
            .enumerate()
            .filter(|(_, resource)| {
                let ts = resource.timestamp;
                ts >= start && end.map_or(true, |end| ts < end)
            })
            .map(|(idx, _)| idx)
            .collect()
    });

    indices
        .iter()
        .filter_map(|&idx| context.resources.get(idx))
        .collect()
}

pub fn stats(context: &ContextEntry, action: &ActionTraceEvent) -> ActionStats {
    let mut out = ActionStats::default();
    for event in events_for_action(context, action) {
        match event.metadata.method.as_str() {
            CONSOLE_METHOD => match console_message(context, event) {
                Some(message) if message.kind == "warning" => out.warnings += 1,
                Some(message) if message.kind == "error" => out.errors += 1,
                _ => {}
            },
            PAGE_ERROR_METHOD => out.errors += 1,
            _ => {}
        }
    }
    out
}

/// Resolve the message object a `console` event points at through
/// `params.message.guid`.
pub fn console_message(context: &ContextEntry, event: &ActionTraceEvent) -> Option<ConsoleMessage> {
    if event.metadata.method != CONSOLE_METHOD {
        return None;
    }
    let guid = event
        .metadata
        .params
        .pointer("/message/guid")
        .and_then(JsonValue::as_str)?;
    let object = page_of(context, event)?.objects.get(guid)?;
    serde_json::from_value(object.clone()).ok()
}

/// Every action of the context in start-time order.
pub fn all_actions(context: &ContextEntry) -> Vec<&ActionTraceEvent> {
    let mut actions: Vec<&ActionTraceEvent> = context
        .pages
        .iter()
        .flat_map(|page| page.actions.iter())
        .collect();
    actions.sort_by(|a, b| a.metadata.start_time.total_cmp(&b.metadata.start_time));
    actions
}

pub fn find_action<'a>(context: &'a ContextEntry, call_id: &str) -> Option<&'a ActionTraceEvent> {
    context
        .pages
        .iter()
        .flat_map(|page| page.actions.iter())
        .find(|action| action.metadata.id == call_id)
}
