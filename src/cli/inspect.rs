use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::fs;
use tracing::debug;
use traceview_trace_model::{
    all_actions, console_message, events_for_action, find_action, page_of, resources_for_action,
    stats, ActionStats, ActionTraceEvent, BlobStore, ContextEntry, ResourceSnapshot, StackFrame,
    BODY_UNAVAILABLE,
};
use traceview_trace_timeline::ms_to_string;

use crate::cli::context::CliContext;
use crate::cli::output::print_structured;

pub const SOURCE_UNAVAILABLE: &str = "Unable to read";

#[derive(Args, Clone, Debug)]
pub struct InspectArgs {
    /// Trace file (event stream or context document)
    pub trace: PathBuf,

    /// Call id, or position in the `actions` listing
    pub action: String,

    /// Include response bodies from the trace's resources directory
    #[arg(long)]
    pub bodies: bool,
}

#[derive(Debug, Serialize)]
pub struct ActionDetail {
    pub call_id: String,
    pub page_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub method: String,
    pub params: JsonValue,
    pub offset: f64,
    pub duration: Option<f64>,
    pub error: Option<String>,
    pub log: Vec<String>,
    pub stats: ActionStats,
    pub events: Vec<EventLine>,
    pub resources: Vec<ResourceLine>,
    pub source: Option<SourceExcerpt>,
}

#[derive(Debug, Serialize)]
pub struct EventLine {
    pub method: String,
    pub offset: f64,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResourceLine {
    pub method: String,
    pub status: i32,
    pub url: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SourceExcerpt {
    pub file: String,
    pub line: u32,
    pub text: String,
}

pub async fn cmd_inspect(args: InspectArgs, ctx: &CliContext) -> Result<()> {
    let context = ctx.load_trace(&args.trace).await?;
    let action = resolve_action(&context, &args.action)?;

    let mut detail = action_detail(&context, action);
    if let Some(frame) = action.metadata.stack.first() {
        detail.source = Some(read_source(frame).await);
    }
    if args.bodies {
        let store = BlobStore::for_trace(&args.trace);
        let resources = resources_for_action(&context, action);
        for (line, resource) in detail.resources.iter_mut().zip(resources) {
            line.body = Some(response_body(&store, resource));
        }
    }

    if print_structured(ctx.output(), &detail)? {
        return Ok(());
    }
    print_detail(&detail);
    Ok(())
}

/// Match a call id first, then fall back to a position in action-list order.
pub fn resolve_action<'a>(context: &'a ContextEntry, key: &str) -> Result<&'a ActionTraceEvent> {
    if let Some(action) = find_action(context, key) {
        return Ok(action);
    }
    let actions = all_actions(context);
    key.parse::<usize>()
        .ok()
        .and_then(|index| actions.get(index).copied())
        .ok_or_else(|| {
            anyhow!(
                "no action matches {:?} (trace has {} action(s))",
                key,
                actions.len()
            )
        })
}

pub fn action_detail(context: &ContextEntry, action: &ActionTraceEvent) -> ActionDetail {
    let meta = &action.metadata;
    let events = events_for_action(context, action)
        .into_iter()
        .map(|event| EventLine {
            method: event.metadata.method.clone(),
            offset: event.metadata.start_time - context.start_time,
            text: console_message(context, event)
                .map(|message| format!("[{}] {}", message.kind, message.text))
                .or_else(|| event.metadata.error_message().map(str::to_string))
                .or_else(|| {
                    event
                        .metadata
                        .params
                        .pointer("/error/message")
                        .and_then(JsonValue::as_str)
                        .map(str::to_string)
                }),
        })
        .collect();
    let resources = resources_for_action(context, action)
        .into_iter()
        .map(|resource| ResourceLine {
            method: resource.method.clone(),
            status: resource.status,
            url: resource.url.clone(),
            content_type: resource.content_type.clone(),
            body: None,
        })
        .collect();

    ActionDetail {
        call_id: meta.id.clone(),
        page_id: page_of(context, action).and_then(|page| page.page_id.clone()),
        name: meta.display_name(),
        type_name: meta.type_name.clone(),
        method: meta.method.clone(),
        params: meta.params.clone(),
        offset: meta.start_time - context.start_time,
        duration: meta.duration(),
        error: meta.error_message().map(str::to_string),
        log: meta.log.clone(),
        stats: stats(context, action),
        events,
        resources,
        source: None,
    }
}

fn response_body(store: &BlobStore, resource: &ResourceSnapshot) -> String {
    let Some(sha1) = resource.response_sha1.as_deref() else {
        return BODY_UNAVAILABLE.to_string();
    };
    match store.read_text(sha1) {
        Ok(Some(body)) => body,
        Ok(None) => BODY_UNAVAILABLE.to_string(),
        Err(err) => {
            debug!(sha1, error = %err, "response body lookup failed");
            BODY_UNAVAILABLE.to_string()
        }
    }
}

async fn read_source(frame: &StackFrame) -> SourceExcerpt {
    let text = match fs::read_to_string(Path::new(&frame.file)).await {
        Ok(content) => source_line(&content, frame.line)
            .unwrap_or(SOURCE_UNAVAILABLE)
            .to_string(),
        Err(err) => {
            debug!(file = %frame.file, error = %err, "source file unreadable");
            SOURCE_UNAVAILABLE.to_string()
        }
    };
    SourceExcerpt {
        file: frame.file.clone(),
        line: frame.line,
        text,
    }
}

// Stack lines are 1-based.
fn source_line(content: &str, line: u32) -> Option<&str> {
    let index = usize::try_from(line).ok()?.checked_sub(1)?;
    content.lines().nth(index).map(str::trim_end)
}

fn print_detail(detail: &ActionDetail) {
    println!("{} ({})", detail.name, detail.call_id);
    if let Some(page_id) = &detail.page_id {
        println!("Page: {}", page_id);
    }
    println!("Start: {}", ms_to_string(detail.offset));
    match detail.duration {
        Some(duration) => println!("Duration: {}", ms_to_string(duration)),
        None => println!("Duration: Timed Out"),
    }
    if let Some(error) = &detail.error {
        println!("Error: {}", error);
    }
    if detail.params.as_object().map_or(false, |params| !params.is_empty()) {
        println!("Params: {}", detail.params);
    }
    if !detail.log.is_empty() {
        println!("Log:");
        for line in &detail.log {
            println!("  {}", line);
        }
    }
    if let Some(source) = &detail.source {
        println!("Source: {}:{}", source.file, source.line);
        println!("  {}", source.text);
    }
    println!(
        "Console: {} error(s), {} warning(s)",
        detail.stats.errors, detail.stats.warnings
    );
    for event in &detail.events {
        println!(
            "  {:>9}  {}  {}",
            ms_to_string(event.offset),
            event.method,
            event.text.as_deref().unwrap_or_default()
        );
    }
    println!("Network: {} request(s)", detail.resources.len());
    for resource in &detail.resources {
        println!(
            "  {} {} {} {}",
            resource.method, resource.status, resource.url, resource.content_type
        );
        if let Some(body) = &resource.body {
            println!("    {}", body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traceview_trace_model::{index_model, parse_trace};

    const TRACE: &str = r##"{"type":"action","metadata":{"id":"call@1","pageId":"page@1","type":"Frame","method":"goto","apiName":"page.goto","params":{"url":"https://a.test"},"startTime":0,"endTime":40,"log":["navigating to https://a.test"]}}
{"type":"action","metadata":{"id":"call@7","pageId":"page@1","type":"Frame","method":"click","apiName":"page.click","params":{"selector":"#pay"},"startTime":50,"endTime":90,"error":{"error":{"name":"TimeoutError","message":"Timeout 30000ms exceeded"}}}}
{"type":"event","metadata":{"id":"ev@1","pageId":"page@1","type":"Page","method":"console","params":{"message":{"guid":"msg@1"}},"startTime":60}}
{"type":"object","pageId":"page@1","guid":"msg@1","objectSnapshot":{"type":"warning","text":"slow"}}
{"type":"resource-snapshot","snapshot":{"resourceId":"r1","url":"https://a.test/pay","method":"POST","status":402,"responseSha1":"ff00","timestamp":70}}"##;

    fn context() -> ContextEntry {
        let mut ctx = parse_trace(TRACE).unwrap();
        index_model(&mut ctx);
        ctx
    }

    #[test]
    fn resolves_by_call_id_then_position() {
        let ctx = context();
        assert_eq!(resolve_action(&ctx, "call@7").unwrap().metadata.id, "call@7");
        assert_eq!(resolve_action(&ctx, "0").unwrap().metadata.id, "call@1");
        assert!(resolve_action(&ctx, "5").is_err());
        assert!(resolve_action(&ctx, "call@9").is_err());
    }

    #[test]
    fn detail_collects_windowed_entries() {
        let ctx = context();
        let action = resolve_action(&ctx, "call@7").unwrap();
        let detail = action_detail(&ctx, action);

        assert_eq!(detail.error.as_deref(), Some("Timeout 30000ms exceeded"));
        assert_eq!(detail.stats.warnings, 1);
        assert_eq!(detail.events.len(), 1);
        assert_eq!(detail.events[0].text.as_deref(), Some("[warning] slow"));
        assert_eq!(detail.resources.len(), 1);
        assert_eq!(detail.resources[0].status, 402);
    }

    #[test]
    fn missing_bodies_use_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path());
        let ctx = context();
        assert_eq!(response_body(&store, &ctx.resources[0]), BODY_UNAVAILABLE);

        std::fs::write(dir.path().join("ff00"), "payment required").unwrap();
        assert_eq!(response_body(&store, &ctx.resources[0]), "payment required");
    }

    #[tokio::test]
    async fn unreadable_source_uses_placeholder() {
        let frame = StackFrame {
            file: "/definitely/not/here.spec.ts".into(),
            line: 3,
            ..StackFrame::default()
        };
        assert_eq!(read_source(&frame).await.text, SOURCE_UNAVAILABLE);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkout.spec.ts");
        std::fs::write(&path, "import x;\n\nawait page.click('#pay');\n").unwrap();
        let frame = StackFrame {
            file: path.display().to_string(),
            line: 3,
            ..StackFrame::default()
        };
        assert_eq!(read_source(&frame).await.text, "await page.click('#pay');");
    }
}
