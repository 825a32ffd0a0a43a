use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::{offset::LocalResult, TimeZone, Utc};
use clap::Args;
use serde::Serialize;
use traceview_trace_model::{all_actions, page_of, stats, ActionTraceEvent, ContextEntry};
use traceview_trace_timeline::{action_label, ms_to_string};

use crate::cli::context::CliContext;
use crate::cli::output::print_structured;

#[derive(Args, Clone, Debug)]
pub struct ActionsArgs {
    /// Trace file (event stream or context document)
    pub trace: PathBuf,

    /// Only list actions of the page at this position
    #[arg(long)]
    pub page: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ActionRow {
    pub index: usize,
    pub call_id: String,
    pub page: usize,
    pub page_id: Option<String>,
    pub label: String,
    /// Milliseconds since the start of the context.
    pub offset: f64,
    pub duration: String,
    pub errors: usize,
    pub warnings: usize,
}

#[derive(Debug, Serialize)]
struct ActionList {
    browser_name: String,
    wall_time: Option<String>,
    duration: String,
    actions: Vec<ActionRow>,
}

pub async fn cmd_actions(args: ActionsArgs, ctx: &CliContext) -> Result<()> {
    let context = ctx.load_trace(&args.trace).await?;
    if let Some(page) = args.page {
        if page >= context.pages.len() {
            bail!(
                "page {} out of range; trace has {} page(s)",
                page,
                context.pages.len()
            );
        }
    }

    let rows: Vec<ActionRow> = action_rows(&context, ctx.layout().label_limit)
        .into_iter()
        .filter(|row| args.page.map_or(true, |page| row.page == page))
        .collect();

    let list = ActionList {
        browser_name: context.browser_name.clone(),
        wall_time: context.wall_time.and_then(format_wall_time),
        duration: ms_to_string(context.end_time - context.start_time),
        actions: rows,
    };
    if print_structured(ctx.output(), &list)? {
        return Ok(());
    }

    let browser = if list.browser_name.is_empty() {
        "unknown browser"
    } else {
        list.browser_name.as_str()
    };
    println!(
        "Trace: {} ({}, {} action(s))",
        browser,
        list.duration,
        list.actions.len()
    );
    if let Some(wall_time) = &list.wall_time {
        println!("Recorded: {}", wall_time);
    }
    for row in &list.actions {
        let mut badges = String::new();
        if row.errors > 0 {
            badges.push_str(&format!("  errors={}", row.errors));
        }
        if row.warnings > 0 {
            badges.push_str(&format!("  warnings={}", row.warnings));
        }
        println!(
            "{:>4}  {:>9}  {:<60} {:>9}{}",
            row.index,
            ms_to_string(row.offset),
            row.label,
            row.duration,
            badges
        );
    }
    Ok(())
}

/// Rows in action-list order; `index` is the position accepted by `inspect`.
pub fn action_rows(context: &ContextEntry, label_limit: usize) -> Vec<ActionRow> {
    all_actions(context)
        .into_iter()
        .enumerate()
        .map(|(index, action)| action_row(context, index, action, label_limit))
        .collect()
}

fn action_row(
    context: &ContextEntry,
    index: usize,
    action: &ActionTraceEvent,
    label_limit: usize,
) -> ActionRow {
    let meta = &action.metadata;
    let counts = stats(context, action);
    ActionRow {
        index,
        call_id: meta.id.clone(),
        page: action.links().map(|links| links.page).unwrap_or_default(),
        page_id: page_of(context, action).and_then(|page| page.page_id.clone()),
        label: action_label(meta, label_limit),
        offset: meta.start_time - context.start_time,
        duration: match meta.duration() {
            Some(duration) => ms_to_string(duration),
            None => "Timed Out".to_string(),
        },
        errors: counts.errors,
        warnings: counts.warnings,
    }
}

/// Wall-clock start of the recording in RFC 3339.
pub fn format_wall_time(millis: f64) -> Option<String> {
    if !millis.is_finite() {
        return None;
    }
    match Utc.timestamp_millis_opt(millis as i64) {
        LocalResult::Single(ts) => Some(ts.to_rfc3339()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use traceview_trace_model::{index_model, parse_trace};

    const TRACE: &str = r#"{"type":"context-options","browserName":"chromium","wallTime":1700000000000}
{"type":"action","metadata":{"id":"call@1","pageId":"page@1","type":"Frame","method":"goto","apiName":"page.goto","params":{"url":"https://a.test"},"startTime":10,"endTime":60}}
{"type":"action","metadata":{"id":"call@2","pageId":"page@2","type":"Frame","method":"click","apiName":"page.click","params":{"selector":"button"},"startTime":30,"endTime":0}}
{"type":"event","metadata":{"id":"ev@1","pageId":"page@2","type":"Page","method":"pageError","startTime":35}}"#;

    #[test]
    fn rows_follow_start_time_across_pages() {
        let mut context = parse_trace(TRACE).unwrap();
        index_model(&mut context);
        let rows = action_rows(&context, 50);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "page.goto https://a.test");
        assert_eq!(rows[0].offset, 0.0);
        assert_eq!(rows[0].duration, "50ms");
        assert_eq!(rows[1].page, 1);
        assert_eq!(rows[1].page_id.as_deref(), Some("page@2"));
        assert_eq!(rows[1].duration, "Timed Out");
        assert_eq!(rows[1].errors, 1);
    }

    #[test]
    fn wall_time_renders_as_rfc3339() {
        assert_eq!(
            format_wall_time(1_700_000_000_000.0).as_deref(),
            Some("2023-11-14T22:13:20+00:00")
        );
        assert_eq!(format_wall_time(f64::NAN), None);
    }
}
