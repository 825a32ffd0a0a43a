use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::debug;
use traceview_trace_model::{BlobStore, ContextEntry};
use traceview_trace_timeline::{
    build_bars, find_hovered_bar, ms_to_string, page_frame_at, position_to_time, ticks, BarKind,
    Boundaries, Tick, TimelineBar,
};

use crate::cli::context::CliContext;
use crate::cli::output::print_structured;

#[derive(Args, Clone, Debug)]
pub struct TimelineArgs {
    /// Trace file (event stream or context document)
    pub trace: PathBuf,

    /// Timeline width in pixels
    #[arg(long)]
    pub width: Option<f64>,
}

#[derive(Args, Clone, Debug)]
pub struct HitArgs {
    pub trace: PathBuf,

    /// Pointer x in pixels from the left edge
    #[arg(long, allow_hyphen_values = true)]
    pub x: f64,

    /// Pointer y in pixels from the top of the action lane
    #[arg(long, allow_hyphen_values = true)]
    pub y: f64,

    #[arg(long)]
    pub width: Option<f64>,
}

#[derive(Args, Clone, Debug)]
pub struct FrameArgs {
    pub trace: PathBuf,

    /// Milliseconds since the start of the trace
    #[arg(long)]
    pub at: f64,

    /// Page position in the trace
    #[arg(long, default_value_t = 0)]
    pub page: usize,
}

#[derive(Debug, Serialize)]
struct TimelineView {
    width: f64,
    boundaries: Boundaries,
    ticks: Vec<Tick>,
    bars: Vec<TimelineBar>,
}

#[derive(Debug, Serialize)]
struct HitView {
    x: f64,
    y: f64,
    time: f64,
    bar: Option<TimelineBar>,
}

#[derive(Debug, Serialize)]
struct FrameView {
    page: usize,
    sha1: String,
    offset: f64,
    width: u32,
    height: u32,
    path: PathBuf,
    captured: bool,
}

pub async fn cmd_timeline(args: TimelineArgs, ctx: &CliContext) -> Result<()> {
    let width = ctx.width(args.width)?;
    let context = ctx.load_trace(&args.trace).await?;
    let boundaries = Boundaries::from_context(&context);
    let layout = ctx.layout();

    let view = TimelineView {
        width,
        boundaries,
        ticks: ticks(width, &boundaries, layout),
        bars: build_bars(&context, width, &boundaries, layout),
    };
    debug!(
        ticks = view.ticks.len(),
        bars = view.bars.len(),
        "timeline computed"
    );
    if print_structured(ctx.output(), &view)? {
        return Ok(());
    }

    println!(
        "Timeline: {} over {}px",
        ms_to_string(boundaries.span()),
        width
    );
    let grid: Vec<String> = view
        .ticks
        .iter()
        .map(|tick| format!("{}@{:.0}", tick.label, tick.position))
        .collect();
    println!("Ticks: {}", grid.join("  "));
    for bar in &view.bars {
        println!(
            "{:<6} {:>8.1}..{:<8.1} {:<9} {}",
            lane_name(bar),
            bar.left_position,
            bar.right_position,
            bar.title,
            bar.label
        );
    }
    Ok(())
}

pub async fn cmd_hit(args: HitArgs, ctx: &CliContext) -> Result<()> {
    let width = ctx.width(args.width)?;
    let context = ctx.load_trace(&args.trace).await?;
    let boundaries = Boundaries::from_context(&context);
    let layout = ctx.layout();

    let bars = build_bars(&context, width, &boundaries, layout);
    let hit = find_hovered_bar(&bars, width, &boundaries, args.x, args.y, layout);
    let view = HitView {
        x: args.x,
        y: args.y,
        time: position_to_time(width, &boundaries, args.x) - boundaries.minimum,
        bar: hit.and_then(|idx| bars.get(idx).cloned()),
    };
    if print_structured(ctx.output(), &view)? {
        return Ok(());
    }

    match &view.bar {
        Some(bar) => println!(
            "{} at {}: {} ({}, {})",
            lane_name(bar),
            ms_to_string(view.time),
            bar.label,
            bar.call_id,
            bar.title
        ),
        None => println!("No bar at x={} y={}", view.x, view.y),
    }
    Ok(())
}

pub async fn cmd_frame(args: FrameArgs, ctx: &CliContext) -> Result<()> {
    if !args.at.is_finite() {
        bail!("--at must be a finite number of milliseconds");
    }
    let context = ctx.load_trace(&args.trace).await?;
    let view = frame_view(&context, &BlobStore::for_trace(&args.trace), args.page, args.at)?;
    if print_structured(ctx.output(), &view)? {
        return Ok(());
    }

    println!(
        "Page {} frame at {}: {} ({}x{})",
        view.page,
        ms_to_string(view.offset),
        view.sha1,
        view.width,
        view.height
    );
    if view.captured {
        println!("Image: {}", view.path.display());
    } else {
        println!("Image: {} (not captured)", view.path.display());
    }
    Ok(())
}

fn frame_view(
    context: &ContextEntry,
    store: &BlobStore,
    page: usize,
    at: f64,
) -> Result<FrameView> {
    if page >= context.pages.len() {
        bail!(
            "page {} out of range; trace has {} page(s)",
            page,
            context.pages.len()
        );
    }
    let time = context.start_time + at;
    let frame = page_frame_at(context, page, time)
        .with_context(|| format!("page {} has no screencast frames", page))?;
    let path = store.path_for(&frame.sha1)?;
    Ok(FrameView {
        page,
        sha1: frame.sha1.clone(),
        offset: frame.timestamp - context.start_time,
        width: frame.width,
        height: frame.height,
        captured: path.is_file(),
        path,
    })
}

fn lane_name(bar: &TimelineBar) -> &'static str {
    match bar.kind {
        BarKind::Action => "action",
        BarKind::Event => "event",
    }
}
