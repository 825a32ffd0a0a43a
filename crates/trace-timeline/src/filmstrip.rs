use traceview_trace_model::{ContextEntry, ScreencastFrame};

/// Last frame captured at or before `time`, else the first frame.
///
/// `frames` must be ordered by timestamp, which the loader guarantees.
pub fn frame_at(frames: &[ScreencastFrame], time: f64) -> Option<&ScreencastFrame> {
    let after = frames.partition_point(|frame| frame.timestamp <= time);
    match after {
        0 => frames.first(),
        n => frames.get(n - 1),
    }
}

pub fn page_frame_at(context: &ContextEntry, page: usize, time: f64) -> Option<&ScreencastFrame> {
    context
        .pages
        .get(page)
        .and_then(|page| frame_at(&page.screencast_frames, time))
}
