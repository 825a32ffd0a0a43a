/// Compact human duration: `"0"`, `"250ms"`, `"1.5s"`, `"2.0m"`, `"1.2h"`, `"3.0d"`.
pub fn ms_to_string(ms: f64) -> String {
    if !ms.is_finite() {
        return "-".to_string();
    }
    if ms == 0.0 {
        return "0".to_string();
    }
    if ms < 1000.0 {
        return format!("{ms:.0}ms");
    }
    let seconds = ms / 1000.0;
    if seconds < 60.0 {
        return format!("{seconds:.1}s");
    }
    let minutes = seconds / 60.0;
    if minutes < 60.0 {
        return format!("{minutes:.1}m");
    }
    let hours = minutes / 60.0;
    if hours < 24.0 {
        return format!("{hours:.1}h");
    }
    format!("{:.1}d", hours / 24.0)
}

/// Keep the first `limit` characters, marking the cut with an ellipsis.
pub fn trim_right(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push('\u{2026}');
    out
}
