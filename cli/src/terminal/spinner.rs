use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use indicatif::ProgressStyle;
use tokio::task::JoinHandle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const REFRESH_INTERVAL: Duration = Duration::from_millis(100);
const TICK_STRINGS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];
const TEMPLATE: &str =
    "{spinner:.blue} scanning [{bar:32.green/bright_black}] {pos}/{len} ports ({elapsed})";

fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .tick_strings(TICK_STRINGS)
        .progress_chars("█▓░")
}

/// Gives `span` a progress bar sized for `total` ports. Must run before the span is entered.
pub fn attach_progress_bar(span: &Span, total: usize) {
    span.pb_set_style(&progress_style());
    span.pb_set_length(total as u64);
}

/// Mirrors `completed` onto the span's progress bar until `running` is cleared.
pub fn start_progress_updates(
    span: Span,
    completed: Arc<AtomicUsize>,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while running.load(Ordering::Relaxed) {
            span.pb_set_position(completed.load(Ordering::Relaxed) as u64);
            tokio::time::sleep(REFRESH_INTERVAL).await;
        }
        span.pb_set_position(completed.load(Ordering::Relaxed) as u64);
    })
}
