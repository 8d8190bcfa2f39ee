//! Timing text for finished pipelines.

use std::time::Duration;

/// `"850ms"` under a second, `"4.2s"` under a minute, `"2m 05s"` beyond.
///
/// ```
/// use std::time::Duration;
/// use nuxt_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(4230)), "4.2s");
/// assert_eq!(format_duration(Duration::from_secs(125)), "2m 05s");
/// ```
pub fn format_duration(elapsed: Duration) -> String {
    match elapsed.as_secs() {
        0 => format!("{}ms", elapsed.subsec_millis()),
        1..=59 => format!("{:.1}s", elapsed.as_secs_f64()),
        secs => format!("{}m {:02}s", secs / 60, secs % 60),
    }
}
