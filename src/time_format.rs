/// Placeholder shown when a duration is unknown (job not started yet, or no
/// capacity to estimate against).
pub const UNKNOWN_DURATION: &str = "??:??";

/// Formats a millisecond duration as zero-padded `HH:MM`.
///
/// Seconds are truncated, never rounded. Hours are not wrapped at 24, so a
/// very long duration renders with more than two hour digits.
pub fn format_duration(ms: Option<u64>) -> String {
    let Some(ms) = ms else {
        return UNKNOWN_DURATION.to_string();
    };

    let minutes = ms / 1000 / 60;
    let (hours, minutes) = (minutes / 60, minutes % 60);
    format!("{hours:02}:{minutes:02}")
}
