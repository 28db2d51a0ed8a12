//! Duration display formatting

/// Render a seconds count as zero-padded `HH:MM:SS`.
///
/// Hours are not capped; values of 100 hours or more simply widen the
/// hour field.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}
