//! Time formatting utilities

/// Format seconds as `HH:MM:SS` for tool arguments
///
/// Hours are not wrapped at a day, so offsets past 24h stay correct.
pub fn format_timestamp(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format seconds for display
///
/// | Range    | Format    | Example    |
/// |----------|-----------|------------|
/// | ≥ 3600 s | `H:MM:SS` | `10:00:00` |
/// | ≥ 60 s   | `M:SS`    | `3:07`     |
/// | < 60 s   | `Ss`      | `42s`      |
pub fn format_duration(seconds: u64) -> String {
    if seconds >= 3600 {
        format!(
            "{}:{:02}:{:02}",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    } else if seconds >= 60 {
        format!("{}:{:02}", seconds / 60, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}
