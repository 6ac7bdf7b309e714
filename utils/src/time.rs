//! Time formatting helpers.

/// Format a duration in milliseconds to a human-readable string.
pub fn format_millis(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{}.{:03}s", ms / 1000, ms % 1000)
    } else if ms < 3_600_000 {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000)
    } else {
        format!("{}h {}m", ms / 3_600_000, (ms % 3_600_000) / 60_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_range() {
        assert_eq!(format_millis(250), "250ms");
        assert_eq!(format_millis(5_000), "5.000s");
        assert_eq!(format_millis(30_250), "30.250s");
        assert_eq!(format_millis(125_000), "2m 5s");
        assert_eq!(format_millis(7_260_000), "2h 1m");
    }
}
