const MINUTES_PER_HOUR: u64 = 60;
const MINUTES_PER_DAY: u64 = 24 * MINUTES_PER_HOUR;

/// Describe an age in minutes as "just now", "5m ago", "2h ago" or "3d ago".
/// Hours and days round to the nearest whole unit.
pub fn format_age(minutes: u64) -> String {
    match minutes {
        0 => "just now".to_string(),
        m if m < MINUTES_PER_HOUR => format!("{}m ago", m),
        m if m < MINUTES_PER_DAY => format!("{}h ago", round_div(m, MINUTES_PER_HOUR)),
        m => format!("{}d ago", round_div(m, MINUTES_PER_DAY)),
    }
}

/// Integer division rounding halves up
fn round_div(value: u64, unit: u64) -> u64 {
    (value + unit / 2) / unit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(0), "just now");
        assert_eq!(format_age(1), "1m ago");
        assert_eq!(format_age(59), "59m ago");
        assert_eq!(format_age(60), "1h ago");
        assert_eq!(format_age(89), "1h ago");
        assert_eq!(format_age(90), "2h ago");
        assert_eq!(format_age(1439), "24h ago");
        assert_eq!(format_age(1440), "1d ago");
        assert_eq!(format_age(36 * 60), "2d ago"); // 1d 12h rounds up
        assert_eq!(format_age(35 * 60), "1d ago");
    }
}
