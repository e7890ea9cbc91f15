//! Display formatting helpers

/// Render a duration in seconds the way the mobile app shows it:
/// `44 sec`, `1 min 30 sec`, `2 min`.
pub fn format_duration_seconds(seconds: u64) -> String {
    let minutes = seconds / 60;
    let rest = seconds % 60;
    match (minutes, rest) {
        (0, s) => format!("{} sec", s),
        (m, 0) => format!("{} min", m),
        (m, s) => format!("{} min {} sec", m, s),
    }
}

/// Whole-percent share of `part` in `total` for the dashboard chart widgets.
/// A zero total renders as 0%, not a division error.
pub fn percent(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (part as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_match_the_mobile_app() {
        assert_eq!(format_duration_seconds(44), "44 sec");
        assert_eq!(format_duration_seconds(90), "1 min 30 sec");
        assert_eq!(format_duration_seconds(120), "2 min");
        assert_eq!(format_duration_seconds(0), "0 sec");
    }

    #[test]
    fn percent_rounds_and_survives_zero_total() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(5, 5), 100);
        assert_eq!(percent(3, 0), 0);
    }
}
