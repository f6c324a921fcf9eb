// ABOUTME: Display helpers shared by the summary printer, chart and exporters
// Keeps currency and threshold formatting in one place

/// Format a cost as USD with three decimals, e.g. `$0.123`
pub fn format_usd(cost: f64) -> String {
    format!("${:.3}", cost)
}

/// Legend label for a refresh threshold, e.g. `π=0.72` or `π=2`
pub fn threshold_label(threshold: f64) -> String {
    format!("π={}", threshold)
}

/// Format a cost ratio with three decimals, or `n/a` when undefined
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.3}", r),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "$0.000");
        assert_eq!(format_usd(0.0004), "$0.000");
        assert_eq!(format_usd(1.23456), "$1.235");
        assert_eq!(format_usd(12.5), "$12.500");
    }

    #[test]
    fn test_threshold_label() {
        assert_eq!(threshold_label(0.72), "π=0.72");
        assert_eq!(threshold_label(2.0), "π=2");
        assert_eq!(threshold_label(1.5), "π=1.5");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(Some(1.23456)), "1.235");
        assert_eq!(format_ratio(None), "n/a");
    }
}
