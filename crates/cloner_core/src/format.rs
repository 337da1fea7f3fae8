use std::time::Duration;

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const STEP: f64 = 1024.0;

/// Human-readable byte size with up to two fractional digits.
pub fn format_bytes(bytes: u64) -> String {
    format_bytes_with(bytes, 2)
}

/// Human-readable byte size: `0 Bytes`, `1 KB`, `1.5 KB`, `3.25 MB`.
///
/// The value is rounded to `decimals` fractional digits and trailing zeros are dropped.
pub fn format_bytes_with(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= STEP && unit < UNITS.len() - 1 {
        value /= STEP;
        unit += 1;
    }

    format!("{} {}", trim_fraction(format!("{value:.decimals$}")), UNITS[unit])
}

/// Elapsed wall-clock time in seconds with one decimal, e.g. `1.3s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}

fn trim_fraction(rendered: String) -> String {
    if !rendered.contains('.') {
        return rendered;
    }
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::{format_bytes, format_bytes_with, format_elapsed};
    use std::time::Duration;

    #[test]
    fn zero_is_spelled_out() {
        assert_eq!(format_bytes(0), "0 Bytes");
    }

    #[test]
    fn whole_and_fractional_units() {
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(2048), "2 KB");
        assert_eq!(format_bytes(1_572_864), "1.5 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn rounding_follows_precision() {
        assert_eq!(format_bytes(1100), "1.07 KB");
        assert_eq!(format_bytes_with(1100, 0), "1 KB");
        assert_eq!(format_bytes_with(1100, 1), "1.1 KB");
    }

    #[test]
    fn huge_values_stay_in_largest_unit() {
        assert!(format_bytes(u64::MAX).ends_with(" TB"));
    }

    #[test]
    fn monotonic_within_a_unit() {
        let mut previous = 0.0_f64;
        for bytes in (1024..1024 * 1024).step_by(997) {
            let rendered = format_bytes(bytes);
            let number: f64 = rendered.split(' ').next().unwrap().parse().unwrap();
            assert!(number >= previous, "{rendered} after {previous}");
            previous = number;
        }
    }

    #[test]
    fn elapsed_has_one_decimal() {
        assert_eq!(format_elapsed(Duration::from_millis(1340)), "1.3s");
        assert_eq!(format_elapsed(Duration::ZERO), "0.0s");
    }
}
