//! Human-readable rate, ETA, and count formatting for status and summaries.

/// Picks the singular or plural form for a count-sensitive phrase.
pub fn plural<'a>(n: i64, singular: &'a str, plural: &'a str) -> &'a str {
    if n == 1 {
        singular
    } else {
        plural
    }
}

/// Formats a transfer rate, e.g. `750.00B/s`, `1.25KiB/s`, `3.02MiB/s`.
pub fn format_rate(bytes_per_sec: f64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

    if bytes_per_sec >= GIB {
        format!("{:.2}GiB/s", bytes_per_sec / GIB)
    } else if bytes_per_sec >= MIB {
        format!("{:.2}MiB/s", bytes_per_sec / MIB)
    } else if bytes_per_sec >= KIB {
        format!("{:.2}KiB/s", bytes_per_sec / KIB)
    } else {
        format!("{:.2}B/s", bytes_per_sec)
    }
}

/// Formats an ETA compactly: `3s`, `2m15s`, `1h02m`.
pub fn format_eta(secs: f64) -> String {
    let total = secs.round().max(0.0) as u64;
    if total < 60 {
        format!("{}s", total)
    } else if total < 3600 {
        format!("{}m{:02}s", total / 60, total % 60)
    } else {
        format!("{}h{:02}m", total / 3600, (total % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "byte", "bytes"), "byte");
        assert_eq!(plural(0, "byte", "bytes"), "bytes");
        assert_eq!(plural(1500, "byte", "bytes"), "bytes");
    }

    #[test]
    fn rate_units() {
        assert_eq!(format_rate(750.0), "750.00B/s");
        assert_eq!(format_rate(1280.0), "1.25KiB/s");
        assert_eq!(format_rate(3.0 * 1024.0 * 1024.0), "3.00MiB/s");
        assert_eq!(format_rate(2.5 * 1024.0 * 1024.0 * 1024.0), "2.50GiB/s");
    }

    #[test]
    fn eta_shapes() {
        assert_eq!(format_eta(3.2), "3s");
        assert_eq!(format_eta(135.0), "2m15s");
        assert_eq!(format_eta(3720.0), "1h02m");
        assert_eq!(format_eta(-1.0), "0s");
    }
}
