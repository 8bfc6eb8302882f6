//! Human-readable byte counts for log output.

/// Format a byte count into IEC units with at most one decimal place.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let exponent = (usize::try_from(63 - bytes.leading_zeros()).unwrap_or(0) / 10)
        .min(UNITS.len() - 1);
    let scaled = bytes as f64 / 1024f64.powi(exponent as i32);

    let rendered = if (scaled - scaled.round()).abs() < 0.05 {
        format!("{:.0}", scaled.round())
    } else {
        format!("{scaled:.1}")
    };

    format!("{rendered} {}", UNITS[exponent])
}
