//! Human-readable byte sizes.

const KB: i64 = 1024;
const MB: i64 = KB * 1024;
const GB: i64 = MB * 1024;

/// Format a byte count using binary units, e.g. `1.5 GB` or `512 Bytes`.
///
/// Values are rounded half-up to two decimals and trailing zeros dropped.
pub fn format_bytes(bytes: i64) -> String {
    match bytes {
        b if b >= GB => format!("{} GB", scaled(b, GB)),
        b if b >= MB => format!("{} MB", scaled(b, MB)),
        b if b >= KB => format!("{} KB", scaled(b, KB)),
        b => format!("{b} Bytes"),
    }
}

fn scaled(bytes: i64, unit: i64) -> String {
    let bytes = i128::from(bytes);
    let unit = i128::from(unit);
    let hundredths = (bytes * 100 + unit / 2) / unit;
    let whole = hundredths / 100;
    let frac = hundredths % 100;
    match frac {
        0 => whole.to_string(),
        f if f % 10 == 0 => format!("{whole}.{}", f / 10),
        f => format!("{whole}.{f:02}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_stay_in_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(1023), "1023 Bytes");
    }

    #[test]
    fn scales_to_binary_units() {
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * MB + MB / 4), "5.25 MB");
        assert_eq!(format_bytes(3 * GB), "3 GB");
    }

    #[test]
    fn rounds_half_up() {
        assert_eq!(format_bytes(1030), "1.01 KB");
        assert_eq!(format_bytes(MB + 1), "1 MB");
        assert_eq!(format_bytes(1034), "1.01 KB");
    }
}
