//! Byte-size and count formatting for stat cards, tables and file rows.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
const KIB: f64 = 1024.0;

/// Human-readable size with base-1024 units, at most two decimals and no
/// trailing zeros: `1536 -> "1.5 KB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= KIB && unit < UNITS.len() - 1 {
        value /= KIB;
        unit += 1;
    }
    format!("{} {}", trim_decimals(&format!("{:.2}", value)), UNITS[unit])
}

/// Megabytes with exactly two decimals, thousands grouped.
pub fn to_mb(bytes: u64) -> String {
    group_decimal(&format!("{:.2}", bytes as f64 / KIB / KIB))
}

/// Gigabytes with exactly four decimals, thousands grouped.
pub fn to_gb(bytes: u64) -> String {
    group_decimal(&format!("{:.4}", bytes as f64 / KIB / KIB / KIB))
}

/// `1234567 -> "1,234,567"`
pub fn group_thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn group_decimal(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((int, frac)) => format!("{}.{}", group_digits(int), frac),
        None => group_digits(formatted),
    }
}

fn trim_decimals(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
