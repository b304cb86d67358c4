//! Formatting utilities for CLI summaries.

/// Format a large number with commas for readability.
///
/// # Examples
///
/// ```
/// use pv_cli_common::format_number;
///
/// assert_eq!(format_number(0), "0");
/// assert_eq!(format_number(1234), "1,234");
/// assert_eq!(format_number(1234567), "1,234,567");
/// ```
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format a millisecond duration, switching to seconds from one second up.
///
/// ```
/// use pv_cli_common::format_duration_ms;
///
/// assert_eq!(format_duration_ms(250), "250ms");
/// assert_eq!(format_duration_ms(1500), "1.50s");
/// ```
pub fn format_duration_ms(ms: i64) -> String {
    if ms.abs() < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.2}s", ms as f64 / 1000.0)
    }
}
