/// Placeholder shown wherever a ratio is undefined.
pub const UNDEFINED_RATIO: &str = "N/A";

/// `numerator / base`, or `None` when the base is zero.
pub fn ratio(numerator: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        None
    } else {
        Some(numerator / base)
    }
}

/// Two-decimal amount with space thousands separators and a comma decimal mark.
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && formatted.bytes().any(|b| b != b'0' && b != b'.') {
        "-"
    } else {
        ""
    };
    format!("{}{},{}", sign, grouped, dec_part)
}

/// A ratio rendered as a percentage, or [`UNDEFINED_RATIO`].
pub fn format_ratio(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2} %", v * 100.0),
        None => UNDEFINED_RATIO.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_base_is_undefined() {
        assert_eq!(ratio(10.0, 0.0), None);
        assert_eq!(ratio(0.0, 0.0), None);
        assert_eq!(ratio(10.0, -0.0), None);
        assert_eq!(ratio(0.0, 5.0), Some(0.0));
        assert_eq!(ratio(600.0, 1000.0), Some(0.6));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0,00");
        assert_eq!(format_amount(600.0), "600,00");
        assert_eq!(format_amount(1234.56), "1 234,56");
        assert_eq!(format_amount(-1_234_567.891), "-1 234 567,89");
        assert_eq!(format_amount(-0.001), "0,00");
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(Some(0.6)), "60.00 %");
        assert_eq!(format_ratio(Some(-0.125)), "-12.50 %");
        assert_eq!(format_ratio(None), "N/A");
    }
}
