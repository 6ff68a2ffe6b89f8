/// Largest integer magnitude exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INT: f64 = 9_007_199_254_740_991.0;

/// Parses numeric literal text strictly.
///
/// The whole slice must form the literal; trailing or leading junk makes
/// the parse fail. Used both for literal terms in the parser and for the
/// `number` builtin, whose failed parses become error values.
///
/// ## Example
/// ```
/// use polyma::util::num::parse_number;
///
/// assert_eq!(parse_number("3.5"), Some(3.5));
/// assert_eq!(parse_number("3.5x"), None);
/// ```
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    // f64::from_str accepts forms the language does not ("inf", "NaN").
    let plain = text.strip_prefix('-').unwrap_or(text);
    if !plain.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Formats a number so integral values print without a fractional part.
///
/// ## Example
/// ```
/// use polyma::util::num::format_number;
///
/// assert_eq!(format_number(7.0), "7");
/// assert_eq!(format_number(2.5), "2.5");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INT {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

/// Converts an `f64` to a collection index if and only if it is a
/// non-negative integer in the exactly-representable range.
///
/// ## Returns
/// - `Some(usize)`: The converted index.
/// - `None`: If the value is negative, fractional, or too large.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn f64_to_index(value: f64) -> Option<usize> {
    if value < 0.0 || value.fract() != 0.0 || value > MAX_SAFE_INT {
        return None;
    }
    Some(value as usize)
}
