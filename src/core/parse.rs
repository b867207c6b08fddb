//! Lenient numeric parsing for raw form text.
//!
//! Form fields arrive as whatever the user typed. These helpers read the
//! longest numeric prefix and ignore the rest, so `"12.5%"` reads as 12.5
//! and `"25 years"` as 25. Anything without a leading number reads as `None`.

/// Reads a leading decimal literal (`[+-]digits[.digits][e[+-]digits]`).
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let bytes = text.trim_start().as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        end = frac_end;
    }

    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    let literal = std::str::from_utf8(&bytes[..end]).ok()?;
    literal
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Reads a leading base-10 integer (`[+-]digits`); fractional parts are dropped.
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let bytes = text.trim_start().as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    std::str::from_utf8(&bytes[..end]).ok()?.parse::<i64>().ok()
}
