// Integer parsing for path and query parameters
//
// Mirrors `parseInt` leniency: optional leading whitespace, optional sign,
// an optional `0x` prefix switching to hex, then leading digits. Trailing
// garbage is ignored ("12abc" -> 12), no digits at all means no number.
// Oversized values saturate.

/// Parse the leading integer of `raw`, or `None` if it has no leading digits.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match digits.get(..2) {
        Some("0x") | Some("0X") => (16, &digits[2..]),
        _ => (10, digits),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;

    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            break;
        };
        seen_digit = true;
        value = value.saturating_mul(radix as i64).saturating_add(d as i64);
    }

    if !seen_digit {
        return None;
    }

    Some(if negative { -value } else { value })
}

/// Parse a record id. `None` means the caller sent something that is not an id.
pub fn parse_id(raw: &str) -> Option<i64> {
    parse_leading_int(raw)
}
