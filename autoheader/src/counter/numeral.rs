//! Bijective base-26 letter counters: `A` = 1, `Z` = 26, `AA` = 27.

/// Value of an all-letter token, or `None` if it overflows.
pub fn letters_to_value(token: &str) -> Option<i64> {
    token.bytes().try_fold(0i64, |acc, b| {
        let digit = i64::from(b.to_ascii_uppercase() - b'A' + 1);
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// Render a counter value as letters. Non-positive values fall back to digits.
pub fn value_to_letters(value: i64, lowercase: bool) -> String {
    if value <= 0 {
        return value.to_string();
    }
    let base = if lowercase { b'a' } else { b'A' };
    let mut rest = value;
    let mut out = Vec::new();
    while rest > 0 {
        rest -= 1;
        out.push(base + (rest % 26) as u8);
        rest /= 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
