// tracetrie-core/src/classify/char.rs
//! Single-character predicates and the calendar-word recognizer.
//!
//! These are the leaves of the classification stack: every other module in
//! `classify` and the tokenizer builds on the predicates here.
//!
//! License: MIT OR Apache-2.0

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Lowercase weekday names (three-letter and full forms), built once and
/// reused for every `is_weekday_word` lookup. Mirrors the reference's
/// `WeekDays()` table.
static WEEKDAYS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "sun", "sunday", "mon", "monday", "tue", "tuesday", "wed", "wednesday", "thu", "thursday",
        "fri", "friday", "sat", "saturday",
    ]
    .into_iter()
    .collect()
});

/// Lowercase month names (three-letter and full forms), built once. Mirrors
/// the reference's `Monthes()` table.
static MONTHS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "jan", "january", "feb", "february", "mar", "march", "apr", "april", "may", "jun", "june",
        "jul", "july", "aug", "august", "sep", "september", "oct", "october", "nov", "november",
        "dec", "december",
    ]
    .into_iter()
    .collect()
});

/// True for ASCII letters and any byte ≥ 0x80 — non-ASCII bytes are treated
/// as alphabetic rather than decoded, since full Unicode-aware
/// classification is out of scope here.
#[inline]
pub fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c >= 0x80
}

#[inline]
pub fn is_dec(c: u8) -> bool {
    c.is_ascii_digit()
}

#[inline]
pub fn is_hex(c: u8) -> bool {
    c.is_ascii_hexdigit()
}

#[inline]
pub fn is_alphadec(c: u8) -> bool {
    is_alpha(c) || is_dec(c)
}

#[inline]
pub fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

#[inline]
pub fn is_punctuation(c: u8) -> bool {
    matches!(
        c,
        b'=' | b'+' | b'-' | b'*' | b'/' | b'%' | b',' | b'.' | b'!' | b'?'
            | b'$' | b'&' | b'#' | b'^' | b'|' | b'(' | b')' | b'{' | b'}'
            | b'[' | b']' | b':' | b';'
    )
}

#[inline]
pub fn is_eol(c: u8) -> bool {
    c == b'\n' || c == b'\r'
}

/// True if `token` case-insensitively equals a three-letter or full weekday
/// name (`sun`..`saturday`).
pub fn is_weekday_word(token: &str) -> bool {
    WEEKDAYS.contains(token.to_ascii_lowercase().as_str())
}

/// True if `token` case-insensitively equals a three-letter or full month
/// name (`jan`..`december`).
pub fn is_month_word(token: &str) -> bool {
    MONTHS.contains(token.to_ascii_lowercase().as_str())
}
