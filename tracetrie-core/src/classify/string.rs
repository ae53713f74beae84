// tracetrie-core/src/classify/string.rs
//! `StringClass` bitset classification and the `fits_class` compatibility
//! check.
//!
//! License: MIT OR Apache-2.0

use super::char::{is_alphadec, is_month_word, is_punctuation, is_space, is_weekday_word};
use tracetrie_entropy::randomness::is_random_alphanums as entropy_is_random;

/// A bitset summarizing the character makeup and semantic category of a
/// token or a range of tokens.
///
/// The low nibble is the base alphanumeric category (wider values come
/// first; narrower values are strictly more specific): [`NO_ALNUM`],
/// [`ALPHADEC`], [`HEX`], [`DECIMAL`]. The remaining bits are independent
/// modifier flags.
///
/// Unlike the reference implementation (where `WEEKDAY` and `MONTH` share a
/// bit value, apparently by copy-paste) this assigns them distinct bits so a
/// class can in principle describe "either a weekday or a month name".
pub type StringClass = u32;

pub const NO_ALNUM: StringClass = 0;
pub const ALPHADEC: StringClass = 1;
pub const HEX: StringClass = 2;
pub const DECIMAL: StringClass = 3;
pub const MASK_ALNUM: StringClass = 0x0000_000f;

pub const SPACES: StringClass = 0x0000_0010;
pub const PUNCTUATION: StringClass = 0x0000_0020;
pub const UNSPECIFIED: StringClass = 0x0000_1000;
pub const RANDOM: StringClass = 0x0000_2000;
pub const WEEKDAY: StringClass = 0x0000_4000;
pub const MONTH: StringClass = 0x0000_8000;

/// Sentinel meaning "no class computed yet" / "matches nothing", used the
/// same way the reference uses `SCF_INVALID` as an unreachable-class marker
/// during convergence.
pub const INVALID: StringClass = StringClass::MAX;

/// Classifies a token's character makeup.
///
/// Tests the whole token as a calendar word first (case-insensitively); if
/// so, classification stops there. Otherwise scans characters, narrowing the
/// base alnum category as disqualifying bytes are seen and accumulating
/// modifier flags. Never sets [`RANDOM`] — that is the job of
/// [`is_random_alphanums`], which is comparatively expensive and only run
/// when explicitly asked for (via [`fits_class`] against a class that
/// requires it).
pub fn classify_string(s: &str) -> StringClass {
    if is_weekday_word(s) {
        return ALPHADEC | WEEKDAY;
    }
    if is_month_word(s) {
        return ALPHADEC | MONTH;
    }

    let bytes = s.as_bytes();
    let mut dec = true;
    let mut hex = true;
    let mut aldec = true;
    let mut has_dec = false;
    let mut has_hex = false;
    let mut has_aldec = false;
    let mut mods: StringClass = 0;

    for (i, &c) in bytes.iter().enumerate() {
        if is_space(c) {
            mods |= SPACES;
            continue;
        }
        if is_punctuation(c) {
            mods |= PUNCTUATION;
            continue;
        }
        if !is_alphadec(c) {
            mods |= UNSPECIFIED;
            continue;
        }

        has_aldec = true;

        if !c.is_ascii_digit() {
            dec = false;
            if !c.is_ascii_hexdigit() {
                // A lone 'x' at position 0 or 1 (as in "0x...") doesn't
                // disqualify hex, provided it isn't the token's last byte.
                let is_ox_prefix_x = c == b'x'
                    && ((i == 1 && bytes[0] == b'0') || i == 0)
                    && i + 1 != bytes.len();
                if !is_ox_prefix_x {
                    hex = false;
                }
            } else {
                has_hex = true;
            }
            if !c.is_ascii_alphabetic() {
                aldec = false;
            }
        } else {
            has_dec = true;
            has_hex = true;
        }
    }

    if dec && has_dec {
        return DECIMAL | mods;
    }
    if hex && has_hex {
        return HEX | mods;
    }
    if aldec && has_aldec {
        return ALPHADEC | mods;
    }
    NO_ALNUM | mods
}

/// Tests whether `token` is compatible with the class `sc` — i.e. whether
/// `token` contains nothing that `sc` doesn't allow.
///
/// - If `sc` has [`WEEKDAY`] or [`MONTH`] set, `token` must classify with at
///   least one of those bits set too.
/// - Else `token`'s base alnum category must be at least as narrow as `sc`'s.
/// - Every modifier bit set on `token` ([`SPACES`], [`PUNCTUATION`],
///   [`UNSPECIFIED`]) must also be set on `sc`.
/// - If `sc` has [`RANDOM`] set, `token` must additionally pass
///   [`is_random_alphanums`].
pub fn fits_class(token: &str, sc: StringClass) -> bool {
    let token_class = classify_string(token);

    if (sc & (WEEKDAY | MONTH)) != 0 {
        return (token_class & (sc & (WEEKDAY | MONTH))) != 0;
    }

    if (token_class & MASK_ALNUM) < (sc & MASK_ALNUM) {
        return false;
    }
    if (token_class & SPACES) != 0 && (sc & SPACES) == 0 {
        return false;
    }
    if (token_class & PUNCTUATION) != 0 && (sc & PUNCTUATION) == 0 {
        return false;
    }
    if (token_class & UNSPECIFIED) != 0 && (sc & UNSPECIFIED) == 0 {
        return false;
    }
    if (sc & RANDOM) != 0 && !is_random_alphanums(token) {
        return false;
    }
    true
}

/// Heuristically decides whether `s` looks like a randomly generated
/// alphanumeric sequence. Delegates the numeric estimator to
/// `tracetrie-entropy`; requires at least 4 relevant characters,
/// approximately balanced case, and a normalized Shannon entropy above 0.85.
pub fn is_random_alphanums(s: &str) -> bool {
    entropy_is_random(s)
}
