// tracetrie-core/src/tokenizer.rs
//! The canonical line tokenizer.
//!
//! `heading_token` is the single point of truth for segmentation: the
//! builder, matcher, and descriptor all call it (directly or via
//! [`Tokens`]), so any disagreement here would corrupt the trie.
//!
//! License: MIT OR Apache-2.0

use crate::classify::char::is_alphadec;

/// Returns the maximal prefix of `s` where `is_alphadec` is constant.
///
/// Panics if `s` is empty — callers are expected to check for emptiness
/// first, since an empty line has no heading token by definition.
pub fn heading_token(s: &str) -> &str {
    let bytes = s.as_bytes();
    debug_assert!(!bytes.is_empty());
    let alnum = is_alphadec(bytes[0]);
    let mut end = s.len();
    for (i, &b) in bytes.iter().enumerate().skip(1) {
        if is_alphadec(b) != alnum {
            end = i;
            break;
        }
    }
    &s[..end]
}

/// Iterator over the alternating alphanumeric / non-alphanumeric runs of a
/// line, built by repeated application of [`heading_token`].
///
/// No empty token is ever produced from a non-empty line, and adjacent
/// tokens always have opposite alnum/non-alnum polarity.
pub struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { rest: line }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let head = heading_token(self.rest);
        self.rest = &self.rest[head.len()..];
        Some(head)
    }
}

/// Counts the tokens `heading_token` would split `line` into.
pub fn token_count(line: &str) -> usize {
    Tokens::new(line).count()
}
