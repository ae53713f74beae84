// tracetrie-core/src/classify/mod.rs
//! Character- and string-level classification.
//!
//! `char` holds single-character predicates and the calendar-word
//! recognizer; `string` builds the `StringClass` bitset classifier and the
//! `fits_class` compatibility check on top of them.
//!
//! License: MIT OR Apache-2.0

pub mod char;
pub mod string;

pub use string::{
    classify_string, fits_class, is_random_alphanums, StringClass, ALPHADEC, DECIMAL, HEX,
    INVALID, MASK_ALNUM, MONTH, NO_ALNUM, PUNCTUATION, RANDOM, SPACES, UNSPECIFIED, WEEKDAY,
};
