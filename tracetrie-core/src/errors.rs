//! errors.rs - Custom error types for the tracetrie-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

/// This enum represents all possible error types in the `tracetrie-core`
/// library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions. This prevents them from
/// matching all variants exhaustively, thus avoiding breaking changes.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TrieError {
    #[error("empty trie")]
    EmptyTrie,

    #[error("bad trie format")]
    BadTrieFormat,

    #[error("malformed token on line {line}: {detail}")]
    MalformedToken { line: usize, detail: String },

    #[error("an I/O error occurred: {0}")]
    Io(#[from] std::io::Error),
}
