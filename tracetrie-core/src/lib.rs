// tracetrie-core/src/lib.rs
//! # tracetrie-core
//!
//! A self-learning pattern trie for recognizing the shape of log lines (or
//! any other line-oriented text) without hand-written regexes. Feed it a
//! batch of representative samples via [`Trie::learn`] and it builds a tree
//! of tokens — generalizing runs of similar-looking siblings into character
//! classes, numbered-hole skeletons, or random-token ranges as it goes —
//! that [`Trie::matches`] can then check new lines against, or
//! [`Trie::describe`] can use to explain exactly where a line diverges from
//! anything previously seen.
//!
//! ## Modules
//!
//! * `classify`: character- and string-level classification (`StringClass`,
//!   `fits_class`) that every other module builds on.
//! * `tokenizer`: splits a line into alternating alphanumeric / non-alphanumeric
//!   runs — the only unit of granularity the trie ever reasons about.
//! * `token`: the three token matcher variants (`Exact`, `ClassRange`,
//!   `NumberHoles`) and their serialization.
//! * `node`: the trie `Node` type and the textual `AutoPatternsTrie:1`
//!   serialization format.
//! * `builder`: turns a batch of samples into the initial, unconverged tree.
//! * `convergence`: the fixed-point engine that merges similar siblings.
//! * `transform`: coalesces/explodes `Exact` chains between the storage and
//!   memory representations.
//! * `matcher`: the fast boolean matcher.
//! * `describe`: the scoring matcher that explains mismatches.
//! * `trie`: the public [`Trie`] type tying the above together.
//! * `config`: tunable thresholds, with defaults matching the reference
//!   implementation's compile-time constants.
//! * `errors`: the [`TrieError`] type.
//!
//! ## Usage Example
//!
//! ```rust
//! use tracetrie_core::Trie;
//!
//! let mut trie = Trie::new();
//! trie.learn(&["GET /health", "GET /status", "POST /login"]);
//!
//! assert!(trie.matches("GET /health"));
//! assert!(!trie.matches("GET /unknown"));
//!
//! for token in trie.describe("GET /unknown-path") {
//!     println!("{:?}: {:?}", token.status, token.token);
//! }
//! ```
//!
//! ## Error Handling
//!
//! Loading and saving a trie can fail with [`TrieError`] (bad format, I/O
//! errors). Learning and matching never fail — malformed *input samples*
//! (an empty line) are a programmer error and panic rather than propagate,
//! since there is no sensible trie to return. Malformed *lines in a loaded
//! trie file* are a data-quality issue, not a programmer error, and are
//! logged via the `log` crate and skipped rather than aborting the whole
//! load.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod builder;
pub mod classify;
pub mod config;
pub mod convergence;
pub mod describe;
pub mod errors;
pub mod matcher;
pub mod node;
pub mod token;
pub mod tokenizer;
pub mod transform;
pub mod trie;

pub use config::TrieConfig;
pub use describe::{SampleDescription, TokenDescription, TokenStatus};
pub use errors::TrieError;
pub use node::Node;
pub use token::Token;
pub use trie::Trie;
