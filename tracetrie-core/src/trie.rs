// tracetrie-core/src/trie.rs
//! The public [`Trie`] type: the single entry point users of this crate
//! actually hold on to.
//!
//! License: MIT OR Apache-2.0

use std::io::{BufRead, Write};

use log::debug;

use crate::builder::learn as builder_learn;
use crate::config::TrieConfig;
use crate::convergence::converge_similar_nodes;
use crate::describe::{describe as describe_impl, SampleDescription};
use crate::errors::TrieError;
use crate::matcher::match_by_nodes;
use crate::node::{deserialize_forest, serialize_forest, Node, IDENTITY_LINE};
use crate::transform::{transform_to_memory_representation, transform_to_storage_representation};

/// A learned pattern trie: the set of line shapes it has seen, generalized
/// via convergence into a mix of exact tokens, classified ranges, and
/// numbered-hole skeletons.
#[derive(Debug, Clone)]
pub struct Trie {
    root: Vec<Node>,
    config: TrieConfig,
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl Trie {
    /// Creates an empty trie using [`TrieConfig::default`] tunables.
    pub fn new() -> Self {
        Trie {
            root: Vec::new(),
            config: TrieConfig::default(),
        }
    }

    /// Creates an empty trie with custom tunables.
    pub fn with_config(config: TrieConfig) -> Self {
        Trie {
            root: Vec::new(),
            config,
        }
    }

    /// Loads a previously [`Trie::save`]d trie from `reader`.
    pub fn load<R: BufRead>(mut reader: R, config: TrieConfig) -> Result<Self, TrieError> {
        debug!("loading trie");
        let mut identity = String::new();
        let bytes_read = reader.read_line(&mut identity).map_err(TrieError::Io)?;
        if bytes_read == 0 {
            return Err(TrieError::EmptyTrie);
        }
        if identity.trim_end_matches(['\r', '\n']) != IDENTITY_LINE {
            return Err(TrieError::BadTrieFormat);
        }

        let mut root = deserialize_forest(reader)?;
        transform_to_memory_representation(&mut root);
        debug!("loaded trie with {} root nodes", root.len());
        Ok(Trie { root, config })
    }

    /// Saves this trie to `writer` in the `AutoPatternsTrie:1` text format.
    /// `compact` selects digit depth-leaders over space-indented ones.
    pub fn save<W: Write>(&mut self, writer: &mut W, compact: bool) -> Result<(), TrieError> {
        debug!("saving trie with {} root nodes", self.root.len());
        transform_to_storage_representation(&mut self.root);
        let result = serialize_forest(&self.root, writer, compact).map_err(TrieError::Io);
        transform_to_memory_representation(&mut self.root);
        result
    }

    /// Learns `samples`, folding them (and anything the convergence engine
    /// judges similar enough) into the trie.
    ///
    /// Panics if any sample is an empty string — see
    /// [`crate::builder::build_pattern_tree_recurse`].
    pub fn learn<S: AsRef<str>>(&mut self, samples: &[S]) {
        debug!("learning {} samples", samples.len());
        let refs: Vec<&str> = samples.iter().map(|s| s.as_ref()).collect();
        builder_learn(&mut self.root, &refs);
        converge_similar_nodes(&mut self.root, &self.config);
    }

    /// Fast boolean check: does `sample` match some path already learned?
    pub fn matches(&self, sample: &str) -> bool {
        match_by_nodes(sample, &self.root, &self.config)
    }

    /// Verbose, best-effort description of how `sample` relates to the
    /// closest learned path, one status per token.
    pub fn describe<'a>(&self, sample: &'a str) -> SampleDescription<'a> {
        describe_impl(sample, &self.root, &self.config)
    }

    /// Tunables currently in effect.
    pub fn config(&self) -> &TrieConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::describe::TokenStatus;
    use std::io::Cursor;

    #[test]
    fn learns_and_matches_literal_samples() {
        let mut trie = Trie::new();
        trie.learn(&["GET /health", "GET /status"]);
        assert!(trie.matches("GET /health"));
        assert!(trie.matches("GET /status"));
        assert!(!trie.matches("GET /missing"));
    }

    #[test]
    fn converges_many_similar_ids_into_a_class() {
        let mut trie = Trie::new();
        // All two-digit, so the converged class range stays [2, 2] (no
        // min/max expansion happens when min == max) and still covers any
        // other two-digit id.
        let samples: Vec<String> = (10..20).map(|n| format!("user id={n}")).collect();
        trie.learn(&samples);
        assert!(trie.matches("user id=99"));
        assert!(!trie.matches("user id=5"));
    }

    #[test]
    fn save_then_load_preserves_matching_behavior() {
        let mut trie = Trie::new();
        trie.learn(&["GET /health", "GET /status", "POST /login"]);

        let mut buf = Vec::new();
        trie.save(&mut buf, true).unwrap();

        let loaded = Trie::load(Cursor::new(buf), TrieConfig::default()).unwrap();
        assert!(loaded.matches("GET /health"));
        assert!(loaded.matches("POST /login"));
        assert!(!loaded.matches("DELETE /login"));
    }

    #[test]
    fn load_rejects_bad_identity_line() {
        let bad = b"NotATrie:1\n0$x\n";
        let err = Trie::load(Cursor::new(&bad[..]), TrieConfig::default()).unwrap_err();
        assert!(matches!(err, TrieError::BadTrieFormat));
    }

    #[test]
    fn load_rejects_empty_input() {
        let err = Trie::load(Cursor::new(&b""[..]), TrieConfig::default()).unwrap_err();
        assert!(matches!(err, TrieError::EmptyTrie));
    }

    #[test]
    fn describe_reports_mismatch_on_unknown_head() {
        let mut trie = Trie::new();
        trie.learn(&["GET /health"]);
        let desc = trie.describe("POST /health");
        assert_eq!(desc[0].status, TokenStatus::Mismatch);
    }
}
