//! Tunables for the builder, convergence engine, and descriptor.
//!
//! License: MIT OR Apache-2.0

/// Runtime-adjustable thresholds for learning and describing.
///
/// Mirrors the reference implementation's compile-time constants
/// (`ConvergeThreshold`, `DESCRIPT_*`, `BINSEARCH_THRESHOLD`) but as fields so
/// callers can tune them without recompiling. [`TrieConfig::default`]
/// reproduces the reference's defaults exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct TrieConfig {
    /// Minimum run length (exclusive) of sibling nodes sharing a class or
    /// number-hole skeleton before they're merged during convergence.
    pub converge_threshold: usize,
    /// Cap on how many nested-matches descending plies in a row count toward
    /// the cheap-path cutoff in the descriptor.
    pub descript_nesting_matches_threshold: usize,
    /// Max number of leading tokens the descriptor will try skipping as
    /// redundant before giving up on that branch.
    pub descript_limit_redundants: usize,
    /// Max depth the descriptor's nested-node lookup will search for a
    /// missing-token alignment.
    pub descript_limit_misses: usize,
    /// Soft wall-clock budget, in seconds, for a single `describe()` call.
    pub descript_time_budget_secs: u64,
    /// Minimum remaining sibling count before the fast matcher switches from
    /// linear scan to upper-bound binary search over exact-string children.
    pub binsearch_threshold: usize,
}

impl Default for TrieConfig {
    fn default() -> Self {
        Self {
            converge_threshold: 2,
            descript_nesting_matches_threshold: 2,
            descript_limit_redundants: 8,
            descript_limit_misses: 8,
            descript_time_budget_secs: 5,
            binsearch_threshold: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let cfg = TrieConfig::default();
        assert_eq!(cfg.converge_threshold, 2);
        assert_eq!(cfg.descript_nesting_matches_threshold, 2);
        assert_eq!(cfg.descript_limit_redundants, 8);
        assert_eq!(cfg.descript_limit_misses, 8);
        assert_eq!(cfg.descript_time_budget_secs, 5);
        assert_eq!(cfg.binsearch_threshold, 10);
    }
}
