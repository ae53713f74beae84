// tracetrie-core/src/builder.rs
//! Builds the initial (unconverged) pattern tree from a batch of samples.
//!
//! License: MIT OR Apache-2.0

use std::collections::HashSet;

use crate::node::Node;
use crate::token::Token;
use crate::tokenizer::heading_token;

/// Sorts `samples` and removes duplicates in place, same as the reference's
/// `SortAndUniq` helper that runs before every recursive grouping step.
fn sort_and_uniq(samples: &mut Vec<&str>) {
    samples.sort_unstable();
    samples.dedup();
}

/// Pool of exact-token text seen so far in one [`learn`] call.
///
/// The same literal head token (`"GET"`, `" "`, an id prefix, ...) tends to
/// recur across unrelated branches of the tree being built. Without this,
/// every occurrence would pay its own heap allocation via `.to_string()`;
/// with it, repeat occurrences clone out of the single canonical buffer
/// already held by the pool instead of allocating fresh from the borrowed
/// sample text. Nodes still end up owning a plain `String` each — this is a
/// build-time allocation-count reduction, not a change to `Token::Exact`'s
/// ownership model. Scoped to a single `learn` call, so it never outlives
/// the batch it was built for.
struct Interner {
    pool: HashSet<Box<str>>,
}

impl Interner {
    fn new() -> Self {
        Self {
            pool: HashSet::new(),
        }
    }

    fn intern(&mut self, s: &str) -> String {
        if let Some(existing) = self.pool.get(s) {
            return existing.to_string();
        }
        self.pool.insert(s.into());
        s.to_string()
    }
}

/// Finds (or creates) the child of `kidz` whose token exactly matches `head`
/// and whose "has children" state matches `without_kidz`. The reference
/// keeps leaf nodes and branch nodes with an identical head token separate
/// during the build pass — they only merge later, during convergence.
fn obtain_subnode<'a>(
    kidz: &'a mut Vec<Node>,
    interner: &mut Interner,
    head: &str,
    without_kidz: bool,
) -> &'a mut Node {
    if let Some(idx) = kidz
        .iter()
        .position(|kid| kid.children.is_empty() == without_kidz && kid.token.matches(head))
    {
        return &mut kidz[idx];
    }
    kidz.push(Node::new(Token::Exact(interner.intern(head))));
    kidz.last_mut().unwrap()
}

/// Groups `samples` by their heading token and recurses on what's left of
/// each group, building the raw, unconverged trie one token at a time.
///
/// Panics if `samples` contains an empty string — an empty sample has no
/// heading token and the reference treats this as an unrecoverable input
/// error (`EMPTY_SAMPLE_NOT_ALLOWED; abort()`), not a value to propagate.
pub fn build_pattern_tree_recurse(kidz: &mut Vec<Node>, samples: &[&str]) {
    let mut interner = Interner::new();
    build_pattern_tree_recurse_with(kidz, &mut interner, samples);
}

fn build_pattern_tree_recurse_with(kidz: &mut Vec<Node>, interner: &mut Interner, samples: &[&str]) {
    let mut subsamples: Vec<&str> = Vec::new();
    let mut i = 0usize;
    while i < samples.len() {
        let sample = samples[i];
        assert!(!sample.is_empty(), "empty sample is not allowed");

        let head = heading_token(sample);
        if head.len() < sample.len() {
            loop {
                subsamples.push(&samples[i][head.len()..]);
                i += 1;
                if !(i < samples.len()
                    && samples[i].len() > head.len()
                    && heading_token(samples[i]) == head)
                {
                    break;
                }
            }
            sort_and_uniq(&mut subsamples);
        } else {
            i += 1;
        }

        let subnode = obtain_subnode(kidz, interner, head, subsamples.is_empty());
        if !subsamples.is_empty() {
            build_pattern_tree_recurse_with(&mut subnode.children, interner, &subsamples);
            subsamples.clear();
        }
    }
}

/// Learns `samples` into `kidz`: dedupes and sorts the input, then builds
/// the raw prefix tree. Convergence is a separate pass (see
/// [`crate::convergence::converge_similar_nodes`]).
pub fn learn(kidz: &mut Vec<Node>, samples: &[&str]) {
    let mut refined: Vec<&str> = samples.to_vec();
    sort_and_uniq(&mut refined);
    if refined.is_empty() {
        return;
    }
    let mut interner = Interner::new();
    build_pattern_tree_recurse_with(kidz, &mut interner, &refined);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_shared_prefix_as_single_chain() {
        let mut kidz = Vec::new();
        learn(&mut kidz, &["GET /a", "GET /b"]);
        assert_eq!(kidz.len(), 1);
        assert_eq!(kidz[0].token, Token::Exact("GET".to_string()));
    }

    #[test]
    fn diverging_samples_produce_sibling_branches() {
        let mut kidz = Vec::new();
        learn(&mut kidz, &["abc123", "xyz789"]);
        assert_eq!(kidz.len(), 2);
    }

    #[test]
    #[should_panic(expected = "empty sample is not allowed")]
    fn empty_sample_is_rejected() {
        let mut kidz = Vec::new();
        learn(&mut kidz, &["ok", ""]);
    }

    #[test]
    fn interner_reuses_canonical_text_for_repeated_heads() {
        let mut interner = Interner::new();
        let a = interner.intern("GET");
        let b = interner.intern("GET");
        assert_eq!(a, b);
        assert_eq!(interner.pool.len(), 1);
    }

    #[test]
    fn duplicate_samples_collapse_to_one_path() {
        let mut kidz = Vec::new();
        learn(&mut kidz, &["same", "same", "same"]);
        assert_eq!(kidz.len(), 1);
        assert!(kidz[0].children.is_empty());
    }
}
