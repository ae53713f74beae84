// tracetrie-core/src/matcher.rs
//! The fast, boolean-only matcher.
//!
//! Relies on siblings being sorted in matching order (class-covering nodes
//! first, then exact-string nodes sorted by value — see
//! [`crate::convergence::sort_for_matching`]): once the scan reaches a long
//! enough run of exact-string siblings it switches to a binary search
//! instead of testing each one in turn.
//!
//! License: MIT OR Apache-2.0

use crate::config::TrieConfig;
use crate::node::Node;
use crate::tokenizer::heading_token;

/// Returns true if `value` matches some path through `kidz`.
pub fn match_by_nodes(value: &str, kidz: &[Node], cfg: &TrieConfig) -> bool {
    if value.is_empty() && kidz.is_empty() {
        return true;
    }
    if value.is_empty() {
        return false;
    }

    let head = heading_token(value);
    let tail = &value[head.len()..];

    let mut i = 0usize;
    while i != kidz.len() {
        let kid = &kidz[i];
        if i + cfg.binsearch_threshold < kidz.len() && kid.token.as_exact().is_some() {
            break; // bail out to binary search phase
        }
        if kid.token.matches(head) && match_by_nodes(tail, &kid.children, cfg) {
            return true;
        }
        i += 1;
    }

    if i != kidz.len() {
        // kidz[i..] is sorted by exact-string value; find the first entry
        // whose string is strictly greater than `head`, then walk backward
        // testing candidates whose string is a prefix-compatible match.
        let start = i;
        let upper = kidz[start..].partition_point(|kid| {
            kid.token
                .as_exact()
                .map(|s| s <= head)
                .unwrap_or(true)
        }) + start;

        let mut k = upper;
        while k != start {
            k -= 1;
            match kidz[k].token.as_exact() {
                Some(s) if s == head => {
                    if match_by_nodes(tail, &kidz[k].children, cfg) {
                        return true;
                    }
                }
                _ => break,
            }
        }
    }

    false
}
