// tracetrie-core/src/convergence.rs
//! The fixed-point convergence engine: repeatedly merges sibling nodes that
//! look similar enough to be treated as one pattern, until a pass produces
//! no change.
//!
//! License: MIT OR Apache-2.0

use std::cmp::Ordering;

use log::debug;

use crate::classify::{
    classify_string, is_random_alphanums, MASK_ALNUM, MONTH, NO_ALNUM, SPACES, WEEKDAY,
};
use crate::config::TrieConfig;
use crate::node::{serialize_forest, Node};
use crate::token::{build_skeleton, skeleton_matches, Token};

fn class_invariant_for_convergence(sc: crate::classify::StringClass) -> crate::classify::StringClass {
    if sc == SPACES {
        sc
    } else if (sc & (WEEKDAY | MONTH)) != 0 {
        sc
    } else if (sc & MASK_ALNUM) != NO_ALNUM && (sc & MASK_ALNUM) != crate::classify::ALPHADEC {
        sc
    } else {
        crate::classify::INVALID
    }
}

/// Sibling order used while actively converging: childless (leaf) nodes come
/// first, since only childless nodes can coalesce, then nodes group by
/// class, then by whether they hold an exact string and its value.
///
/// The reference compares `a`'s class against itself here (`bcls` is
/// assigned from `a`, not `b`) — a no-op comparison that silently disables
/// class-based grouping. This fixes that so same-class siblings actually
/// sort adjacent to each other, which is required for the grouping scan in
/// [`converge_nodes_with_similar_tokens`] to find them.
fn cmp_converging(a: &Node, b: &Node) -> Ordering {
    let a_leaf = a.children.is_empty();
    let b_leaf = b.children.is_empty();
    if a_leaf != b_leaf {
        return b_leaf.cmp(&a_leaf);
    }

    let acls = a.token.string_class();
    let bcls = b.token.string_class();
    if acls != bcls {
        return acls.cmp(&bcls);
    }

    let astr = a.token.as_exact();
    let bstr = b.token.as_exact();
    match (astr, bstr) {
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) if a != b => return a.cmp(b),
        _ => {}
    }

    a.token.length_min().cmp(&b.token.length_min())
}

/// Sibling order used for matching and storage: class-covering nodes first
/// (so the fast matcher's linear scan sees them before it switches to binary
/// search), then exact-string nodes sorted lexicographically by value.
pub fn cmp_matching(a: &Node, b: &Node) -> Ordering {
    let astr = a.token.as_exact();
    let bstr = b.token.as_exact();
    match (astr, bstr) {
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) if a != b => return a.cmp(b),
        _ => {}
    }

    let acls = a.token.string_class();
    let bcls = b.token.string_class();
    if acls != bcls {
        return acls.cmp(&bcls);
    }

    a.token.length_min().cmp(&b.token.length_min())
}

pub fn sort_for_converging(kidz: &mut [Node]) {
    kidz.sort_by(cmp_converging);
}

pub fn sort_for_matching(kidz: &mut [Node]) {
    kidz.sort_by(cmp_matching);
}

/// Widens an estimated min/max length range so that the converged token
/// tolerates samples a bit outside what was actually observed: halves the
/// minimum (floor at the original value if it was already ≤ 1) and doubles
/// the maximum.
fn estimated_min_max_len_expand(min_len: &mut usize, max_len: &mut usize) {
    if *min_len < *max_len {
        if *min_len > 1 {
            *min_len /= 2;
        }
        *max_len *= 2;
    }
}

/// Pass A: merges runs of class-compatible or identical-skeleton siblings.
///
/// `kidz` must already be sorted with [`sort_for_converging`] — the scan
/// below is a single left-to-right pass over runs of consecutive, mutually
/// compatible siblings.
fn converge_nodes_with_similar_tokens(kidz: &mut Vec<Node>, cfg: &TrieConfig) {
    let before = kidz.len();
    let mut i = 0usize;
    while i < kidz.len() {
        let sc = class_invariant_for_convergence(kidz[i].token.string_class());
        let leaf = kidz[i].children.is_empty();

        let mut min_len = kidz[i].token.length_min();
        let mut max_len = kidz[i].token.length_max();
        let mut all_same_strings = true;
        let istr = kidz[i].token.as_exact().map(|s| s.to_string());
        let skeleton = istr.as_deref().map(build_skeleton);

        let mut j = i + 1;
        while j < kidz.len() && kidz[j].children.is_empty() == leaf {
            let jstr = kidz[j].token.as_exact();

            if sc != crate::classify::INVALID {
                if kidz[j].token.string_class() != sc {
                    break;
                }
                min_len = min_len.min(kidz[j].token.length_min());
                max_len = max_len.max(kidz[j].token.length_max());
                match (istr.as_deref(), jstr) {
                    (Some(a), Some(b)) if a == b => {}
                    _ => all_same_strings = false,
                }
            } else {
                match (istr.as_deref(), jstr, skeleton.as_deref()) {
                    (Some(a), Some(b), Some(skel)) if skeleton_matches(b, skel) => {
                        min_len = min_len.min(kidz[j].token.length_min());
                        max_len = max_len.max(kidz[j].token.length_max());
                        if a != b {
                            all_same_strings = false;
                        }
                    }
                    _ => break,
                }
            }
            j += 1;
        }

        estimated_min_max_len_expand(&mut min_len, &mut max_len);

        let run_len = j - i;
        if run_len > cfg.converge_threshold || (run_len > 1 && (all_same_strings || sc == SPACES))
        {
            let new_token = if all_same_strings {
                Token::Exact(istr.clone().expect("same-string run must have a string"))
            } else if sc == crate::classify::INVALID {
                Token::NumberHoles {
                    max_len,
                    skeleton: skeleton.clone().expect("number-holes run must have a skeleton"),
                }
            } else {
                Token::ClassRange {
                    class: sc,
                    min_len,
                    max_len,
                }
            };

            let mut merged = Node::new(new_token);
            for k in i..j {
                merged.children.append(&mut kidz[k].children);
            }
            kidz.splice(i..j, std::iter::once(merged));
            i += 1;
        } else {
            i = j;
        }
    }
    debug!("convergence pass A: {} children before, {} after", before, kidz.len());
}

/// Pass B: merges runs of random-looking exact-string leaves whose
/// concatenation still looks random, into a single `RANDOM`-flagged
/// class-range token.
fn converge_nodes_with_random_tokens_and_matching_subnodes(kidz: &mut Vec<Node>, cfg: &TrieConfig) {
    let before = kidz.len();
    loop {
        let serialized: Vec<Option<String>> = kidz
            .iter()
            .map(|kid| {
                let s = kid.token.as_exact()?;
                if classify_string(s) & MASK_ALNUM != NO_ALNUM && is_random_alphanums(s) {
                    let mut buf = Vec::new();
                    let forest = std::slice::from_ref(kid);
                    serialize_forest(forest, &mut buf, true).ok()?;
                    Some(String::from_utf8(buf).ok()?)
                } else {
                    None
                }
            })
            .collect();

        let mut merged_any = false;

        let mut i = 0usize;
        while i + 1 < kidz.len() {
            let Some(si) = &serialized[i] else {
                i += 1;
                continue;
            };

            let mut group: Vec<usize> = (i + 1..kidz.len())
                .filter(|&j| serialized[j].as_deref() == Some(si.as_str()))
                .collect();

            if group.len() <= cfg.converge_threshold {
                i += 1;
                continue;
            }
            group.push(i);

            let mut merged_tokens = String::new();
            let mut min_len = usize::MAX;
            let mut max_len = 0usize;
            for &j in &group {
                if let Some(s) = kidz[j].token.as_exact() {
                    merged_tokens.push_str(s);
                }
                min_len = min_len.min(kidz[j].token.length_min());
                max_len = max_len.max(kidz[j].token.length_max());
            }

            if !is_random_alphanums(&merged_tokens) {
                i += 1;
                continue;
            }

            estimated_min_max_len_expand(&mut min_len, &mut max_len);
            let sc = classify_string(&merged_tokens) & MASK_ALNUM;
            debug_assert_ne!(sc, NO_ALNUM);
            kidz[i].token = Token::ClassRange {
                class: sc | crate::classify::RANDOM,
                min_len,
                max_len,
            };

            group.pop(); // drop `i` itself; only the trailing duplicates are removed
            group.sort_unstable_by(|a, b| b.cmp(a));
            for j in group {
                kidz.remove(j);
            }
            merged_any = true;
            break; // indices shifted; restart the scan with a fresh table
        }

        if !merged_any {
            break;
        }
    }
    debug!("convergence pass B: {} children before, {} after", before, kidz.len());
}

/// Pass C: merges sibling subtrees whose token serializes identically.
fn converge_nodes_with_matching_tokens(kidz: &mut Vec<Node>) {
    let before = kidz.len();
    let serialized: Vec<String> = kidz
        .iter()
        .map(|kid| {
            let mut buf = String::new();
            kid.token.serialize(&mut buf);
            buf
        })
        .collect();

    let mut i = 0usize;
    while i + 1 < kidz.len() {
        let mut j = i + 1;
        while j < kidz.len() {
            if serialized[i] == serialized[j] && kidz[i].children.is_empty() == kidz[j].children.is_empty() {
                let mut moved = std::mem::take(&mut kidz[j].children);
                kidz[i].children.append(&mut moved);
                kidz.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
    debug!("convergence pass C: {} children before, {} after", before, kidz.len());
}

/// Runs the three convergence passes to a fixed point over `kidz` and all
/// descendants, leaving every level sorted in matching order.
pub fn converge_similar_nodes(kidz: &mut Vec<Node>, cfg: &TrieConfig) {
    loop {
        let initial_count = kidz.len();

        if kidz.len() > 1 {
            sort_for_converging(kidz);
            converge_nodes_with_similar_tokens(kidz, cfg);
        }

        for kid in kidz.iter_mut() {
            converge_similar_nodes(&mut kid.children, cfg);
        }

        if kidz.len() > 1 {
            converge_nodes_with_random_tokens_and_matching_subnodes(kidz, cfg);
            if kidz.len() > 1 {
                converge_nodes_with_matching_tokens(kidz);
            }
        }

        if kidz.len() == initial_count {
            if kidz.len() > 1 {
                sort_for_matching(kidz);
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DECIMAL;

    fn leaf(s: &str) -> Node {
        Node::new(Token::Exact(s.to_string()))
    }

    #[test]
    fn converges_many_decimal_leaves_into_class_range() {
        let cfg = TrieConfig::default();
        let mut kidz: Vec<Node> = (0..5).map(|n| leaf(&n.to_string())).collect();
        converge_similar_nodes(&mut kidz, &cfg);
        assert_eq!(kidz.len(), 1);
        match &kidz[0].token {
            Token::ClassRange { class, .. } => assert_eq!(*class & MASK_ALNUM, DECIMAL),
            other => panic!("expected a class range, got {other:?}"),
        }
    }

    #[test]
    fn does_not_converge_below_threshold() {
        let cfg = TrieConfig::default();
        let mut kidz: Vec<Node> = vec![leaf("1"), leaf("2")];
        converge_similar_nodes(&mut kidz, &cfg);
        assert_eq!(kidz.len(), 2);
    }

    #[test]
    fn converges_identical_numeric_skeletons() {
        let cfg = TrieConfig::default();
        let mut kidz: Vec<Node> = vec![
            leaf("req-0001"),
            leaf("req-0002"),
            leaf("req-0003"),
            leaf("req-0004"),
        ];
        converge_similar_nodes(&mut kidz, &cfg);
        assert_eq!(kidz.len(), 1);
        assert!(matches!(kidz[0].token, Token::NumberHoles { .. }));
    }

    #[test]
    fn identical_subtrees_merge_children() {
        let cfg = TrieConfig::default();
        let mut a = leaf("x");
        a.children.push(leaf("1"));
        let mut b = leaf("x");
        b.children.push(leaf("2"));
        let mut kidz = vec![a, b];
        converge_similar_nodes(&mut kidz, &cfg);
        assert_eq!(kidz.len(), 1);
        assert_eq!(kidz[0].children.len(), 2);
    }
}
