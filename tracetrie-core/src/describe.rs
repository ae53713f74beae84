// tracetrie-core/src/describe.rs
//! The scoring matcher (`Descript`): finds the best-scoring path through the
//! trie for a sample that doesn't necessarily match outright, and reports a
//! per-token verdict instead of a single boolean.
//!
//! License: MIT OR Apache-2.0

use std::time::{Duration, Instant};

use crate::config::TrieConfig;
use crate::node::Node;
use crate::tokenizer::heading_token;

/// Per-token verdict produced by [`describe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// The token was present in the sample and matched a trie edge.
    Match,
    /// The token was present but didn't match any trie edge at this depth.
    Mismatch,
    /// The token was present in the sample but has no counterpart in the
    /// trie — the sample has something extra.
    Redundant,
    /// The trie expected a token here that the sample didn't have.
    Missing,
}

/// One token's verdict plus its text, or no text for [`TokenStatus::Missing`]
/// (there's nothing in the sample to show).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDescription<'a> {
    pub status: TokenStatus,
    pub token: Option<&'a str>,
}

pub type SampleDescription<'a> = Vec<TokenDescription<'a>>;

/// Tracks the soft wall-clock budget for a single `describe` call. Checking
/// the clock is comparatively expensive, so — like the reference — this
/// only samples it once every 128 calls.
pub struct DescribeContext {
    start: Instant,
    budget: Duration,
    hurrying: bool,
    probe_counter: u32,
}

impl DescribeContext {
    pub fn new(cfg: &TrieConfig) -> Self {
        DescribeContext {
            start: Instant::now(),
            budget: Duration::from_secs(cfg.descript_time_budget_secs),
            hurrying: false,
            probe_counter: 0,
        }
    }

    fn time_to_hurry(&mut self) -> bool {
        if !self.hurrying {
            self.probe_counter += 1;
            if self.probe_counter > 128 {
                self.probe_counter = 0;
                self.hurrying = self.start.elapsed() > self.budget;
            }
        }
        self.hurrying
    }
}

struct FoundNode<'a> {
    kidz: &'a [Node],
    depth: usize,
}

fn lookup_nested<'a>(
    kidz: &'a [Node],
    token_value: &str,
    depth: usize,
    depth_limit: usize,
    out: &mut Vec<FoundNode<'a>>,
) {
    if depth >= depth_limit {
        return;
    }
    for kid in kidz {
        if kid.token.matches(token_value) {
            out.push(FoundNode {
                kidz: &kid.children,
                depth,
            });
        }
        lookup_nested(&kid.children, token_value, depth + 1, depth_limit, out);
    }
}

/// Breadth-of-depth lookup: every node (at any depth below `depth_limit`)
/// whose token matches `token_value`, paired with how deep it sat. Used to
/// find a candidate resumption point when the sample appears to be missing
/// a token the trie expected.
fn find_nested_nodes<'a>(kidz: &'a [Node], token_value: &str, depth_limit: usize) -> Vec<FoundNode<'a>> {
    let mut out = Vec::new();
    for kid in kidz {
        lookup_nested(&kid.children, token_value, 1, depth_limit, &mut out);
    }
    out
}

/// Recursive best-score descriptor. Returns the status sequence for the
/// best-scoring path found and its mismatch count (lower is better; 0 means
/// a perfect match).
///
/// `nesting_matches` tracks how many matches have happened consecutively at
/// parent levels (capped at `cfg.descript_nesting_matches_threshold`) and is
/// reset to 0 on a mismatch — it gates the expensive missing/redundant
/// searches below so they only run where a few matches in a row make a
/// better score plausible.
fn status_by_nodes(
    value: &str,
    kidz: &[Node],
    ctx: &mut DescribeContext,
    nesting_matches: usize,
    cfg: &TrieConfig,
) -> (Vec<TokenStatus>, usize) {
    if kidz.is_empty() {
        let mut out = Vec::new();
        let mut tmp = value;
        while !tmp.is_empty() {
            let head = heading_token(tmp);
            tmp = &tmp[head.len()..];
            out.push(TokenStatus::Redundant);
        }
        let count = out.len();
        return (out, count);
    }

    let head = heading_token(value);
    let tail = &value[head.len()..];

    let mut best_mismatches = usize::MAX;
    let mut best_out: Vec<TokenStatus> = Vec::new();
    let mut current_level_matched = false;

    for kid in kidz {
        let matched = kid.token.matches(head);
        if !matched && best_mismatches <= 1 {
            continue;
        }

        let next_nesting = if matched {
            current_level_matched = true;
            if nesting_matches < cfg.descript_nesting_matches_threshold {
                nesting_matches + 1
            } else {
                cfg.descript_nesting_matches_threshold
            }
        } else {
            0
        };
        let (ss, sub_mismatches) = status_by_nodes(tail, &kid.children, ctx, next_nesting, cfg);
        let mismatches = (if matched { 0 } else { 1 }) + sub_mismatches;

        if best_mismatches > mismatches {
            best_mismatches = mismatches;
            best_out.clear();
            best_out.push(if matched { TokenStatus::Match } else { TokenStatus::Mismatch });
            best_out.extend(ss);
            if best_mismatches == 0 {
                return (best_out, 0);
            }
        }
    }

    if nesting_matches == 0
        || (nesting_matches >= cfg.descript_nesting_matches_threshold && current_level_matched)
        || best_mismatches == 1
        || ctx.time_to_hurry()
    {
        return (best_out, best_mismatches);
    }

    if cfg.descript_limit_misses != 0 {
        let depth_limit = best_mismatches.min(cfg.descript_limit_misses);
        let fnn = find_nested_nodes(kidz, head, depth_limit);
        for found in &fnn {
            if found.depth < best_mismatches {
                let (ss, sub) = status_by_nodes(tail, found.kidz, ctx, 1, cfg);
                let mismatches = found.depth + sub;
                if best_mismatches > mismatches {
                    best_mismatches = mismatches;
                    best_out.clear();
                    best_out.extend(std::iter::repeat(TokenStatus::Missing).take(found.depth));
                    best_out.push(TokenStatus::Match);
                    best_out.extend(ss);
                }
            }
        }
    }

    if cfg.descript_limit_redundants != 0 && !head.is_empty() {
        let mut tmp_value = tail;
        let mut skip_count = 1usize;
        while skip_count < best_mismatches
            && skip_count < cfg.descript_limit_redundants
            && !tmp_value.is_empty()
        {
            let tmp_head = heading_token(tmp_value);
            let tmp_tail = &tmp_value[tmp_head.len()..];
            for kid in kidz {
                if kid.token.matches(tmp_head) {
                    let (ss, sub) = status_by_nodes(tmp_tail, &kid.children, ctx, 1, cfg);
                    let mismatches = skip_count + sub;
                    if best_mismatches > mismatches {
                        best_mismatches = mismatches;
                        best_out.clear();
                        best_out.extend(std::iter::repeat(TokenStatus::Redundant).take(skip_count));
                        best_out.push(TokenStatus::Match);
                        best_out.extend(ss);
                    }
                }
            }
            tmp_value = tmp_tail;
            skip_count += 1;
        }
    }

    (best_out, best_mismatches)
}

/// Describes how `sample` relates to the best-matching path through `kidz`:
/// one status per token, `Missing` entries carrying no text since the
/// sample never had that token to show.
///
/// Panics if the recovered statuses don't account for every byte of
/// `sample` — that would mean [`status_by_nodes`] returned a status count
/// inconsistent with the tokens it was describing, an internal invariant
/// violation rather than a recoverable error.
pub fn describe<'a>(sample: &'a str, kidz: &[Node], cfg: &TrieConfig) -> SampleDescription<'a> {
    let mut ctx = DescribeContext::new(cfg);
    let (statuses, _) = status_by_nodes(sample, kidz, &mut ctx, 1, cfg);

    let mut out = Vec::with_capacity(statuses.len());
    let mut tail = sample;
    for status in statuses {
        if status == TokenStatus::Missing {
            out.push(TokenDescription { status, token: None });
        } else {
            let token = heading_token(tail);
            tail = &tail[token.len()..];
            out.push(TokenDescription {
                status,
                token: Some(token),
            });
        }
    }

    assert!(
        tail.is_empty(),
        "describe() left an undescribed tail: {tail:?} (sample {sample:?} had more tokens than statuses accounted for)"
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convergence::sort_for_matching;
    use crate::node::Node;
    use crate::token::Token;

    /// A trie whose tokens line up with real `heading_token` run boundaries
    /// ("GET" / " " / "users"), unlike an arbitrary mixed-polarity string —
    /// `describe`'s outer wrapper re-derives token text by retokenizing the
    /// sample, so trie edges must respect the same run boundaries real
    /// `learn()` output would.
    fn build_trie() -> Vec<Node> {
        let mut get = Node::new(Token::Exact("GET".to_string()));
        let mut space = Node::new(Token::Exact(" ".to_string()));
        space.children.push(Node::new(Token::Exact("users".to_string())));
        get.children.push(space);
        let mut kidz = vec![get];
        sort_for_matching(&mut kidz);
        kidz
    }

    #[test]
    fn perfect_match_is_all_match_statuses() {
        let cfg = TrieConfig::default();
        let kidz = build_trie();
        let desc = describe("GET users", &kidz, &cfg);
        assert!(desc.iter().all(|d| d.status == TokenStatus::Match));
        let joined: String = desc.iter().map(|d| d.token.unwrap()).collect();
        assert_eq!(joined, "GET users");
    }

    #[test]
    fn mismatched_head_token_is_reported() {
        let cfg = TrieConfig::default();
        let kidz = build_trie();
        let desc = describe("POST users", &kidz, &cfg);
        assert_eq!(desc[0].status, TokenStatus::Mismatch);
        assert_eq!(desc[0].token, Some("POST"));
    }

    #[test]
    fn extra_trailing_token_is_redundant() {
        let cfg = TrieConfig::default();
        let kidz = build_trie();
        let desc = describe("GET users!!", &kidz, &cfg);
        assert_eq!(desc.last().unwrap().status, TokenStatus::Redundant);
    }
}
