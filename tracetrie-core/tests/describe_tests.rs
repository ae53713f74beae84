use tracetrie_core::{Trie, TokenStatus};

#[test]
fn perfect_match_yields_all_match_statuses() {
    let mut trie = Trie::new();
    trie.learn(&["GET /health", "GET /status"]);
    let desc = trie.describe("GET /health");
    assert!(desc.iter().all(|d| d.status == TokenStatus::Match));
}

#[test]
fn redundant_extra_token_is_flanked_by_matches() {
    let mut trie = Trie::new();
    trie.learn(&["connect host=db1"]);

    // "connect host=db1!" has one extra trailing token beyond what was
    // learned; everything preceding it should still register as matched.
    let desc = trie.describe("connect host=db1!");
    let statuses: Vec<TokenStatus> = desc.iter().map(|d| d.status).collect();
    assert_eq!(*statuses.last().unwrap(), TokenStatus::Redundant);
    assert!(statuses[..statuses.len() - 1]
        .iter()
        .all(|s| *s == TokenStatus::Match));
}

#[test]
fn mismatched_head_token_is_reported_with_its_text() {
    let mut trie = Trie::new();
    trie.learn(&["connect host=db1"]);
    let desc = trie.describe("disconnect host=db1");
    assert_eq!(desc[0].status, TokenStatus::Mismatch);
    assert_eq!(desc[0].token, Some("disconnect"));
}

#[test]
fn description_tokens_reassemble_the_original_sample() {
    let mut trie = Trie::new();
    trie.learn(&["connect host=db1"]);
    let sample = "connect host=db1";
    let desc = trie.describe(sample);
    let reassembled: String = desc.iter().filter_map(|d| d.token).collect();
    assert_eq!(reassembled, sample);
}
