use tracetrie_core::{Trie, TrieConfig};

#[test]
fn three_request_ids_converge_into_a_number_holes_skeleton() {
    let mut trie = Trie::new();
    // No separator before the digits: each id is one mixed alpha+decimal
    // tokenizer run, which classifies as ALPHADEC (not pure DECIMAL or HEX)
    // and so falls to the number-holes skeleton path rather than a plain
    // class range.
    trie.learn(&["req0001", "req0002", "req0003"]);

    // Convergence should generalize over the numeric suffix and still
    // recognize a differently-shaped (but skeleton-compatible) id.
    assert!(trie.matches("req0099"));
    // A sample with a different literal prefix should still be rejected.
    assert!(!trie.matches("reqx0099"));
}

#[test]
fn below_threshold_runs_stay_as_distinct_literals() {
    let mut trie = Trie::new();
    trie.learn(&["code-1", "code-2"]);
    assert!(trie.matches("code-1"));
    assert!(trie.matches("code-2"));
    // Below the converge threshold, an unseen suffix must not be accepted.
    assert!(!trie.matches("code-3"));
}

#[test]
fn random_looking_tokens_converge_into_a_random_class() {
    let mut trie = Trie::new();
    // Enough distinct high-entropy hex-ish tokens to pass both the
    // convergence run-length threshold and the randomness heuristic.
    let ids = [
        "9f86d081884c7d659a2feaa0c55ad015",
        "a4e5f021b7c93d18e5d0c4f8a19b3267",
        "3b7c1f9a0de482561c9e4a7f803d6b51",
        "7d2e9c4a1f6b80357a0c3e8d951f4b26",
        "e1a4c7f92b3d60581f9c7a34e508b6d2",
        "0c8f3a7e1d4b925670bc1e459a3d8f26",
        "5a9d2f6c1e8b40733e1a9c7f502d8b64",
        "f4b1e7a3c9d062587d3a1f6c9e0b4528",
    ];
    let samples: Vec<String> = ids.iter().map(|id| format!("session {id} start")).collect();
    trie.learn(&samples);

    assert!(trie.matches("session 1234567890abcdef start"));
}

#[test]
fn converge_threshold_is_configurable() {
    let mut trie = Trie::with_config(TrieConfig {
        converge_threshold: 1,
        ..TrieConfig::default()
    });
    trie.learn(&["code-1", "code-2"]);
    assert!(trie.matches("code-3"));
}
