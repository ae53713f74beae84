use tracetrie_core::Trie;

#[test]
fn matches_exact_literal_lines() {
    let mut trie = Trie::new();
    trie.learn(&[
        "2024-01-01 server started",
        "2024-01-01 server stopped",
    ]);
    assert!(trie.matches("2024-01-01 server started"));
    assert!(trie.matches("2024-01-01 server stopped"));
    assert!(!trie.matches("2024-01-01 server crashed"));
}

#[test]
fn generalizes_over_varying_decimal_field() {
    let mut trie = Trie::new();
    let samples: Vec<String> = (100..130).map(|n| format!("req-{n} ok")).collect();
    trie.learn(&samples);

    // unseen three-digit id of the same shape
    assert!(trie.matches("req-199 ok"));
    // wrong shape: trailing word differs
    assert!(!trie.matches("req-199 fail"));
}

#[test]
fn diverging_branches_stay_independent() {
    let mut trie = Trie::new();
    trie.learn(&["GET /users", "POST /users", "DELETE /users"]);
    assert!(trie.matches("GET /users"));
    assert!(trie.matches("POST /users"));
    assert!(trie.matches("DELETE /users"));
    assert!(!trie.matches("PATCH /users"));
}

#[test]
fn empty_trie_only_matches_empty_input() {
    let trie = Trie::new();
    assert!(trie.matches(""));
    assert!(!trie.matches("anything"));
}

#[test]
#[should_panic]
fn learning_an_empty_sample_panics() {
    let mut trie = Trie::new();
    trie.learn(&["ok", ""]);
}
