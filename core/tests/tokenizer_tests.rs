use cranfield_core::tokenizer::analyze;

#[test]
fn it_normalizes_and_lowercases() {
    let words = analyze("Supersonic FLOW over a ｗｉｎｇ");
    assert_eq!(words, vec!["supersonic", "flow", "over", "wing"]);
}

#[test]
fn it_filters_stopwords() {
    let words = analyze("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert!(words.contains(&"quick".to_string()));
}

#[test]
fn it_does_not_stem() {
    let words = analyze("Running runners run");
    assert_eq!(words, vec!["running", "runners", "run"]);
}
