use engine::tokenizer::normalize;

#[test]
fn it_normalizes_and_stems() {
    let words = normalize("Running Runners RUN! The application's requirements.");
    assert!(words.contains(&"run".to_string()));
    assert!(words.contains(&"requir".to_string()));
    assert!(words.contains(&"applic".to_string()));
}

#[test]
fn it_filters_stopwords() {
    let words = normalize("The quick brown fox and the lazy dog");
    assert!(!words.contains(&"the".to_string()));
    assert!(!words.contains(&"and".to_string()));
    assert_eq!(words.len(), 5);
}

#[test]
fn it_is_deterministic_and_case_insensitive() {
    let text = "What are the ADMISSION Requirements?";
    assert_eq!(normalize(text), normalize(text));
    assert_eq!(normalize("Hello"), normalize("hello"));
}

#[test]
fn it_drops_non_ascii_letters_and_digits() {
    // anything outside a-z is removed, full-width and accented letters included
    assert!(normalize("ｈｏｓｔｅｌ").is_empty());
    assert_eq!(normalize("café"), vec!["caf".to_string()]);
    assert!(normalize("2024 100%").is_empty());
}

#[test]
fn stopword_only_text_is_empty() {
    assert!(normalize("the").is_empty());
    assert!(normalize("").is_empty());
}
