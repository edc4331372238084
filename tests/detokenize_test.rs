//! Integration tests for local detokenization

use blindfold::domain::TokenMapping;
use blindfold::{detokenize, Blindfold};
use std::collections::HashMap;
use test_case::test_case;

fn mapping(pairs: &[(&str, &str)]) -> TokenMapping {
    pairs
        .iter()
        .map(|(token, value)| (token.to_string(), value.to_string()))
        .collect()
}

#[test]
fn test_empty_mapping_leaves_text_unchanged() {
    let result = detokenize("Hello <Person_1>", &TokenMapping::new());
    assert_eq!(result.text, "Hello <Person_1>");
    assert_eq!(result.replacements_made, 0);
}

#[test]
fn test_longer_tokens_win() {
    let mapping = mapping(&[("<Person_1>", "Bob"), ("<Person_10>", "Charlie")]);
    let result = detokenize("<Person_1> and <Person_10> are friends", &mapping);

    assert_eq!(result.text, "Bob and Charlie are friends");
    assert_eq!(result.replacements_made, 2);
}

#[test]
fn test_repeated_token_counts_every_occurrence() {
    let mapping = mapping(&[("<Person_1>", "Alice")]);
    let result = detokenize("<Person_1> and <Person_1> went to the store", &mapping);

    assert_eq!(result.text, "Alice and Alice went to the store");
    assert_eq!(result.replacements_made, 2);
}

#[test_case("", &[("<Person_1>", "Alice")], "", 0 ; "empty text")]
#[test_case("no tokens here", &[("<Person_1>", "Alice")], "no tokens here", 0 ; "absent token")]
#[test_case("<Email_1>", &[("<Email_1>", "a@b.io"), ("<Person_1>", "Bob")], "a@b.io", 1 ; "partially used mapping")]
#[test_case("<Person_1><Person_1>", &[("<Person_1>", "A")], "AA", 2 ; "adjacent tokens")]
#[test_case("Grüße <Person_1> 👋", &[("<Person_1>", "Jürgen")], "Grüße Jürgen 👋", 1 ; "unicode")]
fn test_detokenize_cases(text: &str, pairs: &[(&str, &str)], expected: &str, count: usize) {
    let result = detokenize(text, &mapping(pairs));
    assert_eq!(result.text, expected);
    assert_eq!(result.replacements_made, count);
}

#[test]
fn test_works_with_hashmap_of_str() {
    let mut mapping = HashMap::new();
    mapping.insert("<Phone_1>", "555-1234");
    mapping.insert("<Phone_12>", "555-9999");

    let result = detokenize("Call <Phone_12> or <Phone_1>", &mapping);
    assert_eq!(result.text, "Call 555-9999 or 555-1234");
    assert_eq!(result.replacements_made, 2);
}

#[test]
fn test_client_detokenize_needs_no_network() {
    let config = blindfold::ClientConfig::builder("test-key")
        .base_url("http://127.0.0.1:1")
        .build()
        .unwrap();
    let client = Blindfold::with_config(config).unwrap();

    let mapping = mapping(&[("<Person_1>", "John Doe")]);
    let result = client.detokenize("Dear <Person_1>,", &mapping);
    assert_eq!(result.text, "Dear John Doe,");
    assert_eq!(result.replacements_made, 1);
}

#[test]
fn test_concurrent_detokenize() {
    let mapping = std::sync::Arc::new(mapping(&[("<Person_1>", "Alice"), ("<Person_2>", "Bob")]));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let mapping = mapping.clone();
            std::thread::spawn(move || detokenize("<Person_1> met <Person_2>", &*mapping))
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert_eq!(result.text, "Alice met Bob");
        assert_eq!(result.replacements_made, 2);
    }
}
