//! Client-side detokenization
//!
//! Restores the original values in a tokenized text using the mapping returned
//! by a tokenize call. Runs entirely locally: no API key, no network, no I/O.
//!
//! Tokens are substituted longest first so that a token which is a literal
//! prefix of another (`<Person_1>` and `<Person_10>`) can never split the longer
//! one. Equal-length tokens keep the mapping's enumeration order.

use crate::domain::DetokenizeResult;
use std::cmp::Reverse;

/// Replaces every mapped token in `text` with its original value
///
/// Matching is literal substring matching; tokens are never interpreted as
/// patterns. Empty tokens are skipped.
///
/// # Example
///
/// ```
/// use blindfold::core::detokenize::detokenize;
/// use std::collections::BTreeMap;
///
/// let mapping = BTreeMap::from([
///     ("<Person_1>".to_string(), "Bob".to_string()),
///     ("<Person_10>".to_string(), "Charlie".to_string()),
/// ]);
///
/// let result = detokenize("<Person_1> and <Person_10> are friends", &mapping);
/// assert_eq!(result.text, "Bob and Charlie are friends");
/// assert_eq!(result.replacements_made, 2);
/// ```
pub fn detokenize<'a, M, K, V>(text: &str, mapping: M) -> DetokenizeResult
where
    M: IntoIterator<Item = (&'a K, &'a V)>,
    K: AsRef<str> + ?Sized + 'a,
    V: AsRef<str> + ?Sized + 'a,
{
    let mut tokens: Vec<(&str, &str)> = mapping
        .into_iter()
        .map(|(token, value)| (token.as_ref(), value.as_ref()))
        .filter(|(token, _)| !token.is_empty())
        .collect();

    // Stable: equal lengths stay in enumeration order
    tokens.sort_by_key(|(token, _)| Reverse(token.chars().count()));

    let mut result = text.to_owned();
    let mut replacements_made = 0;

    for (token, value) in tokens {
        let count = result.matches(token).count();
        if count > 0 {
            result = result.replace(token, value);
            replacements_made += count;
        }
    }

    tracing::trace!(replacements_made, "Detokenized text");

    DetokenizeResult {
        text: result,
        replacements_made,
    }
}
