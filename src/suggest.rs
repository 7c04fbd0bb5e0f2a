//! Type-ahead suggestions drawn from the phrase board.

use crate::phrases::PhraseRecord;

/// Queries shorter than this (after normalization) hide the suggestion row.
pub const MIN_QUERY_CHARS: usize = 2;

/// Lowercase and trim the raw input.
pub fn normalize_query(input: &str) -> String {
    input.to_lowercase().trim().to_string()
}

/// Indices of phrases whose text contains the query, in stored order.
///
/// `None` means the query is too short and no suggestions should be shown.
pub fn filter_indices(phrases: &[PhraseRecord], input: &str) -> Option<Vec<usize>> {
    let query = normalize_query(input);
    if query.chars().count() < MIN_QUERY_CHARS {
        return None;
    }
    Some(
        phrases
            .iter()
            .enumerate()
            .filter(|(_, phrase)| phrase.text.to_lowercase().contains(&query))
            .map(|(idx, _)| idx)
            .collect(),
    )
}

/// Phrases matching the input, or `None` when the query is too short.
pub fn filter<'a>(phrases: &'a [PhraseRecord], input: &str) -> Option<Vec<&'a PhraseRecord>> {
    filter_indices(phrases, input).map(|indices| indices.into_iter().map(|i| &phrases[i]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrases::default_phrases;

    fn texts(matches: Option<Vec<&PhraseRecord>>) -> Option<Vec<&str>> {
        matches.map(|m| m.into_iter().map(|p| p.text.as_str()).collect())
    }

    #[test]
    fn short_queries_yield_no_suggestions() {
        let phrases = default_phrases();
        assert!(filter(&phrases, "").is_none());
        assert!(filter(&phrases, "t").is_none());
        assert!(filter(&phrases, "   t  ").is_none());
        assert!(filter(&phrases, "¿").is_none());
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let phrases = default_phrases();
        assert_eq!(
            texts(filter(&phrases, "AGU")),
            Some(vec!["Tengo sed, quiero agua"])
        );
        assert_eq!(
            texts(filter(&phrases, "  frÍo ")),
            Some(vec!["Tengo frío"])
        );
    }

    #[test]
    fn matches_keep_stored_order_not_rank() {
        let mut phrases = default_phrases();
        phrases[6].count = 9;
        assert_eq!(
            texts(filter(&phrases, "tengo")),
            Some(vec![
                "Tengo sed, quiero agua",
                "Tengo dolor, necesito medicina",
                "Tengo hambre",
                "Tengo frío",
                "Tengo calor",
            ])
        );
    }

    #[test]
    fn no_match_is_an_empty_list() {
        let phrases = default_phrases();
        assert_eq!(filter_indices(&phrases, "zzz"), Some(Vec::new()));
    }
}
