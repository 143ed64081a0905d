use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","an","and","are","as","at","be","but","by","for","if","in","into","is","it",
            "no","not","of","on","or","such","that","the","their","then","there","these",
            "they","this","to","was","will","with",
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool { STOPWORDS.contains(token) }

/// Analyze text into index terms: NFKC normalization, lowercase, split on anything that is
/// not a letter or digit, stopword removal. Indexing and querying must both go through here.
pub fn analyze(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    RE.find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|token| !is_stopword(token))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_analyze() {
        let t = analyze("Cats are small mammals.");
        assert_eq!(t, vec!["cats", "small", "mammals"]);
    }

    #[test]
    fn splits_on_punctuation_and_keeps_digits() {
        let t = analyze("boundary-layer flow at mach 2.5");
        assert_eq!(t, vec!["boundary", "layer", "flow", "mach", "2", "5"]);
    }

    #[test]
    fn restartable() {
        let text = "The wing and the body";
        assert_eq!(analyze(text), analyze(text));
    }
}
