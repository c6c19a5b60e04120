// ─────────────────────────────────────────────────────────────────────
// CAR Reasoning Kernel — Lexical Matching Helpers
// ─────────────────────────────────────────────────────────────────────
//! Deterministic token and phrase matching shared by the rule-based
//! recognizers, scorers and tension detector.
//!
//! Matching is stem-prefix based: the stem `deceiv` matches `deceive`,
//! `deceived` and `deceiving`. A phrase is a whitespace-separated list of
//! stems that must appear in order with at most `max_gap` unrelated tokens
//! between consecutive stems.
//!
//! A stem ending in `$` is anchored: `ban$` matches the word `ban` only,
//! never `bandage`. Short stems that prefix unrelated words are written
//! as anchored inflection lists.

/// Lowercase alphanumeric tokens. Apostrophes are dropped so that
/// `don't` becomes `dont` and `family's` becomes `familys`.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace(['\'', '\u{2019}'], "")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[inline]
fn stem_matches(token: &str, stem: &str) -> bool {
    match stem.strip_suffix('$') {
        Some(word) => token == word,
        None => token.starts_with(stem),
    }
}

/// True if any token matches `stem`.
pub fn has_stem(tokens: &[String], stem: &str) -> bool {
    tokens.iter().any(|t| stem_matches(t, stem))
}

/// True if any of `stems` occurs in `tokens`.
pub fn has_any_stem(tokens: &[String], stems: &[&str]) -> bool {
    stems.iter().any(|s| has_stem(tokens, s))
}

/// True if the stems of `phrase` occur in order, each within `max_gap`
/// tokens of the previous one.
pub fn phrase_matches(tokens: &[String], phrase: &str, max_gap: usize) -> bool {
    let stems: Vec<&str> = phrase.split_whitespace().collect();
    match stems.split_first() {
        None => false,
        Some((first, rest)) => tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| stem_matches(t, first))
            .any(|(i, _)| match_from(tokens, i + 1, rest, max_gap)),
    }
}

fn match_from(tokens: &[String], start: usize, stems: &[&str], max_gap: usize) -> bool {
    let Some((first, rest)) = stems.split_first() else {
        return true;
    };
    let end = (start + max_gap + 1).min(tokens.len());
    (start..end).any(|j| stem_matches(&tokens[j], first) && match_from(tokens, j + 1, rest, max_gap))
}

/// True if any phrase in `phrases` matches.
pub fn any_phrase(tokens: &[String], phrases: &[&str], max_gap: usize) -> bool {
    phrases.iter().any(|p| phrase_matches(tokens, p, max_gap))
}
