//! Offline lexicon backend
//!
//! Scores comments locally with per-category word lists. Useful when no
//! remote scorer is configured; answers in the classification payload shape
//! so it goes through the same parse/validate/decide path.
//!
//! Phrases match whole words only, case-insensitively, preferring the longest
//! phrase at a position ("kill yourself" over "kill you"). A single hit scores
//! above the default threshold; each further hit in the same category adds a
//! little more, up to a cap.

use aho_corasick::{AhoCorasick, MatchKind};
use async_trait::async_trait;
use commentguard_core::{CommentText, Error, Result, ToxicityCategory};
use serde_json::{Map, Value};
use tracing::debug;

use crate::backend::{BackendKind, ModerationBackend, RawResponse};

const FIRST_MATCH_SCORE: f64 = 0.8;
const SCORE_PER_EXTRA_MATCH: f64 = 0.05;
const MAX_SCORE: f64 = 0.95;

fn default_lexicon() -> Vec<(ToxicityCategory, &'static str)> {
    use ToxicityCategory::*;

    let mut entries = Vec::new();
    for word in ["stupid", "idiot", "dumb", "garbage", "trash", "sucks", "awful", "flag", "flagged"] {
        entries.push((Toxic, word));
    }
    for word in ["kill yourself", "go die", "worthless piece"] {
        entries.push((SeverelyToxic, word));
    }
    for word in ["shit", "fuck", "damn", "asshole", "bastard", "bitch"] {
        entries.push((Obscene, word));
    }
    for word in ["kill you", "hurt you", "i will find you", "you will regret", "watch your back"] {
        entries.push((Threat, word));
    }
    for word in ["loser", "moron", "pathetic", "ugly", "clown"] {
        entries.push((Insult, word));
    }
    for word in ["go back to your country", "your kind", "you people"] {
        entries.push((IdentityHate, word));
    }
    entries
}

/// Word-list scorer that needs no network
pub struct LexiconBackend {
    matcher: AhoCorasick,
    pattern_categories: Vec<ToxicityCategory>,
}

impl LexiconBackend {
    /// Create a backend with the built-in word lists
    pub fn new() -> Result<Self> {
        Self::with_entries(default_lexicon())
    }

    /// Create a backend from category/phrase pairs
    pub fn with_entries<S: AsRef<str>>(
        entries: impl IntoIterator<Item = (ToxicityCategory, S)>,
    ) -> Result<Self> {
        let (categories, phrases): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .map(|(c, p)| (c, p.as_ref().to_string()))
            .unzip();

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&phrases)
            .map_err(|e| Error::config(format!("Failed to build lexicon matcher: {}", e)))?;

        Ok(Self {
            matcher,
            pattern_categories: categories,
        })
    }

    /// Score text into a classification-shaped object
    pub fn score(&self, text: &str) -> Map<String, Value> {
        let mut counts = [0usize; 6];
        for m in self.matcher.find_iter(text) {
            if !is_whole_word(text, m.start(), m.end()) {
                continue;
            }
            let category = self.pattern_categories[m.pattern().as_usize()];
            if let Some(slot) = ToxicityCategory::ALL.iter().position(|c| *c == category) {
                counts[slot] += 1;
            }
        }

        ToxicityCategory::ALL
            .iter()
            .zip(counts)
            .map(|(category, count)| {
                let score = match count {
                    0 => 0.0,
                    n => (FIRST_MATCH_SCORE + (n - 1) as f64 * SCORE_PER_EXTRA_MATCH).min(MAX_SCORE),
                };
                let score = (score * 100.0).round() / 100.0;
                (category.key().to_string(), Value::from(score))
            })
            .collect()
    }
}

/// Whether `text[start..end]` is bounded by non-alphanumeric characters
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

impl Default for LexiconBackend {
    fn default() -> Self {
        Self::new().expect("Failed to create lexicon backend")
    }
}

#[async_trait]
impl ModerationBackend for LexiconBackend {
    async fn fetch(&self, comment: &CommentText) -> Result<RawResponse> {
        let scores = self.score(comment.as_str());
        debug!(chars = comment.char_count(), "Scored comment with lexicon");
        Ok(RawResponse::classification(Value::Object(scores)))
    }

    fn name(&self) -> &str {
        "lexicon"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commentguard_core::ToxicityScores;

    #[test]
    fn test_clean_text_scores_zero() {
        let backend = LexiconBackend::new().unwrap();
        let scores = ToxicityScores::validate(&backend.score("hello there")).unwrap();
        assert!(scores.iter().all(|(_, v)| v == 0.0));
    }

    #[test]
    fn test_threat_phrase() {
        let backend = LexiconBackend::new().unwrap();
        let scores = ToxicityScores::validate(&backend.score("I will HURT YOU")).unwrap();
        assert_eq!(scores.get(ToxicityCategory::Threat), 0.8);
        assert_eq!(scores.get(ToxicityCategory::Insult), 0.0);
    }

    #[test]
    fn test_single_hit_exceeds_default_threshold() {
        let backend = LexiconBackend::new().unwrap();
        let scores = ToxicityScores::validate(&backend.score("please flag this")).unwrap();
        assert!(scores.get(ToxicityCategory::Toxic) > 0.7);
    }

    #[test]
    fn test_longest_phrase_wins() {
        let backend = LexiconBackend::new().unwrap();
        let scores = ToxicityScores::validate(&backend.score("just kill yourself")).unwrap();
        assert!(scores.get(ToxicityCategory::SeverelyToxic) > 0.0);
        assert_eq!(scores.get(ToxicityCategory::Threat), 0.0);

        let scores = ToxicityScores::validate(&backend.score("I will kill you")).unwrap();
        assert!(scores.get(ToxicityCategory::Threat) > 0.0);
        assert_eq!(scores.get(ToxicityCategory::SeverelyToxic), 0.0);
    }

    #[test]
    fn test_matches_whole_words_only() {
        let backend = LexiconBackend::new().unwrap();
        for text in ["the new flagship phone", "bought a dumbbell", "Amsterdamned trip", "classy"] {
            let scores = ToxicityScores::validate(&backend.score(text)).unwrap();
            assert!(scores.iter().all(|(_, v)| v == 0.0), "{} scored {:?}", text, scores);
        }

        let scores = ToxicityScores::validate(&backend.score("(dumb!)")).unwrap();
        assert_eq!(scores.get(ToxicityCategory::Toxic), 0.8);
    }

    #[test]
    fn test_score_is_capped() {
        let backend = LexiconBackend::with_entries([(ToxicityCategory::Insult, "clown")]).unwrap();
        let scores =
            ToxicityScores::validate(&backend.score("clown clown clown clown clown")).unwrap();
        assert_eq!(scores.get(ToxicityCategory::Insult), 0.95);
    }

    #[tokio::test]
    async fn test_fetch_returns_classification_shape() {
        let backend = LexiconBackend::new().unwrap();
        let comment = CommentText::new("you stupid idiot").unwrap();
        let raw = backend.fetch(&comment).await.unwrap();

        assert_eq!(raw.kind, BackendKind::Classification);
        assert_eq!(raw.body["toxic"], Value::from(0.85));
        assert_eq!(raw.body.as_object().map(|m| m.len()), Some(6));
    }
}
