//! Toxicity categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six fixed toxicity categories.
///
/// The serialized form is the snake_case wire key used by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToxicityCategory {
    Toxic,
    SeverelyToxic,
    Obscene,
    Threat,
    Insult,
    IdentityHate,
}

impl ToxicityCategory {
    /// All categories, in canonical order
    pub const ALL: [ToxicityCategory; 6] = [
        Self::Toxic,
        Self::SeverelyToxic,
        Self::Obscene,
        Self::Threat,
        Self::Insult,
        Self::IdentityHate,
    ];

    /// Wire key used in backend payloads
    pub fn key(&self) -> &'static str {
        match self {
            Self::Toxic => "toxic",
            Self::SeverelyToxic => "severely_toxic",
            Self::Obscene => "obscene",
            Self::Threat => "threat",
            Self::Insult => "insult",
            Self::IdentityHate => "identity_hate",
        }
    }

    /// Human-readable label shown to users
    pub fn label(&self) -> &'static str {
        match self {
            Self::Toxic => "Toxic",
            Self::SeverelyToxic => "Severely Toxic",
            Self::Obscene => "Obscene",
            Self::Threat => "Threatening",
            Self::Insult => "Insult",
            Self::IdentityHate => "Identity Hate",
        }
    }

    /// Look up a category by its exact wire key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ToxicityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for category in ToxicityCategory::ALL {
            assert_eq!(ToxicityCategory::from_key(category.key()), Some(category));
        }
        assert_eq!(ToxicityCategory::from_key("sentence"), None);
        assert_eq!(ToxicityCategory::from_key("Toxic"), None);
    }

    #[test]
    fn test_serde_matches_wire_keys() {
        for category in ToxicityCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(ToxicityCategory::SeverelyToxic.label(), "Severely Toxic");
        assert_eq!(ToxicityCategory::Threat.to_string(), "Threatening");
        assert_eq!(ToxicityCategory::IdentityHate.label(), "Identity Hate");
    }

    #[test]
    fn test_index_matches_canonical_order() {
        for (i, category) in ToxicityCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }
}
