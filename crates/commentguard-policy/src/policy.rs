//! Moderation policy definitions

use commentguard_core::{Error, ModerationVerdict, Result, ToxicityCategory, ToxicityScores};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::engine::{decide, Threshold};

/// Thresholds applied to a set of scores
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModerationPolicy {
    /// Threshold for every category without an override
    #[serde(default)]
    pub threshold: Threshold,

    /// Per-category thresholds
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: BTreeMap<ToxicityCategory, Threshold>,
}

impl ModerationPolicy {
    /// A policy with one threshold and no overrides
    pub fn uniform(threshold: Threshold) -> Self {
        Self {
            threshold,
            overrides: BTreeMap::new(),
        }
    }

    /// Set a per-category threshold
    pub fn with_override(mut self, category: ToxicityCategory, threshold: Threshold) -> Self {
        self.overrides.insert(category, threshold);
        self
    }

    /// Load a policy from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(format!("invalid policy: {}", e)))
    }

    /// Threshold in force for one category
    pub fn threshold_for(&self, category: ToxicityCategory) -> Threshold {
        self.overrides
            .get(&category)
            .copied()
            .unwrap_or(self.threshold)
    }

    /// Decide whether scores pass this policy
    pub fn evaluate(&self, scores: &ToxicityScores) -> ModerationVerdict {
        if self.overrides.is_empty() {
            return decide(scores, self.threshold);
        }

        let triggering: BTreeSet<_> = scores
            .iter()
            .filter(|(category, score)| self.threshold_for(*category).is_exceeded_by(*score))
            .map(|(category, _)| category)
            .collect();

        debug!(
            triggered = triggering.len(),
            overrides = self.overrides.len(),
            "Evaluated policy with overrides"
        );

        ModerationVerdict::from_triggers(triggering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: [f64; 6]) -> ToxicityScores {
        ToxicityScores::new(ToxicityCategory::ALL.into_iter().zip(values)).unwrap()
    }

    #[test]
    fn test_policy_deserialization() {
        let yaml = r#"
threshold: 0.6
overrides:
  threat: 0.3
  obscene: 0.9
"#;

        let policy = ModerationPolicy::from_yaml(yaml).unwrap();
        assert_eq!(policy.threshold.value(), 0.6);
        assert_eq!(policy.threshold_for(ToxicityCategory::Threat).value(), 0.3);
        assert_eq!(policy.threshold_for(ToxicityCategory::Obscene).value(), 0.9);
        assert_eq!(policy.threshold_for(ToxicityCategory::Insult).value(), 0.6);
    }

    #[test]
    fn test_empty_policy_uses_default() {
        let policy = ModerationPolicy::from_yaml("{}").unwrap();
        assert_eq!(policy, ModerationPolicy::default());
        assert_eq!(policy.threshold.value(), 0.7);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        assert!(ModerationPolicy::from_yaml("threshold: 1.5").is_err());
        assert!(ModerationPolicy::from_yaml("overrides:\n  threat: -1").is_err());
    }

    #[test]
    fn test_rejects_unknown_category() {
        assert!(ModerationPolicy::from_yaml("overrides:\n  spam: 0.5").is_err());
    }

    #[test]
    fn test_override_triggers_below_default() {
        let policy = ModerationPolicy::uniform(Threshold::default())
            .with_override(ToxicityCategory::Threat, Threshold::new(0.3).unwrap());

        let verdict = policy.evaluate(&scores([0.1, 0.1, 0.1, 0.4, 0.1, 0.1]));
        assert!(!verdict.allowed);
        assert_eq!(verdict.reasons(), vec!["Threatening"]);
    }

    #[test]
    fn test_override_can_relax() {
        let policy = ModerationPolicy::uniform(Threshold::default())
            .with_override(ToxicityCategory::Obscene, Threshold::new(0.95).unwrap());

        let verdict = policy.evaluate(&scores([0.1, 0.1, 0.9, 0.1, 0.1, 0.1]));
        assert!(verdict.allowed);
    }

    #[test]
    fn test_uniform_matches_decide() {
        let s = scores([0.2, 0.1, 0.05, 0.85, 0.1, 0.0]);
        let policy = ModerationPolicy::uniform(Threshold::new(0.7).unwrap());
        assert_eq!(policy.evaluate(&s), decide(&s, Threshold::new(0.7).unwrap()));
    }
}
