//! Threshold decision engine

use commentguard_core::{Error, ModerationVerdict, Result, ToxicityScores};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Threshold enforced when none is configured.
///
/// User-facing help text has historically said "50%"; the enforced value is 0.7.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Score above which a category triggers, always in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::config(format!(
                "threshold must be within [0, 1], got {}",
                value
            )))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Whether a score strictly exceeds this threshold
    pub fn is_exceeded_by(&self, score: f64) -> bool {
        score > self.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

/// Apply one threshold uniformly to every category.
///
/// `allowed` is false iff at least one score is strictly greater than the
/// threshold, and every such category is reported.
pub fn decide(scores: &ToxicityScores, threshold: Threshold) -> ModerationVerdict {
    let triggering: BTreeSet<_> = scores
        .iter()
        .filter(|(_, score)| threshold.is_exceeded_by(*score))
        .map(|(category, _)| category)
        .collect();

    ModerationVerdict::from_triggers(triggering)
}

#[cfg(test)]
mod tests {
    use super::*;
    use commentguard_core::ToxicityCategory;
    use proptest::prelude::*;

    fn scores(values: [f64; 6]) -> ToxicityScores {
        ToxicityScores::new(ToxicityCategory::ALL.into_iter().zip(values)).unwrap()
    }

    #[test]
    fn test_all_low_allowed() {
        let verdict = decide(&scores([0.1, 0.05, 0.0, 0.1, 0.02, 0.0]), Threshold::default());
        assert!(verdict.allowed);
        assert!(verdict.triggering_categories.is_empty());
    }

    #[test]
    fn test_threat_blocks() {
        let verdict = decide(
            &scores([0.2, 0.1, 0.05, 0.85, 0.1, 0.0]),
            Threshold::new(0.7).unwrap(),
        );
        assert!(!verdict.allowed);
        assert_eq!(
            verdict.triggering_categories,
            [ToxicityCategory::Threat].into_iter().collect()
        );
    }

    #[test]
    fn test_reports_every_trigger() {
        let verdict = decide(
            &scores([0.9, 0.8, 0.1, 0.1, 0.75, 0.0]),
            Threshold::default(),
        );
        assert!(!verdict.allowed);
        assert_eq!(verdict.reasons(), vec!["Toxic", "Severely Toxic", "Insult"]);
    }

    #[test]
    fn test_equal_to_threshold_does_not_trigger() {
        let verdict = decide(&scores([0.7; 6]), Threshold::new(0.7).unwrap());
        assert!(verdict.allowed);
    }

    #[test]
    fn test_threshold_bounds() {
        assert!(Threshold::new(0.0).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert!(Threshold::new(1.01).is_err());
        assert!(Threshold::new(-0.1).is_err());
        assert!(Threshold::new(f64::NAN).is_err());
    }

    #[test]
    fn test_threshold_one_never_triggers() {
        let verdict = decide(&scores([1.0; 6]), Threshold::new(1.0).unwrap());
        assert!(verdict.allowed);
    }

    proptest! {
        #[test]
        fn prop_blocked_iff_some_score_exceeds(
            values in prop::array::uniform6(0.0f64..=1.0),
            t in 0.0f64..=1.0,
        ) {
            let threshold = Threshold::new(t).unwrap();
            let verdict = decide(&scores(values), threshold);

            let expected: BTreeSet<_> = ToxicityCategory::ALL
                .into_iter()
                .zip(values)
                .filter(|(_, v)| *v > t)
                .map(|(c, _)| c)
                .collect();

            prop_assert_eq!(verdict.allowed, expected.is_empty());
            prop_assert_eq!(verdict.triggering_categories, expected);
        }
    }
}
