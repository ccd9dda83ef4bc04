//! Validated toxicity scores
//!
//! Validation policy:
//! - all six category keys must be present; a missing key is rejected, never
//!   defaulted to zero
//! - every value must be a finite JSON number in `[0.0, 1.0]`; out-of-range
//!   values are rejected, never clamped
//! - keys outside the category set (e.g. a `sentence` commentary field) are
//!   dropped
//!
//! All offending keys are reported together in a single `Error::Validation`.

use crate::category::ToxicityCategory;
use crate::error::{Error, IssueKind, Result, ValidationIssue};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

/// Score in `[0.0, 1.0]` for each of the six categories
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToxicityScores {
    values: [f64; 6],
}

impl ToxicityScores {
    /// Build scores from explicit category/value pairs.
    ///
    /// Applies the same policy as [`ToxicityScores::validate`].
    pub fn new(pairs: impl IntoIterator<Item = (ToxicityCategory, f64)>) -> Result<Self> {
        let mut slots: [Option<f64>; 6] = [None; 6];
        for (category, value) in pairs {
            slots[category.index()] = Some(value);
        }

        let mut issues = Vec::new();
        let mut values = [0.0; 6];
        for category in ToxicityCategory::ALL {
            match slots[category.index()] {
                None => issues.push(ValidationIssue::new(category.key(), IssueKind::Missing)),
                Some(v) => match check_range(v) {
                    Ok(v) => values[category.index()] = v,
                    Err(kind) => issues.push(ValidationIssue::new(category.key(), kind)),
                },
            }
        }

        if issues.is_empty() {
            Ok(Self { values })
        } else {
            Err(Error::Validation(issues))
        }
    }

    /// Validate a decoded backend object into scores
    pub fn validate(object: &Map<String, Value>) -> Result<Self> {
        for key in object.keys() {
            if ToxicityCategory::from_key(key).is_none() {
                debug!(key = %key, "Dropping unrecognized score key");
            }
        }

        let mut issues = Vec::new();
        let mut values = [0.0; 6];
        for category in ToxicityCategory::ALL {
            let kind = match object.get(category.key()) {
                None => Some(IssueKind::Missing),
                Some(Value::Number(n)) => match n.as_f64() {
                    Some(v) => match check_range(v) {
                        Ok(v) => {
                            values[category.index()] = v;
                            None
                        }
                        Err(kind) => Some(kind),
                    },
                    None => Some(IssueKind::NotFinite),
                },
                Some(_) => Some(IssueKind::NotNumeric),
            };

            if let Some(kind) = kind {
                issues.push(ValidationIssue::new(category.key(), kind));
            }
        }

        if issues.is_empty() {
            Ok(Self { values })
        } else {
            Err(Error::Validation(issues))
        }
    }

    /// Score for one category
    pub fn get(&self, category: ToxicityCategory) -> f64 {
        self.values[category.index()]
    }

    /// Iterate over all categories in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (ToxicityCategory, f64)> + '_ {
        ToxicityCategory::ALL
            .into_iter()
            .map(move |c| (c, self.values[c.index()]))
    }

    /// Highest-scoring category; ties go to the earlier category
    pub fn highest(&self) -> (ToxicityCategory, f64) {
        self.iter()
            .fold((ToxicityCategory::Toxic, f64::MIN), |best, current| {
                if current.1 > best.1 {
                    current
                } else {
                    best
                }
            })
    }
}

fn check_range(value: f64) -> std::result::Result<f64, IssueKind> {
    if !value.is_finite() {
        Err(IssueKind::NotFinite)
    } else if !(0.0..=1.0).contains(&value) {
        Err(IssueKind::OutOfRange(value))
    } else {
        Ok(value)
    }
}

impl Serialize for ToxicityScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(6))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category.key(), &value)?;
        }
        map.end()
    }
}
