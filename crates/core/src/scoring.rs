//! Scoring scales and submission validation.
//!
//! Two scoring conventions exist in historical data. The service runs with
//! exactly one of them, chosen in configuration, and applies it everywhere a
//! total is produced: submission validation, the detail view and reporting.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Configuration value for [`ScoringScale::Weighted10`].
pub const SCALE_WEIGHTED_10: &str = "weighted_10";
/// Configuration value for [`ScoringScale::Flat20`].
pub const SCALE_FLAT_20: &str = "flat_20";

/// Number of active criteria the flat form requires, keeping its total within 0-100.
pub const FLAT_20_CRITERIA_COUNT: usize = 5;

/// How per-criterion scores combine into an assessment total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoringScale {
    /// Each criterion scored 0-10; total is `sum(score * weight / 100)`.
    #[default]
    #[serde(rename = "weighted_10")]
    Weighted10,
    /// A fixed form of [`FLAT_20_CRITERIA_COUNT`] criteria, each scored 0-20;
    /// total is the plain sum, 0-100.
    #[serde(rename = "flat_20")]
    Flat20,
}

/// One recorded score together with its criterion's weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEntry {
    pub score: f64,
    pub weight: i32,
}

/// A `(criterion_id, score)` pair as submitted by an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubmittedScore {
    pub criterion_id: DbId,
    pub score: f64,
}

/// The displayable outcome of aggregating one assessment's scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ScoreSummary {
    Recorded { total: f64, criteria_count: usize },
    NoScoresRecorded,
}

impl ScoreSummary {
    pub fn total(&self) -> Option<f64> {
        match self {
            ScoreSummary::Recorded { total, .. } => Some(*total),
            ScoreSummary::NoScoresRecorded => None,
        }
    }
}

impl ScoringScale {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoringScale::Weighted10 => SCALE_WEIGHTED_10,
            ScoringScale::Flat20 => SCALE_FLAT_20,
        }
    }

    /// Highest score a single criterion may receive.
    pub fn max_score(self) -> f64 {
        match self {
            ScoringScale::Weighted10 => 10.0,
            ScoringScale::Flat20 => 20.0,
        }
    }

    /// Combine score rows into a total.
    ///
    /// Returns `None` when there are no rows; an empty assessment has no
    /// total rather than a total of zero.
    pub fn total(self, entries: &[ScoreEntry]) -> Option<f64> {
        if entries.is_empty() {
            return None;
        }
        let total = match self {
            ScoringScale::Weighted10 => entries
                .iter()
                .map(|e| e.score * f64::from(e.weight) / 100.0)
                .sum(),
            ScoringScale::Flat20 => entries.iter().map(|e| e.score).sum(),
        };
        Some(total)
    }

    pub fn summarize(self, entries: &[ScoreEntry]) -> ScoreSummary {
        match self.total(entries) {
            Some(total) => ScoreSummary::Recorded {
                total,
                criteria_count: entries.len(),
            },
            None => ScoreSummary::NoScoresRecorded,
        }
    }

    /// Validate a single criterion score against this scale's range.
    pub fn validate_score(self, score: f64) -> Result<(), String> {
        let max = self.max_score();
        if !score.is_finite() || !(0.0..=max).contains(&score) {
            return Err(format!("Score {score} is outside the allowed range 0-{max}"));
        }
        Ok(())
    }

    /// Validate a full submission against the active criteria registry.
    ///
    /// Every active criterion must be scored exactly once; scores for unknown
    /// or inactive criteria and out-of-range values are rejected. The flat
    /// scale also requires exactly [`FLAT_20_CRITERIA_COUNT`] active criteria. On success
    /// the scores are returned in the order of `active_criteria`.
    pub fn validate_submission(
        self,
        active_criteria: &[DbId],
        submitted: &[SubmittedScore],
    ) -> Result<Vec<SubmittedScore>, CoreError> {
        if active_criteria.is_empty() {
            return Err(CoreError::Validation(
                "No active criteria are configured".into(),
            ));
        }
        if self == ScoringScale::Flat20 && active_criteria.len() != FLAT_20_CRITERIA_COUNT {
            return Err(CoreError::Validation(format!(
                "The {SCALE_FLAT_20} scale requires exactly {FLAT_20_CRITERIA_COUNT} active criteria, found {}",
                active_criteria.len()
            )));
        }

        let active: HashSet<DbId> = active_criteria.iter().copied().collect();
        let mut by_criterion: HashMap<DbId, f64> = HashMap::with_capacity(submitted.len());
        let mut duplicates = Vec::new();
        let mut unknown = Vec::new();

        for s in submitted {
            if !active.contains(&s.criterion_id) {
                unknown.push(s.criterion_id);
                continue;
            }
            self.validate_score(s.score).map_err(|msg| {
                CoreError::Validation(format!("Criterion {}: {msg}", s.criterion_id))
            })?;
            if by_criterion.insert(s.criterion_id, s.score).is_some() {
                duplicates.push(s.criterion_id);
            }
        }

        if !unknown.is_empty() {
            return Err(CoreError::Validation(format!(
                "Unknown or inactive criteria: {}",
                join_ids(&unknown)
            )));
        }
        if !duplicates.is_empty() {
            return Err(CoreError::Validation(format!(
                "Criteria scored more than once: {}",
                join_ids(&duplicates)
            )));
        }

        let missing: Vec<DbId> = active_criteria
            .iter()
            .copied()
            .filter(|id| !by_criterion.contains_key(id))
            .collect();
        if !missing.is_empty() {
            return Err(CoreError::Validation(format!(
                "Missing scores for criteria: {}",
                join_ids(&missing)
            )));
        }

        Ok(active_criteria
            .iter()
            .map(|&criterion_id| SubmittedScore {
                criterion_id,
                score: by_criterion[&criterion_id],
            })
            .collect())
    }
}

impl fmt::Display for ScoringScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            SCALE_WEIGHTED_10 => Ok(ScoringScale::Weighted10),
            SCALE_FLAT_20 => Ok(ScoringScale::Flat20),
            other => Err(format!(
                "Unknown scoring scale '{other}' (expected '{SCALE_WEIGHTED_10}' or '{SCALE_FLAT_20}')"
            )),
        }
    }
}

fn join_ids(ids: &[DbId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
