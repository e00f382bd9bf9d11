//! Criteria registry rules.
//!
//! Weights are intended percentages. Active weights should add up to
//! [`TARGET_WEIGHT_TOTAL`] for a weighted total to span the same range as a
//! single criterion score, but the registry does not refuse an unbalanced
//! set; it only reports it. A weight edit applies to future submissions only,
//! since each score stores the weight it was recorded with.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

pub const TARGET_WEIGHT_TOTAL: i64 = 100;

/// Body for creating a criterion.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCriterion {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(range(min = 0, max = 100, message = "weight must be between 0 and 100"))]
    pub weight: i32,
    pub description: Option<String>,
}

/// Body for a partial criterion update. A blank description clears it.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CriterionChanges {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(range(min = 0, max = 100, message = "weight must be between 0 and 100"))]
    pub weight: Option<i32>,
    pub description: Option<String>,
}

impl NewCriterion {
    /// Trim text fields and validate.
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        self.title = self.title.trim().to_string();
        self.description = normalize_optional_text(self.description);
        self.validate()?;
        Ok(self)
    }
}

impl CriterionChanges {
    pub fn normalized(mut self) -> Result<Self, CoreError> {
        self.title = self.title.map(|t| t.trim().to_string());
        self.validate()?;
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.weight.is_none() && self.description.is_none()
    }

    /// The description value to store: `None` leaves it untouched,
    /// `Some(None)` clears it.
    pub fn description_update(&self) -> Option<Option<String>> {
        self.description
            .as_ref()
            .map(|d| normalize_optional_text(Some(d.clone())))
    }
}

/// How the active weights compare to the intended total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeightBalance {
    pub total_active_weight: i64,
    pub weights_balanced: bool,
}

pub fn weight_balance(active_weights: impl IntoIterator<Item = i32>) -> WeightBalance {
    let total: i64 = active_weights.into_iter().map(i64::from).sum();
    WeightBalance {
        total_active_weight: total,
        weights_balanced: total == TARGET_WEIGHT_TOTAL,
    }
}

/// Trim an optional free-text field, mapping blank input to `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
