use std::collections::{BTreeMap, BTreeSet};
use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::problem::Category;
use crate::schema::{SchemaError, UniqueMap, unique_keys};

pub const MAX_POINTS: u32 = 100;
pub const PASSING_THRESHOLD: u32 = 70;
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Per-category sub-criteria and their point weights, consumed by an external grader.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoringCriteria(
    #[serde(deserialize_with = "unique_criteria")] BTreeMap<Category, BTreeMap<String, u32>>,
);

fn unique_criteria<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<Category, BTreeMap<String, u32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let UniqueMap(criteria) = UniqueMap::<Category, UniqueMap<String, u32>>::deserialize(deserializer)?;
    Ok(criteria
        .into_iter()
        .map(|(category, weights)| (category, weights.0))
        .collect())
}

impl ScoringCriteria {
    pub fn new(criteria: BTreeMap<Category, BTreeMap<String, u32>>) -> Self {
        Self(criteria)
    }

    pub fn get(&self, category: Category) -> Option<&BTreeMap<String, u32>> {
        self.0.get(&category)
    }

    pub fn categories(&self) -> BTreeSet<Category> {
        self.0.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &BTreeMap<String, u32>)> {
        self.0.iter().map(|(category, weights)| (*category, weights))
    }

    /// Sum of the sub-criterion weights of a category, 0 if it has none.
    pub fn total_for(&self, category: Category) -> u64 {
        self.get(category)
            .map(|weights| weights.values().copied().map(u64::from).sum())
            .unwrap_or(0)
    }

    pub(crate) fn check(&self) -> Result<(), SchemaError> {
        for (category, weights) in self.iter() {
            if weights.is_empty() {
                return Err(SchemaError::EmptyCriteria { category });
            }
            if let Some((criterion, _)) = weights.iter().find(|(_, weight)| **weight == 0) {
                return Err(SchemaError::NonPositiveCriterionWeight {
                    category,
                    criterion: criterion.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Index<Category> for ScoringCriteria {
    type Output = BTreeMap<String, u32>;

    fn index(&self, category: Category) -> &Self::Output {
        &self.0[&category]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallScore {
    pub max_points: u32,
    pub passing_threshold: u32,
}

impl Default for OverallScore {
    fn default() -> Self {
        Self {
            max_points: MAX_POINTS,
            passing_threshold: PASSING_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub overall_score: OverallScore,
    #[serde(deserialize_with = "unique_keys")]
    pub category_weights: BTreeMap<Category, f64>,
    /// Named skill tags; no numeric data is attached to them.
    pub skill_metrics: Vec<String>,
}

impl EvaluationMetrics {
    pub fn weight_for(&self, category: Category) -> Option<f64> {
        self.category_weights.get(&category).copied()
    }

    pub fn weight_sum(&self) -> f64 {
        self.category_weights.values().sum()
    }

    pub fn weighted_categories(&self) -> BTreeSet<Category> {
        self.category_weights.keys().copied().collect()
    }

    pub(crate) fn check(&self) -> Result<(), SchemaError> {
        if self.overall_score != OverallScore::default() {
            return Err(SchemaError::OverallScore {
                max_points: self.overall_score.max_points,
                passing_threshold: self.overall_score.passing_threshold,
            });
        }

        for (&category, &weight) in &self.category_weights {
            if !(weight > 0.0 && weight <= 1.0) {
                return Err(SchemaError::WeightOutOfRange { category, weight });
            }
        }

        let sum = self.weight_sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SchemaError::WeightSum { sum });
        }

        let mut seen = BTreeSet::new();
        for label in &self.skill_metrics {
            if label.trim().is_empty() || !seen.insert(label.as_str()) {
                return Err(SchemaError::InvalidSkillMetric(label.clone()));
            }
        }
        Ok(())
    }
}
