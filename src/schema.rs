use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::problem::{Category, Problem};
use crate::scoring::{EvaluationMetrics, ScoringCriteria};

/// Problems keyed by group key (`validation_problems`, `mistake_identification`, ...).
pub type ProblemGroups = BTreeMap<String, Vec<Problem>>;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid catalog document: {0}")]
    InvalidDocument(String),
    #[error("File error: {0}")]
    FileError(String),
    #[error("Duplicate problem id: {0}")]
    DuplicateId(String),
    #[error("Unknown problem group: {0}")]
    UnknownGroup(String),
    #[error("Problem {id} has category {found} but is stored under {group}")]
    CategoryMismatch {
        id: String,
        group: String,
        found: Category,
    },
    #[error("Problem {id} must award a positive number of points")]
    NonPositivePoints { id: String },
    #[error("Problem {id} is missing required field `{field}`")]
    MissingField { id: String, field: &'static str },
    #[error("Problem {id} has invalid `{field}`: {reason}")]
    InvalidField {
        id: String,
        field: &'static str,
        reason: String,
    },
    #[error("Categories in {section} do not match the problem catalog (missing: {missing:?}, unexpected: {unexpected:?})")]
    CategoryKeyMismatch {
        section: &'static str,
        missing: Vec<Category>,
        unexpected: Vec<Category>,
    },
    #[error("Category {category} has no scoring criteria")]
    EmptyCriteria { category: Category },
    #[error("Scoring criterion {category}.{criterion} must have a positive weight")]
    NonPositiveCriterionWeight { category: Category, criterion: String },
    #[error("Weight for category {category} must lie in (0, 1], got {weight}")]
    WeightOutOfRange { category: Category, weight: f64 },
    #[error("Category weights sum to {sum}, expected 1.0")]
    WeightSum { sum: f64 },
    #[error("Overall score must be 100 points with a passing threshold of 70, got {max_points}/{passing_threshold}")]
    OverallScore {
        max_points: u32,
        passing_threshold: u32,
    },
    #[error("Invalid skill metric label: {0:?}")]
    InvalidSkillMetric(String),
}

/// Persisted form of a catalog. Field names and nesting are the
/// compatibility contract for stored catalogs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "unique_keys")]
    pub problems: ProblemGroups,
    pub scoring_criteria: ScoringCriteria,
    pub evaluation_metrics: EvaluationMetrics,
}

impl CatalogDocument {
    pub fn from_json(json_str: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json_str).map_err(|e| SchemaError::InvalidDocument(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, SchemaError> {
        serde_json::to_string_pretty(self).map_err(|e| SchemaError::InvalidDocument(e.to_string()))
    }
}

/// A map whose decoding fails on a repeated key instead of keeping the last value.
pub(crate) struct UniqueMap<K, V>(pub BTreeMap<K, V>);

struct UniqueMapVisitor<K, V>(PhantomData<(K, V)>);

impl<'de, K, V> Visitor<'de> for UniqueMapVisitor<K, V>
where
    K: Deserialize<'de> + Ord + fmt::Debug,
    V: Deserialize<'de>,
{
    type Value = UniqueMap<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map without duplicate keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = BTreeMap::new();
        while let Some(key) = access.next_key::<K>()? {
            match map.entry(key) {
                Entry::Occupied(entry) => {
                    return Err(de::Error::custom(format!("duplicate key {:?}", entry.key())));
                }
                Entry::Vacant(entry) => {
                    entry.insert(access.next_value()?);
                }
            }
        }
        Ok(UniqueMap(map))
    }
}

impl<'de, K, V> Deserialize<'de> for UniqueMap<K, V>
where
    K: Deserialize<'de> + Ord + fmt::Debug,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(UniqueMapVisitor(PhantomData))
    }
}

pub(crate) fn unique_keys<'de, D, K, V>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
where
    D: Deserializer<'de>,
    K: Deserialize<'de> + Ord + fmt::Debug,
    V: Deserialize<'de>,
{
    UniqueMap::deserialize(deserializer).map(|m| m.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_DOC: &str = r#"{
        "name": "Empty",
        "version": "v0",
        "problems": {},
        "scoring_criteria": {},
        "evaluation_metrics": {
            "overall_score": {"max_points": 100, "passing_threshold": 70},
            "category_weights": {},
            "skill_metrics": []
        }
    }"#;

    #[test]
    fn test_description_defaults_to_empty() {
        let doc = CatalogDocument::from_json(EMPTY_DOC).unwrap();
        assert_eq!(doc.name, "Empty");
        assert!(doc.description.is_empty());
        assert!(doc.problems.is_empty());
    }

    #[test]
    fn test_malformed_json_is_invalid_document() {
        let err = CatalogDocument::from_json("{\"name\": ").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDocument(_)));
    }

    #[test]
    fn test_negative_points_fail_to_decode() {
        let json = EMPTY_DOC.replace(
            "\"problems\": {}",
            r#""problems": {"mistake_identification": [{
                "id": "M9", "category": "mistakes", "difficulty": "basic", "points": -2,
                "claim": "c", "invalid_proof": ["1. x"],
                "expected": {"error_type": "e", "specific_flaw": "f", "correction": "g"}
            }]}"#,
        );
        assert!(matches!(
            CatalogDocument::from_json(&json),
            Err(SchemaError::InvalidDocument(_))
        ));
    }

    #[test]
    fn test_repeated_group_key_rejected() {
        let json = EMPTY_DOC.replace(
            "\"problems\": {}",
            r#""problems": {"strategy_problems": [], "strategy_problems": []}"#,
        );
        let err = CatalogDocument::from_json(&json).unwrap_err();
        match err {
            SchemaError::InvalidDocument(msg) => assert!(msg.contains("duplicate key")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_to_json_round_trips() {
        let doc = CatalogDocument::from_json(EMPTY_DOC).unwrap();
        let again = CatalogDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(doc, again);
    }
}
