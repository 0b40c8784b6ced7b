use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use tracing::{debug, info};

use crate::data;
use crate::problem::{Category, Difficulty, Problem};
use crate::schema::{CatalogDocument, ProblemGroups, SchemaError};
use crate::scoring::{EvaluationMetrics, ScoringCriteria};

/// Read-only benchmark catalog. Every instance has passed schema validation;
/// accessors hand out shared borrows, so callers clone to get a copy they
/// can modify.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkCatalog {
    name: String,
    version: String,
    description: String,
    problems: ProblemGroups,
    scoring_criteria: ScoringCriteria,
    evaluation_metrics: EvaluationMetrics,
}

impl BenchmarkCatalog {
    /// The built-in MathReasoner v1 catalog.
    pub fn builtin() -> Result<Self, SchemaError> {
        Self::from_document(data::builtin_document())
    }

    pub fn from_document(document: CatalogDocument) -> Result<Self, SchemaError> {
        validate(&document)?;

        let catalog = Self {
            name: document.name,
            version: document.version,
            description: document.description,
            problems: document.problems,
            scoring_criteria: document.scoring_criteria,
            evaluation_metrics: document.evaluation_metrics,
        };
        debug!(
            catalog = %catalog.name,
            version = %catalog.version,
            problems = catalog.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json(json_str: &str) -> Result<Self, SchemaError> {
        Self::from_document(CatalogDocument::from_json(json_str)?)
    }

    pub fn load_from_file(file_path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let file_path = file_path.as_ref();
        let content = std::fs::read_to_string(file_path)
            .map_err(|e| SchemaError::FileError(format!("{}: {}", file_path.display(), e)))?;

        let catalog = Self::from_json(&content)?;
        info!(path = %file_path.display(), problems = catalog.len(), "loaded catalog document");
        Ok(catalog)
    }

    pub fn save_to_file(&self, file_path: impl AsRef<Path>) -> Result<(), SchemaError> {
        let file_path = file_path.as_ref();
        let json = self.to_document().to_json()?;

        std::fs::write(file_path, json)
            .map_err(|e| SchemaError::FileError(format!("{}: {}", file_path.display(), e)))?;
        info!(path = %file_path.display(), "saved catalog document");
        Ok(())
    }

    /// An owned copy in persisted form.
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            name: self.name.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            problems: self.problems.clone(),
            scoring_criteria: self.scoring_criteria.clone(),
            evaluation_metrics: self.evaluation_metrics.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn problems(&self) -> &ProblemGroups {
        &self.problems
    }

    pub fn scoring_criteria(&self) -> &ScoringCriteria {
        &self.scoring_criteria
    }

    pub fn evaluation_metrics(&self) -> &EvaluationMetrics {
        &self.evaluation_metrics
    }

    pub fn problems_in(&self, category: Category) -> &[Problem] {
        self.problems
            .get(category.group_key())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All problems, grouped in category order.
    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        Category::ALL
            .into_iter()
            .flat_map(move |category| self.problems_in(category).iter())
    }

    pub fn find(&self, id: &str) -> Option<&Problem> {
        self.iter().find(|p| p.id == id)
    }

    pub fn filter_by_difficulty(&self, difficulty: Difficulty) -> Vec<&Problem> {
        self.iter().filter(|p| p.difficulty == difficulty).collect()
    }

    pub fn len(&self) -> usize {
        self.problems.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn categories(&self) -> BTreeSet<Category> {
        self.problems
            .keys()
            .filter_map(|key| Category::from_group_key(key))
            .collect()
    }

    pub fn total_points(&self, category: Category) -> u64 {
        self.problems_in(category)
            .iter()
            .map(|p| u64::from(p.points))
            .sum()
    }

    pub fn max_points_total(&self) -> u64 {
        self.iter().map(|p| u64::from(p.points)).sum()
    }
}

/// Whole-catalog checks. `category_weights` must name all six categories, so a
/// valid catalog stores problems and scoring criteria for each of them too.
fn validate(document: &CatalogDocument) -> Result<(), SchemaError> {
    let mut seen_ids = HashSet::new();
    let mut categories = BTreeSet::new();

    for (group, problems) in &document.problems {
        let category = Category::from_group_key(group)
            .ok_or_else(|| SchemaError::UnknownGroup(group.clone()))?;
        categories.insert(category);

        for problem in problems {
            if problem.category() != category {
                return Err(SchemaError::CategoryMismatch {
                    id: problem.id.clone(),
                    group: group.clone(),
                    found: problem.category(),
                });
            }
            problem.check()?;
            if !seen_ids.insert(problem.id.as_str()) {
                return Err(SchemaError::DuplicateId(problem.id.clone()));
            }
        }
    }

    document.scoring_criteria.check()?;
    check_same_categories(
        "scoring_criteria",
        &categories,
        &document.scoring_criteria.categories(),
    )?;

    document.evaluation_metrics.check()?;
    let weighted = document.evaluation_metrics.weighted_categories();
    check_same_categories("category_weights", &Category::ALL.into_iter().collect(), &weighted)?;
    check_same_categories("category_weights", &categories, &weighted)
}

fn check_same_categories(
    section: &'static str,
    expected: &BTreeSet<Category>,
    actual: &BTreeSet<Category>,
) -> Result<(), SchemaError> {
    if expected == actual {
        return Ok(());
    }
    Err(SchemaError::CategoryKeyMismatch {
        section,
        missing: expected.difference(actual).copied().collect(),
        unexpected: actual.difference(expected).copied().collect(),
    })
}
