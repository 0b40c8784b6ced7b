//! MathReasoner - A static benchmark catalog for evaluating mathematical reasoning

pub mod catalog;
pub mod data;
pub mod problem;
pub mod schema;
pub mod scoring;

// Re-export commonly used types
pub use catalog::BenchmarkCatalog;
pub use problem::{Category, Difficulty, MISSING_STEP, Problem, ProblemKind};
pub use schema::{CatalogDocument, ProblemGroups, SchemaError};
pub use scoring::{EvaluationMetrics, OverallScore, ScoringCriteria};
