use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::SchemaError;

/// Placeholder that marks the step a completion problem asks for.
pub const MISSING_STEP: &str = "[MISSING STEP]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Validation,
    Completion,
    Strategy,
    Transfer,
    LogicalChain,
    Mistakes,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Validation,
        Category::Completion,
        Category::Strategy,
        Category::Transfer,
        Category::LogicalChain,
        Category::Mistakes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Completion => "completion",
            Self::Strategy => "strategy",
            Self::Transfer => "transfer",
            Self::LogicalChain => "logical_chain",
            Self::Mistakes => "mistakes",
        }
    }

    /// Key under which this category's problems are stored in a catalog document.
    pub fn group_key(self) -> &'static str {
        match self {
            Self::Validation => "validation_problems",
            Self::Completion => "completion_problems",
            Self::Strategy => "strategy_problems",
            Self::Transfer => "transfer_problems",
            Self::LogicalChain => "logical_chain_problems",
            Self::Mistakes => "mistake_identification",
        }
    }

    pub fn from_group_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.group_key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// Informational ordinal; it never affects points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Basic,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "expert" => Ok(Self::Expert),
            other => Err(format!("unknown difficulty: {}", other)),
        }
    }
}

/// One benchmark item. The `category` tag and its category-specific fields
/// live in [`ProblemKind`] and are flattened into the same JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub difficulty: Difficulty,
    pub points: u32,
    #[serde(flatten)]
    pub kind: ProblemKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ProblemKind {
    Validation(ValidationProblem),
    Completion(CompletionProblem),
    Strategy(StrategyProblem),
    Transfer(TransferProblem),
    LogicalChain(LogicalChainProblem),
    Mistakes(MistakeProblem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationProblem {
    pub theorem: String,
    pub proof: Vec<String>,
    pub expected: ValidationExpected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationExpected {
    pub valid: bool,
    /// 1-based step number of the first wrong step; only set for invalid proofs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_step: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionProblem {
    pub theorem: String,
    pub partial_proof: Vec<String>,
    pub expected: CompletionExpected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionExpected {
    pub key_step: String,
    pub reasoning: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyProblem {
    pub theorem: String,
    pub task: String,
    pub context: String,
    pub expected: StrategyExpected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyExpected {
    pub strategy: String,
    pub justification: String,
    pub key_insights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferProblem {
    pub source_theorem: String,
    pub target_theorem: String,
    pub task: String,
    pub expected: TransferExpected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferExpected {
    pub technique: String,
    pub key_transfer: String,
    pub insight: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalChainProblem {
    pub premise: String,
    pub conclusion: String,
    pub task: String,
    pub expected: LogicalChainExpected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalChainExpected {
    pub key_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MistakeProblem {
    pub claim: String,
    pub invalid_proof: Vec<String>,
    pub expected: MistakeExpected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MistakeExpected {
    pub error_type: String,
    pub specific_flaw: String,
    pub correction: String,
}

impl ProblemKind {
    pub fn category(&self) -> Category {
        match self {
            Self::Validation(_) => Category::Validation,
            Self::Completion(_) => Category::Completion,
            Self::Strategy(_) => Category::Strategy,
            Self::Transfer(_) => Category::Transfer,
            Self::LogicalChain(_) => Category::LogicalChain,
            Self::Mistakes(_) => Category::Mistakes,
        }
    }
}

impl Problem {
    pub fn category(&self) -> Category {
        self.kind.category()
    }

    /// The expected answer block as a JSON value, for display or export.
    pub fn expected_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match &self.kind {
            ProblemKind::Validation(p) => serde_json::to_value(&p.expected),
            ProblemKind::Completion(p) => serde_json::to_value(&p.expected),
            ProblemKind::Strategy(p) => serde_json::to_value(&p.expected),
            ProblemKind::Transfer(p) => serde_json::to_value(&p.expected),
            ProblemKind::LogicalChain(p) => serde_json::to_value(&p.expected),
            ProblemKind::Mistakes(p) => serde_json::to_value(&p.expected),
        }
    }

    /// Renders the prompt fields of the problem. The expected answer is
    /// never part of the prompt.
    pub fn prompt(&self) -> String {
        match &self.kind {
            ProblemKind::Validation(p) => format!(
                "Theorem: {}\n\
                Proof:\n\
                {}\n\
                \n\
                Decide whether this proof is valid. If it is not, name the first incorrect step and explain the error.",
                p.theorem,
                p.proof.join("\n")
            ),
            ProblemKind::Completion(p) => format!(
                "Theorem: {}\n\
                Partial proof:\n\
                {}\n\
                \n\
                Supply the step marked {} and explain why it is needed.",
                p.theorem,
                p.partial_proof.join("\n"),
                MISSING_STEP
            ),
            ProblemKind::Strategy(p) => format!(
                "Theorem: {}\nContext: {}\nTask: {}",
                p.theorem, p.context, p.task
            ),
            ProblemKind::Transfer(p) => format!(
                "Source theorem: {}\nTarget theorem: {}\nTask: {}",
                p.source_theorem, p.target_theorem, p.task
            ),
            ProblemKind::LogicalChain(p) => format!(
                "Premise: {}\nConclusion: {}\nTask: {}",
                p.premise, p.conclusion, p.task
            ),
            ProblemKind::Mistakes(p) => format!(
                "Claim: {}\n\
                Proof:\n\
                {}\n\
                \n\
                Identify the mistake in this proof, explain why it is wrong and show how to correct it.",
                p.claim,
                p.invalid_proof.join("\n")
            ),
        }
    }

    /// Checks the invariants a single problem must satisfy on its own.
    pub fn check(&self) -> Result<(), SchemaError> {
        if self.id.trim().is_empty() {
            return Err(SchemaError::MissingField {
                id: self.id.clone(),
                field: "id",
            });
        }
        if self.points == 0 {
            return Err(SchemaError::NonPositivePoints {
                id: self.id.clone(),
            });
        }

        match &self.kind {
            ProblemKind::Validation(p) => {
                self.require_text("theorem", &p.theorem)?;
                self.require_steps("proof", &p.proof)?;
                self.check_validation_expected(p)
            }
            ProblemKind::Completion(p) => {
                self.require_text("theorem", &p.theorem)?;
                self.require_steps("partial_proof", &p.partial_proof)?;
                let placeholders = p
                    .partial_proof
                    .iter()
                    .filter(|step| step.trim() == MISSING_STEP)
                    .count();
                if placeholders != 1 {
                    return Err(self.invalid(
                        "partial_proof",
                        format!("expected exactly one {} placeholder, found {}", MISSING_STEP, placeholders),
                    ));
                }
                self.require_text("expected.key_step", &p.expected.key_step)?;
                self.require_steps("expected.reasoning", &p.expected.reasoning)
            }
            ProblemKind::Strategy(p) => {
                self.require_text("theorem", &p.theorem)?;
                self.require_text("task", &p.task)?;
                self.require_text("context", &p.context)?;
                self.require_text("expected.strategy", &p.expected.strategy)?;
                self.require_text("expected.justification", &p.expected.justification)?;
                self.require_steps("expected.key_insights", &p.expected.key_insights)
            }
            ProblemKind::Transfer(p) => {
                self.require_text("source_theorem", &p.source_theorem)?;
                self.require_text("target_theorem", &p.target_theorem)?;
                self.require_text("task", &p.task)?;
                self.require_text("expected.technique", &p.expected.technique)?;
                self.require_text("expected.key_transfer", &p.expected.key_transfer)?;
                self.require_text("expected.insight", &p.expected.insight)
            }
            ProblemKind::LogicalChain(p) => {
                self.require_text("premise", &p.premise)?;
                self.require_text("conclusion", &p.conclusion)?;
                self.require_text("task", &p.task)?;
                self.require_steps("expected.key_steps", &p.expected.key_steps)
            }
            ProblemKind::Mistakes(p) => {
                self.require_text("claim", &p.claim)?;
                self.require_steps("invalid_proof", &p.invalid_proof)?;
                self.require_text("expected.error_type", &p.expected.error_type)?;
                self.require_text("expected.specific_flaw", &p.expected.specific_flaw)?;
                self.require_text("expected.correction", &p.expected.correction)
            }
        }
    }

    fn check_validation_expected(&self, p: &ValidationProblem) -> Result<(), SchemaError> {
        let expected = &p.expected;
        match (expected.valid, expected.error_step) {
            (true, Some(_)) => {
                return Err(self.invalid(
                    "expected.error_step",
                    "a valid proof cannot name an error step".to_string(),
                ));
            }
            (false, None) => {
                return Err(SchemaError::MissingField {
                    id: self.id.clone(),
                    field: "expected.error_step",
                });
            }
            (false, Some(step)) if step == 0 || (step as usize) > p.proof.len() => {
                return Err(self.invalid(
                    "expected.error_step",
                    format!("step {} is outside the proof (1..={})", step, p.proof.len()),
                ));
            }
            _ => {}
        }

        let has_explanation = expected
            .explanation
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty());
        if !has_explanation && expected.key_insights.is_empty() {
            return Err(SchemaError::MissingField {
                id: self.id.clone(),
                field: "expected.explanation",
            });
        }
        if !expected.key_insights.is_empty() {
            self.require_steps("expected.key_insights", &expected.key_insights)?;
        }
        Ok(())
    }

    fn require_text(&self, field: &'static str, value: &str) -> Result<(), SchemaError> {
        if value.trim().is_empty() {
            Err(SchemaError::MissingField {
                id: self.id.clone(),
                field,
            })
        } else {
            Ok(())
        }
    }

    fn require_steps(&self, field: &'static str, steps: &[String]) -> Result<(), SchemaError> {
        if steps.is_empty() {
            return Err(SchemaError::MissingField {
                id: self.id.clone(),
                field,
            });
        }
        if steps.iter().any(|s| s.trim().is_empty()) {
            return Err(self.invalid(field, "contains an empty entry".to_string()));
        }
        Ok(())
    }

    fn invalid(&self, field: &'static str, reason: String) -> SchemaError {
        SchemaError::InvalidField {
            id: self.id.clone(),
            field,
            reason,
        }
    }
}
