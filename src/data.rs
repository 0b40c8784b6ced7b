//! The built-in MathReasoner v1 dataset.
//!
//! Each problem tests one specific aspect of mathematical thinking: judging
//! a proof, filling a gap, choosing a strategy, transferring a technique,
//! building a chain of inferences, or locating a mistake.

use std::collections::BTreeMap;

use crate::problem::{
    Category, CompletionExpected, CompletionProblem, Difficulty, LogicalChainExpected,
    LogicalChainProblem, MISSING_STEP, MistakeExpected, MistakeProblem, Problem, ProblemKind,
    StrategyExpected, StrategyProblem, TransferExpected, TransferProblem, ValidationExpected,
    ValidationProblem,
};
use crate::schema::{CatalogDocument, ProblemGroups};
use crate::scoring::{EvaluationMetrics, OverallScore, ScoringCriteria};

pub const CATALOG_NAME: &str = "MathReasoner";
pub const CATALOG_VERSION: &str = "v1";
pub const CATALOG_DESCRIPTION: &str = "Initial benchmark for testing mathematical reasoning capabilities. Each problem tests specific aspects of mathematical thinking.";

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Unvalidated document holding the built-in dataset.
/// Use [`crate::BenchmarkCatalog::builtin`] to obtain a checked catalog.
pub fn builtin_document() -> CatalogDocument {
    CatalogDocument {
        name: CATALOG_NAME.into(),
        version: CATALOG_VERSION.into(),
        description: CATALOG_DESCRIPTION.into(),
        problems: builtin_problems(),
        scoring_criteria: builtin_scoring_criteria(),
        evaluation_metrics: builtin_evaluation_metrics(),
    }
}

fn builtin_problems() -> ProblemGroups {
    let mut groups = ProblemGroups::new();

    groups.insert(
        Category::Validation.group_key().into(),
        vec![
            Problem {
                id: "V1".into(),
                difficulty: Difficulty::Basic,
                points: 5,
                kind: ProblemKind::Validation(ValidationProblem {
                    theorem: "If n² is even, then n is even".into(),
                    proof: lines(&[
                        "1. Let n be an integer where n² is even",
                        "2. Then n² = 2k for some integer k",
                        "3. Therefore n = √(2k)",
                        "4. Thus n must be even",
                        "QED",
                    ]),
                    expected: ValidationExpected {
                        valid: false,
                        error_step: Some(3),
                        explanation: Some(
                            "Taking square root doesn't preserve integer property".into(),
                        ),
                        key_insights: Vec::new(),
                    },
                }),
            },
            Problem {
                id: "V2".into(),
                difficulty: Difficulty::Medium,
                points: 8,
                kind: ProblemKind::Validation(ValidationProblem {
                    theorem: "The square root of 2 is irrational".into(),
                    proof: lines(&[
                        "1. Assume √2 = a/b where a,b are coprime integers",
                        "2. Then 2b² = a²",
                        "3. Therefore a² is even",
                        "4. Thus a is even, so a = 2k",
                        "5. Therefore 2b² = 4k²",
                        "6. Thus b² = 2k²",
                        "7. Therefore b is even",
                        "8. Contradicts a,b being coprime",
                        "QED",
                    ]),
                    expected: ValidationExpected {
                        valid: true,
                        error_step: None,
                        explanation: None,
                        key_insights: lines(&["contradiction", "even squares", "coprime"]),
                    },
                }),
            },
        ],
    );

    groups.insert(
        Category::Completion.group_key().into(),
        vec![Problem {
            id: "C1".into(),
            difficulty: Difficulty::Medium,
            points: 8,
            kind: ProblemKind::Completion(CompletionProblem {
                theorem: "Sum of first n odd numbers equals n²".into(),
                partial_proof: lines(&[
                    "1. True for n=1: 1 = 1²",
                    "2. Assume true for k: 1 + 3 + ... + (2k-1) = k²",
                    MISSING_STEP,
                    "4. Therefore true for k+1",
                    "5. By induction, true for all n",
                ]),
                expected: CompletionExpected {
                    key_step: "Add (2k+1) to both sides: k² + (2k+1) = (k+1)²".into(),
                    reasoning: lines(&["next odd number", "algebraic completion"]),
                },
            }),
        }],
    );

    groups.insert(
        Category::Strategy.group_key().into(),
        vec![Problem {
            id: "S1".into(),
            difficulty: Difficulty::Hard,
            points: 10,
            kind: ProblemKind::Strategy(StrategyProblem {
                theorem: "There are infinitely many primes".into(),
                task: "Select and justify best proof strategy".into(),
                context: "Need to prove existence of infinitely many objects".into(),
                expected: StrategyExpected {
                    strategy: "contradiction".into(),
                    justification: "Assuming finite primes leads to constructing new prime".into(),
                    key_insights: lines(&["construct from existing", "add one", "prime factors"]),
                },
            }),
        }],
    );

    groups.insert(
        Category::Transfer.group_key().into(),
        vec![Problem {
            id: "T1".into(),
            difficulty: Difficulty::Expert,
            points: 12,
            kind: ProblemKind::Transfer(TransferProblem {
                source_theorem: "Infinite pigeonhole principle".into(),
                target_theorem:
                    "Every infinite subset of integers has an infinite arithmetic progression"
                        .into(),
                task: "Apply pigeonhole thinking to prove target theorem".into(),
                expected: TransferExpected {
                    technique: "infinite_pigeons".into(),
                    key_transfer: "infinite choices into finite options".into(),
                    insight: "differences between elements form finite set".into(),
                },
            }),
        }],
    );

    groups.insert(
        Category::LogicalChain.group_key().into(),
        vec![Problem {
            id: "L1".into(),
            difficulty: Difficulty::Medium,
            points: 8,
            kind: ProblemKind::LogicalChain(LogicalChainProblem {
                premise: "Let G be a group. ∀a,b ∈ G: (ab)² = a²b²".into(),
                conclusion: "G is abelian".into(),
                task: "Construct valid logical chain from premise to conclusion".into(),
                expected: LogicalChainExpected {
                    key_steps: lines(&[
                        "expand (ab)²",
                        "use premise",
                        "cancel valid terms",
                        "conclude ab = ba",
                    ]),
                },
            }),
        }],
    );

    groups.insert(
        Category::Mistakes.group_key().into(),
        vec![Problem {
            id: "M1".into(),
            difficulty: Difficulty::Medium,
            points: 8,
            kind: ProblemKind::Mistakes(MistakeProblem {
                claim: "All triangles are isosceles".into(),
                invalid_proof: lines(&[
                    "1. Let ABC be a triangle",
                    "2. Draw height h from A to BC",
                    "3. This creates two right triangles",
                    "4. By pythagorean theorem, both sides equal",
                    "5. Therefore AB = AC",
                    "QED",
                ]),
                expected: MistakeExpected {
                    error_type: "hidden_assumption".into(),
                    specific_flaw: "assumes height bisects base".into(),
                    correction: "height may not bisect base unless already isosceles".into(),
                },
            }),
        }],
    );

    groups
}

fn criteria(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
    entries
        .iter()
        .map(|(name, weight)| (name.to_string(), *weight))
        .collect()
}

fn builtin_scoring_criteria() -> ScoringCriteria {
    ScoringCriteria::new(BTreeMap::from([
        (
            Category::Validation,
            criteria(&[("correctness", 2), ("error_location", 1), ("explanation", 2)]),
        ),
        (
            Category::Completion,
            criteria(&[("logical_validity", 3), ("completeness", 2), ("clarity", 3)]),
        ),
        (
            Category::Strategy,
            criteria(&[("choice", 3), ("justification", 4), ("alternatives", 3)]),
        ),
        (
            Category::Transfer,
            criteria(&[
                ("technique_application", 4),
                ("justification", 4),
                ("execution", 4),
            ]),
        ),
        (
            Category::LogicalChain,
            criteria(&[("validity", 3), ("completeness", 3), ("clarity", 2)]),
        ),
        (
            Category::Mistakes,
            criteria(&[("identification", 3), ("explanation", 3), ("correction", 2)]),
        ),
    ]))
}

fn builtin_evaluation_metrics() -> EvaluationMetrics {
    EvaluationMetrics {
        overall_score: OverallScore::default(),
        category_weights: BTreeMap::from([
            (Category::Validation, 0.2),
            (Category::Completion, 0.2),
            (Category::Strategy, 0.2),
            (Category::Transfer, 0.15),
            (Category::LogicalChain, 0.15),
            (Category::Mistakes, 0.1),
        ]),
        skill_metrics: lines(&[
            "logical_validity",
            "proof_technique",
            "error_detection",
            "mathematical_clarity",
            "strategic_thinking",
        ]),
    }
}
