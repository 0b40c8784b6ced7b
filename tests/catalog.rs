use std::collections::BTreeMap;
use std::sync::Arc;

use mathreasoner::problem::{ProblemKind, StrategyExpected};
use mathreasoner::{BenchmarkCatalog, Category, OverallScore, SchemaError};

fn catalog() -> BenchmarkCatalog {
    BenchmarkCatalog::builtin().expect("built-in catalog should validate")
}

#[test]
fn every_problem_has_points_and_matches_its_group() {
    let catalog = catalog();
    for (group, problems) in catalog.problems() {
        let category = Category::from_group_key(group).expect("known group key");
        for problem in problems {
            assert!(problem.points > 0, "{} has no points", problem.id);
            assert_eq!(problem.category(), category, "{} stored under {}", problem.id, group);
        }
    }
}

#[test]
fn scoring_criteria_cover_the_same_categories_as_problems() {
    let catalog = catalog();
    assert_eq!(catalog.scoring_criteria().categories(), catalog.categories());
    assert_eq!(catalog.categories().len(), 6);
}

#[test]
fn category_weights_sum_to_one() {
    let metrics = catalog().evaluation_metrics().clone();
    assert!((metrics.weight_sum() - 1.0).abs() < 1e-6);
    assert_eq!(metrics.weight_for(Category::Transfer), Some(0.15));
}

#[test]
fn overall_score_is_fixed() {
    let catalog = catalog();
    assert_eq!(
        catalog.evaluation_metrics().overall_score,
        OverallScore {
            max_points: 100,
            passing_threshold: 70,
        }
    );
}

#[test]
fn skill_metrics_keep_their_order() {
    let catalog = catalog();
    assert_eq!(
        catalog.evaluation_metrics().skill_metrics,
        vec![
            "logical_validity",
            "proof_technique",
            "error_detection",
            "mathematical_clarity",
            "strategic_thinking",
        ]
    );
}

#[test]
fn accessors_are_idempotent_and_copies_are_detached() {
    let catalog = catalog();
    assert_eq!(catalog.problems(), catalog.problems());
    assert_eq!(catalog.scoring_criteria(), catalog.scoring_criteria());
    assert_eq!(catalog.evaluation_metrics(), catalog.evaluation_metrics());

    let mut problems = catalog.problems().clone();
    problems.get_mut("validation_problems").unwrap()[0].points = 999;
    problems.remove("strategy_problems");

    let mut metrics = catalog.evaluation_metrics().clone();
    metrics.skill_metrics.clear();

    assert_eq!(catalog.problems()["validation_problems"][0].points, 5);
    assert!(catalog.problems().contains_key("strategy_problems"));
    assert_eq!(catalog.evaluation_metrics().skill_metrics.len(), 5);
    assert_eq!(catalog, BenchmarkCatalog::builtin().unwrap());
}

#[test]
fn v1_is_an_invalid_proof_failing_at_step_three() {
    let catalog = catalog();
    let v1 = catalog.problems()["validation_problems"]
        .iter()
        .find(|p| p.id == "V1")
        .expect("V1 present");
    match &v1.kind {
        ProblemKind::Validation(v) => {
            assert!(!v.expected.valid);
            assert_eq!(v.expected.error_step, Some(3));
            assert_eq!(v.proof[2], "3. Therefore n = √(2k)");
        }
        other => panic!("V1 is not a validation problem: {:?}", other),
    }
}

#[test]
fn first_strategy_problem_expects_contradiction() {
    let catalog = catalog();
    let first = &catalog.problems()["strategy_problems"][0];
    match &first.kind {
        ProblemKind::Strategy(s) => {
            let StrategyExpected { strategy, .. } = &s.expected;
            assert_eq!(strategy, "contradiction");
        }
        other => panic!("unexpected kind: {:?}", other),
    }
}

#[test]
fn mistakes_criteria_match_m1_points() {
    let catalog = catalog();
    let expected = BTreeMap::from([
        ("identification".to_string(), 3),
        ("explanation".to_string(), 3),
        ("correction".to_string(), 2),
    ]);
    assert_eq!(catalog.scoring_criteria()[Category::Mistakes], expected);

    let m1 = catalog.find("M1").unwrap();
    assert_eq!(
        catalog.scoring_criteria().total_for(Category::Mistakes),
        u64::from(m1.points)
    );
}

#[test]
fn save_and_load_preserve_the_catalog() {
    let catalog = catalog();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");

    catalog.save_to_file(&path).unwrap();
    let loaded = BenchmarkCatalog::load_from_file(&path).unwrap();
    assert_eq!(loaded, catalog);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["problems"]["mistake_identification"][0]["category"], "mistakes");
    assert_eq!(raw["scoring_criteria"]["validation"]["error_location"], 1);
    assert_eq!(raw["evaluation_metrics"]["overall_score"]["passing_threshold"], 70);
}

#[test]
fn loading_a_malformed_document_fails_eagerly() {
    let mut raw = serde_json::to_value(catalog().to_document()).unwrap();
    raw["evaluation_metrics"]["category_weights"]["mistakes"] = serde_json::json!(0.3);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, raw.to_string()).unwrap();

    assert!(matches!(
        BenchmarkCatalog::load_from_file(&path),
        Err(SchemaError::WeightSum { .. })
    ));
}

#[test]
fn repeated_keys_in_a_document_are_rejected() {
    let json = catalog().to_document().to_json().unwrap();

    let repeated_group = json.replacen(
        "\"validation_problems\": [",
        "\"validation_problems\": [],\n    \"validation_problems\": [",
        1,
    );
    assert_ne!(repeated_group, json);
    assert!(matches!(
        BenchmarkCatalog::from_json(&repeated_group),
        Err(SchemaError::InvalidDocument(msg)) if msg.contains("duplicate key")
    ));

    let repeated_weight = json.replacen("\"mistakes\": 0.1", "\"mistakes\": 0.5, \"mistakes\": 0.1", 1);
    assert_ne!(repeated_weight, json);
    assert!(matches!(
        BenchmarkCatalog::from_json(&repeated_weight),
        Err(SchemaError::InvalidDocument(_))
    ));
}

#[test]
fn missing_file_is_a_file_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        BenchmarkCatalog::load_from_file(dir.path().join("absent.json")),
        Err(SchemaError::FileError(_))
    ));
}

#[test]
fn catalog_is_shared_across_threads_without_locking() {
    let catalog = Arc::new(catalog());
    let totals: Vec<u64> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                scope.spawn(move || catalog.max_points_total())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(totals, vec![59; 4]);
}
