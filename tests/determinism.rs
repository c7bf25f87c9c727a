use roster_core::pool::{Candidate, CandidateId, Category, FlexQuota, QuotaTable, RosterRules};
use roster_core::solve::RosterOptimizer;
use roster_core::types::{
    RosterResult, RosterTotals, SelectedCandidate, SolveMetadata, SolveStatus,
};

fn cand(id: &str, category: &str, price: f64, value: f64, forced: bool) -> Candidate {
    Candidate::new(
        CandidateId::new(id).unwrap(),
        Category::new(category).unwrap(),
        price,
        value,
        forced,
    )
    .unwrap()
}

fn draft_pool() -> Vec<Candidate> {
    vec![
        cand("A", "QB", 10.0, 20.0, true),
        cand("B", "QB", 8.0, 18.0, false),
        cand("C", "RB", 12.0, 25.0, false),
        cand("D", "RB", 9.0, 19.0, false),
    ]
}

fn draft_rules() -> RosterRules {
    let mut table = QuotaTable::new();
    table.insert(Category::new("QB").unwrap(), 2);
    table.insert(Category::new("RB").unwrap(), 2);
    RosterRules::new(40.0, table, FlexQuota::new(0, [Category::new("RB").unwrap()]))
}

#[test]
fn golden_result_serialization() {
    // 1. Construct a mock result by hand
    let selected = SelectedCandidate {
        id: "Alvin Kamara".to_string(),
        category: "RB".to_string(),
        price: 12.0,
        value: 25.0,
        forced: false,
    };

    let result = RosterResult {
        status: SolveStatus::Optimal,
        selected: vec![selected],
        totals: RosterTotals {
            value: 25.0,
            price: 12.0,
            count: 1,
        },
        solve: SolveMetadata {
            model: "sha256:mock".to_string(),
            budget: 40.0,
            candidates_considered: 4,
            forced_count: 1,
            nodes_explored: 1,
        },
    };

    // 2. Serialize
    let json_str = serde_json::to_string_pretty(&result).unwrap();

    // 3. Verify structure & key order (golden check)
    let status_pos = json_str.find("\"status\":").expect("Missing status key");
    let selected_pos = json_str.find("\"selected\":").expect("Missing selected key");
    let totals_pos = json_str.find("\"totals\":").expect("Missing totals key");
    let solve_pos = json_str.find("\"solve\":").expect("Missing solve key");

    assert!(status_pos < selected_pos);
    assert!(selected_pos < totals_pos);
    assert!(totals_pos < solve_pos);

    // 4. JSON snapshot check
    const EXPECTED_JSON: &str = r#"{
      "status": "Optimal",
      "selected": [
        {
          "id": "Alvin Kamara",
          "category": "RB",
          "price": 12.0,
          "value": 25.0,
          "forced": false
        }
      ],
      "totals": {
        "value": 25.0,
        "price": 12.0,
        "count": 1
      },
      "solve": {
        "model": "sha256:mock",
        "budget": 40.0,
        "candidates_considered": 4,
        "forced_count": 1,
        "nodes_explored": 1
      }
    }"#;

    let normalized_actual: String = json_str.chars().filter(|c| !c.is_whitespace()).collect();
    let normalized_expected: String =
        EXPECTED_JSON.chars().filter(|c| !c.is_whitespace()).collect();
    assert_eq!(
        normalized_actual, normalized_expected,
        "JSON structure mismatch against golden snapshot"
    );

    // 5. Roundtrip check & detailed field verification
    let deserialized: RosterResult = serde_json::from_str(&json_str).expect("Deserialization failed");

    assert_eq!(deserialized.status, SolveStatus::Optimal);
    assert_eq!(deserialized.selected.len(), 1);
    assert_eq!(deserialized.selected[0].id, "Alvin Kamara");
    assert_eq!(deserialized.selected[0].category, "RB");
    assert!(!deserialized.selected[0].forced);
    assert_eq!(deserialized.totals.count, 1);
    assert_eq!(deserialized.solve.model, "sha256:mock");
    assert_eq!(deserialized.solve.budget, 40.0);
    assert_eq!(deserialized.solve.candidates_considered, 4);
    assert_eq!(deserialized.solve.forced_count, 1);
    assert_eq!(deserialized.solve.nodes_explored, 1);
}

#[test]
fn end_to_end_optimization_is_deterministic() {
    // Two independently constructed, identical requests
    let result1 = RosterOptimizer::default()
        .optimize(draft_pool(), draft_rules())
        .unwrap();
    let result2 = RosterOptimizer::default()
        .optimize(draft_pool(), draft_rules())
        .unwrap();

    let json1 = serde_json::to_string_pretty(&result1).unwrap();
    let json2 = serde_json::to_string_pretty(&result2).unwrap();

    // Byte-for-byte, selection order included
    assert_eq!(json1, json2, "Optimization output is not deterministic");

    assert_eq!(result1.status, SolveStatus::Optimal);
    let ids: Vec<&str> = result1.selected.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C", "D"]);
}

#[test]
fn deserialized_candidates_are_validated_and_normalized() {
    // Decoding runs the same checks as construction
    let candidate: Candidate = serde_json::from_str(
        r#"{"id":"Barkley","category":"rb","price":6.0,"value":29.0,"forced":false}"#,
    )
    .unwrap();
    assert_eq!(candidate.category.as_str(), "RB");

    let negative_price = serde_json::from_str::<Candidate>(
        r#"{"id":"Barkley","category":"RB","price":-6.0,"value":29.0,"forced":false}"#,
    );
    assert!(negative_price.is_err());

    let blank_id = serde_json::from_str::<Candidate>(
        r#"{"id":"   ","category":"RB","price":6.0,"value":29.0,"forced":false}"#,
    );
    assert!(blank_id.is_err());
}

#[test]
fn model_fingerprint_is_stable_across_runs() {
    let result1 = RosterOptimizer::default()
        .optimize(draft_pool(), draft_rules())
        .unwrap();
    let result2 = RosterOptimizer::default()
        .optimize(draft_pool(), draft_rules())
        .unwrap();

    assert_eq!(result1.solve.model, result2.solve.model);
    assert!(result1.solve.model.starts_with("sha256:"));
    assert_eq!(result1.solve.model.len(), "sha256:".len() + 64);
}
