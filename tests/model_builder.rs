use roster_core::model::{ModelBuilder, ModelError, Sense};
use roster_core::pool::{Candidate, CandidateId, Category, FlexQuota, QuotaTable, RosterRules};

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

fn quotas(entries: &[(&str, i64)]) -> QuotaTable {
    let mut table = QuotaTable::new();
    for (category, count) in entries {
        table.insert(Category::new(*category).unwrap(), *count);
    }
    table
}

fn flex(min: i64, categories: &[&str]) -> FlexQuota {
    FlexQuota::new(min, categories.iter().map(|c| Category::new(*c).unwrap()))
}

fn spec_pool() -> Vec<Candidate> {
    vec![
        cand("A", "QB", 10.0, 20.0, true),
        cand("B", "QB", 8.0, 18.0, false),
        cand("C", "RB", 12.0, 25.0, false),
        cand("D", "RB", 9.0, 19.0, false),
    ]
}

fn spec_rules(budget: f64) -> RosterRules {
    RosterRules::new(budget, quotas(&[("QB", 2), ("RB", 2)]), flex(0, &["RB"]))
}

#[test]
fn rejects_invalid_budget() {
    let err = ModelBuilder::new(RosterRules::new(-1.0, quotas(&[]), FlexQuota::none()))
        .build(spec_pool())
        .unwrap_err();
    assert!(matches!(err, ModelError::InvalidBudget(b) if b == -1.0));

    let err = ModelBuilder::new(RosterRules::new(f64::NAN, quotas(&[]), FlexQuota::none()))
        .build(spec_pool())
        .unwrap_err();
    assert!(matches!(err, ModelError::InvalidBudget(_)));
}

#[test]
fn rejects_negative_quota() {
    let rules = RosterRules::new(40.0, quotas(&[("QB", 2), ("RB", -1)]), flex(0, &["RB"]));
    let err = ModelBuilder::new(rules).build(spec_pool()).unwrap_err();
    match err {
        ModelError::InvalidQuota { category, count } => {
            assert_eq!(category, "RB");
            assert_eq!(count, -1);
        }
        other => panic!("expected InvalidQuota, got {other:?}"),
    }
}

#[test]
fn rejects_negative_flex_minimum() {
    let rules = RosterRules::new(40.0, quotas(&[("QB", 2)]), flex(-2, &["RB"]));
    let err = ModelBuilder::new(rules).build(spec_pool()).unwrap_err();
    match err {
        ModelError::InvalidQuota { category, count } => {
            assert_eq!(category, "FLEX");
            assert_eq!(count, -2);
        }
        other => panic!("expected InvalidQuota, got {other:?}"),
    }
}

#[test]
fn rejects_duplicate_identity() {
    let mut pool = spec_pool();
    pool.push(cand("B", "RB", 7.0, 11.0, false));

    let err = ModelBuilder::new(spec_rules(40.0)).build(pool).unwrap_err();
    assert!(matches!(err, ModelError::DuplicateCandidate(id) if id == "B"));
}

#[test]
fn rejects_forced_over_commitment() {
    let pool = vec![
        cand("A", "QB", 10.0, 20.0, true),
        cand("B", "QB", 8.0, 18.0, true),
        cand("C", "RB", 12.0, 25.0, false),
    ];
    let rules = RosterRules::new(60.0, quotas(&[("QB", 1), ("RB", 1)]), FlexQuota::none());

    let err = ModelBuilder::new(rules).build(pool).unwrap_err();
    match err {
        ModelError::InsufficientPool {
            category,
            forced,
            quota,
        } => {
            assert_eq!(category, "QB");
            assert_eq!(forced, 2);
            assert_eq!(quota, 1);
        }
        other => panic!("expected InsufficientPool, got {other:?}"),
    }
}

#[test]
fn over_commitment_applies_to_flex_categories_too() {
    let pool = vec![
        cand("R1", "RB", 5.0, 9.0, true),
        cand("R2", "RB", 5.0, 8.0, true),
    ];
    let rules = RosterRules::new(60.0, quotas(&[("RB", 1)]), flex(1, &["RB"]));

    let err = ModelBuilder::new(rules).build(pool).unwrap_err();
    assert!(matches!(err, ModelError::InsufficientPool { .. }));
}

#[test]
fn substitutes_forced_candidates_into_the_rows() {
    let system = ModelBuilder::new(spec_rules(40.0))
        .build(spec_pool())
        .unwrap();

    assert_eq!(system.forced.len(), 1);
    assert_eq!(system.decisions.len(), 3);
    assert_eq!(system.forced_price, 10.0);
    assert_eq!(system.forced_value, 20.0);
    assert_eq!(system.original_budget, 40.0);
    assert_eq!(system.reduced_budget, 30.0);

    // budget row, QB equality, RB lower bound, aggregate flex
    assert_eq!(system.rows.len(), 4);

    let budget = &system.rows[0];
    assert_eq!(budget.sense, Sense::Le);
    assert_eq!(budget.rhs, 30.0);
    assert_eq!(budget.coeffs, vec![8.0, 12.0, 9.0]);

    // QuotaTable iterates categories in order: QB before RB
    let qb = &system.rows[1];
    assert_eq!(qb.sense, Sense::Eq);
    assert_eq!(qb.rhs, 1.0);
    assert_eq!(qb.coeffs, vec![1.0, 0.0, 0.0]);

    let rb = &system.rows[2];
    assert_eq!(rb.sense, Sense::Ge);
    assert_eq!(rb.rhs, 2.0);
    assert_eq!(rb.coeffs, vec![0.0, 1.0, 1.0]);

    let agg = &system.rows[3];
    assert_eq!(agg.sense, Sense::Ge);
    assert_eq!(agg.rhs, 2.0);
    assert_eq!(agg.coeffs, vec![0.0, 1.0, 1.0]);
}

#[test]
fn negative_reduced_budget_is_left_for_the_engine() {
    // Forced spend alone exceeds the cap: that is solver infeasibility,
    // not a build failure
    let system = ModelBuilder::new(spec_rules(5.0))
        .build(spec_pool())
        .unwrap();
    assert_eq!(system.reduced_budget, -5.0);
}

#[test]
fn category_labels_are_normalized() {
    let pool = vec![
        cand("A", "qb", 10.0, 20.0, true),
        cand("B", " Qb ", 8.0, 18.0, false),
    ];
    let rules = RosterRules::new(40.0, quotas(&[("QB", 2)]), FlexQuota::none());

    let system = ModelBuilder::new(rules).build(pool).unwrap();
    // Both candidates count toward the same QB quota: residual is 2 - 1
    assert_eq!(system.rows[1].rhs, 1.0);
    assert_eq!(system.rows[1].coeffs, vec![1.0]);
}

#[test]
fn fingerprint_is_input_order_invariant_and_content_sensitive() {
    let forward = ModelBuilder::new(spec_rules(40.0))
        .build(spec_pool())
        .unwrap();

    let mut shuffled = spec_pool();
    shuffled.reverse();
    let reversed = ModelBuilder::new(spec_rules(40.0)).build(shuffled).unwrap();
    assert_eq!(forward.fingerprint, reversed.fingerprint);

    let mut repriced = spec_pool();
    repriced[2] = cand("C", "RB", 13.0, 25.0, false);
    let changed = ModelBuilder::new(spec_rules(40.0)).build(repriced).unwrap();
    assert_ne!(forward.fingerprint, changed.fingerprint);

    let other_budget = ModelBuilder::new(spec_rules(41.0))
        .build(spec_pool())
        .unwrap();
    assert_ne!(forward.fingerprint, other_budget.fingerprint);

    assert!(forward.fingerprint.as_str().starts_with("sha256:"));
    assert_eq!(forward.fingerprint.as_str().len(), "sha256:".len() + 64);
}
