use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::constraints::{ConstraintSystem, LinearConstraint, Sense};
use crate::pool::candidate::Candidate;
use crate::pool::rules::RosterRules;
use crate::types::identifiers::{Category, ModelFingerprint};

/// Label used when the flex minimum itself is invalid.
const FLEX_LABEL: &str = "FLEX";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid budget: {0}")]
    InvalidBudget(f64),
    #[error("Invalid quota for {category}: {count}")]
    InvalidQuota { category: String, count: i64 },
    #[error("Duplicate candidate: {0}")]
    DuplicateCandidate(String),
    #[error("Insufficient pool for {category}: {forced} forced candidates exceed quota {quota}")]
    InsufficientPool {
        category: String,
        forced: i64,
        quota: i64,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// ModelBuilder is single-threaded and non-reentrant by design.
/// Every failure it can produce is detected here, before any search begins.
pub struct ModelBuilder {
    rules: RosterRules,
}

impl ModelBuilder {
    pub fn new(rules: RosterRules) -> Self {
        Self { rules }
    }

    pub fn build(&self, candidates: Vec<Candidate>) -> Result<ConstraintSystem, ModelError> {
        // 1. Validate the rules
        let budget = self.rules.budget;
        if !budget.is_finite() || budget < 0.0 {
            return Err(ModelError::InvalidBudget(budget));
        }
        for (category, count) in self.rules.quotas.iter() {
            if count < 0 {
                return Err(ModelError::InvalidQuota {
                    category: category.as_str().to_string(),
                    count,
                });
            }
        }
        if self.rules.flex.min < 0 {
            return Err(ModelError::InvalidQuota {
                category: FLEX_LABEL.to_string(),
                count: self.rules.flex.min,
            });
        }

        // 2. Check for duplicate identities (sort a view, scan adjacent)
        let mut ids: Vec<_> = candidates.iter().map(|c| &c.id).collect();
        ids.sort();
        for pair in ids.windows(2) {
            if pair[0] == pair[1] {
                return Err(ModelError::DuplicateCandidate(
                    pair[0].as_str().to_string(),
                ));
            }
        }

        // 3. Partition forced vs. decision candidates, original order kept
        let mut forced = Vec::new();
        let mut decisions = Vec::new();
        for candidate in candidates {
            if candidate.forced {
                forced.push(candidate);
            } else {
                decisions.push(candidate);
            }
        }

        let mut forced_per_category: BTreeMap<&Category, i64> = BTreeMap::new();
        for candidate in &forced {
            *forced_per_category.entry(&candidate.category).or_insert(0) += 1;
        }

        // 4. Detect over-commitment before solving, not as solver infeasibility
        for (category, quota) in self.rules.quotas.iter() {
            let committed = forced_per_category.get(category).copied().unwrap_or(0);
            if committed > quota {
                return Err(ModelError::InsufficientPool {
                    category: category.as_str().to_string(),
                    forced: committed,
                    quota,
                });
            }
        }

        // 5. Assemble the rows over the decision variables
        let forced_price: f64 = forced.iter().map(|c| c.price).sum();
        let forced_value: f64 = forced.iter().map(|c| c.value).sum();
        let reduced_budget = budget - forced_price;

        let n = decisions.len();
        let mut rows = Vec::with_capacity(self.rules.quotas.len() + 2);

        // 5a. Budget: sum of decision prices <= reduced budget.
        // A negative rhs is deliberately left for the engine to report as
        // infeasible; the forced set alone already overspends.
        rows.push(LinearConstraint {
            coeffs: decisions.iter().map(|c| c.price).collect(),
            sense: Sense::Le,
            rhs: reduced_budget,
        });

        // 5b. Per-category counts. Strict categories are equalities;
        // flex-eligible categories are lower bounds only (no upper bound,
        // preserving the source behavior).
        for (category, quota) in self.rules.quotas.iter() {
            let committed = forced_per_category.get(category).copied().unwrap_or(0);
            let residual = quota - committed;

            let coeffs: Vec<f64> = decisions
                .iter()
                .map(|c| if &c.category == category { 1.0 } else { 0.0 })
                .collect();
            let sense = if self.rules.flex.is_eligible(category) {
                Sense::Ge
            } else {
                Sense::Eq
            };

            rows.push(LinearConstraint {
                coeffs,
                sense,
                rhs: residual as f64,
            });
        }

        // 5c. Aggregate flex: selections across flex categories must cover
        // every residual strict quota there plus the flex minimum. Forced
        // candidates in flex categories without a table entry are pure
        // surplus and already count toward the minimum.
        let mut flex_rhs = self.rules.flex.min;
        for category in &self.rules.flex.categories {
            let committed = forced_per_category.get(category).copied().unwrap_or(0);
            match self.rules.quotas.get(category) {
                Some(quota) => flex_rhs += quota - committed,
                None => flex_rhs -= committed,
            }
        }
        if flex_rhs > 0 {
            rows.push(LinearConstraint {
                coeffs: decisions
                    .iter()
                    .map(|c| {
                        if self.rules.flex.is_eligible(&c.category) {
                            1.0
                        } else {
                            0.0
                        }
                    })
                    .collect(),
                sense: Sense::Ge,
                rhs: flex_rhs as f64,
            });
        }

        debug_assert!(rows.iter().all(|r| r.coeffs.len() == n));

        // 6. Fingerprint the canonical model: rules JSON, then one line per
        // candidate in id order
        let mut canonical = serde_json::to_vec(&self.rules)?;

        let mut sorted: Vec<&Candidate> = forced.iter().chain(decisions.iter()).collect();
        sorted.sort_by(|a, b| a.id.cmp(&b.id));
        for candidate in sorted {
            let line = format!(
                "\n{}:{}:{}:{}:{}",
                candidate.id.as_str(),
                candidate.category.as_str(),
                candidate.price,
                candidate.value,
                candidate.forced,
            );
            canonical.extend_from_slice(line.as_bytes());
        }
        let fingerprint = ModelFingerprint::from_canonical_bytes(&canonical);

        let objective = decisions.iter().map(|c| c.value).collect();

        Ok(ConstraintSystem {
            fingerprint,
            forced,
            decisions,
            rows,
            objective,
            original_budget: budget,
            reduced_budget,
            forced_price,
            forced_value,
        })
    }
}
