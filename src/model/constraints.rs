use serde::{Deserialize, Serialize};

use crate::pool::candidate::Candidate;
use crate::types::identifiers::ModelFingerprint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    Le,
    Eq,
    Ge,
}

/// One linear row over the decision variables: `coeffs · x  sense  rhs`.
/// Coefficients are dense and indexed by decision position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub coeffs: Vec<f64>,
    pub sense: Sense,
    pub rhs: f64,
}

// This is intentionally thin:
// no mutation
// no re-validation
// the builder is the only producer
#[derive(Debug, Clone)]
pub struct ConstraintSystem {
    pub fingerprint: ModelFingerprint,

    /// Pre-committed candidates, original order. Not decision variables:
    /// their prices and quota slots are already substituted into the rows.
    pub forced: Vec<Candidate>,
    /// One binary decision variable per entry, original order.
    pub decisions: Vec<Candidate>,

    pub rows: Vec<LinearConstraint>,
    /// Projected value per decision variable.
    pub objective: Vec<f64>,

    pub original_budget: f64,
    /// Original budget minus the forced candidates' prices. May be
    /// negative, in which case the budget row is unsatisfiable and the
    /// engine reports the model infeasible.
    pub reduced_budget: f64,

    pub forced_price: f64,
    pub forced_value: f64,
}

impl ConstraintSystem {
    pub fn num_decisions(&self) -> usize {
        self.decisions.len()
    }

    pub fn pool_size(&self) -> usize {
        self.forced.len() + self.decisions.len()
    }
}
