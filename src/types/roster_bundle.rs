use serde::{Deserialize, Serialize};

/// Outcome of an optimization request.
///
/// `Infeasible` is a legitimate result, not a defect, and is always
/// distinguishable from an optimal roster that happens to score zero.
/// `BestEffort` marks an incumbent returned after the node budget ran out:
/// feasible, but not proven optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    BestEffort,
}

/// A selected candidate returned in the output.
/// Fully self-contained and serializable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedCandidate {
    pub id: String,
    pub category: String,

    pub price: f64,
    pub value: f64,

    /// True when the candidate was pre-committed before solving.
    pub forced: bool,
}

/// Aggregates over the selected roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterTotals {
    pub value: f64,
    pub price: f64,
    pub count: usize,
}

/// Metadata describing the outcome of the solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveMetadata {
    pub model: String,
    pub budget: f64,

    pub candidates_considered: usize,
    pub forced_count: usize,

    pub nodes_explored: u64,
}

/// The final result of an optimization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterResult {
    pub status: SolveStatus,
    pub selected: Vec<SelectedCandidate>,
    pub totals: RosterTotals,
    pub solve: SolveMetadata,
}
