pub mod projection;
pub mod relaxation;
pub mod search;

use crate::model::builder::{ModelBuilder, ModelError};
use crate::pool::candidate::Candidate;
use crate::pool::rules::RosterRules;
use crate::types::roster_bundle::RosterResult;
pub use projection::project_roster;
pub use relaxation::{DenseSimplex, LpOutcome, LpProblem, RelaxationSolver};
pub use search::{search, Assignment, SearchLimits, SearchOutcome, SearchReport};

/// Fixed comparison tolerance absorbing relaxation rounding before any
/// value is concluded integral, feasible, or tied.
pub const TOLERANCE: f64 = 1e-6;

/// The engine's front door: build, search, project.
pub struct RosterOptimizer<R> {
    relaxation: R,
    limits: SearchLimits,
}

impl Default for RosterOptimizer<DenseSimplex> {
    fn default() -> Self {
        Self {
            relaxation: DenseSimplex,
            limits: SearchLimits::unbounded(),
        }
    }
}

impl<R> RosterOptimizer<R>
where
    R: RelaxationSolver,
{
    pub fn new(relaxation: R, limits: SearchLimits) -> Self {
        Self { relaxation, limits }
    }

    /// Solve one optimization request.
    ///
    /// Rule violations detectable up front (`ModelError`) surface as `Err`;
    /// infeasibility and best-effort truncation are normal outcomes carried
    /// in the result's status.
    pub fn optimize(
        &self,
        candidates: Vec<Candidate>,
        rules: RosterRules,
    ) -> Result<RosterResult, ModelError> {
        // 1. Build Phase
        let system = ModelBuilder::new(rules).build(candidates)?;

        // 2. Search Phase
        let report = search::search(&system, &self.relaxation, self.limits);

        // 3. Projection Phase
        Ok(projection::project_roster(&system, report))
    }
}
