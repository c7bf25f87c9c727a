use serde::{Deserialize, Serialize};

use crate::model::constraints::{ConstraintSystem, LinearConstraint, Sense};
use crate::solve::relaxation::{LpOutcome, LpProblem, RelaxationSolver};
use crate::solve::TOLERANCE;
use crate::types::identifiers::CandidateId;

/// Optional search budget. With no limit the search always terminates with
/// a proof (optimal or infeasible); with a node limit exhausted mid-search
/// the best incumbent is returned labeled possibly-non-optimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    pub max_nodes: Option<u64>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self { max_nodes: None }
    }

    pub fn node_budget(max_nodes: u64) -> Self {
        Self {
            max_nodes: Some(max_nodes),
        }
    }
}

/// A feasible integer assignment over the decision variables.
/// `value` includes the forced candidates' projected value.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub selected: Vec<bool>,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// Proven optimal.
    Optimal(Assignment),
    /// Node budget ran out; the incumbent (if any) is feasible but not
    /// proven optimal.
    BestEffort(Option<Assignment>),
    /// No assignment satisfies every constraint. A normal outcome.
    Infeasible,
}

#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub nodes: u64,
}

/// Exact branch-and-bound over the LP relaxation.
pub fn search<R: RelaxationSolver>(
    system: &ConstraintSystem,
    relaxation: &R,
    limits: SearchLimits,
) -> SearchReport {
    let mut ctx = SearchContext {
        system,
        relaxation,
        limits,
        incumbent: None,
        nodes: 0,
        truncated: false,
    };

    let mut fixed = vec![None; system.num_decisions()];
    ctx.explore(&mut fixed);

    if let Some(best) = ctx.incumbent.as_mut() {
        lex_augment(system, best);
    }

    let outcome = match (ctx.incumbent, ctx.truncated) {
        (Some(best), false) => SearchOutcome::Optimal(best),
        (best, true) => SearchOutcome::BestEffort(best),
        (None, false) => SearchOutcome::Infeasible,
    };
    SearchReport {
        outcome,
        nodes: ctx.nodes,
    }
}

/// The incumbent lives here and nowhere else, threaded through the
/// recursion by `&mut self`. Pruning never depends on exploration order
/// beyond the fixed 0-before-1 branch rule, so the result is a pure
/// function of the constraint system.
struct SearchContext<'a, R> {
    system: &'a ConstraintSystem,
    relaxation: &'a R,
    limits: SearchLimits,
    incumbent: Option<Assignment>,
    nodes: u64,
    truncated: bool,
}

impl<R: RelaxationSolver> SearchContext<'_, R> {
    fn explore(&mut self, fixed: &mut Vec<Option<bool>>) {
        if self.truncated {
            return;
        }
        if let Some(max) = self.limits.max_nodes {
            if self.nodes >= max {
                self.truncated = true;
                return;
            }
        }
        self.nodes += 1;

        // 1. Relaxation bound for this node
        let (lp, free) = self.reduced_problem(fixed);
        let (relaxed_value, solution) = match self.relaxation.solve(&lp) {
            LpOutcome::Infeasible => return,
            LpOutcome::Optimal { value, solution } => (value, solution),
        };

        let fixed_value: f64 = fixed
            .iter()
            .zip(&self.system.decisions)
            .filter(|(f, _)| **f == Some(true))
            .map(|(_, c)| c.value)
            .sum();
        let bound = self.system.forced_value + fixed_value + relaxed_value;

        // 2. Prune only when strictly worse than the incumbent, so branches
        // holding equal-value assignments stay open for the tie-break
        if let Some(inc) = &self.incumbent {
            if bound < inc.value - TOLERANCE {
                return;
            }
        }

        // 3. Branch variable: fractional value closest to 0.5, ties by
        // lowest candidate identity
        let mut branch: Option<(usize, f64)> = None;
        for (k, &x) in solution.iter().enumerate() {
            if x > TOLERANCE && x < 1.0 - TOLERANCE {
                let dist = (x - 0.5).abs();
                branch = match branch {
                    None => Some((k, dist)),
                    Some((bk, bd)) => {
                        if dist < bd - TOLERANCE
                            || ((dist - bd).abs() <= TOLERANCE
                                && self.system.decisions[free[k]].id
                                    < self.system.decisions[free[bk]].id)
                        {
                            Some((k, dist))
                        } else {
                            Some((bk, bd))
                        }
                    }
                };
            }
        }

        match branch {
            None => {
                // Integral relaxation: this node is solved
                let mut selected: Vec<bool> = fixed.iter().map(|f| *f == Some(true)).collect();
                for (k, &x) in solution.iter().enumerate() {
                    if x > 0.5 {
                        selected[free[k]] = true;
                    }
                }
                // Recompute the value exactly from the integer assignment
                // rather than trusting relaxation arithmetic
                let value = self.system.forced_value
                    + selected
                        .iter()
                        .zip(&self.system.decisions)
                        .filter(|(s, _)| **s)
                        .map(|(_, c)| c.value)
                        .sum::<f64>();
                self.offer_incumbent(Assignment { selected, value });
            }
            Some((k, _)) => {
                let d = free[k];
                fixed[d] = Some(false);
                self.explore(fixed);
                fixed[d] = Some(true);
                self.explore(fixed);
                fixed[d] = None;
            }
        }
    }

    /// The node's LP over the still-free variables: fixed-to-1 candidates
    /// are substituted into every rhs, fixed-to-0 candidates drop out.
    /// Returns the LP plus the free-index → decision-index mapping.
    fn reduced_problem(&self, fixed: &[Option<bool>]) -> (LpProblem, Vec<usize>) {
        let mut free: Vec<usize> = (0..fixed.len()).filter(|&i| fixed[i].is_none()).collect();
        // Column order follows candidate identity, so Bland's smallest-index
        // rule lands on the lexicographically smaller candidate whenever the
        // relaxation has alternate optima
        free.sort_by(|&a, &b| self.system.decisions[a].id.cmp(&self.system.decisions[b].id));

        let rows = self
            .system
            .rows
            .iter()
            .map(|row| {
                let committed: f64 = row
                    .coeffs
                    .iter()
                    .zip(fixed)
                    .filter(|(_, f)| **f == Some(true))
                    .map(|(c, _)| c)
                    .sum();
                LinearConstraint {
                    coeffs: free.iter().map(|&i| row.coeffs[i]).collect(),
                    sense: row.sense,
                    rhs: row.rhs - committed,
                }
            })
            .collect();

        let objective = free.iter().map(|&i| self.system.objective[i]).collect();

        (LpProblem { objective, rows }, free)
    }

    /// Replace the incumbent on a strictly better value, or on an equal
    /// value (within tolerance) with a lexicographically smaller id set.
    fn offer_incumbent(&mut self, candidate: Assignment) {
        let replace = match &self.incumbent {
            None => true,
            Some(inc) => {
                if candidate.value > inc.value + TOLERANCE {
                    true
                } else if (candidate.value - inc.value).abs() <= TOLERANCE {
                    self.selected_ids(&candidate) < self.selected_ids(inc)
                } else {
                    false
                }
            }
        };
        if replace {
            self.incumbent = Some(candidate);
        }
    }

    /// The full roster identity sequence: forced candidates are part of
    /// every assignment's selected set, so they take part in the
    /// comparison too.
    fn selected_ids(&self, assignment: &Assignment) -> Vec<&CandidateId> {
        let mut ids: Vec<&CandidateId> = self
            .system
            .forced
            .iter()
            .map(|c| &c.id)
            .chain(
                assignment
                    .selected
                    .iter()
                    .zip(&self.system.decisions)
                    .filter(|(s, _)| **s)
                    .map(|(_, c)| &c.id),
            )
            .collect();
        ids.sort();
        ids
    }
}

/// Fold zero-value candidates into the final assignment when doing so
/// makes the sorted roster identity sequence lexicographically smaller.
///
/// A candidate with no projected value never enters a relaxation optimum
/// on its own, so the alternate optimum that merely adds it is invisible
/// to the search. The value is unchanged; every row is re-checked before
/// a candidate is switched on. Ascending id order keeps the earliest
/// improving id first when the budget cannot hold them all.
fn lex_augment(system: &ConstraintSystem, assignment: &mut Assignment) {
    let mut order: Vec<usize> = (0..system.decisions.len()).collect();
    order.sort_by(|&a, &b| system.decisions[a].id.cmp(&system.decisions[b].id));

    for idx in order {
        if assignment.selected[idx] {
            continue;
        }
        let candidate = &system.decisions[idx];
        if candidate.value > TOLERANCE {
            continue;
        }
        if !sorts_before_a_member(system, assignment, &candidate.id) {
            continue;
        }
        if admits(system, &assignment.selected, idx) {
            assignment.selected[idx] = true;
            assignment.value += candidate.value;
        }
    }
}

/// Appending an id at the tail of the sorted roster only lengthens the
/// sequence; the insertion improves it exactly when some member (forced
/// included) sorts after the new id.
fn sorts_before_a_member(
    system: &ConstraintSystem,
    assignment: &Assignment,
    id: &CandidateId,
) -> bool {
    system
        .forced
        .iter()
        .map(|c| &c.id)
        .chain(
            assignment
                .selected
                .iter()
                .zip(&system.decisions)
                .filter(|(s, _)| **s)
                .map(|(_, c)| &c.id),
        )
        .any(|member| member > id)
}

/// Every row still holds with `idx` switched on.
fn admits(system: &ConstraintSystem, selected: &[bool], idx: usize) -> bool {
    system.rows.iter().all(|row| {
        let sum: f64 = row
            .coeffs
            .iter()
            .zip(selected)
            .filter(|(_, s)| **s)
            .map(|(c, _)| c)
            .sum::<f64>()
            + row.coeffs[idx];
        match row.sense {
            Sense::Le => sum <= row.rhs + TOLERANCE,
            Sense::Eq => (sum - row.rhs).abs() <= TOLERANCE,
            Sense::Ge => sum >= row.rhs - TOLERANCE,
        }
    })
}
