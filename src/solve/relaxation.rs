use crate::model::constraints::{LinearConstraint, Sense};
use crate::solve::TOLERANCE;

/// Pivot eligibility threshold. Tighter than the public [`TOLERANCE`] so
/// pivoting noise stays well below anything the search layer rounds on.
const PIVOT_EPS: f64 = 1e-9;

/// A continuous relaxation: maximize `objective · x` subject to the rows,
/// with every variable confined to [0, 1].
#[derive(Debug, Clone)]
pub struct LpProblem {
    pub objective: Vec<f64>,
    pub rows: Vec<LinearConstraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LpOutcome {
    Infeasible,
    Optimal { value: f64, solution: Vec<f64> },
}

/// The relaxation-bound capability of the engine.
///
/// Internal by design: the engine must stay self-sufficient, so the
/// shipped [`DenseSimplex`] is a small embedded routine rather than an
/// external solver binding.
pub trait RelaxationSolver {
    fn solve(&self, lp: &LpProblem) -> LpOutcome;
}

/// Two-phase dense simplex.
///
/// Bland's rule picks both the entering and the leaving variable, so
/// pivoting is deterministic and cannot cycle. The [0, 1] bounds are
/// explicit rows, which keeps the tableau a plain dense matrix.
#[derive(Default)]
pub struct DenseSimplex;

impl RelaxationSolver for DenseSimplex {
    fn solve(&self, lp: &LpProblem) -> LpOutcome {
        Tableau::assemble(lp).run()
    }
}

struct Tableau {
    /// m rows of `cols` coefficients plus the rhs in the last slot.
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    /// Structural (decision) variable count.
    n: usize,
    /// First artificial column; columns beyond it never enter in phase 2.
    art_start: usize,
    cols: usize,
    objective: Vec<f64>,
}

impl Tableau {
    fn assemble(lp: &LpProblem) -> Tableau {
        let n = lp.objective.len();

        // 1. Normalize every row to rhs >= 0, then append the x_j <= 1 rows
        let mut norm: Vec<(Vec<f64>, Sense, f64)> = Vec::with_capacity(lp.rows.len() + n);
        for row in &lp.rows {
            debug_assert_eq!(row.coeffs.len(), n);
            if row.rhs < 0.0 {
                let coeffs = row.coeffs.iter().map(|c| -c).collect();
                let sense = match row.sense {
                    Sense::Le => Sense::Ge,
                    Sense::Ge => Sense::Le,
                    Sense::Eq => Sense::Eq,
                };
                norm.push((coeffs, sense, -row.rhs));
            } else {
                norm.push((row.coeffs.clone(), row.sense, row.rhs));
            }
        }
        for j in 0..n {
            let mut coeffs = vec![0.0; n];
            coeffs[j] = 1.0;
            norm.push((coeffs, Sense::Le, 1.0));
        }

        // 2. Column layout: structural, then slack/surplus, then artificial
        let n_aux = norm.iter().filter(|(_, s, _)| *s != Sense::Eq).count();
        let n_art = norm.iter().filter(|(_, s, _)| *s != Sense::Le).count();
        let art_start = n + n_aux;
        let cols = art_start + n_art;

        let mut rows = Vec::with_capacity(norm.len());
        let mut basis = Vec::with_capacity(norm.len());
        let mut next_aux = n;
        let mut next_art = art_start;
        for (coeffs, sense, rhs) in norm {
            let mut row = vec![0.0; cols + 1];
            row[..n].copy_from_slice(&coeffs);
            row[cols] = rhs;
            match sense {
                Sense::Le => {
                    row[next_aux] = 1.0;
                    basis.push(next_aux);
                    next_aux += 1;
                }
                Sense::Ge => {
                    row[next_aux] = -1.0;
                    next_aux += 1;
                    row[next_art] = 1.0;
                    basis.push(next_art);
                    next_art += 1;
                }
                Sense::Eq => {
                    row[next_art] = 1.0;
                    basis.push(next_art);
                    next_art += 1;
                }
            }
            rows.push(row);
        }

        Tableau {
            rows,
            basis,
            n,
            art_start,
            cols,
            objective: lp.objective.clone(),
        }
    }

    fn run(mut self) -> LpOutcome {
        // Phase 1: drive the artificials to zero
        if self.art_start < self.cols {
            let mut cost = vec![0.0; self.cols];
            for c in cost[self.art_start..].iter_mut() {
                *c = -1.0;
            }
            let mut brow = self.price_out(&cost);
            self.pivot_to_optimum(&mut brow, self.cols);

            // brow carries -z in its last slot, and phase-1 z is minus the
            // artificial sum, so this is the residual infeasibility.
            if brow[self.cols] > TOLERANCE {
                return LpOutcome::Infeasible;
            }
            self.expel_artificials();
        }

        // Phase 2: maximize the true objective, artificials barred
        let mut cost = vec![0.0; self.cols];
        cost[..self.n].copy_from_slice(&self.objective);
        let mut brow = self.price_out(&cost);
        self.pivot_to_optimum(&mut brow, self.art_start);

        let mut solution = vec![0.0; self.n];
        for (i, &b) in self.basis.iter().enumerate() {
            if b < self.n {
                solution[b] = self.rows[i][self.cols];
            }
        }
        let value = solution
            .iter()
            .zip(&self.objective)
            .map(|(x, c)| x * c)
            .sum();

        LpOutcome::Optimal { value, solution }
    }

    /// Reduced-cost row for `cost` under the current basis:
    /// `brow[j] = c_j - c_B · B⁻¹ A_j`, with `-z` in the rhs slot.
    fn price_out(&self, cost: &[f64]) -> Vec<f64> {
        let mut brow = vec![0.0; self.cols + 1];
        brow[..self.cols].copy_from_slice(cost);
        for (i, &b) in self.basis.iter().enumerate() {
            let cb = cost[b];
            if cb != 0.0 {
                for j in 0..=self.cols {
                    brow[j] -= cb * self.rows[i][j];
                }
            }
        }
        brow
    }

    /// Pivot until no column below `limit` has a positive reduced cost.
    fn pivot_to_optimum(&mut self, brow: &mut [f64], limit: usize) {
        // Bland's rule terminates on its own; the cap is a hard stop
        // against numerical corner cases, never reached on clean input.
        let max_pivots = 50 * (self.rows.len() + self.cols + 1);
        for _ in 0..max_pivots {
            let Some(jc) = (0..limit).find(|&j| brow[j] > PIVOT_EPS) else {
                break;
            };

            // Ratio test; ties resolved by the smallest basis index
            let mut leave: Option<(usize, f64)> = None;
            for i in 0..self.rows.len() {
                let a = self.rows[i][jc];
                if a > PIVOT_EPS {
                    let ratio = self.rows[i][self.cols] / a;
                    leave = match leave {
                        None => Some((i, ratio)),
                        Some((li, lr)) => {
                            if ratio < lr - PIVOT_EPS
                                || ((ratio - lr).abs() <= PIVOT_EPS
                                    && self.basis[i] < self.basis[li])
                            {
                                Some((i, ratio))
                            } else {
                                Some((li, lr))
                            }
                        }
                    };
                }
            }
            // Every variable is bounded, so a leaving row always exists
            let Some((r, _)) = leave else {
                debug_assert!(false, "unbounded pivot column {jc} in a box-constrained LP");
                break;
            };

            self.pivot(r, jc);
            let factor = brow[jc];
            for j in 0..=self.cols {
                brow[j] -= factor * self.rows[r][j];
            }
        }
    }

    /// Make column `jc` basic in row `r`, preserving canonical form.
    fn pivot(&mut self, r: usize, jc: usize) {
        let denom = self.rows[r][jc];
        for v in self.rows[r].iter_mut() {
            *v /= denom;
        }
        let pivot_row = self.rows[r].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i != r {
                let factor = row[jc];
                if factor != 0.0 {
                    for (v, p) in row.iter_mut().zip(&pivot_row) {
                        *v -= factor * p;
                    }
                }
            }
        }
        self.basis[r] = jc;
    }

    /// After phase 1, pivot any artificial still basic (at value zero) out
    /// of the basis; rows that cannot be pivoted are redundant and dropped.
    fn expel_artificials(&mut self) {
        let mut i = 0;
        while i < self.rows.len() {
            if self.basis[i] >= self.art_start {
                if let Some(j) =
                    (0..self.art_start).find(|&j| self.rows[i][j].abs() > PIVOT_EPS)
                {
                    self.pivot(i, j);
                    i += 1;
                } else {
                    self.rows.remove(i);
                    self.basis.remove(i);
                }
            } else {
                i += 1;
            }
        }
    }
}
