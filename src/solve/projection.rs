use crate::model::constraints::ConstraintSystem;
use crate::solve::search::{Assignment, SearchOutcome, SearchReport};
use crate::types::roster_bundle::{
    RosterResult, RosterTotals, SelectedCandidate, SolveMetadata, SolveStatus,
};

/// Map a search report back onto candidate records.
///
/// Roster order: forced candidates first in original order, then newly
/// selected candidates in original order. An infeasible (or empty
/// best-effort) report projects to an explicitly marked empty roster,
/// never a silent zero one.
pub fn project_roster(system: &ConstraintSystem, report: SearchReport) -> RosterResult {
    let (status, assignment) = match report.outcome {
        SearchOutcome::Optimal(a) => (SolveStatus::Optimal, Some(a)),
        SearchOutcome::BestEffort(a) => (SolveStatus::BestEffort, a),
        SearchOutcome::Infeasible => (SolveStatus::Infeasible, None),
    };

    let selected = match &assignment {
        Some(a) => roster_order(system, a),
        None => Vec::new(),
    };

    let totals = RosterTotals {
        value: selected.iter().map(|c| c.value).sum(),
        price: selected.iter().map(|c| c.price).sum(),
        count: selected.len(),
    };

    debug_assert!(
        assignment.is_none() || totals.price <= system.original_budget + crate::solve::TOLERANCE,
        "selected roster overspends the original budget"
    );

    RosterResult {
        status,
        selected,
        totals,
        solve: SolveMetadata {
            model: system.fingerprint.as_str().to_string(),
            budget: system.original_budget,
            candidates_considered: system.pool_size(),
            forced_count: system.forced.len(),
            nodes_explored: report.nodes,
        },
    }
}

fn roster_order(system: &ConstraintSystem, assignment: &Assignment) -> Vec<SelectedCandidate> {
    let mut roster = Vec::with_capacity(system.forced.len());

    for candidate in &system.forced {
        roster.push(SelectedCandidate {
            id: candidate.id.as_str().to_string(),
            category: candidate.category.as_str().to_string(),
            price: candidate.price,
            value: candidate.value,
            forced: true,
        });
    }
    for (candidate, &picked) in system.decisions.iter().zip(&assignment.selected) {
        if picked {
            roster.push(SelectedCandidate {
                id: candidate.id.as_str().to_string(),
                category: candidate.category.as_str().to_string(),
                price: candidate.price,
                value: candidate.value,
                forced: false,
            });
        }
    }

    roster
}
