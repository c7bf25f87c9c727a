pub mod identifiers;
pub mod roster_bundle;

pub use identifiers::{CandidateId, CandidateIdError, Category, CategoryError, ModelFingerprint};
pub use roster_bundle::{
    RosterResult, RosterTotals, SelectedCandidate, SolveMetadata, SolveStatus,
};
