pub mod candidate;
pub mod rules;

pub use crate::types::identifiers::{CandidateId, Category};
pub use candidate::{Candidate, CandidateError};
pub use rules::{FlexQuota, QuotaTable, RosterRules};
