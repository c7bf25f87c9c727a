use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::identifiers::{CandidateId, Category};

#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("Price must be a finite non-negative number, got {0}")]
    InvalidPrice(f64),
    #[error("Projected value must be a finite non-negative number, got {0}")]
    InvalidValue(f64),
}

/// The atomic unit of selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CandidateRecord")]
pub struct Candidate {
    pub id: CandidateId,
    pub category: Category,
    pub price: f64,
    pub value: f64,
    pub forced: bool,
}

/// Raw wire shape; deserialization funnels it through [`Candidate::new`]
/// so decoded candidates satisfy the same invariants as constructed ones.
#[derive(Deserialize)]
struct CandidateRecord {
    id: CandidateId,
    category: Category,
    price: f64,
    value: f64,
    forced: bool,
}

impl TryFrom<CandidateRecord> for Candidate {
    type Error = CandidateError;

    fn try_from(record: CandidateRecord) -> Result<Self, Self::Error> {
        Candidate::new(
            record.id,
            record.category,
            record.price,
            record.value,
            record.forced,
        )
    }
}

impl Candidate {
    /// Construct a Candidate.
    ///
    /// This is the ONLY way to construct a Candidate; deserialization goes
    /// through it as well. It enforces the numeric invariants: price and
    /// projected value are finite and non-negative. Candidates are
    /// immutable once constructed.
    pub fn new(
        id: CandidateId,
        category: Category,
        price: f64,
        value: f64,
        forced: bool,
    ) -> Result<Self, CandidateError> {
        if !price.is_finite() || price < 0.0 {
            return Err(CandidateError::InvalidPrice(price));
        }
        if !value.is_finite() || value < 0.0 {
            return Err(CandidateError::InvalidValue(value));
        }

        Ok(Candidate {
            id,
            category,
            price,
            value,
            forced,
        })
    }
}
