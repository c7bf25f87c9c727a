use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CandidateId(String);

#[derive(Debug, Error)]
pub enum CandidateIdError {
    #[error("Candidate identity must not be empty")]
    Empty,
}

impl TryFrom<String> for CandidateId {
    type Error = CandidateIdError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        CandidateId::new(raw)
    }
}

impl From<CandidateId> for String {
    fn from(id: CandidateId) -> String {
        id.0
    }
}

impl CandidateId {
    /// Create a CandidateId from a raw name/key.
    pub fn new(raw: impl Into<String>) -> Result<Self, CandidateIdError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CandidateIdError::Empty);
        }

        Ok(CandidateId(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A roster category label (position).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Category(String);

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category label must not be empty")]
    Empty,
}

impl TryFrom<String> for Category {
    type Error = CategoryError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Category::new(raw)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> String {
        category.0
    }
}

impl Category {
    /// Create a Category from a raw label.
    /// Normalization rules:
    /// - Trim surrounding whitespace
    /// - ASCII uppercase, so "qb" and "QB" denote the same category
    pub fn new(raw: impl Into<String>) -> Result<Self, CategoryError> {
        let raw = raw.into();
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.is_empty() {
            return Err(CategoryError::Empty);
        }

        Ok(Category(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Content hash of an assembled constraint model.
///
/// Two optimization requests with the same fingerprint solved the same
/// model, so their results are directly comparable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelFingerprint(String);

impl ModelFingerprint {
    pub fn from_canonical_bytes(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        ModelFingerprint(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
