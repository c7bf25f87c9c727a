use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::types::identifiers::Category;

/// Exact required counts per category.
///
/// Counts are signed so a caller-supplied negative quota is representable;
/// the model builder rejects it before any search begins.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaTable {
    inner: BTreeMap<Category, i64>,
}

impl QuotaTable {
    pub fn new() -> Self {
        QuotaTable {
            inner: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, category: Category, count: i64) {
        self.inner.insert(category, count);
    }

    /// Required count for a category; categories absent from the table
    /// carry no strict requirement.
    pub fn get(&self, category: &Category) -> Option<i64> {
        self.inner.get(category).copied()
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.inner.contains_key(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, i64)> {
        self.inner.iter().map(|(c, n)| (c, *n))
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// A minimum count drawn from a declared subset of categories, counted in
/// addition to the strict per-category quotas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlexQuota {
    pub min: i64,
    pub categories: BTreeSet<Category>,
}

impl FlexQuota {
    pub fn new(min: i64, categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            min,
            categories: categories.into_iter().collect(),
        }
    }

    /// A flex quota that constrains nothing.
    pub fn none() -> Self {
        Self {
            min: 0,
            categories: BTreeSet::new(),
        }
    }

    pub fn is_eligible(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }
}

// Key point:
// Serializable
// Comparable
// Plain structured values, not tied to any storage or transport format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRules {
    pub budget: f64,
    pub quotas: QuotaTable,
    pub flex: FlexQuota,
}

impl RosterRules {
    pub fn new(budget: f64, quotas: QuotaTable, flex: FlexQuota) -> Self {
        Self {
            budget,
            quotas,
            flex,
        }
    }
}
