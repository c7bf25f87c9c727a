//! Exact, deterministic roster optimization engine.
//!
//! `roster-core` selects a value-maximizing roster from a candidate pool
//! under a shared budget, exact per-category quotas, a cross-category flex
//! minimum, and pre-forced selections. The engine is an exact 0/1 integer
//! program — branch-and-bound over an LP relaxation — and all operations
//! are deterministic: identical inputs always produce identical outputs,
//! byte-for-byte.
//!
//! See <https://github.com/rosterenginehq/roster-engine> for the full platform.

pub mod model;
pub mod pool;
pub mod solve;
pub mod types;
