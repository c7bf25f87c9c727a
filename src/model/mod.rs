pub mod builder;
pub mod constraints;

pub use builder::{ModelBuilder, ModelError};
pub use constraints::{ConstraintSystem, LinearConstraint, Sense};
