//! Core data models for the benefit calculation engine.
//!
//! All monetary values are whole units of the smallest currency denomination.

mod audit;
mod benefit;
mod grade;

pub(crate) use audit::AuditLog;
pub use audit::AuditStep;
pub use benefit::{AverageWageResult, PermanentDisabilityResult, TemporaryDisabilityResult};
pub use grade::{DisabilityGradeRow, MAX_GRADE, MIN_GRADE, PaymentMode};

/// A monetary amount in the smallest currency unit.
pub type Amount = i64;
