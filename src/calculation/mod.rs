//! Benefit calculations.
//!
//! Each calculator is a pure function over primitive inputs and, where the
//! rules depend on statutory figures, a read-only [`StatutoryTable`]. They
//! hold no state and may be called concurrently from any number of threads.
//!
//! [`StatutoryTable`]: crate::config::StatutoryTable

mod amount;
mod average_wage;
mod permanent_disability;
mod temporary_disability;

pub use average_wage::{DAYS_PER_MONTH, MAX_WAGE_SAMPLES, resolve_average_wage};
pub use permanent_disability::{calculate_permanent_disability, compare_all_grades};
pub use temporary_disability::calculate_temporary_disability;
