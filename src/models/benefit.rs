//! Benefit result models.
//!
//! These are the value objects returned by the calculators. They are created
//! per invocation and never mutated afterwards.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Amount, AuditStep, PaymentMode};

/// The representative daily wage derived from monthly wage samples.
///
/// # Example
///
/// ```
/// use benefit_engine::calculation::resolve_average_wage;
///
/// let result = resolve_average_wage(&[3_000_000, 3_000_000, 3_000_000]).unwrap();
/// assert_eq!(result.daily_wage, 100_000);
/// assert_eq!(result.monthly_wage, 3_000_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageWageResult {
    /// The average daily wage, truncated toward zero.
    pub daily_wage: Amount,
    /// The daily wage multiplied by 30, shown as a reference figure only.
    pub monthly_wage: Amount,
    /// Sum of the wage samples.
    pub total_wage: Amount,
    /// Number of months with a non-zero sample (the divisor months).
    pub counted_months: u32,
    /// Human-readable trace of the calculation.
    pub explanation: String,
    /// The audit steps behind the explanation.
    pub audit_steps: Vec<AuditStep>,
}

/// The temporary-disability (sick-leave) benefit for a period of leave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryDisabilityResult {
    /// The benefit paid per day of leave.
    pub daily_amount: Amount,
    /// The benefit for the whole leave period.
    pub total_amount: Amount,
    /// The rate applied to the daily wage (base rate or the low-income rate).
    pub applied_rate: Decimal,
    /// True if the low-income special rate replaced the base rate.
    pub is_special_case: bool,
    /// True if the older-worker reduction was applied.
    pub is_age_reduction: bool,
    /// Human-readable trace listing which rules fired.
    pub explanation: String,
    /// The audit steps behind the explanation.
    pub audit_steps: Vec<AuditStep>,
}

/// The permanent-disability benefit for a grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermanentDisabilityResult {
    /// The grade the amounts were computed for.
    pub grade: u32,
    /// Which of the amounts may legally be selected.
    pub payment_mode: PaymentMode,
    /// The one-off lump sum. Informational only for pension-only grades.
    pub lump_sum_amount: Amount,
    /// The monthly pension instalment, 0 when the grade carries no pension.
    pub pension_monthly_amount: Amount,
    /// The yearly pension amount, 0 when the grade carries no pension.
    pub pension_annual_amount: Amount,
    /// Lump-sum day multiplier used.
    pub lump_sum_days: u32,
    /// Pension day multiplier used, if any.
    pub pension_days: Option<u32>,
    /// Human-readable trace of the calculation.
    pub explanation: String,
    /// The audit steps behind the explanation.
    pub audit_steps: Vec<AuditStep>,
}

impl PermanentDisabilityResult {
    /// Returns the lump sum if the worker may select it.
    pub fn selectable_lump_sum(&self) -> Option<Amount> {
        self.payment_mode
            .offers_lump_sum()
            .then_some(self.lump_sum_amount)
    }

    /// Returns the monthly pension if the worker may select it.
    pub fn selectable_pension(&self) -> Option<Amount> {
        self.payment_mode
            .offers_pension()
            .then_some(self.pension_monthly_amount)
    }
}
