//! Average daily wage resolution.
//!
//! The average wage is the base for every other benefit. It is derived from
//! the wages of up to three months preceding the injury.

use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, AuditLog, AverageWageResult};

/// Days counted per month with a wage sample.
///
/// This is a fixed 30-day approximation, not the calendar-day count of the
/// actual months.
pub const DAYS_PER_MONTH: i64 = 30;

/// The maximum number of monthly wage samples accepted.
pub const MAX_WAGE_SAMPLES: usize = 3;

const AVERAGE_WAGE_CLAUSE: &str = "IACI art. 5(2)";

/// Resolves a representative daily wage from 1 to 3 monthly wage samples.
///
/// Months with a zero sample are treated as missing and excluded from the
/// divisor: `daily_wage = floor(sum / (non-zero months × 30))`. The
/// `monthly_wage` is `daily_wage × 30`, shown as a reference figure only.
///
/// # Errors
///
/// - `InvalidWageSamples` if there are no samples or more than three
/// - `NegativeWage` if any sample is negative
/// - `InsufficientWageData` if every sample is zero
///
/// # Examples
///
/// ```
/// use benefit_engine::calculation::resolve_average_wage;
///
/// let result = resolve_average_wage(&[3_000_000, 0, 3_100_000]).unwrap();
/// // 6,100,000 / (2 × 30) = 101,666.67 → 101,666
/// assert_eq!(result.daily_wage, 101_666);
/// assert_eq!(result.counted_months, 2);
/// ```
pub fn resolve_average_wage(samples: &[Amount]) -> EngineResult<AverageWageResult> {
    if samples.is_empty() || samples.len() > MAX_WAGE_SAMPLES {
        return Err(EngineError::InvalidWageSamples {
            count: samples.len(),
            max: MAX_WAGE_SAMPLES,
        });
    }
    if let Some(&amount) = samples.iter().find(|&&s| s < 0) {
        return Err(EngineError::NegativeWage { amount });
    }

    let counted_months = samples.iter().filter(|&&s| s > 0).count() as i64;
    if counted_months == 0 {
        return Err(EngineError::InsufficientWageData);
    }

    let total_wage = samples
        .iter()
        .try_fold(0i64, |acc, &s| acc.checked_add(s))
        .ok_or_else(|| EngineError::CalculationError {
            message: "wage total is out of range".to_string(),
        })?;

    let divisor_days = counted_months * DAYS_PER_MONTH;
    let daily_wage = total_wage / divisor_days;
    let monthly_wage = daily_wage * DAYS_PER_MONTH;

    let mut log = AuditLog::new();
    log.record(
        "wage_total",
        "Wage Total",
        AVERAGE_WAGE_CLAUSE,
        serde_json::json!({ "samples": samples }),
        serde_json::json!({
            "total_wage": total_wage,
            "counted_months": counted_months
        }),
        format!(
            "Wages of {} month(s) with pay total {}",
            counted_months, total_wage
        ),
    );
    log.record(
        "daily_wage",
        "Average Daily Wage",
        AVERAGE_WAGE_CLAUSE,
        serde_json::json!({
            "total_wage": total_wage,
            "divisor_days": divisor_days
        }),
        serde_json::json!({
            "daily_wage": daily_wage,
            "monthly_wage": monthly_wage
        }),
        format!(
            "{} ÷ ({} × {} days) = {} per day (30-day month approximation); monthly reference {}",
            total_wage, counted_months, DAYS_PER_MONTH, daily_wage, monthly_wage
        ),
    );

    Ok(AverageWageResult {
        daily_wage,
        monthly_wage,
        total_wage,
        counted_months: counted_months as u32,
        explanation: log.explanation(),
        audit_steps: log.into_steps(),
    })
}
