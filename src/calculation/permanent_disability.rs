//! Permanent-disability benefit calculation.
//!
//! The schedule row for the grade gives day multipliers for the lump sum and,
//! for grades 1-7, the yearly pension. The row's payment mode tells the
//! caller which of the two amounts may actually be selected.

use tracing::debug;

use crate::config::StatutoryTable;
use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, AuditLog, MAX_GRADE, MIN_GRADE, PermanentDisabilityResult};

use super::amount::multiply_days;

const LUMP_SUM_CLAUSE: &str = "IACI art. 57, Annex 2";
const PENSION_CLAUSE: &str = "IACI art. 57(2), Annex 2";
const MONTHS_PER_YEAR: i64 = 12;

/// Calculates the permanent-disability benefit for a grade.
///
/// The grade is checked against the schedule even when it came from the
/// grade classifier.
///
/// # Errors
///
/// - `NegativeWage` if `daily_wage` is negative
/// - `InvalidGrade` if `grade` is outside 1..=14
///
/// # Examples
///
/// ```no_run
/// use benefit_engine::calculation::calculate_permanent_disability;
/// use benefit_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/kr_iaci")?;
/// let result = calculate_permanent_disability(loader.current_table(), 100_000, 1)?;
/// assert_eq!(result.pension_monthly_amount, 2_741_666);
/// # Ok::<(), benefit_engine::error::EngineError>(())
/// ```
pub fn calculate_permanent_disability(
    table: &StatutoryTable,
    daily_wage: Amount,
    grade: u32,
) -> EngineResult<PermanentDisabilityResult> {
    if daily_wage < 0 {
        return Err(EngineError::NegativeWage { amount: daily_wage });
    }
    let row = table.lookup(grade)?;
    let mut log = AuditLog::new();

    let lump_sum_amount = multiply_days(daily_wage, i64::from(row.lump_sum_days))?;
    let lump_sum_note = if row.payment_mode.offers_lump_sum() {
        ""
    } else {
        " (informational, not selectable)"
    };
    log.record(
        "lump_sum",
        "Lump Sum",
        LUMP_SUM_CLAUSE,
        serde_json::json!({
            "daily_wage": daily_wage,
            "grade": grade,
            "lump_sum_days": row.lump_sum_days
        }),
        serde_json::json!({ "lump_sum_amount": lump_sum_amount }),
        format!(
            "Grade {} lump sum: {} × {} days = {}{}",
            grade, daily_wage, row.lump_sum_days, lump_sum_amount, lump_sum_note
        ),
    );

    let (pension_annual_amount, pension_monthly_amount) = match row.pension_days {
        Some(pension_days) => {
            let annual = multiply_days(daily_wage, i64::from(pension_days))?;
            let monthly = annual / MONTHS_PER_YEAR;
            log.record(
                "pension",
                "Disability Pension",
                PENSION_CLAUSE,
                serde_json::json!({
                    "daily_wage": daily_wage,
                    "grade": grade,
                    "pension_days": pension_days
                }),
                serde_json::json!({
                    "pension_annual_amount": annual,
                    "pension_monthly_amount": monthly
                }),
                format!(
                    "Grade {} pension: {} × {} days = {} per year, {} per month",
                    grade, daily_wage, pension_days, annual, monthly
                ),
            );
            (annual, monthly)
        }
        None => {
            log.record(
                "pension",
                "Disability Pension",
                PENSION_CLAUSE,
                serde_json::json!({ "grade": grade }),
                serde_json::json!({ "pension_monthly_amount": 0 }),
                format!("Grade {} carries no pension", grade),
            );
            (0, 0)
        }
    };

    log.record(
        "payment_mode",
        "Payment Mode",
        LUMP_SUM_CLAUSE,
        serde_json::json!({ "grade": grade }),
        serde_json::to_value(row.payment_mode).unwrap_or(serde_json::Value::Null),
        format!("Grade {} is paid as {}", grade, row.payment_mode.label()),
    );

    debug!(grade, lump_sum_amount, pension_monthly_amount, "Permanent disability calculated");

    Ok(PermanentDisabilityResult {
        grade,
        payment_mode: row.payment_mode,
        lump_sum_amount,
        pension_monthly_amount,
        pension_annual_amount,
        lump_sum_days: row.lump_sum_days,
        pension_days: row.pension_days,
        explanation: log.explanation(),
        audit_steps: log.into_steps(),
    })
}

/// Calculates the permanent-disability benefit for every grade, 1 through 14.
///
/// Useful for showing a worker how the amounts change across the schedule
/// before a grade is assigned.
///
/// # Errors
///
/// Returns `NegativeWage` if `daily_wage` is negative, or `CalculationError`
/// if an amount overflows.
pub fn compare_all_grades(
    table: &StatutoryTable,
    daily_wage: Amount,
) -> EngineResult<Vec<PermanentDisabilityResult>> {
    (MIN_GRADE..=MAX_GRADE)
        .map(|grade| calculate_permanent_disability(table, daily_wage, grade))
        .collect()
}
