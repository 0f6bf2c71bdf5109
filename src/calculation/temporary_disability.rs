//! Temporary-disability (sick-leave) benefit calculation.
//!
//! The benefit replaces part of the worker's income for each day of medical
//! leave. The rules are applied in this order:
//!
//! 1. Base rate: 70% of the average daily wage.
//! 2. Low-income special case: if the base amount, before truncation, is at
//!    or below the low-income threshold, 90% of the wage is paid instead,
//!    limited to the threshold.
//! 3. Floor: on the low-income path the daily amount is raised to at least
//!    the daily minimum wage.
//! 4. Cap: the daily amount never exceeds the maximum compensation standard.
//! 5. Older workers: from age 61 the amount is scaled down by the bracket
//!    rate relative to the base rate.
//! 6. Total: the daily amount times the number of leave days.

use tracing::debug;

use crate::config::StatutoryTable;
use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, AuditLog, TemporaryDisabilityResult};

use super::amount::{apply_rate, apply_ratio, multiply_days, rated_at_most};

const BASE_RATE_CLAUSE: &str = "IACI art. 52";
const SPECIAL_CASE_CLAUSE: &str = "IACI art. 54(1)";
const MINIMUM_WAGE_CLAUSE: &str = "IACI art. 54(2)";
const MAXIMUM_CLAUSE: &str = "IACI art. 36(7)";
const AGE_REDUCTION_CLAUSE: &str = "IACI art. 55";

/// Calculates the temporary-disability benefit for a period of leave.
///
/// # Arguments
///
/// * `table` - The statutory table in effect
/// * `daily_wage` - The average daily wage
/// * `days` - Number of leave days
/// * `age` - The worker's age, if known; enables the older-worker reduction
///
/// # Errors
///
/// - `NegativeWage` if `daily_wage` is negative
/// - `InvalidDays` if `days` is zero or negative
/// - `InvalidAge` if `age` is `Some(0)`
///
/// # Examples
///
/// ```no_run
/// use benefit_engine::calculation::calculate_temporary_disability;
/// use benefit_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/kr_iaci")?;
/// let result = calculate_temporary_disability(loader.current_table(), 100_000, 30, None)?;
/// assert_eq!(result.daily_amount, 70_000);
/// assert_eq!(result.total_amount, 2_100_000);
/// # Ok::<(), benefit_engine::error::EngineError>(())
/// ```
pub fn calculate_temporary_disability(
    table: &StatutoryTable,
    daily_wage: Amount,
    days: i64,
    age: Option<u32>,
) -> EngineResult<TemporaryDisabilityResult> {
    if daily_wage < 0 {
        return Err(EngineError::NegativeWage { amount: daily_wage });
    }
    if days <= 0 {
        return Err(EngineError::InvalidDays { days });
    }
    if age == Some(0) {
        return Err(EngineError::InvalidAge { age: 0 });
    }

    let policy = table.policy();
    let mut log = AuditLog::new();

    let candidate = apply_rate(daily_wage, policy.base_rate)?;
    log.record(
        "base_rate",
        "Base Rate",
        BASE_RATE_CLAUSE,
        serde_json::json!({
            "daily_wage": daily_wage,
            "base_rate": policy.base_rate.to_string()
        }),
        serde_json::json!({ "candidate_daily": candidate }),
        format!(
            "Average wage {} × {} = {} per day",
            daily_wage,
            policy.base_rate.normalize(),
            candidate
        ),
    );

    let mut applied_rate = policy.base_rate;
    let is_special_case =
        rated_at_most(daily_wage, policy.base_rate, policy.low_income_threshold)?;
    let mut daily_amount = candidate;

    if is_special_case {
        let special = apply_rate(daily_wage, policy.special_rate)?;
        daily_amount = special.min(policy.low_income_threshold);
        applied_rate = policy.special_rate;
        debug!(daily_wage, special, daily_amount, "Low-income special case applied");
        log.record(
            "low_income_special_case",
            "Low-Income Special Case",
            SPECIAL_CASE_CLAUSE,
            serde_json::json!({
                "candidate_daily": candidate,
                "low_income_threshold": policy.low_income_threshold,
                "special_rate": policy.special_rate.to_string()
            }),
            serde_json::json!({ "daily_amount": daily_amount }),
            format!(
                "Low-income special case: {} × {} is at or below {}, so {} × {} = {} applies (limited to {})",
                daily_wage,
                policy.base_rate.normalize(),
                policy.low_income_threshold,
                daily_wage,
                policy.special_rate.normalize(),
                special,
                policy.low_income_threshold
            ),
        );

        if daily_amount < policy.min_daily {
            log.record(
                "minimum_wage_floor",
                "Minimum Wage Floor",
                MINIMUM_WAGE_CLAUSE,
                serde_json::json!({
                    "daily_amount": daily_amount,
                    "min_daily": policy.min_daily
                }),
                serde_json::json!({ "daily_amount": policy.min_daily }),
                format!(
                    "Minimum wage floor: {} raised to {} per day",
                    daily_amount, policy.min_daily
                ),
            );
            daily_amount = policy.min_daily;
        }
    }

    if daily_amount > policy.max_daily {
        log.record(
            "maximum_cap",
            "Maximum Compensation Cap",
            MAXIMUM_CLAUSE,
            serde_json::json!({
                "daily_amount": daily_amount,
                "max_daily": policy.max_daily
            }),
            serde_json::json!({ "daily_amount": policy.max_daily }),
            format!(
                "Maximum cap: {} limited to {} per day",
                daily_amount, policy.max_daily
            ),
        );
        daily_amount = policy.max_daily;
    }

    let bracket = age.and_then(|age| table.age_reduction_for(age).map(|b| (age, b)));
    let is_age_reduction = bracket.is_some();
    if let Some((age, bracket)) = bracket {
        let reduced = apply_ratio(daily_amount, bracket.rate, policy.base_rate)?;
        debug!(age, from = daily_amount, to = reduced, "Older-worker reduction applied");
        log.record(
            "age_reduction",
            "Older-Worker Reduction",
            AGE_REDUCTION_CLAUSE,
            serde_json::json!({
                "age": age,
                "bracket_from_age": bracket.from_age,
                "bracket_rate": bracket.rate.to_string(),
                "daily_amount": daily_amount
            }),
            serde_json::json!({ "daily_amount": reduced }),
            format!(
                "Age {} reduction: {} × {}/{} = {} per day",
                age,
                daily_amount,
                bracket.rate.normalize(),
                policy.base_rate.normalize(),
                reduced
            ),
        );
        daily_amount = reduced;
    }

    let total_amount = multiply_days(daily_amount, days)?;
    log.record(
        "leave_total",
        "Leave Total",
        BASE_RATE_CLAUSE,
        serde_json::json!({ "daily_amount": daily_amount, "days": days }),
        serde_json::json!({ "total_amount": total_amount }),
        format!(
            "Total: {} × {} days = {}",
            daily_amount, days, total_amount
        ),
    );

    Ok(TemporaryDisabilityResult {
        daily_amount,
        total_amount,
        applied_rate,
        is_special_case,
        is_age_reduction,
        explanation: log.explanation(),
        audit_steps: log.into_steps(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::{dec, test_table};
    use proptest::prelude::*;

    // ==========================================================================
    // Standard rate
    // ==========================================================================
    #[test]
    fn test_standard_rate_100000_for_30_days() {
        let table = test_table();
        let result = calculate_temporary_disability(&table, 100_000, 30, None).unwrap();

        assert_eq!(result.daily_amount, 70_000);
        assert_eq!(result.total_amount, 2_100_000);
        assert_eq!(result.applied_rate, dec("0.70"));
        assert!(!result.is_special_case);
        assert!(!result.is_age_reduction);
    }

    #[test]
    fn test_standard_rate_truncates() {
        let table = test_table();
        // 123,457 × 0.7 = 86,419.9
        let result = calculate_temporary_disability(&table, 123_457, 1, None).unwrap();
        assert_eq!(result.daily_amount, 86_419);
    }

    #[test]
    fn test_just_above_threshold_is_not_special() {
        let table = test_table();
        // 91,705 × 0.7 = 64,193.5 → 64,193
        let result = calculate_temporary_disability(&table, 91_705, 10, None).unwrap();
        assert!(!result.is_special_case);
        assert_eq!(result.daily_amount, 64_193);
    }

    // ==========================================================================
    // Low-income special case and floor
    // ==========================================================================
    #[test]
    fn test_low_income_50000_for_30_days() {
        let table = test_table();
        let result = calculate_temporary_disability(&table, 50_000, 30, None).unwrap();

        assert!(result.is_special_case);
        assert_eq!(result.applied_rate, dec("0.90"));
        assert_eq!(result.daily_amount, 80_240);
        assert_eq!(result.total_amount, 2_407_200);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let table = test_table();
        // 91,702 × 0.7 = 64,191.4, at or below the threshold
        let result = calculate_temporary_disability(&table, 91_702, 1, None).unwrap();
        assert!(result.is_special_case);
        assert_eq!(result.applied_rate, dec("0.90"));
        assert_eq!(result.daily_amount, 80_240);
    }

    #[test]
    fn test_fraction_above_threshold_is_not_special() {
        let table = test_table();
        // 91,703 × 0.7 = 64,192.1 and 91,704 × 0.7 = 64,192.8: both above
        // 64,192 even though they truncate to it
        for wage in [91_703, 91_704] {
            let result = calculate_temporary_disability(&table, wage, 1, None).unwrap();
            assert!(!result.is_special_case, "wage {wage}");
            assert_eq!(result.applied_rate, dec("0.70"));
            assert_eq!(result.daily_amount, 64_192);
        }
    }

    #[test]
    fn test_zero_wage_gets_floor() {
        let table = test_table();
        let result = calculate_temporary_disability(&table, 0, 5, None).unwrap();
        assert!(result.is_special_case);
        assert_eq!(result.daily_amount, 80_240);
        assert_eq!(result.total_amount, 401_200);
    }

    #[test]
    fn test_special_case_explanation_lists_rules() {
        let table = test_table();
        let result = calculate_temporary_disability(&table, 50_000, 30, None).unwrap();

        let rule_ids: Vec<&str> = result
            .audit_steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec![
                "base_rate",
                "low_income_special_case",
                "minimum_wage_floor",
                "leave_total"
            ]
        );
        assert!(result.explanation.contains("Low-income special case"));
        assert!(result.explanation.contains("Minimum wage floor"));
        assert!(result.explanation.contains("2407200"));
    }

    // ==========================================================================
    // Cap
    // ==========================================================================
    #[test]
    fn test_high_wage_is_capped() {
        let table = test_table();
        let result = calculate_temporary_disability(&table, 400_000, 10, None).unwrap();

        assert_eq!(result.daily_amount, 262_910);
        assert_eq!(result.total_amount, 2_629_100);
        assert!(result.explanation.contains("Maximum cap"));
    }

    // ==========================================================================
    // Older workers
    // ==========================================================================
    #[test]
    fn test_age_60_is_not_reduced() {
        let table = test_table();
        let result = calculate_temporary_disability(&table, 100_000, 30, Some(60)).unwrap();
        assert!(!result.is_age_reduction);
        assert_eq!(result.daily_amount, 70_000);
    }

    #[test]
    fn test_age_63_reduction() {
        let table = test_table();
        // 70,000 × 0.58 / 0.70 = 58,000
        let result = calculate_temporary_disability(&table, 100_000, 30, Some(63)).unwrap();
        assert!(result.is_age_reduction);
        assert_eq!(result.daily_amount, 58_000);
        assert_eq!(result.total_amount, 1_740_000);
        assert!(result.explanation.contains("Age 63 reduction"));
    }

    #[test]
    fn test_age_70_uses_last_bracket() {
        let table = test_table();
        // 70,000 × 0.50 / 0.70 = 50,000
        let result = calculate_temporary_disability(&table, 100_000, 1, Some(70)).unwrap();
        assert_eq!(result.daily_amount, 50_000);
    }

    #[test]
    fn test_age_61_reduction_after_floor() {
        let table = test_table();
        // 80,240 × 0.66 / 0.70 = 75,654.86
        let result = calculate_temporary_disability(&table, 50_000, 1, Some(61)).unwrap();
        assert!(result.is_special_case);
        assert!(result.is_age_reduction);
        assert_eq!(result.daily_amount, 75_654);
    }

    // ==========================================================================
    // Validation
    // ==========================================================================
    #[test]
    fn test_zero_days_rejected() {
        let table = test_table();
        assert!(matches!(
            calculate_temporary_disability(&table, 100_000, 0, None),
            Err(EngineError::InvalidDays { days: 0 })
        ));
    }

    #[test]
    fn test_negative_days_rejected() {
        let table = test_table();
        assert!(matches!(
            calculate_temporary_disability(&table, 100_000, -5, None),
            Err(EngineError::InvalidDays { days: -5 })
        ));
    }

    #[test]
    fn test_negative_wage_rejected() {
        let table = test_table();
        assert!(matches!(
            calculate_temporary_disability(&table, -1, 30, None),
            Err(EngineError::NegativeWage { amount: -1 })
        ));
    }

    #[test]
    fn test_zero_age_rejected() {
        let table = test_table();
        assert!(matches!(
            calculate_temporary_disability(&table, 100_000, 30, Some(0)),
            Err(EngineError::InvalidAge { age: 0 })
        ));
    }

    // ==========================================================================
    // Properties
    // ==========================================================================
    proptest! {
        #[test]
        fn prop_daily_amount_never_exceeds_cap(wage in 0i64..10_000_000, days in 1i64..400) {
            let table = test_table();
            let result = calculate_temporary_disability(&table, wage, days, None).unwrap();
            prop_assert!(result.daily_amount <= table.policy().max_daily);
            prop_assert_eq!(result.total_amount, result.daily_amount * days);
        }

        #[test]
        fn prop_low_income_path_is_floored(wage in 0i64..91_703, days in 1i64..400) {
            let table = test_table();
            let result = calculate_temporary_disability(&table, wage, days, None).unwrap();
            prop_assert!(result.is_special_case);
            prop_assert!(result.daily_amount >= table.policy().min_daily);
        }

        #[test]
        fn prop_standard_path_is_monotonic(
            wage in 91_703i64..5_000_000,
            raise in 0i64..1_000_000,
            days in 1i64..400,
            age in proptest::option::of(18u32..90),
        ) {
            let table = test_table();
            let lower = calculate_temporary_disability(&table, wage, days, age).unwrap();
            let higher = calculate_temporary_disability(&table, wage + raise, days, age).unwrap();
            prop_assert!(higher.total_amount >= lower.total_amount);
        }

        #[test]
        fn prop_is_idempotent(wage in 0i64..1_000_000, days in 1i64..400, age in proptest::option::of(1u32..100)) {
            let table = test_table();
            let first = calculate_temporary_disability(&table, wage, days, age).unwrap();
            let second = calculate_temporary_disability(&table, wage, days, age).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
