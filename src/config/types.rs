//! Statutory table types.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML configuration files, and the validated [`StatutoryTable`] the
//! calculators read from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{Amount, DisabilityGradeRow, MAX_GRADE, MIN_GRADE, PaymentMode};

/// Metadata about the statutory schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Short code identifying the schedule (e.g., "KR-IACI").
    pub code: String,
    /// The human-readable name of the schedule.
    pub name: String,
    /// The version of the schedule data.
    pub version: String,
    /// URL to the governing statute.
    pub source_url: String,
}

/// A reduction bracket for older workers.
///
/// From `from_age` onwards, the benefit is paid at `rate` of the daily wage
/// instead of the base rate, until the next bracket starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeReductionBracket {
    /// The first age (inclusive) this bracket applies to.
    pub from_age: u32,
    /// The replacement rate applied from this age.
    pub rate: Decimal,
}

/// Scalar policy constants in effect from a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConstants {
    /// The date from which these constants apply.
    pub effective_date: NaiveDate,
    /// Share of the daily wage paid as temporary-disability benefit.
    pub base_rate: Decimal,
    /// Share of the daily wage paid under the low-income special case.
    pub special_rate: Decimal,
    /// The statutory minimum compensation standard (per day).
    pub minimum_compensation_base: Amount,
    /// Share of the minimum compensation standard that sets the low-income
    /// threshold.
    pub low_income_ratio: Decimal,
    /// Benefit level at or below which the low-income special case applies.
    /// Must equal `minimum_compensation_base × low_income_ratio`, truncated.
    pub low_income_threshold: Amount,
    /// Daily floor applied on the low-income path (daily minimum wage).
    pub min_daily: Amount,
    /// Daily cap on the temporary-disability benefit.
    pub max_daily: Amount,
    /// Older-worker reduction brackets, ascending by starting age.
    #[serde(default)]
    pub age_reduction: Vec<AgeReductionBracket>,
}

/// Named scalar policy constants, for lookup by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyConstant {
    /// See [`PolicyConstants::base_rate`].
    BaseRate,
    /// See [`PolicyConstants::special_rate`].
    SpecialRate,
    /// See [`PolicyConstants::minimum_compensation_base`].
    MinimumCompensationBase,
    /// See [`PolicyConstants::low_income_ratio`].
    LowIncomeRatio,
    /// See [`PolicyConstants::low_income_threshold`].
    LowIncomeThreshold,
    /// See [`PolicyConstants::min_daily`].
    MinDaily,
    /// See [`PolicyConstants::max_daily`].
    MaxDaily,
}

/// Grade schedule file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct GradesConfig {
    /// The rows of the schedule.
    pub grades: Vec<DisabilityGradeRow>,
}

/// A validated, immutable statutory table.
///
/// A revision of the statute ships as a new table; tables are never mutated,
/// so a single instance can be shared across threads without locking.
///
/// # Example
///
/// ```no_run
/// use benefit_engine::config::{ConfigLoader, PolicyConstant};
///
/// let loader = ConfigLoader::load("./config/kr_iaci")?;
/// let table = loader.current_table();
/// let row = table.lookup(1)?;
/// assert_eq!(row.pension_days, Some(329));
/// println!("base rate: {}", table.constant(PolicyConstant::BaseRate));
/// # Ok::<(), benefit_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatutoryTable {
    metadata: TableMetadata,
    policy: PolicyConstants,
    /// Sorted so that the row for grade `g` is at index `g - 1`.
    grades: Vec<DisabilityGradeRow>,
}

impl StatutoryTable {
    /// Builds a table, checking every structural invariant.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStatutoryTable` if the grade schedule does not hold
    /// exactly one row per grade 1..=14 in the right payment band, or if the
    /// policy constants are inconsistent.
    pub fn new(
        metadata: TableMetadata,
        policy: PolicyConstants,
        grades: Vec<DisabilityGradeRow>,
    ) -> EngineResult<Self> {
        validate_policy(&policy)?;

        let mut grades = grades;
        grades.sort_by_key(|row| row.grade);
        validate_grades(&grades)?;

        Ok(Self {
            metadata,
            policy,
            grades,
        })
    }

    /// Returns the schedule metadata.
    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    /// Returns the policy constants.
    pub fn policy(&self) -> &PolicyConstants {
        &self.policy
    }

    /// Returns the date from which this table applies.
    pub fn effective_date(&self) -> NaiveDate {
        self.policy.effective_date
    }

    /// Returns all grade rows, ordered from grade 1 to grade 14.
    pub fn grades(&self) -> &[DisabilityGradeRow] {
        &self.grades
    }

    /// Looks up the schedule row for a grade.
    ///
    /// # Errors
    ///
    /// Returns `InvalidGrade` if `grade` is outside 1..=14.
    pub fn lookup(&self, grade: u32) -> EngineResult<&DisabilityGradeRow> {
        if !(MIN_GRADE..=MAX_GRADE).contains(&grade) {
            return Err(EngineError::InvalidGrade { grade });
        }
        self.grades
            .get((grade - MIN_GRADE) as usize)
            .ok_or(EngineError::InvalidGrade { grade })
    }

    /// Looks up a scalar policy constant by name.
    pub fn constant(&self, constant: PolicyConstant) -> Decimal {
        let policy = &self.policy;
        match constant {
            PolicyConstant::BaseRate => policy.base_rate,
            PolicyConstant::SpecialRate => policy.special_rate,
            PolicyConstant::MinimumCompensationBase => {
                Decimal::from(policy.minimum_compensation_base)
            }
            PolicyConstant::LowIncomeRatio => policy.low_income_ratio,
            PolicyConstant::LowIncomeThreshold => Decimal::from(policy.low_income_threshold),
            PolicyConstant::MinDaily => Decimal::from(policy.min_daily),
            PolicyConstant::MaxDaily => Decimal::from(policy.max_daily),
        }
    }

    /// Returns the reduction bracket that applies at `age`, if any.
    pub fn age_reduction_for(&self, age: u32) -> Option<&AgeReductionBracket> {
        self.policy
            .age_reduction
            .iter()
            .rfind(|bracket| bracket.from_age <= age)
    }
}

fn invalid(message: String) -> EngineError {
    EngineError::InvalidStatutoryTable { message }
}

fn is_rate(value: Decimal) -> bool {
    value > Decimal::ZERO && value <= Decimal::ONE
}

fn validate_policy(policy: &PolicyConstants) -> EngineResult<()> {
    if !is_rate(policy.base_rate) {
        return Err(invalid(format!(
            "base_rate {} must be in (0, 1]",
            policy.base_rate
        )));
    }
    if !is_rate(policy.special_rate) {
        return Err(invalid(format!(
            "special_rate {} must be in (0, 1]",
            policy.special_rate
        )));
    }
    if !is_rate(policy.low_income_ratio) {
        return Err(invalid(format!(
            "low_income_ratio {} must be in (0, 1]",
            policy.low_income_ratio
        )));
    }
    let amounts = [
        ("minimum_compensation_base", policy.minimum_compensation_base),
        ("low_income_threshold", policy.low_income_threshold),
        ("min_daily", policy.min_daily),
        ("max_daily", policy.max_daily),
    ];
    if let Some((name, value)) = amounts.iter().find(|(_, value)| *value <= 0) {
        return Err(invalid(format!("{name} must be positive, got {value}")));
    }
    let expected_threshold = Decimal::from(policy.minimum_compensation_base)
        .checked_mul(policy.low_income_ratio)
        .map(|threshold| threshold.trunc());
    if expected_threshold != Some(Decimal::from(policy.low_income_threshold)) {
        return Err(invalid(format!(
            "low_income_threshold {} does not match minimum_compensation_base {} × low_income_ratio {}",
            policy.low_income_threshold,
            policy.minimum_compensation_base,
            policy.low_income_ratio.normalize()
        )));
    }
    if policy.min_daily > policy.max_daily {
        return Err(invalid(format!(
            "min_daily {} exceeds max_daily {}",
            policy.min_daily, policy.max_daily
        )));
    }

    let mut previous_age = None;
    for bracket in &policy.age_reduction {
        if previous_age.is_some_and(|age| bracket.from_age <= age) {
            return Err(invalid(format!(
                "age_reduction brackets must be strictly ascending (found {} after {})",
                bracket.from_age,
                previous_age.unwrap_or_default()
            )));
        }
        if !is_rate(bracket.rate) || bracket.rate > policy.base_rate {
            return Err(invalid(format!(
                "age_reduction rate {} for age {} must be in (0, base_rate]",
                bracket.rate, bracket.from_age
            )));
        }
        previous_age = Some(bracket.from_age);
    }

    Ok(())
}

/// Expects `grades` to be sorted by grade.
fn validate_grades(grades: &[DisabilityGradeRow]) -> EngineResult<()> {
    let expected = (MAX_GRADE - MIN_GRADE + 1) as usize;
    if grades.len() != expected {
        return Err(invalid(format!(
            "expected {expected} grade rows, found {}",
            grades.len()
        )));
    }

    for (row, grade) in grades.iter().zip(MIN_GRADE..=MAX_GRADE) {
        if row.grade != grade {
            return Err(invalid(format!(
                "grade {grade} is missing or duplicated (found grade {})",
                row.grade
            )));
        }
        if PaymentMode::for_grade(grade) != Some(row.payment_mode) {
            return Err(invalid(format!(
                "grade {grade} has payment mode {:?}, which is not allowed for its band",
                row.payment_mode
            )));
        }
        let has_pension = row.payment_mode != PaymentMode::LumpSumOnly;
        match row.pension_days {
            Some(_) if !has_pension => {
                return Err(invalid(format!(
                    "grade {grade} is lump-sum only but declares pension days"
                )));
            }
            None if has_pension => {
                return Err(invalid(format!(
                    "grade {grade} allows a pension but declares no pension days"
                )));
            }
            Some(0) => {
                return Err(invalid(format!("grade {grade} has zero pension days")));
            }
            _ => {}
        }
        if row.lump_sum_days == 0 {
            return Err(invalid(format!("grade {grade} has zero lump-sum days")));
        }
    }

    Ok(())
}
