//! Disability grade schedule rows and payment modes.
//!
//! Grades run from 1 (most severe) to 14 (least severe). The grade band fixes
//! which forms of payment the worker may receive.

use serde::{Deserialize, Serialize};

/// The lowest disability grade number (most severe).
pub const MIN_GRADE: u32 = 1;

/// The highest disability grade number (least severe).
pub const MAX_GRADE: u32 = 14;

/// How a permanent-disability benefit may be paid for a grade.
///
/// # Example
///
/// ```
/// use benefit_engine::models::PaymentMode;
///
/// assert_eq!(PaymentMode::for_grade(2), Some(PaymentMode::PensionOnly));
/// assert_eq!(PaymentMode::for_grade(5), Some(PaymentMode::Choice));
/// assert_eq!(PaymentMode::for_grade(9), Some(PaymentMode::LumpSumOnly));
/// assert_eq!(PaymentMode::for_grade(15), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    /// Paid only as a monthly pension (grades 1-3).
    PensionOnly,
    /// The worker elects either the pension or the lump sum (grades 4-7).
    Choice,
    /// Paid only as a lump sum (grades 8-14).
    LumpSumOnly,
}

impl PaymentMode {
    /// Returns the payment mode the statute assigns to a grade band.
    pub fn for_grade(grade: u32) -> Option<Self> {
        match grade {
            1..=3 => Some(Self::PensionOnly),
            4..=7 => Some(Self::Choice),
            8..=14 => Some(Self::LumpSumOnly),
            _ => None,
        }
    }

    /// Returns true if the lump sum can be selected by the worker.
    pub fn offers_lump_sum(self) -> bool {
        matches!(self, Self::Choice | Self::LumpSumOnly)
    }

    /// Returns true if the pension can be selected by the worker.
    pub fn offers_pension(self) -> bool {
        matches!(self, Self::PensionOnly | Self::Choice)
    }

    /// A short label for explanations.
    pub fn label(self) -> &'static str {
        match self {
            Self::PensionOnly => "pension only",
            Self::Choice => "pension or lump sum",
            Self::LumpSumOnly => "lump sum only",
        }
    }
}

/// One row of the permanent-disability schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisabilityGradeRow {
    /// The grade number, 1..=14.
    pub grade: u32,
    /// Days of average wage paid per year as a pension, if a pension exists.
    #[serde(default)]
    pub pension_days: Option<u32>,
    /// Days of average wage paid as a one-off lump sum.
    pub lump_sum_days: u32,
    /// Which payments may be made for this grade.
    pub payment_mode: PaymentMode,
    /// Human-readable summary of the grade.
    #[serde(default)]
    pub description: Option<String>,
}
