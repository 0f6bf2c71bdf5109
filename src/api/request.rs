//! Request types for the benefit engine API.
//!
//! Calculator requests that depend on statutory figures accept an optional
//! `as_of` date selecting which table applies. Without it the latest table is
//! used.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierState;
use crate::models::Amount;

/// Request body for `POST /average-wage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AverageWageRequest {
    /// One to three monthly wages preceding the injury. Zero marks a month
    /// with no pay.
    pub samples: Vec<Amount>,
}

/// Request body for `POST /temporary-disability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporaryDisabilityRequest {
    /// The average daily wage.
    pub daily_wage: Amount,
    /// Number of leave days.
    pub days: i64,
    /// The worker's age, if known.
    #[serde(default)]
    pub age: Option<u32>,
    /// Date selecting the statutory table.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Request body for `POST /permanent-disability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermanentDisabilityRequest {
    /// The average daily wage.
    pub daily_wage: Amount,
    /// The assigned disability grade, 1..=14.
    pub grade: u32,
    /// Date selecting the statutory table.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Request body for `POST /permanent-disability/compare`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareGradesRequest {
    /// The average daily wage.
    pub daily_wage: Amount,
    /// Date selecting the statutory table.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Request body for `POST /grade-classifier/select`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierSelectRequest {
    /// The state returned by the previous classifier call.
    pub state: ClassifierState,
    /// Zero-based index of the chosen answer.
    pub option_index: usize,
}

/// Request body for `POST /grade-classifier/back`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierBackRequest {
    /// The state returned by the previous classifier call.
    pub state: ClassifierState,
}
