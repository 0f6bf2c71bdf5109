//! Error types for the benefit calculation engine.
//!
//! Every failure is a local validation failure of a single invocation. None of
//! them is transient, so callers should surface them rather than retry.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the benefit calculation engine.
///
/// # Example
///
/// ```
/// use benefit_engine::error::EngineError;
///
/// let error = EngineError::InvalidGrade { grade: 15 };
/// assert_eq!(error.to_string(), "Invalid disability grade 15: must be between 1 and 14");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The statutory table violates one of its structural invariants.
    #[error("Invalid statutory table: {message}")]
    InvalidStatutoryTable {
        /// What was wrong with the table.
        message: String,
    },

    /// No statutory table was in effect on the requested date.
    #[error("No statutory table in effect on {date}")]
    StatutoryTableNotFound {
        /// The date for which a table was requested.
        date: NaiveDate,
    },

    /// The grade classifier questionnaire is not a well-formed tree.
    #[error("Malformed decision tree: {message}")]
    MalformedDecisionTree {
        /// What was wrong with the tree.
        message: String,
    },

    /// No wage sample was greater than zero.
    #[error("Insufficient wage data: at least one monthly wage must be greater than zero")]
    InsufficientWageData,

    /// The number of wage samples was outside the accepted range.
    #[error("Invalid wage samples: expected between 1 and {max} monthly amounts, got {count}")]
    InvalidWageSamples {
        /// The number of samples supplied.
        count: usize,
        /// The maximum number of samples accepted.
        max: usize,
    },

    /// A wage amount was negative.
    #[error("Negative wage: {amount}")]
    NegativeWage {
        /// The offending amount.
        amount: i64,
    },

    /// The number of leave days was zero or negative.
    #[error("Invalid leave days {days}: must be greater than zero")]
    InvalidDays {
        /// The offending day count.
        days: i64,
    },

    /// The supplied age was zero.
    #[error("Invalid age {age}: must be greater than zero")]
    InvalidAge {
        /// The offending age.
        age: u32,
    },

    /// The disability grade was outside 1..=14.
    #[error("Invalid disability grade {grade}: must be between 1 and 14")]
    InvalidGrade {
        /// The offending grade.
        grade: u32,
    },

    /// The selected option does not exist on the current question.
    #[error("Invalid selection {index} for question '{node_id}' ({available} options)")]
    InvalidSelection {
        /// The question being answered.
        node_id: String,
        /// The option index that was selected.
        index: usize,
        /// The number of options on the question.
        available: usize,
    },

    /// A classifier state is not a path the questionnaire can take.
    #[error("Invalid classifier state at question '{node_id}': unknown or not reachable along the given history")]
    InvalidClassifierState {
        /// The first question where the state stops being a valid path.
        node_id: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
