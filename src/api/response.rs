//! Response types for the benefit engine API.
//!
//! This module defines the classifier response bodies, the error response
//! structure, and the mapping from [`EngineError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::classifier::{ClassifierState, DecisionNode};
use crate::error::EngineError;
use crate::models::PaymentMode;

/// A question as shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    /// Id of the question.
    pub id: String,
    /// The question text.
    pub prompt: String,
    /// Answer labels, addressed by their index.
    pub options: Vec<String>,
}

impl From<&DecisionNode> for QuestionView {
    fn from(node: &DecisionNode) -> Self {
        Self {
            id: node.id.clone(),
            prompt: node.prompt.clone(),
            options: node.options.iter().map(|o| o.label.clone()).collect(),
        }
    }
}

/// Response body for the grade classifier endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClassifierResponse {
    /// Another question must be answered.
    Continue {
        /// State to send back with the next answer.
        state: ClassifierState,
        /// The question to ask.
        question: QuestionView,
    },
    /// The questionnaire produced a grade.
    Terminal {
        /// The estimated grade.
        grade: u32,
        /// How the grade is paid.
        payment_mode: PaymentMode,
        /// Schedule description of the grade, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let code = match &error {
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::InvalidStatutoryTable { .. }
            | EngineError::MalformedDecisionTree { .. } => {
                return ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details(
                        "CONFIG_ERROR",
                        "Configuration error",
                        error.to_string(),
                    ),
                };
            }
            EngineError::CalculationError { message } => {
                return ApiErrorResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    error: ApiError::with_details(
                        "CALCULATION_ERROR",
                        "Calculation failed",
                        message.clone(),
                    ),
                };
            }
            EngineError::StatutoryTableNotFound { .. } => "STATUTORY_TABLE_NOT_FOUND",
            EngineError::InsufficientWageData => "INSUFFICIENT_WAGE_DATA",
            EngineError::InvalidWageSamples { .. } => "INVALID_WAGE_SAMPLES",
            EngineError::NegativeWage { .. } => "NEGATIVE_WAGE",
            EngineError::InvalidDays { .. } => "INVALID_DAYS",
            EngineError::InvalidAge { .. } => "INVALID_AGE",
            EngineError::InvalidGrade { .. } => "INVALID_GRADE",
            EngineError::InvalidSelection { .. } => "INVALID_SELECTION",
            EngineError::InvalidClassifierState { .. } => "INVALID_CLASSIFIER_STATE",
        };
        ApiErrorResponse {
            status: StatusCode::BAD_REQUEST,
            error: ApiError::new(code, error.to_string()),
        }
    }
}
