//! HTTP request handlers for the benefit engine API.
//!
//! The handlers parse the request, call the calculator, and translate the
//! outcome. None of them holds state beyond the shared [`AppState`].

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    calculate_permanent_disability, calculate_temporary_disability, compare_all_grades,
    resolve_average_wage,
};
use crate::classifier::{ClassifierState, ClassifierStep, back, classify_grade, reset};
use crate::error::EngineResult;

use super::request::{
    AverageWageRequest, ClassifierBackRequest, ClassifierSelectRequest, CompareGradesRequest,
    PermanentDisabilityRequest, TemporaryDisabilityRequest,
};
use super::response::{ApiError, ApiErrorResponse, ClassifierResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/average-wage", post(average_wage_handler))
        .route("/temporary-disability", post(temporary_disability_handler))
        .route("/permanent-disability", post(permanent_disability_handler))
        .route("/permanent-disability/compare", post(compare_grades_handler))
        .route("/grade-classifier", get(classifier_start_handler))
        .route("/grade-classifier/select", post(classifier_select_handler))
        .route("/grade-classifier/back", post(classifier_back_handler))
        .with_state(state)
}

/// Handler for POST /average-wage.
async fn average_wage_handler(
    payload: Result<Json<AverageWageRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing average wage request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = resolve_average_wage(&request.samples);
    respond(correlation_id, "average_wage", start_time, result)
}

/// Handler for POST /temporary-disability.
async fn temporary_disability_handler(
    State(state): State<AppState>,
    payload: Result<Json<TemporaryDisabilityRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing temporary disability request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = state.table_for(request.as_of).and_then(|table| {
        calculate_temporary_disability(table, request.daily_wage, request.days, request.age)
    });
    respond(correlation_id, "temporary_disability", start_time, result)
}

/// Handler for POST /permanent-disability.
async fn permanent_disability_handler(
    State(state): State<AppState>,
    payload: Result<Json<PermanentDisabilityRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing permanent disability request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = state.table_for(request.as_of).and_then(|table| {
        calculate_permanent_disability(table, request.daily_wage, request.grade)
    });
    respond(correlation_id, "permanent_disability", start_time, result)
}

/// Handler for POST /permanent-disability/compare.
async fn compare_grades_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompareGradesRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing grade comparison request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = state
        .table_for(request.as_of)
        .and_then(|table| compare_all_grades(table, request.daily_wage));
    respond(correlation_id, "compare_grades", start_time, result)
}

/// Handler for GET /grade-classifier.
///
/// Starts a fresh questionnaire at the root question.
async fn classifier_start_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing classifier start request");
    let start_time = Instant::now();
    let tree = state.decision_tree();
    let result = continue_response(&state, reset(tree));
    respond(correlation_id, "classifier_start", start_time, result)
}

/// Handler for POST /grade-classifier/select.
async fn classifier_select_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClassifierSelectRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing classifier selection");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = classify_grade(state.decision_tree(), &request.state, request.option_index)
        .and_then(|step| match step {
            ClassifierStep::Continue(next) => continue_response(&state, next),
            ClassifierStep::Terminal { grade } => {
                let row = state.table_for(None)?.lookup(grade)?;
                Ok(ClassifierResponse::Terminal {
                    grade,
                    payment_mode: row.payment_mode,
                    description: row.description.clone(),
                })
            }
        });
    respond(correlation_id, "classifier_select", start_time, result)
}

/// Handler for POST /grade-classifier/back.
async fn classifier_back_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClassifierBackRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing classifier back");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = back(state.decision_tree(), &request.state)
        .and_then(|previous| continue_response(&state, previous));
    respond(correlation_id, "classifier_back", start_time, result)
}

fn continue_response(
    state: &AppState,
    classifier_state: ClassifierState,
) -> EngineResult<ClassifierResponse> {
    let question = state.decision_tree().current_node(&classifier_state)?.into();
    Ok(ClassifierResponse::Continue {
        state: classifier_state,
        question,
    })
}

/// Turns a calculator outcome into a JSON response, logging either way.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &str,
    start_time: Instant,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(
                correlation_id = %correlation_id,
                operation,
                duration_us = start_time.elapsed().as_micros(),
                "Request completed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            let api_error: ApiErrorResponse = err.into();
            api_error.into_response()
        }
    }
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    (
        StatusCode::BAD_REQUEST,
        [(header::CONTENT_TYPE, "application/json")],
        Json(error),
    )
        .into_response()
}
