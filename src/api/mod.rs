//! HTTP API for the benefit engine.
//!
//! A thin JSON layer over the calculators and the grade classifier. Callers
//! hold the classifier state themselves and send it back with every answer.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AverageWageRequest, ClassifierBackRequest, ClassifierSelectRequest, CompareGradesRequest,
    PermanentDisabilityRequest, TemporaryDisabilityRequest,
};
pub use response::{ApiError, ApiErrorResponse, ClassifierResponse, QuestionView};
pub use state::AppState;
