// lib/src/boundary.rs

//! Translation of engine results into transport-neutral responses.

use chrono::{DateTime, Utc};
use log::{log, Level};
use serde::{Deserialize, Serialize};

use models::errors::{ErrorCode, PrescriptionError};

const UNEXPECTED_ERROR: &str = "An unexpected error occurred.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
}

/// Status code and reason phrase for each failure kind.
pub fn status_for(code: ErrorCode) -> (u16, &'static str) {
    match code {
        ErrorCode::InvalidPrescription | ErrorCode::DuplicatePrescription => (400, "Bad Request"),
        ErrorCode::UserNotFound
        | ErrorCode::SlotNotFound
        | ErrorCode::PatientNotFound
        | ErrorCode::PrescriptionNotFound => (404, "Not Found"),
        ErrorCode::StoreUnavailable => (500, "Internal Server Error"),
    }
}

impl ErrorResponse {
    pub fn new(status: u16, error: &str, message: impl Into<String>) -> Self {
        ErrorResponse {
            timestamp: Utc::now(),
            status,
            error: error.to_string(),
            message: message.into(),
        }
    }

    /// Reply for a listing that matched nothing.
    pub fn no_content(message: impl Into<String>) -> Self {
        Self::new(204, "No Content", message)
    }

    pub fn is_success(&self) -> bool {
        self.status < 300
    }
}

/// Unexpected store failures are errors; everything else is the caller's fault.
pub fn log_level_for(code: ErrorCode) -> Level {
    match code {
        ErrorCode::StoreUnavailable => Level::Error,
        _ => Level::Warn,
    }
}

impl From<&PrescriptionError> for ErrorResponse {
    fn from(err: &PrescriptionError) -> Self {
        let code = err.code();
        let (status, reason) = status_for(code);
        match err {
            // Store internals stay out of the response body.
            PrescriptionError::StoreUnavailable(cause) => {
                log!(log_level_for(code), "Unexpected error occurred: {}", cause);
                ErrorResponse::new(status, reason, UNEXPECTED_ERROR)
            }
            other => {
                let response = ErrorResponse::new(status, reason, other.to_string());
                log!(log_level_for(code), "Error Response: {:?}", response);
                response
            }
        }
    }
}

impl From<PrescriptionError> for ErrorResponse {
    fn from(err: PrescriptionError) -> Self {
        ErrorResponse::from(&err)
    }
}
