//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used by every HTTP handler.
//! `AppError` implements `actix_web::error::ResponseError` so that handler results
//! turn into status codes with a `{"error": ...}` JSON body.
//!
//! Task operations report [`TaskError`]. Its conversion depends on the kind of
//! request: reads turn store faults into 500 (`From<TaskError>`), writes turn them
//! into 400 ([`AppError::from_task_write`]).

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;
use crate::tasks::TaskError;

/// Represents all possible errors that can reach the HTTP boundary.
#[derive(Debug)]
pub enum AppError {
    /// Missing or invalid credentials (HTTP 401).
    Unauthorized(String),
    /// Malformed or unacceptable request (HTTP 400).
    BadRequest(String),
    /// Resource absent, or owned by another user (HTTP 404).
    NotFound(String),
    /// Unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Persistence fault on a read path (HTTP 500).
    DatabaseError(String),
    /// Failed input validation (HTTP 400).
    ValidationError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "error": msg
            })),
            AppError::BadRequest(msg) | AppError::ValidationError(msg) => {
                HttpResponse::BadRequest().json(json!({ "error": msg }))
            }
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "error": msg
            })),
            AppError::InternalServerError(msg) | AppError::DatabaseError(msg) => {
                HttpResponse::InternalServerError().json(json!({ "error": msg }))
            }
        }
    }
}

impl AppError {
    /// Maps a task error raised while creating, updating or deleting.
    /// Store faults become 400 here, unlike on read paths.
    pub fn from_task_write(error: TaskError) -> AppError {
        match error {
            TaskError::Store(store) => {
                log::error!("task write failed: {}", store);
                AppError::BadRequest(store.to_string())
            }
            other => other.into(),
        }
    }
}

impl From<TaskError> for AppError {
    fn from(error: TaskError) -> AppError {
        match error {
            TaskError::NotFound => AppError::NotFound(TaskError::NotFound.to_string()),
            TaskError::InvalidUpdates => {
                AppError::BadRequest(TaskError::InvalidUpdates.to_string())
            }
            TaskError::Validation(msg) => AppError::ValidationError(msg),
            TaskError::Store(store) => store.into(),
        }
    }
}

/// Duplicate keys are client errors; everything else is a database fault.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Duplicate(what) => AppError::BadRequest(format!("{} already in use", what)),
            other => {
                log::error!("store error: {}", other);
                AppError::DatabaseError(other.to_string())
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::BadRequest("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::ValidationError("description: blank".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::NotFound("Resource not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::DatabaseError("connection reset".into());
        assert_eq!(error.error_response().status(), 500);
    }

    #[test_log::test]
    fn test_store_fault_status_depends_on_direction() {
        let fault = || TaskError::Store(StoreError::InvalidWindow("skip".into()));

        let read: AppError = fault().into();
        assert_eq!(read.error_response().status(), 500);

        let write = AppError::from_task_write(fault());
        assert_eq!(write.error_response().status(), 400);
    }

    #[test]
    fn test_task_errors_keep_their_status_on_writes() {
        let not_found = AppError::from_task_write(TaskError::NotFound);
        assert_eq!(not_found.error_response().status(), 404);

        let invalid = AppError::from_task_write(TaskError::InvalidUpdates);
        assert_eq!(invalid.error_response().status(), 400);
        assert_eq!(invalid.to_string(), "Bad Request: Invalid updates!");
    }
}
