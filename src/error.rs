//! Typed errors and HTTP mapping.

use crate::model::{CustomerId, EmployeeId, StoreId};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    OwnershipMismatch(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn store_not_found(id: StoreId) -> Self {
        AppError::NotFound(format!("Pet store with ID={} does not exist.", id))
    }

    pub fn employee_not_found(id: EmployeeId) -> Self {
        AppError::NotFound(format!("Employee with ID={} does not exist.", id))
    }

    pub fn customer_not_found(id: CustomerId) -> Self {
        AppError::NotFound(format!("Customer with ID={} does not exist.", id))
    }

    pub fn employee_not_in_store(employee_id: EmployeeId, store_id: StoreId) -> Self {
        AppError::OwnershipMismatch(format!(
            "Employee with ID={} does not exist in pet store with ID={}.",
            employee_id, store_id
        ))
    }

    pub fn store_not_in_customer(store_id: StoreId, customer_id: CustomerId) -> Self {
        AppError::OwnershipMismatch(format!(
            "Pet store with ID={} not found in pet stores of customer with ID={}.",
            store_id, customer_id
        ))
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::OwnershipMismatch(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Db(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
