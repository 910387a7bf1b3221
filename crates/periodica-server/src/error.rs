// Error handling for the HTTP layer
// Maps PeriodicaError carried inside anyhow::Error onto the response envelope

use std::fmt::{Display, Formatter};

use actix_web::HttpResponse;
use tracing::{error, warn};

pub use periodica_common::PeriodicaError;
pub use periodica_common::error::{
    CONFIGURATION_ERROR, DATA_ACCESS_ERROR, ErrorCode, PARAMETER_VALIDATE_ERROR,
    RESOURCE_CONFLICT, SERVER_ERROR,
};

use crate::model::response as common;

// Local wrapper for application errors to implement actix-web error handling
// (Cannot impl foreign trait for foreign type due to orphan rules)
#[derive(Debug)]
pub struct AppError {
    inner: anyhow::Error,
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(value: anyhow::Error) -> Self {
        AppError { inner: value }
    }
}

impl From<PeriodicaError> for AppError {
    fn from(value: PeriodicaError) -> Self {
        AppError {
            inner: value.into(),
        }
    }
}

impl AppError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    pub fn downcast_ref<E: std::error::Error + Send + Sync + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    fn status_and_code(&self) -> (u16, &'static ErrorCode<'static>) {
        match self.downcast_ref::<PeriodicaError>() {
            Some(PeriodicaError::IllegalArgument(_)) => (400, &PARAMETER_VALIDATE_ERROR),
            Some(PeriodicaError::ConfigError(_)) => (500, &CONFIGURATION_ERROR),
            Some(PeriodicaError::BackendUnavailable(_)) => (503, &SERVER_ERROR),
            Some(PeriodicaError::DatabaseError(_)) | Some(PeriodicaError::StorageError(_)) => {
                (500, &DATA_ACCESS_ERROR)
            }
            Some(PeriodicaError::ConstraintViolation(_)) => (409, &RESOURCE_CONFLICT),
            None => (500, &SERVER_ERROR),
        }
    }
}

impl actix_web::error::ResponseError for AppError {
    // `message` names the error class, `data` carries the detail
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = self.status_and_code();
        let detail = match self.downcast_ref::<PeriodicaError>() {
            Some(e) => e.to_string(),
            None => htmlescape::encode_minimal(format!("caused: {}", self.inner).as_str()),
        };

        if status >= 500 {
            error!(status, code = error_code.code, error = %self.inner, "Request failed");
        } else {
            warn!(status, code = error_code.code, error = %self.inner, "Request rejected");
        }

        common::Result::<String>::http_response(
            status,
            error_code.code,
            error_code.message.to_string(),
            detail,
        )
    }
}
