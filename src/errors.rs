use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::NotFound { .. } => Self::not_found(err.to_string()),
            _ => Self::unprocessable(err.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

/// Validation and lookup failures raised by record collections.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("{store} record not found: {id}")]
    NotFound { store: &'static str, id: String },

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("unknown stall: {0}")]
    UnknownStall(String),

    #[error("departure date {departure} is before arrival date {arrival}")]
    DepartureBeforeArrival { arrival: String, departure: String },

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("{field} must be a finite number no greater than {max}")]
    OutOfRange { field: &'static str, max: f64 },

    #[error("category {category:?} is not a valid {kind} category")]
    UnknownCategory { kind: &'static str, category: String },
}
