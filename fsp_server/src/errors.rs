use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use fsp_engine::OrderFlowError;
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("{message}")]
    ValidationError { message: String, missing: Vec<String> },
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Conflict. {0}")]
    Conflict(String),
    #[error("The payment gateway could not complete the request. {0}")]
    UpstreamError(String),
}

impl ServerError {
    /// The message that is safe to return to the caller. Internal failures are reported generically; the details go
    /// to the log.
    fn public_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
            Self::InvalidRequestBody(_) | Self::AuthenticationError(_) | Self::NoRecordFound(_) | Self::Conflict(_) => {
                self.to_string()
            },
            Self::UpstreamError(_) => "The payment gateway is unavailable. Please try again later.".into(),
            Self::InitializeError(_)
            | Self::BackendError(_)
            | Self::IOError(_)
            | Self::ConfigurationError(_)
            | Self::Unspecified(_) => "An internal error occurred. Please try again later.".into(),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError { .. } => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::CouldNotIssueToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ Request failed with {status}. {self}");
        }
        let body = match self {
            Self::ValidationError { missing, .. } if !missing.is_empty() => {
                json!({ "success": false, "message": self.public_message(), "missing": missing })
            },
            _ => json!({ "success": false, "message": self.public_message() }),
        };
        HttpResponse::build(status).insert_header(ContentType::json()).body(body.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No bearer token was provided.")]
    MissingToken,
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Could not issue an access token. {0}")]
    CouldNotIssueToken(String),
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::MissingFields(missing) => Self::ValidationError {
                message: format!("Missing required fields: {}", missing.join(", ")),
                missing,
            },
            OrderFlowError::InvalidRequest(message) => Self::ValidationError { message, missing: vec![] },
            OrderFlowError::CustomerNotFound(_) => Self::NoRecordFound("Customer not found".into()),
            OrderFlowError::OrderNotFound(_) => Self::NoRecordFound("Order not found".into()),
            OrderFlowError::Conflict(s) => Self::Conflict(s),
            OrderFlowError::Upstream(s) => Self::UpstreamError(s),
            OrderFlowError::DatabaseError(s) => Self::BackendError(format!("Database error: {s}")),
        }
    }
}
