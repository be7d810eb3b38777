use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use protocol::{ErrorBody, NegotiationError};

use crate::session::SessionError;
use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    #[error("Unrecognised Accept Type")]
    NotAcceptable,

    #[error("Unsupported Content Type - {0}")]
    UnsupportedMediaType(String),

    #[error("Error: Request body too large, max allowed is {0} bytes")]
    PayloadTooLarge(usize),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Failed Validation: {0}")]
    Codec(#[from] protocol::CodecError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(String),
}

/// Messages of an error response, attached to the response extensions so
/// middleware can inspect them without parsing the body.
#[derive(Debug, Clone)]
pub struct ErrorMessages(pub Vec<String>);

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(vec![message.into()])
    }

    pub fn messages(&self) -> Vec<String> {
        match self {
            ApiError::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

impl From<NegotiationError> for ApiError {
    fn from(err: NegotiationError) -> Self {
        match err {
            NegotiationError::NotAcceptable { .. } => ApiError::NotAcceptable,
            NegotiationError::UnsupportedMediaType { content_type } => {
                ApiError::UnsupportedMediaType(content_type)
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(messages) => ApiError::Validation(messages),
            StoreError::NotFound(id) => {
                ApiError::NotFound(format!("Could not find an instance with todos/{}", id))
            }
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(id) => {
                ApiError::NotFound(format!("Could not find a challenger with id {}", id))
            }
            SessionError::InvalidId(id) => {
                ApiError::validation(format!("Invalid challenger id {}", id))
            }
            SessionError::IdMismatch { path, payload } => ApiError::validation(format!(
                "Challenger id in payload {} does not match {}",
                payload, path
            )),
            SessionError::Token(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Codec(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if let ApiError::Internal(detail) = self {
            log::error!("Internal error: {}", detail);
        }

        let messages = self.messages();
        let mut builder = HttpResponse::build(status);
        if matches!(self, ApiError::Unauthorized(_)) {
            builder.insert_header(("WWW-Authenticate", r#"Basic realm="User Visible Realm""#));
        }

        let mut response = builder.json(ErrorBody::new(messages.clone()));
        response.extensions_mut().insert(ErrorMessages(messages));
        response
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
