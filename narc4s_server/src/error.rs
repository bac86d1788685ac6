use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use narc4s_core::{
    raffle::error::RaffleError,
    twitter::error::FetchError,
};
use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};

pub const INTERNAL_ERROR_MESSAGE: &str = "Failed to process raffle. Please try again later.";

#[derive(Debug)]
pub struct ErrorServer {
    pub message: String,
    pub status: u16,
    pub details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorServer {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: status.into(),
            details: None,
        }
    }
}

impl std::fmt::Display for ErrorServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ErrorServer {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            success: false,
            error: self.message,
            details: self.details,
        };
        (status, Json(body)).into_response()
    }
}

impl From<RaffleError> for ErrorServer {
    fn from(err: RaffleError) -> Self {
        let status = match &err {
            RaffleError::MissingParameters
            | RaffleError::InvalidTweetUrl
            | RaffleError::UnsupportedRaffleType
            | RaffleError::InvalidRaffleType
            | RaffleError::InvalidWinnerCount { .. }
            | RaffleError::InvalidBackupCount { .. }
            | RaffleError::InsufficientParticipants { .. } => StatusCode::BAD_REQUEST,
            RaffleError::NoParticipants(_) => StatusCode::NOT_FOUND,
            RaffleError::Fetch(FetchError::RateLimited(_)) => StatusCode::TOO_MANY_REQUESTS,
            RaffleError::Fetch(FetchError::Upstream(detail)) => {
                return ErrorServer {
                    message: INTERNAL_ERROR_MESSAGE.to_string(),
                    status: StatusCode::INTERNAL_SERVER_ERROR.into(),
                    details: Some(detail.clone()),
                };
            }
        };

        ErrorServer::new(status, err.to_string())
    }
}

impl From<JsonRejection> for ErrorServer {
    fn from(rejection: JsonRejection) -> Self {
        ErrorServer {
            message: "Invalid request body".to_string(),
            status: StatusCode::BAD_REQUEST.into(),
            details: Some(rejection.body_text()),
        }
    }
}
