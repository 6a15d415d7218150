use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use dca_core::DcaError;
use dca_feed::FeedError;
use serde_json::json;
use thiserror::Error;

/// Everything a handler can fail with, rendered as `{"error": "<message>"}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Dca(#[from] DcaError),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("{0}")]
    BadRequest(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Dca(DcaError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Dca(DcaError::EmptySeries { .. }) => StatusCode::NOT_FOUND,
            Self::Feed(err) => match err {
                FeedError::NoData { .. } => StatusCode::NOT_FOUND,
                err if err.is_client_error() => StatusCode::BAD_REQUEST,
                FeedError::Http(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
                FeedError::Http(_) | FeedError::Decode(_) | FeedError::Vendor { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }
        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}
