// File: src/error.rs
// Purpose: HTTP mapping for library errors, `{"error": "..."}` bodies

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Vitrine(#[from] vitrine::Error),

    /// The section exists but is not public
    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Vitrine(vitrine::Error::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Vitrine(vitrine::Error::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Vitrine(e) if e.is_section_local() => StatusCode::BAD_GATEWAY,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, error = %self, "request failed");
        }

        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use vitrine::{CatalogError, Error};

    #[rstest]
    #[case(Error::validation("type is required"), StatusCode::BAD_REQUEST)]
    #[case(Error::not_found("section x"), StatusCode::NOT_FOUND)]
    #[case(Error::from(CatalogError::Transport("timeout".into())), StatusCode::BAD_GATEWAY)]
    #[case(Error::PipelineAbort("db down".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_status_mapping(#[case] err: Error, #[case] status: StatusCode) {
        assert_eq!(ApiError::from(err).status(), status);
    }

    #[test]
    fn test_forbidden() {
        assert_eq!(ApiError::forbidden("not public").status(), StatusCode::FORBIDDEN);
    }
}
