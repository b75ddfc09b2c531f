use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::services::cleared_cookie;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not logged in or session expired")]
    Unauthenticated,

    /// Same 401 as `Unauthenticated`, but also tells the client to drop its cookie.
    #[error("Not logged in or session expired")]
    SessionExpired,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Store(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::SessionExpired => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Store(e) = &self {
            error!(error = ?e, "store failure");
        }
        let body = ErrorBody {
            success: false,
            error: self.to_string(),
        };
        let status = self.status();
        if matches!(self, AppError::SessionExpired) {
            return (status, CookieJar::new().add(cleared_cookie()), Json(body)).into_response();
        }
        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_hide_their_cause() {
        let err = AppError::from(anyhow::anyhow!("connection refused"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::SessionExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::BadRequest("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn expired_session_response_clears_cookie() {
        let res = AppError::SessionExpired.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let cookie = res.headers()["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("session_token="));
        assert!(cookie.contains("Max-Age=0"));

        let res = AppError::Unauthenticated.into_response();
        assert!(res.headers().get("set-cookie").is_none());
    }
}
