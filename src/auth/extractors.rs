use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use super::dto::PublicUser;
use super::repo_types::Role;
use super::services::{resolve, Resolution, UnauthReason, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the session cookie against the store on every request.
pub struct CurrentUser(pub PublicUser);

/// Like [`CurrentUser`], but rejects users without the admin role.
pub struct AdminUser(pub PublicUser);

pub(crate) fn session_token(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_owned())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(parts);
        match resolve(state.sessions.as_ref(), token.as_deref()).await? {
            Resolution::Authenticated(user) => Ok(CurrentUser(user)),
            Resolution::Unauthenticated(UnauthReason::Expired) => Err(AppError::SessionExpired),
            Resolution::Unauthenticated(_) => Err(AppError::Unauthenticated),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            warn!(user_id = %user.id, "admin route denied");
            return Err(AppError::Forbidden);
        }
        Ok(AdminUser(user))
    }
}
