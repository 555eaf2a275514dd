use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use crate::{db::models::AuthUser, names, rejections::AppError, AppState};

/// Extracts whether the request is an HTMX request by checking the `HX-Request` header.
pub struct IsHtmx(pub bool);

impl<S: Send + Sync> FromRequestParts<S> for IsHtmx {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_htmx = parts
            .headers
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "true");
        Ok(IsHtmx(is_htmx))
    }
}

async fn session_user(parts: &Parts, state: &AppState) -> Option<AuthUser> {
    let jar = CookieJar::from_headers(&parts.headers);
    let session_id = jar.get(names::USER_SESSION_COOKIE_NAME)?.value().to_string();

    match state.db.get_user_by_session(&session_id).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("could not look up session: {e:?}");
            None
        }
    }
}

/// Guard extractor that verifies the user session cookie against the database.
/// Carries the authenticated user's info for use in handlers.
pub struct AuthGuard(pub AuthUser);

impl FromRequestParts<AppState> for AuthGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        session_user(parts, state)
            .await
            .map(AuthGuard)
            .ok_or(AppError::Unauthorized)
    }
}

/// The logged-in user, if any. Public pages use this instead of `AuthGuard`.
pub struct CurrentUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(session_user(parts, state).await))
    }
}
