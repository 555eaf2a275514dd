use axum::{extract::State, routing::get, Router};

use crate::{
    extractors::{AuthGuard, IsHtmx},
    rejections::{AppError, ResultExt},
    views, AppState,
};

use crate::views::quiz as quiz_views;

pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard))
}

async fn dashboard(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let data = state
        .listing
        .dashboard(user.id)
        .await
        .reject("could not build dashboard")?;

    Ok(views::render(
        is_htmx,
        "Dashboard",
        quiz_views::dashboard(&data, &user.username),
        Some(&user),
    ))
}
