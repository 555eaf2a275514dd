use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use crate::{
    db::models::AuthUser,
    extractors::{AuthGuard, IsHtmx},
    models::CategoryDraft,
    names,
    rejections::{AppError, ResultExt},
    services::{Outcome, ValidationError},
    utils, views, AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(names::CATEGORIES_URL, get(categories_page).post(create_category))
        .route("/admin/categories/{id}", post(update_category))
}

fn require_admin(user: &AuthUser) -> Result<(), AppError> {
    if user.is_admin {
        Ok(())
    } else {
        tracing::warn!("user {} is not an admin", user.id);
        Err(AppError::Forbidden)
    }
}

async fn categories_page(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    require_admin(&user)?;

    let categories = state
        .listing
        .categories()
        .await
        .reject("could not get categories")?;

    Ok(views::render(
        is_htmx,
        "Categories",
        views::admin::categories(&categories, &CategoryDraft::default(), None),
        Some(&user),
    ))
}

async fn invalid_category(
    state: &AppState,
    draft: &CategoryDraft,
    error: &ValidationError,
) -> Result<Response, AppError> {
    let categories = state
        .listing
        .categories()
        .await
        .reject("could not get categories")?;

    Ok((
        StatusCode::UNPROCESSABLE_ENTITY,
        views::titled(
            "Categories",
            views::admin::categories(&categories, draft, Some(error)),
        ),
    )
        .into_response())
}

async fn create_category(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Form(draft): Form<CategoryDraft>,
) -> Result<Response, AppError> {
    let outcome = state
        .authoring
        .create_category(Some(&user), draft.clone())
        .await
        .reject("could not create category")?;

    match outcome {
        Outcome::Done(_) => Ok(utils::hx_redirect(names::CATEGORIES_URL)),
        Outcome::Invalid(error) => invalid_category(&state, &draft, &error).await,
        Outcome::Forbidden => Err(AppError::Forbidden),
        Outcome::NotFound => Err(AppError::NotFound),
    }
}

async fn update_category(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Form(draft): Form<CategoryDraft>,
) -> Result<Response, AppError> {
    let outcome = state
        .authoring
        .update_category(Some(&user), category_id, draft.clone())
        .await
        .reject("could not update category")?;

    match outcome {
        Outcome::Done(_) => Ok(utils::hx_redirect(names::CATEGORIES_URL)),
        Outcome::Invalid(error) => invalid_category(&state, &draft, &error).await,
        Outcome::Forbidden => Err(AppError::Forbidden),
        Outcome::NotFound => Err(AppError::NotFound),
    }
}
