use std::collections::HashMap;

use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};

use crate::{
    extractors::{CurrentUser, IsHtmx},
    names,
    rejections::{AppError, ResultExt},
    services::{scoring::answers_from_form, Outcome},
    utils, views, AppState,
};

use crate::views::quiz as quiz_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quiz/{id}/start", get(start_quiz))
        .route("/quiz/{id}/submit", post(submit_quiz))
}

async fn start_quiz(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    CurrentUser(user): CurrentUser,
    Path(quiz_id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    let outcome = state
        .listing
        .start_quiz(quiz_id)
        .await
        .reject("could not get quiz")?;

    let Outcome::Done(quiz) = outcome else {
        return Err(AppError::NotFound);
    };

    Ok(views::render(
        is_htmx,
        &quiz.quiz.title,
        quiz_views::start_page(&quiz),
        user.as_ref(),
    ))
}

async fn submit_quiz(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(quiz_id): Path<i64>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    let answers = answers_from_form(&form);

    let outcome = state
        .scoring
        .submit(quiz_id, user.as_ref().map(|u| u.id), &answers)
        .await
        .reject("could not score submission")?;

    let Outcome::Done(submission) = outcome else {
        return Ok(utils::hx_redirect(names::HOME_URL));
    };

    let quiz = state
        .listing
        .quiz(quiz_id)
        .await
        .reject("could not get quiz")?
        .ok_or(AppError::NotFound)?;

    Ok(views::titled(
        "Result",
        quiz_views::result(&quiz, &submission.card, submission.attempt.is_some()),
    )
    .into_response())
}
