use axum::{
    extract::{Form, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    extractors::{AuthGuard, CurrentUser, IsHtmx},
    models::QuizFields,
    names,
    rejections::{AppError, ResultExt},
    services::Outcome,
    utils, views, AppState,
};

use crate::views::quiz::{self as quiz_views, QuizFormMode};

use super::invalid_form;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quiz/new", get(new_quiz_page))
        .route("/quiz", post(create_quiz))
        .route("/quiz/{id}", get(quiz_detail))
        .route("/quiz/{id}/edit", get(edit_quiz_page).post(update_quiz))
        .route("/quiz/{id}/delete", post(delete_quiz))
}

#[derive(Deserialize)]
struct QuizForm {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_active: Option<String>,
    #[serde(default)]
    category_id: String,
}

impl From<QuizForm> for QuizFields {
    fn from(form: QuizForm) -> Self {
        QuizFields {
            title: form.title,
            description: form.description,
            is_active: form.is_active.is_some(),
            category_id: form.category_id.trim().parse().ok(),
        }
    }
}

async fn new_quiz_page(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let categories = state
        .listing
        .categories()
        .await
        .reject("could not get categories")?;

    let fields = QuizFields {
        is_active: true,
        ..QuizFields::default()
    };

    Ok(views::render(
        is_htmx,
        "New Quiz",
        quiz_views::quiz_form(QuizFormMode::Create, &fields, &categories, None),
        Some(&user),
    ))
}

async fn create_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Form(form): Form<QuizForm>,
) -> Result<Response, AppError> {
    let fields = QuizFields::from(form);

    let outcome = state
        .authoring
        .create_quiz(Some(user.id), fields.clone())
        .await
        .reject("could not create quiz")?;

    match outcome {
        Outcome::Done(quiz) => Ok(utils::hx_redirect(&names::new_question_url(quiz.id))),
        Outcome::Invalid(error) => {
            let categories = state
                .listing
                .categories()
                .await
                .reject("could not get categories")?;
            Ok(invalid_form(
                "New Quiz",
                quiz_views::quiz_form(QuizFormMode::Create, &fields, &categories, Some(&error)),
            ))
        }
        Outcome::Forbidden => Err(AppError::Forbidden),
        Outcome::NotFound => Err(AppError::NotFound),
    }
}

async fn quiz_detail(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    CurrentUser(user): CurrentUser,
    Path(quiz_id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    let outcome = state
        .listing
        .quiz_detail(quiz_id)
        .await
        .reject("could not get quiz")?;

    let Outcome::Done(detail) = outcome else {
        return Err(AppError::NotFound);
    };

    let is_owner = user.as_ref().is_some_and(|u| u.id == detail.quiz.created_by);
    Ok(views::render(
        is_htmx,
        &detail.quiz.title,
        quiz_views::detail(&detail, is_owner),
        user.as_ref(),
    ))
}

async fn edit_quiz_page(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(quiz_id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    match state
        .authoring
        .quiz_for_edit(quiz_id, Some(user.id))
        .await
        .reject("could not check quiz owner")?
    {
        Outcome::Done(()) => {}
        Outcome::Invalid(_) => return Err(AppError::Input("invalid quiz")),
        Outcome::Forbidden => return Err(AppError::Forbidden),
        Outcome::NotFound => return Err(AppError::NotFound),
    }

    let quiz = state
        .listing
        .quiz(quiz_id)
        .await
        .reject("could not get quiz")?
        .ok_or(AppError::NotFound)?;
    let categories = state
        .listing
        .categories()
        .await
        .reject("could not get categories")?;

    let fields = QuizFields {
        title: quiz.title,
        description: quiz.description,
        is_active: quiz.is_active,
        category_id: quiz.category_id,
    };

    Ok(views::render(
        is_htmx,
        "Edit Quiz",
        quiz_views::quiz_form(QuizFormMode::Edit(quiz_id), &fields, &categories, None),
        Some(&user),
    ))
}

async fn update_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
    Form(form): Form<QuizForm>,
) -> Result<Response, AppError> {
    let fields = QuizFields::from(form);

    let outcome = state
        .authoring
        .update_quiz(quiz_id, Some(user.id), fields.clone())
        .await
        .reject("could not update quiz")?;

    match outcome {
        Outcome::Done(quiz) => Ok(utils::hx_redirect(&names::quiz_url(quiz.id))),
        Outcome::Invalid(error) => {
            let categories = state
                .listing
                .categories()
                .await
                .reject("could not get categories")?;
            Ok(invalid_form(
                "Edit Quiz",
                quiz_views::quiz_form(
                    QuizFormMode::Edit(quiz_id),
                    &fields,
                    &categories,
                    Some(&error),
                ),
            ))
        }
        Outcome::Forbidden => Err(AppError::Forbidden),
        Outcome::NotFound => Err(AppError::NotFound),
    }
}

async fn delete_quiz(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state
        .authoring
        .delete_quiz(quiz_id, Some(user.id))
        .await
        .reject("could not delete quiz")?;

    match outcome {
        Outcome::Done(()) => Ok(utils::hx_redirect(names::DASHBOARD_URL)),
        Outcome::Invalid(_) => Err(AppError::Input("invalid quiz")),
        Outcome::Forbidden => Err(AppError::Forbidden),
        Outcome::NotFound => Err(AppError::NotFound),
    }
}
