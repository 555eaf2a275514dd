use axum::{
    extract::{Form, Path, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    extractors::{AuthGuard, IsHtmx},
    models::{OptionDraft, QuestionDraft},
    names,
    rejections::{AppError, ResultExt},
    services::Outcome,
    utils, views, AppState,
};

use crate::views::quiz::{self as quiz_views, QuestionFormData};

use super::invalid_form;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quiz/{id}/questions/new", get(new_question_page))
        .route("/quiz/{id}/questions", post(add_question))
        .route(
            "/question/{id}/edit",
            get(edit_question_page).post(update_question),
        )
        .route("/question/{id}/delete", post(delete_question))
}

/// Four option inputs, each with its own "correct" checkbox. Checkboxes
/// rather than radio buttons, so a bad selection reaches validation.
#[derive(Deserialize)]
struct QuestionForm {
    question_text: String,
    #[serde(default)]
    option_0: String,
    #[serde(default)]
    option_1: String,
    #[serde(default)]
    option_2: String,
    #[serde(default)]
    option_3: String,
    #[serde(default)]
    correct_0: Option<String>,
    #[serde(default)]
    correct_1: Option<String>,
    #[serde(default)]
    correct_2: Option<String>,
    #[serde(default)]
    correct_3: Option<String>,
    /// Set by the "save and add another" button.
    #[serde(default)]
    save_and_add: Option<String>,
}

impl From<QuestionForm> for QuestionDraft {
    fn from(form: QuestionForm) -> Self {
        QuestionDraft {
            question_text: form.question_text,
            options: [
                OptionDraft::new(form.option_0, form.correct_0.is_some()),
                OptionDraft::new(form.option_1, form.correct_1.is_some()),
                OptionDraft::new(form.option_2, form.correct_2.is_some()),
                OptionDraft::new(form.option_3, form.correct_3.is_some()),
            ],
        }
    }
}

async fn new_question_page(
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

    let mut draft = QuestionDraft::default();
    draft.options[0].is_correct = true;

    Ok(views::render(
        is_htmx,
        "New Question",
        quiz_views::question_form(QuestionFormData {
            quiz_id,
            question_id: None,
            draft: &draft,
            error: None,
        }),
        Some(&user),
    ))
}

async fn add_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
    Form(form): Form<QuestionForm>,
) -> Result<Response, AppError> {
    let add_another = form.save_and_add.is_some();
    let draft = QuestionDraft::from(form);

    let outcome = state
        .authoring
        .add_question(quiz_id, Some(user.id), draft.clone())
        .await
        .reject("could not add question")?;

    match outcome {
        Outcome::Done(_) if add_another => {
            Ok(utils::hx_redirect(&names::new_question_url(quiz_id)))
        }
        Outcome::Done(_) => Ok(utils::hx_redirect(&names::quiz_url(quiz_id))),
        Outcome::Invalid(error) => Ok(invalid_form(
            "New Question",
            quiz_views::question_form(QuestionFormData {
                quiz_id,
                question_id: None,
                draft: &draft,
                error: Some(&error),
            }),
        )),
        Outcome::Forbidden => Err(AppError::Forbidden),
        Outcome::NotFound => Err(AppError::NotFound),
    }
}

async fn edit_question_page(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(question_id): Path<i64>,
) -> Result<maud::Markup, AppError> {
    let question = match state
        .authoring
        .question_for_edit(question_id, Some(user.id))
        .await
        .reject("could not get question")?
    {
        Outcome::Done(question) => question,
        Outcome::Invalid(_) => return Err(AppError::Input("invalid question")),
        Outcome::Forbidden => return Err(AppError::Forbidden),
        Outcome::NotFound => return Err(AppError::NotFound),
    };

    let mut draft = QuestionDraft {
        question_text: question.question.question_text.clone(),
        ..QuestionDraft::default()
    };
    for option in &question.options {
        if let Some(slot) = usize::try_from(option.position)
            .ok()
            .and_then(|idx| draft.options.get_mut(idx))
        {
            *slot = OptionDraft::new(option.option_text.clone(), option.is_correct);
        }
    }

    Ok(views::render(
        is_htmx,
        "Edit Question",
        quiz_views::question_form(QuestionFormData {
            quiz_id: question.question.quiz_id,
            question_id: Some(question_id),
            draft: &draft,
            error: None,
        }),
        Some(&user),
    ))
}

async fn update_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Form(form): Form<QuestionForm>,
) -> Result<Response, AppError> {
    let draft = QuestionDraft::from(form);

    let outcome = state
        .authoring
        .update_question(question_id, Some(user.id), draft.clone())
        .await
        .reject("could not update question")?;

    match outcome {
        Outcome::Done(question) => Ok(utils::hx_redirect(&names::quiz_url(
            question.question.quiz_id,
        ))),
        Outcome::Invalid(error) => {
            // The owner check already passed, so the question exists.
            let quiz_id = match state
                .authoring
                .question_for_edit(question_id, Some(user.id))
                .await
                .reject("could not get question")?
            {
                Outcome::Done(question) => question.question.quiz_id,
                _ => return Err(AppError::NotFound),
            };
            Ok(invalid_form(
                "Edit Question",
                quiz_views::question_form(QuestionFormData {
                    quiz_id,
                    question_id: Some(question_id),
                    draft: &draft,
                    error: Some(&error),
                }),
            ))
        }
        Outcome::Forbidden => Err(AppError::Forbidden),
        Outcome::NotFound => Err(AppError::NotFound),
    }
}

async fn delete_question(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
) -> Result<Response, AppError> {
    let outcome = state
        .authoring
        .delete_question(question_id, Some(user.id))
        .await
        .reject("could not delete question")?;

    match outcome {
        Outcome::Done(quiz_id) => Ok(utils::hx_redirect(&names::quiz_url(quiz_id))),
        Outcome::Invalid(_) => Err(AppError::Input("invalid question")),
        Outcome::Forbidden => Err(AppError::Forbidden),
        Outcome::NotFound => Err(AppError::NotFound),
    }
}
