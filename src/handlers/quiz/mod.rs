mod crud;
mod dashboard;
mod question;
mod session;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};

use crate::{views, AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(crud::routes())
        .merge(question::routes())
        .merge(session::routes())
        .merge(dashboard::routes())
}

/// A form re-rendered with its validation message.
fn invalid_form(title: &str, body: maud::Markup) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, views::titled(title, body)).into_response()
}
