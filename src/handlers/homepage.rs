use axum::{
    extract::{Form, Query, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    extractors::{CurrentUser, IsHtmx},
    names,
    rejections::{AppError, ResultExt},
    utils, views, AppState,
};

use crate::views::homepage as homepage_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(homepage))
        .route("/register", get(register_page).post(register_post))
        .route("/login", get(login_page).post(login_post))
        .route("/logout", post(logout_post))
}

#[derive(Deserialize)]
struct ListingQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    page: Option<String>,
}

async fn homepage(
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListingQuery>,
) -> Result<maud::Markup, AppError> {
    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());
    let page = query
        .page
        .as_deref()
        .and_then(|p| p.trim().parse::<u32>().ok())
        .unwrap_or(1);

    let quizzes = state
        .listing
        .list_active_quizzes(search, page)
        .await
        .reject("could not list quizzes")?;

    Ok(views::render(
        is_htmx,
        "Quizzes",
        homepage_views::quiz_list(&quizzes, search),
        user.as_ref(),
    ))
}

async fn register_page(IsHtmx(is_htmx): IsHtmx, CurrentUser(user): CurrentUser) -> Response {
    if user.is_some() {
        return Redirect::to(names::DASHBOARD_URL).into_response();
    }

    views::render(
        is_htmx,
        "Register",
        homepage_views::register(homepage_views::RegisterState::NoError),
        None,
    )
    .into_response()
}

async fn login_page(IsHtmx(is_htmx): IsHtmx, CurrentUser(user): CurrentUser) -> Response {
    if user.is_some() {
        return Redirect::to(names::DASHBOARD_URL).into_response();
    }

    views::render(
        is_htmx,
        "Log In",
        homepage_views::login(homepage_views::LoginState::NoError),
        None,
    )
    .into_response()
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

fn logged_in(session_token: &str, secure: bool) -> Result<Response, AppError> {
    let cookie = utils::cookie(names::USER_SESSION_COOKIE_NAME, session_token, secure)
        .reject("could not build session cookie")?;

    let mut response = utils::hx_redirect(names::HOME_URL);
    response.headers_mut().insert(SET_COOKIE, cookie);
    Ok(response)
}

fn rejected_form(title: &str, body: maud::Markup) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, views::titled(title, body)).into_response()
}

async fn register_post(
    State(state): State<AppState>,
    Form(body): Form<Credentials>,
) -> Result<Response, AppError> {
    use crate::services::auth::RegisterOutcome;
    use homepage_views::RegisterState;

    let outcome = state
        .auth
        .register(&body.username, &body.password)
        .await
        .reject("registration failed")?;

    let form_state = match outcome {
        RegisterOutcome::LoggedIn(session_token) => {
            return logged_in(&session_token, state.secure_cookies)
        }
        RegisterOutcome::EmptyFields => RegisterState::EmptyFields,
        RegisterOutcome::UsernameTaken => RegisterState::UsernameTaken,
        RegisterOutcome::WeakPassword => RegisterState::WeakPassword,
    };

    Ok(rejected_form("Register", homepage_views::register(form_state)))
}

async fn login_post(
    State(state): State<AppState>,
    Form(body): Form<Credentials>,
) -> Result<Response, AppError> {
    use crate::services::auth::LoginOutcome;

    let outcome = state
        .auth
        .login(&body.username, &body.password)
        .await
        .reject("login failed")?;

    match outcome {
        LoginOutcome::Success(session_token) => logged_in(&session_token, state.secure_cookies),
        LoginOutcome::InvalidCredentials => Ok(rejected_form(
            "Log In",
            homepage_views::login(homepage_views::LoginState::IncorrectPassword),
        )),
    }
}

async fn logout_post(
    jar: CookieJar,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(session_id) = jar
        .get(names::USER_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        state
            .auth
            .logout(&session_id)
            .await
            .reject("could not delete session")?;
    }

    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        utils::expired_cookie(names::USER_SESSION_COOKIE_NAME),
    );
    headers.insert("HX-Redirect", HeaderValue::from_static(names::LOGIN_URL));

    Ok((headers, ""))
}
