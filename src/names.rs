pub const HOME_URL: &str = "/";
pub const LOGIN_URL: &str = "/login";
pub const REGISTER_URL: &str = "/register";
pub const LOGOUT_URL: &str = "/logout";
pub const DASHBOARD_URL: &str = "/dashboard";
pub const NEW_QUIZ_URL: &str = "/quiz/new";
pub const CREATE_QUIZ_URL: &str = "/quiz";
pub const CATEGORIES_URL: &str = "/admin/categories";

pub const USER_SESSION_COOKIE_NAME: &str = "user_session";

pub fn quiz_url(quiz_id: i64) -> String {
    format!("/quiz/{quiz_id}")
}

pub fn edit_quiz_url(quiz_id: i64) -> String {
    format!("/quiz/{quiz_id}/edit")
}

pub fn delete_quiz_url(quiz_id: i64) -> String {
    format!("/quiz/{quiz_id}/delete")
}

pub fn new_question_url(quiz_id: i64) -> String {
    format!("/quiz/{quiz_id}/questions/new")
}

pub fn add_question_url(quiz_id: i64) -> String {
    format!("/quiz/{quiz_id}/questions")
}

pub fn edit_question_url(question_id: i64) -> String {
    format!("/question/{question_id}/edit")
}

pub fn delete_question_url(question_id: i64) -> String {
    format!("/question/{question_id}/delete")
}

pub fn start_quiz_url(quiz_id: i64) -> String {
    format!("/quiz/{quiz_id}/start")
}

pub fn submit_quiz_url(quiz_id: i64) -> String {
    format!("/quiz/{quiz_id}/submit")
}

pub fn category_url(category_id: i64) -> String {
    format!("{CATEGORIES_URL}/{category_id}")
}

/// Form field carrying the selected option for a question on the start page.
pub fn answer_field(question_id: i64) -> String {
    format!("{ANSWER_FIELD_PREFIX}{question_id}")
}

pub const ANSWER_FIELD_PREFIX: &str = "question_";

// Authoring limits
pub const OPTIONS_PER_QUESTION: usize = 4;
pub const MAX_TITLE_LENGTH: usize = 200;
pub const MAX_CATEGORY_NAME_LENGTH: usize = 200;
pub const MAX_OPTION_LENGTH: usize = 255;
pub const MIN_PASSWORD_LENGTH: usize = 8;

// Listings
pub const QUIZZES_PER_PAGE: u32 = 6;
pub const LEADERBOARD_SIZE: u32 = 5;
