use maud::{html, Markup};

use crate::{
    db::models::QuizSummary,
    names,
    services::listing::Page,
    views::components,
};

fn quiz_card(quiz: &QuizSummary) -> Markup {
    html! {
        article.quiz-card {
            header {
                (components::nav_link(&names::quiz_url(quiz.id), html! { strong { (quiz.title) } }))
            }
            @if !quiz.description.is_empty() {
                p { (quiz.description) }
            }
            footer {
                small {
                    (quiz.question_count) " questions · by " (quiz.author)
                    @if let Some(category) = &quiz.category_name {
                        " · " (category)
                    }
                    " · " (quiz.created_at.format("%Y-%m-%d"))
                }
            }
        }
    }
}

fn pagination(page: &Page<QuizSummary>, search: Option<&str>) -> Markup {
    html! {
        @if page.total_pages() > 1 {
            form.pagination method="get" action=(names::HOME_URL) {
                @if let Some(search) = search {
                    input type="hidden" name="q" value=(search);
                }
                @if page.has_previous() {
                    button."outline" name="page" value=(page.number - 1) { "Previous" }
                }
                span { "Page " (page.number) " of " (page.total_pages()) }
                @if page.has_next() {
                    button."outline" name="page" value=(page.number + 1) { "Next" }
                }
            }
        }
    }
}

pub fn quiz_list(page: &Page<QuizSummary>, search: Option<&str>) -> Markup {
    html! {
        h1 { "Quizzes" }

        form role="search" method="get" action=(names::HOME_URL) {
            input name="q"
                  type="search"
                  placeholder="Search by title"
                  aria-label="Search by title"
                  value=[search];
            button type="submit" { "Search" }
        }

        @if page.items.is_empty() {
            p {
                @if search.is_some() {
                    "No quiz matches your search."
                } @else {
                    "No quizzes yet."
                }
            }
        } @else {
            div.quiz-grid {
                @for quiz in &page.items {
                    (quiz_card(quiz))
                }
            }
        }

        (pagination(page, search))
    }
}

pub enum RegisterState {
    NoError,
    UsernameTaken,
    EmptyFields,
    WeakPassword,
}

pub fn register(state: RegisterState) -> Markup {
    let error_msg = match state {
        RegisterState::NoError => None,
        RegisterState::UsernameTaken => Some("That username is already taken."),
        RegisterState::EmptyFields => Some("Username and password are required."),
        RegisterState::WeakPassword => Some("Password must be at least 8 characters."),
    };

    html! {
        h1 { "Create an account" }
        article style="width: fit-content;" {
            form hx-post=(names::REGISTER_URL) hx-target="main" {
                label {
                    "Username"
                    input name="username"
                          type="text"
                          autocomplete="username"
                          required="true"
                          aria-label="Username";
                }
                label {
                    "Password"
                    input name="password"
                          type="password"
                          autocomplete="new-password"
                          required="true"
                          aria-invalid=[error_msg.map(|_| "true")]
                          aria-label="Password";
                    @if let Some(msg) = error_msg {
                        small { (msg) }
                    }
                }
                button type="submit" { "Register" }
            }
            p {
                "Already have an account? "
                a href=(names::LOGIN_URL) { "Log in" }
            }
        }
    }
}

pub enum LoginState {
    NoError,
    IncorrectPassword,
}

pub fn login(state: LoginState) -> Markup {
    html! {
        h1 { "Welcome back" }
        article style="width: fit-content;" {
            form hx-post=(names::LOGIN_URL) hx-target="main" {
                label {
                    "Username"
                    input name="username"
                          type="text"
                          autocomplete="username"
                          required="true"
                          aria-label="Username";
                }
                label {
                    "Password"
                    @match state {
                        LoginState::NoError => {
                            input name="password"
                                  type="password"
                                  autocomplete="current-password"
                                  required="true"
                                  aria-label="Password";
                        },
                        LoginState::IncorrectPassword => {
                            input name="password"
                                  type="password"
                                  autocomplete="current-password"
                                  required="true"
                                  aria-invalid="true"
                                  aria-label="Password";
                            small { "Incorrect username or password." }
                        },
                    }
                }
                button type="submit" { "Log in" }
            }
            p {
                "No account yet? "
                a href=(names::REGISTER_URL) { "Register" }
            }
        }
    }
}
