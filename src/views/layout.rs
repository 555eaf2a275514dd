use maud::{html, Markup, DOCTYPE};

use crate::{db::models::AuthUser, names, utils};

// 422 responses carry re-rendered forms, so htmx must swap them too.
const HTMX_CONFIG: &str = r#"{"responseHandling":[{"code":"204","swap":false},{"code":"[23]..","swap":true},{"code":"422","swap":true},{"code":"[45]..","swap":false,"error":true}]}"#;

fn css() -> Markup {
    html! {
        link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
        link rel="stylesheet" href="/static/index.css";
    }
}

fn js() -> Markup {
    html! {
        meta name="htmx-config" content=(HTMX_CONFIG);
        script src="https://unpkg.com/htmx.org@2.0.4" {}
    }
}

fn header(user: Option<&AuthUser>) -> Markup {
    html! {
        header {
            nav {
                ul {
                    li."secondary" {
                        a href=(names::HOME_URL) {
                            strong { "Cortexa" }
                        }
                    }
                    li."secondary" { small { (utils::VERSION) } }
                }
                ul {
                    @if let Some(user) = user {
                        li { a href=(names::NEW_QUIZ_URL) { "New quiz" } }
                        li { a href=(names::DASHBOARD_URL) { "Dashboard" } }
                        @if user.is_admin {
                            li { a href=(names::CATEGORIES_URL) { "Categories" } }
                        }
                        li {
                            button."outline secondary"
                                hx-post=(names::LOGOUT_URL) {
                                "Log out " (user.username)
                            }
                        }
                    } @else {
                        li { a href=(names::LOGIN_URL) { "Log in" } }
                        li { a href=(names::REGISTER_URL) { "Register" } }
                    }
                }
            }
        }
    }
}

pub fn page(title: &str, body: Markup, user: Option<&AuthUser>) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="color-scheme" content="light dark";

            (css())
            (js())

            title { (format!("{title} - Cortexa")) }
        }

        body."container" {
            (header(user))
            main { (body) }
        }
    }
}

pub fn titled(title: &str, body: Markup) -> Markup {
    html! {
        title { (title) " - Cortexa" }
        (body)
    }
}

/// Full page for normal navigation, bare fragment for htmx swaps.
pub fn render(is_htmx: bool, title: &str, body: Markup, user: Option<&AuthUser>) -> Markup {
    if is_htmx {
        titled(title, body)
    } else {
        page(title, body, user)
    }
}
