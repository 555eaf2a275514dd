use maud::{html, Markup};

use crate::services::ValidationError;

/// htmx navigation link with href fallback + hx-get for in-page swap.
pub fn nav_link(href: &str, body: Markup) -> Markup {
    html! {
        a href=(href)
          hx-get=(href)
          hx-target="main"
          hx-push-url="true"
          hx-swap="innerHTML" {
            (body)
        }
    }
}

pub fn form_error(error: Option<&ValidationError>) -> Markup {
    html! {
        @if let Some(error) = error {
            p.error role="alert" { (error.message) }
        }
    }
}

/// Marks an input invalid when the error concerns `field`.
pub fn invalid(error: Option<&ValidationError>, field: &str) -> Option<&'static str> {
    error.filter(|e| e.field == field).map(|_| "true")
}

pub fn percentage(value: f64) -> String {
    format!("{value:.1}%")
}
