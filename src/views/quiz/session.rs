use maud::{html, Markup};

use crate::{
    db::models::Quiz,
    names,
    services::{listing::StartableQuiz, scoring::ScoreCard},
    views::components,
};

pub fn start_page(data: &StartableQuiz) -> Markup {
    html! {
        h1 { (data.quiz.title) }
        @if !data.quiz.description.is_empty() {
            p { (data.quiz.description) }
        }

        form hx-post=(names::submit_quiz_url(data.quiz.id)) hx-target="main" {
            @for (idx, question) in data.questions.iter().enumerate() {
                fieldset {
                    legend { strong { (idx + 1) ". " (question.question.question_text) } }
                    @for option in &question.options {
                        label {
                            input type="radio"
                                  name=(names::answer_field(question.question.id))
                                  value=(option.id);
                            (option.option_text)
                        }
                    }
                }
            }
            button type="submit" { "Submit answers" }
        }
    }
}

pub fn result(quiz: &Quiz, card: &ScoreCard, saved: bool) -> Markup {
    html! {
        h1 { (quiz.title) }
        article.score {
            h2 { (card.score) " / " (card.total_questions) }
            p { strong { (components::percentage(card.percentage)) } }
            @if saved {
                p { small { "Your attempt has been saved to your dashboard." } }
            } @else {
                p {
                    small {
                        a href=(names::LOGIN_URL) { "Log in" }
                        " to keep track of your attempts."
                    }
                }
            }
        }
        div role="group" style="width: fit-content;" {
            (components::nav_link(&names::start_quiz_url(quiz.id), html! { "Try again" }))
            (components::nav_link(&names::quiz_url(quiz.id), html! { "Leaderboard" }))
        }
    }
}
