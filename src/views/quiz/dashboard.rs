use maud::{html, Markup};

use crate::{names, services::listing::Dashboard, views::components};

pub fn dashboard(data: &Dashboard, username: &str) -> Markup {
    html! {
        h1 { (username) "'s dashboard" }

        article {
            h4 { "My quizzes" }
            @if data.owned_quizzes.is_empty() {
                p {
                    "You have not created any quiz. "
                    a href=(names::NEW_QUIZ_URL) { "Create one" }
                }
            } @else {
                table {
                    thead { tr {
                        th { "Title" }
                        th { "Questions" }
                        th { "Attempts" }
                        th { "Average" }
                        th { "Status" }
                    } }
                    tbody {
                        @for quiz in &data.owned_quizzes {
                            tr {
                                td { a href=(names::quiz_url(quiz.id)) { (quiz.title) } }
                                td { (quiz.question_count) }
                                td { (quiz.attempt_count) }
                                td {
                                    @match quiz.average_percentage {
                                        Some(average) => { (components::percentage(average)) }
                                        None => { "-" }
                                    }
                                }
                                td {
                                    @if quiz.is_active { "active" } @else { "inactive" }
                                }
                            }
                        }
                    }
                }
            }
        }

        article {
            h4 { "My attempts" }
            @if data.own_attempts.is_empty() && data.legacy_attempts.is_empty() {
                p { "You have not taken any quiz yet." }
            } @else {
                table {
                    thead { tr {
                        th { "Quiz" }
                        th { "Score" }
                        th { "Percentage" }
                        th { "Date" }
                    } }
                    tbody {
                        @for attempt in &data.own_attempts {
                            tr {
                                td { a href=(names::quiz_url(attempt.quiz_id)) { (attempt.quiz_title) } }
                                td { (attempt.score) " / " (attempt.total_questions) }
                                td { (components::percentage(attempt.percentage)) }
                                td { (attempt.created_at.format("%Y-%m-%d %H:%M")) }
                            }
                        }
                        @for attempt in &data.legacy_attempts {
                            tr {
                                td { a href=(names::quiz_url(attempt.quiz_id)) { (attempt.quiz_title) } }
                                td { (attempt.score) " / " (attempt.total_questions) }
                                td {
                                    (components::percentage(crate::services::scoring::percentage(
                                        attempt.score,
                                        attempt.total_questions,
                                    )))
                                }
                                td { (attempt.submitted_at.format("%Y-%m-%d %H:%M")) " " small { "(archived)" } }
                            }
                        }
                    }
                }
            }
        }
    }
}
