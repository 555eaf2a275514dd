mod dashboard;
mod question;
mod session;

pub use dashboard::dashboard;
pub use question::{question_form, QuestionFormData};
pub use session::{result, start_page};

use maud::{html, Markup};

use crate::{
    db::models::Category,
    models::QuizFields,
    names,
    services::{listing::QuizDetail, ValidationError},
    views::components,
};

pub fn detail(data: &QuizDetail, is_owner: bool) -> Markup {
    let quiz = &data.quiz;

    html! {
        hgroup {
            h1 { (quiz.title) }
            p {
                @if let Some(category) = &data.category {
                    (category.name) " · "
                }
                (data.questions.len()) " questions"
                @if !quiz.is_active {
                    " · " mark { "inactive" }
                }
            }
        }

        @if !quiz.description.is_empty() {
            p { (quiz.description) }
        }

        div role="group" style="width: fit-content;" {
            @if quiz.is_active {
                (components::nav_link(&names::start_quiz_url(quiz.id), html! { "Take this quiz" }))
            }
            @if is_owner {
                a href=(names::edit_quiz_url(quiz.id)) { "Edit" }
                a href=(names::new_question_url(quiz.id)) { "Add question" }
            }
        }

        @if is_owner {
            article {
                h4 { "Questions" }
                @if data.questions.is_empty() {
                    p { "This quiz has no questions yet." }
                }
                ol {
                    @for question in &data.questions {
                        li {
                            (question.question.question_text)
                            " "
                            a href=(names::edit_question_url(question.question.id)) { small { "edit" } }
                            @if let Some(correct) = question.correct_option() {
                                br;
                                small { "Answer: " (correct.option_text) }
                            }
                        }
                    }
                }
            }
        }

        article {
            h4 { "Leaderboard" }
            @if data.leaderboard.is_empty() {
                p { "Nobody has taken this quiz yet." }
            } @else {
                table {
                    thead { tr {
                        th { "#" }
                        th { "User" }
                        th { "Score" }
                        th { "Percentage" }
                        th { "Date" }
                    } }
                    tbody {
                        @for (rank, entry) in data.leaderboard.iter().enumerate() {
                            tr {
                                td { (rank + 1) }
                                td { (entry.username) }
                                td { (entry.score) " / " (entry.total_questions) }
                                td { (components::percentage(entry.percentage)) }
                                td { (entry.created_at.format("%Y-%m-%d %H:%M")) }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[derive(Clone, Copy)]
pub enum QuizFormMode {
    Create,
    Edit(i64),
}

pub fn quiz_form(
    mode: QuizFormMode,
    fields: &QuizFields,
    categories: &[Category],
    error: Option<&ValidationError>,
) -> Markup {
    let (heading, action, button) = match mode {
        QuizFormMode::Create => ("New quiz", names::CREATE_QUIZ_URL.to_string(), "Create"),
        QuizFormMode::Edit(quiz_id) => ("Edit quiz", names::edit_quiz_url(quiz_id), "Save"),
    };

    html! {
        h1 { (heading) }
        (components::form_error(error))
        form hx-post=(action) hx-target="main" {
            label {
                "Title"
                input name="title"
                      type="text"
                      required="true"
                      maxlength=(names::MAX_TITLE_LENGTH)
                      value=(fields.title)
                      aria-invalid=[components::invalid(error, "title")];
            }
            label {
                "Description"
                textarea name="description" { (fields.description) }
            }
            label {
                "Category"
                select name="category_id" aria-invalid=[components::invalid(error, "category_id")] {
                    option value="" { "None" }
                    @for category in categories {
                        option value=(category.id)
                               selected[fields.category_id == Some(category.id)] {
                            (category.name)
                        }
                    }
                }
            }
            label {
                input name="is_active" type="checkbox" role="switch" value="true" checked[fields.is_active];
                "Active"
            }
            button type="submit" { (button) }
        }
        @if let QuizFormMode::Edit(quiz_id) = mode {
            button."secondary outline"
                hx-post=(names::delete_quiz_url(quiz_id))
                hx-confirm="Delete this quiz with all its questions and attempts?" {
                "Delete quiz"
            }
        }
    }
}
