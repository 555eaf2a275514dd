use maud::{html, Markup};

use crate::{
    models::QuestionDraft,
    names,
    services::ValidationError,
    views::components,
};

pub struct QuestionFormData<'a> {
    pub quiz_id: i64,
    /// `Some(question_id)` when editing an existing question.
    pub question_id: Option<i64>,
    pub draft: &'a QuestionDraft,
    pub error: Option<&'a ValidationError>,
}

pub fn question_form(data: QuestionFormData<'_>) -> Markup {
    let (heading, action) = match data.question_id {
        Some(question_id) => ("Edit question", names::edit_question_url(question_id)),
        None => ("New question", names::add_question_url(data.quiz_id)),
    };

    html! {
        h1 { (heading) }
        p { a href=(names::quiz_url(data.quiz_id)) { "Back to quiz" } }
        (components::form_error(data.error))
        form hx-post=(action) hx-target="main" {
            label {
                "Question"
                textarea name="question_text"
                         required="true"
                         aria-invalid=[components::invalid(data.error, "question_text")] {
                    (data.draft.question_text)
                }
            }
            fieldset aria-invalid=[components::invalid(data.error, "options")] {
                legend { "Options (mark exactly one as correct)" }
                @for (idx, option) in data.draft.options.iter().enumerate() {
                    div role="group" {
                        input name=(format!("option_{idx}"))
                              type="text"
                              required="true"
                              maxlength=(names::MAX_OPTION_LENGTH)
                              placeholder=(format!("Option {}", idx + 1))
                              value=(option.text);
                        label {
                            input name=(format!("correct_{idx}"))
                                  type="checkbox"
                                  value="true"
                                  checked[option.is_correct];
                            "Correct"
                        }
                    }
                }
            }
            div role="group" {
                button type="submit" { "Save" }
                @if data.question_id.is_none() {
                    button."secondary" type="submit" name="save_and_add" value="true" {
                        "Save and add another"
                    }
                }
            }
        }
        @if let Some(question_id) = data.question_id {
            button."secondary outline"
                hx-post=(names::delete_question_url(question_id))
                hx-confirm="Delete this question?" {
                "Delete question"
            }
        }
    }
}
