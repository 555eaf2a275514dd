use serde::Deserialize;

use crate::names::OPTIONS_PER_QUESTION;

/// Editable fields of a quiz, shared by create and update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizFields {
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub category_id: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionDraft {
    pub text: String,
    pub is_correct: bool,
}

impl OptionDraft {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// A question as submitted by its author: the text plus exactly four options
/// in display order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub question_text: String,
    pub options: [OptionDraft; OPTIONS_PER_QUESTION],
}

impl QuestionDraft {
    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
}
