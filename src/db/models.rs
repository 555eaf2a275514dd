// Database model structs

use chrono::{DateTime, Utc};

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub is_admin: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Quiz {
    pub id: i64,
    pub title: String,
    pub category_id: Option<i64>,
    pub description: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

/// A row of the public quiz listing.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category_name: Option<String>,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub question_count: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub question_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow)]
pub struct QuestionOption {
    pub id: i64,
    pub question_id: i64,
    pub position: i64,
    pub option_text: String,
    pub is_correct: bool,
}

/// A question together with its options, ordered by position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionWithOptions {
    pub question: Question,
    pub options: Vec<QuestionOption>,
}

impl QuestionWithOptions {
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct QuizAttempt {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
    pub created_at: DateTime<Utc>,
}

/// Legacy attempt record, without a stored percentage.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Attempt {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewQuizAttempt {
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct LeaderboardEntry {
    pub attempt_id: i64,
    pub username: String,
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
    pub created_at: DateTime<Utc>,
}

/// A quiz owned by the dashboard user, with the attempts it received.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct OwnedQuizStats {
    pub id: i64,
    pub title: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub question_count: i64,
    pub attempt_count: i64,
    pub average_percentage: Option<f64>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct AttemptHistoryEntry {
    pub id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub score: i64,
    pub total_questions: i64,
    pub percentage: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct LegacyAttemptEntry {
    pub id: i64,
    pub quiz_id: i64,
    pub quiz_title: String,
    pub score: i64,
    pub total_questions: i64,
    pub submitted_at: DateTime<Utc>,
}

/// One (question, option) pair of a quiz's answer key. Questions without
/// options still produce a row with `option_id = None`.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct AnswerKeyRow {
    pub question_id: i64,
    pub option_id: Option<i64>,
    pub is_correct: Option<bool>,
}
