use chrono::{DateTime, Utc};
use color_eyre::Result;

use super::models::{
    AnswerKeyRow, Attempt, AttemptHistoryEntry, LeaderboardEntry, LegacyAttemptEntry,
    NewQuizAttempt, QuizAttempt,
};
use super::Db;
use crate::services::scoring::{AnswerKey, ScoringRepository};

impl Db {
    pub async fn insert_quiz_attempt(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt> {
        let attempt = sqlx::query_as::<_, QuizAttempt>(
            r#"
            INSERT INTO quiz_attempts (user_id, quiz_id, score, total_questions, percentage, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, quiz_id, score, total_questions, percentage, created_at
            "#,
        )
        .bind(attempt.user_id)
        .bind(attempt.quiz_id)
        .bind(attempt.score)
        .bind(attempt.total_questions)
        .bind(attempt.percentage)
        .bind(attempt.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempt)
    }

    /// Write a record in the legacy history table. Only imports and tests
    /// produce these; new submissions go to `quiz_attempts`.
    pub async fn insert_legacy_attempt(
        &self,
        user_id: i64,
        quiz_id: i64,
        score: i64,
        total_questions: i64,
        submitted_at: DateTime<Utc>,
    ) -> Result<Attempt> {
        let attempt = sqlx::query_as::<_, Attempt>(
            r#"
            INSERT INTO attempts (user_id, quiz_id, score, total_questions, submitted_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, quiz_id, score, total_questions, submitted_at
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .bind(score)
        .bind(total_questions)
        .bind(submitted_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(attempt)
    }

    /// One row per (question, option) pair; option-less questions still appear.
    pub async fn answer_key_rows(&self, quiz_id: i64) -> Result<Vec<AnswerKeyRow>> {
        let rows = sqlx::query_as::<_, AnswerKeyRow>(
            r#"
            SELECT q.id AS question_id, o.id AS option_id, o.is_correct
            FROM questions q
            LEFT JOIN options o ON o.question_id = q.id
            WHERE q.quiz_id = $1
            ORDER BY q.id, o.position
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn leaderboard(&self, quiz_id: i64, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let entries = sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT a.id AS attempt_id, u.username, a.score, a.total_questions,
                   a.percentage, a.created_at
            FROM quiz_attempts a
            JOIN users u ON u.id = a.user_id
            WHERE a.quiz_id = $1
            ORDER BY a.percentage DESC, a.created_at ASC, a.id ASC
            LIMIT $2
            "#,
        )
        .bind(quiz_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn attempt_history(&self, user_id: i64) -> Result<Vec<AttemptHistoryEntry>> {
        let entries = sqlx::query_as::<_, AttemptHistoryEntry>(
            r#"
            SELECT a.id, a.quiz_id, q.title AS quiz_title, a.score, a.total_questions,
                   a.percentage, a.created_at
            FROM quiz_attempts a
            JOIN quizzes q ON q.id = a.quiz_id
            WHERE a.user_id = $1
            ORDER BY a.created_at DESC, a.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn legacy_attempt_history(&self, user_id: i64) -> Result<Vec<LegacyAttemptEntry>> {
        let entries = sqlx::query_as::<_, LegacyAttemptEntry>(
            r#"
            SELECT a.id, a.quiz_id, q.title AS quiz_title, a.score, a.total_questions,
                   a.submitted_at
            FROM attempts a
            JOIN quizzes q ON q.id = a.quiz_id
            WHERE a.user_id = $1
            ORDER BY a.submitted_at DESC, a.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn quiz_attempts_count(&self, quiz_id: i64) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM quiz_attempts WHERE quiz_id = $1")
                .bind(quiz_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

impl ScoringRepository for Db {
    async fn quiz_exists(&self, quiz_id: i64) -> Result<bool> {
        Db::quiz_exists(self, quiz_id).await
    }

    async fn answer_key(&self, quiz_id: i64) -> Result<AnswerKey> {
        let rows = self.answer_key_rows(quiz_id).await?;
        Ok(AnswerKey::from_rows(rows))
    }

    async fn insert_quiz_attempt(&self, attempt: NewQuizAttempt) -> Result<QuizAttempt> {
        Db::insert_quiz_attempt(self, attempt).await
    }
}
