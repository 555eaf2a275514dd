use color_eyre::Result;

use super::models::{
    AttemptHistoryEntry, Category, LeaderboardEntry, LegacyAttemptEntry, OwnedQuizStats,
    QuestionWithOptions, Quiz, QuizSummary,
};
use super::Db;
use crate::services::listing::ListingRepository;

impl Db {
    pub async fn count_active_quizzes(&self, title_pattern: Option<String>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM quizzes
            WHERE is_active = 1 AND ($1 IS NULL OR title_search LIKE $1 ESCAPE '\')
            "#,
        )
        .bind(title_pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn active_quizzes(
        &self,
        title_pattern: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuizSummary>> {
        let quizzes = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT q.id, q.title, q.description, c.name AS category_name,
                   u.username AS author, q.created_at,
                   (SELECT COUNT(*) FROM questions qu WHERE qu.quiz_id = q.id) AS question_count
            FROM quizzes q
            JOIN users u ON u.id = q.created_by
            LEFT JOIN categories c ON c.id = q.category_id
            WHERE q.is_active = 1 AND ($1 IS NULL OR q.title_search LIKE $1 ESCAPE '\')
            ORDER BY q.created_at DESC, q.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(title_pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    /// Quizzes authored by `user_id`, newest first, with attempt statistics.
    pub async fn owned_quiz_stats(&self, user_id: i64) -> Result<Vec<OwnedQuizStats>> {
        let stats = sqlx::query_as::<_, OwnedQuizStats>(
            r#"
            SELECT q.id, q.title, q.is_active, q.created_at,
                   (SELECT COUNT(*) FROM questions qu WHERE qu.quiz_id = q.id) AS question_count,
                   (SELECT COUNT(*) FROM quiz_attempts a WHERE a.quiz_id = q.id) AS attempt_count,
                   (SELECT AVG(a.percentage) FROM quiz_attempts a WHERE a.quiz_id = q.id) AS average_percentage
            FROM quizzes q
            WHERE q.created_by = $1
            ORDER BY q.created_at DESC, q.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}

impl ListingRepository for Db {
    async fn count_active_quizzes(&self, title_pattern: Option<String>) -> Result<i64> {
        Db::count_active_quizzes(self, title_pattern).await
    }

    async fn active_quizzes(
        &self,
        title_pattern: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<QuizSummary>> {
        Db::active_quizzes(self, title_pattern, limit, offset).await
    }

    async fn quiz_by_id(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        Db::quiz_by_id(self, quiz_id).await
    }

    async fn questions_for_quiz(&self, quiz_id: i64) -> Result<Vec<QuestionWithOptions>> {
        Db::questions_for_quiz(self, quiz_id).await
    }

    async fn category_by_id(&self, category_id: i64) -> Result<Option<Category>> {
        Db::category_by_id(self, category_id).await
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        Db::categories(self).await
    }

    async fn leaderboard(&self, quiz_id: i64, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        Db::leaderboard(self, quiz_id, limit).await
    }

    async fn owned_quiz_stats(&self, user_id: i64) -> Result<Vec<OwnedQuizStats>> {
        Db::owned_quiz_stats(self, user_id).await
    }

    async fn attempt_history(&self, user_id: i64) -> Result<Vec<AttemptHistoryEntry>> {
        Db::attempt_history(self, user_id).await
    }

    async fn legacy_attempt_history(&self, user_id: i64) -> Result<Vec<LegacyAttemptEntry>> {
        Db::legacy_attempt_history(self, user_id).await
    }
}
