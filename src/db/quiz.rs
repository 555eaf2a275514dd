use chrono::{DateTime, Utc};
use color_eyre::{eyre::OptionExt, Result};

use super::models::{Category, QuestionWithOptions, Quiz};
use super::Db;
use crate::models::{QuestionDraft, QuizFields};
use crate::services::authoring::AuthoringRepository;

const QUIZ_COLUMNS: &str =
    "id, title, category_id, description, created_by, created_at, is_active";

impl Db {
    pub async fn insert_quiz(
        &self,
        owner: i64,
        fields: &QuizFields,
        created_at: DateTime<Utc>,
    ) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            r#"
            INSERT INTO quizzes (title, title_search, category_id, description, created_by, created_at, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {QUIZ_COLUMNS}
            "#
        ))
        .bind(&fields.title)
        .bind(fields.title.to_lowercase())
        .bind(fields.category_id)
        .bind(&fields.description)
        .bind(owner)
        .bind(created_at)
        .bind(fields.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn update_quiz(&self, quiz_id: i64, fields: &QuizFields) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            r#"
            UPDATE quizzes
            SET title = $1, title_search = $2, category_id = $3, description = $4, is_active = $5
            WHERE id = $6
            RETURNING {QUIZ_COLUMNS}
            "#
        ))
        .bind(&fields.title)
        .bind(fields.title.to_lowercase())
        .bind(fields.category_id)
        .bind(&fields.description)
        .bind(fields.is_active)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_eyre("quiz not found")?;

        Ok(quiz)
    }

    /// Questions, options and attempts are removed by the foreign key cascades.
    pub async fn delete_quiz(&self, quiz_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn quiz_by_id(&self, quiz_id: i64) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE id = $1"
        ))
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn quiz_owner(&self, quiz_id: i64) -> Result<Option<i64>> {
        let owner: Option<i64> = sqlx::query_scalar("SELECT created_by FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    pub async fn quiz_exists(&self, quiz_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM quizzes WHERE id = $1)")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

impl AuthoringRepository for Db {
    async fn quiz_owner(&self, quiz_id: i64) -> Result<Option<i64>> {
        Db::quiz_owner(self, quiz_id).await
    }

    async fn question_owner(&self, question_id: i64) -> Result<Option<i64>> {
        Db::question_owner(self, question_id).await
    }

    async fn insert_quiz(
        &self,
        owner: i64,
        fields: &QuizFields,
        created_at: DateTime<Utc>,
    ) -> Result<Quiz> {
        Db::insert_quiz(self, owner, fields, created_at).await
    }

    async fn update_quiz(&self, quiz_id: i64, fields: &QuizFields) -> Result<Quiz> {
        Db::update_quiz(self, quiz_id, fields).await
    }

    async fn delete_quiz(&self, quiz_id: i64) -> Result<()> {
        Db::delete_quiz(self, quiz_id).await
    }

    async fn insert_question(
        &self,
        quiz_id: i64,
        draft: &QuestionDraft,
    ) -> Result<QuestionWithOptions> {
        Db::insert_question(self, quiz_id, draft).await
    }

    async fn replace_question(
        &self,
        question_id: i64,
        draft: &QuestionDraft,
    ) -> Result<QuestionWithOptions> {
        Db::replace_question(self, question_id, draft).await
    }

    async fn delete_question(&self, question_id: i64) -> Result<()> {
        Db::delete_question(self, question_id).await
    }

    async fn question_with_options(&self, question_id: i64) -> Result<Option<QuestionWithOptions>> {
        Db::question_with_options(self, question_id).await
    }

    async fn category_by_id(&self, category_id: i64) -> Result<Option<Category>> {
        Db::category_by_id(self, category_id).await
    }

    async fn category_conflict(&self, name: &str, slug: &str, except: Option<i64>) -> Result<bool> {
        Db::category_conflict(self, name, slug, except).await
    }

    async fn insert_category(&self, name: &str, slug: &str) -> Result<Category> {
        Db::insert_category(self, name, slug).await
    }

    async fn update_category(&self, category_id: i64, name: &str, slug: &str) -> Result<Category> {
        Db::update_category(self, category_id, name, slug).await
    }
}
