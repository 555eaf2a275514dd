use std::collections::HashMap;

use color_eyre::{eyre::OptionExt, Result};

use super::models::{Question, QuestionOption, QuestionWithOptions};
use super::Db;
use crate::models::QuestionDraft;

impl Db {
    /// Insert a question with its four options atomically in a transaction.
    pub async fn insert_question(
        &self,
        quiz_id: i64,
        draft: &QuestionDraft,
    ) -> Result<QuestionWithOptions> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(
            "INSERT INTO questions (quiz_id, question_text) VALUES ($1, $2) RETURNING id, quiz_id, question_text",
        )
        .bind(quiz_id)
        .bind(&draft.question_text)
        .fetch_one(&mut *tx)
        .await?;

        let mut options = Vec::with_capacity(draft.options.len());
        for (position, option) in draft.options.iter().enumerate() {
            let option = sqlx::query_as::<_, QuestionOption>(
                r#"
                INSERT INTO options (question_id, position, option_text, is_correct)
                VALUES ($1, $2, $3, $4)
                RETURNING id, question_id, position, option_text, is_correct
                "#,
            )
            .bind(question.id)
            .bind(position as i64)
            .bind(&option.text)
            .bind(option.is_correct)
            .fetch_one(&mut *tx)
            .await?;
            options.push(option);
        }

        tx.commit().await?;

        Ok(QuestionWithOptions { question, options })
    }

    /// Overwrite the text and the options of a question, matching options by
    /// position, atomically in a transaction.
    pub async fn replace_question(
        &self,
        question_id: i64,
        draft: &QuestionDraft,
    ) -> Result<QuestionWithOptions> {
        let mut tx = self.pool.begin().await?;

        let question = sqlx::query_as::<_, Question>(
            "UPDATE questions SET question_text = $1 WHERE id = $2 RETURNING id, quiz_id, question_text",
        )
        .bind(&draft.question_text)
        .bind(question_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_eyre("question not found")?;

        // Clear the flags first so the single-correct index holds after every statement.
        sqlx::query("UPDATE options SET is_correct = 0 WHERE question_id = $1")
            .bind(question_id)
            .execute(&mut *tx)
            .await?;

        for (position, option) in draft.options.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO options (question_id, position, option_text, is_correct)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (question_id, position)
                DO UPDATE SET option_text = excluded.option_text, is_correct = excluded.is_correct
                "#,
            )
            .bind(question_id)
            .bind(position as i64)
            .bind(&option.text)
            .bind(option.is_correct)
            .execute(&mut *tx)
            .await?;
        }

        let options = sqlx::query_as::<_, QuestionOption>(
            r#"
            SELECT id, question_id, position, option_text, is_correct
            FROM options WHERE question_id = $1 ORDER BY position
            "#,
        )
        .bind(question_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(QuestionWithOptions { question, options })
    }

    pub async fn delete_question(&self, question_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(question_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn question_owner(&self, question_id: i64) -> Result<Option<i64>> {
        let owner: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT quizzes.created_by
            FROM questions JOIN quizzes ON quizzes.id = questions.quiz_id
            WHERE questions.id = $1
            "#,
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }

    pub async fn question_with_options(
        &self,
        question_id: i64,
    ) -> Result<Option<QuestionWithOptions>> {
        let Some(question) = sqlx::query_as::<_, Question>(
            "SELECT id, quiz_id, question_text FROM questions WHERE id = $1",
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let options = sqlx::query_as::<_, QuestionOption>(
            r#"
            SELECT id, question_id, position, option_text, is_correct
            FROM options WHERE question_id = $1 ORDER BY position
            "#,
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(QuestionWithOptions { question, options }))
    }

    /// All questions of a quiz in creation order, each with its options.
    pub async fn questions_for_quiz(&self, quiz_id: i64) -> Result<Vec<QuestionWithOptions>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT id, quiz_id, question_text FROM questions WHERE quiz_id = $1 ORDER BY id",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let options = sqlx::query_as::<_, QuestionOption>(
            r#"
            SELECT o.id, o.question_id, o.position, o.option_text, o.is_correct
            FROM options o
            JOIN questions q ON q.id = o.question_id
            WHERE q.quiz_id = $1
            ORDER BY o.question_id, o.position
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_question: HashMap<i64, Vec<QuestionOption>> = HashMap::new();
        for option in options {
            by_question.entry(option.question_id).or_default().push(option);
        }

        Ok(questions
            .into_iter()
            .map(|question| {
                let options = by_question.remove(&question.id).unwrap_or_default();
                QuestionWithOptions { question, options }
            })
            .collect())
    }

    pub async fn questions_count(&self, quiz_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE quiz_id = $1")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
