use color_eyre::{eyre::OptionExt, Result};

use super::models::Category;
use super::Db;

impl Db {
    pub async fn category_by_id(&self, category_id: i64) -> Result<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories WHERE id = $1")
                .bind(category_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(category)
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name, slug FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    /// Whether another category already uses `name` or `slug`.
    pub async fn category_conflict(
        &self,
        name: &str,
        slug: &str,
        except: Option<i64>,
    ) -> Result<bool> {
        let conflict: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM categories
                WHERE (name = $1 OR slug = $2) AND ($3 IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(except)
        .fetch_one(&self.pool)
        .await?;

        Ok(conflict)
    }

    pub async fn insert_category(&self, name: &str, slug: &str) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, slug) VALUES ($1, $2) RETURNING id, name, slug",
        )
        .bind(name)
        .bind(slug)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("category created: id={}, slug={}", category.id, category.slug);
        Ok(category)
    }

    pub async fn update_category(&self, category_id: i64, name: &str, slug: &str) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $1, slug = $2 WHERE id = $3 RETURNING id, name, slug",
        )
        .bind(name)
        .bind(slug)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_eyre("category not found")?;

        Ok(category)
    }
}
