use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use color_eyre::Result;
use ulid::Ulid;

use super::models::AuthUser;
use super::Db;
use crate::services::auth::AuthRepository;

impl Db {
    /// Returns `None` when `username` is already taken.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<Option<i64>> {
        let password_hash = hash_password(password).await?;

        let inserted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, password_hash, created_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(username)
        .bind(&password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(user_id) => {
                tracing::info!("new user created: id={user_id}, username={username}");
                Ok(Some(user_id))
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::debug!("username {username} already taken");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            "SELECT id, username, is_admin FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    pub async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        let stored_hash: Option<String> =
            sqlx::query_scalar("SELECT password_hash FROM users WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(match stored_hash {
            Some(hash) => verify_password(password, &hash).await,
            None => false,
        })
    }

    /// Grant category management rights. Returns false when no such user exists.
    pub async fn promote_to_admin(&self, username: &str) -> Result<bool> {
        let affected = sqlx::query("UPDATE users SET is_admin = 1 WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected > 0 {
            tracing::info!("user {username} promoted to admin");
        }
        Ok(affected > 0)
    }

    pub async fn create_user_session(&self, user_id: i64) -> Result<String> {
        let session = Ulid::new().to_string();

        sqlx::query("INSERT INTO user_sessions (id, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(&session)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        tracing::info!("new user session created for user_id={user_id}");
        Ok(session)
    }

    pub async fn get_user_by_session(&self, session_id: &str) -> Result<Option<AuthUser>> {
        let user = sqlx::query_as::<_, AuthUser>(
            r#"
            SELECT u.id, u.username, u.is_admin
            FROM user_sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM user_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

impl AuthRepository for Db {
    async fn username_exists(&self, username: &str) -> Result<bool> {
        Db::username_exists(self, username).await
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<Option<i64>> {
        Db::create_user(self, username, password).await
    }

    async fn create_user_session(&self, user_id: i64) -> Result<String> {
        Db::create_user_session(self, user_id).await
    }

    async fn verify_user_password(&self, username: &str, password: &str) -> Result<bool> {
        Db::verify_user_password(self, username, password).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<AuthUser>> {
        Db::find_user_by_username(self, username).await
    }

    async fn delete_user_session(&self, session_id: &str) -> Result<()> {
        Db::delete_user_session(self, session_id).await
    }
}

/// argon2 is CPU-bound, so it runs on the blocking pool.
async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| color_eyre::eyre::eyre!("failed to hash password: {e}"))
    })
    .await?
}

async fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || {
        let parsed_hash = match PasswordHash::new(&hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    })
    .await
    .unwrap_or(false)
}
