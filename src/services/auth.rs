use color_eyre::Result;

use crate::db::models::AuthUser;
use crate::db::Db;
use crate::names::MIN_PASSWORD_LENGTH;

// ---------------------------------------------------------------------------
// AuthRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait AuthRepository: Send + Sync {
    fn username_exists(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// `None` when the username is already taken.
    fn create_user(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Option<i64>>> + Send;

    fn create_user_session(
        &self,
        user_id: i64,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn verify_user_password(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<AuthUser>>> + Send;

    fn delete_user_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

// ---------------------------------------------------------------------------
// Outcome enums
// ---------------------------------------------------------------------------

pub enum RegisterOutcome {
    /// User created and session started. Contains the session token.
    LoggedIn(String),
    /// Required fields were empty.
    EmptyFields,
    /// Username already in use.
    UsernameTaken,
    /// Password does not meet minimum requirements.
    WeakPassword,
}

pub enum LoginOutcome {
    /// Login succeeded. Contains the session token.
    Success(String),
    /// Password was incorrect (or username not found).
    InvalidCredentials,
}

// ---------------------------------------------------------------------------
// AuthService
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AuthService<R: AuthRepository = Db> {
    repo: R,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome> {
        let username = username.trim();
        let verified = self.repo.verify_user_password(username, password).await?;

        if !verified {
            return Ok(LoginOutcome::InvalidCredentials);
        }

        let user = self
            .repo
            .find_user_by_username(username)
            .await?
            .ok_or_else(|| color_eyre::eyre::eyre!("user not found after password verification"))?;

        let session_token = self.repo.create_user_session(user.id).await?;

        Ok(LoginOutcome::Success(session_token))
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<RegisterOutcome> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Ok(RegisterOutcome::EmptyFields);
        }

        if password.len() < MIN_PASSWORD_LENGTH {
            return Ok(RegisterOutcome::WeakPassword);
        }

        if self.repo.username_exists(username).await? {
            return Ok(RegisterOutcome::UsernameTaken);
        }

        // The unique constraint settles registrations racing for one name.
        let Some(user_id) = self.repo.create_user(username, password).await? else {
            return Ok(RegisterOutcome::UsernameTaken);
        };
        let session_token = self.repo.create_user_session(user_id).await?;
        Ok(RegisterOutcome::LoggedIn(session_token))
    }

    pub async fn logout(&self, session_id: &str) -> Result<()> {
        self.repo.delete_user_session(session_id).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
