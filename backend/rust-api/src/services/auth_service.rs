use anyhow::{anyhow, Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::models::user::{LoginRequest, RegisterRequest, User, UserProfile};

pub struct AuthService {
    db: SqlitePool,
}

impl AuthService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Hash a password using bcrypt with the default cost
    pub fn hash_password(&self, password: &str) -> Result<String> {
        hash(password, DEFAULT_COST).context("Failed to hash password")
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hashed: &str) -> Result<bool> {
        verify(password, hashed).context("Failed to verify password")
    }

    /// Register a new user with a unique username
    pub async fn register(&self, req: RegisterRequest) -> Result<UserProfile> {
        let username = req.username.trim().to_string();

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM user WHERE username = ?")
            .bind(&username)
            .fetch_optional(&self.db)
            .await
            .context("Failed to check existing user")?;

        if existing.is_some() {
            return Err(anyhow!("Username is already taken"));
        }

        let password_hash = self.hash_password(&req.password)?;

        let result =
            sqlx::query("INSERT INTO user(username, password_hash, created_at) VALUES(?, ?, ?)")
                .bind(&username)
                .bind(&password_hash)
                .bind(Utc::now())
                .execute(&self.db)
                .await
                .context("Failed to insert user")?;

        Ok(UserProfile {
            id: result.last_insert_rowid(),
            username,
        })
    }

    /// Login with username and password
    pub async fn login(&self, req: LoginRequest) -> Result<UserProfile> {
        let username = req.username.trim().to_string();

        let user: Option<User> = sqlx::query_as(
            "SELECT id, username, password_hash, created_at FROM user WHERE username = ?",
        )
        .bind(&username)
        .fetch_optional(&self.db)
        .await
        .context("Failed to query user")?;

        let user = user.ok_or_else(|| anyhow!("Invalid username or password"))?;

        if !self.verify_password(&req.password, &user.password_hash)? {
            tracing::warn!(username = %username, "Login failed: wrong password");
            return Err(anyhow!("Invalid username or password"));
        }

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_db() -> SqlitePool {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::services::init_schema(&db).await.unwrap();
        db
    }

    fn register_req(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "terrain-fissure-7".to_string(),
        }
    }

    #[tokio::test]
    async fn register_then_login_round_trip() {
        let service = AuthService::new(test_db().await);

        let profile = service.register(register_req("marie")).await.unwrap();
        assert_eq!(profile.username, "marie");

        let logged_in = service
            .login(LoginRequest {
                username: "marie".to_string(),
                password: "terrain-fissure-7".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.id, profile.id);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let service = AuthService::new(test_db().await);

        service.register(register_req("marie")).await.unwrap();
        let err = service.register(register_req("marie")).await.unwrap_err();
        assert!(err.to_string().contains("already taken"));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let service = AuthService::new(test_db().await);
        service.register(register_req("marie")).await.unwrap();

        let err = service
            .login(LoginRequest {
                username: "marie".to_string(),
                password: "not-the-password".to_string(),
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid username or password"));
    }

    #[tokio::test]
    async fn usernames_are_trimmed_on_registration() {
        let service = AuthService::new(test_db().await);
        let profile = service.register(register_req("  marie  ")).await.unwrap();
        assert_eq!(profile.username, "marie");
    }
}
