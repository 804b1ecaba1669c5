use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::db::helpers::parse_column;
use crate::models::user::{UserRole, UserStatus};

#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
}

impl UserCredentials {
    pub fn role(&self) -> Result<UserRole, sqlx::Error> {
        parse_column(&self.role, "role")
    }

    pub fn status(&self) -> Result<UserStatus, sqlx::Error> {
        parse_column(&self.status, "status")
    }
}

pub async fn find_credentials(pool: &PgPool, username: &str) -> Result<Option<UserCredentials>, sqlx::Error> {
    sqlx::query_as::<_, UserCredentials>(
        r#"
        SELECT id, username, password_hash, role, status
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn insert_user(
    conn: &mut PgConnection,
    user_id: Uuid,
    username: &str,
    email: &str,
    password_hash: &str,
    role: UserRole,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, role, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(user_id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role.to_string())
    .bind(UserStatus::Active.to_string())
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn username_or_email_taken(pool: &PgPool, username: &str, email: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 OR email = $2)")
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await
}
