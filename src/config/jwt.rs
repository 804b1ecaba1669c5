use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use uuid::Uuid;

use crate::middleware::auth::Claims;
use crate::models::user::{UserRole, UserStatus};

#[derive(Debug, Deserialize)]
pub struct JwtSettings {
    pub secret: SecretString,
    pub expiration_hours: i64,
}

impl JwtSettings {
    pub fn new(secret: String, expiration_hours: i64) -> Self {
        Self {
            secret: SecretString::new(secret.into_boxed_str()),
            expiration_hours,
        }
    }

    /// Sign a bearer token for the given account.
    pub fn issue_token(
        &self,
        user_id: Uuid,
        username: &str,
        role: UserRole,
        status: UserStatus,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let expires_at = Utc::now() + Duration::hours(self.expiration_hours);
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            status,
            exp: expires_at.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
    }
}
