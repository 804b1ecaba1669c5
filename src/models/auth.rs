// src/models/auth.rs
use serde::{Deserialize, Serialize};
use secrecy::SecretString;
use uuid::Uuid;

use crate::models::user::UserRole;

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(serialize_with = "crate::models::user::serialize_secret_string",
            deserialize_with = "crate::models::user::deserialize_secret_string")]
    pub password: SecretString,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub role: UserRole,
    /// Present for accounts that own a player profile.
    pub player_id: Option<Uuid>,
}
