// src/handlers/auth_handler.rs
use actix_web::{web, HttpResponse};
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::jwt::JwtSettings;
use crate::db::{players, users};
use crate::error::AppError;
use crate::models::auth::{LoginRequest, LoginResponse};
use crate::models::common::ApiResponse;
use crate::models::user::UserStatus;
use crate::utils::password::verify_password;

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::<()>::error("Invalid username or password"))
}

#[tracing::instrument(
    name = "Login user attempt",
    skip(login_form, pool, jwt_settings),
    fields(
        username = %login_form.username
    )
)]
pub async fn login_user(
    login_form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    jwt_settings: web::Data<JwtSettings>,
) -> Result<HttpResponse, AppError> {
    let Some(user) = users::find_credentials(pool.get_ref(), login_form.username.trim()).await? else {
        tracing::info!("User not found or invalid credentials");
        return Ok(invalid_credentials());
    };

    if !verify_password(login_form.password.expose_secret(), &user.password_hash) {
        tracing::info!("Invalid password");
        return Ok(invalid_credentials());
    }

    let role = user.role()?;
    let status = user.status()?;
    if status != UserStatus::Active {
        tracing::info!("Login refused for {} account", status);
        return Err(AppError::Forbidden("Account is not active".into()));
    }

    let token = jwt_settings
        .issue_token(user.id, &user.username, role, status)
        .map_err(|e| AppError::Internal(format!("Error generating JWT token: {:?}", e)))?;

    let player_id = players::find_player_by_user(pool.get_ref(), user.id)
        .await?
        .map(|p| p.id);

    tracing::info!("User {} logged in", user.username);
    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        user_id: user.id,
        role,
        player_id,
    }))
}
