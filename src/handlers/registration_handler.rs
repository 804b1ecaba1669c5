use actix_web::{web, HttpResponse};
use chrono::Utc;
use secrecy::ExposeSecret;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::club::ClubValidator;
use crate::config::settings::ClubSettings;
use crate::db::{players, teams, users};
use crate::db::players::NewPlayer;
use crate::error::AppError;
use crate::models::club::Position;
use crate::models::common::ApiResponse;
use crate::models::user::{RegistrationRequest, UserRole};
use crate::utils::password::hash_password;

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub user_id: Uuid,
    pub player_id: Uuid,
    pub team_id: Option<Uuid>,
}

#[tracing::instrument(
    name = "Adding a new user",
    // Don't show arguments
    skip(user_form, pool, club_settings),
    fields(
        username = %user_form.username,
        email = %user_form
    )
)]
pub async fn register_user(
    user_form: web::Json<RegistrationRequest>,
    pool: web::Data<PgPool>,
    club_settings: web::Data<ClubSettings>,
) -> Result<HttpResponse, AppError> {
    let validator = ClubValidator::new();
    let (username, email) =
        validator.validate_account(&user_form.username, &user_form.email, user_form.password.expose_secret())?;
    let first_name = validator.validate_name("First name", &user_form.first_name)?;
    let last_name = validator.validate_name("Last name", &user_form.last_name)?;
    let national_id = validator.validate_national_id(&user_form.national_id)?;
    validator.validate_birth_date(user_form.birth_date, Utc::now().date_naive())?;

    if users::username_or_email_taken(pool.get_ref(), &username, &email).await? {
        return Err(AppError::Conflict("Username or email already registered".into()));
    }

    let password_hash = hash_password(user_form.password.expose_secret())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let user_id = Uuid::new_v4();

    // The account and its player profile are created together or not at all
    let mut tx = pool.begin().await?;
    users::insert_user(&mut tx, user_id, &username, &email, &password_hash, UserRole::Player)
        .await
        .map_err(|e| AppError::from_write(e, "Username or email already registered"))?;

    let team = teams::get_or_create_team(&mut tx, &club_settings.default_team_name).await?;
    let player = players::insert_player(
        &mut tx,
        &NewPlayer {
            user_id: Some(user_id),
            first_name: &first_name,
            last_name: &last_name,
            national_id: &national_id,
            birth_date: user_form.birth_date,
            position: Position::default(),
            shirt_number: None,
            image_url: None,
            team_id: Some(team.id),
        },
    )
    .await
    .map_err(|e| AppError::from_write(e, "National id already registered"))?;
    tx.commit().await?;

    tracing::info!("Registered user {} with player profile {}", user_id, player.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Registration successful",
        RegistrationResponse {
            user_id,
            player_id: player.id,
            team_id: player.team_id,
        },
    )))
}
