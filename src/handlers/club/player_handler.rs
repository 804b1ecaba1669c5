use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cards::CardLedger;
use crate::club::ClubValidator;
use crate::config::settings::ClubSettings;
use crate::db::helpers::{require_affected, require_record};
use crate::db::players::{self, NewPlayer};
use crate::db::teams;
use crate::error::AppError;
use crate::handlers::club::{current_player, current_user_id};
use crate::middleware::auth::Claims;
use crate::models::club::{CreatePlayerRequest, UpdatePlayerRequest};
use crate::models::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::services::StatisticsService;

/// Staff create a profile for any account, or for none at all.
#[tracing::instrument(
    name = "Create player",
    skip(request, pool, club_settings),
    fields(national_id = %request.national_id)
)]
pub async fn create_player(
    request: web::Json<CreatePlayerRequest>,
    pool: web::Data<PgPool>,
    club_settings: web::Data<ClubSettings>,
) -> Result<HttpResponse, AppError> {
    let validator = ClubValidator::new();
    validator.validate_create_player(&request, Utc::now().date_naive())?;
    let first_name = validator.validate_name("First name", &request.first_name)?;
    let last_name = validator.validate_name("Last name", &request.last_name)?;
    let national_id = validator.validate_national_id(&request.national_id)?;

    let mut tx = pool.begin().await?;
    let team_id = match request.team_id {
        Some(team_id) => team_id,
        None => teams::get_or_create_team(&mut tx, &club_settings.default_team_name).await?.id,
    };

    let player = players::insert_player(
        &mut tx,
        &NewPlayer {
            user_id: request.user_id,
            first_name: &first_name,
            last_name: &last_name,
            national_id: &national_id,
            birth_date: request.birth_date,
            position: request.position.unwrap_or_default(),
            shirt_number: request.shirt_number,
            image_url: request.image_url.as_deref(),
            team_id: Some(team_id),
        },
    )
    .await
    .map_err(|e| AppError::from_write(e, "National id or account already has a player profile"))?;
    tx.commit().await?;

    tracing::info!("Created player {} ({})", player.full_name(), player.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Player created", player)))
}

pub async fn list_players(
    query: web::Query<PaginationParams>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let (players, total) = players::list_players(&pool, query.limit(), query.offset()).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(players, &query, total)))
}

pub async fn get_player(player_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let player = require_record(players::find_player(&pool, player_id).await, "Player")?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player retrieved", player)))
}

pub async fn get_my_player(pool: web::Data<PgPool>, claims: web::ReqData<Claims>) -> Result<HttpResponse, AppError> {
    let player = current_player(&pool, &claims).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player retrieved", player)))
}

/// Players may edit their own profile but not move teams. Staff may edit anyone.
#[tracing::instrument(
    name = "Update player",
    skip(request, pool, claims),
    fields(player_id = %player_id, username = %claims.username)
)]
pub async fn update_player(
    player_id: Uuid,
    request: web::Json<UpdatePlayerRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let mut changes = request.into_inner();
    if !claims.is_staff() {
        let user_id = current_user_id(&claims)?;
        let own = players::find_player_by_user(&pool, user_id).await?;
        if own.map(|p| p.id) != Some(player_id) {
            return Err(AppError::Forbidden("You can only edit your own profile".into()));
        }
        changes.team_id = None;
    }

    ClubValidator::new().validate_update_player(&changes, Utc::now().date_naive())?;

    let player = players::update_player(&pool, player_id, &changes)
        .await
        .map_err(|e| AppError::from_write(e, "Player update conflicts with an existing record"))?
        .ok_or_else(|| AppError::not_found("Player"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("Player updated", player)))
}

#[tracing::instrument(name = "Delete player", skip(pool), fields(player_id = %player_id))]
pub async fn delete_player(player_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    require_affected(players::delete_player(&pool, player_id).await?, "Player")?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Player deleted")))
}

/// Staff view of a player's statistics rows and full card history.
pub async fn player_debug(
    player_id: Uuid,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    let player = require_record(players::find_player(&pool, player_id).await, "Player")?;
    let view = StatisticsService::new(pool.get_ref().clone(), ledger.get_ref().clone())
        .player_debug(player)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player debug view", view)))
}
