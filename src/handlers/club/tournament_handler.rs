use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cards::CardLedger;
use crate::club::standings::compute_standings;
use crate::club::ClubValidator;
use crate::db::helpers::{require_affected, require_record};
use crate::db::{matches, tournaments};
use crate::error::AppError;
use crate::models::club::{CreateTournamentRequest, SetTournamentTeamsRequest, TournamentWithTeams};
use crate::models::common::ApiResponse;
use crate::services::StatisticsService;

#[tracing::instrument(name = "Create tournament", skip(request, pool), fields(name = %request.name))]
pub async fn create_tournament(
    request: web::Json<CreateTournamentRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let name = ClubValidator::new().validate_create_tournament(&request)?;

    let mut tx = pool.begin().await?;
    let tournament = tournaments::insert_tournament(&mut tx, &name, request.start_date, request.end_date).await?;
    if !request.team_ids.is_empty() {
        tournaments::set_tournament_teams(&mut tx, tournament.id, &request.team_ids)
            .await
            .map_err(|e| AppError::from_write(e, "Duplicate team in tournament"))?;
    }
    tx.commit().await?;

    let teams = tournaments::tournament_teams(&pool, tournament.id).await?;
    tracing::info!("Created tournament {} with {} teams", tournament.id, teams.len());
    Ok(HttpResponse::Created().json(ApiResponse::success(
        "Tournament created",
        TournamentWithTeams { tournament, teams },
    )))
}

pub async fn list_tournaments(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let tournaments = tournaments::list_tournaments(&pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Tournaments retrieved", tournaments)))
}

pub async fn get_tournament(tournament_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let tournament = require_record(tournaments::find_tournament(&pool, tournament_id).await, "Tournament")?;
    let teams = tournaments::tournament_teams(&pool, tournament_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Tournament retrieved",
        TournamentWithTeams { tournament, teams },
    )))
}

#[tracing::instrument(name = "Set tournament teams", skip(request, pool), fields(tournament_id = %tournament_id))]
pub async fn set_tournament_teams(
    tournament_id: Uuid,
    request: web::Json<SetTournamentTeamsRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    ClubValidator::new().validate_team_ids(&request.team_ids)?;
    let tournament = require_record(tournaments::find_tournament(&pool, tournament_id).await, "Tournament")?;

    let mut tx = pool.begin().await?;
    tournaments::set_tournament_teams(&mut tx, tournament_id, &request.team_ids)
        .await
        .map_err(|e| AppError::from_write(e, "Duplicate team in tournament"))?;
    tx.commit().await?;

    let teams = tournaments::tournament_teams(&pool, tournament_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "Tournament teams updated",
        TournamentWithTeams { tournament, teams },
    )))
}

#[tracing::instrument(name = "Delete tournament", skip(pool), fields(tournament_id = %tournament_id))]
pub async fn delete_tournament(tournament_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    require_affected(tournaments::delete_tournament(&pool, tournament_id).await?, "Tournament")?;
    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_message("Tournament deleted")))
}

pub async fn get_standings(tournament_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    require_record(tournaments::find_tournament(&pool, tournament_id).await, "Tournament")?;
    let teams = tournaments::tournament_teams(&pool, tournament_id).await?;
    let fixtures = matches::tournament_matches(&pool, tournament_id).await?;

    let standings = compute_standings(&teams, &fixtures);
    Ok(HttpResponse::Ok().json(ApiResponse::success("Standings retrieved", standings)))
}

pub async fn get_player_stats(
    tournament_id: Uuid,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    let lines = StatisticsService::new(pool.get_ref().clone(), ledger.get_ref().clone())
        .tournament_player_stats(tournament_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Tournament player statistics", lines)))
}
