// src/routes/club.rs
//! Read-only club data. No authentication required.
use actix_web::{get, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cards::CardLedger;
use crate::error::AppError;
use crate::handlers::club::{
    card_handler, match_handler, player_handler, statistics_handler, team_handler, tournament_handler,
};
use crate::models::common::PaginationParams;

#[get("/teams")]
async fn list_teams(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    team_handler::list_teams(pool).await
}

#[get("/teams/{team_id}")]
async fn get_team(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    team_handler::get_team(path.into_inner(), pool).await
}

/// Get all players (with pagination)
#[get("/players")]
async fn list_players(
    query: web::Query<PaginationParams>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    player_handler::list_players(query, pool).await
}

#[get("/players/{player_id}")]
async fn get_player(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    player_handler::get_player(path.into_inner(), pool).await
}

/// Card history of a player, voided cards included
#[get("/players/{player_id}/cards")]
async fn get_player_cards(path: web::Path<Uuid>, ledger: web::Data<CardLedger>) -> Result<HttpResponse, AppError> {
    card_handler::player_cards(path.into_inner(), ledger).await
}

#[get("/tournaments")]
async fn list_tournaments(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    tournament_handler::list_tournaments(pool).await
}

#[get("/tournaments/{tournament_id}")]
async fn get_tournament(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    tournament_handler::get_tournament(path.into_inner(), pool).await
}

/// Get tournament standings
#[get("/tournaments/{tournament_id}/standings")]
async fn get_standings(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    tournament_handler::get_standings(path.into_inner(), pool).await
}

#[get("/tournaments/{tournament_id}/player_stats")]
async fn get_tournament_player_stats(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    tournament_handler::get_player_stats(path.into_inner(), pool, ledger).await
}

/// Get match results (with pagination)
#[get("/matches")]
async fn list_results(
    query: web::Query<PaginationParams>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    match_handler::list_results(query, pool).await
}

#[get("/matches/{match_id}")]
async fn get_match(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    match_handler::get_match(path.into_inner(), pool).await
}

#[get("/matches/{match_id}/statistics")]
async fn get_match_statistics(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    statistics_handler::get_match_statistics(path.into_inner(), pool, ledger).await
}

#[get("/matches/{match_id}/player_stats")]
async fn get_match_player_stats(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    statistics_handler::get_match_player_stats(path.into_inner(), pool, ledger).await
}

#[get("/matches/{match_id}/cards")]
async fn get_match_cards(path: web::Path<Uuid>, ledger: web::Data<CardLedger>) -> Result<HttpResponse, AppError> {
    card_handler::match_cards(path.into_inner(), ledger).await
}

/// Active yellow and red counts per player
#[get("/matches/{match_id}/cards/counts")]
async fn get_match_card_counts(path: web::Path<Uuid>, ledger: web::Data<CardLedger>) -> Result<HttpResponse, AppError> {
    card_handler::match_card_counts(path.into_inner(), ledger).await
}

#[get("/cards/{card_id}")]
async fn get_card(path: web::Path<Uuid>, ledger: web::Data<CardLedger>) -> Result<HttpResponse, AppError> {
    card_handler::get_card(path.into_inner(), ledger).await
}

/// Club-wide leaders, card totals and win percentage
#[get("/stats/club")]
async fn get_club_overview(
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    statistics_handler::get_club_overview(pool, ledger).await
}
