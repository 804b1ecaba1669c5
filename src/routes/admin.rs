// src/routes/admin.rs
//! Club management. Mounted behind the staff middleware.
use actix_web::{delete, get, post, put, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cards::CardLedger;
use crate::config::settings::ClubSettings;
use crate::error::AppError;
use crate::handlers::club::{
    card_handler, match_handler, payment_handler, player_handler, statistics_handler, team_handler,
    tournament_handler,
};
use crate::models::card::{IssueCardRequest, VoidCardRequest};
use crate::models::club::{CreatePlayerRequest, CreateTeamRequest, CreateTournamentRequest, SetTournamentTeamsRequest, UpdateTeamRequest};
use crate::models::common::PaginationParams;
use crate::models::fixture::{CreateMatchRequest, MatchResultRequest};
use crate::models::payment::{PaymentFilter, PaymentRequest, RejectPaymentRequest};
use crate::models::statistics::StatisticsForm;

// Teams

#[post("/teams")]
async fn create_team(
    request: web::Json<CreateTeamRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    team_handler::create_team(request, pool).await
}

#[put("/teams/{team_id}")]
async fn update_team(
    path: web::Path<Uuid>,
    request: web::Json<UpdateTeamRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    team_handler::update_team(path.into_inner(), request, pool).await
}

#[delete("/teams/{team_id}")]
async fn delete_team(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    team_handler::delete_team(path.into_inner(), pool).await
}

// Players

#[post("/players")]
async fn create_player(
    request: web::Json<CreatePlayerRequest>,
    pool: web::Data<PgPool>,
    club_settings: web::Data<ClubSettings>,
) -> Result<HttpResponse, AppError> {
    player_handler::create_player(request, pool, club_settings).await
}

#[delete("/players/{player_id}")]
async fn delete_player(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    player_handler::delete_player(path.into_inner(), pool).await
}

/// Statistics rows and full card history of a player
#[get("/players/{player_id}/debug")]
async fn player_debug(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    player_handler::player_debug(path.into_inner(), pool, ledger).await
}

// Tournaments

#[post("/tournaments")]
async fn create_tournament(
    request: web::Json<CreateTournamentRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    tournament_handler::create_tournament(request, pool).await
}

#[put("/tournaments/{tournament_id}/teams")]
async fn set_tournament_teams(
    path: web::Path<Uuid>,
    request: web::Json<SetTournamentTeamsRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    tournament_handler::set_tournament_teams(path.into_inner(), request, pool).await
}

#[delete("/tournaments/{tournament_id}")]
async fn delete_tournament(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    tournament_handler::delete_tournament(path.into_inner(), pool).await
}

// Matches and statistics

#[post("/matches")]
async fn create_match(
    request: web::Json<CreateMatchRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    match_handler::create_match(request, pool).await
}

#[put("/matches/{match_id}/result")]
async fn record_result(
    path: web::Path<Uuid>,
    request: web::Json<MatchResultRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    match_handler::record_result(path.into_inner(), request, pool).await
}

#[put("/matches/{match_id}/statistics")]
async fn upsert_statistics(
    path: web::Path<Uuid>,
    form: web::Json<StatisticsForm>,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    statistics_handler::upsert_statistics(path.into_inner(), form, pool, ledger).await
}

#[delete("/matches/{match_id}/statistics/{relation}")]
async fn clear_statistics_relation(
    path: web::Path<(Uuid, String)>,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    let (match_id, relation) = path.into_inner();
    statistics_handler::clear_relation(match_id, relation, pool, ledger).await
}

// Cards

#[post("/cards")]
async fn issue_card(
    request: web::Json<IssueCardRequest>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    card_handler::issue_card(request, ledger).await
}

#[post("/cards/{card_id}/void")]
async fn void_card(
    path: web::Path<Uuid>,
    request: web::Json<VoidCardRequest>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    card_handler::void_card(path.into_inner(), request, ledger).await
}

// Payments

#[post("/payments")]
async fn create_payment(
    request: web::Json<PaymentRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    payment_handler::create_payment(request, pool).await
}

#[get("/payments")]
async fn list_payments(
    filter: web::Query<PaymentFilter>,
    query: web::Query<PaginationParams>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    payment_handler::list_payments(filter, query, pool).await
}

#[get("/payments/dashboard")]
async fn payment_dashboard(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    payment_handler::dashboard(pool).await
}

#[get("/payments/{payment_id}")]
async fn get_payment(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    payment_handler::get_payment(path.into_inner(), pool).await
}

#[post("/payments/{payment_id}/approve")]
async fn approve_payment(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    payment_handler::approve_payment(path.into_inner(), pool).await
}

#[post("/payments/{payment_id}/reject")]
async fn reject_payment(
    path: web::Path<Uuid>,
    request: web::Json<RejectPaymentRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    payment_handler::reject_payment(path.into_inner(), request, pool).await
}

#[post("/payments/{payment_id}/archive")]
async fn archive_payment(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    payment_handler::set_archived(path.into_inner(), true, pool).await
}

#[post("/payments/{payment_id}/unarchive")]
async fn unarchive_payment(path: web::Path<Uuid>, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    payment_handler::set_archived(path.into_inner(), false, pool).await
}
