use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cards::CardLedger;
use crate::club::ClubValidator;
use crate::error::AppError;
use crate::models::common::ApiResponse;
use crate::models::statistics::{StatRelation, StatisticsForm};
use crate::services::StatisticsService;

fn service(pool: &web::Data<PgPool>, ledger: &web::Data<CardLedger>) -> StatisticsService {
    StatisticsService::new(pool.get_ref().clone(), ledger.get_ref().clone())
}

/// Replace a match's statistics. Card changes implied by the booked and
/// sent-off sets are reported alongside the saved record.
#[tracing::instrument(name = "Upsert match statistics", skip(form, pool, ledger), fields(match_id = %match_id))]
pub async fn upsert_statistics(
    match_id: Uuid,
    form: web::Json<StatisticsForm>,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    ClubValidator::new().validate_statistics(&form)?;

    let update = service(&pool, &ledger).save(match_id, &form).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Statistics saved", update)))
}

#[tracing::instrument(name = "Clear statistics relation", skip(pool, ledger), fields(match_id = %match_id))]
pub async fn clear_relation(
    match_id: Uuid,
    relation: String,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    let relation: StatRelation = relation.parse().map_err(AppError::Validation)?;

    let update = service(&pool, &ledger).clear(match_id, relation).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(format!("Cleared {}", relation), update)))
}

pub async fn get_match_statistics(
    match_id: Uuid,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    let statistics = service(&pool, &ledger)
        .for_match(match_id)
        .await?
        .ok_or_else(|| AppError::not_found("Match statistics"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match statistics retrieved", statistics)))
}

pub async fn get_match_player_stats(
    match_id: Uuid,
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    let lines = service(&pool, &ledger).match_player_stats(match_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match player statistics", lines)))
}

pub async fn get_club_overview(
    pool: web::Data<PgPool>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    let overview = service(&pool, &ledger).club_overview().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Club statistics", overview)))
}
