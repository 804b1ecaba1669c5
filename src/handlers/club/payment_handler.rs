use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::club::payments::validate_payment;
use crate::db::helpers::require_record;
use crate::db::{payments, players};
use crate::error::AppError;
use crate::handlers::club::current_player;
use crate::middleware::auth::Claims;
use crate::models::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::models::payment::{PaymentFilter, PaymentRequest, PaymentStatus, RejectPaymentRequest};

/// A player reports a payment of their own. It waits for staff review.
#[tracing::instrument(
    name = "Submit payment",
    skip(request, pool, claims),
    fields(username = %claims.username, kind = %request.kind)
)]
pub async fn submit_payment(
    request: web::Json<PaymentRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let player = current_player(&pool, &claims).await?;
    if request.player_id.is_some_and(|id| id != player.id) {
        return Err(AppError::Forbidden("Players can only submit their own payments".into()));
    }

    let payment = validate_payment(&request)?;
    let saved = payments::insert_payment(&pool, player.id, &payment).await?;

    tracing::info!("Payment {} submitted by player {}", saved.id, player.id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Payment submitted", saved)))
}

pub async fn my_payments(
    query: web::Query<PaginationParams>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let player = current_player(&pool, &claims).await?;
    let filter = PaymentFilter {
        player_id: Some(player.id),
        ..Default::default()
    };
    let (items, total) = payments::list_payments(&pool, &filter, query.limit(), query.offset()).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(items, &query, total)))
}

/// Someone else's payment reads as missing.
pub async fn my_payment(
    payment_id: Uuid,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let player = current_player(&pool, &claims).await?;
    let payment = payments::find_payment(&pool, payment_id)
        .await?
        .filter(|p| p.player_id == player.id)
        .ok_or_else(|| AppError::not_found("Payment"))?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Payment retrieved", payment)))
}

#[tracing::instrument(name = "Create payment", skip(request, pool), fields(kind = %request.kind))]
pub async fn create_payment(
    request: web::Json<PaymentRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let player_id = request
        .player_id
        .ok_or_else(|| AppError::Validation("player_id is required".into()))?;
    require_record(players::find_player(&pool, player_id).await, "Player")?;

    let payment = validate_payment(&request)?;
    let saved = payments::insert_payment(&pool, player_id, &payment).await?;

    tracing::info!("Payment {} recorded for player {}", saved.id, player_id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Payment created", saved)))
}

pub async fn list_payments(
    filter: web::Query<PaymentFilter>,
    query: web::Query<PaginationParams>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let (items, total) = payments::list_payments(&pool, &filter, query.limit(), query.offset()).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(items, &query, total)))
}

pub async fn get_payment(payment_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let payment = require_record(payments::find_payment(&pool, payment_id).await, "Payment")?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Payment retrieved", payment)))
}

#[tracing::instrument(name = "Approve payment", skip(pool), fields(payment_id = %payment_id))]
pub async fn approve_payment(payment_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let payment = require_record(
        payments::set_status(&pool, payment_id, PaymentStatus::Approved, None).await,
        "Payment",
    )?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Payment approved", payment)))
}

#[tracing::instrument(name = "Reject payment", skip(request, pool), fields(payment_id = %payment_id))]
pub async fn reject_payment(
    payment_id: Uuid,
    request: web::Json<RejectPaymentRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let reason = request.reason.trim();
    if reason.is_empty() {
        return Err(AppError::Validation("A reason is required to reject a payment".into()));
    }

    let payment = require_record(
        payments::set_status(&pool, payment_id, PaymentStatus::Rejected, Some(reason)).await,
        "Payment",
    )?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Payment rejected", payment)))
}

pub async fn set_archived(
    payment_id: Uuid,
    archived: bool,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let payment = require_record(payments::set_archived(&pool, payment_id, archived).await, "Payment")?;
    let message = if archived { "Payment archived" } else { "Payment restored" };
    Ok(HttpResponse::Ok().json(ApiResponse::success(message, payment)))
}

pub async fn dashboard(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let counts = payments::dashboard(&pool).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Payment dashboard", counts)))
}
