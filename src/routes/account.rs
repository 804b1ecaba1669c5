// src/routes/account.rs
//! Routes for any signed-in account.
use actix_web::{get, post, put, web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::handlers::club::{match_handler, payment_handler, player_handler};
use crate::middleware::auth::Claims;
use crate::models::club::UpdatePlayerRequest;
use crate::models::common::PaginationParams;
use crate::models::fixture::VoteRequest;
use crate::models::payment::PaymentRequest;

/// Get the caller's own player profile
#[get("/player")]
async fn get_my_player(pool: web::Data<PgPool>, claims: web::ReqData<Claims>) -> Result<HttpResponse, AppError> {
    player_handler::get_my_player(pool, claims).await
}

/// Update a player profile (own profile, or any for staff)
#[put("/players/{player_id}")]
async fn update_player(
    path: web::Path<Uuid>,
    request: web::Json<UpdatePlayerRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    player_handler::update_player(path.into_inner(), request, pool, claims).await
}

#[post("/payments")]
async fn submit_payment(
    request: web::Json<PaymentRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    payment_handler::submit_payment(request, pool, claims).await
}

#[get("/payments")]
async fn my_payments(
    query: web::Query<PaginationParams>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    payment_handler::my_payments(query, pool, claims).await
}

#[get("/payments/{payment_id}")]
async fn my_payment(
    path: web::Path<Uuid>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    payment_handler::my_payment(path.into_inner(), pool, claims).await
}

/// Vote for the player of the match
#[post("/matches/{match_id}/votes")]
async fn vote_player_of_match(
    path: web::Path<Uuid>,
    request: web::Json<VoteRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    match_handler::cast_vote(path.into_inner(), request, pool, claims).await
}
