use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::cards::CardLedger;
use crate::error::AppError;
use crate::models::card::{IssueCardRequest, VoidCardRequest};
use crate::models::common::ApiResponse;

/// Only the requested card is returned. An automatic red shows up in the
/// match's card list.
#[tracing::instrument(
    name = "Issue card",
    skip(request, ledger),
    fields(match_id = %request.match_id, player_id = %request.player_id, kind = %request.kind)
)]
pub async fn issue_card(
    request: web::Json<IssueCardRequest>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    let card = ledger.issue(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success("Card issued", card)))
}

#[tracing::instrument(name = "Void card", skip(request, ledger), fields(card_id = %card_id))]
pub async fn void_card(
    card_id: Uuid,
    request: web::Json<VoidCardRequest>,
    ledger: web::Data<CardLedger>,
) -> Result<HttpResponse, AppError> {
    let card = ledger.void(card_id, &request.reason).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Card voided", card)))
}

#[tracing::instrument(name = "Get card", skip(ledger))]
pub async fn get_card(card_id: Uuid, ledger: web::Data<CardLedger>) -> Result<HttpResponse, AppError> {
    let card = ledger.card(card_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Card retrieved", card)))
}

#[tracing::instrument(name = "Get match cards", skip(ledger))]
pub async fn match_cards(match_id: Uuid, ledger: web::Data<CardLedger>) -> Result<HttpResponse, AppError> {
    let cards = ledger.cards_for_match(match_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match cards retrieved", cards)))
}

#[tracing::instrument(name = "Get match card counts", skip(ledger))]
pub async fn match_card_counts(match_id: Uuid, ledger: web::Data<CardLedger>) -> Result<HttpResponse, AppError> {
    let counts = ledger.counts_for_match(match_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match card counts retrieved", counts)))
}

#[tracing::instrument(name = "Get player cards", skip(ledger))]
pub async fn player_cards(player_id: Uuid, ledger: web::Data<CardLedger>) -> Result<HttpResponse, AppError> {
    let cards = ledger.cards_for_player(player_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Player cards retrieved", cards)))
}
