use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::club::votes::featured_player;
use crate::club::ClubValidator;
use crate::db::helpers::require_record;
use crate::db::{matches, players, votes};
use crate::error::AppError;
use crate::handlers::club::current_user_id;
use crate::middleware::auth::Claims;
use crate::models::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::models::fixture::{CreateMatchRequest, FeaturedPlayer, MatchDetail, MatchResultRequest, VoteRequest};

#[tracing::instrument(
    name = "Create match",
    skip(request, pool),
    fields(home = %request.home_team_id, away = %request.away_team_id)
)]
pub async fn create_match(
    request: web::Json<CreateMatchRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    ClubValidator::new().validate_create_match(&request)?;

    let fixture = matches::insert_match(&pool, &request)
        .await
        .map_err(|e| AppError::from_write(e, "Match already exists"))?;

    tracing::info!("Created match {} on {}", fixture.id, fixture.match_date);
    Ok(HttpResponse::Created().json(ApiResponse::success("Match created", fixture)))
}

/// Results listing, newest first.
pub async fn list_results(
    query: web::Query<PaginationParams>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let (summaries, total) = matches::list_match_summaries(&pool, query.limit(), query.offset()).await?;
    Ok(HttpResponse::Ok().json(PaginatedResponse::new(summaries, &query, total)))
}

/// A match with its player of the match, if anyone has voted.
pub async fn get_match(match_id: Uuid, pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let fixture = require_record(matches::find_match(&pool, match_id).await, "Match")?;
    let match_votes = votes::votes_for_match(&pool, match_id).await?;

    let featured = match featured_player(&match_votes) {
        Some(tally) => players::find_player(&pool, tally.player_id)
            .await?
            .map(|player| FeaturedPlayer {
                player_id: player.id,
                first_name: player.first_name,
                last_name: player.last_name,
                votes: tally.votes,
            }),
        None => None,
    };

    let detail = MatchDetail {
        fixture,
        total_votes: match_votes.len() as i64,
        featured_player: featured,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match retrieved", detail)))
}

/// Vote for the player of the match. The player must be on one of the two
/// teams, and each account votes once per match.
#[tracing::instrument(
    name = "Vote player of the match",
    skip(request, pool, claims),
    fields(match_id = %match_id, player_id = %request.player_id, username = %claims.username)
)]
pub async fn cast_vote(
    match_id: Uuid,
    request: web::Json<VoteRequest>,
    pool: web::Data<PgPool>,
    claims: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    let user_id = current_user_id(&claims)?;
    let fixture = require_record(matches::find_match(&pool, match_id).await, "Match")?;
    let player = require_record(players::find_player(&pool, request.player_id).await, "Player")?;

    if !player.team_id.is_some_and(|team_id| fixture.involves(team_id)) {
        return Err(AppError::Validation("Player did not take part in this match".into()));
    }

    let vote = votes::insert_vote(&pool, match_id, player.id, user_id)
        .await
        .map_err(|e| AppError::from_write(e, "You have already voted in this match"))?;

    tracing::info!("Vote {} recorded for player {} in match {}", vote.id, player.id, match_id);
    Ok(HttpResponse::Created().json(ApiResponse::success("Vote recorded", vote)))
}

#[tracing::instrument(
    name = "Record match result",
    skip(request, pool),
    fields(match_id = %match_id, home_score = request.home_score, away_score = request.away_score)
)]
pub async fn record_result(
    match_id: Uuid,
    request: web::Json<MatchResultRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let validator = ClubValidator::new();
    validator.validate_score("Home", request.home_score)?;
    validator.validate_score("Away", request.away_score)?;

    let fixture = require_record(
        matches::record_result(&pool, match_id, request.home_score, request.away_score).await,
        "Match",
    )?;
    Ok(HttpResponse::Ok().json(ApiResponse::success("Match result recorded", fixture)))
}
