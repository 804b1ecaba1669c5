pub mod card_handler;
pub mod match_handler;
pub mod payment_handler;
pub mod player_handler;
pub mod statistics_handler;
pub mod team_handler;
pub mod tournament_handler;

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::players;
use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::models::club::Player;

pub(crate) fn current_user_id(claims: &Claims) -> Result<Uuid, AppError> {
    claims
        .user_id()
        .ok_or_else(|| AppError::Forbidden("Invalid token subject".into()))
}

/// The player profile owned by the signed-in account.
pub(crate) async fn current_player(pool: &PgPool, claims: &Claims) -> Result<Player, AppError> {
    let user_id = current_user_id(claims)?;
    players::find_player_by_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Player profile"))
}
