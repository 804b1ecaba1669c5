use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use uuid::Uuid;

use crate::models::common::ApiResponse;

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("Player {player_id} already has a red card in match {match_id}")]
    DuplicateCard { match_id: Uuid, player_id: Uuid },

    #[error("Player {player_id} already has two yellow cards in match {match_id}")]
    TooManyCards { match_id: Uuid, player_id: Uuid },

    #[error("Minute cannot be negative: {0}")]
    InvalidMinute(i32),

    #[error("A reason is required to void a card")]
    MissingVoidReason,

    #[error("Match not found: {0}")]
    MatchNotFound(Uuid),

    #[error("Player not found: {0}")]
    PlayerNotFound(Uuid),

    #[error("Card not found: {0}")]
    CardNotFound(Uuid),

    #[error("Card {0} is already voided")]
    AlreadyVoided(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl CardError {
    /// Validation failures are reported to the caller; everything else is a
    /// lookup or infrastructure problem.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CardError::DuplicateCard { .. }
                | CardError::TooManyCards { .. }
                | CardError::InvalidMinute(_)
                | CardError::MissingVoidReason
        )
    }
}

impl ResponseError for CardError {
    fn status_code(&self) -> StatusCode {
        match self {
            CardError::DuplicateCard { .. } | CardError::AlreadyVoided(_) => StatusCode::CONFLICT,
            CardError::TooManyCards { .. }
            | CardError::InvalidMinute(_)
            | CardError::MissingVoidReason => StatusCode::UNPROCESSABLE_ENTITY,
            CardError::MatchNotFound(_)
            | CardError::PlayerNotFound(_)
            | CardError::CardNotFound(_) => StatusCode::NOT_FOUND,
            CardError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            CardError::Database(e) => {
                tracing::error!("Card ledger database error: {:?}", e);
                "Database error".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(ApiResponse::<()>::error(message))
    }
}
