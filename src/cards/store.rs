use async_trait::async_trait;
use uuid::Uuid;

use crate::cards::error::CardError;
use crate::models::card::{Card, NewCard};

/// Persistence for card rows.
///
/// Writes go through a [`CardSession`], which holds an exclusive lock on one
/// (match, player) pair until it is committed or dropped. Two concurrent
/// issuances for the same pair therefore never both observe the same count.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Lock the pair and open a unit of work on it.
    ///
    /// Fails with `MatchNotFound` / `PlayerNotFound` when either side is unknown.
    async fn begin(&self, match_id: Uuid, player_id: Uuid) -> Result<Box<dyn CardSession>, CardError>;

    async fn find(&self, card_id: Uuid) -> Result<Option<Card>, CardError>;

    /// Every card of a match, voided included, ordered by issuance.
    async fn cards_for_match(&self, match_id: Uuid) -> Result<Vec<Card>, CardError>;

    /// Every card of a player across matches, voided included, newest first.
    async fn cards_for_player(&self, player_id: Uuid) -> Result<Vec<Card>, CardError>;

    /// Cards of several matches, voided included, ordered by issuance.
    async fn cards_for_matches(&self, match_ids: &[Uuid]) -> Result<Vec<Card>, CardError>;

    /// Every stored card, voided included, ordered by issuance.
    async fn list_all(&self) -> Result<Vec<Card>, CardError>;
}

/// A locked view of one (match, player) pair.
///
/// Changes become visible to other sessions only after [`CardSession::commit`].
/// Dropping a session without committing discards its changes.
#[async_trait]
pub trait CardSession: Send {
    /// Non-voided cards of the pair, in insertion order, including uncommitted ones.
    async fn active_cards(&mut self) -> Result<Vec<Card>, CardError>;

    async fn insert(&mut self, card: NewCard) -> Result<Card, CardError>;

    /// Mark an active card of the pair as voided.
    async fn void(&mut self, card_id: Uuid, reason: &str) -> Result<Card, CardError>;

    async fn commit(self: Box<Self>) -> Result<(), CardError>;
}
