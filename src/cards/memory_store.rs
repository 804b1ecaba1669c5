use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::cards::error::CardError;
use crate::cards::store::{CardSession, CardStore};
use crate::models::card::{Card, NewCard};

#[derive(Default)]
struct MemoryState {
    cards: Vec<Card>,
}

/// Process-local card store.
///
/// A single async mutex serializes sessions. By default any match or player id
/// is accepted; [`MemoryCardStore::strict`] restricts both to known sets.
#[derive(Clone, Default)]
pub struct MemoryCardStore {
    state: Arc<Mutex<MemoryState>>,
    known: Option<Arc<(HashSet<Uuid>, HashSet<Uuid>)>>,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(
        matches: impl IntoIterator<Item = Uuid>,
        players: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        Self {
            state: Arc::default(),
            known: Some(Arc::new((matches.into_iter().collect(), players.into_iter().collect()))),
        }
    }

    /// Snapshot of every stored card in insertion order.
    pub async fn all_cards(&self) -> Vec<Card> {
        self.state.lock().await.cards.clone()
    }
}

#[async_trait]
impl CardStore for MemoryCardStore {
    async fn begin(&self, match_id: Uuid, player_id: Uuid) -> Result<Box<dyn CardSession>, CardError> {
        if let Some(known) = &self.known {
            if !known.0.contains(&match_id) {
                return Err(CardError::MatchNotFound(match_id));
            }
            if !known.1.contains(&player_id) {
                return Err(CardError::PlayerNotFound(player_id));
            }
        }

        let guard = self.state.clone().lock_owned().await;
        let working = guard
            .cards
            .iter()
            .filter(|c| c.match_id == match_id && c.player_id == player_id)
            .cloned()
            .collect();

        Ok(Box::new(MemorySession { guard, working }))
    }

    async fn find(&self, card_id: Uuid) -> Result<Option<Card>, CardError> {
        let state = self.state.lock().await;
        Ok(state.cards.iter().find(|c| c.id == card_id).cloned())
    }

    async fn cards_for_match(&self, match_id: Uuid) -> Result<Vec<Card>, CardError> {
        let state = self.state.lock().await;
        let mut cards: Vec<Card> = state
            .cards
            .iter()
            .filter(|c| c.match_id == match_id)
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.issued_at);
        Ok(cards)
    }

    async fn cards_for_player(&self, player_id: Uuid) -> Result<Vec<Card>, CardError> {
        let state = self.state.lock().await;
        let mut cards: Vec<Card> = state
            .cards
            .iter()
            .filter(|c| c.player_id == player_id)
            .cloned()
            .collect();
        cards.reverse();
        cards.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(cards)
    }

    async fn cards_for_matches(&self, match_ids: &[Uuid]) -> Result<Vec<Card>, CardError> {
        let state = self.state.lock().await;
        let mut cards: Vec<Card> = state
            .cards
            .iter()
            .filter(|c| match_ids.contains(&c.match_id))
            .cloned()
            .collect();
        cards.sort_by_key(|c| c.issued_at);
        Ok(cards)
    }

    async fn list_all(&self) -> Result<Vec<Card>, CardError> {
        let mut cards = self.all_cards().await;
        cards.sort_by_key(|c| c.issued_at);
        Ok(cards)
    }
}

struct MemorySession {
    guard: OwnedMutexGuard<MemoryState>,
    // All cards of the pair, voided included, in insertion order.
    working: Vec<Card>,
}

#[async_trait]
impl CardSession for MemorySession {
    async fn active_cards(&mut self) -> Result<Vec<Card>, CardError> {
        Ok(self.working.iter().filter(|c| c.is_active()).cloned().collect())
    }

    async fn insert(&mut self, card: NewCard) -> Result<Card, CardError> {
        let card = card.into_card(Uuid::new_v4());
        self.working.push(card.clone());
        Ok(card)
    }

    async fn void(&mut self, card_id: Uuid, reason: &str) -> Result<Card, CardError> {
        let card = self
            .working
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or(CardError::CardNotFound(card_id))?;
        if card.voided {
            return Err(CardError::AlreadyVoided(card_id));
        }
        card.voided = true;
        card.void_reason = Some(reason.to_string());
        Ok(card.clone())
    }

    async fn commit(self: Box<Self>) -> Result<(), CardError> {
        let MemorySession { mut guard, working } = *self;
        for card in working {
            match guard.cards.iter_mut().find(|c| c.id == card.id) {
                Some(existing) => *existing = card,
                None => guard.cards.push(card),
            }
        }
        Ok(())
    }
}
