use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::cards::error::CardError;
use crate::cards::rules;
use crate::cards::store::{CardSession, CardStore};
use crate::models::card::{Card, CardCounts, CardKind, IssueCardRequest, NewCard};

/// Owns every card row and the rules around them.
///
/// Each write runs in one store session, so the limit check, the insert and
/// a possible automatic red are committed together or not at all.
#[derive(Clone)]
pub struct CardLedger {
    store: Arc<dyn CardStore>,
}

impl CardLedger {
    pub fn new(store: Arc<dyn CardStore>) -> Self {
        Self { store }
    }

    /// Show a card. A second active yellow also produces a red, which is
    /// stored but not returned.
    #[tracing::instrument(
        name = "Issue card",
        skip(self, request),
        fields(
            match_id = %request.match_id,
            player_id = %request.player_id,
            kind = %request.kind,
            minute = ?request.minute
        )
    )]
    pub async fn issue(&self, request: IssueCardRequest) -> Result<Card, CardError> {
        let mut session = self.store.begin(request.match_id, request.player_id).await?;
        let card = issue_in_session(
            &mut session,
            NewCard {
                match_id: request.match_id,
                player_id: request.player_id,
                kind: request.kind,
                minute: request.minute,
                issued_at: request.issued_at.unwrap_or_else(Utc::now),
            },
        )
        .await?;
        session.commit().await?;

        tracing::info!("Issued {} card {}", card.kind, card.id);
        Ok(card)
    }

    /// Void a card. Voiding is final.
    #[tracing::instrument(name = "Void card", skip(self, reason), fields(card_id = %card_id))]
    pub async fn void(&self, card_id: Uuid, reason: &str) -> Result<Card, CardError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(CardError::MissingVoidReason);
        }

        let card = self
            .store
            .find(card_id)
            .await?
            .ok_or(CardError::CardNotFound(card_id))?;
        if card.voided {
            return Err(CardError::AlreadyVoided(card_id));
        }

        let mut session = self.store.begin(card.match_id, card.player_id).await?;
        let voided = session.void(card_id, reason).await?;
        session.commit().await?;

        tracing::info!("Voided {} card {}: {}", voided.kind, voided.id, reason);
        Ok(voided)
    }

    /// Issue a card of `kind` unless the pair already holds an active one.
    ///
    /// Returns `None` when nothing had to be issued.
    pub async fn ensure_active(
        &self,
        match_id: Uuid,
        player_id: Uuid,
        kind: CardKind,
    ) -> Result<Option<Card>, CardError> {
        let mut session = self.store.begin(match_id, player_id).await?;
        let active = session.active_cards().await?;
        if active.iter().any(|c| c.kind == kind) {
            return Ok(None);
        }

        let card = issue_in_session(
            &mut session,
            NewCard {
                match_id,
                player_id,
                kind,
                minute: None,
                issued_at: Utc::now(),
            },
        )
        .await?;
        session.commit().await?;
        Ok(Some(card))
    }

    /// Void every active card of `kind` held by the pair.
    pub async fn void_active(
        &self,
        match_id: Uuid,
        player_id: Uuid,
        kind: CardKind,
        reason: &str,
    ) -> Result<Vec<Card>, CardError> {
        let mut session = self.store.begin(match_id, player_id).await?;
        let targets: Vec<Uuid> = session
            .active_cards()
            .await?
            .into_iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.id)
            .collect();

        let mut voided = Vec::with_capacity(targets.len());
        for card_id in targets {
            voided.push(session.void(card_id, reason).await?);
        }
        session.commit().await?;
        Ok(voided)
    }

    pub async fn card(&self, card_id: Uuid) -> Result<Card, CardError> {
        self.store
            .find(card_id)
            .await?
            .ok_or(CardError::CardNotFound(card_id))
    }

    /// All cards of a match, voided ones included, in issuance order.
    pub async fn cards_for_match(&self, match_id: Uuid) -> Result<Vec<Card>, CardError> {
        self.store.cards_for_match(match_id).await
    }

    /// A player's full card history, newest first.
    pub async fn cards_for_player(&self, player_id: Uuid) -> Result<Vec<Card>, CardError> {
        self.store.cards_for_player(player_id).await
    }

    pub async fn cards_for_matches(&self, match_ids: &[Uuid]) -> Result<Vec<Card>, CardError> {
        if match_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.store.cards_for_matches(match_ids).await
    }

    pub async fn all_cards(&self) -> Result<Vec<Card>, CardError> {
        self.store.list_all().await
    }

    /// Active yellow/red totals per player for one match.
    pub async fn counts_for_match(&self, match_id: Uuid) -> Result<Vec<CardCounts>, CardError> {
        let cards = self.store.cards_for_match(match_id).await?;
        let mut counts: BTreeMap<Uuid, CardCounts> = BTreeMap::new();
        for card in cards.iter().filter(|c| c.is_active()) {
            let entry = counts.entry(card.player_id).or_insert(CardCounts {
                player_id: card.player_id,
                ..Default::default()
            });
            match card.kind {
                CardKind::Yellow => entry.yellow += 1,
                CardKind::Red => entry.red += 1,
            }
        }
        Ok(counts.into_values().collect())
    }

    pub async fn counts_for_player_in_match(
        &self,
        match_id: Uuid,
        player_id: Uuid,
    ) -> Result<CardCounts, CardError> {
        let cards = self.store.cards_for_match(match_id).await?;
        Ok(CardCounts::tally(player_id, &cards))
    }
}

async fn issue_in_session(
    session: &mut Box<dyn CardSession>,
    card: NewCard,
) -> Result<Card, CardError> {
    let active = session.active_cards().await?;
    rules::check_issue(&active, card.match_id, card.player_id, card.kind, card.minute)?;

    let issued = session.insert(card).await?;
    if issued.kind != CardKind::Yellow {
        return Ok(issued);
    }

    let active = session.active_cards().await?;
    if let Some(escalation) = rules::escalation_after(&active, &issued) {
        let red = session
            .insert(NewCard {
                match_id: issued.match_id,
                player_id: issued.player_id,
                kind: CardKind::Red,
                minute: escalation.minute,
                issued_at: Utc::now().max(issued.issued_at),
            })
            .await?;
        tracing::info!(
            "Second yellow for player {} in match {}: red card {} issued at minute {:?}",
            issued.player_id,
            issued.match_id,
            red.id,
            red.minute
        );
    }

    Ok(issued)
}
