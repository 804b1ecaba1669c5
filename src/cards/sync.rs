//! Keeps card rows in step with the booked / sent-off sets of a match's
//! statistics record.
//!
//! Callers pass the membership before and after an edit. Failures are logged
//! and reported but never returned, so a statistics save is not blocked by the
//! card side.

use std::collections::BTreeSet;

use serde::Serialize;
use uuid::Uuid;

use crate::cards::ledger::CardLedger;
use crate::models::card::CardKind;
use crate::models::statistics::StatRelation;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SyncFailure {
    pub player_id: Uuid,
    pub error: String,
}

/// What a synchronization pass changed.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct SyncReport {
    /// Ids of cards created.
    pub issued: Vec<Uuid>,
    /// Ids of cards voided.
    pub voided: Vec<Uuid>,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: SyncReport) {
        self.issued.extend(other.issued);
        self.voided.extend(other.voided);
        self.failures.extend(other.failures);
    }
}

fn removal_reason(relation: StatRelation) -> String {
    format!("Player removed from {} in match statistics", relation)
}

impl CardLedger {
    /// Apply the difference between two memberships of `relation`.
    ///
    /// Added players get a card of the matching kind unless they already hold
    /// an active one. Removed players have every active card of that kind voided.
    /// Relations that do not map to a card kind are ignored.
    #[tracing::instrument(
        name = "Sync cards with statistics",
        skip(self, before, after),
        fields(match_id = %match_id, relation = %relation)
    )]
    pub async fn sync_membership<'a>(
        &self,
        match_id: Uuid,
        relation: StatRelation,
        before: impl IntoIterator<Item = &'a Uuid>,
        after: impl IntoIterator<Item = &'a Uuid>,
    ) -> SyncReport {
        let mut report = SyncReport::default();
        let Some(kind) = relation.card_kind() else {
            return report;
        };

        let before: BTreeSet<Uuid> = before.into_iter().copied().collect();
        let after: BTreeSet<Uuid> = after.into_iter().copied().collect();

        for player_id in after.difference(&before) {
            self.sync_added(match_id, *player_id, kind, &mut report).await;
        }
        let reason = removal_reason(relation);
        for player_id in before.difference(&after) {
            self.sync_removed(match_id, *player_id, kind, &reason, &mut report).await;
        }

        if !report.is_clean() {
            tracing::warn!(
                "Card sync for match {} finished with {} failure(s)",
                match_id,
                report.failures.len()
            );
        }
        report
    }

    /// Void the cards of everyone who was in `relation` before it was cleared.
    pub async fn on_cleared<'a>(
        &self,
        match_id: Uuid,
        relation: StatRelation,
        snapshot: impl IntoIterator<Item = &'a Uuid>,
    ) -> SyncReport {
        self.sync_membership(match_id, relation, snapshot, std::iter::empty())
            .await
    }

    async fn sync_added(&self, match_id: Uuid, player_id: Uuid, kind: CardKind, report: &mut SyncReport) {
        match self.ensure_active(match_id, player_id, kind).await {
            Ok(Some(card)) => report.issued.push(card.id),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    "Could not issue {} card for player {} in match {}: {}",
                    kind,
                    player_id,
                    match_id,
                    e
                );
                report.failures.push(SyncFailure { player_id, error: e.to_string() });
            }
        }
    }

    async fn sync_removed(
        &self,
        match_id: Uuid,
        player_id: Uuid,
        kind: CardKind,
        reason: &str,
        report: &mut SyncReport,
    ) {
        match self.void_active(match_id, player_id, kind, reason).await {
            Ok(cards) => report.voided.extend(cards.into_iter().map(|c| c.id)),
            Err(e) => {
                tracing::warn!(
                    "Could not void {} cards for player {} in match {}: {}",
                    kind,
                    player_id,
                    match_id,
                    e
                );
                report.failures.push(SyncFailure { player_id, error: e.to_string() });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::*;
    use crate::cards::memory_store::MemoryCardStore;
    use crate::models::card::IssueCardRequest;

    fn ledger() -> (CardLedger, MemoryCardStore) {
        let store = MemoryCardStore::new();
        (CardLedger::new(Arc::new(store.clone())), store)
    }

    fn set(ids: &[Uuid]) -> HashSet<Uuid> {
        ids.iter().copied().collect()
    }

    #[tokio::test]
    async fn adding_to_booked_issues_one_yellow_and_is_idempotent() {
        let (ledger, store) = ledger();
        let (m, p) = (Uuid::new_v4(), Uuid::new_v4());

        let report = ledger
            .sync_membership(m, StatRelation::Booked, &set(&[]), &set(&[p]))
            .await;
        assert_eq!(report.issued.len(), 1);

        // The caller re-sends a membership that already includes the player.
        let report = ledger
            .sync_membership(m, StatRelation::Booked, &set(&[]), &set(&[p]))
            .await;
        assert!(report.issued.is_empty());

        let cards = store.all_cards().await;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::Yellow);
        assert_eq!(cards[0].minute, None);
    }

    #[tokio::test]
    async fn adding_to_sent_off_issues_red() {
        let (ledger, store) = ledger();
        let (m, p) = (Uuid::new_v4(), Uuid::new_v4());

        ledger
            .sync_membership(m, StatRelation::SentOff, &set(&[]), &set(&[p]))
            .await;
        let cards = store.all_cards().await;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::Red);
    }

    #[tokio::test]
    async fn removing_from_booked_voids_rather_than_deletes() {
        let (ledger, store) = ledger();
        let (m, p) = (Uuid::new_v4(), Uuid::new_v4());

        ledger
            .sync_membership(m, StatRelation::Booked, &set(&[]), &set(&[p]))
            .await;
        let report = ledger
            .sync_membership(m, StatRelation::Booked, &set(&[p]), &set(&[]))
            .await;
        assert_eq!(report.voided.len(), 1);

        let cards = store.all_cards().await;
        assert_eq!(cards.len(), 1);
        assert!(cards[0].voided);
        assert!(cards[0].void_reason.as_deref().unwrap().contains("booked"));
    }

    #[tokio::test]
    async fn removal_voids_every_active_card_of_the_kind() {
        let (ledger, store) = ledger();
        let (m, p) = (Uuid::new_v4(), Uuid::new_v4());
        for minute in [12, 48] {
            ledger
                .issue(IssueCardRequest {
                    match_id: m,
                    player_id: p,
                    kind: CardKind::Yellow,
                    minute: Some(minute),
                    issued_at: None,
                })
                .await
                .unwrap();
        }

        let report = ledger
            .sync_membership(m, StatRelation::Booked, &set(&[p]), &set(&[]))
            .await;
        assert_eq!(report.voided.len(), 2);

        // The automatic red stays.
        let active: Vec<_> = store.all_cards().await.into_iter().filter(|c| c.is_active()).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, CardKind::Red);
    }

    #[tokio::test]
    async fn clearing_voids_cards_of_the_snapshot() {
        let (ledger, store) = ledger();
        let m = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        ledger
            .sync_membership(m, StatRelation::Booked, &set(&[]), &set(&[a, b]))
            .await;
        let report = ledger.on_cleared(m, StatRelation::Booked, &set(&[a, b])).await;
        assert_eq!(report.voided.len(), 2);
        assert!(store.all_cards().await.iter().all(|c| c.voided));
    }

    #[tokio::test]
    async fn unchanged_members_are_left_alone() {
        let (ledger, store) = ledger();
        let m = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        ledger
            .sync_membership(m, StatRelation::Booked, &set(&[]), &set(&[a]))
            .await;
        let report = ledger
            .sync_membership(m, StatRelation::Booked, &set(&[a]), &set(&[a, b]))
            .await;
        assert_eq!(report.issued.len(), 1);
        assert!(report.voided.is_empty());
        assert_eq!(store.all_cards().await.len(), 2);
    }

    #[tokio::test]
    async fn non_card_relations_are_ignored() {
        let (ledger, store) = ledger();
        let report = ledger
            .sync_membership(Uuid::new_v4(), StatRelation::Scorers, &set(&[]), &set(&[Uuid::new_v4()]))
            .await;
        assert_eq!(report, SyncReport::default());
        assert!(store.all_cards().await.is_empty());
    }

    #[tokio::test]
    async fn failures_are_reported_not_raised() {
        let m = Uuid::new_v4();
        let known = Uuid::new_v4();
        let unknown = Uuid::new_v4();
        let ledger = CardLedger::new(Arc::new(MemoryCardStore::strict([m], [known])));

        let report = ledger
            .sync_membership(m, StatRelation::Booked, &set(&[]), &set(&[known, unknown]))
            .await;
        assert_eq!(report.issued.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].player_id, unknown);
    }
}
