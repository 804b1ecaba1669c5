use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::cards::{CardLedger, SyncReport};
use crate::club::player_stats::{club_overview, stat_lines};
use crate::db::{matches, players, statistics, tournaments};
use crate::error::AppError;
use crate::models::club::Player;
use crate::models::statistics::{
    ClubOverview, MatchStatistics, PlayerDebugView, PlayerStatLine, StatRelation, StatisticsForm,
};

/// A saved statistics record and what the card side did about it.
#[derive(Debug, Serialize)]
pub struct StatisticsUpdate {
    pub statistics: MatchStatistics,
    pub card_sync: SyncReport,
}

/// Edits and aggregates match statistics.
///
/// Writes commit first and only then hand the membership diff of the card
/// relations to the ledger, so a card failure never rolls back a statistics save.
///
/// Card sync is best effort and assumes one editor per match at a time. Two
/// concurrent saves of the same match may apply their diffs in a different
/// order than they committed, which can leave cards out of step with the
/// final booked / sent-off sets until the next save.
pub struct StatisticsService {
    pool: PgPool,
    ledger: CardLedger,
}

impl StatisticsService {
    pub fn new(pool: PgPool, ledger: CardLedger) -> Self {
        Self { pool, ledger }
    }

    #[tracing::instrument(name = "Save match statistics", skip(self, form), fields(match_id = %match_id))]
    pub async fn save(&self, match_id: Uuid, form: &StatisticsForm) -> Result<StatisticsUpdate, AppError> {
        if matches::find_match(&self.pool, match_id).await?.is_none() {
            return Err(AppError::not_found("Match"));
        }

        let mut tx = self.pool.begin().await?;
        let before = statistics::lock_for_match(&mut tx, match_id).await?;

        let statistics_id = statistics::upsert_counters(&mut tx, match_id, form.goals, form.assists).await?;
        for relation in StatRelation::ALL {
            statistics::replace_members(&mut tx, statistics_id, relation, form.members(relation))
                .await
                .map_err(|e| AppError::from_write(e, "Duplicate player in statistics"))?;
        }

        let after = statistics::find_for_match(&mut tx, match_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Statistics for match {} vanished during save", match_id)))?;
        tx.commit().await?;

        let mut card_sync = SyncReport::default();
        for relation in StatRelation::ALL.into_iter().filter(|r| r.card_kind().is_some()) {
            let previous: &[Uuid] = before.as_ref().map(|s| s.members(relation)).unwrap_or_default();
            card_sync.merge(
                self.ledger
                    .sync_membership(match_id, relation, previous, after.members(relation))
                    .await,
            );
        }

        tracing::info!(
            "Saved statistics for match {}: {} cards issued, {} voided",
            match_id,
            card_sync.issued.len(),
            card_sync.voided.len()
        );
        Ok(StatisticsUpdate { statistics: after, card_sync })
    }

    /// Empty one player set of a match's statistics.
    #[tracing::instrument(name = "Clear statistics relation", skip(self), fields(match_id = %match_id, relation = %relation))]
    pub async fn clear(&self, match_id: Uuid, relation: StatRelation) -> Result<StatisticsUpdate, AppError> {
        let mut tx = self.pool.begin().await?;
        let existing = statistics::lock_for_match(&mut tx, match_id)
            .await?
            .ok_or_else(|| AppError::not_found("Match statistics"))?;

        let snapshot = statistics::clear_relation(&mut tx, existing.id, relation).await?;
        let after = statistics::find_for_match(&mut tx, match_id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Statistics for match {} vanished during clear", match_id)))?;
        tx.commit().await?;

        let card_sync = self.ledger.on_cleared(match_id, relation, &snapshot).await;
        Ok(StatisticsUpdate { statistics: after, card_sync })
    }

    pub async fn for_match(&self, match_id: Uuid) -> Result<Option<MatchStatistics>, AppError> {
        let mut conn = self.pool.acquire().await?;
        Ok(statistics::find_for_match(&mut conn, match_id).await?)
    }

    /// Stat lines for the players of both teams in a match.
    pub async fn match_player_stats(&self, match_id: Uuid) -> Result<Vec<PlayerStatLine>, AppError> {
        let fixture = matches::find_match(&self.pool, match_id)
            .await?
            .ok_or_else(|| AppError::not_found("Match"))?;

        let squad = players::players_of_teams(&self.pool, &[fixture.home_team_id, fixture.away_team_id]).await?;
        let records: Vec<MatchStatistics> = self.for_match(match_id).await?.into_iter().collect();
        let cards = self.ledger.cards_for_match(match_id).await?;

        Ok(stat_lines(&squad, &records, &cards))
    }

    /// Stat lines for the players of every team in a tournament, over that
    /// tournament's matches only.
    pub async fn tournament_player_stats(&self, tournament_id: Uuid) -> Result<Vec<PlayerStatLine>, AppError> {
        if tournaments::find_tournament(&self.pool, tournament_id).await?.is_none() {
            return Err(AppError::not_found("Tournament"));
        }

        let team_ids: Vec<Uuid> = tournaments::tournament_teams(&self.pool, tournament_id)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let squad = players::players_of_teams(&self.pool, &team_ids).await?;
        let match_ids: Vec<Uuid> = matches::tournament_matches(&self.pool, tournament_id)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        let mut conn = self.pool.acquire().await?;
        let records = statistics::for_matches(&mut conn, &match_ids).await?;
        let cards = self.ledger.cards_for_matches(&match_ids).await?;

        Ok(stat_lines(&squad, &records, &cards))
    }

    pub async fn club_overview(&self) -> Result<ClubOverview, AppError> {
        let squad = players::all_players(&self.pool).await?;
        let fixtures = matches::all_matches(&self.pool).await?;
        let mut conn = self.pool.acquire().await?;
        let records = statistics::all(&mut conn).await?;
        let cards = self.ledger.all_cards().await?;

        Ok(club_overview(&squad, &records, &cards, &fixtures))
    }

    /// Everything stored about a player, voided cards included.
    pub async fn player_debug(&self, player: Player) -> Result<PlayerDebugView, AppError> {
        let mut conn = self.pool.acquire().await?;
        let records = statistics::for_player(&mut conn, player.id).await?;
        let cards = self.ledger.cards_for_player(player.id).await?;

        Ok(PlayerDebugView { player, statistics: records, cards })
    }
}
