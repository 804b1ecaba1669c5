use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::cards::error::CardError;
use crate::cards::store::{CardSession, CardStore};
use crate::models::card::{Card, NewCard};

const CARD_COLUMNS: &str = "id, match_id, player_id, kind, minute, issued_at, voided, void_reason";

#[derive(sqlx::FromRow)]
struct CardRow {
    id: Uuid,
    match_id: Uuid,
    player_id: Uuid,
    kind: String,
    minute: Option<i32>,
    issued_at: DateTime<Utc>,
    voided: bool,
    void_reason: Option<String>,
}

impl TryFrom<CardRow> for Card {
    type Error = CardError;

    fn try_from(row: CardRow) -> Result<Self, Self::Error> {
        let kind = row
            .kind
            .parse()
            .map_err(|e: String| CardError::Database(sqlx::Error::Decode(e.into())))?;
        Ok(Card {
            id: row.id,
            match_id: row.match_id,
            player_id: row.player_id,
            kind,
            minute: row.minute,
            issued_at: row.issued_at,
            voided: row.voided,
            void_reason: row.void_reason,
        })
    }
}

fn into_cards(rows: Vec<CardRow>) -> Result<Vec<Card>, CardError> {
    rows.into_iter().map(Card::try_from).collect()
}

/// Postgres-backed card store.
///
/// Sessions run in a transaction holding `pg_advisory_xact_lock` on the
/// (match, player) pair, released on commit or rollback.
#[derive(Clone)]
pub struct PgCardStore {
    pool: PgPool,
}

impl PgCardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CardStore for PgCardStore {
    async fn begin(&self, match_id: Uuid, player_id: Uuid) -> Result<Box<dyn CardSession>, CardError> {
        let mut tx = self.pool.begin().await?;

        let match_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM matches WHERE id = $1)")
            .bind(match_id)
            .fetch_one(&mut *tx)
            .await?;
        if !match_exists {
            return Err(CardError::MatchNotFound(match_id));
        }

        let player_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM players WHERE id = $1)")
            .bind(player_id)
            .fetch_one(&mut *tx)
            .await?;
        if !player_exists {
            return Err(CardError::PlayerNotFound(player_id));
        }

        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("cards:{}:{}", match_id, player_id))
            .execute(&mut *tx)
            .await?;

        Ok(Box::new(PgCardSession { tx, match_id, player_id }))
    }

    async fn find(&self, card_id: Uuid) -> Result<Option<Card>, CardError> {
        let row = sqlx::query_as::<_, CardRow>(&format!("SELECT {} FROM cards WHERE id = $1", CARD_COLUMNS))
            .bind(card_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Card::try_from).transpose()
    }

    async fn cards_for_match(&self, match_id: Uuid) -> Result<Vec<Card>, CardError> {
        let rows = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM cards WHERE match_id = $1 ORDER BY issued_at, seq",
            CARD_COLUMNS
        ))
        .bind(match_id)
        .fetch_all(&self.pool)
        .await?;
        into_cards(rows)
    }

    async fn cards_for_player(&self, player_id: Uuid) -> Result<Vec<Card>, CardError> {
        let rows = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM cards WHERE player_id = $1 ORDER BY issued_at DESC, seq DESC",
            CARD_COLUMNS
        ))
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;
        into_cards(rows)
    }

    async fn cards_for_matches(&self, match_ids: &[Uuid]) -> Result<Vec<Card>, CardError> {
        let rows = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM cards WHERE match_id = ANY($1) ORDER BY issued_at, seq",
            CARD_COLUMNS
        ))
        .bind(match_ids)
        .fetch_all(&self.pool)
        .await?;
        into_cards(rows)
    }

    async fn list_all(&self) -> Result<Vec<Card>, CardError> {
        let rows = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM cards ORDER BY issued_at, seq",
            CARD_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        into_cards(rows)
    }
}

struct PgCardSession {
    tx: Transaction<'static, Postgres>,
    match_id: Uuid,
    player_id: Uuid,
}

#[async_trait]
impl CardSession for PgCardSession {
    async fn active_cards(&mut self) -> Result<Vec<Card>, CardError> {
        let rows = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM cards WHERE match_id = $1 AND player_id = $2 AND NOT voided ORDER BY seq",
            CARD_COLUMNS
        ))
        .bind(self.match_id)
        .bind(self.player_id)
        .fetch_all(&mut *self.tx)
        .await?;
        into_cards(rows)
    }

    async fn insert(&mut self, card: NewCard) -> Result<Card, CardError> {
        let (match_id, player_id) = (card.match_id, card.player_id);
        let row = sqlx::query_as::<_, CardRow>(&format!(
            r#"
            INSERT INTO cards (id, match_id, player_id, kind, minute, issued_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CARD_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(card.match_id)
        .bind(card.player_id)
        .bind(card.kind.as_str())
        .bind(card.minute)
        .bind(card.issued_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                CardError::DuplicateCard { match_id, player_id }
            }
            other => CardError::Database(other),
        })?;
        Card::try_from(row)
    }

    async fn void(&mut self, card_id: Uuid, reason: &str) -> Result<Card, CardError> {
        let row = sqlx::query_as::<_, CardRow>(&format!(
            r#"
            UPDATE cards SET voided = TRUE, void_reason = $4
            WHERE id = $1 AND match_id = $2 AND player_id = $3 AND NOT voided
            RETURNING {}
            "#,
            CARD_COLUMNS
        ))
        .bind(card_id)
        .bind(self.match_id)
        .bind(self.player_id)
        .bind(reason)
        .fetch_optional(&mut *self.tx)
        .await?;

        match row {
            Some(row) => Card::try_from(row),
            None => {
                let voided: Option<bool> = sqlx::query_scalar(
                    "SELECT voided FROM cards WHERE id = $1 AND match_id = $2 AND player_id = $3",
                )
                .bind(card_id)
                .bind(self.match_id)
                .bind(self.player_id)
                .fetch_optional(&mut *self.tx)
                .await?;
                match voided {
                    Some(true) => Err(CardError::AlreadyVoided(card_id)),
                    _ => Err(CardError::CardNotFound(card_id)),
                }
            }
        }
    }

    async fn commit(self: Box<Self>) -> Result<(), CardError> {
        let session = *self;
        session.tx.commit().await?;
        Ok(())
    }
}
