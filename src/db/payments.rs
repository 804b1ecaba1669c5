use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::helpers::parse_column;
use crate::models::payment::{Payment, PaymentDashboard, PaymentFilter, PaymentStatus, ValidPayment};

const PAYMENT_COLUMNS: &str = "id, player_id, kind, amount, method, reference, receipt_url, description, \
                               currency, status, rejection_reason, archived, created_at";

#[derive(sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    player_id: Uuid,
    kind: String,
    amount: Decimal,
    method: String,
    reference: Option<String>,
    receipt_url: Option<String>,
    description: Option<String>,
    currency: String,
    status: String,
    rejection_reason: Option<String>,
    archived: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = sqlx::Error;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: row.id,
            player_id: row.player_id,
            kind: parse_column(&row.kind, "kind")?,
            amount: row.amount,
            method: parse_column(&row.method, "method")?,
            reference: row.reference,
            receipt_url: row.receipt_url,
            description: row.description,
            currency: parse_column(&row.currency, "currency")?,
            status: parse_column(&row.status, "status")?,
            rejection_reason: row.rejection_reason,
            archived: row.archived,
            created_at: row.created_at,
        })
    }
}

fn into_payments(rows: Vec<PaymentRow>) -> Result<Vec<Payment>, sqlx::Error> {
    rows.into_iter().map(Payment::try_from).collect()
}

pub async fn insert_payment(pool: &PgPool, player_id: Uuid, payment: &ValidPayment) -> Result<Payment, sqlx::Error> {
    let row = sqlx::query_as::<_, PaymentRow>(&format!(
        r#"
        INSERT INTO payments (id, player_id, kind, amount, method, reference, receipt_url,
                              description, currency, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING {}
        "#,
        PAYMENT_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(player_id)
    .bind(payment.kind.as_str())
    .bind(payment.amount)
    .bind(payment.method.as_str())
    .bind(payment.reference.as_deref())
    .bind(payment.receipt_url.as_deref())
    .bind(payment.description.as_deref())
    .bind(payment.currency.as_str())
    .bind(PaymentStatus::Pending.as_str())
    .fetch_one(pool)
    .await?;
    Payment::try_from(row)
}

pub async fn find_payment(pool: &PgPool, payment_id: Uuid) -> Result<Option<Payment>, sqlx::Error> {
    let row = sqlx::query_as::<_, PaymentRow>(&format!("SELECT {} FROM payments WHERE id = $1", PAYMENT_COLUMNS))
        .bind(payment_id)
        .fetch_optional(pool)
        .await?;
    row.map(Payment::try_from).transpose()
}

/// Newest first. Archived payments only appear when the filter asks for them.
pub async fn list_payments(
    pool: &PgPool,
    filter: &PaymentFilter,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Payment>, i64), sqlx::Error> {
    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &PaymentFilter) {
        builder.push(" WHERE archived = ");
        builder.push_bind(filter.archived);
        if let Some(status) = filter.status {
            builder.push(" AND status = ");
            builder.push_bind(status.as_str());
        }
        if let Some(player_id) = filter.player_id {
            builder.push(" AND player_id = ");
            builder.push_bind(player_id);
        }
    }

    let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM payments");
    push_filters(&mut count, filter);
    let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

    let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM payments", PAYMENT_COLUMNS));
    push_filters(&mut select, filter);
    select.push(" ORDER BY created_at DESC LIMIT ");
    select.push_bind(limit);
    select.push(" OFFSET ");
    select.push_bind(offset);
    let rows = select.build_query_as::<PaymentRow>().fetch_all(pool).await?;

    Ok((into_payments(rows)?, total))
}

pub async fn set_status(
    pool: &PgPool,
    payment_id: Uuid,
    status: PaymentStatus,
    rejection_reason: Option<&str>,
) -> Result<Option<Payment>, sqlx::Error> {
    let row = sqlx::query_as::<_, PaymentRow>(&format!(
        "UPDATE payments SET status = $2, rejection_reason = $3 WHERE id = $1 RETURNING {}",
        PAYMENT_COLUMNS
    ))
    .bind(payment_id)
    .bind(status.as_str())
    .bind(rejection_reason)
    .fetch_optional(pool)
    .await?;
    row.map(Payment::try_from).transpose()
}

pub async fn set_archived(pool: &PgPool, payment_id: Uuid, archived: bool) -> Result<Option<Payment>, sqlx::Error> {
    let row = sqlx::query_as::<_, PaymentRow>(&format!(
        "UPDATE payments SET archived = $2 WHERE id = $1 RETURNING {}",
        PAYMENT_COLUMNS
    ))
    .bind(payment_id)
    .bind(archived)
    .fetch_optional(pool)
    .await?;
    row.map(Payment::try_from).transpose()
}

pub async fn dashboard(pool: &PgPool) -> Result<PaymentDashboard, sqlx::Error> {
    let (pending, approved, rejected, archived): (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE status = 'pending' AND NOT archived),
            COUNT(*) FILTER (WHERE status = 'approved' AND NOT archived),
            COUNT(*) FILTER (WHERE status = 'rejected' AND NOT archived),
            COUNT(*) FILTER (WHERE archived)
        FROM payments
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(PaymentDashboard { pending, approved, rejected, archived })
}
