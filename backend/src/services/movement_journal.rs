//! Movement journal store
//!
//! Append-only: rows are inserted and read, never updated or deleted.

use chrono::{DateTime, Utc};
use futures::stream::{BoxStream, StreamExt};
use rust_decimal::Decimal;
use shared::{MovementKind, MovementOrder, MovementRecord, NewMovement};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::{AppError, AppResult};

#[derive(Debug, FromRow)]
struct MovementRow {
    id: i64,
    occurred_at: DateTime<Utc>,
    kind: String,
    product_ref: Option<String>,
    color: String,
    quantity: i64,
    weight: Decimal,
    reference: String,
}

impl MovementRow {
    fn into_record(self) -> AppResult<MovementRecord> {
        let kind = MovementKind::parse(&self.kind).ok_or_else(|| {
            AppError::Internal(format!(
                "movement {} has unknown kind '{}'",
                self.id, self.kind
            ))
        })?;

        Ok(MovementRecord {
            id: self.id,
            occurred_at: self.occurred_at,
            kind,
            product_ref: self.product_ref,
            color: self.color,
            quantity: self.quantity,
            weight: self.weight,
            reference: self.reference,
        })
    }
}

/// Append one movement
pub async fn record(conn: &mut PgConnection, movement: &NewMovement) -> AppResult<MovementRecord> {
    let row = sqlx::query_as::<_, MovementRow>(
        r#"
        INSERT INTO stock_movements (kind, product_ref, color, quantity, weight, reference)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, occurred_at, kind, product_ref, color, quantity, weight, reference
        "#,
    )
    .bind(movement.kind().as_str())
    .bind(movement.product_ref())
    .bind(movement.color())
    .bind(movement.quantity())
    .bind(movement.weight())
    .bind(movement.reference())
    .fetch_one(&mut *conn)
    .await?;

    row.into_record()
}

/// Stream the journal in time order, optionally restricted to one color.
/// Ties on the timestamp fall back to insertion order.
pub fn stream_ordered(
    db: &PgPool,
    order: MovementOrder,
    color: Option<String>,
) -> BoxStream<'_, AppResult<MovementRecord>> {
    let sql = match order {
        MovementOrder::Newest => {
            r#"
            SELECT id, occurred_at, kind, product_ref, color, quantity, weight, reference
            FROM stock_movements
            WHERE ($1::text IS NULL OR color = $1)
            ORDER BY occurred_at DESC, id DESC
            "#
        }
        MovementOrder::Oldest => {
            r#"
            SELECT id, occurred_at, kind, product_ref, color, quantity, weight, reference
            FROM stock_movements
            WHERE ($1::text IS NULL OR color = $1)
            ORDER BY occurred_at ASC, id ASC
            "#
        }
    };

    sqlx::query_as::<_, MovementRow>(sql)
        .bind(color)
        .fetch(db)
        .map(|row| row.map_err(AppError::from).and_then(MovementRow::into_record))
        .boxed()
}
