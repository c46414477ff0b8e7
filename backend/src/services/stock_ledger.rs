//! Stock ledger store: current stock per color
//!
//! Every function here runs on a connection the caller owns, normally an open
//! transaction. Nothing is journaled here; callers pair each adjustment with a
//! movement record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::{apply_to_level, RollQuantity, StockEntryId, StockLedgerEntry};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::{AppError, AppResult};

/// Row for stock ledger queries
#[derive(Debug, FromRow)]
struct StockRow {
    id: i64,
    color: String,
    roll_count: i64,
    total_weight: Decimal,
    last_entry_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<StockRow> for StockLedgerEntry {
    fn from(row: StockRow) -> Self {
        StockLedgerEntry {
            id: Some(row.id),
            color: row.color,
            roll_count: row.roll_count,
            total_weight: row.total_weight,
            last_entry_at: row.last_entry_at,
            created_at: Some(row.created_at),
        }
    }
}

/// Current stock of a color; a zero entry when the color has never been stocked
pub async fn get_stock(conn: &mut PgConnection, color: &str) -> AppResult<StockLedgerEntry> {
    let row = sqlx::query_as::<_, StockRow>(
        r#"
        SELECT id, color, roll_count, total_weight, last_entry_at, created_at
        FROM stock_ledger
        WHERE color = $1
        "#,
    )
    .bind(color)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row
        .map(StockLedgerEntry::from)
        .unwrap_or_else(|| StockLedgerEntry::empty(color)))
}

/// Make sure every color has a row, so it can be locked
async fn ensure_rows(conn: &mut PgConnection, colors: &[String]) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_ledger (color)
        SELECT color FROM UNNEST($1::text[]) AS t(color)
        ORDER BY color
        ON CONFLICT (color) DO NOTHING
        "#,
    )
    .bind(colors)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Lock the rows of the given colors, in ascending color order, for the rest
/// of the transaction. Rows are created first when missing.
pub async fn lock_colors(
    conn: &mut PgConnection,
    colors: &[String],
) -> AppResult<BTreeMap<String, StockLedgerEntry>> {
    if colors.is_empty() {
        return Ok(BTreeMap::new());
    }

    ensure_rows(conn, colors).await?;

    let rows = sqlx::query_as::<_, StockRow>(
        r#"
        SELECT id, color, roll_count, total_weight, last_entry_at, created_at
        FROM stock_ledger
        WHERE color = ANY($1)
        ORDER BY color
        FOR UPDATE
        "#,
    )
    .bind(colors)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.color.clone(), StockLedgerEntry::from(row)))
        .collect())
}

/// Lock a single ledger row by id
pub async fn lock_by_id(conn: &mut PgConnection, id: StockEntryId) -> AppResult<StockLedgerEntry> {
    sqlx::query_as::<_, StockRow>(
        r#"
        SELECT id, color, roll_count, total_weight, last_entry_at, created_at
        FROM stock_ledger
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .map(StockLedgerEntry::from)
    .ok_or_else(|| AppError::stock_entry_not_found(id))
}

/// Add a signed change to a color's stock, creating the row if absent.
///
/// Fails with an insufficient-stock error, writing nothing, when rolls or
/// weight would go below zero.
pub async fn adjust(
    conn: &mut PgConnection,
    color: &str,
    change: RollQuantity,
) -> AppResult<StockLedgerEntry> {
    let locked = lock_colors(conn, &[color.to_string()]).await?;
    let current = locked
        .get(color)
        .map(StockLedgerEntry::level)
        .unwrap_or_default();

    let next = apply_to_level(color, current, change)?;
    let stock_entered = change.rolls > 0 || change.weight > Decimal::ZERO;

    let row = sqlx::query_as::<_, StockRow>(
        r#"
        UPDATE stock_ledger
        SET roll_count = $2,
            total_weight = $3,
            last_entry_at = CASE WHEN $4 THEN NOW() ELSE last_entry_at END,
            updated_at = NOW()
        WHERE color = $1
        RETURNING id, color, roll_count, total_weight, last_entry_at, created_at
        "#,
    )
    .bind(color)
    .bind(next.rolls)
    .bind(next.weight)
    .bind(stock_entered)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row.into())
}

/// All ledger rows, ordered by entry time
pub async fn list(db: &PgPool) -> AppResult<Vec<StockLedgerEntry>> {
    let rows = sqlx::query_as::<_, StockRow>(
        r#"
        SELECT id, color, roll_count, total_weight, last_entry_at, created_at
        FROM stock_ledger
        ORDER BY created_at, id
        "#,
    )
    .fetch_all(db)
    .await?;

    Ok(rows.into_iter().map(StockLedgerEntry::from).collect())
}
