//! Production sheet store
//!
//! Headers and items live in separate tables. Items carry their position so a
//! sheet reads back in the order it was entered.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::{sheet_totals, ProductionSheet, SheetHeader, SheetId, SheetItem};
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::{AppError, AppResult};

#[derive(Debug, FromRow)]
struct SheetRow {
    id: i64,
    product: String,
    cut_number: i32,
    grade: String,
    sheet_date: NaiveDate,
    total_rolls: i64,
    total_weight: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SheetRow {
    fn with_items(self, items: Vec<SheetItem>) -> ProductionSheet {
        ProductionSheet {
            id: self.id,
            header: SheetHeader {
                product: self.product,
                cut_number: self.cut_number,
                grade: self.grade,
                date: self.sheet_date,
            },
            total_rolls: self.total_rolls,
            total_weight: self.total_weight,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    sheet_id: i64,
    color: String,
    size_bucket_1: i32,
    size_bucket_2: i32,
    size_bucket_3: i32,
    rolls_consumed: i32,
    weight_consumed: Decimal,
}

impl From<ItemRow> for SheetItem {
    fn from(row: ItemRow) -> Self {
        SheetItem {
            color: row.color,
            size_bucket_1: row.size_bucket_1,
            size_bucket_2: row.size_bucket_2,
            size_bucket_3: row.size_bucket_3,
            rolls_consumed: row.rolls_consumed,
            weight_consumed: row.weight_consumed,
        }
    }
}

/// Insert a sheet header and its items, returning the new id
pub async fn insert(
    conn: &mut PgConnection,
    header: &SheetHeader,
    items: &[SheetItem],
) -> AppResult<SheetId> {
    let totals = sheet_totals(items);

    let sheet_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO production_sheets (
            product, cut_number, grade, sheet_date, total_rolls, total_weight
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(&header.product)
    .bind(header.cut_number)
    .bind(&header.grade)
    .bind(header.date)
    .bind(totals.rolls)
    .bind(totals.weight)
    .fetch_one(&mut *conn)
    .await?;

    insert_items(conn, sheet_id, items).await?;

    Ok(sheet_id)
}

async fn insert_items(conn: &mut PgConnection, sheet_id: SheetId, items: &[SheetItem]) -> AppResult<()> {
    for (position, item) in items.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO sheet_items (
                sheet_id, position, color, size_bucket_1, size_bucket_2, size_bucket_3,
                rolls_consumed, weight_consumed
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(sheet_id)
        .bind(position as i32)
        .bind(&item.color)
        .bind(item.size_bucket_1)
        .bind(item.size_bucket_2)
        .bind(item.size_bucket_3)
        .bind(item.rolls_consumed)
        .bind(item.weight_consumed)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

async fn load_items(conn: &mut PgConnection, sheet_id: SheetId) -> AppResult<Vec<SheetItem>> {
    let rows = sqlx::query_as::<_, ItemRow>(
        r#"
        SELECT sheet_id, color, size_bucket_1, size_bucket_2, size_bucket_3,
               rolls_consumed, weight_consumed
        FROM sheet_items
        WHERE sheet_id = $1
        ORDER BY position
        "#,
    )
    .bind(sheet_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows.into_iter().map(SheetItem::from).collect())
}

/// Load a sheet with its items
pub async fn load(conn: &mut PgConnection, sheet_id: SheetId) -> AppResult<ProductionSheet> {
    let header = sqlx::query_as::<_, SheetRow>(
        r#"
        SELECT id, product, cut_number, grade, sheet_date, total_rolls, total_weight,
               created_at, updated_at
        FROM production_sheets
        WHERE id = $1
        "#,
    )
    .bind(sheet_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::sheet_not_found(sheet_id))?;

    let items = load_items(conn, sheet_id).await?;
    Ok(header.with_items(items))
}

/// Load a sheet and lock its header row until the transaction ends, so two
/// edits of the same sheet never reconcile against the same item set
pub async fn lock(conn: &mut PgConnection, sheet_id: SheetId) -> AppResult<ProductionSheet> {
    let header = sqlx::query_as::<_, SheetRow>(
        r#"
        SELECT id, product, cut_number, grade, sheet_date, total_rolls, total_weight,
               created_at, updated_at
        FROM production_sheets
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(sheet_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| AppError::sheet_not_found(sheet_id))?;

    let items = load_items(conn, sheet_id).await?;
    Ok(header.with_items(items))
}

/// Rewrite header fields
pub async fn update_header(
    conn: &mut PgConnection,
    sheet_id: SheetId,
    header: &SheetHeader,
) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE production_sheets
        SET product = $2, cut_number = $3, grade = $4, sheet_date = $5, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(sheet_id)
    .bind(&header.product)
    .bind(header.cut_number)
    .bind(&header.grade)
    .bind(header.date)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Replace the whole item set and refresh the stored totals
pub async fn replace_items(
    conn: &mut PgConnection,
    sheet_id: SheetId,
    items: &[SheetItem],
) -> AppResult<()> {
    sqlx::query("DELETE FROM sheet_items WHERE sheet_id = $1")
        .bind(sheet_id)
        .execute(&mut *conn)
        .await?;

    insert_items(conn, sheet_id, items).await?;

    let totals = sheet_totals(items);
    sqlx::query(
        r#"
        UPDATE production_sheets
        SET total_rolls = $2, total_weight = $3, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(sheet_id)
    .bind(totals.rolls)
    .bind(totals.weight)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Remove a sheet: items first, then the header
pub async fn delete(conn: &mut PgConnection, sheet_id: SheetId) -> AppResult<()> {
    sqlx::query("DELETE FROM sheet_items WHERE sheet_id = $1")
        .bind(sheet_id)
        .execute(&mut *conn)
        .await?;

    let result = sqlx::query("DELETE FROM production_sheets WHERE id = $1")
        .bind(sheet_id)
        .execute(&mut *conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::sheet_not_found(sheet_id));
    }

    Ok(())
}

/// All sheets with their items, in creation order
pub async fn list(db: &PgPool) -> AppResult<Vec<ProductionSheet>> {
    let headers = sqlx::query_as::<_, SheetRow>(
        r#"
        SELECT id, product, cut_number, grade, sheet_date, total_rolls, total_weight,
               created_at, updated_at
        FROM production_sheets
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await?;

    let ids: Vec<i64> = headers.iter().map(|h| h.id).collect();
    let item_rows = sqlx::query_as::<_, ItemRow>(
        r#"
        SELECT sheet_id, color, size_bucket_1, size_bucket_2, size_bucket_3,
               rolls_consumed, weight_consumed
        FROM sheet_items
        WHERE sheet_id = ANY($1)
        ORDER BY sheet_id, position
        "#,
    )
    .bind(&ids)
    .fetch_all(db)
    .await?;

    let mut items_by_sheet: std::collections::HashMap<i64, Vec<SheetItem>> =
        std::collections::HashMap::new();
    for row in item_rows {
        items_by_sheet.entry(row.sheet_id).or_default().push(row.into());
    }

    Ok(headers
        .into_iter()
        .map(|header| {
            let items = items_by_sheet.remove(&header.id).unwrap_or_default();
            header.with_items(items)
        })
        .collect())
}
