//! # Return Repository
//!
//! Database operations for returns and returned items.
//!
//! The returnable allowance for a (sale, product) pair is the quantity sold
//! minus the quantity already returned across ALL prior returns of that
//! sale; `returned_quantities` provides the per-product sums the processor
//! validates against.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::{Return, ReturnItem};

/// Repository for return database operations.
pub struct ReturnRepository;

impl ReturnRepository {
    /// Inserts a return row.
    pub async fn insert(conn: &mut SqliteConnection, ret: &Return) -> DbResult<()> {
        debug!(id = %ret.id, sale_id = %ret.sale_id, "Inserting return");

        sqlx::query(
            r#"
            INSERT INTO returns (id, sale_id, reason, total_refund_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&ret.id)
        .bind(&ret.sale_id)
        .bind(ret.reason)
        .bind(ret.total_refund_cents)
        .bind(ret.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Gets a return by ID.
    pub async fn get(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Return>> {
        let ret = sqlx::query_as::<_, Return>(
            r#"
            SELECT id, sale_id, reason, total_refund_cents, created_at
            FROM returns
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(ret)
    }

    /// Adds a returned item.
    pub async fn insert_item(conn: &mut SqliteConnection, item: &ReturnItem) -> DbResult<()> {
        debug!(return_id = %item.return_id, product_id = %item.product_id, "Adding return item");

        sqlx::query(
            r#"
            INSERT INTO return_items (
                id, return_id, product_id, quantity, unit_price_cents, refund_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&item.id)
        .bind(&item.return_id)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.refund_cents)
        .bind(item.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Gets all items of a return, in insertion order.
    pub async fn items(conn: &mut SqliteConnection, return_id: &str) -> DbResult<Vec<ReturnItem>> {
        let items = sqlx::query_as::<_, ReturnItem>(
            r#"
            SELECT id, return_id, product_id, quantity, unit_price_cents, refund_cents, created_at
            FROM return_items
            WHERE return_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(return_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(items)
    }

    /// Sums the already-returned quantity per product across all returns of
    /// a sale.
    pub async fn returned_quantities(
        conn: &mut SqliteConnection,
        sale_id: &str,
    ) -> DbResult<Vec<(String, i64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT ri.product_id, SUM(ri.quantity)
            FROM return_items ri
            INNER JOIN returns r ON r.id = ri.return_id
            WHERE r.sale_id = ?1
            GROUP BY ri.product_id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    /// Recomputes a return's refund total from its persisted items.
    ///
    /// Single statement, so the stored total can never drift from the rows
    /// it summarizes. Returns the new total.
    pub async fn recompute_total(conn: &mut SqliteConnection, return_id: &str) -> DbResult<i64> {
        let total: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE returns
            SET total_refund_cents = (
                SELECT COALESCE(SUM(refund_cents), 0)
                FROM return_items
                WHERE return_id = ?1
            )
            WHERE id = ?1
            RETURNING total_refund_cents
            "#,
        )
        .bind(return_id)
        .fetch_optional(&mut *conn)
        .await?;

        total.ok_or_else(|| DbError::not_found("Return", return_id))
    }
}
