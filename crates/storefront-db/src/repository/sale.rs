//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! A sale and its items are only ever written inside the checkout
//! transaction; once committed they are immutable. `set_total` exists solely
//! for the totals step of that transaction.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::{Sale, SaleItem};

/// Repository for sale database operations.
pub struct SaleRepository;

impl SaleRepository {
    /// Inserts a sale row.
    pub async fn insert(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, customer_id = %sale.customer_id, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, customer_id, payment_method, payment_type, total_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.customer_id)
        .bind(sale.payment_method)
        .bind(sale.payment_type)
        .bind(sale.total_cents)
        .bind(sale.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, payment_method, payment_type, total_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(sale)
    }

    /// Lists the most recent sales.
    pub async fn list_recent(conn: &mut SqliteConnection, limit: u32) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, payment_method, payment_type, total_cents, created_at
            FROM sales
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

        Ok(sales)
    }

    /// Adds an item to a sale.
    ///
    /// `unit_price_cents` must already be the snapshot taken by the checkout
    /// workflow; this function stores what it is given.
    pub async fn insert_item(conn: &mut SqliteConnection, item: &SaleItem) -> DbResult<()> {
        debug!(sale_id = %item.sale_id, product_id = %item.product_id, "Adding sale item");

        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price_cents)
        .bind(item.subtotal_cents)
        .bind(item.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Gets all items for a sale, in insertion order.
    pub async fn items(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents, subtotal_cents, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(items)
    }

    /// Sets the sale total after the line items are written.
    pub async fn set_total(
        conn: &mut SqliteConnection,
        sale_id: &str,
        total_cents: i64,
    ) -> DbResult<()> {
        let result = sqlx::query("UPDATE sales SET total_cents = ?2 WHERE id = ?1")
            .bind(sale_id)
            .bind(total_cents)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", sale_id));
        }

        Ok(())
    }
}
