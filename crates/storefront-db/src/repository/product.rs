//! # Product Repository
//!
//! Database operations for products, including the atomic stock adjuster.
//!
//! ## Stock Update Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  ❌ WRONG: read-modify-write in application memory                  │
//! │     let p = get(id); p.stock_quantity -= 3; update(p);              │
//! │     Two concurrent sales of the last unit would both succeed.       │
//! │                                                                     │
//! │  ✅ CORRECT: one guarded delta update                               │
//! │     UPDATE products                                                 │
//! │     SET stock_quantity = stock_quantity + :delta                    │
//! │     WHERE id = :id AND stock_quantity + :delta >= 0                 │
//! │     RETURNING stock_quantity                                        │
//! │                                                                     │
//! │  The row lock serializes concurrent adjusters; the WHERE guard      │
//! │  rejects any update that would drive the quantity negative.         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::Product;

/// Repository for product database operations.
pub struct ProductRepository;

impl ProductRepository {
    /// Inserts a new product.
    pub async fn insert(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, brand, size, category, description,
                price_cents, stock_quantity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(&product.size)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock_quantity)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Gets a product by its ID.
    pub async fn get(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, brand, size, category, description,
                   price_cents, stock_quantity, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(product)
    }

    /// Updates a product's price.
    ///
    /// Existing sale items keep their snapshot prices; only future sales
    /// pick up the new price.
    pub async fn update_price(
        conn: &mut SqliteConnection,
        id: &str,
        price_cents: i64,
    ) -> DbResult<()> {
        debug!(id = %id, price_cents = %price_cents, "Updating product price");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE products SET price_cents = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(price_cents)
                .bind(now)
                .execute(&mut *conn)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Reads the current stock quantity of a product.
    pub async fn stock(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<i64>> {
        let qty: Option<i64> =
            sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(qty)
    }

    /// Applies a signed stock delta as a single atomic statement.
    ///
    /// Returns the new quantity, or `None` when the statement matched no
    /// row — either the product does not exist or the guard rejected a
    /// negative delta that would overdraw stock. Callers that already hold
    /// the product disambiguate by re-reading [`ProductRepository::stock`].
    ///
    /// Positive deltas (return path) always pass the guard.
    pub async fn adjust_stock(
        conn: &mut SqliteConnection,
        id: &str,
        delta: i64,
    ) -> DbResult<Option<i64>> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let new_qty: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity + ?1,
                updated_at = ?2
            WHERE id = ?3 AND stock_quantity + ?1 >= 0
            RETURNING stock_quantity
            "#,
        )
        .bind(delta)
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(new_qty)
    }
}
