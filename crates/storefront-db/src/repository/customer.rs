//! # Customer Repository
//!
//! Database operations for customers. Sales reference customers with a
//! RESTRICT constraint, so checkout only needs existence plus the record
//! itself for display.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::DbResult;
use storefront_core::Customer;

/// Repository for customer database operations.
pub struct CustomerRepository;

impl CustomerRepository {
    /// Inserts a new customer.
    pub async fn insert(conn: &mut SqliteConnection, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, email, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Gets a customer by ID.
    pub async fn get(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, email, address, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(customer)
    }
}
