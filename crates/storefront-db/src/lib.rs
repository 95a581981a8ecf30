//! # storefront-db: Database Layer for Storefront
//!
//! SQLite persistence and the transaction-bound workflows of the retail
//! reconciliation core.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Data Flow                           │
//! │                                                                     │
//! │  Presentation layer (external)                                      │
//! │       │  create_sale / create_return / record_payment / adjust      │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │                  storefront-db (THIS CRATE)                   │ │
//! │  │                                                               │ │
//! │  │   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐     │ │
//! │  │   │   workflow   │──►│ repositories │──►│  pool + mig  │     │ │
//! │  │   │ transactions │   │  (per agg.)  │   │  (SqlitePool)│     │ │
//! │  │   └──────────────┘   └──────────────┘   └──────────────┘     │ │
//! │  └───────────────────────────────┬───────────────────────────────┘ │
//! │                                  ▼                                  │
//! │                         SQLite database                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Per-aggregate repositories (explicit connection handles)
//! - [`workflow`] - Sale checkout, return processing, installment ledger,
//!   stock adjustment
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig};
//! use storefront_db::workflow::sale::{create_sale, LineItem, SaleRequest};
//!
//! let db = Database::new(DbConfig::new("storefront.db")).await?;
//!
//! let created = create_sale(&db, SaleRequest {
//!     customer_id,
//!     payment_method: PaymentMethod::Cash,
//!     payment_type: PaymentType::Full,
//!     items: vec![LineItem { product_id, quantity: 3 }],
//!     installment: None,
//! })
//! .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod workflow;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};
pub use workflow::{WorkflowError, WorkflowResult};

// Repository re-exports for convenience
pub use repository::{
    CustomerRepository, InstallmentRepository, ProductRepository, ReturnRepository, SaleRepository,
};

// =============================================================================
// Test Utilities
// =============================================================================

#[cfg(test)]
pub(crate) mod testutil {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::pool::{Database, DbConfig};
    use crate::repository::{CustomerRepository, ProductRepository};
    use storefront_core::{Customer, Product};

    /// Fresh in-memory database with migrations applied.
    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Inserts a customer and returns it.
    pub async fn seed_customer(db: &Database) -> Customer {
        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: "Ada Retail".to_string(),
            phone: Some("555-0100".to_string()),
            email: format!("{}@example.com", Uuid::new_v4()),
            address: None,
            created_at: Utc::now(),
        };

        let mut conn = db.acquire().await.unwrap();
        CustomerRepository::insert(&mut conn, &customer).await.unwrap();
        customer
    }

    /// Inserts a product with the given price and stock and returns it.
    pub async fn seed_product(db: &Database, name: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            brand: "House Brand".to_string(),
            size: None,
            category: "Apparel".to_string(),
            description: None,
            price_cents,
            stock_quantity: stock,
            created_at: now,
            updated_at: now,
        };

        let mut conn = db.acquire().await.unwrap();
        ProductRepository::insert(&mut conn, &product).await.unwrap();
        product
    }
}
