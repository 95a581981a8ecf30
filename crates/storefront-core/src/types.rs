//! # Domain Types
//!
//! Core domain types used throughout Storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  Customer ──< Sale ──< SaleItem >── Product                         │
//! │                │                                                    │
//! │                ├── InstallmentPlan ──< InstallmentPayment           │
//! │                │                                                    │
//! │                └──< Return ──< ReturnItem >── Product               │
//! │                                                                     │
//! │  Enums: PaymentMethod, PaymentType, InstallmentStatus, ReturnReason │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `SaleItem.unit_price_cents` freezes the product price at sale time, and
//! `ReturnItem.unit_price_cents` is copied from the originating sale item.
//! Later price changes on the product never rewrite history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Customer
// =============================================================================

/// A customer who can hold sales and installment plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// `stock_quantity` is never written directly by callers; it moves only
/// through the stock adjuster as a side effect of sales and returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Brand or manufacturer.
    pub brand: String,

    /// Size variant (e.g. "L", "XL", "32/32").
    pub size: Option<String>,

    /// Category (e.g. "Shirt", "Electronics", "Grocery").
    pub category: String,

    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units currently in stock. Invariant: never negative after any
    /// committed operation.
    pub stock_quantity: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Payment Enums
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Credit/debit card.
    Card,
    /// Bank transfer.
    Transfer,
}

/// Whether a sale is paid in full up front or on an installment plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Paid in full at checkout.
    Full,
    /// Paid over time against an installment plan.
    Installment,
}

// =============================================================================
// Sale
// =============================================================================

/// A completed sale transaction.
///
/// Immutable once created, except that `total_cents` is recomputed from the
/// line items during checkout itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub customer_id: String,
    pub payment_method: PaymentMethod,
    pub payment_type: PaymentType,
    /// Invariant: equals the sum of this sale's item subtotals.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Quantity sold (always positive).
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// quantity × unit_price_cents.
    pub subtotal_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Installments
// =============================================================================

/// Payment schedule attached to an installment sale (one-to-one with Sale).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InstallmentPlan {
    pub id: String,
    pub sale_id: String,
    /// Down payment collected at checkout.
    pub initial_payment_cents: i64,
    pub num_installments: i64,
    /// Agreed amount per installment.
    pub installment_amount_cents: i64,
    pub start_date: NaiveDate,
    /// Set once total payments reach the sale total.
    pub is_completed: bool,
}

/// Status of an individual installment payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Pending,
    Paid,
    Late,
}

impl Default for InstallmentStatus {
    fn default() -> Self {
        InstallmentStatus::Pending
    }
}

/// A payment recorded against an installment plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InstallmentPayment {
    pub id: String,
    pub plan_id: String,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
    pub created_at: DateTime<Utc>,
}

impl InstallmentPayment {
    /// Returns the paid amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Returns
// =============================================================================

/// Why the customer brought the goods back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "snake_case")]
pub enum ReturnReason {
    Defective,
    WrongItem,
    ChangedMind,
    Other,
}

/// A product return against a prior sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Return {
    pub id: String,
    pub sale_id: String,
    pub reason: ReturnReason,
    /// Invariant: equals the sum of this return's item refunds.
    pub total_refund_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Return {
    /// Returns the refund total as Money.
    #[inline]
    pub fn total_refund(&self) -> Money {
        Money::from_cents(self.total_refund_cents)
    }
}

/// A returned line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ReturnItem {
    pub id: String,
    pub return_id: String,
    pub product_id: String,
    /// Quantity returned (always positive). Invariant: the cumulative
    /// returned quantity for a (sale, product) pair never exceeds the
    /// quantity originally sold.
    pub quantity: i64,
    /// Unit price copied from the originating sale item.
    pub unit_price_cents: i64,
    /// quantity × unit_price_cents.
    pub refund_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl ReturnItem {
    /// Returns the line refund as Money.
    #[inline]
    pub fn refund(&self) -> Money {
        Money::from_cents(self.refund_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
