//! # Return Processing
//!
//! Validates and records a return against a prior sale, restocking the
//! returned units and recomputing the refund total, all inside one
//! transaction.
//!
//! ## Allowance Rule
//! ```text
//! available(sale, product) = quantity sold − quantity already returned
//!
//! Sale: 3 × Shirt
//!   Return #1: 2 × Shirt   → accepted, 1 returnable left
//!   Return #2: 2 × Shirt   → line rejected (only 1 left)
//!   Return #3: 1 × Shirt   → accepted, 0 returnable left
//! ```
//!
//! Invalid lines (non-positive quantity, over the allowance) are skipped and
//! reported back rather than failing the request; a request where every line
//! is skipped persists nothing.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::{ProductRepository, ReturnRepository, SaleRepository};
use crate::workflow::{WorkflowError, WorkflowResult};
use storefront_core::{CoreError, Return, ReturnItem, ReturnReason};

/// One requested return line, addressed by the original sale item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnLine {
    pub sale_item_id: String,
    pub quantity: i64,
}

/// A return request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub sale_id: String,
    pub reason: ReturnReason,
    pub items: Vec<ReturnLine>,
}

/// The persisted result of a return, including the lines that were skipped
/// by validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedReturn {
    pub record: Return,
    pub items: Vec<ReturnItem>,
    pub skipped: Vec<ReturnLine>,
}

/// Records a return as one all-or-nothing transaction.
///
/// Unit prices are copied from the original sale items, never from the
/// current product price. Every accepted line restocks its product through
/// the atomic adjuster.
pub async fn create_return(db: &Database, req: ReturnRequest) -> WorkflowResult<CreatedReturn> {
    debug!(sale_id = %req.sale_id, items = req.items.len(), "create_return");

    let mut tx = db.begin().await?;

    SaleRepository::get(&mut *tx, &req.sale_id)
        .await?
        .ok_or_else(|| CoreError::SaleNotFound(req.sale_id.clone()))?;

    let sale_items = SaleRepository::items(&mut *tx, &req.sale_id).await?;

    // Returnable allowance per product: sold minus already returned across
    // every prior return of this sale.
    let mut available: HashMap<String, i64> = HashMap::new();
    for item in &sale_items {
        *available.entry(item.product_id.clone()).or_insert(0) += item.quantity;
    }
    for (product_id, returned) in ReturnRepository::returned_quantities(&mut *tx, &req.sale_id).await? {
        if let Some(qty) = available.get_mut(&product_id) {
            *qty -= returned;
        }
    }

    let by_id: HashMap<&str, &storefront_core::SaleItem> =
        sale_items.iter().map(|i| (i.id.as_str(), i)).collect();

    let mut accepted: Vec<(&storefront_core::SaleItem, i64)> = Vec::new();
    let mut skipped: Vec<ReturnLine> = Vec::new();

    for line in &req.items {
        let sale_item = *by_id
            .get(line.sale_item_id.as_str())
            .ok_or_else(|| CoreError::SaleItemNotFound(line.sale_item_id.clone()))?;

        // The entry always exists (built from the sale's own items above).
        let allowance = available.entry(sale_item.product_id.clone()).or_insert(0);

        if line.quantity <= 0 || line.quantity > *allowance {
            debug!(
                sale_item_id = %line.sale_item_id,
                requested = line.quantity,
                available = *allowance,
                "Skipping return line"
            );
            skipped.push(line.clone());
            continue;
        }

        // Deduct now so duplicate lines in the same request stay bounded.
        *allowance -= line.quantity;
        accepted.push((sale_item, line.quantity));
    }

    if accepted.is_empty() {
        return Err(CoreError::EmptyReturn.into());
    }

    let now = Utc::now();
    let mut record = Return {
        id: Uuid::new_v4().to_string(),
        sale_id: req.sale_id.clone(),
        reason: req.reason,
        total_refund_cents: 0,
        created_at: now,
    };
    ReturnRepository::insert(&mut *tx, &record).await?;

    let mut items = Vec::with_capacity(accepted.len());
    for (sale_item, quantity) in accepted {
        let refund = sale_item.unit_price().multiply_quantity(quantity);

        let item = ReturnItem {
            id: Uuid::new_v4().to_string(),
            return_id: record.id.clone(),
            product_id: sale_item.product_id.clone(),
            quantity,
            unit_price_cents: sale_item.unit_price_cents,
            refund_cents: refund.cents(),
            created_at: now,
        };
        ReturnRepository::insert_item(&mut *tx, &item).await?;

        // Positive deltas always pass the stock guard; a miss means the
        // product row itself is gone.
        if ProductRepository::adjust_stock(&mut *tx, &sale_item.product_id, quantity)
            .await?
            .is_none()
        {
            return Err(DbError::not_found("Product", &sale_item.product_id).into());
        }

        items.push(item);
    }

    record.total_refund_cents = ReturnRepository::recompute_total(&mut *tx, &record.id).await?;

    tx.commit()
        .await
        .map_err(|e| WorkflowError::Storage(DbError::TransactionFailed(e.to_string())))?;

    info!(
        return_id = %record.id,
        sale_id = %record.sale_id,
        refund = %record.total_refund(),
        items = items.len(),
        skipped = skipped.len(),
        "Return recorded"
    );

    Ok(CreatedReturn {
        record,
        items,
        skipped,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
