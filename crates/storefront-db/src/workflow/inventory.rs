//! # Stock Adjustment
//!
//! Public entry point for direct stock movements (restocking, shrinkage
//! corrections). Sale and return workflows call the repository adjuster
//! inside their own transactions; this path is for callers outside those
//! workflows.

use tracing::{debug, info};

use crate::pool::Database;
use crate::repository::ProductRepository;
use crate::workflow::WorkflowResult;
use storefront_core::CoreError;

/// Applies a signed stock delta and returns the new quantity.
///
/// The adjustment is a single atomic statement, so concurrent callers
/// serialize on the product row: of two competing sales of the last unit,
/// exactly one succeeds. Negative deltas fail with `InsufficientStock`
/// rather than overdrawing; positive deltas always succeed.
pub async fn adjust_stock(db: &Database, product_id: &str, delta: i64) -> WorkflowResult<i64> {
    debug!(product_id = %product_id, delta = %delta, "adjust_stock");

    let mut conn = db.acquire().await?;

    match ProductRepository::adjust_stock(&mut conn, product_id, delta).await? {
        Some(new_qty) => {
            info!(product_id = %product_id, delta = %delta, stock = %new_qty, "Stock adjusted");
            Ok(new_qty)
        }
        None => {
            // The guard rejected the delta, or the product is gone.
            let product = ProductRepository::get(&mut conn, product_id)
                .await?
                .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

            Err(CoreError::InsufficientStock {
                name: product.name,
                available: product.stock_quantity,
                requested: delta.abs(),
            }
            .into())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
