//! # Sale Checkout
//!
//! Builds a sale with its line items inside one transaction: snapshots unit
//! prices, decrements stock through the atomic adjuster, computes the total,
//! and optionally attaches an installment plan.
//!
//! ## Checkout Flow
//! ```text
//! SaleRequest
//!      │ validate (non-empty, positive quantities, terms)
//!      ▼
//! BEGIN ── insert sale (total 0)
//!      │
//!      │ per line item, in input order:
//!      │   load product ── snapshot price ── insert item ── stock −qty
//!      │                                        │
//!      │                 InsufficientStock ─────┘──► ROLLBACK (whole sale)
//!      ▼
//! set total = Σ subtotals ── insert plan? ── COMMIT
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::{CustomerRepository, InstallmentRepository, ProductRepository, SaleRepository};
use crate::workflow::{WorkflowError, WorkflowResult};
use storefront_core::validation::{validate_installment_terms, validate_quantity};
use storefront_core::{
    CoreError, InstallmentPlan, Money, PaymentMethod, PaymentType, Sale, SaleItem,
};

/// One requested line of a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub quantity: i64,
}

/// Installment terms supplied alongside an installment sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentTerms {
    pub initial_payment_cents: i64,
    pub num_installments: i64,
    pub installment_amount_cents: i64,
    pub start_date: NaiveDate,
}

/// A checkout request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRequest {
    pub customer_id: String,
    pub payment_method: PaymentMethod,
    pub payment_type: PaymentType,
    pub items: Vec<LineItem>,
    /// Only honored when `payment_type` is installment.
    pub installment: Option<InstallmentTerms>,
}

/// The fully populated result of a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedSale {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
    pub plan: Option<InstallmentPlan>,
}

/// Creates a sale with its items as one all-or-nothing transaction.
///
/// Line items are processed in input order; the first item short on stock
/// names the product in the error, and the whole transaction is discarded.
pub async fn create_sale(db: &Database, req: SaleRequest) -> WorkflowResult<CreatedSale> {
    debug!(customer_id = %req.customer_id, items = req.items.len(), "create_sale");

    if req.items.is_empty() {
        return Err(CoreError::EmptySale.into());
    }
    for line in &req.items {
        validate_quantity(line.quantity)?;
    }
    if let Some(terms) = &req.installment {
        validate_installment_terms(
            terms.initial_payment_cents,
            terms.num_installments,
            terms.installment_amount_cents,
        )?;
    }

    let mut tx = db.begin().await?;

    CustomerRepository::get(&mut *tx, &req.customer_id)
        .await?
        .ok_or_else(|| CoreError::CustomerNotFound(req.customer_id.clone()))?;

    let now = Utc::now();
    let mut sale = Sale {
        id: Uuid::new_v4().to_string(),
        customer_id: req.customer_id.clone(),
        payment_method: req.payment_method,
        payment_type: req.payment_type,
        total_cents: 0,
        created_at: now,
    };
    SaleRepository::insert(&mut *tx, &sale).await?;

    let mut items = Vec::with_capacity(req.items.len());
    let mut total = Money::zero();

    for line in &req.items {
        let product = ProductRepository::get(&mut *tx, &line.product_id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        // Snapshot the price now; later product price changes must not
        // rewrite this sale.
        let unit_price = product.price();
        let subtotal = unit_price.multiply_quantity(line.quantity);

        let item = SaleItem {
            id: Uuid::new_v4().to_string(),
            sale_id: sale.id.clone(),
            product_id: product.id.clone(),
            quantity: line.quantity,
            unit_price_cents: unit_price.cents(),
            subtotal_cents: subtotal.cents(),
            created_at: now,
        };
        SaleRepository::insert_item(&mut *tx, &item).await?;

        let adjusted = ProductRepository::adjust_stock(&mut *tx, &product.id, -line.quantity).await?;
        if adjusted.is_none() {
            let available = ProductRepository::stock(&mut *tx, &product.id)
                .await?
                .unwrap_or(0);
            return Err(CoreError::InsufficientStock {
                name: product.name,
                available,
                requested: line.quantity,
            }
            .into());
        }

        total += subtotal;
        items.push(item);
    }

    SaleRepository::set_total(&mut *tx, &sale.id, total.cents()).await?;
    sale.total_cents = total.cents();

    let plan = match (req.payment_type, req.installment) {
        (PaymentType::Installment, Some(terms)) => {
            let plan = InstallmentPlan {
                id: Uuid::new_v4().to_string(),
                sale_id: sale.id.clone(),
                initial_payment_cents: terms.initial_payment_cents,
                num_installments: terms.num_installments,
                installment_amount_cents: terms.installment_amount_cents,
                start_date: terms.start_date,
                is_completed: false,
            };
            InstallmentRepository::insert_plan(&mut *tx, &plan).await?;
            Some(plan)
        }
        _ => None,
    };

    tx.commit()
        .await
        .map_err(|e| WorkflowError::Storage(DbError::TransactionFailed(e.to_string())))?;

    info!(
        sale_id = %sale.id,
        total = %sale.total(),
        items = items.len(),
        installment = plan.is_some(),
        "Sale created"
    );

    Ok(CreatedSale { sale, items, plan })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_customer, seed_product, test_db};

    fn cash_request(customer_id: &str, items: Vec<LineItem>) -> SaleRequest {
        SaleRequest {
            customer_id: customer_id.to_string(),
            payment_method: PaymentMethod::Cash,
            payment_type: PaymentType::Full,
            items,
            installment: None,
        }
    }

    fn terms() -> InstallmentTerms {
        InstallmentTerms {
            initial_payment_cents: 5000,
            num_installments: 4,
            installment_amount_cents: 2500,
            start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_sale_totals_and_stock_decrement() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        // $10.00, 5 in stock
        let product = seed_product(&db, "Oxford Shirt", 1000, 5).await;

        let created = create_sale(
            &db,
            cash_request(
                &customer.id,
                vec![LineItem {
                    product_id: product.id.clone(),
                    quantity: 3,
                }],
            ),
        )
        .await
        .unwrap();

        // Sale of 3 × $10.00 = $30.00, stock 5 → 2
        assert_eq!(created.sale.total_cents, 3000);
        assert_eq!(created.items.len(), 1);
        assert_eq!(created.items[0].unit_price_cents, 1000);
        assert_eq!(created.items[0].subtotal_cents, 3000);
        assert!(created.plan.is_none());

        let mut conn = db.acquire().await.unwrap();
        let stored = SaleRepository::get(&mut conn, &created.sale.id)
            .await
            .unwrap()
            .unwrap();
        let items = SaleRepository::items(&mut conn, &created.sale.id)
            .await
            .unwrap();
        let subtotal_sum: i64 = items.iter().map(|i| i.subtotal_cents).sum();
        assert_eq!(stored.total_cents, subtotal_sum);

        let stock = ProductRepository::stock(&mut conn, &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stock, 2);
    }

    #[tokio::test]
    async fn test_multi_line_total_is_sum_of_subtotals() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let shirt = seed_product(&db, "Shirt", 1999, 10).await;
        let jeans = seed_product(&db, "Jeans", 4950, 10).await;

        let created = create_sale(
            &db,
            cash_request(
                &customer.id,
                vec![
                    LineItem {
                        product_id: shirt.id.clone(),
                        quantity: 2,
                    },
                    LineItem {
                        product_id: jeans.id.clone(),
                        quantity: 1,
                    },
                ],
            ),
        )
        .await
        .unwrap();

        assert_eq!(created.sale.total_cents, 2 * 1999 + 4950);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rolls_back_everything() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let shirt = seed_product(&db, "Shirt", 1000, 10).await;
        let scarce = seed_product(&db, "Limited Jacket", 9000, 1).await;

        let err = create_sale(
            &db,
            cash_request(
                &customer.id,
                vec![
                    LineItem {
                        product_id: shirt.id.clone(),
                        quantity: 2,
                    },
                    LineItem {
                        product_id: scarce.id.clone(),
                        quantity: 3,
                    },
                ],
            ),
        )
        .await
        .unwrap_err();

        match err {
            WorkflowError::Core(CoreError::InsufficientStock {
                name,
                available,
                requested,
            }) => {
                assert_eq!(name, "Limited Jacket");
                assert_eq!(available, 1);
                assert_eq!(requested, 3);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Full rollback: no sale, no items, no stock movement at all.
        let mut conn = db.acquire().await.unwrap();
        let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(sales, 0);
        assert_eq!(items, 0);

        let shirt_stock = ProductRepository::stock(&mut conn, &shirt.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(shirt_stock, 10);
    }

    #[tokio::test]
    async fn test_first_short_item_reported_in_input_order() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let first = seed_product(&db, "First Short", 1000, 0).await;
        let second = seed_product(&db, "Second Short", 1000, 0).await;

        let err = create_sale(
            &db,
            cash_request(
                &customer.id,
                vec![
                    LineItem {
                        product_id: first.id.clone(),
                        quantity: 1,
                    },
                    LineItem {
                        product_id: second.id.clone(),
                        quantity: 1,
                    },
                ],
            ),
        )
        .await
        .unwrap_err();

        match err {
            WorkflowError::Core(CoreError::InsufficientStock { name, .. }) => {
                assert_eq!(name, "First Short");
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_sale_rejected() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;

        let err = create_sale(&db, cash_request(&customer.id, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Core(CoreError::EmptySale)));
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Shirt", 1000, 5).await;

        for qty in [0, -2] {
            let err = create_sale(
                &db,
                cash_request(
                    &customer.id,
                    vec![LineItem {
                        product_id: product.id.clone(),
                        quantity: qty,
                    }],
                ),
            )
            .await
            .unwrap_err();
            assert!(matches!(
                err,
                WorkflowError::Core(CoreError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_unknown_customer_rejected() {
        let db = test_db().await;
        let product = seed_product(&db, "Shirt", 1000, 5).await;

        let err = create_sale(
            &db,
            cash_request(
                "missing-customer",
                vec![LineItem {
                    product_id: product.id,
                    quantity: 1,
                }],
            ),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Core(CoreError::CustomerNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_product_leaves_no_residue() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;

        let err = create_sale(
            &db,
            cash_request(
                &customer.id,
                vec![LineItem {
                    product_id: "missing-product".to_string(),
                    quantity: 1,
                }],
            ),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Core(CoreError::ProductNotFound(_))
        ));

        let mut conn = db.acquire().await.unwrap();
        let sales: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(sales, 0);
    }

    #[tokio::test]
    async fn test_installment_sale_creates_plan() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Sofa", 20000, 2).await;

        let created = create_sale(
            &db,
            SaleRequest {
                customer_id: customer.id.clone(),
                payment_method: PaymentMethod::Transfer,
                payment_type: PaymentType::Installment,
                items: vec![LineItem {
                    product_id: product.id.clone(),
                    quantity: 1,
                }],
                installment: Some(terms()),
            },
        )
        .await
        .unwrap();

        let plan = created.plan.expect("installment sale should carry a plan");
        assert_eq!(plan.sale_id, created.sale.id);
        assert_eq!(plan.num_installments, 4);
        assert!(!plan.is_completed);

        let mut conn = db.acquire().await.unwrap();
        let stored = InstallmentRepository::get_plan(&mut conn, &plan.id)
            .await
            .unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_full_payment_ignores_installment_terms() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Sofa", 20000, 2).await;

        let created = create_sale(
            &db,
            SaleRequest {
                customer_id: customer.id.clone(),
                payment_method: PaymentMethod::Card,
                payment_type: PaymentType::Full,
                items: vec![LineItem {
                    product_id: product.id,
                    quantity: 1,
                }],
                installment: Some(terms()),
            },
        )
        .await
        .unwrap();

        assert!(created.plan.is_none());
    }

    #[tokio::test]
    async fn test_unit_price_snapshot_survives_price_change() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Shirt", 1000, 5).await;

        let created = create_sale(
            &db,
            cash_request(
                &customer.id,
                vec![LineItem {
                    product_id: product.id.clone(),
                    quantity: 1,
                }],
            ),
        )
        .await
        .unwrap();

        // Reprice the product after the sale.
        let mut conn = db.acquire().await.unwrap();
        ProductRepository::update_price(&mut conn, &product.id, 9999)
            .await
            .unwrap();

        let items = SaleRepository::items(&mut conn, &created.sale.id)
            .await
            .unwrap();
        assert_eq!(items[0].unit_price_cents, 1000);
    }

    #[tokio::test]
    async fn test_list_recent_orders_newest_first() {
        let db = test_db().await;
        let customer = seed_customer(&db).await;
        let product = seed_product(&db, "Shirt", 1000, 10).await;

        let first = create_sale(
            &db,
            cash_request(
                &customer.id,
                vec![LineItem {
                    product_id: product.id.clone(),
                    quantity: 1,
                }],
            ),
        )
        .await
        .unwrap();
        let second = create_sale(
            &db,
            cash_request(
                &customer.id,
                vec![LineItem {
                    product_id: product.id.clone(),
                    quantity: 2,
                }],
            ),
        )
        .await
        .unwrap();

        let mut conn = db.acquire().await.unwrap();
        let recent = SaleRepository::list_recent(&mut conn, 10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, second.sale.id);
        assert_eq!(recent[1].id, first.sale.id);
    }
}
