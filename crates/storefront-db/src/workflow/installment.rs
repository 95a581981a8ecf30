//! # Installment Ledger
//!
//! Records payments against installment plans and answers balance queries.
//!
//! `remaining = sale.total − Σ payments`, with a missing sum treated as 0.
//! Overpayment is allowed: the balance goes to zero or negative and the plan
//! is marked completed. There is deliberately no cap on a payment beyond
//! being positive.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbError;
use crate::pool::Database;
use crate::repository::installment::PlanBalance;
use crate::repository::{InstallmentRepository, SaleRepository};
use crate::workflow::{WorkflowError, WorkflowResult};
use storefront_core::validation::validate_payment_amount;
use storefront_core::{CoreError, InstallmentPayment, InstallmentStatus};

/// Result of recording a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRecorded {
    pub payment: InstallmentPayment,
    pub total_paid_cents: i64,
    /// Zero or negative once the plan is paid off (overpayment allowed).
    pub remaining_cents: i64,
    pub plan_completed: bool,
}

/// Records a payment against a plan and updates its completion flag.
pub async fn record_payment(
    db: &Database,
    plan_id: &str,
    amount_cents: i64,
    due_date: NaiveDate,
) -> WorkflowResult<PaymentRecorded> {
    debug!(plan_id = %plan_id, amount = %amount_cents, "record_payment");

    validate_payment_amount(amount_cents)?;

    let mut tx = db.begin().await?;

    let plan = InstallmentRepository::get_plan(&mut *tx, plan_id)
        .await?
        .ok_or_else(|| CoreError::PlanNotFound(plan_id.to_string()))?;
    let sale = SaleRepository::get(&mut *tx, &plan.sale_id)
        .await?
        .ok_or_else(|| CoreError::SaleNotFound(plan.sale_id.clone()))?;

    let payment = InstallmentPayment {
        id: Uuid::new_v4().to_string(),
        plan_id: plan.id.clone(),
        amount_cents,
        due_date,
        status: InstallmentStatus::default(),
        created_at: Utc::now(),
    };
    InstallmentRepository::insert_payment(&mut *tx, &payment).await?;

    let total_paid = InstallmentRepository::total_paid(&mut *tx, plan_id).await?;
    let remaining = sale.total_cents - total_paid;

    let plan_completed = remaining <= 0;
    if plan_completed && !plan.is_completed {
        InstallmentRepository::mark_completed(&mut *tx, plan_id).await?;
    }

    tx.commit()
        .await
        .map_err(|e| WorkflowError::Storage(DbError::TransactionFailed(e.to_string())))?;

    info!(
        plan_id = %plan_id,
        payment_id = %payment.id,
        amount = %payment.amount(),
        total_paid = total_paid,
        remaining = remaining,
        completed = plan_completed,
        "Payment recorded"
    );

    Ok(PaymentRecorded {
        payment,
        total_paid_cents: total_paid,
        remaining_cents: remaining,
        plan_completed,
    })
}

/// Returns the remaining balance of a plan in cents.
pub async fn plan_balance(db: &Database, plan_id: &str) -> WorkflowResult<i64> {
    let mut conn = db.acquire().await?;

    let plan = InstallmentRepository::get_plan(&mut conn, plan_id)
        .await?
        .ok_or_else(|| CoreError::PlanNotFound(plan_id.to_string()))?;
    let sale = SaleRepository::get(&mut conn, &plan.sale_id)
        .await?
        .ok_or_else(|| CoreError::SaleNotFound(plan.sale_id.clone()))?;

    let paid = InstallmentRepository::total_paid(&mut conn, plan_id).await?;
    Ok(sale.total_cents - paid)
}

/// Lists plans that still owe money, with paid-to-date sums.
pub async fn outstanding_plans(db: &Database) -> WorkflowResult<Vec<PlanBalance>> {
    let mut conn = db.acquire().await?;
    Ok(InstallmentRepository::outstanding(&mut conn).await?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{seed_customer, seed_product, test_db};
    use crate::workflow::sale::{create_sale, InstallmentTerms, LineItem, SaleRequest};
    use storefront_core::{PaymentMethod, PaymentType};

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    }

    /// Creates an installment sale totalling $200.00 and returns its plan ID.
    async fn seed_plan(db: &Database) -> String {
        let customer = seed_customer(db).await;
        let product = seed_product(db, "Dining Table", 20000, 3).await;

        let created = create_sale(
            db,
            SaleRequest {
                customer_id: customer.id,
                payment_method: PaymentMethod::Transfer,
                payment_type: PaymentType::Installment,
                items: vec![LineItem {
                    product_id: product.id,
                    quantity: 1,
                }],
                installment: Some(InstallmentTerms {
                    initial_payment_cents: 0,
                    num_installments: 4,
                    installment_amount_cents: 5000,
                    start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
                }),
            },
        )
        .await
        .unwrap();

        created.plan.unwrap().id
    }

    #[tokio::test]
    async fn test_payment_reduces_balance() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;

        // $50.00 against $200.00 → $150.00 remaining, not completed.
        let recorded = record_payment(&db, &plan_id, 5000, due()).await.unwrap();
        assert_eq!(recorded.total_paid_cents, 5000);
        assert_eq!(recorded.remaining_cents, 15000);
        assert!(!recorded.plan_completed);
        assert_eq!(recorded.payment.status, InstallmentStatus::Pending);

        assert_eq!(plan_balance(&db, &plan_id).await.unwrap(), 15000);
    }

    #[tokio::test]
    async fn test_balance_with_no_payments_is_full_total() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;

        assert_eq!(plan_balance(&db, &plan_id).await.unwrap(), 20000);
    }

    #[tokio::test]
    async fn test_completion_once_payments_reach_total() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;

        for _ in 0..3 {
            let recorded = record_payment(&db, &plan_id, 5000, due()).await.unwrap();
            assert!(!recorded.plan_completed);
        }

        let last = record_payment(&db, &plan_id, 5000, due()).await.unwrap();
        assert!(last.plan_completed);
        assert_eq!(last.remaining_cents, 0);

        let mut conn = db.acquire().await.unwrap();
        let plan = InstallmentRepository::get_plan(&mut conn, &plan_id)
            .await
            .unwrap()
            .unwrap();
        assert!(plan.is_completed);

        let payments = InstallmentRepository::payments(&mut conn, &plan_id)
            .await
            .unwrap();
        assert_eq!(payments.len(), 4);
    }

    #[tokio::test]
    async fn test_overpayment_goes_negative_and_completes() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;

        let recorded = record_payment(&db, &plan_id, 25000, due()).await.unwrap();
        assert!(recorded.plan_completed);
        assert_eq!(recorded.remaining_cents, -5000);

        assert_eq!(plan_balance(&db, &plan_id).await.unwrap(), -5000);
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;

        for amount in [0, -5000] {
            let err = record_payment(&db, &plan_id, amount, due())
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                WorkflowError::Core(CoreError::Validation(_))
            ));
        }

        // Nothing was recorded.
        assert_eq!(plan_balance(&db, &plan_id).await.unwrap(), 20000);
    }

    #[tokio::test]
    async fn test_unknown_plan_rejected() {
        let db = test_db().await;

        let err = record_payment(&db, "missing-plan", 5000, due())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Core(CoreError::PlanNotFound(_))
        ));

        let err = plan_balance(&db, "missing-plan").await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Core(CoreError::PlanNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_outstanding_plans_excludes_paid_off() {
        let db = test_db().await;
        let open_plan = seed_plan(&db).await;
        let closed_plan = seed_plan(&db).await;

        record_payment(&db, &closed_plan, 20000, due()).await.unwrap();

        let outstanding = outstanding_plans(&db).await.unwrap();
        assert_eq!(outstanding.len(), 1);
        assert_eq!(outstanding[0].id, open_plan);
        assert_eq!(outstanding[0].remaining_cents(), 20000);
    }

    #[tokio::test]
    async fn test_payment_status_flip() {
        let db = test_db().await;
        let plan_id = seed_plan(&db).await;

        let recorded = record_payment(&db, &plan_id, 5000, due()).await.unwrap();

        let mut conn = db.acquire().await.unwrap();
        InstallmentRepository::set_payment_status(
            &mut conn,
            &recorded.payment.id,
            InstallmentStatus::Paid,
        )
        .await
        .unwrap();

        let payments = InstallmentRepository::payments(&mut conn, &plan_id)
            .await
            .unwrap();
        assert_eq!(payments[0].status, InstallmentStatus::Paid);
    }
}
