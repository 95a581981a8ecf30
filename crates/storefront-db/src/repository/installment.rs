//! # Installment Repository
//!
//! Database operations for installment plans and their payments.
//!
//! Balance arithmetic lives in SQL so the sums are always computed against
//! committed rows: `remaining = sale.total_cents - COALESCE(SUM(payments), 0)`.

use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};
use storefront_core::{InstallmentPayment, InstallmentPlan, InstallmentStatus};

/// An installment plan joined with its paid-to-date sum.
///
/// Read model for the outstanding-balances view; never written back.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlanBalance {
    pub id: String,
    pub sale_id: String,
    pub total_cents: i64,
    pub paid_cents: i64,
}

impl PlanBalance {
    /// Amount still owed. Negative when the plan was overpaid.
    #[inline]
    pub fn remaining_cents(&self) -> i64 {
        self.total_cents - self.paid_cents
    }
}

/// Repository for installment database operations.
pub struct InstallmentRepository;

impl InstallmentRepository {
    /// Inserts an installment plan for a sale.
    ///
    /// The UNIQUE constraint on `sale_id` enforces one plan per sale.
    pub async fn insert_plan(conn: &mut SqliteConnection, plan: &InstallmentPlan) -> DbResult<()> {
        debug!(id = %plan.id, sale_id = %plan.sale_id, "Inserting installment plan");

        sqlx::query(
            r#"
            INSERT INTO installment_plans (
                id, sale_id, initial_payment_cents, num_installments,
                installment_amount_cents, start_date, is_completed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.sale_id)
        .bind(plan.initial_payment_cents)
        .bind(plan.num_installments)
        .bind(plan.installment_amount_cents)
        .bind(plan.start_date)
        .bind(plan.is_completed)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Gets a plan by ID.
    pub async fn get_plan(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<InstallmentPlan>> {
        let plan = sqlx::query_as::<_, InstallmentPlan>(
            r#"
            SELECT id, sale_id, initial_payment_cents, num_installments,
                   installment_amount_cents, start_date, is_completed
            FROM installment_plans
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(plan)
    }

    /// Records a payment row against a plan.
    pub async fn insert_payment(
        conn: &mut SqliteConnection,
        payment: &InstallmentPayment,
    ) -> DbResult<()> {
        debug!(plan_id = %payment.plan_id, amount = %payment.amount_cents, "Recording payment");

        sqlx::query(
            r#"
            INSERT INTO installment_payments (
                id, plan_id, amount_cents, due_date, status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.plan_id)
        .bind(payment.amount_cents)
        .bind(payment.due_date)
        .bind(payment.status)
        .bind(payment.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Lists a plan's payments, oldest first.
    pub async fn payments(
        conn: &mut SqliteConnection,
        plan_id: &str,
    ) -> DbResult<Vec<InstallmentPayment>> {
        let payments = sqlx::query_as::<_, InstallmentPayment>(
            r#"
            SELECT id, plan_id, amount_cents, due_date, status, created_at
            FROM installment_payments
            WHERE plan_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(plan_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(payments)
    }

    /// Sums a plan's payments. A plan with no payments sums to 0, not NULL.
    pub async fn total_paid(conn: &mut SqliteConnection, plan_id: &str) -> DbResult<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)
            FROM installment_payments
            WHERE plan_id = ?1
            "#,
        )
        .bind(plan_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(total)
    }

    /// Marks a plan as completed.
    pub async fn mark_completed(conn: &mut SqliteConnection, plan_id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE installment_plans SET is_completed = 1 WHERE id = ?1")
            .bind(plan_id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InstallmentPlan", plan_id));
        }

        Ok(())
    }

    /// Updates the status of an individual payment (back-office path for
    /// flagging rows PAID or LATE).
    pub async fn set_payment_status(
        conn: &mut SqliteConnection,
        payment_id: &str,
        status: InstallmentStatus,
    ) -> DbResult<()> {
        let result = sqlx::query("UPDATE installment_payments SET status = ?2 WHERE id = ?1")
            .bind(payment_id)
            .bind(status)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("InstallmentPayment", payment_id));
        }

        Ok(())
    }

    /// Lists plans that still owe money, with their paid-to-date sums.
    pub async fn outstanding(conn: &mut SqliteConnection) -> DbResult<Vec<PlanBalance>> {
        let plans = sqlx::query_as::<_, PlanBalance>(
            r#"
            SELECT * FROM (
                SELECT p.id,
                       p.sale_id,
                       s.total_cents,
                       COALESCE((
                           SELECT SUM(ip.amount_cents)
                           FROM installment_payments ip
                           WHERE ip.plan_id = p.id
                       ), 0) AS paid_cents
                FROM installment_plans p
                INNER JOIN sales s ON s.id = p.sale_id
            )
            WHERE total_cents - paid_cents > 0
            ORDER BY id
            "#,
        )
        .fetch_all(&mut *conn)
        .await?;

        Ok(plans)
    }
}
