//! # Workflows
//!
//! Transaction-owning entry points for the reconciliation core.
//!
//! ## Transaction Boundaries
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Each workflow call is one database transaction:                    │
//! │                                                                     │
//! │  create_sale ──► begin ── sale ── items ── stock ── total ── commit │
//! │  create_return ► begin ── validate ── return ── items ── commit     │
//! │  record_payment► begin ── payment ── balance ── completion ─ commit │
//! │                                                                     │
//! │  Any error path drops the transaction, which rolls it back: the     │
//! │  store never holds a partial sale, a partial return, or a stock     │
//! │  level that disagrees with the rows that moved it.                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business-rule violations ([`CoreError`]) and storage failures
//! ([`DbError`]) are both funneled into [`WorkflowError`]; callers never see
//! a raw sqlx error.

pub mod installment;
pub mod inventory;
pub mod returns;
pub mod sale;

use thiserror::Error;

use crate::error::DbError;
use storefront_core::{CoreError, ValidationError};

/// Boundary error for workflow entry points.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A business rule was violated; the message is user-facing.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store failed; fatal for the current request.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        WorkflowError::Core(CoreError::Validation(err))
    }
}

/// Result type for workflow operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;
