//! # storefront-core: Pure Business Logic for Storefront
//!
//! This crate is the heart of Storefront. It contains the domain model and
//! business rules for a small retail point-of-sale and accounting system as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Architecture                         │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐ │
//! │  │             Presentation layer (external)                     │ │
//! │  │   raw strings in, rendered results out                        │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │            ★ storefront-core (THIS CRATE) ★                   │ │
//! │  │                                                               │ │
//! │  │   ┌───────────┐ ┌───────────┐ ┌───────────┐ ┌────────────┐   │ │
//! │  │   │   types   │ │   money   │ │   error   │ │ validation │   │ │
//! │  │   │  Product  │ │   Money   │ │ CoreError │ │   rules    │   │ │
//! │  │   │   Sale    │ │  parsing  │ │           │ │   checks   │   │ │
//! │  │   └───────────┘ └───────────┘ └───────────┘ └────────────┘   │ │
//! │  │                                                               │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS          │ │
//! │  └──────────────────────────────┬────────────────────────────────┘ │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐ │
//! │  │              storefront-db (Database Layer)                   │ │
//! │  │     SQLite repositories, migrations, workflow transactions    │ │
//! │  └───────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Sale, Return, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input parsing and business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are cents (i64), never floats
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single line item.
///
/// Guards against fat-finger entries (1000 typed instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
