//! # Repositories
//!
//! One module per aggregate. Repositories are stateless: every function
//! takes an explicit `&mut SqliteConnection`, so the same function works
//! against a pooled connection (plain reads) or inside a workflow
//! transaction (multi-step writes). The workflow layer, not the repository,
//! decides where the transaction boundary sits.

pub mod customer;
pub mod installment;
pub mod product;
pub mod returns;
pub mod sale;

pub use customer::CustomerRepository;
pub use installment::InstallmentRepository;
pub use product::ProductRepository;
pub use returns::ReturnRepository;
pub use sale::SaleRepository;
