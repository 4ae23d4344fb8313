//! Entity store: the transactional data-access interface the engine consumes.
//!
//! Durable state is exclusively owned here. Engines operate on entities only
//! inside a transaction; nothing caches Item/Loan state across transaction
//! boundaries.

pub mod in_memory;
pub mod query;
pub mod r#trait;

pub use in_memory::MemStore;
pub use query::LoanFilter;
pub use r#trait::{EntityStore, StoreTx};
