//! Stock ledger: atomic reservation and release of item stock.
//!
//! Both operations run inside a caller-supplied transaction and never commit
//! on their own. The primary correctness risk this module exists to prevent
//! is partial application: stock changed without the owning loan/return row,
//! or the reverse. Callers must perform the row write in the same
//! transaction.

pub mod stock;

pub use stock::{release, reserve, Reservation};
