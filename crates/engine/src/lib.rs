//! Lending engine: loan lifecycle and return reconciliation over the
//! transactional entity store.
//!
//! The request layer (HTTP, auth, rendering) sits above this crate and has
//! already authenticated the caller; everything here is invoked with trusted
//! identities and returns typed results.

pub mod service;


pub use service::{LoanPage, LoanService, Page};
