//! Borrowers domain module: members of the institution who take out loans.
//!
//! Read-only to the lending engine apart from existence/eligibility checks.

pub mod borrower;

pub use borrower::{Borrower, BorrowerKind, BorrowerStatus, ContactInfo};
