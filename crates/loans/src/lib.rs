//! Loans domain module: the borrow/return ledger rows and their state machine.
//!
//! This crate contains business rules for loans and returns, implemented
//! purely as deterministic domain logic (no IO, no storage). Orchestration
//! against the entity store lives in `stockroom-engine`.

pub mod fees;
pub mod loan;
pub mod receipt;

pub use fees::{FeePolicy, FlatRateFees, NoFees};
pub use loan::{Loan, LoanStatus, NewLoan};
pub use receipt::{NewReturn, ReturnCondition, ReturnRecord};
