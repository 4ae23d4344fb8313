//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Business-rule rejections (`InsufficientStock`, `BorrowerIneligible`, ...)
/// are normal failures surfaced to the caller. `LedgerInvariantViolation` is a
/// data/programmer error: it must be logged and the operation aborted, never
/// silently corrected. Only `StorageUnavailable` is eligible for retry, and
/// only before anything has committed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-range input. Surfaced to the caller, not retried.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The borrower does not exist or is not allowed to borrow.
    #[error("borrower ineligible: {0}")]
    BorrowerIneligible(String),

    /// The referenced item does not exist.
    #[error("item not found")]
    ItemNotFound,

    /// The referenced loan does not exist.
    #[error("loan not found")]
    LoanNotFound,

    /// Not enough available stock to satisfy the reservation.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },

    /// Stock and ledger rows disagree, or a release would exceed total stock.
    #[error("ledger invariant violated: {0}")]
    LedgerInvariantViolation(String),

    /// Transient storage failure. Safe to retry the whole transaction.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn borrower_ineligible(msg: impl Into<String>) -> Self {
        Self::BorrowerIneligible(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::LedgerInvariantViolation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageUnavailable(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Whether the failed operation may be retried from scratch.
    ///
    /// Retrying is only sound before any side effect has been observed to
    /// commit; callers own that judgement.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}
