use std::sync::Arc;

use stockroom_borrowers::Borrower;
use stockroom_catalog::{Item, Room};
use stockroom_core::{BorrowerId, DomainResult, ItemId, LoanId, RoomId};
use stockroom_loans::{Loan, ReturnRecord};

use crate::query::LoanFilter;

/// One open transaction against the entity store.
///
/// Reads observe the transaction's own writes. Nothing done through a
/// transaction is visible to other callers until the enclosing
/// [`EntityStore::transaction`] returns `Ok`.
pub trait StoreTx {
    fn item(&self, id: ItemId) -> DomainResult<Option<Item>>;
    fn insert_item(&mut self, item: Item) -> DomainResult<()>;
    fn update_item(&mut self, item: Item) -> DomainResult<()>;

    /// Atomic conditional stock update, the relational analogue of
    /// `UPDATE item SET available = available + :d
    ///  WHERE id = :id AND available + :d BETWEEN 0 AND total`
    /// with an affected-row check. Returns the new available count.
    ///
    /// Fails `ItemNotFound` when the row is absent, `InsufficientStock` when
    /// a negative delta would underflow, and `LedgerInvariantViolation` when
    /// a positive delta would exceed `total_stock`.
    fn adjust_available_stock(&mut self, id: ItemId, delta: i64) -> DomainResult<u32>;

    fn borrower(&self, id: BorrowerId) -> DomainResult<Option<Borrower>>;
    fn insert_borrower(&mut self, borrower: Borrower) -> DomainResult<()>;

    fn room(&self, id: RoomId) -> DomainResult<Option<Room>>;
    fn insert_room(&mut self, room: Room) -> DomainResult<()>;

    fn loan(&self, id: LoanId) -> DomainResult<Option<Loan>>;
    fn insert_loan(&mut self, loan: Loan) -> DomainResult<()>;
    fn update_loan(&mut self, loan: Loan) -> DomainResult<()>;

    /// Loans matching `filter`, ordered by `(borrowed_at, id)` so pagination
    /// is deterministic.
    fn loans(&self, filter: &LoanFilter) -> DomainResult<Vec<Loan>>;

    /// Append a row to the return ledger. Rows are never updated or deleted.
    fn insert_return(&mut self, record: ReturnRecord) -> DomainResult<()>;

    /// All returns recorded against one loan, oldest first.
    fn returns_for_loan(&self, loan_id: LoanId) -> DomainResult<Vec<ReturnRecord>>;
}

/// Transactional entity store.
///
/// Implementations must guarantee that concurrent transactions serialize
/// their stock checks (row-level locking or stronger): two reservations
/// against the same item must not both succeed when their combined quantity
/// exceeds the available stock.
pub trait EntityStore: Send + Sync {
    type Tx<'a>: StoreTx
    where
        Self: 'a;

    /// Run `f` as one atomic unit: every write commits when `f` returns
    /// `Ok`, and none of them when it returns `Err`. No partial state is
    /// ever visible to other callers.
    fn transaction<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut Self::Tx<'_>) -> DomainResult<T>;
}

impl<S> EntityStore for Arc<S>
where
    S: EntityStore + ?Sized + 'static,
{
    type Tx<'a>
        = S::Tx<'a>
    where
        Self: 'a;

    fn transaction<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut Self::Tx<'_>) -> DomainResult<T>,
    {
        (**self).transaction(f)
    }
}
