use std::collections::HashMap;
use std::sync::Mutex;

use stockroom_borrowers::Borrower;
use stockroom_catalog::{Item, Room};
use stockroom_core::{
    BorrowerId, DomainError, DomainResult, Entity, ItemId, LoanId, ReturnId, RoomId,
};
use stockroom_loans::{Loan, ReturnRecord};

use crate::query::LoanFilter;
use crate::r#trait::{EntityStore, StoreTx};

#[derive(Debug, Default, Clone)]
struct State {
    items: HashMap<ItemId, Item>,
    borrowers: HashMap<BorrowerId, Borrower>,
    rooms: HashMap<RoomId, Room>,
    loans: HashMap<LoanId, Loan>,
    returns: HashMap<ReturnId, ReturnRecord>,
}

/// In-memory entity store.
///
/// Intended for tests/dev; a relational backend sits behind the same traits
/// in production. A transaction holds the state lock for its whole scope, so
/// all state-changing operations serialize (stronger than the required
/// read-committed + row locks), and works on a copy that is written back
/// only on commit.
#[derive(Debug, Default)]
pub struct MemStore {
    state: Mutex<State>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Working copy of the store state for one transaction.
#[derive(Debug)]
pub struct MemTx {
    work: State,
}

impl EntityStore for MemStore {
    type Tx<'a>
        = MemTx
    where
        Self: 'a;

    fn transaction<T, F>(&self, f: F) -> DomainResult<T>
    where
        F: FnOnce(&mut Self::Tx<'_>) -> DomainResult<T>,
    {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| DomainError::storage("state lock poisoned"))?;

        let mut tx = MemTx {
            work: guard.clone(),
        };
        let out = f(&mut tx)?;

        // Commit: the working copy becomes the durable state. An Err above
        // drops the copy, which is the rollback.
        *guard = tx.work;
        Ok(out)
    }
}

impl StoreTx for MemTx {
    fn item(&self, id: ItemId) -> DomainResult<Option<Item>> {
        Ok(self.work.items.get(&id).cloned())
    }

    fn insert_item(&mut self, item: Item) -> DomainResult<()> {
        let id = item.id();
        if self.work.items.insert(id, item).is_some() {
            return Err(DomainError::invariant(format!("duplicate item id {id}")));
        }
        Ok(())
    }

    fn update_item(&mut self, item: Item) -> DomainResult<()> {
        let id = item.id();
        match self.work.items.get_mut(&id) {
            Some(slot) => {
                *slot = item;
                Ok(())
            }
            None => Err(DomainError::ItemNotFound),
        }
    }

    fn adjust_available_stock(&mut self, id: ItemId, delta: i64) -> DomainResult<u32> {
        let item = self.work.items.get_mut(&id).ok_or(DomainError::ItemNotFound)?;
        item.adjust_available(delta)
    }

    fn borrower(&self, id: BorrowerId) -> DomainResult<Option<Borrower>> {
        Ok(self.work.borrowers.get(&id).cloned())
    }

    fn insert_borrower(&mut self, borrower: Borrower) -> DomainResult<()> {
        let id = borrower.id();
        if self.work.borrowers.insert(id, borrower).is_some() {
            return Err(DomainError::invariant(format!("duplicate borrower id {id}")));
        }
        Ok(())
    }

    fn room(&self, id: RoomId) -> DomainResult<Option<Room>> {
        Ok(self.work.rooms.get(&id).cloned())
    }

    fn insert_room(&mut self, room: Room) -> DomainResult<()> {
        let id = room.id();
        if self.work.rooms.insert(id, room).is_some() {
            return Err(DomainError::invariant(format!("duplicate room id {id}")));
        }
        Ok(())
    }

    fn loan(&self, id: LoanId) -> DomainResult<Option<Loan>> {
        Ok(self.work.loans.get(&id).cloned())
    }

    fn insert_loan(&mut self, loan: Loan) -> DomainResult<()> {
        let id = loan.id();
        if self.work.loans.insert(id, loan).is_some() {
            return Err(DomainError::invariant(format!("duplicate loan id {id}")));
        }
        Ok(())
    }

    fn update_loan(&mut self, loan: Loan) -> DomainResult<()> {
        let id = loan.id();
        match self.work.loans.get_mut(&id) {
            Some(slot) => {
                *slot = loan;
                Ok(())
            }
            None => Err(DomainError::LoanNotFound),
        }
    }

    fn loans(&self, filter: &LoanFilter) -> DomainResult<Vec<Loan>> {
        let mut matched: Vec<Loan> = self
            .work
            .loans
            .values()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        matched.sort_by_key(|l| (l.borrowed_at(), l.id()));
        Ok(matched)
    }

    fn insert_return(&mut self, record: ReturnRecord) -> DomainResult<()> {
        let id = record.id();
        if self.work.returns.insert(id, record).is_some() {
            return Err(DomainError::invariant(format!("duplicate return id {id}")));
        }
        Ok(())
    }

    fn returns_for_loan(&self, loan_id: LoanId) -> DomainResult<Vec<ReturnRecord>> {
        let mut matched: Vec<ReturnRecord> = self
            .work
            .returns
            .values()
            .filter(|r| r.loan_id() == loan_id)
            .cloned()
            .collect();
        matched.sort_by_key(|r| (r.created_at(), r.id()));
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_item(total: u32) -> Item {
        Item::new(ItemId::new(), "DSLR kit", "camera", "Canon", "AV-07", total).unwrap()
    }

    fn seeded_store(total: u32) -> (MemStore, ItemId) {
        let store = MemStore::new();
        let item = test_item(total);
        let item_id = item.id();
        store
            .transaction(|tx| tx.insert_item(item.clone()))
            .unwrap();
        (store, item_id)
    }

    #[test]
    fn committed_writes_are_visible_to_later_transactions() {
        let (store, item_id) = seeded_store(4);
        store
            .transaction(|tx| tx.adjust_available_stock(item_id, -3))
            .unwrap();

        let available = store
            .transaction(|tx| Ok(tx.item(item_id)?.unwrap().available_stock()))
            .unwrap();
        assert_eq!(available, 1);
    }

    #[test]
    fn failed_transaction_rolls_back_every_write() {
        let (store, item_id) = seeded_store(4);

        let err = store
            .transaction(|tx| {
                tx.adjust_available_stock(item_id, -3)?;
                Err::<(), _>(DomainError::invalid_request("forced failure"))
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));

        let available = store
            .transaction(|tx| Ok(tx.item(item_id)?.unwrap().available_stock()))
            .unwrap();
        assert_eq!(available, 4);
    }

    #[test]
    fn reads_observe_writes_within_the_same_transaction() {
        let (store, item_id) = seeded_store(4);
        store
            .transaction(|tx| {
                tx.adjust_available_stock(item_id, -2)?;
                assert_eq!(tx.item(item_id)?.unwrap().available_stock(), 2);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn adjust_on_missing_item_fails_not_found() {
        let store = MemStore::new();
        let err = store
            .transaction(|tx| tx.adjust_available_stock(ItemId::new(), -1))
            .unwrap_err();
        assert_eq!(err, DomainError::ItemNotFound);
    }

    #[test]
    fn conditional_decrement_rejects_overdraw_and_leaves_stock_unchanged() {
        let (store, item_id) = seeded_store(2);
        let err = store
            .transaction(|tx| tx.adjust_available_stock(item_id, -3))
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                requested: 3,
                available: 2
            }
        );

        let available = store
            .transaction(|tx| Ok(tx.item(item_id)?.unwrap().available_stock()))
            .unwrap();
        assert_eq!(available, 2);
    }

    #[test]
    fn update_item_persists_status_transitions() {
        use stockroom_catalog::ItemStatus;

        let (store, item_id) = seeded_store(3);
        store
            .transaction(|tx| {
                let mut item = tx.item(item_id)?.unwrap();
                item.set_status(ItemStatus::Maintenance);
                tx.update_item(item)
            })
            .unwrap();

        let status = store
            .transaction(|tx| Ok(tx.item(item_id)?.unwrap().status()))
            .unwrap();
        assert_eq!(status, ItemStatus::Maintenance);

        let err = store
            .transaction(|tx| tx.update_item(test_item(1)))
            .unwrap_err();
        assert_eq!(err, DomainError::ItemNotFound);
    }

    #[test]
    fn duplicate_insert_is_an_invariant_violation() {
        let (store, _) = seeded_store(1);
        let item = test_item(1);
        let err = store
            .transaction(|tx| {
                tx.insert_item(item.clone())?;
                tx.insert_item(item.clone())
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::LedgerInvariantViolation(_)));
    }

    proptest! {
        /// Property: across any sequence of committed adjustments, available
        /// stock never leaves `0..=total`.
        #[test]
        fn stock_bounds_hold_across_transactions(
            total in 0u32..50,
            deltas in prop::collection::vec(-50i64..50, 0..40)
        ) {
            let (store, item_id) = seeded_store(total);
            for delta in deltas {
                let _ = store.transaction(|tx| tx.adjust_available_stock(item_id, delta));
                let item = store
                    .transaction(|tx| Ok(tx.item(item_id)?.unwrap()))
                    .unwrap();
                prop_assert!(item.available_stock() <= item.total_stock());
            }
        }
    }
}
