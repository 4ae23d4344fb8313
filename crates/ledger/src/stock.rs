use tracing::{debug, error};

use stockroom_core::{DomainError, DomainResult, ItemId};
use stockroom_store::StoreTx;

/// Proof that stock was decremented inside the current transaction.
///
/// The reservation is only durable once the caller commits the transaction
/// that produced it, together with the owning loan row. Dropping the token
/// without writing that row leaks reserved stock, hence `must_use`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a reservation must be paired with a loan row in the same transaction"]
pub struct Reservation {
    pub item_id: ItemId,
    pub quantity: u32,
    /// Available stock remaining after the decrement.
    pub remaining: u32,
}

/// Atomically check-and-decrement available stock for `item_id`.
///
/// `available_stock` is the sole gate: item status (maintenance, damaged)
/// does not block reservation of whatever stock is still counted available.
pub fn reserve(tx: &mut impl StoreTx, item_id: ItemId, quantity: u32) -> DomainResult<Reservation> {
    if quantity < 1 {
        return Err(DomainError::invalid_request(
            "reservation quantity must be at least 1",
        ));
    }

    let remaining = tx.adjust_available_stock(item_id, -i64::from(quantity))?;
    debug!(%item_id, quantity, remaining, "stock reserved");

    Ok(Reservation {
        item_id,
        quantity,
        remaining,
    })
}

/// Atomically increment available stock for `item_id`.
///
/// Releasing more than is out on loan would push available above total;
/// that is a data error, reported as `LedgerInvariantViolation` and never
/// silently capped.
pub fn release(tx: &mut impl StoreTx, item_id: ItemId, quantity: u32) -> DomainResult<u32> {
    if quantity < 1 {
        return Err(DomainError::invalid_request(
            "release quantity must be at least 1",
        ));
    }

    match tx.adjust_available_stock(item_id, i64::from(quantity)) {
        Ok(available) => {
            debug!(%item_id, quantity, available, "stock released");
            Ok(available)
        }
        Err(e @ DomainError::LedgerInvariantViolation(_)) => {
            error!(%item_id, quantity, error = %e, "release would exceed total stock");
            Err(e)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_catalog::Item;
    use stockroom_core::Entity;
    use stockroom_store::{EntityStore, MemStore};

    fn seeded(total: u32) -> (MemStore, ItemId) {
        let store = MemStore::new();
        let item = Item::new(ItemId::new(), "Projector", "av", "Epson", "AV-3", total).unwrap();
        let item_id = item.id();
        store.transaction(|tx| tx.insert_item(item.clone())).unwrap();
        (store, item_id)
    }

    #[test]
    fn reserve_decrements_and_reports_remaining() {
        let (store, item_id) = seeded(5);
        let reservation = store
            .transaction(|tx| reserve(tx, item_id, 3))
            .unwrap();
        assert_eq!(reservation.quantity, 3);
        assert_eq!(reservation.remaining, 2);
    }

    #[test]
    fn reserve_beyond_available_fails_and_changes_nothing() {
        let (store, item_id) = seeded(2);
        let err = store.transaction(|tx| reserve(tx, item_id, 3)).unwrap_err();
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
    fn reserve_of_zero_is_invalid() {
        let (store, item_id) = seeded(2);
        let err = store.transaction(|tx| reserve(tx, item_id, 0)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));
    }

    #[test]
    fn reserve_missing_item_fails_not_found() {
        let store = MemStore::new();
        let err = store
            .transaction(|tx| reserve(tx, ItemId::new(), 1))
            .unwrap_err();
        assert_eq!(err, DomainError::ItemNotFound);
    }

    #[test]
    fn release_restores_reserved_stock() {
        let (store, item_id) = seeded(5);
        store
            .transaction(|tx| {
                let _ = reserve(tx, item_id, 4)?;
                Ok(())
            })
            .unwrap();
        let available = store
            .transaction(|tx| release(tx, item_id, 4))
            .unwrap();
        assert_eq!(available, 5);
    }

    #[test]
    fn release_above_total_is_an_invariant_violation() {
        let (store, item_id) = seeded(5);
        let err = store.transaction(|tx| release(tx, item_id, 1)).unwrap_err();
        assert!(matches!(err, DomainError::LedgerInvariantViolation(_)));
    }
}
