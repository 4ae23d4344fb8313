use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{BorrowerId, DomainError, DomainResult, Entity, ItemId, LoanId, RoomId};

/// Loan status lifecycle.
///
/// `active --(due date passes, sweep)--> overdue`;
/// `active|overdue --(full return recorded)--> returned`.
/// `returned` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Overdue,
    Returned,
}

/// Input for creating a loan. Timestamps are supplied by the caller so the
/// state machine stays deterministic under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLoan {
    pub borrower_id: BorrowerId,
    pub item_id: ItemId,
    pub room_id: Option<RoomId>,
    pub quantity: u32,
    pub due_at: DateTime<Utc>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
}

/// A quantity of one item reserved by one borrower until returned.
///
/// The reserved quantity is held against the item until return events fully
/// or partially release it; `returned_at` is set only once the full reserved
/// quantity has come back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    id: LoanId,
    borrower_id: BorrowerId,
    item_id: ItemId,
    room_id: Option<RoomId>,
    quantity: u32,
    borrowed_at: DateTime<Utc>,
    due_at: DateTime<Utc>,
    returned_at: Option<DateTime<Utc>>,
    status: LoanStatus,
    purpose: Option<String>,
    notes: Option<String>,
}

impl Loan {
    /// Open a loan at `now`. Quantity and due-date validation happens here;
    /// stock and eligibility checks belong to the engine.
    pub fn open(id: LoanId, req: NewLoan, now: DateTime<Utc>) -> DomainResult<Self> {
        if req.quantity < 1 {
            return Err(DomainError::invalid_request("quantity must be at least 1"));
        }
        if req.due_at <= now {
            return Err(DomainError::invalid_request("due date must be in the future"));
        }

        Ok(Self {
            id,
            borrower_id: req.borrower_id,
            item_id: req.item_id,
            room_id: req.room_id,
            quantity: req.quantity,
            borrowed_at: now,
            due_at: req.due_at,
            returned_at: None,
            status: LoanStatus::Active,
            purpose: req.purpose,
            notes: req.notes,
        })
    }

    pub fn borrower_id(&self) -> BorrowerId {
        self.borrower_id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.room_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn borrowed_at(&self) -> DateTime<Utc> {
        self.borrowed_at
    }

    pub fn due_at(&self) -> DateTime<Utc> {
        self.due_at
    }

    pub fn returned_at(&self) -> Option<DateTime<Utc>> {
        self.returned_at
    }

    pub fn status(&self) -> LoanStatus {
        self.status
    }

    pub fn purpose(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Whether stock is still held against this loan.
    pub fn is_open(&self) -> bool {
        self.status != LoanStatus::Returned
    }

    /// Whether the due date has elapsed and the loan is still active.
    pub fn is_past_due(&self, now: DateTime<Utc>) -> bool {
        self.status == LoanStatus::Active && self.due_at < now
    }

    /// Outstanding quantity given the total already returned against this loan.
    pub fn outstanding(&self, returned_so_far: u32) -> u32 {
        self.quantity.saturating_sub(returned_so_far)
    }

    /// Sweep transition: `active -> overdue` once `due_at` has passed.
    ///
    /// Idempotent; returns whether a transition happened. Never applies to a
    /// returned loan.
    pub fn mark_overdue(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_past_due(now) {
            self.status = LoanStatus::Overdue;
            true
        } else {
            false
        }
    }

    /// Full-return transition: `active|overdue -> returned`.
    pub fn close(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == LoanStatus::Returned {
            return Err(DomainError::invariant(format!(
                "loan {} is already returned",
                self.id
            )));
        }
        self.status = LoanStatus::Returned;
        self.returned_at = Some(now);
        Ok(())
    }

    /// How long past due the loan is at `now`; zero when not yet due.
    pub fn overdue_elapsed(&self, now: DateTime<Utc>) -> chrono::Duration {
        if now > self.due_at {
            now - self.due_at
        } else {
            chrono::Duration::zero()
        }
    }
}

impl Entity for Loan {
    type Id = LoanId;

    fn id(&self) -> LoanId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn test_request(quantity: u32, due_in: Duration, now: DateTime<Utc>) -> NewLoan {
        NewLoan {
            borrower_id: BorrowerId::new(),
            item_id: ItemId::new(),
            room_id: None,
            quantity,
            due_at: now + due_in,
            purpose: Some("robotics club".to_string()),
            notes: None,
        }
    }

    #[test]
    fn open_loan_starts_active() {
        let now = Utc::now();
        let loan = Loan::open(LoanId::new(), test_request(2, Duration::days(7), now), now).unwrap();
        assert_eq!(loan.status(), LoanStatus::Active);
        assert_eq!(loan.borrowed_at(), now);
        assert!(loan.returned_at().is_none());
        assert!(loan.is_open());
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let now = Utc::now();
        let err = Loan::open(LoanId::new(), test_request(0, Duration::days(7), now), now)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));
    }

    #[test]
    fn due_date_must_be_after_borrowed_at() {
        let now = Utc::now();
        let err = Loan::open(LoanId::new(), test_request(1, Duration::days(-1), now), now)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));
    }

    #[test]
    fn mark_overdue_is_idempotent() {
        let now = Utc::now();
        let mut loan =
            Loan::open(LoanId::new(), test_request(1, Duration::days(1), now), now).unwrap();
        let later = now + Duration::days(2);

        assert!(loan.mark_overdue(later));
        assert_eq!(loan.status(), LoanStatus::Overdue);
        assert!(!loan.mark_overdue(later));
        assert_eq!(loan.status(), LoanStatus::Overdue);
    }

    #[test]
    fn overdue_loan_can_still_close() {
        let now = Utc::now();
        let mut loan =
            Loan::open(LoanId::new(), test_request(1, Duration::days(1), now), now).unwrap();
        let later = now + Duration::days(3);

        loan.mark_overdue(later);
        loan.close(later).unwrap();
        assert_eq!(loan.status(), LoanStatus::Returned);
        assert_eq!(loan.returned_at(), Some(later));
        assert!(!loan.is_open());
    }

    #[test]
    fn returned_is_terminal() {
        let now = Utc::now();
        let mut loan =
            Loan::open(LoanId::new(), test_request(1, Duration::days(1), now), now).unwrap();
        loan.close(now).unwrap();

        assert!(loan.close(now).is_err());
        assert!(!loan.mark_overdue(now + Duration::days(30)));
    }

    #[test]
    fn overdue_elapsed_is_zero_before_due() {
        let now = Utc::now();
        let loan =
            Loan::open(LoanId::new(), test_request(1, Duration::days(5), now), now).unwrap();
        assert_eq!(loan.overdue_elapsed(now), Duration::zero());
        assert_eq!(
            loan.overdue_elapsed(now + Duration::days(7)),
            Duration::days(2)
        );
    }

    #[test]
    fn outstanding_never_underflows() {
        let now = Utc::now();
        let loan =
            Loan::open(LoanId::new(), test_request(3, Duration::days(1), now), now).unwrap();
        assert_eq!(loan.outstanding(0), 3);
        assert_eq!(loan.outstanding(2), 1);
        assert_eq!(loan.outstanding(5), 0);
    }
}
