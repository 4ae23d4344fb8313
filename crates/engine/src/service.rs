//! Loan lifecycle and return reconciliation (application-level orchestration).
//!
//! Every public operation opens exactly one store transaction and re-reads
//! current state inside it; no entity state is cached across operations.
//! Failure anywhere inside the transaction rolls back all of it, including
//! stock movements, so loan/return rows and the stock ledger can never
//! disagree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use stockroom_core::{DomainError, DomainResult, Entity, LoanId, ReturnId};
use stockroom_loans::{FeePolicy, Loan, LoanStatus, NewLoan, NewReturn, ReturnRecord};
use stockroom_store::{EntityStore, LoanFilter, StoreTx};

/// Bounded retry for transient storage failures. Retrying is only sound
/// because a failed transaction commits nothing.
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF_MS: u64 = 25;

/// 1-based page request for loan listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    pub fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }

    fn offset(&self) -> usize {
        (self.number.saturating_sub(1) as usize) * self.size as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: 50,
        }
    }
}

/// One page of loans plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPage {
    pub loans: Vec<Loan>,
    pub total: usize,
    pub page: Page,
}

/// Stateless operations over the entity store: loan creation, return
/// reconciliation, the overdue sweep, and the read paths the request layer
/// consumes.
#[derive(Debug, Clone)]
pub struct LoanService<S, P> {
    store: S,
    fees: P,
}

impl<S, P> LoanService<S, P>
where
    S: EntityStore + 'static,
    P: FeePolicy,
{
    pub fn new(store: S, fees: P) -> Self {
        Self { store, fees }
    }

    /// Create a loan, reserving stock atomically with the loan row.
    ///
    /// Eligibility, existence and request validation run inside the same
    /// transaction as the reservation, so a failure at any step undoes the
    /// stock decrement.
    pub fn create_loan(&self, req: NewLoan, now: DateTime<Utc>) -> DomainResult<Loan> {
        let loan = self.run("create_loan", |tx| {
            let borrower = tx.borrower(req.borrower_id)?.ok_or_else(|| {
                DomainError::borrower_ineligible(format!("borrower {} not found", req.borrower_id))
            })?;
            if !borrower.can_borrow() {
                return Err(DomainError::borrower_ineligible(format!(
                    "borrower {} is inactive",
                    req.borrower_id
                )));
            }

            if tx.item(req.item_id)?.is_none() {
                return Err(DomainError::ItemNotFound);
            }

            let loan = Loan::open(LoanId::new(), req.clone(), now)?;

            if let Some(room_id) = req.room_id {
                let room = tx.room(room_id)?.ok_or_else(|| {
                    DomainError::invalid_request(format!("room {room_id} not found"))
                })?;
                if !room.is_active() {
                    return Err(DomainError::invalid_request(format!(
                        "room {room_id} is inactive"
                    )));
                }
            }

            let reservation = stockroom_ledger::reserve(tx, req.item_id, req.quantity)?;
            tx.insert_loan(loan.clone())?;

            info!(
                loan_id = %loan.id(),
                item_id = %reservation.item_id,
                quantity = reservation.quantity,
                remaining = reservation.remaining,
                "loan created"
            );
            Ok(loan)
        })?;

        Ok(loan)
    }

    /// Record a return against a loan: append the ledger row, release stock,
    /// and close the loan when the full reserved quantity is back.
    pub fn record_return(&self, req: NewReturn, now: DateTime<Utc>) -> DomainResult<ReturnRecord> {
        self.run("record_return", |tx| {
            let mut loan = tx.loan(req.loan_id)?.ok_or(DomainError::LoanNotFound)?;

            let returned_so_far: u32 = tx
                .returns_for_loan(req.loan_id)?
                .iter()
                .map(|r| r.quantity())
                .sum();
            let outstanding = loan.outstanding(returned_so_far);

            if req.quantity < 1 {
                return Err(DomainError::invalid_request(
                    "return quantity must be at least 1",
                ));
            }
            if req.quantity > outstanding {
                return Err(DomainError::invalid_request(format!(
                    "return quantity {} exceeds outstanding {}",
                    req.quantity, outstanding
                )));
            }

            if let Some(room_id) = req.room_id {
                let room = tx.room(room_id)?.ok_or_else(|| {
                    DomainError::invalid_request(format!("room {room_id} not found"))
                })?;
                if !room.is_active() {
                    return Err(DomainError::invalid_request(format!(
                        "room {room_id} is inactive"
                    )));
                }
            }

            let late_fee = self.fees.late_fee(loan.overdue_elapsed(now));
            let damage_fee = self.fees.damage_fee(req.condition);

            let record = ReturnRecord::new(
                ReturnId::new(),
                req.loan_id,
                loan.borrower_id(),
                loan.item_id(),
                req.room_id,
                req.quantity,
                req.condition,
                req.notes.clone(),
                late_fee,
                damage_fee,
                now,
            )?;

            tx.insert_return(record.clone())?;
            stockroom_ledger::release(tx, loan.item_id(), req.quantity)?;

            let closes_loan = req.quantity == outstanding;
            if closes_loan {
                loan.close(now)?;
                tx.update_loan(loan.clone())?;
            }

            info!(
                loan_id = %req.loan_id,
                return_id = %record.id(),
                quantity = req.quantity,
                condition = req.condition.as_str(),
                late_fee,
                damage_fee,
                closed = closes_loan,
                "return recorded"
            );
            Ok(record)
        })
    }

    /// Mark every active loan whose due date has passed as overdue.
    ///
    /// Idempotent, and safe to run concurrently with returns: a return on an
    /// overdue loan still succeeds and wins with `returned`.
    pub fn sweep_overdue(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        self.run("sweep_overdue", |tx| {
            let active = tx.loans(&LoanFilter::by_status(LoanStatus::Active))?;
            let mut swept = 0usize;
            for mut loan in active {
                if loan.mark_overdue(now) {
                    tx.update_loan(loan)?;
                    swept += 1;
                }
            }
            if swept > 0 {
                info!(swept, "overdue sweep marked loans");
            }
            Ok(swept)
        })
    }

    /// Loans matching `filter`, paged deterministically.
    pub fn list_loans(&self, filter: LoanFilter, page: Page) -> DomainResult<LoanPage> {
        if page.size < 1 {
            return Err(DomainError::invalid_request("page size must be at least 1"));
        }

        self.run("list_loans", |tx| {
            let matched = tx.loans(&filter)?;
            let total = matched.len();
            let loans = matched
                .into_iter()
                .skip(page.offset())
                .take(page.size as usize)
                .collect();
            Ok(LoanPage { loans, total, page })
        })
    }

    /// Read-time view of overdue loans: those already swept plus active
    /// loans whose due date has elapsed. Does not mutate state.
    pub fn overdue_loans(&self, now: DateTime<Utc>) -> DomainResult<Vec<Loan>> {
        self.run("overdue_loans", |tx| {
            let mut overdue = tx.loans(&LoanFilter::by_status(LoanStatus::Overdue))?;
            let past_due_active = tx
                .loans(&LoanFilter::by_status(LoanStatus::Active))?
                .into_iter()
                .filter(|l| l.is_past_due(now));
            overdue.extend(past_due_active);
            overdue.sort_by_key(|l| (l.borrowed_at(), l.id()));
            Ok(overdue)
        })
    }

    /// Run one transaction, retrying only on `StorageUnavailable` and only
    /// because nothing has committed when a transaction fails.
    fn run<T, F>(&self, op: &str, f: F) -> DomainResult<T>
    where
        F: Fn(&mut S::Tx<'_>) -> DomainResult<T>,
    {
        let mut attempt = 1u32;
        loop {
            match self.store.transaction(&f) {
                Ok(out) => return Ok(out),
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    warn!(op, attempt, error = %e, "transient storage failure, retrying");
                    std::thread::sleep(std::time::Duration::from_millis(
                        RETRY_BACKOFF_MS * u64::from(attempt),
                    ));
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
