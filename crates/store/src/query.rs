use serde::{Deserialize, Serialize};

use stockroom_core::{BorrowerId, ItemId};
use stockroom_loans::{Loan, LoanStatus};

/// Filter for loan listings. Empty filter matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanFilter {
    pub borrower_id: Option<BorrowerId>,
    pub item_id: Option<ItemId>,
    pub status: Option<LoanStatus>,
}

impl LoanFilter {
    pub fn by_borrower(borrower_id: BorrowerId) -> Self {
        Self {
            borrower_id: Some(borrower_id),
            ..Self::default()
        }
    }

    pub fn by_item(item_id: ItemId) -> Self {
        Self {
            item_id: Some(item_id),
            ..Self::default()
        }
    }

    pub fn by_status(status: LoanStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn matches(&self, loan: &Loan) -> bool {
        self.borrower_id.is_none_or(|b| loan.borrower_id() == b)
            && self.item_id.is_none_or(|i| loan.item_id() == i)
            && self.status.is_none_or(|s| loan.status() == s)
    }
}
