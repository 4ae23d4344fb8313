use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{
    BorrowerId, DomainError, DomainResult, Entity, ItemId, LoanId, ReturnId, RoomId,
};

/// Condition of the returned units, validated at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnCondition {
    Good,
    Damaged,
    Lost,
}

impl ReturnCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnCondition::Good => "good",
            ReturnCondition::Damaged => "damaged",
            ReturnCondition::Lost => "lost",
        }
    }
}

impl FromStr for ReturnCondition {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" => Ok(ReturnCondition::Good),
            "damaged" => Ok(ReturnCondition::Damaged),
            "lost" => Ok(ReturnCondition::Lost),
            other => Err(DomainError::invalid_request(format!(
                "unknown return condition: '{other}'"
            ))),
        }
    }
}

/// Input for recording a return against a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReturn {
    pub loan_id: LoanId,
    pub quantity: u32,
    pub condition: ReturnCondition,
    pub room_id: Option<RoomId>,
    pub notes: Option<String>,
}

/// One row in the append-only return ledger.
///
/// Created exactly once per return transaction and never mutated afterwards.
/// Multiple rows may reference one loan (partial returns); the sum of their
/// quantities never exceeds the loan's original quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnRecord {
    id: ReturnId,
    loan_id: LoanId,
    borrower_id: BorrowerId,
    item_id: ItemId,
    room_id: Option<RoomId>,
    returned_at: DateTime<Utc>,
    quantity: u32,
    condition: ReturnCondition,
    notes: Option<String>,
    /// Fee in smallest currency unit (e.g., cents).
    late_fee: u64,
    /// Fee in smallest currency unit (e.g., cents).
    damage_fee: u64,
    created_at: DateTime<Utc>,
}

impl ReturnRecord {
    /// Build a ledger row. Quantity-vs-outstanding validation belongs to the
    /// engine, which sees the loan's prior returns; only local shape is
    /// checked here.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ReturnId,
        loan_id: LoanId,
        borrower_id: BorrowerId,
        item_id: ItemId,
        room_id: Option<RoomId>,
        quantity: u32,
        condition: ReturnCondition,
        notes: Option<String>,
        late_fee: u64,
        damage_fee: u64,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity < 1 {
            return Err(DomainError::invalid_request(
                "return quantity must be at least 1",
            ));
        }

        Ok(Self {
            id,
            loan_id,
            borrower_id,
            item_id,
            room_id,
            returned_at: now,
            quantity,
            condition,
            notes,
            late_fee,
            damage_fee,
            created_at: now,
        })
    }

    pub fn loan_id(&self) -> LoanId {
        self.loan_id
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

    pub fn returned_at(&self) -> DateTime<Utc> {
        self.returned_at
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn condition(&self) -> ReturnCondition {
        self.condition
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn late_fee(&self) -> u64 {
        self.late_fee
    }

    pub fn damage_fee(&self) -> u64 {
        self.damage_fee
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Entity for ReturnRecord {
    type Id = ReturnId;

    fn id(&self) -> ReturnId {
        self.id
    }
}
