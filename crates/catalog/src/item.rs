use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ItemId};

/// Item availability status.
///
/// Status is driven by external maintenance/damage workflows and is accepted
/// verbatim here. It does not gate reservations: `available_stock` is the
/// sole gate for the stock ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Available,
    Borrowed,
    Maintenance,
    Damaged,
}

/// A loanable asset in the catalog.
///
/// `available_stock` is mutated only through the store's conditional adjust
/// primitive, so the `0 <= available_stock <= total_stock` invariant holds at
/// every commit point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    model: String,
    category: String,
    brand: String,
    device_tag: String,
    total_stock: u32,
    available_stock: u32,
    status: ItemStatus,
}

impl Item {
    /// Register a new item with all units on the shelf.
    pub fn new(
        id: ItemId,
        model: impl Into<String>,
        category: impl Into<String>,
        brand: impl Into<String>,
        device_tag: impl Into<String>,
        total_stock: u32,
    ) -> DomainResult<Self> {
        let model = model.into();
        if model.trim().is_empty() {
            return Err(DomainError::invalid_request("item model cannot be empty"));
        }

        Ok(Self {
            id,
            model,
            category: category.into(),
            brand: brand.into(),
            device_tag: device_tag.into(),
            total_stock,
            available_stock: total_stock,
            status: ItemStatus::Available,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn device_tag(&self) -> &str {
        &self.device_tag
    }

    pub fn total_stock(&self) -> u32 {
        self.total_stock
    }

    pub fn available_stock(&self) -> u32 {
        self.available_stock
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    /// Units currently out on loan.
    pub fn on_loan(&self) -> u32 {
        self.total_stock - self.available_stock
    }

    /// Accept a status transition from an external workflow.
    pub fn set_status(&mut self, status: ItemStatus) {
        self.status = status;
    }

    /// Apply a signed stock delta, enforcing `0 <= available <= total`.
    ///
    /// This is the check-and-write the store must run under its row lock; it
    /// is never valid to compute the new count outside the transaction.
    pub fn adjust_available(&mut self, delta: i64) -> DomainResult<u32> {
        let current = i64::from(self.available_stock);
        let next = current + delta;

        if next < 0 {
            return Err(DomainError::InsufficientStock {
                requested: (-delta) as u32,
                available: self.available_stock,
            });
        }
        if next > i64::from(self.total_stock) {
            return Err(DomainError::invariant(format!(
                "release of {} would put item {} at {}/{} available",
                delta, self.id, next, self.total_stock
            )));
        }

        self.available_stock = next as u32;
        Ok(self.available_stock)
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}
