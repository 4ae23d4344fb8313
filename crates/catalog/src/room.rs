use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, RoomId};

/// Room status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Active,
    Inactive,
}

/// Optional location tag attached to a loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    name: String,
    status: RoomStatus,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_request("room name cannot be empty"));
        }
        Ok(Self {
            id,
            name,
            status: RoomStatus::Active,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> RoomStatus {
        self.status
    }

    pub fn set_status(&mut self, status: RoomStatus) {
        self.status = status;
    }

    /// Whether loans may be tagged with this room.
    pub fn is_active(&self) -> bool {
        self.status == RoomStatus::Active
    }
}

impl Entity for Room {
    type Id = RoomId;

    fn id(&self) -> RoomId {
        self.id
    }
}
