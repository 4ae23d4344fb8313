use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockroom_core::{BorrowerId, DomainError, DomainResult, Entity};

/// Borrower kind: closed enumeration, validated at the boundary.
///
/// Free-form member-type strings from upstream systems are mapped through
/// `FromStr`; anything outside the mapping is rejected as `InvalidRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowerKind {
    Student,
    Faculty,
    Staff,
}

impl BorrowerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowerKind::Student => "student",
            BorrowerKind::Faculty => "faculty",
            BorrowerKind::Staff => "staff",
        }
    }
}

impl FromStr for BorrowerKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(BorrowerKind::Student),
            "faculty" => Ok(BorrowerKind::Faculty),
            "staff" => Ok(BorrowerKind::Staff),
            other => Err(DomainError::invalid_request(format!(
                "unknown borrower kind: '{other}'"
            ))),
        }
    }
}

/// Borrower status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowerStatus {
    Active,
    Inactive,
}

/// Contact information for a borrower.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// A member of the institution eligible to borrow assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Borrower {
    id: BorrowerId,
    school_id: String,
    name: String,
    contact: ContactInfo,
    department: String,
    kind: BorrowerKind,
    status: BorrowerStatus,
}

impl Borrower {
    pub fn new(
        id: BorrowerId,
        school_id: impl Into<String>,
        name: impl Into<String>,
        contact: ContactInfo,
        department: impl Into<String>,
        kind: BorrowerKind,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_request("borrower name cannot be empty"));
        }
        let school_id = school_id.into();
        if school_id.trim().is_empty() {
            return Err(DomainError::invalid_request("school id cannot be empty"));
        }

        Ok(Self {
            id,
            school_id,
            name,
            contact,
            department: department.into(),
            kind,
            status: BorrowerStatus::Active,
        })
    }

    pub fn school_id(&self) -> &str {
        &self.school_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn kind(&self) -> BorrowerKind {
        self.kind
    }

    pub fn status(&self) -> BorrowerStatus {
        self.status
    }

    pub fn set_status(&mut self, status: BorrowerStatus) {
        self.status = status;
    }

    /// Invariant helper: whether this borrower may take out new loans.
    ///
    /// Inactive borrowers cannot borrow.
    pub fn can_borrow(&self) -> bool {
        self.status == BorrowerStatus::Active
    }
}

impl Entity for Borrower {
    type Id = BorrowerId;

    fn id(&self) -> BorrowerId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_borrower() -> Borrower {
        Borrower::new(
            BorrowerId::new(),
            "S-2024-117",
            "Dana Reyes",
            ContactInfo::default(),
            "Engineering",
            BorrowerKind::Student,
        )
        .unwrap()
    }

    #[test]
    fn active_borrower_can_borrow() {
        let borrower = test_borrower();
        assert!(borrower.can_borrow());
    }

    #[test]
    fn inactive_borrower_cannot_borrow() {
        let mut borrower = test_borrower();
        borrower.set_status(BorrowerStatus::Inactive);
        assert!(!borrower.can_borrow());
    }

    #[test]
    fn kind_mapping_accepts_known_strings_case_insensitively() {
        assert_eq!("student".parse::<BorrowerKind>().unwrap(), BorrowerKind::Student);
        assert_eq!("Faculty".parse::<BorrowerKind>().unwrap(), BorrowerKind::Faculty);
        assert_eq!(" STAFF ".parse::<BorrowerKind>().unwrap(), BorrowerKind::Staff);
    }

    #[test]
    fn kind_mapping_rejects_unknown_strings() {
        let err = "visitor".parse::<BorrowerKind>().unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));
    }

    #[test]
    fn blank_identity_fields_are_rejected() {
        let err = Borrower::new(
            BorrowerId::new(),
            "",
            "Dana Reyes",
            ContactInfo::default(),
            "Engineering",
            BorrowerKind::Student,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidRequest(_)));
    }
}
