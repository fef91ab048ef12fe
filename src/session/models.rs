use std::{collections::HashMap, fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::error::Error;

lazy_static! {
    // Display roles keyed by login identifier
    static ref ROLES_BY_LOGIN: HashMap<&'static str, Role> = HashMap::from([
        ("atm_ops", Role::AtmOperationsStaff),
        ("branch_mgr", Role::BranchOperationsManager),
        ("vault_mgr", Role::VaultManager),
        ("hoao", Role::HeadOfficeAuthorizationOfficer),
    ]);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    AtmOperationsStaff,
    BranchOperationsManager,
    VaultManager,
    HeadOfficeAuthorizationOfficer,
    Unknown,
}

impl Role {
    ///
    /// Looks up the display role for a login identifier.
    /// Identifiers outside the fixed table map to `Role::Unknown`.
    ///
    pub fn from_login_id(login_id: &str) -> Self {
        ROLES_BY_LOGIN.get(login_id).copied().unwrap_or(Role::Unknown)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AtmOperationsStaff => "ATM Operations Staff",
            Self::BranchOperationsManager => "Branch Operations Manager",
            Self::VaultManager => "Vault Manager",
            Self::HeadOfficeAuthorizationOfficer => "Head Office Authorization Officer",
            Self::Unknown => "Unknown",
        }
    }

    pub fn can_create_refill_requests(&self) -> bool {
        matches!(self, Self::AtmOperationsStaff | Self::BranchOperationsManager)
    }

    pub fn can_approve_refill_requests(&self) -> bool {
        matches!(
            self,
            Self::BranchOperationsManager | Self::VaultManager | Self::HeadOfficeAuthorizationOfficer
        )
    }

    pub fn can_train_model(&self) -> bool {
        matches!(self, Self::VaultManager | Self::HeadOfficeAuthorizationOfficer)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = Error;

    /// Accepts either a login identifier (`vault_mgr`) or a display label (`Vault Manager`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(role) = ROLES_BY_LOGIN.get(s) {
            return Ok(*role);
        }
        [
            Self::AtmOperationsStaff,
            Self::BranchOperationsManager,
            Self::VaultManager,
            Self::HeadOfficeAuthorizationOfficer,
        ]
            .into_iter()
            .find(|role| role.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::CouldNotParseRole(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub username: String,
    pub role: Role,
    pub token: String,
}
