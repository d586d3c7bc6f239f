//! The actor recorded on audit fields.
//!
//! Background jobs and the ledger core itself run as an explicit, named
//! service principal instead of borrowing an arbitrary user row.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The fixed UUID of the system service principal.
///
/// Seeded by the `seeder` binary and referenced by `created_by` columns
/// whenever a mutation is not attributable to a human user.
pub const SYSTEM_PRINCIPAL_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

/// An actor performing a mutation, for audit columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Principal {
    /// The named system/service principal.
    System,
    /// An external caller identified upstream (auth is out of scope here).
    User(Uuid),
}

impl Principal {
    /// Returns the UUID recorded in audit columns.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        match self {
            Self::System => SYSTEM_PRINCIPAL_ID,
            Self::User(id) => *id,
        }
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::System
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_principal_is_stable() {
        assert_eq!(Principal::System.id(), SYSTEM_PRINCIPAL_ID);
        assert_eq!(Principal::default().id(), SYSTEM_PRINCIPAL_ID);
    }

    #[test]
    fn test_user_principal_keeps_id() {
        let id = Uuid::new_v4();
        assert_eq!(Principal::User(id).id(), id);
    }
}
