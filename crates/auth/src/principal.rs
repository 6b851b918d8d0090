use serde::{Deserialize, Serialize};

use stockroom_core::UserId;

use crate::Role;

/// Identity of an authenticated user acting on the inventory.
///
/// The ledger trusts whatever actor it is handed; constructing one is the job of
/// the authentication layer. `username` is what gets stamped onto movements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl core::fmt::Display for Actor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}#{}", self.username, self.id)
    }
}
