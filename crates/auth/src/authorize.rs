use thiserror::Error;

use crate::Actor;

/// Operations subject to the admin/non-admin policy.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    RecordMovement,
    ManageCatalog,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::RecordMovement => "inventory.movement.record",
            Action::ManageCatalog => "inventory.catalog.manage",
        }
    }

    /// Whether only administrators may perform this action.
    pub fn requires_admin(&self) -> bool {
        matches!(self, Action::ManageCatalog)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: '{action}' requires an administrator (actor: {username})")]
    Forbidden {
        action: &'static str,
        username: String,
    },
}

/// Authorize an actor for an action.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(actor: &Actor, action: Action) -> Result<(), AuthzError> {
    if action.requires_admin() && !actor.is_admin() {
        tracing::warn!(
            actor = %actor,
            action = action.as_str(),
            "authorization denied"
        );
        return Err(AuthzError::Forbidden {
            action: action.as_str(),
            username: actor.username.clone(),
        });
    }
    Ok(())
}
