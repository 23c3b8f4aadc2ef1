//! Caller capabilities. Every engine call receives the caller explicitly; there
//! is no ambient session state.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use models::user::Role;

use crate::errors::ServiceError;

/// Authenticated identity plus role tag, as resolved from a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owner-or-admin rule used for every mutation of an existing row.
    pub fn can_manage(&self, owner_id: Uuid) -> bool {
        self.is_admin() || self.id == owner_id
    }

    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::forbidden("admin role required"))
        }
    }
}

/// Reading inactive rows is reserved for admins.
pub fn require_admin_for_inactive(caller: Option<&Caller>, include_inactive: bool) -> Result<(), ServiceError> {
    if !include_inactive {
        return Ok(());
    }
    match caller {
        Some(c) if c.is_admin() => Ok(()),
        _ => Err(ServiceError::forbidden("include_inactive requires the admin role")),
    }
}

/// Which roles may create a listing of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGate {
    AnyAuthenticated,
    Only(&'static [Role]),
}

impl RoleGate {
    pub fn admits(&self, role: Role) -> bool {
        match self {
            RoleGate::AnyAuthenticated => true,
            RoleGate::Only(roles) => roles.contains(&role),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_or_admin_can_manage() {
        let owner = Uuid::new_v4();
        assert!(Caller::new(owner, Role::User).can_manage(owner));
        assert!(Caller::new(Uuid::new_v4(), Role::Admin).can_manage(owner));
        assert!(!Caller::new(Uuid::new_v4(), Role::BusinessOwner).can_manage(owner));
    }

    #[test]
    fn gate_admits_listed_roles_only() {
        let gate = RoleGate::Only(&[Role::EventOrganizer, Role::Admin]);
        assert!(gate.admits(Role::EventOrganizer));
        assert!(gate.admits(Role::Admin));
        assert!(!gate.admits(Role::Professional));
        assert!(RoleGate::AnyAuthenticated.admits(Role::User));
    }

    #[test]
    fn inactive_reads_need_admin() {
        let user = Caller::new(Uuid::new_v4(), Role::User);
        let admin = Caller::new(Uuid::new_v4(), Role::Admin);
        assert!(require_admin_for_inactive(None, false).is_ok());
        assert!(require_admin_for_inactive(None, true).is_err());
        assert!(require_admin_for_inactive(Some(&user), true).is_err());
        assert!(require_admin_for_inactive(Some(&admin), true).is_ok());
    }
}
