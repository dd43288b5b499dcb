//! Authorization context passed to every service operation

use super::Role;
use uuid::Uuid;

/// The authenticated caller. Services scope every query and guard every
/// mutation against this, which is the application-level rendition of the
/// per-row access policies the original deployment expressed in the
/// database.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    /// `usuarios.uuid` of the caller
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
