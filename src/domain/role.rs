//! User roles

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Portal roles. The string forms are the wire contract (the `rol` column
/// of `usuarios` and the role field of the admin API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    /// Approves budgets, records payments, provisions accounts
    Admin,
    /// Owns properties and reports incidents
    Cliente,
    /// Accepts assignments, quotes repairs, runs inspections
    Tecnico,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}
