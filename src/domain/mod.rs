//! Domain types: roles, authorization context and status workflows

pub mod actor;
pub mod role;
pub mod status;

pub use actor::Actor;
pub use role::Role;
pub use status::{AssignmentStatus, BudgetStatus, IncidentStatus, PaymentStatus, Priority};
