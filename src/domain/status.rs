//! Status enums and their transition tables
//!
//! The string forms are stored in the `estado` columns and are part of the
//! wire contract. Transitions not listed here are rejected by the services
//! with `CoreError::InvalidTransition`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// `asignaciones_tecnico.estado`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AssignmentStatus {
    Pendiente,
    Aceptada,
    Rechazada,
    EnCurso,
    Completada,
}

impl AssignmentStatus {
    pub fn can_transition(self, to: AssignmentStatus) -> bool {
        use AssignmentStatus::*;
        matches!(
            (self, to),
            (Pendiente, Aceptada) | (Pendiente, Rechazada) | (Aceptada, EnCurso) | (EnCurso, Completada)
        )
    }

    /// No further transitions allowed
    pub fn is_terminal(self) -> bool {
        matches!(self, AssignmentStatus::Rechazada | AssignmentStatus::Completada)
    }
}

/// `incidentes.estado`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentStatus {
    Pendiente,
    Asignada,
    EnProceso,
    Resuelta,
    Cerrada,
}

impl IncidentStatus {
    pub fn can_transition(self, to: IncidentStatus) -> bool {
        use IncidentStatus::*;
        matches!(
            (self, to),
            (Pendiente, Asignada)
                // assignment rejected, incident goes back to the pool
                | (Asignada, Pendiente)
                | (Asignada, EnProceso)
                | (EnProceso, Resuelta)
                | (Resuelta, Cerrada)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, IncidentStatus::Cerrada)
    }
}

/// `presupuestos.estado`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BudgetStatus {
    Pendiente,
    AprobadoAdmin,
    AprobadoCliente,
    Rechazado,
}

impl BudgetStatus {
    pub fn can_transition(self, to: BudgetStatus) -> bool {
        use BudgetStatus::*;
        matches!(
            (self, to),
            (Pendiente, AprobadoAdmin)
                | (Pendiente, Rechazado)
                | (AprobadoAdmin, AprobadoCliente)
                | (AprobadoAdmin, Rechazado)
        )
    }
}

/// `pagos.estado`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    Pendiente,
    Pagado,
}

/// `incidentes.prioridad`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Priority {
    Baja,
    Media,
    Alta,
    Urgente,
}
