//! Event bus for decoupled communication
//!
//! Services emit an event after every committed mutation; the notification
//! service (and anything else that subscribes) reacts by re-querying, which
//! mirrors the change-notification stream of the original deployment.

use crate::domain::{AssignmentStatus, BudgetStatus, IncidentStatus, Role};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Portal events
#[derive(Debug, Clone)]
pub enum Event {
    /// Core has started
    CoreStarted,

    /// Core is shutting down
    CoreShutdown,

    /// An account was provisioned
    UserProvisioned { user_id: Uuid, role: Role },

    /// An account was activated or deactivated
    UserActiveChanged { user_id: Uuid, activo: bool },

    /// An account was deleted
    UserDeleted { user_id: Uuid },

    /// A client registered a property
    PropertyRegistered { property_id: Uuid, client_id: Uuid },

    /// A property's details changed
    PropertyUpdated { property_id: Uuid },

    /// A property was removed (its incidents cascade)
    PropertyDeleted { property_id: Uuid },

    /// A client reported a new incident
    IncidentReported {
        incident_id: Uuid,
        property_id: Uuid,
        client_id: Uuid,
    },

    /// An incident's category was set or cleared
    IncidentCategorized {
        incident_id: Uuid,
        categoria: Option<String>,
    },

    /// An incident moved through its workflow
    IncidentStatusChanged {
        incident_id: Uuid,
        from: IncidentStatus,
        to: IncidentStatus,
    },

    /// An admin removed an incident and its workflow rows
    IncidentDeleted { incident_id: Uuid },

    /// An admin assigned a technician to an incident
    AssignmentCreated {
        assignment_id: Uuid,
        incident_id: Uuid,
        technician_id: Uuid,
    },

    /// An assignment moved through its workflow
    AssignmentStatusChanged {
        assignment_id: Uuid,
        technician_id: Uuid,
        from: AssignmentStatus,
        to: AssignmentStatus,
    },

    /// A technician submitted a budget
    BudgetSubmitted {
        budget_id: Uuid,
        incident_id: Uuid,
        technician_id: Uuid,
        monto: f64,
    },

    /// An admin or a client decided on a budget
    BudgetDecided {
        budget_id: Uuid,
        decided_by: Role,
        to: BudgetStatus,
    },

    /// A payment was recorded or settled
    PaymentRecorded { payment_id: Uuid, budget_id: Uuid },

    /// An inspection was scheduled
    InspectionScheduled {
        inspection_id: Uuid,
        incident_id: Uuid,
        technician_id: Uuid,
    },

    /// A technician recorded an inspection's outcome
    InspectionCompleted {
        inspection_id: Uuid,
        incident_id: Uuid,
    },

    /// A client rated a resolved incident
    RatingSubmitted {
        rating_id: Uuid,
        incident_id: Uuid,
        technician_id: Uuid,
        puntuacion: i16,
    },
}

/// Event bus for broadcasting events
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus with specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event
    pub fn emit(&self, event: Event) {
        // Ignore send errors (no receivers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
