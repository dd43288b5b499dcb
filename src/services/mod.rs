//! Feature services
//!
//! One service per feature module of the portal. Every service holds the
//! database and the event bus; every mutation re-checks the caller's scope
//! before touching rows and emits a typed event after the write.

use crate::infrastructure::database::Database;
use crate::infrastructure::events::EventBus;
use crate::shared::CoreResult;
use std::sync::Arc;
use tracing::info;

pub mod accounts;
pub mod assignments;
pub mod budgets;
pub mod incidents;
pub mod inspections;
pub mod notifications;
pub mod payments;
pub mod properties;
pub mod ratings;

pub(crate) mod support;

pub use accounts::AccountService;
pub use assignments::AssignmentService;
pub use budgets::BudgetService;
pub use incidents::IncidentService;
pub use inspections::InspectionService;
pub use notifications::NotificationService;
pub use payments::PaymentService;
pub use properties::PropertyService;
pub use ratings::RatingService;

/// Container for all feature services
pub struct Services {
	pub accounts: Arc<AccountService>,
	pub properties: Arc<PropertyService>,
	pub incidents: Arc<IncidentService>,
	pub assignments: Arc<AssignmentService>,
	pub budgets: Arc<BudgetService>,
	pub payments: Arc<PaymentService>,
	pub inspections: Arc<InspectionService>,
	pub ratings: Arc<RatingService>,
	pub notifications: Arc<NotificationService>,
}

impl Services {
	/// Create the service container
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		info!("Initializing feature services");

		Self {
			accounts: Arc::new(AccountService::new(db.clone(), events.clone())),
			properties: Arc::new(PropertyService::new(db.clone(), events.clone())),
			incidents: Arc::new(IncidentService::new(db.clone(), events.clone())),
			assignments: Arc::new(AssignmentService::new(db.clone(), events.clone())),
			budgets: Arc::new(BudgetService::new(db.clone(), events.clone())),
			payments: Arc::new(PaymentService::new(db.clone(), events.clone())),
			inspections: Arc::new(InspectionService::new(db.clone(), events.clone())),
			ratings: Arc::new(RatingService::new(db.clone(), events.clone())),
			notifications: Arc::new(NotificationService::new(db, events)),
		}
	}

	/// Start background services
	pub async fn start_all(&self) -> CoreResult<()> {
		info!("Starting background services");
		self.notifications.start().await?;
		Ok(())
	}

	/// Stop background services gracefully
	pub async fn stop_all(&self) -> CoreResult<()> {
		info!("Stopping background services");
		self.notifications.stop().await?;
		Ok(())
	}
}

/// Trait for background services
#[async_trait::async_trait]
pub trait BackgroundService {
	async fn start(&self) -> CoreResult<()>;
	async fn stop(&self) -> CoreResult<()>;
}
