//! HabitaFix Core
//!
//! Role-based property-incident management: clients report incidents on
//! their properties, technicians accept assignments and quote repairs,
//! admins approve budgets and record payments. This crate is the whole
//! backend: an embedded SQLite database behind SeaORM, per-role scoped
//! feature services, an event bus feeding realtime badge counts, and a
//! small administrative HTTP API.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
pub mod shared;

use crate::config::AppConfig;
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::services::Services;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub use domain::{Actor, AssignmentStatus, BudgetStatus, IncidentStatus, PaymentStatus, Priority, Role};
pub use shared::{CoreError, CoreResult};

/// The main context for all portal operations
pub struct Core {
	/// Application configuration
	config: AppConfig,

	/// Database handle
	pub db: Arc<Database>,

	/// Event bus
	pub events: Arc<EventBus>,

	/// Feature services
	pub services: Arc<Services>,
}

impl Core {
	/// Initialize the core in the given data directory: load (or create)
	/// the config, open and migrate the database, start background
	/// services.
	pub async fn new(data_dir: PathBuf) -> Result<Self> {
		let config = AppConfig::load_from(&data_dir)?;

		let db = Arc::new(Database::open(&config.database_path()).await?);
		db.migrate().await?;

		let events = Arc::new(EventBus::new(config.event_bus_capacity));
		let services = Arc::new(Services::new(db.clone(), events.clone()));
		services.start_all().await?;

		events.emit(Event::CoreStarted);
		info!("Core started in {:?}", config.data_dir);

		Ok(Self {
			config,
			db,
			events,
			services,
		})
	}

	/// The administrative HTTP router
	pub fn router(&self) -> axum::Router {
		infrastructure::api::router(self.services.clone(), self.config.admin_api_key.clone())
	}

	pub fn config(&self) -> &AppConfig {
		&self.config
	}

	/// Stop background services and announce shutdown
	pub async fn shutdown(&self) -> Result<()> {
		self.events.emit(Event::CoreShutdown);
		self.services.stop_all().await?;
		info!("Core shut down");
		Ok(())
	}
}
