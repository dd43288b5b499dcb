//! Pending-assignment badge counts
//!
//! Subscribes to the event bus and, whenever an assignment for a technician
//! changes, re-runs the pending count query and caches the result. This is
//! deliberately a recount-on-change scheme, matching the original
//! change-notification subscription: no ordering or incremental bookkeeping,
//! the last recount wins.

use super::BackgroundService;
use crate::domain::AssignmentStatus;
use crate::infrastructure::database::entities::{assignment, technician, Assignment, Technician};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::CoreResult;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct NotificationService {
	db: Arc<Database>,
	events: Arc<EventBus>,
	/// technician uuid -> pending assignment count
	badges: Arc<RwLock<HashMap<Uuid, u64>>>,
	task: Mutex<Option<(watch::Sender<bool>, JoinHandle<()>)>>,
}

impl NotificationService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self {
			db,
			events,
			badges: Arc::new(RwLock::new(HashMap::new())),
			task: Mutex::new(None),
		}
	}

	/// Cached pending-assignment count for a technician. Zero until the
	/// first relevant event or an explicit `refresh`.
	pub async fn pending_badge(&self, technician_id: Uuid) -> u64 {
		self.badges
			.read()
			.await
			.get(&technician_id)
			.copied()
			.unwrap_or(0)
	}

	/// Recount immediately, e.g. when a technician's session starts
	pub async fn refresh(&self, technician_id: Uuid) -> CoreResult<u64> {
		let count = recount(&self.db, technician_id).await?;
		self.badges.write().await.insert(technician_id, count);
		Ok(count)
	}
}

#[async_trait::async_trait]
impl BackgroundService for NotificationService {
	async fn start(&self) -> CoreResult<()> {
		let mut guard = self.task.lock().await;
		if guard.is_some() {
			return Ok(());
		}

		let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
		let mut rx = self.events.subscribe();
		let db = self.db.clone();
		let badges = self.badges.clone();

		let handle = tokio::spawn(async move {
			loop {
				tokio::select! {
					_ = shutdown_rx.changed() => break,
					event = rx.recv() => match event {
						Ok(event) => {
							if let Some(technician_id) = affected_technician(&event) {
								match recount(&db, technician_id).await {
									Ok(count) => {
										debug!(%technician_id, count, "Badge recounted");
										badges.write().await.insert(technician_id, count);
									}
									Err(e) => warn!("Badge recount failed: {e}"),
								}
							}
						}
						// Missed events are fine: the next one triggers a
						// full recount anyway
						Err(RecvError::Lagged(skipped)) => {
							warn!(skipped, "Notification stream lagged");
						}
						Err(RecvError::Closed) => break,
					},
				}
			}
		});

		*guard = Some((shutdown_tx, handle));
		info!("Notification service started");
		Ok(())
	}

	async fn stop(&self) -> CoreResult<()> {
		if let Some((shutdown_tx, handle)) = self.task.lock().await.take() {
			let _ = shutdown_tx.send(true);
			let _ = handle.await;
			info!("Notification service stopped");
		}
		Ok(())
	}
}

fn affected_technician(event: &Event) -> Option<Uuid> {
	match event {
		Event::AssignmentCreated { technician_id, .. }
		| Event::AssignmentStatusChanged { technician_id, .. } => Some(*technician_id),
		_ => None,
	}
}

async fn recount(db: &Database, technician_id: Uuid) -> CoreResult<u64> {
	let Some(tecnico) = Technician::find()
		.filter(technician::Column::Uuid.eq(technician_id))
		.one(db.conn())
		.await?
	else {
		return Ok(0);
	};

	Ok(Assignment::find()
		.filter(assignment::Column::TecnicoId.eq(tecnico.id))
		.filter(assignment::Column::Estado.eq(AssignmentStatus::Pendiente.to_string()))
		.count(db.conn())
		.await?)
}
