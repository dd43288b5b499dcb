//! Service ratings (`calificaciones`)
//!
//! One rating per incident, submitted by the owning client once the work
//! is resolved. Rating a resolved incident closes it.

use super::{incidents, support};
use crate::domain::{Actor, AssignmentStatus, IncidentStatus, Role};
use crate::infrastructure::database::entities::{
	assignment, rating, technician, Assignment, Rating, RatingActive, Technician,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::{CoreError, CoreResult};
use chrono::Utc;
use sea_orm::{
	ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
	TransactionTrait,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct RatingService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl RatingService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	/// Rate the technician who completed the incident's repair
	pub async fn rate(
		&self,
		actor: &Actor,
		incident_id: Uuid,
		puntuacion: i16,
		comentario: Option<String>,
	) -> CoreResult<rating::Model> {
		if actor.role != Role::Cliente {
			return Err(CoreError::forbidden("only clients rate incidents"));
		}
		if !(1..=5).contains(&puntuacion) {
			return Err(CoreError::Validation(
				"puntuacion must be between 1 and 5".into(),
			));
		}

		let cliente = support::client_for_actor(self.db.conn(), actor).await?;
		let incidente = support::incident_by_uuid(self.db.conn(), incident_id).await?;
		if incidente.cliente_id != cliente.id {
			return Err(CoreError::forbidden("incident belongs to another client"));
		}

		let estado: IncidentStatus = support::parse_status(&incidente.estado)?;
		if !matches!(estado, IncidentStatus::Resuelta | IncidentStatus::Cerrada) {
			return Err(CoreError::Validation(
				"incident is not resolved yet".into(),
			));
		}

		let existing = Rating::find()
			.filter(rating::Column::IncidenteId.eq(incidente.id))
			.one(self.db.conn())
			.await?;
		if existing.is_some() {
			return Err(CoreError::Validation("incident is already rated".into()));
		}

		// The rated technician is the one whose assignment completed
		let completed = Assignment::find()
			.filter(assignment::Column::IncidenteId.eq(incidente.id))
			.filter(assignment::Column::Estado.eq(AssignmentStatus::Completada.to_string()))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| {
				CoreError::Validation("incident has no completed assignment".into())
			})?;

		let tecnico = Technician::find()
			.filter(technician::Column::Id.eq(completed.tecnico_id))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("tecnico", incident_id))?;

		// Rating and close land together or not at all
		let txn = self.db.conn().begin().await?;

		let calificacion = RatingActive {
			uuid: Set(Uuid::new_v4()),
			incidente_id: Set(incidente.id),
			cliente_id: Set(cliente.id),
			tecnico_id: Set(completed.tecnico_id),
			puntuacion: Set(puntuacion),
			comentario: Set(comentario),
			created_at: Set(Utc::now()),
			..Default::default()
		}
		.insert(&txn)
		.await?;

		// A rated incident is done
		let closed = if estado == IncidentStatus::Resuelta {
			let (closed, from) =
				incidents::apply_transition(&txn, incidente, IncidentStatus::Cerrada).await?;
			Some((closed.uuid, from))
		} else {
			None
		};

		txn.commit().await?;

		if let Some((incident_uuid, from)) = closed {
			self.events.emit(Event::IncidentStatusChanged {
				incident_id: incident_uuid,
				from,
				to: IncidentStatus::Cerrada,
			});
		}

		info!(calificacion = %calificacion.uuid, puntuacion, "Rating submitted");
		self.events.emit(Event::RatingSubmitted {
			rating_id: calificacion.uuid,
			incident_id,
			technician_id: tecnico.uuid,
			puntuacion,
		});

		Ok(calificacion)
	}

	/// Ratings received by a technician, newest first
	pub async fn list_for_technician(
		&self,
		technician_id: Uuid,
	) -> CoreResult<Vec<rating::Model>> {
		let tecnico = support::technician_by_uuid(self.db.conn(), technician_id).await?;
		Ok(Rating::find()
			.filter(rating::Column::TecnicoId.eq(tecnico.id))
			.order_by_desc(rating::Column::CreatedAt)
			.all(self.db.conn())
			.await?)
	}

	/// Mean puntuacion, `None` when the technician has no ratings yet
	pub async fn average_for_technician(&self, technician_id: Uuid) -> CoreResult<Option<f64>> {
		let ratings = self.list_for_technician(technician_id).await?;
		if ratings.is_empty() {
			return Ok(None);
		}
		let sum: i64 = ratings.iter().map(|r| r.puntuacion as i64).sum();
		Ok(Some(sum as f64 / ratings.len() as f64))
	}
}
