//! On-site inspections (`inspecciones`)

use super::support;
use crate::domain::{Actor, AssignmentStatus, Role};
use crate::infrastructure::database::entities::{
	incident, inspection, Incident, Inspection, InspectionActive,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use sea_orm::{
	ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct InspectionService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl InspectionService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	/// Schedule an inspection on an incident the caller is actively
	/// assigned to
	pub async fn schedule(
		&self,
		actor: &Actor,
		incident_id: Uuid,
		fecha_programada: DateTime<Utc>,
	) -> CoreResult<inspection::Model> {
		let tecnico = support::technician_for_actor(self.db.conn(), actor).await?;
		let incidente = support::incident_by_uuid(self.db.conn(), incident_id).await?;

		let active = support::has_assignment_in(
			self.db.conn(),
			incidente.id,
			tecnico.id,
			&[AssignmentStatus::Aceptada, AssignmentStatus::EnCurso],
		)
		.await?;
		if !active {
			return Err(CoreError::forbidden(
				"no active assignment on this incident",
			));
		}

		let inspeccion = InspectionActive {
			uuid: Set(Uuid::new_v4()),
			incidente_id: Set(incidente.id),
			tecnico_id: Set(tecnico.id),
			fecha_programada: Set(fecha_programada),
			fecha_realizada: Set(None),
			observaciones: Set(None),
			created_at: Set(Utc::now()),
			..Default::default()
		}
		.insert(self.db.conn())
		.await?;

		info!(inspeccion = %inspeccion.uuid, incidente = %incidente.uuid, "Inspection scheduled");
		self.events.emit(Event::InspectionScheduled {
			inspection_id: inspeccion.uuid,
			incident_id: incidente.uuid,
			technician_id: tecnico.uuid,
		});

		Ok(inspeccion)
	}

	/// Record the outcome of a scheduled inspection
	pub async fn complete(
		&self,
		actor: &Actor,
		inspection_id: Uuid,
		observaciones: Option<String>,
	) -> CoreResult<inspection::Model> {
		let inspeccion = Inspection::find()
			.filter(inspection::Column::Uuid.eq(inspection_id))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("inspeccion", inspection_id))?;

		let tecnico = support::technician_for_actor(self.db.conn(), actor).await?;
		if inspeccion.tecnico_id != tecnico.id {
			return Err(CoreError::forbidden(
				"inspection belongs to another technician",
			));
		}
		if inspeccion.fecha_realizada.is_some() {
			return Err(CoreError::Validation("inspection already completed".into()));
		}

		let incidente = Incident::find()
			.filter(incident::Column::Id.eq(inspeccion.incidente_id))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("incidente", inspection_id))?;

		let mut active: InspectionActive = inspeccion.into();
		active.fecha_realizada = Set(Some(Utc::now()));
		active.observaciones = Set(observaciones);
		let realizada = active.update(self.db.conn()).await?;

		info!(inspeccion = %realizada.uuid, "Inspection completed");
		self.events.emit(Event::InspectionCompleted {
			inspection_id: realizada.uuid,
			incident_id: incidente.uuid,
		});
		Ok(realizada)
	}

	/// Inspections on an incident the caller may see, soonest first
	pub async fn list_for_incident(
		&self,
		actor: &Actor,
		incident_id: Uuid,
	) -> CoreResult<Vec<inspection::Model>> {
		let incidente = support::incident_by_uuid(self.db.conn(), incident_id).await?;

		// Same visibility rule as the incident itself
		match actor.role {
			Role::Admin => {}
			Role::Cliente => {
				let cliente = support::client_for_actor(self.db.conn(), actor).await?;
				if incidente.cliente_id != cliente.id {
					return Err(CoreError::forbidden("incident belongs to another client"));
				}
			}
			Role::Tecnico => {
				let tecnico = support::technician_for_actor(self.db.conn(), actor).await?;
				let assigned = support::has_assignment_in(
					self.db.conn(),
					incidente.id,
					tecnico.id,
					&[
						AssignmentStatus::Pendiente,
						AssignmentStatus::Aceptada,
						AssignmentStatus::EnCurso,
						AssignmentStatus::Completada,
					],
				)
				.await?;
				if !assigned {
					return Err(CoreError::forbidden("incident is not assigned to caller"));
				}
			}
		}

		Ok(Inspection::find()
			.filter(inspection::Column::IncidenteId.eq(incidente.id))
			.order_by_asc(inspection::Column::FechaProgramada)
			.all(self.db.conn())
			.await?)
	}
}
