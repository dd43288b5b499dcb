//! Technician assignments (`asignaciones_tecnico`)
//!
//! The assignment workflow drives the incident workflow: acceptance leaves
//! the incident at `asignada`, starting work moves it to `en_proceso`,
//! completion to `resuelta`, rejection back to `pendiente`. Both rows are
//! updated in one transaction; events go out only after commit.

use super::{incidents, support};
use crate::domain::{Actor, AssignmentStatus, IncidentStatus};
use crate::infrastructure::database::entities::{
	assignment, incident, Assignment, AssignmentActive, Incident,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::{CoreError, CoreResult};
use chrono::Utc;
use sea_orm::{
	ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
	QueryOrder, TransactionTrait,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct AssignmentService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl AssignmentService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	/// Assign a technician to a pending incident (admin)
	pub async fn assign(
		&self,
		actor: &Actor,
		incident_id: Uuid,
		technician_id: Uuid,
		nota: Option<String>,
	) -> CoreResult<assignment::Model> {
		if !actor.is_admin() {
			return Err(CoreError::forbidden("only admins assign technicians"));
		}

		let incidente = support::incident_by_uuid(self.db.conn(), incident_id).await?;
		let tecnico = support::technician_by_uuid(self.db.conn(), technician_id).await?;

		if !tecnico.disponible {
			return Err(CoreError::Validation(format!(
				"technician {} is not available",
				tecnico.uuid
			)));
		}

		// One live assignment per incident
		let open = Assignment::find()
			.filter(assignment::Column::IncidenteId.eq(incidente.id))
			.filter(assignment::Column::Estado.is_in([
				AssignmentStatus::Pendiente.to_string(),
				AssignmentStatus::Aceptada.to_string(),
				AssignmentStatus::EnCurso.to_string(),
			]))
			.count(self.db.conn())
			.await?;
		if open > 0 {
			return Err(CoreError::Validation(
				"incident already has an active assignment".into(),
			));
		}

		let txn = self.db.conn().begin().await?;

		let asignacion = AssignmentActive {
			uuid: Set(Uuid::new_v4()),
			incidente_id: Set(incidente.id),
			tecnico_id: Set(tecnico.id),
			estado: Set(AssignmentStatus::Pendiente.to_string()),
			fecha_asignacion: Set(Utc::now()),
			fecha_respuesta: Set(None),
			nota: Set(nota),
			..Default::default()
		}
		.insert(&txn)
		.await?;

		let (updated, from) =
			incidents::apply_transition(&txn, incidente, IncidentStatus::Asignada).await?;

		txn.commit().await?;

		info!(asignacion = %asignacion.uuid, tecnico = %tecnico.uuid, "Technician assigned");
		self.events.emit(Event::AssignmentCreated {
			assignment_id: asignacion.uuid,
			incident_id: updated.uuid,
			technician_id: tecnico.uuid,
		});
		self.events.emit(Event::IncidentStatusChanged {
			incident_id: updated.uuid,
			from,
			to: IncidentStatus::Asignada,
		});

		Ok(asignacion)
	}

	/// Accept or reject a pending assignment (assigned technician).
	/// Rejection returns the incident to the pool.
	pub async fn respond(
		&self,
		actor: &Actor,
		assignment_id: Uuid,
		accept: bool,
		nota: Option<String>,
	) -> CoreResult<assignment::Model> {
		if accept {
			self.transition(actor, assignment_id, AssignmentStatus::Aceptada, true, nota, None)
				.await
		} else {
			self.transition(
				actor,
				assignment_id,
				AssignmentStatus::Rechazada,
				true,
				nota,
				Some(IncidentStatus::Pendiente),
			)
			.await
		}
	}

	/// Begin work on an accepted assignment (assigned technician)
	pub async fn start(&self, actor: &Actor, assignment_id: Uuid) -> CoreResult<assignment::Model> {
		self.transition(
			actor,
			assignment_id,
			AssignmentStatus::EnCurso,
			false,
			None,
			Some(IncidentStatus::EnProceso),
		)
		.await
	}

	/// Finish work, resolving the incident (assigned technician)
	pub async fn complete(
		&self,
		actor: &Actor,
		assignment_id: Uuid,
		nota: Option<String>,
	) -> CoreResult<assignment::Model> {
		self.transition(
			actor,
			assignment_id,
			AssignmentStatus::Completada,
			false,
			nota,
			Some(IncidentStatus::Resuelta),
		)
		.await
	}

	pub async fn get(&self, actor: &Actor, assignment_id: Uuid) -> CoreResult<assignment::Model> {
		let asignacion = support::assignment_by_uuid(self.db.conn(), assignment_id).await?;
		if !actor.is_admin() {
			let tecnico = support::technician_for_actor(self.db.conn(), actor).await?;
			if asignacion.tecnico_id != tecnico.id {
				return Err(CoreError::forbidden(
					"assignment belongs to another technician",
				));
			}
		}
		Ok(asignacion)
	}

	/// The caller's assignments, newest first (admins may pass any
	/// technician)
	pub async fn list_for_technician(
		&self,
		actor: &Actor,
		technician_id: Uuid,
	) -> CoreResult<Vec<assignment::Model>> {
		let tecnico = support::technician_by_uuid(self.db.conn(), technician_id).await?;
		if !actor.is_admin() {
			let own = support::technician_for_actor(self.db.conn(), actor).await?;
			if own.id != tecnico.id {
				return Err(CoreError::forbidden(
					"cannot list another technician's assignments",
				));
			}
		}
		Ok(Assignment::find()
			.filter(assignment::Column::TecnicoId.eq(tecnico.id))
			.order_by_desc(assignment::Column::FechaAsignacion)
			.all(self.db.conn())
			.await?)
	}

	/// Number of assignments awaiting the technician's response. This is
	/// the query behind the pending badge.
	pub async fn pending_count(&self, technician_id: Uuid) -> CoreResult<u64> {
		let tecnico = support::technician_by_uuid(self.db.conn(), technician_id).await?;
		Ok(Assignment::find()
			.filter(assignment::Column::TecnicoId.eq(tecnico.id))
			.filter(assignment::Column::Estado.eq(AssignmentStatus::Pendiente.to_string()))
			.count(self.db.conn())
			.await?)
	}

	/// Move an assignment and, when the workflow couples them, its incident
	/// in a single transaction. Nothing is durable and no event is emitted
	/// unless both transitions succeed.
	async fn transition(
		&self,
		actor: &Actor,
		assignment_id: Uuid,
		to: AssignmentStatus,
		record_response: bool,
		nota: Option<String>,
		incident_to: Option<IncidentStatus>,
	) -> CoreResult<assignment::Model> {
		let asignacion = support::assignment_by_uuid(self.db.conn(), assignment_id).await?;

		let tecnico = support::technician_for_actor(self.db.conn(), actor).await?;
		if asignacion.tecnico_id != tecnico.id {
			return Err(CoreError::forbidden(
				"assignment belongs to another technician",
			));
		}

		let from: AssignmentStatus = support::parse_status(&asignacion.estado)?;
		if !from.can_transition(to) {
			return Err(CoreError::InvalidTransition {
				from: from.to_string(),
				to: to.to_string(),
			});
		}

		let incidente_id = asignacion.incidente_id;
		let txn = self.db.conn().begin().await?;

		let mut active: AssignmentActive = asignacion.into();
		active.estado = Set(to.to_string());
		if record_response {
			active.fecha_respuesta = Set(Some(Utc::now()));
		}
		if let Some(nota) = nota {
			active.nota = Set(Some(nota));
		}
		let updated = active.update(&txn).await?;

		let incident_change = match incident_to {
			Some(inc_to) => {
				let incidente = Incident::find()
					.filter(incident::Column::Id.eq(incidente_id))
					.one(&txn)
					.await?
					.ok_or_else(|| CoreError::not_found("incidente", updated.uuid))?;
				let (incidente, inc_from) =
					incidents::apply_transition(&txn, incidente, inc_to).await?;
				Some((incidente.uuid, inc_from, inc_to))
			}
			None => None,
		};

		txn.commit().await?;

		info!(asignacion = %updated.uuid, %from, %to, "Assignment status changed");
		self.events.emit(Event::AssignmentStatusChanged {
			assignment_id: updated.uuid,
			technician_id: tecnico.uuid,
			from,
			to,
		});
		if let Some((incident_uuid, inc_from, inc_to)) = incident_change {
			self.events.emit(Event::IncidentStatusChanged {
				incident_id: incident_uuid,
				from: inc_from,
				to: inc_to,
			});
		}

		Ok(updated)
	}
}
