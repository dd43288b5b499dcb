//! Incident reporting and lifecycle (`incidentes`)

use super::support;
use crate::domain::{Actor, IncidentStatus, Priority, Role};
use crate::infrastructure::database::entities::{
	assignment, incident, property, Assignment, Incident, IncidentActive, Property,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::{CoreError, CoreResult};
use chrono::Utc;
use sea_orm::{
	ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
	QueryOrder, QuerySelect,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewIncident {
	pub property_id: Uuid,
	pub titulo: String,
	pub descripcion: Option<String>,
	/// Nullable: the original UI allows reporting without a category
	pub categoria: Option<String>,
	pub prioridad: Priority,
}

pub struct IncidentService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl IncidentService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	/// Report a new incident on one of the caller's properties
	pub async fn report(&self, actor: &Actor, input: NewIncident) -> CoreResult<incident::Model> {
		if actor.role != Role::Cliente {
			return Err(CoreError::forbidden("only clients report incidents"));
		}
		if input.titulo.trim().is_empty() {
			return Err(CoreError::Validation("titulo must not be empty".into()));
		}

		let cliente = support::client_for_actor(self.db.conn(), actor).await?;
		let prop = Property::find()
			.filter(property::Column::Uuid.eq(input.property_id))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("inmueble", input.property_id))?;
		if prop.cliente_id != cliente.id {
			return Err(CoreError::forbidden("property belongs to another client"));
		}

		let now = Utc::now();
		let incidente = IncidentActive {
			uuid: Set(Uuid::new_v4()),
			inmueble_id: Set(prop.id),
			cliente_id: Set(cliente.id),
			titulo: Set(input.titulo),
			descripcion: Set(input.descripcion),
			categoria: Set(input.categoria),
			prioridad: Set(input.prioridad.to_string()),
			estado: Set(IncidentStatus::Pendiente.to_string()),
			created_at: Set(now),
			updated_at: Set(now),
			..Default::default()
		}
		.insert(self.db.conn())
		.await?;

		info!(incidente = %incidente.uuid, inmueble = %prop.uuid, "Incident reported");
		self.events.emit(Event::IncidentReported {
			incident_id: incidente.uuid,
			property_id: prop.uuid,
			client_id: cliente.uuid,
		});

		Ok(incidente)
	}

	pub async fn get(&self, actor: &Actor, incident_id: Uuid) -> CoreResult<incident::Model> {
		let incidente = support::incident_by_uuid(self.db.conn(), incident_id).await?;
		self.check_scope(actor, &incidente).await?;
		Ok(incidente)
	}

	/// Incidents visible to the caller, newest first
	pub async fn list(&self, actor: &Actor) -> CoreResult<Vec<incident::Model>> {
		let query = Incident::find().order_by_desc(incident::Column::CreatedAt);
		match actor.role {
			Role::Admin => Ok(query.all(self.db.conn()).await?),
			Role::Cliente => {
				let cliente = support::client_for_actor(self.db.conn(), actor).await?;
				Ok(query
					.filter(incident::Column::ClienteId.eq(cliente.id))
					.all(self.db.conn())
					.await?)
			}
			Role::Tecnico => {
				let tecnico = support::technician_for_actor(self.db.conn(), actor).await?;
				let incident_ids: Vec<i32> = Assignment::find()
					.filter(assignment::Column::TecnicoId.eq(tecnico.id))
					.select_only()
					.column(assignment::Column::IncidenteId)
					.into_tuple()
					.all(self.db.conn())
					.await?;
				Ok(query
					.filter(incident::Column::Id.is_in(incident_ids))
					.all(self.db.conn())
					.await?)
			}
		}
	}

	/// Set or clear the category
	pub async fn set_category(
		&self,
		actor: &Actor,
		incident_id: Uuid,
		categoria: Option<String>,
	) -> CoreResult<incident::Model> {
		let incidente = self.get(actor, incident_id).await?;
		if actor.role == Role::Tecnico {
			return Err(CoreError::forbidden("technicians cannot recategorize"));
		}

		let mut active: IncidentActive = incidente.into();
		active.categoria = Set(categoria);
		active.updated_at = Set(Utc::now());
		let updated = active.update(self.db.conn()).await?;

		self.events.emit(Event::IncidentCategorized {
			incident_id: updated.uuid,
			categoria: updated.categoria.clone(),
		});
		Ok(updated)
	}

	/// Move an incident through its workflow directly (admin only; the
	/// assignment service drives the usual path)
	pub async fn update_status(
		&self,
		actor: &Actor,
		incident_id: Uuid,
		to: IncidentStatus,
	) -> CoreResult<incident::Model> {
		if !actor.is_admin() {
			return Err(CoreError::forbidden("only admins move incidents directly"));
		}
		let incidente = support::incident_by_uuid(self.db.conn(), incident_id).await?;
		let (updated, from) = apply_transition(self.db.conn(), incidente, to).await?;

		self.events.emit(Event::IncidentStatusChanged {
			incident_id: updated.uuid,
			from,
			to,
		});
		Ok(updated)
	}

	/// Remove an incident and its workflow rows
	pub async fn delete(&self, actor: &Actor, incident_id: Uuid) -> CoreResult<()> {
		if !actor.is_admin() {
			return Err(CoreError::forbidden("only admins delete incidents"));
		}
		let incidente = support::incident_by_uuid(self.db.conn(), incident_id).await?;
		Incident::delete_by_id(incidente.id)
			.exec(self.db.conn())
			.await?;

		self.events.emit(Event::IncidentDeleted {
			incident_id: incidente.uuid,
		});
		Ok(())
	}

	async fn check_scope(&self, actor: &Actor, incidente: &incident::Model) -> CoreResult<()> {
		match actor.role {
			Role::Admin => Ok(()),
			Role::Cliente => {
				let cliente = support::client_for_actor(self.db.conn(), actor).await?;
				if incidente.cliente_id == cliente.id {
					Ok(())
				} else {
					Err(CoreError::forbidden("incident belongs to another client"))
				}
			}
			Role::Tecnico => {
				let tecnico = support::technician_for_actor(self.db.conn(), actor).await?;
				let assigned = Assignment::find()
					.filter(assignment::Column::IncidenteId.eq(incidente.id))
					.filter(assignment::Column::TecnicoId.eq(tecnico.id))
					.one(self.db.conn())
					.await?;
				if assigned.is_some() {
					Ok(())
				} else {
					Err(CoreError::forbidden("incident is not assigned to caller"))
				}
			}
		}
	}
}

/// Transition-checked status update, shared with the assignment and rating
/// services. Returns the updated row and the previous status.
pub(crate) async fn apply_transition<C: ConnectionTrait>(
	conn: &C,
	incidente: incident::Model,
	to: IncidentStatus,
) -> CoreResult<(incident::Model, IncidentStatus)> {
	let from: IncidentStatus = support::parse_status(&incidente.estado)?;
	if !from.can_transition(to) {
		return Err(CoreError::InvalidTransition {
			from: from.to_string(),
			to: to.to_string(),
		});
	}

	let mut active: IncidentActive = incidente.into();
	active.estado = Set(to.to_string());
	active.updated_at = Set(Utc::now());
	let updated = active.update(conn).await?;
	Ok((updated, from))
}
