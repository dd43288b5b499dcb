//! Repair budgets (`presupuestos`)
//!
//! A budget needs two approvals: the admin first, then the client who owns
//! the incident. Either reviewer may reject.

use super::support;
use crate::domain::{Actor, AssignmentStatus, BudgetStatus, Role};
use crate::infrastructure::database::entities::{
	budget, incident, Budget, BudgetActive, Incident,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::{CoreError, CoreResult};
use chrono::Utc;
use sea_orm::{
	ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
	QuerySelect,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct BudgetService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl BudgetService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	/// Submit a quote for an incident the caller is actively assigned to
	pub async fn submit(
		&self,
		actor: &Actor,
		incident_id: Uuid,
		descripcion: String,
		monto: f64,
	) -> CoreResult<budget::Model> {
		if monto <= 0.0 {
			return Err(CoreError::Validation("monto must be positive".into()));
		}
		if descripcion.trim().is_empty() {
			return Err(CoreError::Validation("descripcion must not be empty".into()));
		}

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

		let presupuesto = BudgetActive {
			uuid: Set(Uuid::new_v4()),
			incidente_id: Set(incidente.id),
			tecnico_id: Set(tecnico.id),
			descripcion: Set(descripcion),
			monto: Set(monto),
			estado: Set(BudgetStatus::Pendiente.to_string()),
			fecha_envio: Set(Utc::now()),
			fecha_decision: Set(None),
			..Default::default()
		}
		.insert(self.db.conn())
		.await?;

		info!(presupuesto = %presupuesto.uuid, monto, "Budget submitted");
		self.events.emit(Event::BudgetSubmitted {
			budget_id: presupuesto.uuid,
			incident_id: incidente.uuid,
			technician_id: tecnico.uuid,
			monto,
		});

		Ok(presupuesto)
	}

	/// First-stage review (admin)
	pub async fn admin_review(
		&self,
		actor: &Actor,
		budget_id: Uuid,
		approve: bool,
	) -> CoreResult<budget::Model> {
		if !actor.is_admin() {
			return Err(CoreError::forbidden("only admins review at this stage"));
		}
		let to = if approve {
			BudgetStatus::AprobadoAdmin
		} else {
			BudgetStatus::Rechazado
		};
		self.decide(budget_id, Role::Admin, to).await
	}

	/// Second-stage review (the client who owns the incident), only
	/// possible after admin approval
	pub async fn client_review(
		&self,
		actor: &Actor,
		budget_id: Uuid,
		approve: bool,
	) -> CoreResult<budget::Model> {
		if actor.role != Role::Cliente {
			return Err(CoreError::forbidden("only the client reviews at this stage"));
		}

		let presupuesto = self.by_uuid(budget_id).await?;
		let cliente = support::client_for_actor(self.db.conn(), actor).await?;
		let incidente = Incident::find()
			.filter(incident::Column::Id.eq(presupuesto.incidente_id))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("incidente", budget_id))?;
		if incidente.cliente_id != cliente.id {
			return Err(CoreError::forbidden("budget is for another client's incident"));
		}

		let to = if approve {
			BudgetStatus::AprobadoCliente
		} else {
			BudgetStatus::Rechazado
		};
		self.decide(budget_id, Role::Cliente, to).await
	}

	pub async fn get(&self, actor: &Actor, budget_id: Uuid) -> CoreResult<budget::Model> {
		let presupuesto = self.by_uuid(budget_id).await?;
		self.check_scope(actor, &presupuesto).await?;
		Ok(presupuesto)
	}

	/// Budgets visible to the caller, newest first
	pub async fn list(&self, actor: &Actor) -> CoreResult<Vec<budget::Model>> {
		let query = Budget::find().order_by_desc(budget::Column::FechaEnvio);
		match actor.role {
			Role::Admin => Ok(query.all(self.db.conn()).await?),
			Role::Tecnico => {
				let tecnico = support::technician_for_actor(self.db.conn(), actor).await?;
				Ok(query
					.filter(budget::Column::TecnicoId.eq(tecnico.id))
					.all(self.db.conn())
					.await?)
			}
			Role::Cliente => {
				let cliente = support::client_for_actor(self.db.conn(), actor).await?;
				let incident_ids: Vec<i32> = Incident::find()
					.filter(incident::Column::ClienteId.eq(cliente.id))
					.select_only()
					.column(incident::Column::Id)
					.into_tuple()
					.all(self.db.conn())
					.await?;
				Ok(query
					.filter(budget::Column::IncidenteId.is_in(incident_ids))
					.all(self.db.conn())
					.await?)
			}
		}
	}

	async fn decide(
		&self,
		budget_id: Uuid,
		decided_by: Role,
		to: BudgetStatus,
	) -> CoreResult<budget::Model> {
		let presupuesto = self.by_uuid(budget_id).await?;

		let from: BudgetStatus = support::parse_status(&presupuesto.estado)?;
		if !from.can_transition(to) {
			return Err(CoreError::InvalidTransition {
				from: from.to_string(),
				to: to.to_string(),
			});
		}

		let mut active: BudgetActive = presupuesto.into();
		active.estado = Set(to.to_string());
		active.fecha_decision = Set(Some(Utc::now()));
		let updated = active.update(self.db.conn()).await?;

		info!(presupuesto = %updated.uuid, %from, %to, %decided_by, "Budget decided");
		self.events.emit(Event::BudgetDecided {
			budget_id: updated.uuid,
			decided_by,
			to,
		});

		Ok(updated)
	}

	async fn by_uuid(&self, budget_id: Uuid) -> CoreResult<budget::Model> {
		Budget::find()
			.filter(budget::Column::Uuid.eq(budget_id))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("presupuesto", budget_id))
	}

	async fn check_scope(&self, actor: &Actor, presupuesto: &budget::Model) -> CoreResult<()> {
		match actor.role {
			Role::Admin => Ok(()),
			Role::Tecnico => {
				let tecnico = support::technician_for_actor(self.db.conn(), actor).await?;
				if presupuesto.tecnico_id == tecnico.id {
					Ok(())
				} else {
					Err(CoreError::forbidden("budget belongs to another technician"))
				}
			}
			Role::Cliente => {
				let cliente = support::client_for_actor(self.db.conn(), actor).await?;
				let incidente = Incident::find()
					.filter(incident::Column::Id.eq(presupuesto.incidente_id))
					.one(self.db.conn())
					.await?
					.ok_or_else(|| CoreError::not_found("incidente", presupuesto.uuid))?;
				if incidente.cliente_id == cliente.id {
					Ok(())
				} else {
					Err(CoreError::forbidden("budget is for another client's incident"))
				}
			}
		}
	}
}
