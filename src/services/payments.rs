//! Payments against approved budgets (`pagos`)

use super::support;
use crate::domain::{Actor, BudgetStatus, PaymentStatus, Role};
use crate::infrastructure::database::entities::{
	budget, incident, payment, Budget, Incident, Payment, PaymentActive,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::{CoreError, CoreResult};
use chrono::Utc;
use sea_orm::{
	ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct PaymentService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl PaymentService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	/// Record a payment for a client-approved budget (admin)
	pub async fn record(
		&self,
		actor: &Actor,
		budget_id: Uuid,
		monto: f64,
		metodo: String,
	) -> CoreResult<payment::Model> {
		if !actor.is_admin() {
			return Err(CoreError::forbidden("only admins record payments"));
		}
		if monto <= 0.0 {
			return Err(CoreError::Validation("monto must be positive".into()));
		}

		let presupuesto = self.budget_by_uuid(budget_id).await?;
		let estado: BudgetStatus = support::parse_status(&presupuesto.estado)?;
		if estado != BudgetStatus::AprobadoCliente {
			return Err(CoreError::Validation(
				"budget is not approved by the client".into(),
			));
		}

		let pago = PaymentActive {
			uuid: Set(Uuid::new_v4()),
			presupuesto_id: Set(presupuesto.id),
			monto: Set(monto),
			metodo: Set(metodo),
			estado: Set(PaymentStatus::Pendiente.to_string()),
			fecha_pago: Set(None),
			created_at: Set(Utc::now()),
			..Default::default()
		}
		.insert(self.db.conn())
		.await?;

		info!(pago = %pago.uuid, presupuesto = %presupuesto.uuid, monto, "Payment recorded");
		self.events.emit(Event::PaymentRecorded {
			payment_id: pago.uuid,
			budget_id: presupuesto.uuid,
		});

		Ok(pago)
	}

	/// Settle a pending payment (admin)
	pub async fn mark_paid(&self, actor: &Actor, payment_id: Uuid) -> CoreResult<payment::Model> {
		if !actor.is_admin() {
			return Err(CoreError::forbidden("only admins settle payments"));
		}

		let pago = Payment::find()
			.filter(payment::Column::Uuid.eq(payment_id))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("pago", payment_id))?;

		let estado: PaymentStatus = support::parse_status(&pago.estado)?;
		if estado != PaymentStatus::Pendiente {
			return Err(CoreError::InvalidTransition {
				from: estado.to_string(),
				to: PaymentStatus::Pagado.to_string(),
			});
		}

		let presupuesto_id = pago.presupuesto_id;
		let mut active: PaymentActive = pago.into();
		active.estado = Set(PaymentStatus::Pagado.to_string());
		active.fecha_pago = Set(Some(Utc::now()));
		let updated = active.update(self.db.conn()).await?;

		let presupuesto = Budget::find()
			.filter(budget::Column::Id.eq(presupuesto_id))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("presupuesto", payment_id))?;

		self.events.emit(Event::PaymentRecorded {
			payment_id: updated.uuid,
			budget_id: presupuesto.uuid,
		});

		Ok(updated)
	}

	/// Payments on a budget the caller may see, newest first
	pub async fn list_for_budget(
		&self,
		actor: &Actor,
		budget_id: Uuid,
	) -> CoreResult<Vec<payment::Model>> {
		let presupuesto = self.budget_by_uuid(budget_id).await?;
		self.check_scope(actor, &presupuesto).await?;

		Ok(Payment::find()
			.filter(payment::Column::PresupuestoId.eq(presupuesto.id))
			.order_by_desc(payment::Column::CreatedAt)
			.all(self.db.conn())
			.await?)
	}

	async fn budget_by_uuid(&self, budget_id: Uuid) -> CoreResult<budget::Model> {
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
