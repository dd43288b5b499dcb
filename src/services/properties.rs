//! Property management (`inmuebles`)

use super::support;
use crate::domain::{Actor, Role};
use crate::infrastructure::database::entities::{property, Property, PropertyActive};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::{CoreError, CoreResult};
use chrono::Utc;
use sea_orm::{
	ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewProperty {
	pub direccion: String,
	pub tipo: Option<String>,
	pub descripcion: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyUpdate {
	pub direccion: Option<String>,
	pub tipo: Option<Option<String>>,
	pub descripcion: Option<Option<String>>,
}

pub struct PropertyService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl PropertyService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	/// Register a property for the calling client
	pub async fn create(&self, actor: &Actor, input: NewProperty) -> CoreResult<property::Model> {
		if actor.role != Role::Cliente {
			return Err(CoreError::forbidden("only clients register properties"));
		}
		if input.direccion.trim().is_empty() {
			return Err(CoreError::Validation("direccion must not be empty".into()));
		}

		let cliente = support::client_for_actor(self.db.conn(), actor).await?;

		let prop = PropertyActive {
			uuid: Set(Uuid::new_v4()),
			cliente_id: Set(cliente.id),
			direccion: Set(input.direccion),
			tipo: Set(input.tipo),
			descripcion: Set(input.descripcion),
			created_at: Set(Utc::now()),
			..Default::default()
		}
		.insert(self.db.conn())
		.await?;

		self.events.emit(Event::PropertyRegistered {
			property_id: prop.uuid,
			client_id: cliente.uuid,
		});
		Ok(prop)
	}

	pub async fn get(&self, actor: &Actor, property_id: Uuid) -> CoreResult<property::Model> {
		let prop = Property::find()
			.filter(property::Column::Uuid.eq(property_id))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("inmueble", property_id))?;
		self.check_scope(actor, &prop).await?;
		Ok(prop)
	}

	/// Properties visible to the caller, newest first
	pub async fn list(&self, actor: &Actor) -> CoreResult<Vec<property::Model>> {
		let query = Property::find().order_by_desc(property::Column::CreatedAt);
		match actor.role {
			Role::Admin => Ok(query.all(self.db.conn()).await?),
			Role::Cliente => {
				let cliente = support::client_for_actor(self.db.conn(), actor).await?;
				Ok(query
					.filter(property::Column::ClienteId.eq(cliente.id))
					.all(self.db.conn())
					.await?)
			}
			Role::Tecnico => Err(CoreError::forbidden("technicians do not manage properties")),
		}
	}

	pub async fn update(
		&self,
		actor: &Actor,
		property_id: Uuid,
		changes: PropertyUpdate,
	) -> CoreResult<property::Model> {
		let prop = self.get(actor, property_id).await?;

		let mut active: PropertyActive = prop.into();
		if let Some(direccion) = changes.direccion {
			if direccion.trim().is_empty() {
				return Err(CoreError::Validation("direccion must not be empty".into()));
			}
			active.direccion = Set(direccion);
		}
		if let Some(tipo) = changes.tipo {
			active.tipo = Set(tipo);
		}
		if let Some(descripcion) = changes.descripcion {
			active.descripcion = Set(descripcion);
		}
		let updated = active.update(self.db.conn()).await?;

		self.events.emit(Event::PropertyUpdated {
			property_id: updated.uuid,
		});
		Ok(updated)
	}

	/// Delete a property; its incidents cascade
	pub async fn delete(&self, actor: &Actor, property_id: Uuid) -> CoreResult<()> {
		let prop = self.get(actor, property_id).await?;
		Property::delete_by_id(prop.id).exec(self.db.conn()).await?;

		self.events.emit(Event::PropertyDeleted {
			property_id: prop.uuid,
		});
		Ok(())
	}

	async fn check_scope(&self, actor: &Actor, prop: &property::Model) -> CoreResult<()> {
		match actor.role {
			Role::Admin => Ok(()),
			Role::Cliente => {
				let cliente = support::client_for_actor(self.db.conn(), actor).await?;
				if prop.cliente_id == cliente.id {
					Ok(())
				} else {
					Err(CoreError::forbidden("property belongs to another client"))
				}
			}
			Role::Tecnico => Err(CoreError::forbidden("technicians do not manage properties")),
		}
	}
}
