//! Account provisioning and authentication
//!
//! Provisioning is edge-authenticated: it is only reachable through the
//! administrative HTTP API (bearer key) or the CLI, so these operations do
//! not take an `Actor`.

use crate::domain::Role;
use crate::infrastructure::database::entities::{
	client, technician, user, Client, ClientActive, Technician, TechnicianActive, User, UserActive,
};
use crate::infrastructure::database::Database;
use crate::infrastructure::events::{Event, EventBus};
use crate::shared::{CoreError, CoreResult};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use sea_orm::{
	ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
	TransactionTrait,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Arguments for provisioning a new account
#[derive(Debug, Clone, serde::Deserialize)]
pub struct NewUser {
	pub email: String,
	pub password: String,
	pub rol: Role,
	pub nombre: String,
	#[serde(default)]
	pub telefono: Option<String>,
}

pub struct AccountService {
	db: Arc<Database>,
	events: Arc<EventBus>,
}

impl AccountService {
	pub fn new(db: Arc<Database>, events: Arc<EventBus>) -> Self {
		Self { db, events }
	}

	/// Provision an account and, for clients and technicians, the matching
	/// profile row in the same transaction
	pub async fn provision_user(&self, input: NewUser) -> CoreResult<user::Model> {
		if !input.email.contains('@') {
			return Err(CoreError::Validation(format!(
				"invalid email: {}",
				input.email
			)));
		}
		if input.password.len() < 8 {
			return Err(CoreError::Validation(
				"password must be at least 8 characters".into(),
			));
		}
		if input.nombre.trim().is_empty() {
			return Err(CoreError::Validation("nombre must not be empty".into()));
		}

		let existing = User::find()
			.filter(user::Column::Email.eq(input.email.as_str()))
			.one(self.db.conn())
			.await?;
		if existing.is_some() {
			return Err(CoreError::DuplicateEmail(input.email));
		}

		let password_hash = hash_password(&input.password)?;
		let now = Utc::now();
		let user_uuid = Uuid::new_v4();

		let txn = self.db.conn().begin().await?;

		let usuario = UserActive {
			uuid: Set(user_uuid),
			email: Set(input.email.clone()),
			password_hash: Set(password_hash),
			rol: Set(input.rol.to_string()),
			nombre: Set(input.nombre.clone()),
			activo: Set(true),
			created_at: Set(now),
			updated_at: Set(now),
			..Default::default()
		}
		.insert(&txn)
		.await?;

		match input.rol {
			Role::Cliente => {
				ClientActive {
					uuid: Set(Uuid::new_v4()),
					usuario_id: Set(usuario.id),
					nombre: Set(input.nombre.clone()),
					telefono: Set(input.telefono.clone()),
					direccion: Set(None),
					created_at: Set(now),
					..Default::default()
				}
				.insert(&txn)
				.await?;
			}
			Role::Tecnico => {
				TechnicianActive {
					uuid: Set(Uuid::new_v4()),
					usuario_id: Set(usuario.id),
					nombre: Set(input.nombre.clone()),
					especialidad: Set(None),
					telefono: Set(input.telefono.clone()),
					disponible: Set(true),
					created_at: Set(now),
					..Default::default()
				}
				.insert(&txn)
				.await?;
			}
			Role::Admin => {}
		}

		txn.commit().await?;

		info!(email = %usuario.email, rol = %usuario.rol, "Provisioned account");
		self.events.emit(Event::UserProvisioned {
			user_id: user_uuid,
			role: input.rol,
		});

		Ok(usuario)
	}

	/// Check credentials, returning the account row when they match an
	/// active account
	pub async fn verify_password(&self, email: &str, password: &str) -> CoreResult<user::Model> {
		let usuario = User::find()
			.filter(user::Column::Email.eq(email))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::forbidden("unknown email or wrong password"))?;

		if !usuario.activo {
			return Err(CoreError::forbidden("account is deactivated"));
		}

		let parsed = PasswordHash::new(&usuario.password_hash)
			.map_err(|e| CoreError::PasswordHash(e.to_string()))?;
		Argon2::default()
			.verify_password(password.as_bytes(), &parsed)
			.map_err(|_| CoreError::forbidden("unknown email or wrong password"))?;

		Ok(usuario)
	}

	/// All accounts, newest first
	pub async fn list_users(&self) -> CoreResult<Vec<user::Model>> {
		Ok(User::find()
			.order_by_desc(user::Column::CreatedAt)
			.all(self.db.conn())
			.await?)
	}

	pub async fn get_user(&self, user_id: Uuid) -> CoreResult<user::Model> {
		User::find()
			.filter(user::Column::Uuid.eq(user_id))
			.one(self.db.conn())
			.await?
			.ok_or_else(|| CoreError::not_found("usuario", user_id))
	}

	/// Activate or deactivate an account
	pub async fn set_active(&self, user_id: Uuid, activo: bool) -> CoreResult<user::Model> {
		let usuario = self.get_user(user_id).await?;
		let mut active: UserActive = usuario.into();
		active.activo = Set(activo);
		active.updated_at = Set(Utc::now());
		let updated = active.update(self.db.conn()).await?;

		self.events.emit(Event::UserActiveChanged { user_id, activo });
		Ok(updated)
	}

	/// Delete an account; profile rows (and their properties, incidents and
	/// workflow rows) go with it via cascade
	pub async fn delete_user(&self, user_id: Uuid) -> CoreResult<()> {
		let usuario = self.get_user(user_id).await?;
		User::delete_by_id(usuario.id).exec(self.db.conn()).await?;

		info!(email = %usuario.email, "Deleted account");
		self.events.emit(Event::UserDeleted { user_id });
		Ok(())
	}

	/// The caller's client profile, if any
	pub async fn client_profile(&self, user_id: Uuid) -> CoreResult<Option<client::Model>> {
		let usuario = self.get_user(user_id).await?;
		Ok(Client::find()
			.filter(client::Column::UsuarioId.eq(usuario.id))
			.one(self.db.conn())
			.await?)
	}

	/// The caller's technician profile, if any
	pub async fn technician_profile(
		&self,
		user_id: Uuid,
	) -> CoreResult<Option<technician::Model>> {
		let usuario = self.get_user(user_id).await?;
		Ok(Technician::find()
			.filter(technician::Column::UsuarioId.eq(usuario.id))
			.one(self.db.conn())
			.await?)
	}
}

fn hash_password(password: &str) -> CoreResult<String> {
	let salt = SaltString::generate(&mut OsRng);
	Ok(Argon2::default()
		.hash_password(password.as_bytes(), &salt)
		.map_err(|e| CoreError::PasswordHash(e.to_string()))?
		.to_string())
}
