//! Shared row-resolution helpers for the service layer
//!
//! Public service APIs deal in uuids; rows are joined through the integer
//! primary keys. These helpers resolve an `Actor` to its profile row and
//! uuids to rows, returning `NotFound`/`Forbidden` as appropriate.

use crate::domain::{Actor, AssignmentStatus};
use crate::infrastructure::database::entities::{
	assignment, client, incident, technician, user, Assignment, Client, Incident, Technician, User,
};
use crate::shared::{CoreError, CoreResult};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use std::str::FromStr;
use uuid::Uuid;

/// Resolve the caller's `usuarios` row
pub(crate) async fn user_for_actor<C: ConnectionTrait>(
	conn: &C,
	actor: &Actor,
) -> CoreResult<user::Model> {
	User::find()
		.filter(user::Column::Uuid.eq(actor.user_id))
		.one(conn)
		.await?
		.ok_or_else(|| CoreError::not_found("usuario", actor.user_id))
}

/// Resolve the caller's `clientes` profile row
pub(crate) async fn client_for_actor<C: ConnectionTrait>(
	conn: &C,
	actor: &Actor,
) -> CoreResult<client::Model> {
	let usuario = user_for_actor(conn, actor).await?;
	Client::find()
		.filter(client::Column::UsuarioId.eq(usuario.id))
		.one(conn)
		.await?
		.ok_or_else(|| CoreError::forbidden("caller has no client profile"))
}

/// Resolve the caller's `tecnicos` profile row
pub(crate) async fn technician_for_actor<C: ConnectionTrait>(
	conn: &C,
	actor: &Actor,
) -> CoreResult<technician::Model> {
	let usuario = user_for_actor(conn, actor).await?;
	Technician::find()
		.filter(technician::Column::UsuarioId.eq(usuario.id))
		.one(conn)
		.await?
		.ok_or_else(|| CoreError::forbidden("caller has no technician profile"))
}

pub(crate) async fn incident_by_uuid<C: ConnectionTrait>(
	conn: &C,
	uuid: Uuid,
) -> CoreResult<incident::Model> {
	Incident::find()
		.filter(incident::Column::Uuid.eq(uuid))
		.one(conn)
		.await?
		.ok_or_else(|| CoreError::not_found("incidente", uuid))
}

pub(crate) async fn technician_by_uuid<C: ConnectionTrait>(
	conn: &C,
	uuid: Uuid,
) -> CoreResult<technician::Model> {
	Technician::find()
		.filter(technician::Column::Uuid.eq(uuid))
		.one(conn)
		.await?
		.ok_or_else(|| CoreError::not_found("tecnico", uuid))
}

pub(crate) async fn assignment_by_uuid<C: ConnectionTrait>(
	conn: &C,
	uuid: Uuid,
) -> CoreResult<assignment::Model> {
	Assignment::find()
		.filter(assignment::Column::Uuid.eq(uuid))
		.one(conn)
		.await?
		.ok_or_else(|| CoreError::not_found("asignacion", uuid))
}

/// Whether the technician has an assignment on the incident in any of the
/// given states
pub(crate) async fn has_assignment_in<C: ConnectionTrait>(
	conn: &C,
	incident_id: i32,
	technician_id: i32,
	states: &[AssignmentStatus],
) -> CoreResult<bool> {
	let states: Vec<String> = states.iter().map(|s| s.to_string()).collect();
	let found = Assignment::find()
		.filter(assignment::Column::IncidenteId.eq(incident_id))
		.filter(assignment::Column::TecnicoId.eq(technician_id))
		.filter(assignment::Column::Estado.is_in(states))
		.one(conn)
		.await?;
	Ok(found.is_some())
}

/// Parse a stored `estado` string into its domain enum. A failure here
/// means the row was written outside the service layer.
pub(crate) fn parse_status<T: FromStr>(raw: &str) -> CoreResult<T> {
	T::from_str(raw).map_err(|_| CoreError::Validation(format!("unknown status value '{raw}'")))
}
