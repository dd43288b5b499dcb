//! Account provisioning handlers

use super::envelope::{ApiError, ApiResponse};
use super::ApiState;
use crate::services::accounts::NewUser;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

pub(super) async fn health() -> Json<ApiResponse<Value>> {
	Json(ApiResponse::ok(json!({ "status": "ok" })))
}

pub(super) async fn create_user(
	State(state): State<ApiState>,
	headers: HeaderMap,
	Json(input): Json<NewUser>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
	check_auth(&state, &headers)?;

	let usuario = state.services.accounts.provision_user(input).await?;
	Ok((
		StatusCode::CREATED,
		Json(ApiResponse::ok(json!({
			"id": usuario.uuid,
			"email": usuario.email,
			"rol": usuario.rol,
			"nombre": usuario.nombre,
		}))),
	))
}

pub(super) async fn list_users(
	State(state): State<ApiState>,
	headers: HeaderMap,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
	check_auth(&state, &headers)?;

	let users = state.services.accounts.list_users().await?;
	let users: Vec<Value> = users
		.into_iter()
		.map(|u| {
			json!({
				"id": u.uuid,
				"email": u.email,
				"rol": u.rol,
				"nombre": u.nombre,
				"activo": u.activo,
				"created_at": u.created_at,
			})
		})
		.collect();
	Ok(Json(ApiResponse::ok(json!({ "users": users }))))
}

pub(super) async fn delete_user(
	State(state): State<ApiState>,
	headers: HeaderMap,
	Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
	check_auth(&state, &headers)?;

	state.services.accounts.delete_user(id).await?;
	Ok(Json(ApiResponse::ok(json!({ "deleted": id }))))
}

fn check_auth(state: &ApiState, headers: &HeaderMap) -> Result<(), ApiError> {
	let provided = headers
		.get(header::AUTHORIZATION)
		.and_then(|v| v.to_str().ok())
		.and_then(|v| v.strip_prefix("Bearer "));

	match provided {
		Some(key) if key == state.admin_api_key => Ok(()),
		_ => Err(ApiError::unauthorized()),
	}
}
