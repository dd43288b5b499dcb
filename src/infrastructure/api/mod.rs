//! Administrative HTTP API
//!
//! A small axum surface for account provisioning, guarded by a static
//! bearer key from the app config. Every response body is the uniform
//! `{"success": bool, "data"?: ..., "error"?: ...}` envelope.

mod admin;
mod envelope;

pub use envelope::ApiResponse;

use crate::services::Services;
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiState {
	pub services: Arc<Services>,
	pub admin_api_key: String,
}

/// Build the router
pub fn router(services: Arc<Services>, admin_api_key: String) -> Router {
	let state = ApiState {
		services,
		admin_api_key,
	};

	Router::new()
		.route("/health", get(admin::health))
		.route(
			"/api/admin/users",
			post(admin::create_user).get(admin::list_users),
		)
		.route("/api/admin/users/:id", delete(admin::delete_user))
		.with_state(state)
}
