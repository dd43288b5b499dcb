//! Infrastructure: database, events and the administrative HTTP API

pub mod api;
pub mod database;
pub mod events;
