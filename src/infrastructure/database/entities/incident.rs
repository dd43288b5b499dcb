//! Incident entity (`incidentes`)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "incidentes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    pub inmueble_id: i32,
    pub cliente_id: i32,
    pub titulo: String,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    pub prioridad: String, // "baja", "media", "alta", "urgente"
    pub estado: String,    // see domain::IncidentStatus
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::InmuebleId",
        to = "super::property::Column::Id"
    )]
    Property,
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClienteId",
        to = "super::client::Column::Id"
    )]
    Client,
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignment,
    #[sea_orm(has_many = "super::budget::Entity")]
    Budget,
    #[sea_orm(has_many = "super::inspection::Entity")]
    Inspection,
    #[sea_orm(has_one = "super::rating::Entity")]
    Rating,
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::budget::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budget.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
