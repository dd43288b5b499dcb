//! Technician assignment entity (`asignaciones_tecnico`)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asignaciones_tecnico")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    pub incidente_id: i32,
    pub tecnico_id: i32,
    pub estado: String, // see domain::AssignmentStatus
    pub fecha_asignacion: DateTimeUtc,
    pub fecha_respuesta: Option<DateTimeUtc>,
    pub nota: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::incident::Entity",
        from = "Column::IncidenteId",
        to = "super::incident::Column::Id"
    )]
    Incident,
    #[sea_orm(
        belongs_to = "super::technician::Entity",
        from = "Column::TecnicoId",
        to = "super::technician::Column::Id"
    )]
    Technician,
}

impl Related<super::incident::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Incident.def()
    }
}

impl Related<super::technician::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Technician.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
