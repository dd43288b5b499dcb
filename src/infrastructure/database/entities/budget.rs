//! Repair budget entity (`presupuestos`)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "presupuestos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uuid: Uuid,
    pub incidente_id: i32,
    pub tecnico_id: i32,
    pub descripcion: String,
    pub monto: f64,
    pub estado: String, // see domain::BudgetStatus
    pub fecha_envio: DateTimeUtc,
    pub fecha_decision: Option<DateTimeUtc>,
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
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
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

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
