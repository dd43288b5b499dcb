//! Assignments, budgets and payments

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create asignaciones_tecnico table
        manager
            .create_table(
                Table::create()
                    .table(Asignaciones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Asignaciones::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Asignaciones::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Asignaciones::IncidenteId).integer().not_null())
                    .col(ColumnDef::new(Asignaciones::TecnicoId).integer().not_null())
                    .col(ColumnDef::new(Asignaciones::Estado).string().not_null().default("pendiente"))
                    .col(ColumnDef::new(Asignaciones::FechaAsignacion).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Asignaciones::FechaRespuesta).timestamp_with_time_zone())
                    .col(ColumnDef::new(Asignaciones::Nota).string())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Asignaciones::Table, Asignaciones::IncidenteId)
                            .to(Incidentes::Table, Incidentes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Asignaciones::Table, Asignaciones::TecnicoId)
                            .to(Tecnicos::Table, Tecnicos::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // One assignment per incident/technician pair
        manager
            .create_index(
                Index::create()
                    .name("idx_asignaciones_incidente_tecnico")
                    .table(Asignaciones::Table)
                    .col(Asignaciones::IncidenteId)
                    .col(Asignaciones::TecnicoId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create presupuestos table
        manager
            .create_table(
                Table::create()
                    .table(Presupuestos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Presupuestos::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Presupuestos::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Presupuestos::IncidenteId).integer().not_null())
                    .col(ColumnDef::new(Presupuestos::TecnicoId).integer().not_null())
                    .col(ColumnDef::new(Presupuestos::Descripcion).string().not_null())
                    .col(ColumnDef::new(Presupuestos::Monto).double().not_null())
                    .col(ColumnDef::new(Presupuestos::Estado).string().not_null().default("pendiente"))
                    .col(ColumnDef::new(Presupuestos::FechaEnvio).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Presupuestos::FechaDecision).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Presupuestos::Table, Presupuestos::IncidenteId)
                            .to(Incidentes::Table, Incidentes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Presupuestos::Table, Presupuestos::TecnicoId)
                            .to(Tecnicos::Table, Tecnicos::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Create pagos table
        manager
            .create_table(
                Table::create()
                    .table(Pagos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pagos::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Pagos::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Pagos::PresupuestoId).integer().not_null())
                    .col(ColumnDef::new(Pagos::Monto).double().not_null())
                    .col(ColumnDef::new(Pagos::Metodo).string().not_null())
                    .col(ColumnDef::new(Pagos::Estado).string().not_null().default("pendiente"))
                    .col(ColumnDef::new(Pagos::FechaPago).timestamp_with_time_zone())
                    .col(ColumnDef::new(Pagos::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Pagos::Table, Pagos::PresupuestoId)
                            .to(Presupuestos::Table, Presupuestos::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pagos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Presupuestos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Asignaciones::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Asignaciones {
    #[sea_orm(iden = "asignaciones_tecnico")]
    Table,
    Id,
    Uuid,
    IncidenteId,
    TecnicoId,
    Estado,
    FechaAsignacion,
    FechaRespuesta,
    Nota,
}

#[derive(DeriveIden)]
enum Presupuestos {
    Table,
    Id,
    Uuid,
    IncidenteId,
    TecnicoId,
    Descripcion,
    Monto,
    Estado,
    FechaEnvio,
    FechaDecision,
}

#[derive(DeriveIden)]
enum Pagos {
    Table,
    Id,
    Uuid,
    PresupuestoId,
    Monto,
    Metodo,
    Estado,
    FechaPago,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Incidentes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Tecnicos {
    Table,
    Id,
}
