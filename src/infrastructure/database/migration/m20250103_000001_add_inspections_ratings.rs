//! Inspections and service ratings

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create inspecciones table
        manager
            .create_table(
                Table::create()
                    .table(Inspecciones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Inspecciones::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Inspecciones::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Inspecciones::IncidenteId).integer().not_null())
                    .col(ColumnDef::new(Inspecciones::TecnicoId).integer().not_null())
                    .col(ColumnDef::new(Inspecciones::FechaProgramada).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Inspecciones::FechaRealizada).timestamp_with_time_zone())
                    .col(ColumnDef::new(Inspecciones::Observaciones).string())
                    .col(ColumnDef::new(Inspecciones::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Inspecciones::Table, Inspecciones::IncidenteId)
                            .to(Incidentes::Table, Incidentes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Inspecciones::Table, Inspecciones::TecnicoId)
                            .to(Tecnicos::Table, Tecnicos::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Create calificaciones table, one rating per incident
        manager
            .create_table(
                Table::create()
                    .table(Calificaciones::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Calificaciones::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Calificaciones::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Calificaciones::IncidenteId).integer().not_null().unique_key())
                    .col(ColumnDef::new(Calificaciones::ClienteId).integer().not_null())
                    .col(ColumnDef::new(Calificaciones::TecnicoId).integer().not_null())
                    .col(ColumnDef::new(Calificaciones::Puntuacion).small_integer().not_null())
                    .col(ColumnDef::new(Calificaciones::Comentario).string())
                    .col(ColumnDef::new(Calificaciones::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Calificaciones::Table, Calificaciones::IncidenteId)
                            .to(Incidentes::Table, Incidentes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Calificaciones::Table, Calificaciones::ClienteId)
                            .to(Clientes::Table, Clientes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Calificaciones::Table, Calificaciones::TecnicoId)
                            .to(Tecnicos::Table, Tecnicos::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Calificaciones::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inspecciones::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Inspecciones {
    Table,
    Id,
    Uuid,
    IncidenteId,
    TecnicoId,
    FechaProgramada,
    FechaRealizada,
    Observaciones,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Calificaciones {
    Table,
    Id,
    Uuid,
    IncidenteId,
    ClienteId,
    TecnicoId,
    Puntuacion,
    Comentario,
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

#[derive(DeriveIden)]
enum Clientes {
    Table,
    Id,
}
