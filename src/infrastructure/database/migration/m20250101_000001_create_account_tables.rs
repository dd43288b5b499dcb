//! Accounts, profiles, properties and incidents

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create usuarios table with hybrid ID system (integer pk + uuid)
        manager
            .create_table(
                Table::create()
                    .table(Usuarios::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Usuarios::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Usuarios::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Usuarios::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Usuarios::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Usuarios::Rol).string().not_null())
                    .col(ColumnDef::new(Usuarios::Nombre).string().not_null())
                    .col(ColumnDef::new(Usuarios::Activo).boolean().not_null().default(true))
                    .col(ColumnDef::new(Usuarios::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Usuarios::UpdatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        // Create clientes table
        manager
            .create_table(
                Table::create()
                    .table(Clientes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Clientes::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Clientes::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Clientes::UsuarioId).integer().not_null().unique_key())
                    .col(ColumnDef::new(Clientes::Nombre).string().not_null())
                    .col(ColumnDef::new(Clientes::Telefono).string())
                    .col(ColumnDef::new(Clientes::Direccion).string())
                    .col(ColumnDef::new(Clientes::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Clientes::Table, Clientes::UsuarioId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Create tecnicos table
        manager
            .create_table(
                Table::create()
                    .table(Tecnicos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tecnicos::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Tecnicos::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Tecnicos::UsuarioId).integer().not_null().unique_key())
                    .col(ColumnDef::new(Tecnicos::Nombre).string().not_null())
                    .col(ColumnDef::new(Tecnicos::Especialidad).string())
                    .col(ColumnDef::new(Tecnicos::Telefono).string())
                    .col(ColumnDef::new(Tecnicos::Disponible).boolean().not_null().default(true))
                    .col(ColumnDef::new(Tecnicos::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Tecnicos::Table, Tecnicos::UsuarioId)
                            .to(Usuarios::Table, Usuarios::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Create inmuebles table
        manager
            .create_table(
                Table::create()
                    .table(Inmuebles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Inmuebles::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Inmuebles::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Inmuebles::ClienteId).integer().not_null())
                    .col(ColumnDef::new(Inmuebles::Direccion).string().not_null())
                    .col(ColumnDef::new(Inmuebles::Tipo).string())
                    .col(ColumnDef::new(Inmuebles::Descripcion).string())
                    .col(ColumnDef::new(Inmuebles::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Inmuebles::Table, Inmuebles::ClienteId)
                            .to(Clientes::Table, Clientes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        // Create incidentes table
        manager
            .create_table(
                Table::create()
                    .table(Incidentes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Incidentes::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Incidentes::Uuid).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Incidentes::InmuebleId).integer().not_null())
                    .col(ColumnDef::new(Incidentes::ClienteId).integer().not_null())
                    .col(ColumnDef::new(Incidentes::Titulo).string().not_null())
                    .col(ColumnDef::new(Incidentes::Descripcion).string())
                    .col(ColumnDef::new(Incidentes::Categoria).string())
                    .col(ColumnDef::new(Incidentes::Prioridad).string().not_null().default("media"))
                    .col(ColumnDef::new(Incidentes::Estado).string().not_null().default("pendiente"))
                    .col(ColumnDef::new(Incidentes::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Incidentes::UpdatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Incidentes::Table, Incidentes::InmuebleId)
                            .to(Inmuebles::Table, Inmuebles::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Incidentes::Table, Incidentes::ClienteId)
                            .to(Clientes::Table, Clientes::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Incidentes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Inmuebles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tecnicos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clientes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Usuarios::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Usuarios {
    Table,
    Id,
    Uuid,
    Email,
    PasswordHash,
    Rol,
    Nombre,
    Activo,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Clientes {
    Table,
    Id,
    Uuid,
    UsuarioId,
    Nombre,
    Telefono,
    Direccion,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Tecnicos {
    Table,
    Id,
    Uuid,
    UsuarioId,
    Nombre,
    Especialidad,
    Telefono,
    Disponible,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Inmuebles {
    Table,
    Id,
    Uuid,
    ClienteId,
    Direccion,
    Tipo,
    Descripcion,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Incidentes {
    Table,
    Id,
    Uuid,
    InmuebleId,
    ClienteId,
    Titulo,
    Descripcion,
    Categoria,
    Prioridad,
    Estado,
    CreatedAt,
    UpdatedAt,
}
