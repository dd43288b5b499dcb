//! Database migrations

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_account_tables::Migration),
            Box::new(m20250102_000001_create_workflow_tables::Migration),
            Box::new(m20250103_000001_add_inspections_ratings::Migration),
        ]
    }
}

mod m20250101_000001_create_account_tables;
mod m20250102_000001_create_workflow_tables;
mod m20250103_000001_add_inspections_ratings;
