//! Database infrastructure using SeaORM

use sea_orm::{ConnectOptions, Database as SeaDatabase, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod entities;
pub mod migration;

/// Database wrapper for the portal
pub struct Database {
    /// SeaORM database connection
    conn: DatabaseConnection,
}

impl Database {
    /// Open the database at the specified path, creating it if needed
    pub async fn open(path: &Path) -> Result<Self, DbErr> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbErr::Custom(format!("Failed to create directory: {}", e)))?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", path.display());
        let conn = Self::connect(db_url).await?;

        info!("Opened database at {:?}", path);

        Ok(Self { conn })
    }

    /// In-memory database, used by the test suite
    pub async fn in_memory() -> Result<Self, DbErr> {
        let conn = Self::connect("sqlite::memory:".to_string()).await?;
        Ok(Self { conn })
    }

    async fn connect(db_url: String) -> Result<DatabaseConnection, DbErr> {
        let mut opt = ConnectOptions::new(db_url);
        opt.max_connections(10)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(8))
            .sqlx_logging(false); // We'll use tracing instead

        SeaDatabase::connect(opt).await
    }

    /// Run migrations
    pub async fn migrate(&self) -> Result<(), DbErr> {
        migration::Migrator::up(&self.conn, None).await?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get the database connection
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::entities::{user, User};
    use super::Database;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
    use uuid::Uuid;

    #[tokio::test]
    async fn in_memory_database_migrates_and_stores_rows() {
        let db = Database::in_memory().await.expect("open in-memory");
        db.migrate().await.expect("migrate");

        let now = Utc::now();
        let inserted = user::ActiveModel {
            uuid: Set(Uuid::new_v4()),
            email: Set("mem@example.com".to_string()),
            password_hash: Set("not-a-real-hash".to_string()),
            rol: Set("admin".to_string()),
            nombre: Set("Mem".to_string()),
            activo: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db.conn())
        .await
        .expect("insert");

        let found = User::find_by_id(inserted.id)
            .one(db.conn())
            .await
            .expect("query")
            .expect("row present");
        assert_eq!(found.email, "mem@example.com");
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = Database::in_memory().await.expect("open in-memory");
        db.migrate().await.expect("first run");
        db.migrate().await.expect("second run");
    }
}
