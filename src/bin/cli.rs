//! HabitaFix daemon and admin CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use habitafix_core::config::{default_data_dir, AppConfig};
use habitafix_core::domain::Role;
use habitafix_core::infrastructure::database::Database;
use habitafix_core::services::accounts::NewUser;
use habitafix_core::Core;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "habitafix", about = "Property incident management portal")]
struct Cli {
    /// Data directory (config + database)
    #[arg(long, env = "HABITAFIX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the daemon with the administrative HTTP API
    Serve {
        /// Override the configured bind address
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Apply pending database migrations and exit
    Migrate,
    /// Provision an admin account
    CreateAdmin {
        email: String,
        nombre: String,
        #[arg(long, env = "HABITAFIX_ADMIN_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    match cli.command {
        Command::Serve { addr } => serve(data_dir, addr).await,
        Command::Migrate => migrate(data_dir).await,
        Command::CreateAdmin {
            email,
            nombre,
            password,
        } => create_admin(data_dir, email, nombre, password).await,
    }
}

async fn serve(data_dir: PathBuf, addr: Option<SocketAddr>) -> Result<()> {
    let core = Arc::new(Core::new(data_dir).await?);
    let addr = addr.unwrap_or(core.config().http_addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Admin API listening on {addr}");

    axum::serve(listener, core.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    core.shutdown().await?;
    Ok(())
}

async fn migrate(data_dir: PathBuf) -> Result<()> {
    let config = AppConfig::load_from(&data_dir)?;
    let db = Database::open(&config.database_path()).await?;
    db.migrate().await?;
    Ok(())
}

async fn create_admin(
    data_dir: PathBuf,
    email: String,
    nombre: String,
    password: String,
) -> Result<()> {
    let core = Core::new(data_dir).await?;
    let usuario = core
        .services
        .accounts
        .provision_user(NewUser {
            email,
            password,
            rol: Role::Admin,
            nombre,
            telefono: None,
        })
        .await?;
    println!("Created admin {} ({})", usuario.email, usuario.uuid);
    core.shutdown().await?;
    Ok(())
}

async fn shutdown_signal() {
    // SIGINT is enough for the daemon's lifetime management
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
