//! Shared test setup

use habitafix_core::domain::{Actor, Priority, Role};
use habitafix_core::services::accounts::NewUser;
use habitafix_core::services::incidents::NewIncident;
use habitafix_core::services::properties::NewProperty;
use habitafix_core::Core;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

/// Fresh core in a temp data dir. Keep the `TempDir` alive for the test's
/// duration or the database goes away underneath the core.
pub async fn test_core() -> (Arc<Core>, TempDir) {
    let _ = tracing_subscriber::fmt::try_init();

    let data_dir = tempfile::tempdir().expect("tempdir");
    let core = Core::new(data_dir.path().to_path_buf())
        .await
        .expect("core init");
    (Arc::new(core), data_dir)
}

/// Provision an account and return an actor for it
pub async fn provision(core: &Core, email: &str, rol: Role) -> Actor {
    let usuario = core
        .services
        .accounts
        .provision_user(NewUser {
            email: email.to_string(),
            password: "correct-horse-battery".to_string(),
            rol,
            nombre: format!("Test {rol}"),
            telefono: None,
        })
        .await
        .expect("provision user");
    Actor::new(usuario.uuid, rol)
}

/// Client actor plus one registered property
pub async fn client_with_property(core: &Core, email: &str) -> (Actor, Uuid) {
    let cliente = provision(core, email, Role::Cliente).await;
    let inmueble = core
        .services
        .properties
        .create(
            &cliente,
            NewProperty {
                direccion: "Calle Mayor 1".to_string(),
                tipo: Some("piso".to_string()),
                descripcion: None,
            },
        )
        .await
        .expect("create property");
    (cliente, inmueble.uuid)
}

/// Report an incident without a category (the original repo's own smoke
/// check reports with a null category)
pub async fn report_incident(core: &Core, cliente: &Actor, property_id: Uuid) -> Uuid {
    core.services
        .incidents
        .report(
            cliente,
            NewIncident {
                property_id,
                titulo: "Fuga de agua en la cocina".to_string(),
                descripcion: Some("Gotea bajo el fregadero".to_string()),
                categoria: None,
                prioridad: Priority::Alta,
            },
        )
        .await
        .expect("report incident")
        .uuid
}

/// The technician profile uuid behind a technician actor
pub async fn technician_uuid(core: &Core, tecnico: &Actor) -> Uuid {
    core.services
        .accounts
        .technician_profile(tecnico.user_id)
        .await
        .expect("profile lookup")
        .expect("technician profile")
        .uuid
}
