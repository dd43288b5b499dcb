//! Mutations outside the main workflows still announce themselves on the bus

mod helpers;

use chrono::{Duration as ChronoDuration, Utc};
use habitafix_core::domain::Role;
use habitafix_core::infrastructure::events::Event;
use habitafix_core::services::properties::{NewProperty, PropertyUpdate};
use std::time::Duration;
use tokio::sync::broadcast::Receiver;
use tokio::time::timeout;

async fn next_event(rx: &mut Receiver<Event>) -> Event {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("event before deadline")
        .expect("bus stays open")
}

#[tokio::test]
async fn property_lifecycle_is_announced() {
    let (core, _dir) = helpers::test_core().await;
    let cliente = helpers::provision(&core, "cliente@example.com", Role::Cliente).await;
    let cliente_uuid = core
        .services
        .accounts
        .client_profile(cliente.user_id)
        .await
        .unwrap()
        .expect("client profile")
        .uuid;

    let mut rx = core.events.subscribe();

    let inmueble = core
        .services
        .properties
        .create(
            &cliente,
            NewProperty {
                direccion: "Calle Mayor 1".to_string(),
                tipo: None,
                descripcion: None,
            },
        )
        .await
        .unwrap();
    match next_event(&mut rx).await {
        Event::PropertyRegistered {
            property_id,
            client_id,
        } => {
            assert_eq!(property_id, inmueble.uuid);
            assert_eq!(client_id, cliente_uuid);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    core.services
        .properties
        .update(
            &cliente,
            inmueble.uuid,
            PropertyUpdate {
                direccion: Some("Calle Mayor 2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    match next_event(&mut rx).await {
        Event::PropertyUpdated { property_id } => assert_eq!(property_id, inmueble.uuid),
        other => panic!("unexpected event: {other:?}"),
    }

    core.services
        .properties
        .delete(&cliente, inmueble.uuid)
        .await
        .unwrap();
    match next_event(&mut rx).await {
        Event::PropertyDeleted { property_id } => assert_eq!(property_id, inmueble.uuid),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn recategorization_and_deletion_are_announced() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, inmueble) = helpers::client_with_property(&core, "cliente@example.com").await;
    let admin = helpers::provision(&core, "admin@example.com", Role::Admin).await;
    let incidente = helpers::report_incident(&core, &cliente, inmueble).await;

    let mut rx = core.events.subscribe();

    core.services
        .incidents
        .set_category(&cliente, incidente, Some("fontaneria".to_string()))
        .await
        .unwrap();
    match next_event(&mut rx).await {
        Event::IncidentCategorized {
            incident_id,
            categoria,
        } => {
            assert_eq!(incident_id, incidente);
            assert_eq!(categoria.as_deref(), Some("fontaneria"));
        }
        other => panic!("unexpected event: {other:?}"),
    }

    core.services
        .incidents
        .delete(&admin, incidente)
        .await
        .unwrap();
    match next_event(&mut rx).await {
        Event::IncidentDeleted { incident_id } => assert_eq!(incident_id, incidente),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn completed_inspection_is_announced() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, inmueble) = helpers::client_with_property(&core, "cliente@example.com").await;
    let admin = helpers::provision(&core, "admin@example.com", Role::Admin).await;
    let tecnico = helpers::provision(&core, "tecnico@example.com", Role::Tecnico).await;
    let tecnico_uuid = helpers::technician_uuid(&core, &tecnico).await;

    let incidente = helpers::report_incident(&core, &cliente, inmueble).await;
    let asignacion = core
        .services
        .assignments
        .assign(&admin, incidente, tecnico_uuid, None)
        .await
        .unwrap();
    core.services
        .assignments
        .respond(&tecnico, asignacion.uuid, true, None)
        .await
        .unwrap();
    let inspeccion = core
        .services
        .inspections
        .schedule(&tecnico, incidente, Utc::now() + ChronoDuration::days(1))
        .await
        .unwrap();

    let mut rx = core.events.subscribe();

    core.services
        .inspections
        .complete(&tecnico, inspeccion.uuid, Some("Sin fugas".to_string()))
        .await
        .unwrap();
    match next_event(&mut rx).await {
        Event::InspectionCompleted {
            inspection_id,
            incident_id,
        } => {
            assert_eq!(inspection_id, inspeccion.uuid);
            assert_eq!(incident_id, incidente);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn deactivation_is_announced() {
    let (core, _dir) = helpers::test_core().await;
    let cliente = helpers::provision(&core, "cliente@example.com", Role::Cliente).await;

    let mut rx = core.events.subscribe();

    core.services
        .accounts
        .set_active(cliente.user_id, false)
        .await
        .unwrap();
    match next_event(&mut rx).await {
        Event::UserActiveChanged { user_id, activo } => {
            assert_eq!(user_id, cliente.user_id);
            assert!(!activo);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}
