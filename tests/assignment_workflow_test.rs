//! Assignment workflow: assign, respond, start, complete

mod helpers;

use habitafix_core::domain::{IncidentStatus, Role};
use habitafix_core::CoreError;

#[tokio::test]
async fn full_workflow_updates_assignment_and_incident() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, inmueble) = helpers::client_with_property(&core, "cliente@example.com").await;
    let admin = helpers::provision(&core, "admin@example.com", Role::Admin).await;
    let tecnico = helpers::provision(&core, "tecnico@example.com", Role::Tecnico).await;
    let tecnico_uuid = helpers::technician_uuid(&core, &tecnico).await;

    let incidente = helpers::report_incident(&core, &cliente, inmueble).await;

    let asignacion = core
        .services
        .assignments
        .assign(&admin, incidente, tecnico_uuid, Some("urgente".to_string()))
        .await
        .expect("assign");
    assert_eq!(asignacion.estado, "pendiente");
    assert_eq!(
        core.services.incidents.get(&admin, incidente).await.unwrap().estado,
        "asignada"
    );

    let aceptada = core
        .services
        .assignments
        .respond(&tecnico, asignacion.uuid, true, None)
        .await
        .expect("accept");
    assert_eq!(aceptada.estado, "aceptada");
    assert!(aceptada.fecha_respuesta.is_some());

    core.services
        .assignments
        .start(&tecnico, asignacion.uuid)
        .await
        .expect("start");
    assert_eq!(
        core.services.incidents.get(&admin, incidente).await.unwrap().estado,
        "en_proceso"
    );

    let completada = core
        .services
        .assignments
        .complete(&tecnico, asignacion.uuid, Some("cambiado el sifon".to_string()))
        .await
        .expect("complete");
    assert_eq!(completada.estado, "completada");
    assert_eq!(
        core.services.incidents.get(&admin, incidente).await.unwrap().estado,
        "resuelta"
    );
}

#[tokio::test]
async fn rejection_returns_incident_to_pool() {
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

    let rechazada = core
        .services
        .assignments
        .respond(&tecnico, asignacion.uuid, false, Some("fuera de zona".to_string()))
        .await
        .unwrap();
    assert_eq!(rechazada.estado, "rechazada");
    assert_eq!(
        core.services.incidents.get(&admin, incidente).await.unwrap().estado,
        "pendiente"
    );

    // a rejected assignment is terminal
    let err = core
        .services
        .assignments
        .start(&tecnico, asignacion.uuid)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
}

#[tokio::test]
async fn cannot_start_before_accepting() {
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

    let err = core
        .services
        .assignments
        .start(&tecnico, asignacion.uuid)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
}

#[tokio::test]
async fn one_active_assignment_per_incident() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, inmueble) = helpers::client_with_property(&core, "cliente@example.com").await;
    let admin = helpers::provision(&core, "admin@example.com", Role::Admin).await;
    let tecnico_a = helpers::provision(&core, "a@tecnicos.com", Role::Tecnico).await;
    let tecnico_b = helpers::provision(&core, "b@tecnicos.com", Role::Tecnico).await;
    let uuid_a = helpers::technician_uuid(&core, &tecnico_a).await;
    let uuid_b = helpers::technician_uuid(&core, &tecnico_b).await;

    let incidente = helpers::report_incident(&core, &cliente, inmueble).await;
    core.services
        .assignments
        .assign(&admin, incidente, uuid_a, None)
        .await
        .unwrap();

    let err = core
        .services
        .assignments
        .assign(&admin, incidente, uuid_b, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn another_technician_cannot_respond() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, inmueble) = helpers::client_with_property(&core, "cliente@example.com").await;
    let admin = helpers::provision(&core, "admin@example.com", Role::Admin).await;
    let tecnico_a = helpers::provision(&core, "a@tecnicos.com", Role::Tecnico).await;
    let tecnico_b = helpers::provision(&core, "b@tecnicos.com", Role::Tecnico).await;
    let uuid_a = helpers::technician_uuid(&core, &tecnico_a).await;

    let incidente = helpers::report_incident(&core, &cliente, inmueble).await;
    let asignacion = core
        .services
        .assignments
        .assign(&admin, incidente, uuid_a, None)
        .await
        .unwrap();

    let err = core
        .services
        .assignments
        .respond(&tecnico_b, asignacion.uuid, true, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}

#[tokio::test]
async fn failed_incident_transition_leaves_assignment_untouched() {
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
    core.services
        .assignments
        .start(&tecnico, asignacion.uuid)
        .await
        .unwrap();

    // an admin resolves the incident directly while work is still ongoing
    core.services
        .incidents
        .update_status(&admin, incidente, IncidentStatus::Resuelta)
        .await
        .unwrap();

    // the technician's completion now hits an illegal incident transition
    let err = core
        .services
        .assignments
        .complete(&tecnico, asignacion.uuid, None)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));

    // neither row moved: the assignment update rolled back with it
    let asignacion = core
        .services
        .assignments
        .get(&tecnico, asignacion.uuid)
        .await
        .unwrap();
    assert_eq!(asignacion.estado, "en_curso");
    assert_eq!(
        core.services.incidents.get(&admin, incidente).await.unwrap().estado,
        "resuelta"
    );
}
