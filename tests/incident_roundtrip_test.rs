//! Incident CRUD round trips and per-role visibility

mod helpers;

use habitafix_core::domain::Role;
use habitafix_core::CoreError;
use uuid::Uuid;

#[tokio::test]
async fn incident_with_null_category_round_trips() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, inmueble) = helpers::client_with_property(&core, "cliente@example.com").await;

    let incidente_id = helpers::report_incident(&core, &cliente, inmueble).await;

    let fetched = core
        .services
        .incidents
        .get(&cliente, incidente_id)
        .await
        .expect("read back");
    assert_eq!(fetched.categoria, None);
    assert_eq!(fetched.estado, "pendiente");
    assert_eq!(fetched.titulo, "Fuga de agua en la cocina");

    // categorize later, then delete
    let admin = helpers::provision(&core, "admin@example.com", Role::Admin).await;
    let updated = core
        .services
        .incidents
        .set_category(&admin, incidente_id, Some("fontaneria".to_string()))
        .await
        .expect("set category");
    assert_eq!(updated.categoria.as_deref(), Some("fontaneria"));

    core.services
        .incidents
        .delete(&admin, incidente_id)
        .await
        .expect("delete");

    let err = core
        .services
        .incidents
        .get(&admin, incidente_id)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn clients_only_see_their_own_incidents() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente_a, inmueble_a) = helpers::client_with_property(&core, "a@example.com").await;
    let (cliente_b, _inmueble_b) = helpers::client_with_property(&core, "b@example.com").await;

    let incidente_a = helpers::report_incident(&core, &cliente_a, inmueble_a).await;

    let visible_to_b = core.services.incidents.list(&cliente_b).await.unwrap();
    assert!(visible_to_b.is_empty());

    let err = core
        .services
        .incidents
        .get(&cliente_b, incidente_a)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    // and a client cannot report on someone else's property
    let err = core
        .services
        .incidents
        .report(
            &cliente_b,
            habitafix_core::services::incidents::NewIncident {
                property_id: inmueble_a,
                titulo: "Intruso".to_string(),
                descripcion: None,
                categoria: None,
                prioridad: habitafix_core::domain::Priority::Baja,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}

#[tokio::test]
async fn incident_list_is_newest_first() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, inmueble) = helpers::client_with_property(&core, "cliente@example.com").await;

    let mut reported: Vec<Uuid> = Vec::new();
    for _ in 0..3 {
        reported.push(helpers::report_incident(&core, &cliente, inmueble).await);
    }

    let listed = core.services.incidents.list(&cliente).await.unwrap();
    assert_eq!(listed.len(), 3);
    for pair in listed.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[tokio::test]
async fn only_admins_delete_incidents() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, inmueble) = helpers::client_with_property(&core, "cliente@example.com").await;
    let incidente = helpers::report_incident(&core, &cliente, inmueble).await;

    let err = core
        .services
        .incidents
        .delete(&cliente, incidente)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}
