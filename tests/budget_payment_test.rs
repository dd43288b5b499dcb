//! Budget approval ordering and payments

mod helpers;

use habitafix_core::domain::{Actor, Role};
use habitafix_core::{Core, CoreError};
use std::sync::Arc;
use uuid::Uuid;

async fn accepted_assignment(
    core: &Arc<Core>,
) -> (Actor, Actor, Actor, Uuid) {
    let (cliente, inmueble) = helpers::client_with_property(core, "cliente@example.com").await;
    let admin = helpers::provision(core, "admin@example.com", Role::Admin).await;
    let tecnico = helpers::provision(core, "tecnico@example.com", Role::Tecnico).await;
    let tecnico_uuid = helpers::technician_uuid(core, &tecnico).await;

    let incidente = helpers::report_incident(core, &cliente, inmueble).await;
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

    (cliente, admin, tecnico, incidente)
}

#[tokio::test]
async fn budget_needs_admin_approval_before_client() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, admin, tecnico, incidente) = accepted_assignment(&core).await;

    let presupuesto = core
        .services
        .budgets
        .submit(&tecnico, incidente, "Cambio de sifon y junta".to_string(), 180.0)
        .await
        .expect("submit budget");
    assert_eq!(presupuesto.estado, "pendiente");

    // client cannot approve a budget the admin has not reviewed
    let err = core
        .services
        .budgets
        .client_review(&cliente, presupuesto.uuid, true)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));

    let aprobado = core
        .services
        .budgets
        .admin_review(&admin, presupuesto.uuid, true)
        .await
        .unwrap();
    assert_eq!(aprobado.estado, "aprobado_admin");
    assert!(aprobado.fecha_decision.is_some());

    let final_state = core
        .services
        .budgets
        .client_review(&cliente, presupuesto.uuid, true)
        .await
        .unwrap();
    assert_eq!(final_state.estado, "aprobado_cliente");
}

#[tokio::test]
async fn budget_requires_active_assignment() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, inmueble) = helpers::client_with_property(&core, "cliente@example.com").await;
    let tecnico = helpers::provision(&core, "tecnico@example.com", Role::Tecnico).await;

    let incidente = helpers::report_incident(&core, &cliente, inmueble).await;

    let err = core
        .services
        .budgets
        .submit(&tecnico, incidente, "Presupuesto sin asignar".to_string(), 50.0)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}

#[tokio::test]
async fn rejected_budget_is_terminal() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, admin, tecnico, incidente) = accepted_assignment(&core).await;

    let presupuesto = core
        .services
        .budgets
        .submit(&tecnico, incidente, "Demasiado caro".to_string(), 9000.0)
        .await
        .unwrap();
    core.services
        .budgets
        .admin_review(&admin, presupuesto.uuid, false)
        .await
        .unwrap();

    let err = core
        .services
        .budgets
        .client_review(&cliente, presupuesto.uuid, true)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));
}

#[tokio::test]
async fn payment_only_after_client_approval() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, admin, tecnico, incidente) = accepted_assignment(&core).await;

    let presupuesto = core
        .services
        .budgets
        .submit(&tecnico, incidente, "Reparacion".to_string(), 120.0)
        .await
        .unwrap();

    let err = core
        .services
        .payments
        .record(&admin, presupuesto.uuid, 120.0, "transferencia".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    core.services
        .budgets
        .admin_review(&admin, presupuesto.uuid, true)
        .await
        .unwrap();
    core.services
        .budgets
        .client_review(&cliente, presupuesto.uuid, true)
        .await
        .unwrap();

    let pago = core
        .services
        .payments
        .record(&admin, presupuesto.uuid, 120.0, "transferencia".to_string())
        .await
        .expect("record payment");
    assert_eq!(pago.estado, "pendiente");
    assert!(pago.fecha_pago.is_none());

    let pagado = core
        .services
        .payments
        .mark_paid(&admin, pago.uuid)
        .await
        .expect("mark paid");
    assert_eq!(pagado.estado, "pagado");
    assert!(pagado.fecha_pago.is_some());

    // settling twice is rejected
    let err = core
        .services
        .payments
        .mark_paid(&admin, pago.uuid)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidTransition { .. }));

    let listed = core
        .services
        .payments
        .list_for_budget(&cliente, presupuesto.uuid)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn budget_visibility_is_scoped() {
    let (core, _dir) = helpers::test_core().await;
    let (_cliente, _admin, tecnico, incidente) = accepted_assignment(&core).await;
    let (otro_cliente, _inmueble) = helpers::client_with_property(&core, "otro@example.com").await;

    let presupuesto = core
        .services
        .budgets
        .submit(&tecnico, incidente, "Reparacion".to_string(), 75.0)
        .await
        .unwrap();

    let err = core
        .services
        .budgets
        .get(&otro_cliente, presupuesto.uuid)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));

    assert!(core
        .services
        .budgets
        .list(&otro_cliente)
        .await
        .unwrap()
        .is_empty());
}
