//! Account provisioning and authentication

mod helpers;

use habitafix_core::domain::Role;
use habitafix_core::services::accounts::NewUser;
use habitafix_core::CoreError;

#[tokio::test]
async fn provisioning_creates_profile_rows() {
    let (core, _dir) = helpers::test_core().await;

    let cliente = helpers::provision(&core, "cliente@example.com", Role::Cliente).await;
    let tecnico = helpers::provision(&core, "tecnico@example.com", Role::Tecnico).await;
    let admin = helpers::provision(&core, "admin@example.com", Role::Admin).await;

    assert!(core
        .services
        .accounts
        .client_profile(cliente.user_id)
        .await
        .unwrap()
        .is_some());
    assert!(core
        .services
        .accounts
        .technician_profile(tecnico.user_id)
        .await
        .unwrap()
        .is_some());
    // admins have no profile row
    assert!(core
        .services
        .accounts
        .client_profile(admin.user_id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (core, _dir) = helpers::test_core().await;
    helpers::provision(&core, "dup@example.com", Role::Cliente).await;

    let err = core
        .services
        .accounts
        .provision_user(NewUser {
            email: "dup@example.com".to_string(),
            password: "long-enough-password".to_string(),
            rol: Role::Tecnico,
            nombre: "Dup".to_string(),
            telefono: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateEmail(_)));
}

#[tokio::test]
async fn weak_passwords_are_rejected() {
    let (core, _dir) = helpers::test_core().await;

    let err = core
        .services
        .accounts
        .provision_user(NewUser {
            email: "weak@example.com".to_string(),
            password: "short".to_string(),
            rol: Role::Cliente,
            nombre: "Weak".to_string(),
            telefono: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[tokio::test]
async fn password_verification() {
    let (core, _dir) = helpers::test_core().await;
    helpers::provision(&core, "login@example.com", Role::Cliente).await;

    let usuario = core
        .services
        .accounts
        .verify_password("login@example.com", "correct-horse-battery")
        .await
        .expect("correct password");
    assert_eq!(usuario.email, "login@example.com");

    let err = core
        .services
        .accounts
        .verify_password("login@example.com", "wrong-password!")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}

#[tokio::test]
async fn deactivated_accounts_cannot_log_in() {
    let (core, _dir) = helpers::test_core().await;
    let cliente = helpers::provision(&core, "bye@example.com", Role::Cliente).await;

    core.services
        .accounts
        .set_active(cliente.user_id, false)
        .await
        .unwrap();

    let err = core
        .services
        .accounts
        .verify_password("bye@example.com", "correct-horse-battery")
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Forbidden(_)));
}

#[tokio::test]
async fn deleting_a_user_cascades_to_their_rows() {
    let (core, _dir) = helpers::test_core().await;
    let (cliente, inmueble) = helpers::client_with_property(&core, "gone@example.com").await;
    let incidente = helpers::report_incident(&core, &cliente, inmueble).await;
    let admin = helpers::provision(&core, "admin@example.com", Role::Admin).await;

    core.services
        .accounts
        .delete_user(cliente.user_id)
        .await
        .expect("delete user");

    let err = core
        .services
        .incidents
        .get(&admin, incidente)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
    let err = core
        .services
        .properties
        .get(&admin, inmueble)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));
}
