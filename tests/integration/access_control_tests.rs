//! Route guard and session lifecycle through the app context

use crate::common::{AccountFixture, TestApp};
use std::time::Duration;
use storepulse::{AuthBackend, DashboardError, GuardState, Role};

#[tokio::test]
async fn test_protected_route_round_trips_through_sign_in() {
    let test = TestApp::started().await;

    let mut view = test.app.view("/settings");
    assert_eq!(
        view.state(),
        &GuardState::Unauthenticated {
            redirect_to: "/login".to_string(),
            return_to: "/settings".to_string(),
        }
    );

    let landing = test
        .app
        .sign_in(AccountFixture::ADMIN_EMAIL, AccountFixture::PASSWORD)
        .await
        .unwrap();
    assert_eq!(landing, "/settings");
    assert_eq!(
        view.navigate(&landing),
        &GuardState::Authorized {
            view: "settings".to_string()
        }
    );
}

#[tokio::test]
async fn test_guard_is_unknown_until_session_resolves() {
    let test = TestApp::new().await;

    let mut view = test.app.view("/goals");
    assert_eq!(view.state(), &GuardState::Unknown);
    assert_eq!(view.state().redirect(), None);

    test.app.start().await;
    let state = view.next_change().await.unwrap();
    assert!(matches!(state, GuardState::Unauthenticated { .. }));
}

#[tokio::test]
async fn test_store_role_denied_settings() {
    let test = TestApp::started().await;
    test.app
        .sign_in(AccountFixture::STORE_EMAIL, AccountFixture::PASSWORD)
        .await
        .unwrap();

    let view = test.app.view("/settings");
    assert_eq!(
        view.state(),
        &GuardState::Unauthorized {
            role: Role::Store,
            path: "/settings".to_string(),
        }
    );
}

#[tokio::test]
async fn test_sign_out_closes_open_view() {
    let test = TestApp::started().await;
    test.app
        .sign_in(AccountFixture::DRIVER_EMAIL, AccountFixture::PASSWORD)
        .await
        .unwrap();
    let mut view = test.app.view("/returns");
    assert!(view.state().is_authorized());

    test.app.sign_out().await;
    let state = view.next_change().await.unwrap();
    assert!(matches!(state, GuardState::Unauthenticated { .. }));
}

#[tokio::test]
async fn test_sign_out_survives_backend_rejection() {
    let test = TestApp::started().await;
    test.app
        .sign_in(AccountFixture::ADMIN_EMAIL, AccountFixture::PASSWORD)
        .await
        .unwrap();
    test.backend.fail_sign_out(true);

    test.app.sign_out().await;
    assert!(!test.app.session().is_authenticated());
    assert!(test.app.session().identity().is_none());
}

#[tokio::test]
async fn test_email_is_normalized_before_backend() {
    let test = TestApp::started().await;
    test.app
        .sign_in("  ADMIN@EXAMPLE.COM ", AccountFixture::PASSWORD)
        .await
        .unwrap();

    let attempts = test.backend.sign_in_attempts();
    assert_eq!(attempts[0].0, "admin@example.com");
}

#[tokio::test]
async fn test_malformed_email_never_reaches_backend() {
    let test = TestApp::started().await;
    let err = test.app.sign_in("not-an-email", "whatever").await.unwrap_err();

    assert!(matches!(err, DashboardError::Validation(_)));
    assert!(test.backend.sign_in_attempts().is_empty());
}

#[tokio::test]
async fn test_first_access_flow() {
    let test = TestApp::started().await;
    let mut view = test.app.view("/goals");

    let landing = test
        .app
        .sign_in(AccountFixture::NEWCOMER_EMAIL, "afeet10")
        .await
        .unwrap();
    assert_eq!(landing, "/first-access");
    assert!(matches!(
        view.navigate("/goals"),
        GuardState::FirstAccessRequired { .. }
    ));

    for weak in ["afeet10", "abc12"] {
        let err = test.app.complete_first_access(weak).await.unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)), "{}", weak);
    }
    assert!(!test.backend.calls().contains(&"update_password"));

    let landing = test.app.complete_first_access("validPass1").await.unwrap();
    assert_eq!(landing, "/goals");
    assert!(view.navigate(&landing).is_authorized());
}

#[tokio::test]
async fn test_persisted_session_restored_on_start() {
    let backend = AccountFixture::backend();
    backend
        .sign_in(AccountFixture::ADMIN_EMAIL, AccountFixture::PASSWORD)
        .await
        .unwrap();
    let test = TestApp::with_backend(backend).await;

    test.app.start().await;
    let identity = test.app.session().identity().unwrap();
    assert_eq!(identity.role, Role::Admin);
}

#[tokio::test]
async fn test_expiry_signal_forces_sign_out() {
    let test = TestApp::started().await;
    test.app
        .sign_in(AccountFixture::ADMIN_EMAIL, AccountFixture::PASSWORD)
        .await
        .unwrap();
    let mut session = test.app.session().subscribe();
    let _ = session.borrow_and_update();

    test.app.session().expiry_signal().raise("JWT expired");
    tokio::time::timeout(Duration::from_secs(1), session.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(!session.borrow().is_authenticated());
}

#[tokio::test]
async fn test_menu_follows_role() {
    let test = TestApp::started().await;
    let table = test.app.guard().table();

    let driver: Vec<&str> = table
        .menu_for(Role::Driver)
        .iter()
        .map(|route| route.path.as_str())
        .collect();
    assert_eq!(driver, vec!["/", "/returns"]);
}
