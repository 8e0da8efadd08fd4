//! Alert inbox lifecycle through the app context

use crate::common::{AccountFixture, AlertFactory, STORE_ID, TestApp};
use std::time::Duration;
use storepulse::backend::AckFailure;
use storepulse::notifications::{AckOutcome, GoneReason};
use storepulse::Visibility;
use tokio::time::sleep;

async fn store_app() -> TestApp {
    let backend = AccountFixture::backend()
        .with_alert(AlertFactory::at(0))
        .with_alert(AlertFactory::at(45))
        .with_alert(AlertFactory::for_store("store-007", 10));
    let test = TestApp::with_backend(backend).await;
    test.app.start().await;
    test.app
        .sign_in(AccountFixture::STORE_EMAIL, AccountFixture::PASSWORD)
        .await
        .unwrap();
    test
}

#[tokio::test]
async fn test_store_sign_in_loads_own_alerts() {
    let test = store_app().await;

    let inbox = test.app.inbox().unwrap();
    assert_eq!(inbox.store_id(), STORE_ID);
    let unread = inbox.unread();
    assert_eq!(unread.len(), 2);
    assert!(unread[0].created_at > unread[1].created_at);
    assert!(unread.iter().all(|alert| alert.store_id == STORE_ID));
}

#[tokio::test]
async fn test_non_store_roles_have_no_inbox() {
    let test = TestApp::started().await;
    test.app
        .sign_in(AccountFixture::ADMIN_EMAIL, AccountFixture::PASSWORD)
        .await
        .unwrap();

    assert!(test.app.inbox().is_none());
}

#[tokio::test]
async fn test_sign_out_detaches_inbox() {
    let test = store_app().await;
    assert!(test.app.inbox().is_some());

    test.app.sign_out().await;
    assert!(test.app.inbox().is_none());
}

#[tokio::test]
async fn test_acknowledge_removes_alert_for_good() {
    let test = store_app().await;
    let inbox = test.app.inbox().unwrap();
    let first = inbox.unread()[0].id.clone();

    assert_eq!(inbox.mark_viewed(&first).await, AckOutcome::Acknowledged);
    inbox.refresh().await.unwrap();
    assert_eq!(inbox.unread_count(), 1);
}

#[tokio::test]
async fn test_permission_denied_acknowledgement_stays_removed() {
    let test = store_app().await;
    let inbox = test.app.inbox().unwrap();
    let first = inbox.unread()[0].id.clone();
    test.backend
        .fail_acknowledgements(Some(AckFailure::code("42501", "permission denied for table")));

    let outcome = inbox.mark_viewed(&first).await;
    assert_eq!(outcome, AckOutcome::AlreadyGone(GoneReason::PermissionDenied));
    assert!(inbox.unread().iter().all(|alert| alert.id != first));
}

#[tokio::test]
async fn test_offline_acknowledgement_is_retried_later() {
    let test = store_app().await;
    let inbox = test.app.inbox().unwrap();
    let mut notices = inbox.notices();
    let first = inbox.unread()[0].id.clone();
    test.backend.set_offline(true);

    assert_eq!(inbox.mark_viewed(&first).await, AckOutcome::Retained);
    assert_eq!(inbox.unread()[0].id, first);
    assert!(notices.try_recv().is_ok());

    test.backend.set_offline(false);
    assert_eq!(inbox.mark_viewed(&first).await, AckOutcome::Acknowledged);
}

#[tokio::test(start_paused = true)]
async fn test_focus_and_reconnect_pick_up_new_alerts() {
    let test = store_app().await;
    let inbox = test.app.inbox().unwrap();
    let environment = test.app.environment();

    test.backend.publish_alert(AlertFactory::at(90));
    environment.focus();
    sleep(Duration::from_millis(1)).await;
    assert_eq!(inbox.unread_count(), 3);

    environment.set_online(false);
    test.backend.publish_alert(AlertFactory::at(120));
    sleep(Duration::from_secs(5)).await;
    assert_eq!(inbox.unread_count(), 3);

    environment.set_online(true);
    sleep(Duration::from_millis(1)).await;
    assert_eq!(inbox.unread_count(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_hidden_page_stops_polling() {
    let test = store_app().await;
    let inbox = test.app.inbox().unwrap();
    let environment = test.app.environment();

    environment.set_visibility(Visibility::Hidden);
    test.backend.publish_alert(AlertFactory::at(90));
    sleep(Duration::from_secs(600)).await;
    assert_eq!(inbox.unread_count(), 2);

    environment.set_visibility(Visibility::Visible);
    sleep(Duration::from_millis(1)).await;
    assert_eq!(inbox.unread_count(), 3);
}
