//! Configuration loading and its effect on the app context

use std::sync::Arc;
use std::time::Duration;
use storepulse::backend::InMemoryBackend;
use storepulse::{AppContext, Config, DashboardError, GuardState, Identity, Role, SessionState};
use tempfile::TempDir;

const CONFIG: &str = r#"
auth:
  default_password: "welcome1"
  min_password_length: 8
polling:
  visible_interval_ms: 15000
  hidden_interval_ms: 60000
routes:
  extra:
    - path: /reports
      view: reports
      roles: [financial, admin]
      menu_label: Reports
"#;

async fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("storepulse.yaml");
    tokio::fs::write(&path, content).await.unwrap();
    path
}

#[tokio::test]
async fn test_yaml_config_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG).await;

    let config = Config::from_file(&path).await.unwrap();
    assert_eq!(config.auth().default_password, "welcome1");
    assert_eq!(config.auth().min_password_length, 8);
    assert_eq!(config.polling().visible_interval(), Duration::from_secs(15));
    assert_eq!(config.routes().sign_in_path, "/login");
}

#[tokio::test]
async fn test_configured_route_is_guarded() {
    let dir = TempDir::new().unwrap();
    let config = Config::from_file(write_config(&dir, CONFIG).await)
        .await
        .unwrap();
    let backend = Arc::new(InMemoryBackend::new("welcome1"));
    let app = AppContext::new(
        config.clone(),
        backend.clone(),
        backend,
        AppContext::preference_store(&config),
        1440,
    )
    .await
    .unwrap();

    let financial = SessionState::signed_in(Identity::new("u", "fin", Role::Financial), false);
    let driver = SessionState::signed_in(Identity::new("u", "drv", Role::Driver), false);
    assert!(app.guard().evaluate(&financial, "/reports").is_authorized());
    assert!(matches!(
        app.guard().evaluate(&driver, "/reports"),
        GuardState::Unauthorized { .. }
    ));
}

#[tokio::test]
async fn test_invalid_polling_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "polling:\n  visible_interval_ms: 60000\n  hidden_interval_ms: 1000\n",
    )
    .await;

    let err = Config::from_file(&path).await.unwrap_err();
    assert!(matches!(err, DashboardError::Config(_)));
}

#[tokio::test]
async fn test_route_shadowing_public_path_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "routes:\n  extra:\n    - path: /login\n      view: custom_login\n",
    )
    .await;

    assert!(Config::from_file(&path).await.is_err());
}

#[tokio::test]
async fn test_sidebar_preferences_persist_to_configured_file() {
    let dir = TempDir::new().unwrap();
    let prefs = dir.path().join("sidebar.json");
    let content = format!("preferences:\n  path: {}\n", prefs.display());
    let config = Config::from_file(write_config(&dir, &content).await)
        .await
        .unwrap();

    let backend = Arc::new(InMemoryBackend::new("afeet10"));
    let app = AppContext::new(
        config.clone(),
        backend.clone(),
        backend.clone(),
        AppContext::preference_store(&config),
        800,
    )
    .await
    .unwrap();
    assert!(!app.sidebar().state().open);
    app.sidebar().set_open(true).await.unwrap();
    drop(app);

    let reopened = AppContext::new(
        config.clone(),
        backend.clone(),
        backend,
        AppContext::preference_store(&config),
        800,
    )
    .await
    .unwrap();
    assert!(reopened.sidebar().state().open);
    assert!(reopened.sidebar().state().collapsed);
}
