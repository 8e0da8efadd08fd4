//! Test fixtures and data factories

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use storepulse::backend::InMemoryBackend;
use storepulse::config::Config;
use storepulse::preferences::MemoryPreferenceStore;
use storepulse::{Alert, AppContext, Identity, Role};
use uuid::Uuid;

pub const DEFAULT_PASSWORD: &str = "afeet10";
pub const STORE_ID: &str = "store-042";

/// Seeded accounts shared by the integration suites
pub struct AccountFixture;

impl AccountFixture {
    pub const ADMIN_EMAIL: &'static str = "admin@example.com";
    pub const STORE_EMAIL: &'static str = "loja42@example.com";
    pub const DRIVER_EMAIL: &'static str = "driver@example.com";
    pub const NEWCOMER_EMAIL: &'static str = "newcomer@example.com";
    pub const PASSWORD: &'static str = "validPass1";

    pub fn backend() -> InMemoryBackend {
        InMemoryBackend::new(DEFAULT_PASSWORD)
            .with_account(
                Self::ADMIN_EMAIL,
                Self::PASSWORD,
                Identity::new("u-admin", "admin", Role::Admin),
            )
            .with_account(
                Self::STORE_EMAIL,
                Self::PASSWORD,
                Identity::new("u-store", "loja42", Role::Store).with_store(STORE_ID),
            )
            .with_account(
                Self::DRIVER_EMAIL,
                Self::PASSWORD,
                Identity::new("u-driver", "driver", Role::Driver),
            )
            .with_account(
                Self::NEWCOMER_EMAIL,
                DEFAULT_PASSWORD,
                Identity::new("u-new", "newcomer", Role::Supervisor),
            )
    }
}

/// Factory for alerts addressed to the fixture store
pub struct AlertFactory;

impl AlertFactory {
    pub fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    /// Alert created `minutes` after the base time
    pub fn at(minutes: i64) -> Alert {
        Alert {
            id: format!("alert-{}", &Uuid::new_v4().to_string()[..8]),
            title: format!("Goal update +{}m", minutes),
            message: "Weekly goal progress is available".to_string(),
            created_at: Self::base_time() + Duration::minutes(minutes),
            expires_at: None,
            store_id: STORE_ID.to_string(),
        }
    }

    pub fn for_store(store_id: &str, minutes: i64) -> Alert {
        Alert {
            store_id: store_id.to_string(),
            ..Self::at(minutes)
        }
    }
}

/// An app context wired to a seeded in-memory backend
pub struct TestApp {
    pub backend: Arc<InMemoryBackend>,
    pub app: AppContext,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_backend(AccountFixture::backend()).await
    }

    pub async fn with_backend(backend: InMemoryBackend) -> Self {
        let backend = Arc::new(backend);
        let app = AppContext::new(
            Config::default(),
            backend.clone(),
            backend.clone(),
            Arc::new(MemoryPreferenceStore::new()),
            1440,
        )
        .await
        .expect("default config is valid");
        Self { backend, app }
    }

    /// Resolved, signed-out context
    pub async fn started() -> Self {
        let test = Self::new().await;
        test.app.start().await;
        test
    }
}
