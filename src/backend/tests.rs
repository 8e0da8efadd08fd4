//! Tests for backend implementations

#[cfg(test)]
mod tests {
    use crate::backend::{AckFailure, AlertBackend, AuthBackend, HostedBackend, InMemoryBackend};
    use crate::config::{AuthConfig, BackendConfig};
    use crate::core::models::{Alert, Identity, Role};
    use crate::utils::error::DashboardError;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hosted(server: &MockServer) -> HostedBackend {
        let backend = BackendConfig {
            url: server.uri(),
            anon_key: "anon-key".to_string(),
            timeout: 5,
        };
        HostedBackend::new(&backend, &AuthConfig::default()).unwrap()
    }

    async fn mount_profile(server: &MockServer, role: &str, store_id: Option<&str>) {
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_user_profile"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "u-1",
                "username": "loja01",
                "role": role,
                "store_id": store_id,
            }])))
            .mount(server)
            .await;
    }

    fn token_body(first_access: bool) -> serde_json::Value {
        json!({
            "access_token": "user-token",
            "token_type": "bearer",
            "user": { "id": "u-1", "user_metadata": { "first_access": first_access } }
        })
    }

    // ==================== Hosted backend ====================

    #[tokio::test]
    async fn test_hosted_sign_in_loads_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon-key"))
            .and(body_json(json!({ "email": "user@example.com", "password": "secret1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body(false)))
            .expect(1)
            .mount(&server)
            .await;
        mount_profile(&server, "store", Some("store-7")).await;

        let backend = hosted(&server);
        let grant = backend.sign_in("user@example.com", "secret1").await.unwrap();

        assert_eq!(grant.identity.role, Role::Store);
        assert_eq!(grant.identity.store_id.as_deref(), Some("store-7"));
        assert!(!grant.first_access);
        assert_eq!(backend.access_token().as_deref(), Some("user-token"));
    }

    #[tokio::test]
    async fn test_hosted_sign_in_flags_default_credential() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body(false)))
            .mount(&server)
            .await;
        mount_profile(&server, "admin", None).await;

        let grant = hosted(&server)
            .sign_in("user@example.com", "afeet10")
            .await
            .unwrap();
        assert!(grant.first_access);
    }

    #[tokio::test]
    async fn test_hosted_sign_in_surfaces_backend_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 400,
                "error_code": "invalid_credentials",
                "msg": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let err = hosted(&server)
            .sign_in("user@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::Auth(msg) if msg == "Invalid login credentials"));
    }

    #[tokio::test]
    async fn test_hosted_sign_in_rejects_unknown_role() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body(false)))
            .mount(&server)
            .await;
        mount_profile(&server, "superuser", None).await;

        let backend = hosted(&server);
        let err = backend.sign_in("user@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, DashboardError::Auth(msg) if msg.contains("superuser")));
        assert!(backend.access_token().is_none());
    }

    #[tokio::test]
    async fn test_hosted_acknowledge_maps_permission_denied() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/mark_alert_viewed"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "code": "42501",
                "message": "permission denied for table alert_views"
            })))
            .mount(&server)
            .await;

        let backend = hosted(&server).with_access_token("user-token");
        let err = backend.acknowledge("a-1", "store-7").await.unwrap_err();
        assert!(err.is_permission_denied());
        assert!(matches!(err, DashboardError::Backend { code: Some(ref c), .. } if c == "42501"));
    }

    #[tokio::test]
    async fn test_hosted_unauthorized_call_expires_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_unread_alerts"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "PGRST301",
                "message": "JWT expired"
            })))
            .mount(&server)
            .await;

        let backend = hosted(&server).with_access_token("stale-token");
        let err = backend.fetch_unread("store-7").await.unwrap_err();
        assert!(matches!(err, DashboardError::SessionExpired(msg) if msg == "JWT expired"));
        assert!(backend.access_token().is_none());
    }

    #[tokio::test]
    async fn test_hosted_fetch_unread_parses_alerts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/get_unread_alerts"))
            .and(body_json(json!({ "p_store_id": "store-7" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "a-1",
                "title": "Stock audit",
                "message": "Friday 9am",
                "created_at": "2024-05-01T10:00:00Z",
                "expires_at": null,
                "store_id": "store-7"
            }])))
            .mount(&server)
            .await;

        let alerts = hosted(&server)
            .with_access_token("user-token")
            .fetch_unread("store-7")
            .await
            .unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].title, "Stock audit");
    }

    #[tokio::test]
    async fn test_hosted_current_session_without_token() {
        let server = MockServer::start().await;
        assert!(hosted(&server).current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hosted_current_session_with_expired_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": 401,
                "error_code": "bad_jwt",
                "msg": "invalid JWT"
            })))
            .mount(&server)
            .await;

        let backend = hosted(&server).with_access_token("stale-token");
        assert!(backend.current_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_hosted_update_password_requires_session() {
        let server = MockServer::start().await;
        let err = hosted(&server).update_password("validPass1").await.unwrap_err();
        assert!(err.is_session_expired());
    }

    #[tokio::test]
    async fn test_hosted_sign_out_discards_token_even_when_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error_code": "session_not_found",
                "msg": "Session not found"
            })))
            .mount(&server)
            .await;

        let backend = hosted(&server).with_access_token("user-token");
        assert!(backend.sign_out().await.is_ok());
        assert!(backend.access_token().is_none());
    }

    #[test]
    fn test_hosted_requires_url() {
        let err = HostedBackend::new(&BackendConfig::default(), &AuthConfig::default()).unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    // ==================== In-memory backend ====================

    fn alert(id: &str, store: &str, minute: u32) -> Alert {
        Alert {
            id: id.to_string(),
            title: format!("Alert {}", id),
            message: "body".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
            expires_at: None,
            store_id: store.to_string(),
        }
    }

    #[tokio::test]
    async fn test_memory_fetch_filters_store_and_viewed() {
        let backend = InMemoryBackend::new("afeet10")
            .with_alert(alert("a-1", "s-1", 0))
            .with_alert(alert("a-2", "s-1", 5))
            .with_alert(alert("a-3", "s-2", 1));

        let unread = backend.fetch_unread("s-1").await.unwrap();
        let ids: Vec<&str> = unread.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a-2", "a-1"]);

        backend.acknowledge("a-2", "s-1").await.unwrap();
        assert_eq!(backend.fetch_unread("s-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_scripted_ack_failure() {
        let backend = InMemoryBackend::new("afeet10").with_alert(alert("a-1", "s-1", 0));
        backend.fail_acknowledgements(Some(AckFailure::code("42501", "permission denied")));

        let err = backend.acknowledge("a-1", "s-1").await.unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[tokio::test]
    async fn test_memory_reset_restores_default_credential() {
        let backend = InMemoryBackend::new("afeet10").with_account(
            "user@example.com",
            "secret1",
            Identity::new("u-1", "loja01", Role::Store).with_store("s-1"),
        );

        backend.reset_password("user@example.com").await.unwrap();
        let grant = backend.sign_in("user@example.com", "afeet10").await.unwrap();
        assert!(grant.first_access);

        let err = backend.reset_password("nobody@example.com").await.unwrap_err();
        assert_eq!(err.user_message(), "User not found");
    }
}
