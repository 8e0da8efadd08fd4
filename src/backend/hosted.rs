//! HTTP client for the hosted backend-as-a-service
//!
//! Speaks the GoTrue-style auth endpoints (`/auth/v1/*`) and a handful of
//! PostgREST RPC functions (`/rest/v1/rpc/*`) for profiles and alerts.

use super::{AlertBackend, AuthBackend, AuthGrant};
use crate::config::{AuthConfig, BackendConfig};
use crate::core::models::{Alert, Identity, Role};
use crate::utils::error::{DashboardError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Auth error codes meaning the bearer token is no longer usable
const EXPIRED_SESSION_CODES: &[&str] = &["session_expired", "session_not_found", "bad_jwt"];

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    user_metadata: Value,
}

#[derive(Debug, Deserialize)]
struct ProfileRow {
    id: String,
    username: String,
    role: String,
    #[serde(default)]
    store_id: Option<String>,
}

/// Error payloads come in two generations: `{error, error_description}` and
/// `{code, error_code, msg}`; PostgREST uses `{code, message}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    code: Option<Value>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

impl ErrorPayload {
    fn code(&self) -> Option<String> {
        if let Some(code) = &self.error_code {
            return Some(code.clone());
        }
        match &self.code {
            Some(Value::String(code)) => Some(code.clone()),
            _ => self.error.clone(),
        }
    }

    fn message(&self, status: StatusCode) -> String {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unexpected backend response")
                    .to_string()
            })
    }
}

/// Hosted auth + alert backend
#[derive(Debug)]
pub struct HostedBackend {
    client: Client,
    base_url: Url,
    anon_key: String,
    default_password: String,
    access_token: RwLock<Option<String>>,
}

impl HostedBackend {
    pub fn new(backend: &BackendConfig, auth: &AuthConfig) -> Result<Self> {
        if !backend.is_configured() {
            return Err(DashboardError::config("Backend URL is not configured"));
        }

        let mut base_url = Url::parse(&backend.url)
            .map_err(|e| DashboardError::config(format!("Backend URL is invalid: {}", e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(backend.timeout))
            .build()?;

        info!("Hosted backend client created for {}", base_url);

        Ok(Self {
            client,
            base_url,
            anon_key: backend.anon_key.clone(),
            default_password: auth.default_password.clone(),
            access_token: RwLock::new(None),
        })
    }

    /// Restore a token persisted by an earlier run
    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        *self.access_token.write() = Some(token.into());
        self
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token.read().clone()
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| DashboardError::config(format!("Invalid endpoint {}: {}", path, e)))
    }

    fn request(&self, builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        let bearer = token.unwrap_or(&self.anon_key);
        builder
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    fn require_token(&self) -> Result<String> {
        self.access_token()
            .ok_or_else(|| DashboardError::session_expired("Auth session missing"))
    }

    async fn send(&self, builder: RequestBuilder, authenticated: bool) -> Result<Response> {
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() || e.is_request() {
                DashboardError::network(e.to_string())
            } else {
                DashboardError::Http(e)
            }
        })?;

        if response.status().is_success() {
            return Ok(response);
        }

        Err(self.error_from_response(response, authenticated).await)
    }

    async fn error_from_response(&self, response: Response, authenticated: bool) -> DashboardError {
        let status = response.status();
        let payload: ErrorPayload = response.json().await.unwrap_or_default();
        let code = payload.code();
        let message = payload.message(status);

        let expired_code = code
            .as_deref()
            .is_some_and(|c| EXPIRED_SESSION_CODES.contains(&c));
        if authenticated && (status == StatusCode::UNAUTHORIZED || expired_code) {
            warn!("Backend rejected session: {}", message);
            *self.access_token.write() = None;
            return DashboardError::session_expired(message);
        }

        debug!("Backend error {} ({:?}): {}", status, code, message);
        DashboardError::backend(code, Some(status.as_u16()), message)
    }

    async fn rpc<T: serde::de::DeserializeOwned>(&self, function: &str, body: Value) -> Result<T> {
        let token = self.require_token()?;
        let url = self.endpoint(&format!("rest/v1/rpc/{}", function))?;
        let builder = self.request(self.client.post(url), Some(&token)).json(&body);
        let response = self.send(builder, true).await?;
        Ok(response.json().await?)
    }

    async fn rpc_unit(&self, function: &str, body: Value, token: Option<&str>) -> Result<()> {
        let url = self.endpoint(&format!("rest/v1/rpc/{}", function))?;
        let builder = self.request(self.client.post(url), token).json(&body);
        self.send(builder, token.is_some()).await?;
        Ok(())
    }

    async fn load_identity(&self, user_id: &str) -> Result<Identity> {
        let rows: Vec<ProfileRow> = self
            .rpc("get_user_profile", json!({ "p_user_id": user_id }))
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DashboardError::auth("User profile not found"))?;

        let role: Role = row
            .role
            .parse()
            .map_err(|_| DashboardError::auth(format!("Unrecognized role '{}'", row.role)))?;

        Ok(Identity {
            id: row.id,
            username: row.username,
            role,
            store_id: row.store_id,
        })
    }

    async fn grant_for(&self, user: AuthUser, password: Option<&str>) -> Result<AuthGrant> {
        let identity = self.load_identity(&user.id).await?;
        let flagged = user
            .user_metadata
            .get("first_access")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let on_default = password.is_some_and(|p| p == self.default_password);

        Ok(AuthGrant {
            identity,
            first_access: flagged || on_default,
        })
    }
}

#[async_trait]
impl AuthBackend for HostedBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthGrant> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let builder = self
            .request(self.client.post(url), None)
            .json(&json!({ "email": email, "password": password }));

        let token: TokenResponse = match self.send(builder, false).await {
            Ok(response) => response.json().await?,
            Err(DashboardError::Backend { message, status, .. })
                if matches!(status, Some(400) | Some(401)) =>
            {
                return Err(DashboardError::auth(message));
            }
            Err(e) => return Err(e),
        };

        *self.access_token.write() = Some(token.access_token);
        match self.grant_for(token.user, Some(password)).await {
            Ok(grant) => Ok(grant),
            Err(e) => {
                *self.access_token.write() = None;
                Err(e)
            }
        }
    }

    async fn sign_out(&self) -> Result<()> {
        let Some(token) = self.access_token.write().take() else {
            return Ok(());
        };

        let url = self.endpoint("auth/v1/logout")?;
        let builder = self.request(self.client.post(url), Some(&token));
        // The token is already discarded locally; a rejected logout only means the
        // server-side session was gone.
        match self.send(builder, false).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_retryable() => Err(e),
            Err(e) => {
                debug!("Ignoring logout rejection: {}", e);
                Ok(())
            }
        }
    }

    async fn reset_password(&self, email: &str) -> Result<()> {
        self.rpc_unit("reset_password_to_default", json!({ "p_email": email }), None)
            .await
    }

    async fn update_password(&self, new_password: &str) -> Result<()> {
        let token = self.require_token()?;
        let url = self.endpoint("auth/v1/user")?;
        let builder = self
            .request(self.client.put(url), Some(&token))
            .json(&json!({ "password": new_password, "data": { "first_access": false } }));
        self.send(builder, true).await?;
        Ok(())
    }

    async fn current_session(&self) -> Result<Option<AuthGrant>> {
        let Some(token) = self.access_token() else {
            return Ok(None);
        };

        let url = self.endpoint("auth/v1/user")?;
        let builder = self.request(self.client.get(url), Some(&token));
        let user: AuthUser = match self.send(builder, true).await {
            Ok(response) => response.json().await?,
            Err(DashboardError::SessionExpired(reason)) => {
                debug!("Stored session no longer valid: {}", reason);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        self.grant_for(user, None).await.map(Some)
    }
}

#[async_trait]
impl AlertBackend for HostedBackend {
    async fn fetch_unread(&self, store_id: &str) -> Result<Vec<Alert>> {
        self.rpc("get_unread_alerts", json!({ "p_store_id": store_id }))
            .await
    }

    async fn acknowledge(&self, alert_id: &str, store_id: &str) -> Result<()> {
        let token = self.require_token()?;
        self.rpc_unit(
            "mark_alert_viewed",
            json!({ "p_alert_id": alert_id, "p_store_id": store_id }),
            Some(&token),
        )
        .await
    }
}
