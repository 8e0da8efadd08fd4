//! Helper functions for creating and classifying errors

use super::types::DashboardError;

/// Postgres `insufficient_privilege`, surfaced by row-level security
const PERMISSION_DENIED_CODE: &str = "42501";
/// PostgREST "no rows returned" for single-object requests
const NOT_FOUND_CODE: &str = "PGRST116";

impl DashboardError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn auth<S: Into<String>>(message: S) -> Self {
        Self::Auth(message.into())
    }

    pub fn session_expired<S: Into<String>>(message: S) -> Self {
        Self::SessionExpired(message.into())
    }

    pub fn permission<S: Into<String>>(message: S) -> Self {
        Self::Permission(message.into())
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn backend<S: Into<String>>(code: Option<String>, status: Option<u16>, message: S) -> Self {
        Self::Backend {
            code,
            status,
            message: message.into(),
        }
    }
}

impl DashboardError {
    /// The caller lacks access to the resource
    pub fn is_permission_denied(&self) -> bool {
        match self {
            Self::Permission(_) => true,
            Self::Backend { code, status, .. } => {
                code.as_deref() == Some(PERMISSION_DENIED_CODE) || *status == Some(403)
            }
            _ => false,
        }
    }

    /// The resource no longer exists
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Backend { code, status, .. } => {
                code.as_deref() == Some(NOT_FOUND_CODE) || *status == Some(404)
            }
            _ => false,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }

    /// Transient failures that never imply a permission or identity change
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Backend { status, .. } => matches!(status, Some(502..=504)),
            _ => false,
        }
    }

    /// Message suitable for inline display next to a form input
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg)
            | Self::Auth(msg)
            | Self::SessionExpired(msg)
            | Self::Permission(msg)
            | Self::Network(msg)
            | Self::NotFound(msg) => msg.clone(),
            Self::Backend { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
