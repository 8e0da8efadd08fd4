//! Declarative route table

use crate::auth::rbac::{RoleRegistry, RoleSet, Section, is_allowed};
use crate::config::{RouteEntry, RoutesConfig};
use crate::core::models::Role;
use serde::Serialize;
use tracing::warn;

/// Who may open a route
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "roles", rename_all = "snake_case")]
pub enum Access {
    /// Bypasses the guard entirely
    Public,
    /// Requires an authenticated identity whose role is in the set
    Protected(RoleSet),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Path pattern; `:name` segments match any single segment
    pub path: String,
    pub view: String,
    pub access: Access,
    /// Sidebar label; routes without one stay out of the menu
    pub menu_label: Option<String>,
}

impl Route {
    fn protected(path: &str, view: &str, section: Section, menu_label: Option<&str>) -> Self {
        Self {
            path: path.to_string(),
            view: view.to_string(),
            access: Access::Protected(RoleRegistry::roles_for(section)),
            menu_label: menu_label.map(str::to_string),
        }
    }

    fn public(path: &str, view: &str) -> Self {
        Self {
            path: normalize_path(path),
            view: view.to_string(),
            access: Access::Public,
            menu_label: None,
        }
    }

    pub fn is_public(&self) -> bool {
        matches!(self.access, Access::Public)
    }

    /// Whether `role` passes this route's role set. Public routes admit everyone.
    pub fn admits(&self, role: Role) -> bool {
        match &self.access {
            Access::Public => true,
            Access::Protected(roles) => is_allowed(role, roles),
        }
    }

    fn matches(&self, path: &str) -> bool {
        let pattern: Vec<&str> = segments(&self.path).collect();
        let actual: Vec<&str> = segments(path).collect();

        pattern.len() == actual.len()
            && pattern
                .iter()
                .zip(&actual)
                .all(|(p, a)| p.starts_with(':') || p == a)
    }
}

impl From<&RouteEntry> for Route {
    fn from(entry: &RouteEntry) -> Self {
        Self {
            path: normalize_path(&entry.path),
            view: entry.view.clone(),
            access: Access::Protected(entry.roles.clone()),
            menu_label: entry.menu_label.clone(),
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Strip query, fragment and trailing slash
pub(crate) fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Static mapping from path to view and access rule
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    sign_in_path: String,
    first_access_path: String,
    home_path: String,
}

impl RouteTable {
    /// Built-in dashboard routes plus any configured extras
    pub fn dashboard(config: &RoutesConfig) -> Self {
        let mut routes = vec![
            Route::public(&config.sign_in_path, "sign_in"),
            Route::public(&config.reset_password_path, "reset_password"),
            Route::public(&config.first_access_path, "first_access"),
            Route::protected("/", "dashboard", Section::Dashboard, Some("Dashboard")),
            Route::protected("/evaluations", "evaluations", Section::Evaluations, Some("Evaluations")),
            Route::protected("/evaluations/:id", "evaluation_detail", Section::Evaluations, None),
            Route::protected("/rankings", "rankings", Section::Rankings, Some("Rankings")),
            Route::protected("/goals", "goals", Section::Goals, Some("Goals")),
            Route::protected("/trainings", "trainings", Section::Trainings, Some("Trainings")),
            Route::protected("/returns", "returns", Section::Returns, Some("Returns")),
            Route::protected("/feedback", "feedback", Section::Feedback, Some("Feedback")),
            Route::protected("/alerts", "alerts", Section::Alerts, Some("Alerts")),
            Route::protected("/alert-center", "alert_center", Section::AlertCenter, Some("Alert center")),
            Route::protected("/stores", "stores", Section::Stores, Some("Stores")),
            Route::protected("/users", "users", Section::Users, Some("Users")),
            Route::protected("/settings", "settings", Section::Settings, Some("Settings")),
        ];

        for entry in &config.extra {
            let route = Route::from(entry);
            match routes.iter_mut().find(|r| r.path == route.path) {
                Some(existing) if existing.is_public() => {
                    warn!("Ignoring configured route {}: path is public", entry.path);
                }
                Some(existing) => *existing = route,
                None => routes.push(route),
            }
        }

        Self {
            routes,
            sign_in_path: normalize_path(&config.sign_in_path),
            first_access_path: normalize_path(&config.first_access_path),
            home_path: normalize_path(&config.home_path),
        }
    }

    /// First route matching `path` (query and trailing slash ignored)
    pub fn lookup(&self, path: &str) -> Option<&Route> {
        let path = normalize_path(path);
        self.routes.iter().find(|route| route.matches(&path))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Menu entries visible to `role`, in table order
    pub fn menu_for(&self, role: Role) -> Vec<&Route> {
        self.routes
            .iter()
            .filter(|route| route.menu_label.is_some() && !route.is_public())
            .filter(|route| route.admits(role))
            .collect()
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in_path
    }

    pub fn first_access_path(&self) -> &str {
        &self.first_access_path
    }

    pub fn home_path(&self) -> &str {
        &self.home_path
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::dashboard(&RoutesConfig::default())
    }
}
