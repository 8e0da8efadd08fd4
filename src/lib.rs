//! # StorePulse
//!
//! Access control and session liveness for a role-based retail performance
//! dashboard. The dashboard itself is a thin layer over a hosted backend; this
//! crate holds the parts with real invariants:
//!
//! - **Role registry**: closed role set, pure `is_allowed`, per-role menus
//! - **Route guard**: resolves every navigation to render, redirect or deny
//! - **Session store**: observable identity with stale-response protection
//! - **Liveness poller**: visibility- and connectivity-aware alert refresh
//! - **Sidebar preferences**: persisted layout with a viewport default
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use storepulse::{AppContext, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/storepulse.yaml").await?;
//!     let app = AppContext::hosted(config, 1440).await?;
//!     app.start().await;
//!
//!     let mut view = app.view("/settings");
//!     println!("{:?}", view.state());
//!
//!     let landing = app.sign_in("admin@example.com", "secret").await?;
//!     println!("{:?}", view.navigate(&landing));
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod app;
pub mod auth;
pub mod backend;
pub mod config;
pub mod core;
pub mod notifications;
pub mod preferences;
pub mod routing;
pub mod utils;

// Re-export main types
pub use app::AppContext;
pub use auth::{RoleRegistry, RoleSet, Section, SessionState, SessionStore, is_allowed};
pub use backend::{AlertBackend, AuthBackend, HostedBackend, InMemoryBackend};
pub use config::Config;
pub use core::models::{Alert, Identity, Role};
pub use notifications::{AlertInbox, LivenessPoller, PageEnvironment, PollerHandle, Visibility};
pub use preferences::{Sidebar, SidebarState};
pub use routing::{GuardState, GuardedView, RouteGuard, RouteTable};
pub use utils::error::{DashboardError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Build metadata stamped by `build.rs`
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_time: &'static str,
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
