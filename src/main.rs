//! StorePulse command line
//!
//! Inspect the route table, evaluate guard decisions and follow a store's
//! unread alerts against the configured backend.

#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use storepulse::auth::session::SessionState;
use storepulse::routing::Access;
use storepulse::utils::logging::init_tracing;
use storepulse::{
    Alert, AppContext, Config, DashboardError, Identity, Result, Role, RouteGuard, RouteTable,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "storepulse", version, about = "Dashboard access control toolkit")]
struct Cli {
    /// YAML configuration file; `STOREPULSE_*` variables override it
    #[arg(short, long, env = "STOREPULSE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the route table, or the menu one role sees
    Routes {
        #[arg(long)]
        role: Option<Role>,
    },
    /// Evaluate the route guard for a path
    Check {
        path: String,
        /// Role of the signed-in identity; omit to check signed out
        #[arg(long)]
        role: Option<Role>,
        #[arg(long)]
        store: Option<String>,
        /// Identity still holds the default credential
        #[arg(long)]
        first_access: bool,
    },
    /// Sign in and follow the store's unread alerts until interrupted
    Watch {
        #[arg(long, env = "STOREPULSE_EMAIL")]
        email: String,
        #[arg(long, env = "STOREPULSE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Viewport width used for the sidebar default
        #[arg(long, default_value_t = 1440)]
        viewport: u32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref()).await?;
    init_tracing(config.logging())?;

    match cli.command {
        Command::Routes { role } => {
            print_routes(&RouteTable::dashboard(config.routes()), role);
            Ok(())
        }
        Command::Check {
            path,
            role,
            store,
            first_access,
        } => {
            check(&config, &path, role, store, first_access);
            Ok(())
        }
        Command::Watch {
            email,
            password,
            viewport,
        } => watch(config, &email, &password, viewport).await,
    }
}

async fn load_config(path: Option<&Path>) -> Result<Config> {
    let env = Config::from_env()?;
    match path {
        Some(path) => Ok(Config::from_file(path).await?.merge(env)),
        None => Ok(env),
    }
}

fn print_routes(table: &RouteTable, role: Option<Role>) {
    let routes = match role {
        Some(role) => table.menu_for(role),
        None => table.routes().iter().collect(),
    };

    for route in routes {
        let access = match &route.access {
            Access::Public => "public".to_string(),
            Access::Protected(roles) => roles.to_string(),
        };
        println!("{:<20} {:<20} {}", route.path, route.view, access);
    }
}

fn check(config: &Config, path: &str, role: Option<Role>, store: Option<String>, first_access: bool) {
    let guard = RouteGuard::new(Arc::new(RouteTable::dashboard(config.routes())));
    let session = match role {
        Some(role) => {
            let mut identity = Identity::new("cli", "cli", role);
            if let Some(store) = store {
                identity = identity.with_store(store);
            }
            SessionState::signed_in(identity, first_access)
        }
        None => SessionState::signed_out(),
    };

    let state = guard.evaluate(&session, path);
    match state.redirect() {
        Some(target) => println!("{:?} -> {}", state, target),
        None => println!("{:?}", state),
    }
}

async fn watch(config: Config, email: &str, password: &str, viewport: u32) -> Result<()> {
    if !config.backend().is_configured() {
        return Err(DashboardError::config(
            "No backend configured; set STOREPULSE_BACKEND_URL or backend.url",
        ));
    }

    let app = AppContext::hosted(config, viewport).await?;
    app.start().await;
    let landing = app.sign_in(email, password).await?;
    info!("Signed in, landing on {}", landing);

    let inbox = app.inbox().ok_or_else(|| {
        DashboardError::permission("Only store accounts have an alert inbox")
    })?;
    let mut unread = inbox.subscribe();
    let mut notices = inbox.notices();
    let mut session = app.session().subscribe();

    print_unread(&unread.borrow_and_update());
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                app.sign_out().await;
                break;
            }
            changed = unread.changed() => {
                if changed.is_err() {
                    break;
                }
                print_unread(&unread.borrow_and_update());
            }
            Ok(notice) = notices.recv() => eprintln!("! {}", notice.message),
            changed = session.changed() => {
                if changed.is_err() || !session.borrow_and_update().is_authenticated() {
                    eprintln!("Session ended");
                    break;
                }
            }
        }
    }
    Ok(())
}

fn print_unread(alerts: &[Alert]) {
    println!("{} unread", alerts.len());
    let now = chrono::Utc::now();
    for alert in alerts {
        let flag = if alert.is_expired(now) { " (expired)" } else { "" };
        println!("  [{}] {}{}", alert.created_at.format("%Y-%m-%d %H:%M"), alert.title, flag);
    }
}
