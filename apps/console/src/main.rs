mod render;
mod settings;
mod shell;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{BroadcastNotifier, ContactsController, EventsController, RestGateway};
use shared::domain::UserId;
use tracing::info;
use tracing_subscriber::EnvFilter;

use settings::load_settings;

#[derive(Parser, Debug)]
#[command(name = "admin-console", about = "Manage contacts and event groups from the terminal")]
struct Args {
    /// Settings file; defaults to ./console.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Backend base url, e.g. http://127.0.0.1:8080/api
    #[arg(long, global = true)]
    server_url: Option<String>,
    #[command(subcommand)]
    screen: Screen,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Screen {
    /// Contacts belonging to one user
    Contacts { user_id: i64 },
    /// Events and event groups
    Events,
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    settings.apply_overrides(args.server_url);
    init_tracing(&settings.log_filter);

    let gateway = Arc::new(
        RestGateway::new(&settings.server_url, settings.request_timeout())
            .with_context(|| format!("invalid server url '{}'", settings.server_url))?,
    );
    let notifier = Arc::new(BroadcastNotifier::default());
    let toasts = notifier.subscribe();
    info!(server_url = %gateway.base_url(), "admin console starting");

    match args.screen {
        Screen::Contacts { user_id } => {
            let controller = ContactsController::new(UserId(user_id), gateway, notifier);
            // A failed load is reported as a toast; the shell still opens.
            let _ = controller.mount().await;
            let result = shell::run(controller.as_ref(), toasts).await;
            controller.unmount();
            result
        }
        Screen::Events => {
            let controller = EventsController::new(gateway, notifier);
            let _ = controller.mount().await;
            let result = shell::run(controller.as_ref(), toasts).await;
            controller.unmount();
            result
        }
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
