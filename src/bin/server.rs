//! salescall server: HTTP API for the contact store, VAPI calls and
//! brochure Q&A.
//!
//! Usage:
//!   DATABASE_URL=sqlite://contacts.db VAPI_ASSISTANT_ID=... VAPI_PHONE_NUMBER_ID=... \
//!   VAPI_API_KEY=... OPENAI_API_KEY=... salescall-server
//!
//! Every variable also has a flag; see `salescall-server --help`.

use clap::Parser;
use salescall_lib::db::Database;
use salescall_lib::http_server::{self, AppState};
use salescall_lib::settings::{Config, LogFormat};
use std::sync::Arc;
use tracing::{error, info};

fn init_tracing(config: &Config) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match config.verbose {
        0 => "salescall_server=info,salescall_lib=info,tower_http=info",
        1 => "salescall_server=debug,salescall_lib=debug,tower_http=debug",
        _ => "salescall_server=trace,salescall_lib=trace,tower_http=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match config.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() {
    let config = Config::parse();
    init_tracing(&config);

    if let Err(e) = config.validate() {
        error!(error = %e, "invalid configuration");
        std::process::exit(1);
    }

    let db = match Database::open(&config.database_url) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            error!(error = %e, "Failed to open database");
            std::process::exit(1);
        }
    };
    info!(path = %db.get_path(), "Database opened");

    let state = match AppState::from_config(&config, db) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build outbound clients");
            std::process::exit(1);
        }
    };

    let app = http_server::router(state);

    let listener = match tokio::net::TcpListener::bind(&config.bind).await {
        Ok(l) => l,
        Err(e) => {
            error!(error = %e, bind = %config.bind, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!(bind = %config.bind, "Listening");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
