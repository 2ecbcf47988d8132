//! Documentation of the Tech For Girls registration backend.
//!
//! A single-page form collects name, phone, email, college/department, a screenshot and five
//! WhatsApp shares. This crate is the HTTP side: it validates submissions, keeps them in memory
//! and optionally copies each one into a Google Sheet.
//!
//!
//!
//! # Endpoints
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | POST | `/api/register` | 201 summary, 400 validation/duplicate/malformed, 500 |
//! | GET | `/api/registration-status/{email}` | `{ isRegistered, registration }` |
//! | GET | `/api/stats` | totals, last submission, per-college counts |
//! | GET | `/api/health` | liveness message + timestamp |
//!
//!
//!
//! # Notes
//!
//! ## One Registration per Email
//! Enforced by the store, not the handler. The lookup and the insert happen under the same
//! write lock so double-clicking submit cannot sneak two rows in.
//!
//! ## Screenshots
//! The form only sends the file name. No uploads, no file storage.
//!
//! ## Restarts
//! Everything lives in memory. A restart forgets every registration. If that matters, turn on
//! the sheet webhook and treat the sheet as the durable record. Sheet writes still in flight at
//! shutdown are awaited, for at most twice `SHEETS_TIMEOUT_MS`, before the process exits.
//!
//!
//!
//! # Configuration
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `RUST_PORT` | `1111` | listen port |
//! | `CORS_ORIGIN` | any | allowed browser origin |
//! | `SHEETS_WEBHOOK_URL` | unset | Apps Script web app URL, also read from `/run/secrets/SHEETS_WEBHOOK_URL` |
//! | `SHEETS_TIMEOUT_MS` | `5000` | webhook request timeout |
//! | `RUST_LOG` | unset | `tracing` filter, e.g. `info` |
//!
//!
//!
//! # Setup
//!
//! Run locally.
//! ```sh
//! RUST_LOG=info cargo run
//! ```
//!
//! Walk through the form against a running server.
//! ```sh
//! cargo run -p tester -- --name "Ada Lovelace" --phone +1234567890 --email ada@example.com
//! ```
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::{get, post},
};
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod sheets;
pub mod state;
pub mod storage;
pub mod utils;


use config::Config;
use routes::{health_handler, register_handler, stats_handler, status_handler};
use state::State;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config);

    info!("Starting server...");
    let app = app(state.clone())?;

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.finish_sheet_writes().await;
    info!("Server shut down");

    Ok(())
}

pub fn app(state: Arc<State>) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let cors = match &state.config.cors_origin {
        Some(origin) => cors.allow_origin(origin.parse::<HeaderValue>()?),
        None => cors.allow_origin(Any),
    };

    Ok(Router::new()
        .route("/api/register", post(register_handler))
        .route("/api/registration-status/{email}", get(status_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/health", get(health_handler))
        .layer(cors)
        .with_state(state))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
