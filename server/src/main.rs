use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::service::TowerToHyperService;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use server::auth::TokenKeys;
use server::database::create_tables;
use server::pipeline::api_service;
use server::security::MemoryStore;
use server::AppState;

use shared::config::{load_config, LiveConfig};

#[derive(Parser, Debug)]
#[command(about = "Invitation backend server")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config))?;

    let access_secret = config
        .auth
        .resolved_access_secret()
        .context("No access-token secret configured (JWT_SECRET or [auth].access_secret)")?;
    let refresh_secret = config
        .auth
        .resolved_refresh_secret()
        .context("No refresh-token secret configured (JWT_SECRET_REFRESH or [auth].refresh_secret)")?;
    let keys = Arc::new(TokenKeys::new(
        &access_secret,
        &refresh_secret,
        config.auth.access_expiry_secs,
        config.auth.refresh_expiry_secs,
    ));

    let connect_options = SqliteConnectOptions::from_str(&config.database.url)
        .context("Invalid database URL")?
        .create_if_missing(true);
    let db = SqlitePoolOptions::new()
        .max_connections(config.server.max_connections as u32)
        .connect_with(connect_options)
        .await
        .context("Failed to open database")?;
    create_tables(&db).await.context("Failed to run schema setup")?;

    let addr: SocketAddr = config
        .server
        .addr()
        .parse()
        .context("Invalid bind address")?;

    let state = AppState {
        db,
        config: LiveConfig::new(config.clone()),
        keys,
        counters: Arc::new(MemoryStore::new()),
    };

    let service = api_service::<hyper::body::Incoming>(state, &config);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .context("Failed to accept connection")?;
        let io = TokioIo::new(stream);
        let conn_service = TowerToHyperService::new(service.clone());

        tokio::task::spawn(async move {
            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, conn_service)
                .await
            {
                error!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }
}
