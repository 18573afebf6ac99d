//! HTTP server bootstrap.
//!
//! This module wires together:
//! - configuration
//! - the SQLite connection pool and migrations
//! - the publisher registry and proof verification service
//! - the Axum router

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::Router;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use crate::domain::{PublisherRegistry, VerificationKey};
use crate::infra::{AttestationStore, SqliteAttestationStore};
use crate::proof::{ProofVerificationService, RejectAllEngine};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL.
    pub database_url: String,
    /// Server listen address.
    pub listen_addr: SocketAddr,
    /// Maximum database connections.
    pub max_connections: u32,
    /// Path to the snarkjs verification key; absent means the proof
    /// endpoint runs in unavailable mode.
    pub verification_key_path: Option<PathBuf>,
    /// Publisher registrations, `domain=0xaddress` pairs separated by commas.
    pub publishers: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:attestor.db?mode=rwc".to_string());

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .expect("Invalid listen address");

        let max_connections: u32 = std::env::var("MAX_DB_CONNECTIONS")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(10);

        let verification_key_path = std::env::var("VERIFICATION_KEY_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let publishers = std::env::var("PUBLISHERS")
            .ok()
            .filter(|p| !p.trim().is_empty());

        Self {
            database_url,
            listen_addr,
            max_connections,
            verification_key_path,
            publishers,
        }
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub store: Arc<dyn AttestationStore>,
    pub verification: Arc<ProofVerificationService>,
}

/// Start the HTTP server.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting attestor v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded");
    info!("  Listen address: {}", config.listen_addr);
    info!("  Max connections: {}", config.max_connections);

    // Connect to SQLite
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;
    info!("Connected to SQLite at {}", config.database_url);

    info!("Running database migrations...");
    crate::migrations::run_sqlite(&pool).await?;
    info!("Database migrations applied");

    // Publisher registry
    let registry = match &config.publishers {
        Some(spec) => {
            let registry = PublisherRegistry::from_spec(spec)?;
            info!("Registered {} publisher(s)", registry.len());
            registry
        }
        None => {
            warn!("PUBLISHERS not set; attestation ingestion will reject every publisher");
            PublisherRegistry::new()
        }
    };

    let store: Arc<dyn AttestationStore> =
        Arc::new(SqliteAttestationStore::new(pool.clone(), Arc::new(registry)));

    // Proof verification service. Without a key it fails closed rather than
    // refusing to start, so the rest of the API stays usable.
    let verification = match &config.verification_key_path {
        Some(path) => {
            let key = VerificationKey::from_json_file(path)?;
            Arc::new(ProofVerificationService::new(key, Arc::new(RejectAllEngine)))
        }
        None => Arc::new(ProofVerificationService::unavailable(Arc::new(
            RejectAllEngine,
        ))),
    };

    let state = AppState {
        pool,
        store,
        verification,
    };

    // Build router
    let app = build_router()?.with_state(state);

    // Start server
    info!("Starting HTTP server on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;

    info!("Attestor is ready to accept connections");
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}

fn build_router() -> anyhow::Result<Router<AppState>> {
    let mut router = crate::api::router().layer(TraceLayer::new_for_http());

    if let Some(cors_layer) = cors_layer_from_env()? {
        router = router.layer(cors_layer);
    }

    Ok(router)
}

fn cors_layer_from_env() -> anyhow::Result<Option<CorsLayer>> {
    let origins = match std::env::var("CORS_ALLOW_ORIGINS") {
        Ok(v) => v,
        Err(_) => return Ok(None),
    };

    let origins = origins.trim();
    if origins.is_empty() {
        return Ok(None);
    }

    let allow_origin = if origins == "*" {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin {s:?}: {e}"))
            })
            .collect::<anyhow::Result<_>>()?;
        AllowOrigin::list(origins)
    };

    Ok(Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([axum::http::header::CONTENT_TYPE]),
    ))
}
