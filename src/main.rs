//! Waypost service binary.
//!
//! Boots the onboarding-wizard progression and entitlement service: loads
//! configuration from the environment, initializes tracing, connects the
//! PostgreSQL pool, wires the adapters into the API router, and serves
//! until SIGTERM/ctrl-c.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use waypost::adapters::auth::JwtTokenVerifier;
use waypost::adapters::http::api_router;
use waypost::adapters::http::entitlement::EntitlementAppState;
use waypost::adapters::http::middleware::AuthState;
use waypost::adapters::http::wizard::WizardAppState;
use waypost::adapters::postgres::{
    PostgresPlanReader, PostgresProgressRepository, PostgresStepRepository,
    PostgresStepTypeReader, PostgresUsageStore, PostgresWizardRepository,
};
use waypost::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await?;

    let wizard_state = WizardAppState {
        wizard_repository: Arc::new(PostgresWizardRepository::new(pool.clone())),
        step_repository: Arc::new(PostgresStepRepository::new(pool.clone())),
        step_type_reader: Arc::new(PostgresStepTypeReader::new(pool.clone())),
        progress_repository: Arc::new(PostgresProgressRepository::new(pool.clone())),
    };
    let entitlement_state = EntitlementAppState {
        plan_reader: Arc::new(PostgresPlanReader::new(pool.clone())),
        usage_store: Arc::new(PostgresUsageStore::new(pool.clone())),
        quota_policies: config.quota.quota_policies(),
    };
    let verifier: AuthState = Arc::new(JwtTokenVerifier::new(&config.auth));

    let mut app = api_router(wizard_state, entitlement_state, verifier)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(cors_layer(&config))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new());
    if config.features.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }

    let addr = config.server.socket_addr();
    tracing::info!(%addr, environment = ?config.server.environment, "waypost listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("waypost shut down cleanly");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.features.json_logs || config.server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
