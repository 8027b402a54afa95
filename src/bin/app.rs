use adapter::database::database_from_config;
use anyhow::{Context, Result};
use api::route::{health::build_health_check_routers, v1};
use axum::Router;
use registry::AppRegistry;
use shared::config::AppConfig;
use shared::env::{which, Environment};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    init_logger()?;
    bootstrap().await
}

fn init_logger() -> Result<()> {
    let log_level = match which() {
        Environment::Development => "debug",
        Environment::Production => "info",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

fn log_environment(app_config: &AppConfig) {
    tracing::info!("API_HOST: {}", app_config.api.host);
    tracing::info!("API_PORT: {}", app_config.api.port);
    tracing::info!("USE_POSTGRES: {}", app_config.general.use_postgres);
    tracing::info!("POSTGRESQL_HOST: {}", app_config.postgres.host);
    tracing::info!("POSTGRESQL_PORT: {}", app_config.postgres.port);
    tracing::info!("POSTGRESQL_DB_NAME: {}", app_config.postgres.db_name);
    tracing::info!("POSTGRESQL_USER_NAME: {}", app_config.postgres.user_name);
    tracing::info!("SQLITE_PATH: {}", app_config.sqlite.path);
    tracing::info!(
        "REQUEST_TIMEOUT_IN_S: {}",
        app_config.general.request_timeout_in_s
    );
}

async fn bootstrap() -> Result<()> {
    let app_config = AppConfig::new()?;
    log_environment(&app_config);

    let db = database_from_config(&app_config);
    let registry = AppRegistry::new(db, &app_config);

    let app = Router::new()
        .merge(build_health_check_routers())
        .merge(v1::routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .with_state(registry);

    let addr = format!("{}:{}", app_config.api.host, app_config.api.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app)
        .await
        .context("Unexpected error happened in server")
        .inspect_err(|e| {
            tracing::error!(
                error.cause_chain = ?e, error.message = %e, "Unexpected error"
            )
        })
}
