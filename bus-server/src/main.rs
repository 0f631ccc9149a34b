use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bus_server::cache::ArrivalCache;
use bus_server::catalog::{AliasError, CatalogReconciler, JsonFileStore, StopAliases};
use bus_server::config::{AppConfig, ConfigError, FeedConfig};
use bus_server::rules::{RuleError, RuleStore};
use bus_server::scheduler::{IntervalTicker, run_periodic};
use bus_server::seta::{FeedSource, MockSetaFeed, SetaClient, SetaError};
use bus_server::web::{AppState, create_router};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("rules: {0}")]
    Rules(#[from] RuleError),

    #[error("stop names: {0}")]
    Aliases(#[from] AliasError),

    #[error("feed: {0}")]
    Feed(#[from] SetaError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "failed to start");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = AppConfig::from_env()?;

    let rules = Arc::new(RuleStore::load(&config.rules_path)?);
    info!(
        arrival_rules = rules.arrival_rules.len(),
        vehicle_rules = rules.vehicle_rules.len(),
        model_rules = rules.model_rules.len(),
        "loaded rules"
    );

    let aliases = Arc::new(StopAliases::load(&config.stop_names_path)?);
    info!(count = aliases.len(), "loaded stop names");

    let feed = Arc::new(match &config.feed {
        FeedConfig::Mock { dir } => {
            info!(dir = %dir.display(), "using mock feed");
            FeedSource::Mock(MockSetaFeed::from_dir(dir)?)
        }
        FeedConfig::Live { .. } => {
            let seta = config
                .feed
                .seta()
                .ok_or_else(|| SetaError::NotConfigured("live feed settings".into()))?;
            FeedSource::Live(SetaClient::new(seta)?)
        }
    });

    let snapshots = Arc::new(JsonFileStore::new(&config.output_dir));

    // Both refreshes run once now, then on their own period
    let reconciler = Arc::new(CatalogReconciler::new(
        rules.clone(),
        aliases,
        snapshots.clone(),
        feed.clone(),
    ));

    let stops = reconciler.clone();
    tokio::spawn(run_periodic(
        "stops-and-route-codes",
        IntervalTicker::new(config.catalog_interval),
        move || {
            let stops = stops.clone();
            async move {
                stops.refresh_stops_and_routes().await;
            }
        },
    ));

    let numbers = reconciler.clone();
    tokio::spawn(run_periodic(
        "route-numbers",
        IntervalTicker::new(config.route_numbers_interval),
        move || {
            let numbers = numbers.clone();
            async move {
                numbers.refresh_route_numbers().await;
            }
        },
    ));

    let state = AppState::new(
        feed,
        rules,
        snapshots,
        ArrivalCache::new(&config.cache()),
        config.routes,
    );
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "bus server listening");
    info!(
        seta_api = config.routes.seta_api,
        static_files = config.routes.static_files,
        "route groups"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
