use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use arrivals_server::cache::{SnapshotPublisher, snapshot_cache};
use arrivals_server::config::AppConfig;
use arrivals_server::cta::{FeedClient, FeedSource, MockFeed};
use arrivals_server::domain::{Snapshot, StationLayout};
use arrivals_server::refresh::{RefreshConfig, RefreshHealth, RefreshScheduler};
use arrivals_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let layout = Arc::new(StationLayout::wilson());
    let (publisher, reader) = snapshot_cache(Snapshot::empty(&layout));
    let cancel = CancellationToken::new();

    let (health, refresh_task) = match &config.mock_feed_file {
        Some(path) => {
            info!(path = %path, "serving arrivals from mock feed file");
            let feed = MockFeed::from_file(path).unwrap_or_else(|e| {
                error!(error = %e, "failed to load mock feed");
                std::process::exit(1);
            });
            spawn_refresh(feed, layout, config.refresh.clone(), publisher, &cancel)
        }
        None => {
            let client = FeedClient::new(config.feed.clone()).unwrap_or_else(|e| {
                error!(error = %e, "failed to create feed client");
                std::process::exit(1);
            });
            info!(
                station_id = %config.feed.station_id,
                endpoint = %config.feed.endpoint(),
                "polling live arrivals feed"
            );
            spawn_refresh(client, layout, config.refresh.clone(), publisher, &cancel)
        }
    };

    let state = AppState::new(reader, health, config.stale_after());
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.listen_addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };
    info!(addr = %config.listen_addr, "arrivals server listening");

    let shutdown = {
        let cancel = cancel.clone();
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutting down");
            cancel.cancel();
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!(error = %e, "server error");
    }

    cancel.cancel();
    if let Err(e) = refresh_task.await {
        error!(error = %e, "refresh task panicked");
    }
}

fn spawn_refresh<S>(
    source: S,
    layout: Arc<StationLayout>,
    config: RefreshConfig,
    publisher: SnapshotPublisher,
    cancel: &CancellationToken,
) -> (RefreshHealth, JoinHandle<()>)
where
    S: FeedSource + 'static,
{
    let scheduler = RefreshScheduler::new(source, layout, config, publisher);
    let health = scheduler.health();
    let handle = tokio::spawn(scheduler.run(cancel.clone()));
    (health, handle)
}
