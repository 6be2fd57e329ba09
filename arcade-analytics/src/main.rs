use std::sync::Arc;

use arcade_analytics::config::{AppConfig, StoreKind};
use arcade_analytics::store::{ClickHouseStore, EventStore, MemoryStore};
use arcade_analytics::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    arcade_shared::middleware::init_tracing("arcade-analytics");

    let config = AppConfig::load()?;
    let port = config.port;

    let store: Arc<dyn EventStore> = match config.store {
        StoreKind::Clickhouse => {
            let client = arcade_shared::clients::create_client(&config.clickhouse());
            Arc::new(ClickHouseStore::new(client))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory event store, events are lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // The store may come up after us; inserts then fail one by one until it does.
    if let Err(e) = store.init().await {
        tracing::error!(error = %e, "event store schema init failed");
    }

    let metrics_handle = arcade_shared::middleware::init_metrics();
    let state = Arc::new(
        AppState::new(store, metrics_handle).with_track_body_limit(config.track_body_limit),
    );
    let app = router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, store = ?config.store, "arcade-analytics starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
