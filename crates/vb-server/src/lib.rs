//! HTTP surface - vectorbridge
//!
//! Rocket server exposing the vector store/search endpoints, the
//! performance metrics surface, and the hot-reloadable configuration
//! surface, plus the background orchestration loop driving buffered
//! ingestion flushes and the reconciliation cadence.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rocket::config::Config as RocketConfig;
use tracing::{error, info};

use vb_application::services::{ReconcilePolicy, ReconcileSignals, should_reconcile};
use vb_domain::error::Result;
use vb_domain::ports::infrastructure::MetricsSink;
use vb_infrastructure::config::{ConfigLoader, ConfigWatcher};
use vb_infrastructure::{EngineContext, logging};

pub mod guards;
pub mod handlers;
pub mod models;

/// How often the orchestration loop evaluates its signals
const ORCHESTRATOR_TICK: Duration = Duration::from_secs(10);

/// Load configuration, build the engine, and serve until shutdown
pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = config_path {
        loader = loader.with_config_path(path);
    }
    let config = loader.load()?;
    logging::init_logging(&config.logging)?;

    let watcher = ConfigWatcher::new(loader, config);
    let engine = EngineContext::build(Arc::clone(&watcher))?;
    watcher.watch()?;

    spawn_orchestrator(Arc::clone(&engine));

    let server = watcher.get_config().server.clone();
    info!(host = %server.host, port = server.port, "starting HTTP server");

    let rocket_config = RocketConfig {
        address: server
            .host
            .parse()
            .map_err(|_| vb_domain::error::Error::config(format!("invalid host '{}'", server.host)))?,
        port: server.port,
        ..RocketConfig::default()
    };

    build_rocket(rocket_config, engine)
        .launch()
        .await
        .map_err(|e| vb_domain::error::Error::internal(format!("server failed: {e}")))?;

    Ok(())
}

/// Assemble the Rocket instance with every route mounted
pub fn build_rocket(
    config: RocketConfig,
    engine: Arc<EngineContext>,
) -> rocket::Rocket<rocket::Build> {
    rocket::custom(config).manage(engine).mount(
        "/",
        rocket::routes![
            handlers::vectors::store_vector,
            handlers::vectors::search_vectors,
            handlers::metrics::performance_metrics,
            handlers::config::get_providers,
            handlers::config::update_providers,
            handlers::config::update_tenant_preference,
            handlers::health::health,
        ],
    )
}

/// Background loop: flush due record buffers and run due reconciliations
///
/// Cadence decisions are pure functions of observable signals evaluated
/// every tick; no schedule state is persisted.
fn spawn_orchestrator(engine: Arc<EngineContext>) {
    tokio::spawn(async move {
        let policy = {
            let config = engine.config().get_config();
            ReconcilePolicy {
                min_interval: Duration::from_secs(config.reconciliation.min_interval_secs),
                max_interval: Duration::from_secs(config.reconciliation.max_interval_secs),
                record_threshold: config.reconciliation.record_threshold,
            }
        };
        let mut last_pass = Instant::now();
        let mut orphans_seen: u64 = 0;

        let mut tick = tokio::time::interval(ORCHESTRATOR_TICK);
        loop {
            tick.tick().await;
            engine.buffer().tick().await;

            let snapshot = engine.metrics().snapshot();
            let known_orphans = snapshot
                .error_counts
                .get("ledger_orphan")
                .copied()
                .unwrap_or(0)
                .saturating_sub(orphans_seen);
            let signals = ReconcileSignals {
                new_records: 0,
                elapsed_since_last: last_pass.elapsed(),
                known_orphans,
            };
            if !should_reconcile(&policy, &signals) {
                continue;
            }

            for collection in engine.collections().known_collections() {
                match engine.reconciler().reconcile_collection(&collection).await {
                    Ok(report) if !report.is_clean() => info!(
                        collection = %report.collection,
                        orphan_points = report.orphan_points_deleted,
                        quarantined = report.rows_quarantined,
                        "reconciliation repaired inconsistencies"
                    ),
                    Ok(_) => {}
                    Err(e) => {
                        error!(collection = %collection, error = %e, "reconciliation pass failed");
                    }
                }
            }
            last_pass = Instant::now();
            orphans_seen = engine
                .metrics()
                .snapshot()
                .error_counts
                .get("ledger_orphan")
                .copied()
                .unwrap_or(0);
        }
    });
}
