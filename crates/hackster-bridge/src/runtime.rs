//! Bridge assembly and lifecycle
//!
//! Startup order matters: the schema must exist before anything touches the
//! queue, and orphaned claims from a previous run are swept before workers
//! start so no source sits blocked behind a dead claim.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};

use hackster_common::{git_commit, init_metrics, AppConfig, Notifier};
use hackster_core::events::ChatEvent;
use hackster_core::traits::EventQueueRepository;
use hackster_db::{
    create_pool, run_migrations, DatabaseConfig, PgDeadLetterRepository, PgEventLogRepository,
    PgEventQueueRepository, PgRecordRepository, PgReportRepository, PgTransitionStore,
};
use hackster_service::ServiceContextBuilder;

use crate::ingest::run_ingest;
use crate::ops::run_ops_listener;
use crate::recovery::run_janitor;
use crate::sources::{ChannelEventSource, DiscordEventSource, EventSource};
use crate::worker::Worker;

/// How long shutdown waits for in-flight work before giving up
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Run the bridge until a shutdown signal arrives
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    init_metrics().context("failed to install metrics recorder")?;

    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .context("failed to connect to PostgreSQL")?;
    info!("PostgreSQL connection established");

    run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    let notifier = Arc::new(Notifier::from_config(&config.notify)?);

    let queue: Arc<dyn EventQueueRepository> = Arc::new(PgEventQueueRepository::new(pool.clone()));

    let services = Arc::new(
        ServiceContextBuilder::new()
            .pool(pool.clone())
            .record_repo(Arc::new(PgRecordRepository::new(pool.clone())))
            .event_log_repo(Arc::new(PgEventLogRepository::new(pool.clone())))
            .dead_letter_repo(Arc::new(PgDeadLetterRepository::new(pool.clone())))
            .report_repo(Arc::new(PgReportRepository::new(pool.clone())))
            .transition_store(Arc::new(PgTransitionStore::new(pool.clone())))
            .notifier(Arc::clone(&notifier))
            .build()?,
    );

    // Claims orphaned by a previous run block their sources until swept.
    // A failure here is transient; the janitor repeats the sweep anyway.
    match queue.requeue_stale(config.bridge.visibility_timeout()).await {
        Ok(0) => {}
        Ok(recovered) => info!(recovered, "Requeued events left in flight by a previous run"),
        Err(e) => warn!(error = %e, "Startup stale sweep failed"),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut tasks = Vec::new();

    for id in 0..config.bridge.workers {
        let worker = Worker::new(
            id,
            Arc::clone(&queue),
            Arc::clone(&services),
            config.bridge.clone(),
            shutdown_rx.clone(),
        );
        tasks.push(tokio::spawn(worker.run()));
    }

    tasks.push(tokio::spawn(run_janitor(
        Arc::clone(&queue),
        config.bridge.visibility_timeout(),
        shutdown_rx.clone(),
    )));

    let ops_addr: SocketAddr = config
        .ops
        .address()
        .parse()
        .context("invalid ops listener address")?;
    let ops_pool = pool.clone();
    let ops_shutdown = shutdown_rx.clone();
    tasks.push(tokio::spawn(async move {
        if let Err(e) = run_ops_listener(ops_addr, ops_pool, ops_shutdown).await {
            error!(error = %e, "Ops listener failed");
        }
    }));

    // Without a gateway token the bridge still drains the queue; events then
    // arrive only through API overrides and recovery
    let (source, channel_guard): (Box<dyn EventSource>, Option<mpsc::Sender<ChatEvent>>) =
        match config.bridge.discord_token.clone() {
            Some(token) => {
                info!("Connecting to the chat gateway");
                (Box::new(DiscordEventSource::new(token)), None)
            }
            None => {
                warn!("No gateway token configured; running with a local channel source");
                let (tx, source) = ChannelEventSource::new(64);
                (Box::new(source), Some(tx))
            }
        };

    tasks.push(tokio::spawn(run_ingest(
        source,
        Arc::clone(&queue),
        shutdown_rx,
    )));

    info!(
        workers = config.bridge.workers,
        ops = %ops_addr,
        "Event bridge running"
    );
    notifier.ops(format!("bridge up, commit {}", git_commit()));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutdown signal received");
    notifier.ops("bridge shutting down");

    let _ = shutdown_tx.send(true);
    drop(channel_guard);

    for task in tasks {
        match tokio::time::timeout(SHUTDOWN_GRACE, task).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Bridge task panicked"),
            Err(_) => warn!("A bridge task did not stop within the grace period"),
        }
    }

    pool.close().await;
    info!("Event bridge stopped");

    Ok(())
}
