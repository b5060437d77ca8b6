//! # meshbridged: meshbridge gateway daemon
//!
//! Composition root that wires all adapters together and runs the gateway.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialise logging
//! - Initialise the `SQLite` connection pool and run migrations
//! - Load the device registry and construct the bridge over the mesh and
//!   MQTT adapters
//! - Re-attach persisted controllable devices, then start the inbound loop
//! - Serve the admin API (optional)
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use meshbridge_adapter_http_axum::router;
use meshbridge_adapter_http_axum::state::AppState;
use meshbridge_adapter_mesh_udp::UdpMesh;
use meshbridge_adapter_mqtt::MqttBus;
use meshbridge_adapter_storage_sqlite_sqlx::{Database, SqliteSnapshotStore};
use meshbridge_app::bridge::Bridge;
use meshbridge_app::inbound;
use meshbridge_app::registry::DeviceRegistry;
use meshbridge_domain::codec::TopicScheme;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config.logging.filter);

    // Storage
    let db = Database::open(config.database_url())
        .await
        .context("failed to open database")?;
    let store = SqliteSnapshotStore::new(db.pool().clone());
    let registry = DeviceRegistry::initialize(store, config.gateway.registry_capacity).await;

    // Transports
    let (mesh_tx, mesh_rx) = mpsc::channel(config.gateway.channel_capacity);
    let (bus_tx, bus_rx) = mpsc::channel(config.gateway.channel_capacity);

    let mesh = UdpMesh::bind(&config.mesh)
        .await
        .context("failed to bind mesh socket")?;
    let mesh_task = mesh.spawn_receiver(mesh_tx);
    let (bus, bus_task) =
        MqttBus::start(&config.mqtt, bus_tx).context("failed to start mqtt client")?;

    // Bridge
    let topics = TopicScheme::new(config.mqtt.base_topic.clone());
    let bridge = Arc::new(Bridge::new(registry, mesh, bus, topics));
    bridge.restore().await;
    let inbound_task = inbound::spawn(Arc::clone(&bridge), mesh_rx, bus_rx);

    // HTTP
    if config.http.enabled {
        let app = router::build(AppState::new(Arc::clone(&bridge)));
        let bind_addr = config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("failed to bind http listener on {bind_addr}"))?;
        tracing::info!(addr = %bind_addr, "admin api listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("http server failed")?;
    } else {
        shutdown_signal().await;
    }

    tracing::info!("shutting down");
    // The adapter tasks own the inbound senders; once they are gone the
    // inbound loop drains what is queued and returns.
    mesh_task.abort();
    bus_task.abort();
    if let Err(err) = inbound_task.await {
        tracing::warn!(%err, "inbound loop ended abnormally");
    }
    db.close().await;

    Ok(())
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {filter:?} ({err}), falling back to info");
        EnvFilter::new("info")
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
