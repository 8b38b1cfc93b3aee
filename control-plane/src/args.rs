use crate::{
    admin,
    api::{Api, IndexInfo},
    metrics::StoreMetrics,
    serve,
    store::{MemoryStore, SharedStore},
};
use anyhow::Result;
use clap::Parser;
use std::{net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::watch};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[clap(name = "control-plane", about = "A service mesh control plane")]
pub struct Args {
    #[clap(long, default_value = "info", env = "CONTROL_PLANE_LOG")]
    log_level: String,

    /// Address of the operator-facing resource API.
    #[clap(long, default_value = "0.0.0.0:5681")]
    api_addr: SocketAddr,

    /// Address of the admin server (readiness, liveness, metrics).
    #[clap(long, default_value = "0.0.0.0:9901")]
    admin_addr: SocketAddr,

    /// Serves the resource API read-only.
    #[clap(long)]
    read_only: bool,

    /// Overrides the instance id reported by the API index.
    #[clap(long, env = "CONTROL_PLANE_INSTANCE_ID")]
    instance_id: Option<String>,
}

// === impl Args ===

impl Args {
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let filter = EnvFilter::try_new(&self.log_level)?;
        tracing_subscriber::fmt().with_env_filter(filter).init();

        let mut prom = prometheus_client::registry::Registry::default();
        let store: SharedStore =
            Arc::new(StoreMetrics::register(MemoryStore::new(), &mut prom));
        let prom = Arc::new(prom);

        let hostname = std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let instance_id = self.instance_id.unwrap_or_else(|| hostname.clone());
        let api = Api::new(
            crate::core::Registry::default(),
            store,
            self.read_only,
            IndexInfo {
                hostname,
                instance_id,
            },
        );

        let (ready_tx, ready_rx) = watch::channel(false);

        // Bind both sockets before signaling readiness, so /ready cannot
        // pass while a port is not yet listening.
        let admin_listener = TcpListener::bind(self.admin_addr).await?;
        let api_listener = TcpListener::bind(self.api_addr).await?;

        let admin = admin::serve(admin_listener, ready_rx, prom);
        tokio::spawn(async move {
            if let Err(error) = admin.await {
                warn!(%error, "admin server failed");
            }
        });

        let api_server = serve::serve(api_listener, api);
        tokio::spawn(async move {
            if let Err(error) = api_server.await {
                warn!(%error, "API server failed");
            }
        });

        let _ = ready_tx.send(true);

        tokio::signal::ctrl_c().await?;
        info!("shutting down");
        Ok(())
    }
}
