use crate::api::Api;
use hyper_util::{rt::TokioIo, service::TowerToHyperService};
use tokio::net::TcpListener;
use tracing::{debug, info, instrument};

/// Accept loop for the operator-facing resource API. The listener is bound
/// by the caller so readiness can be tied to a live socket.
#[instrument(skip_all)]
pub async fn serve(listener: TcpListener, api: Api) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "HTTP API server listening");
    loop {
        let (stream, client) = listener.accept().await?;
        let service = TowerToHyperService::new(api.clone());
        tokio::spawn(async move {
            if let Err(error) = hyper::server::conn::http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!(%error, %client, "connection closed");
            }
        });
    }
}
