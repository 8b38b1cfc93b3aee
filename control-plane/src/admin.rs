use bytes::Bytes;
use http::{header, Method, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use prometheus_client::registry::Registry;
use std::{convert::Infallible, sync::Arc};
use tokio::{net::TcpListener, sync::watch};
use tracing::{debug, info, instrument};

type Body = Full<Bytes>;

/// Serves readiness, liveness, and metrics endpoints. The listener is bound
/// by the caller so readiness can be tied to a live socket.
#[instrument(skip_all)]
pub async fn serve(
    listener: TcpListener,
    ready: watch::Receiver<bool>,
    prom: Arc<Registry>,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "HTTP admin server listening");
    loop {
        let (stream, _) = listener.accept().await?;
        let ready = ready.clone();
        let prom = prom.clone();
        tokio::spawn(async move {
            let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                let rsp = handle(&ready, &prom, req);
                async move { Ok::<_, Infallible>(rsp) }
            });
            if let Err(error) = hyper::server::conn::http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!(%error, "admin connection closed");
            }
        });
    }
}

fn handle(
    ready: &watch::Receiver<bool>,
    prom: &Registry,
    req: Request<hyper::body::Incoming>,
) -> Response<Body> {
    if req.method() != Method::GET && req.method() != Method::HEAD {
        return status_response(StatusCode::METHOD_NOT_ALLOWED);
    }
    match req.uri().path() {
        "/live" => text_response(StatusCode::OK, "live\n"),
        "/ready" => {
            if *ready.borrow() {
                text_response(StatusCode::OK, "ready\n")
            } else {
                text_response(StatusCode::INTERNAL_SERVER_ERROR, "not ready\n")
            }
        }
        "/metrics" => metrics_response(prom),
        _ => status_response(StatusCode::NOT_FOUND),
    }
}

fn metrics_response(prom: &Registry) -> Response<Body> {
    let mut buf = String::new();
    match prometheus_client::encoding::text::encode(&mut buf, prom) {
        Ok(()) => Response::builder()
            .status(StatusCode::OK)
            .header(
                header::CONTENT_TYPE,
                "application/openmetrics-text; version=1.0.0; charset=utf-8",
            )
            .body(Body::from(Bytes::from(buf)))
            .expect("response must be valid"),
        Err(_) => status_response(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Body> {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(Bytes::from_static(body.as_bytes())))
        .expect("response must be valid")
}

fn status_response(status: StatusCode) -> Response<Body> {
    Response::builder()
        .status(status)
        .body(Body::default())
        .expect("response must be valid")
}
